//! The ordered, auto-indexing container produced by the parser.

use std::fmt;

use indexmap::IndexMap;
use indexmap::map::{Iter, Keys, Values};

use crate::key::Key;

/// A value stored in a [`QueryMap`]: either a leaf string or a nested map.
#[derive(Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Map(QueryMap),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Map(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&QueryMap> {
        match self {
            Value::Text(_) => None,
            Value::Map(m) => Some(m),
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Turns this value into a map, discarding a leaf if one was stored.
    fn make_map(&mut self) -> &mut QueryMap {
        if let Value::Text(_) = self {
            *self = Value::Map(QueryMap::new());
        }
        match self {
            Value::Map(map) => map,
            Value::Text(_) => unreachable!(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s:?}"),
            Value::Map(m) => fmt::Debug::fmt(m, f),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<QueryMap> for Value {
    fn from(m: QueryMap) -> Self {
        Value::Map(m)
    }
}

/// An insertion-ordered PHP array.
///
/// Entries keep the position of their first insertion; overwriting a key
/// replaces the value in place. Each map also tracks the next free integer
/// index, which is where [`set_next`](QueryMap::set_next) (the `a[]=`
/// notation) appends.
///
/// Equality compares entries *in order*.
#[derive(Clone, Default)]
pub struct QueryMap {
    entries: IndexMap<Key, Value>,
    next_index: i64,
}

impl QueryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The key the next [`set_next`](QueryMap::set_next) call will use.
    pub fn next_index(&self) -> i64 {
        self.next_index
    }

    pub fn get<K: Into<Key>>(&self, key: K) -> Option<&Value> {
        self.entries.get(&key.into())
    }

    pub fn get_mut<K: Into<Key>>(&mut self, key: K) -> Option<&mut Value> {
        self.entries.get_mut(&key.into())
    }

    /// Inserts `value` at `key`, overwriting any existing entry in place.
    pub fn set<K: Into<Key>>(&mut self, key: K, value: Value) -> &mut Value {
        let key = key.into();
        self.advance_past(&key);
        let (idx, _) = self.entries.insert_full(key, value);
        &mut self.entries[idx]
    }

    /// Appends `value` under the next free integer index.
    ///
    /// Returns `None` when the index space is exhausted, i.e. the cursor is
    /// stuck at `i64::MAX` and that slot is already taken.
    pub fn set_next(&mut self, value: Value) -> Option<&mut Value> {
        let key = Key::Int(self.next_index);
        if self.entries.contains_key(&key) {
            return None;
        }
        self.next_index = self.next_index.saturating_add(1);
        let (idx, _) = self.entries.insert_full(key, value);
        Some(&mut self.entries[idx])
    }

    /// Returns the map stored at `key`, creating it if the key is absent or
    /// currently holds a leaf.
    pub(crate) fn child(&mut self, key: Key) -> &mut QueryMap {
        self.advance_past(&key);
        self.entries
            .entry(key)
            .or_insert_with(|| Value::Map(QueryMap::new()))
            .make_map()
    }

    /// Appends a fresh map under the next free integer index.
    pub(crate) fn push_child(&mut self) -> Option<&mut QueryMap> {
        self.set_next(Value::Map(QueryMap::new()))
            .map(Value::make_map)
    }

    fn advance_past(&mut self, key: &Key) {
        if let Key::Int(i) = *key {
            if i >= self.next_index {
                self.next_index = i.saturating_add(1);
            }
        }
    }

    pub fn iter(&self) -> Iter<'_, Key, Value> {
        self.entries.iter()
    }

    pub fn keys(&self) -> Keys<'_, Key, Value> {
        self.entries.keys()
    }

    pub fn values(&self) -> Values<'_, Key, Value> {
        self.entries.values()
    }

    /// Returns the plain ordered mapping, dropping the index cursor.
    pub fn materialize(self) -> IndexMap<Key, Value> {
        self.entries
    }
}

impl PartialEq for QueryMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for QueryMap {}

impl fmt::Debug for QueryMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for QueryMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = QueryMap::new();
        for (k, v) in iter {
            map.set(k, v.into());
        }
        map
    }
}

impl IntoIterator for QueryMap {
    type Item = (Key, Value);
    type IntoIter = indexmap::map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryMap {
    type Item = (&'a Key, &'a Value);
    type IntoIter = Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod test {
    use super::{QueryMap, Value};
    use crate::key::Key;

    use pretty_assertions::assert_eq;

    #[test]
    fn set_keeps_first_position() {
        let mut map = QueryMap::new();
        map.set("a", "1".into());
        map.set("b", "2".into());
        map.set("a", "3".into());

        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec![Key::from("a"), Key::from("b")]);
        assert_eq!(map.get("a"), Some(&Value::from("3")));
    }

    #[test]
    fn set_classifies_keys() {
        let mut map = QueryMap::new();
        map.set("7", "x".into());
        assert_eq!(map.get(7), Some(&Value::from("x")));
        assert_eq!(map.next_index(), 8);
    }

    #[test]
    fn set_next_follows_explicit_indices() {
        let mut map = QueryMap::new();
        map.set_next("A".into());
        map.set(9, "C".into());
        map.set_next("D".into());
        map.set(-3, "E".into());
        map.set(2, "F".into());
        map.set_next("G".into());

        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                Key::Int(0),
                Key::Int(9),
                Key::Int(10),
                Key::Int(-3),
                Key::Int(2),
                Key::Int(11)
            ]
        );
    }

    #[test]
    fn set_next_refuses_exhausted_cursor() {
        let mut map = QueryMap::new();
        map.set(i64::MAX, "last".into());
        assert_eq!(map.next_index(), i64::MAX);
        assert!(map.set_next("overflow".into()).is_none());
        assert_eq!(map.get(i64::MAX), Some(&Value::from("last")));

        let mut map = QueryMap::new();
        map.set(i64::MAX - 1, "a".into());
        assert!(map.set_next("b".into()).is_some());
        assert!(map.set_next("c".into()).is_none());
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn child_replaces_leaf() {
        let mut map = QueryMap::new();
        map.set("foo", "bar".into());
        map.child(Key::from("foo")).set_next("x".into());

        let expected = QueryMap::from_iter([(
            "foo",
            Value::Map(QueryMap::from_iter([(0, "x")])),
        )]);
        assert_eq!(map, expected);
    }

    #[test]
    fn child_reuses_existing_map() {
        let mut map = QueryMap::new();
        map.child(Key::from("a")).set("x", "1".into());
        map.child(Key::from("a")).set("y", "2".into());

        let inner = map.get("a").and_then(Value::as_map).unwrap();
        assert_eq!(inner.len(), 2);
    }

    #[test]
    fn equality_is_order_sensitive() {
        let ab = QueryMap::from_iter([("a", "1"), ("b", "2")]);
        let ba = QueryMap::from_iter([("b", "2"), ("a", "1")]);
        assert_ne!(ab, ba);
    }

    #[test]
    fn materialize_drops_cursor() {
        let map = QueryMap::from_iter([(0, "a"), (1, "b")]);
        let plain = map.materialize();
        assert_eq!(plain.get(&Key::Int(1)), Some(&Value::from("b")));
    }
}
