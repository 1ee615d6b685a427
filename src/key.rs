use std::fmt;

/// A key in a [`QueryMap`](crate::QueryMap).
///
/// PHP arrays are keyed either by integers or by strings, and a string that
/// spells a canonical decimal integer is always stored as that integer. So
/// `a[3]=x` and `a[03]=x` land on different keys: `Int(3)` and `Str("03")`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl Key {
    /// Classifies a raw textual key.
    ///
    /// The key becomes an integer iff it is exactly `"0"` or matches
    /// `-?[1-9][0-9]*` *and* fits in an `i64`. Everything else (`"00"`,
    /// `"+3"`, `"-0"`, `"3.14"`, overflowing digit strings) stays text.
    ///
    /// ```
    /// use phpqs::Key;
    ///
    /// assert_eq!(Key::classify("42"), Key::Int(42));
    /// assert_eq!(Key::classify("-7"), Key::Int(-7));
    /// assert_eq!(Key::classify("042"), Key::Str("042".to_owned()));
    /// ```
    pub fn classify(raw: &str) -> Self {
        match parse_int(raw) {
            Some(i) => Key::Int(i),
            None => Key::Str(raw.to_owned()),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(i) => Some(*i),
            Key::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Int(_) => None,
            Key::Str(s) => Some(s),
        }
    }
}

/// Returns the integer spelled by `raw`, if it is a canonical decimal integer
/// within `i64` range.
fn parse_int(raw: &str) -> Option<i64> {
    let bytes = raw.as_bytes();
    if bytes == b"0" {
        return Some(0);
    }

    let digits = bytes.strip_prefix(b"-").unwrap_or(bytes);
    match digits.split_first() {
        Some((b'1'..=b'9', rest)) if rest.iter().all(u8::is_ascii_digit) => {}
        _ => return None,
    }

    // overflow falls back to a string key
    raw.parse::<i64>().ok()
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{i}"),
            Key::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{i}"),
            Key::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::classify(s)
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        match parse_int(&s) {
            Some(i) => Key::Int(i),
            None => Key::Str(s),
        }
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::Int(i.into())
    }
}
