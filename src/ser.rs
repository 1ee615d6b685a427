//! Writing [`QueryMap`]s back out, as querystrings or through serde.

mod encode;

use encode::encode;

use serde::ser::{self, SerializeMap};

use crate::error::*;
use crate::key::Key;
use crate::map::{QueryMap, Value};

use std::io::Write;

/// Writes a map as a querystring, the way PHP's `http_build_query` does.
///
/// ```
/// let map = phpqs::parse_str("user[name]=Ada&user[langs][]=en&user[langs][]=fr");
///
/// assert_eq!(
///     phpqs::to_string(&map).unwrap(),
///     "user%5Bname%5D=Ada&user%5Blangs%5D%5B0%5D=en&user%5Blangs%5D%5B1%5D=fr"
/// );
/// ```
pub fn to_string(map: &QueryMap) -> Result<String> {
    let config = crate::Config::default();
    config.serialize_string(map)
}

/// Writes a map as a querystring into a generic writer object.
///
/// ```
/// let map = phpqs::parse_str("a=1&b[]=2");
///
/// let mut buffer = Vec::new();
/// phpqs::to_writer(&map, &mut buffer).unwrap();
/// assert_eq!(String::from_utf8(buffer).unwrap(), "a=1&b%5B0%5D=2");
/// ```
pub fn to_writer<W: Write>(map: &QueryMap, writer: &mut W) -> Result<()> {
    let config = crate::Config::default();
    config.serialize_to_writer(map, writer)
}

/// Writes nested maps as `parent[child]=value` pairs.
///
/// The serializer maintains a key stack to build nested paths. For example,
/// when writing `{user: {name: "John"}}`, it pushes `user` onto the stack,
/// then writes `name` as `user[name]=John`.
///
/// Every leaf produces one pair, in insertion order, depth first. Empty
/// nested maps produce nothing.
pub struct QsSerializer<W: Write> {
    writer: W,
    first_kv: bool,
    key: Vec<Vec<u8>>,
    config: crate::Config,
}

impl<W: Write> QsSerializer<W> {
    /// Creates a new `QsSerializer` with the given writer.
    pub fn new(writer: W, config: crate::Config) -> Self {
        Self {
            writer,
            first_kv: true,
            key: Vec::with_capacity(4),
            config,
        }
    }

    pub fn serialize_map(&mut self, map: &QueryMap) -> Result<()> {
        for (key, value) in map {
            match key {
                Key::Int(i) => self.push_key(itoa::Buffer::new().format(*i).as_bytes()),
                Key::Str(s) => self.push_key(s.as_bytes()),
            }
            match value {
                Value::Text(text) => self.write_value(text.as_bytes())?,
                Value::Map(inner) => self.serialize_map(inner)?,
            }
            self.pop_key()?;
        }
        Ok(())
    }

    /// Pushes a new key segment onto the key stack for nested structures.
    ///
    /// - First key "user" becomes: `user`
    /// - Second key "name" becomes: `user[name]`
    /// - Third key "first" becomes: `user[name][first]`
    fn push_key(&mut self, newkey: &[u8]) {
        let first_key_segment = self.key.is_empty();

        // optimistic: most keys don't need percent-encoding
        let estimated_capacity = newkey.len()
            + if first_key_segment { 0 } else { 2 }
            + if self.config.use_form_encoding { 4 } else { 0 };
        let mut segment = Vec::with_capacity(estimated_capacity);
        if !first_key_segment {
            if self.config.use_form_encoding {
                segment.extend_from_slice(b"%5B");
            } else {
                segment.push(b'[');
            }
        }

        if newkey
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || *b == b'-' || *b == b'_' || *b == b'.')
        {
            // nothing to encode in either mode
            segment.extend_from_slice(newkey);
        } else {
            for encoded in encode(newkey, self.config.use_form_encoding) {
                segment.extend_from_slice(&encoded);
            }
        }

        if !first_key_segment {
            if self.config.use_form_encoding {
                segment.extend_from_slice(b"%5D");
            } else {
                segment.push(b']');
            }
        }
        self.key.push(segment);
    }

    fn write_key_stack(&mut self) -> Result<()> {
        if self.first_kv {
            self.first_kv = false;
        } else {
            self.writer.write_all(b"&")?;
        }
        for segment in &self.key {
            self.writer.write_all(segment)?;
        }
        Ok(())
    }

    fn pop_key(&mut self) -> Result<()> {
        let popped = self.key.pop();
        if popped.is_none() {
            return Err(Error::Custom("internal error: no key found".to_string()));
        }
        Ok(())
    }

    fn write_value(&mut self, value: &[u8]) -> Result<()> {
        self.write_key_stack()?;
        self.writer.write_all(b"=")?;
        for encoded in encode(value, self.config.use_form_encoding) {
            self.writer.write_all(&encoded)?;
        }
        Ok(())
    }
}

impl ser::Serialize for Key {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Key::Int(i) => serializer.serialize_i64(*i),
            Key::Str(s) => serializer.serialize_str(s),
        }
    }
}

impl ser::Serialize for Value {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Text(s) => serializer.serialize_str(s),
            Value::Map(m) => m.serialize(serializer),
        }
    }
}

impl ser::Serialize for QueryMap {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
