//! Deserialization support for PHP-style querystrings.
//!
//! Deserialization happens in two steps. First `parse` turns the input into a
//! [`QueryMap`] exactly as PHP's `parse_str` would, which never fails. Then
//! the map is walked by [`QsDeserializer`] to build the requested type.
//!
//! Leaves are always strings; they are parsed into numbers, booleans and so
//! on only when the target type asks for it. Nested maps can be read either
//! as maps/structs or, ignoring their keys, as sequences. That is how
//! `ids[]=1&ids[]=2` becomes a `Vec<u32>`.

pub(crate) mod parse;
mod string_parser;

use serde::de::{self, Deserializer as _};

use crate::error::{Error, Result};
use crate::key::Key;
use crate::map::{QueryMap, Value};

use string_parser::StringParsingDeserializer;

use std::io::Read;

/// Deserializes a querystring from a `&str`.
///
/// ```
/// # use serde::Deserialize;
/// #[derive(Debug, Deserialize, PartialEq)]
/// struct Query {
///     name: String,
///     age: u8,
///     tags: Vec<String>,
/// }
///
/// let q: Query = phpqs::from_str("name=Alice&age=24&tags[]=a&tags[]=b").unwrap();
/// assert_eq!(
///     q,
///     Query {
///         name: "Alice".to_owned(),
///         age: 24,
///         tags: vec!["a".to_owned(), "b".to_owned()],
///     }
/// );
/// ```
pub fn from_str<T: de::DeserializeOwned>(input: &str) -> Result<T> {
    crate::Config::default().deserialize_str(input)
}

/// Deserializes a querystring from a `&[u8]`.
///
/// Raw bytes that are not valid UTF-8 are replaced with U+FFFD before
/// parsing; percent-encoded bytes are handled by the decoder as usual.
pub fn from_bytes<T: de::DeserializeOwned>(input: &[u8]) -> Result<T> {
    crate::Config::default().deserialize_bytes(input)
}

/// Convenience function that reads all bytes from `reader` and deserializes
/// them with `from_bytes`.
pub fn from_reader<T, R>(mut reader: R) -> Result<T>
where
    T: de::DeserializeOwned,
    R: Read,
{
    let mut buf = vec![];
    reader.read_to_end(&mut buf)?;
    from_bytes(&buf)
}

/// Deserializes an already parsed [`QueryMap`].
pub fn from_map<T: de::DeserializeOwned>(map: QueryMap) -> Result<T> {
    T::deserialize(QsDeserializer::with_map(map))
}

/// A deserializer for the querystring format.
///
/// Supported top-level outputs are structs, maps and enums.
pub struct QsDeserializer {
    iter: indexmap::map::IntoIter<Key, Value>,
    value: Option<Value>,
}

impl QsDeserializer {
    pub fn with_map(map: QueryMap) -> Self {
        QsDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }

    /// Parses `input` and returns a deserializer over the result.
    pub fn new(input: &str) -> Self {
        Self::with_map(parse::parse(input))
    }
}

impl<'de> de::Deserializer<'de> for QsDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_map(self)
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    /// Throws an error.
    ///
    /// Sequences are not supported at the top level.
    fn deserialize_seq<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::top_level("sequence"))
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    /// Throws an error.
    ///
    /// Tuples are not supported at the top level.
    fn deserialize_tuple<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::top_level("tuple"))
    }

    /// Throws an error.
    ///
    /// TupleStructs are not supported at the top level.
    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::top_level("tuple struct"))
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_enum(self)
    }

    serde::forward_to_deserialize_any! {
        bool u8 u16 u32 u64 i8 i16 i32 i64 f32 f64 char str string
        unit option bytes byte_buf unit_struct identifier ignored_any
    }
}

impl<'de> de::MapAccess<'de> for QsDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        if let Some((key, value)) = self.iter.next() {
            self.value = Some(value);
            return seed.deserialize(key_deserializer(key)).map(Some);
        };
        Ok(None)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        if let Some(v) = self.value.take() {
            seed.deserialize(ValueDeserializer(v))
        } else {
            Err(de::Error::custom(
                "Somehow the list was empty after a non-empty key was returned",
            ))
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

impl<'de> de::EnumAccess<'de> for QsDeserializer {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(mut self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        if let Some((key, value)) = self.iter.next() {
            self.value = Some(value);
            Ok((seed.deserialize(key_deserializer(key))?, self))
        } else {
            Err(de::Error::custom("No more values"))
        }
    }
}

impl<'de> de::VariantAccess<'de> for QsDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer(value)),
            None => Err(de::Error::custom("no value to deserialize")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(value) => de::Deserializer::deserialize_seq(ValueDeserializer(value), visitor),
            None => Err(de::Error::custom("no value to deserialize")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(value) => de::Deserializer::deserialize_map(ValueDeserializer(value), visitor),
            None => Err(de::Error::custom("no value to deserialize")),
        }
    }
}

/// Keys are handed out as text; integer keys can still be read back as
/// numbers because the string deserializer parses on demand.
fn key_deserializer(key: Key) -> StringParsingDeserializer<Error> {
    let text = match key {
        Key::Int(i) => itoa::Buffer::new().format(i).to_owned(),
        Key::Str(s) => s,
    };
    StringParsingDeserializer::new(text)
}

/// The values of a nested map, in insertion order.
struct ValueSeq<I: Iterator<Item = Value>>(I);

impl<'de, I: Iterator<Item = Value>> de::SeqAccess<'de> for ValueSeq<I> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.0.next() {
            Some(v) => seed.deserialize(ValueDeserializer(v)).map(Some),
            None => Ok(None),
        }
    }
}

struct ValueDeserializer(Value);

macro_rules! deserialize_primitive {
    ($ty:ident, $method:ident) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: de::Visitor<'de>,
        {
            match self.0 {
                Value::Map(_) => Err(de::Error::custom(format!(
                    "Expected: {:?}, got a Map",
                    stringify!($ty)
                ))),
                Value::Text(x) => StringParsingDeserializer::new(x).$method(visitor),
            }
        }
    };
}

impl ValueDeserializer {
    fn into_map_deserializer(self) -> Result<QsDeserializer> {
        match self.0 {
            Value::Map(map) => Ok(QsDeserializer::with_map(map)),
            Value::Text(x) => Err(de::Error::invalid_type(
                de::Unexpected::Str(&x),
                &"a map",
            )),
        }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.0 {
            Value::Map(map) => visitor.visit_map(QsDeserializer::with_map(map)),
            Value::Text(x) => StringParsingDeserializer::<Error>::new(x).deserialize_any(visitor),
        }
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.0 {
            Value::Map(map) => visitor.visit_seq(ValueSeq(map.into_iter().map(|(_k, v)| v))),
            x => visitor.visit_seq(ValueSeq(std::iter::once(x))),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.into_map_deserializer()?.deserialize_map(visitor)
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.into_map_deserializer()?
            .deserialize_struct(name, fields, visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.0 {
            Value::Text(ref x) if x.is_empty() => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.0 {
            Value::Map(map) => QsDeserializer::with_map(map).deserialize_enum(name, variants, visitor),
            Value::Text(x) => {
                StringParsingDeserializer::<Error>::new(x).deserialize_enum(name, variants, visitor)
            }
        }
    }

    deserialize_primitive!(bool, deserialize_bool);
    deserialize_primitive!(i8, deserialize_i8);
    deserialize_primitive!(i16, deserialize_i16);
    deserialize_primitive!(i32, deserialize_i32);
    deserialize_primitive!(i64, deserialize_i64);
    deserialize_primitive!(u8, deserialize_u8);
    deserialize_primitive!(u16, deserialize_u16);
    deserialize_primitive!(u32, deserialize_u32);
    deserialize_primitive!(u64, deserialize_u64);
    deserialize_primitive!(f32, deserialize_f32);
    deserialize_primitive!(f64, deserialize_f64);
    deserialize_primitive!(char, deserialize_char);
    deserialize_primitive!(unit, deserialize_unit);

    serde::forward_to_deserialize_any! {
        str string bytes byte_buf unit_struct identifier ignored_any
    }
}
