use std::io::Write;

use serde::de;

use crate::error::Result;
use crate::map::QueryMap;
use crate::ser::QsSerializer;

/// Configuration for serialization and deserialization behavior.
///
/// Parsing has no knobs: it always follows PHP's `parse_str` rules, with a
/// fixed `&`/`=` syntax and no nesting limit. What can be configured is how
/// [`QueryMap`]s are written back out.
///
/// ## Encoding
///
/// By default keys and values are written with form encoding, the way PHP's
/// `http_build_query` does: everything but ASCII alphanumerics and `-_.` is
/// percent-encoded, including the brackets of nested keys.
///
/// ```
/// use phpqs::Config;
///
/// let map = phpqs::parse_str("a[b]=x y");
/// assert_eq!(phpqs::to_string(&map).unwrap(), "a%5Bb%5D=x+y");
///
/// let config = Config::new().use_form_encoding(false);
/// assert_eq!(config.serialize_string(&map).unwrap(), "a[b]=x+y");
/// ```
///
/// Both forms parse back to the same map, since keys are decoded before
/// their brackets are interpreted. Keys whose own text contains `[` or `]`
/// cannot survive that trip in either form.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub(crate) use_form_encoding: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub const fn new() -> Self {
        Self {
            use_form_encoding: true,
        }
    }

    /// By default, `phpqs` writes form-encoded output (PHP's `urlencode`).
    ///
    /// Set this to `false` to use the relaxed query-string encoding defined
    /// in [WHATWG](https://url.spec.whatwg.org/#query-percent-encode-set),
    /// which leaves the brackets of nested keys readable: `a[b][c]=1`.
    /// Brackets that are part of a key's text are still percent-encoded.
    pub const fn use_form_encoding(mut self, use_form_encoding: bool) -> Self {
        self.use_form_encoding = use_form_encoding;
        self
    }

    /// Deserializes a querystring from a `&[u8]` using this `Config`.
    pub fn deserialize_bytes<T: de::DeserializeOwned>(self, input: &[u8]) -> Result<T> {
        self.deserialize_str(&String::from_utf8_lossy(input))
    }

    /// Deserializes a querystring from a `&str` using this `Config`.
    pub fn deserialize_str<T: de::DeserializeOwned>(self, input: &str) -> Result<T> {
        T::deserialize(crate::de::QsDeserializer::new(input))
    }

    /// Writes `map` as a querystring using this `Config`.
    pub fn serialize_string(self, map: &QueryMap) -> Result<String> {
        // initialize the buffer with 128 bytes
        // this is a guess based on what `serde_json` does
        let mut buffer = Vec::with_capacity(128);
        self.serialize_to_writer(map, &mut buffer)?;
        String::from_utf8(buffer).map_err(crate::Error::from)
    }

    /// Writes `map` as a querystring into `writer` using this `Config`.
    pub fn serialize_to_writer<W: Write>(self, map: &QueryMap, writer: &mut W) -> Result<()> {
        QsSerializer::new(writer, self).serialize_map(map)
    }
}
