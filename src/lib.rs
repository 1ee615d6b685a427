//! PHP-compatible querystring parsing
//!
//! `phpqs` decodes querystrings exactly the way PHP's
//! [`parse_str`](https://www.php.net/manual/en/function.parse-str.php) does,
//! quirks included:
//!
//! - `a[]=x` appends under the next free integer index, `a[k]=x` nests
//! - keys that spell canonical integers (`"3"`, `"-3"`, not `"03"`) become
//!   integer keys
//! - spaces and dots in the variable name become `_`
//! - malformed input is never an error: pairs without a name are dropped,
//!   an unterminated `[` is folded into the name, invalid `%` escapes are kept
//!   literally
//! - a later pair overwrites an earlier one with the same key, keeping its
//!   position, even if that turns a string into a nested map or back
//!
//! The result is a [`QueryMap`], an insertion-ordered map whose values are
//! either strings or further maps.
//!
//! ```
//! use phpqs::{Key, Value};
//!
//! let map = phpqs::parse_str("arr[]=A&arr[9]=C&arr[]=D&test.field=1");
//!
//! let arr = map.get("arr").and_then(Value::as_map).unwrap();
//! let keys: Vec<_> = arr.keys().cloned().collect();
//! assert_eq!(keys, vec![Key::Int(0), Key::Int(9), Key::Int(10)]);
//!
//! assert_eq!(map.get("test_field"), Some(&Value::from("1")));
//! ```
//!
//! ## Serde
//!
//! A parsed map can be turned into any `Deserialize` type with
//! [`from_str`], and written back out with [`to_string`].
//!
//! ```
//! use serde::Deserialize;
//!
//! #[derive(Debug, PartialEq, Deserialize)]
//! struct Filter {
//!     category: String,
//!     ids: Vec<u32>,
//!     in_stock: bool,
//! }
//!
//! let filter: Filter = phpqs::from_str("category=books&ids[]=3&ids[]=5&in_stock=1").unwrap();
//! assert_eq!(
//!     filter,
//!     Filter {
//!         category: "books".to_owned(),
//!         ids: vec![3, 5],
//!         in_stock: true,
//!     }
//! );
//! ```

mod config;
mod de;
mod error;
mod key;
mod map;
mod ser;

pub use config::Config;
#[doc(inline)]
pub use de::parse::decode::decode as urldecode;
#[doc(inline)]
pub use de::{from_bytes, from_map, from_reader, from_str, QsDeserializer};
pub use error::{Error, Result};
pub use key::Key;
pub use map::{QueryMap, Value};
#[doc(inline)]
pub use ser::{to_string, to_writer, QsSerializer};

/// Parses a querystring the way PHP's `parse_str` does.
///
/// This never fails: malformed pieces are repaired or dropped following PHP's
/// rules, so the worst case is an empty map.
///
/// ```
/// use phpqs::{QueryMap, Value};
///
/// let map = phpqs::parse_str("foo=bar&foo[]=x&arr[1=deedee&=ignored");
/// assert_eq!(
///     map,
///     QueryMap::from_iter([
///         ("foo", Value::Map(QueryMap::from_iter([(0, "x")]))),
///         ("arr_1", Value::from("deedee")),
///     ])
/// );
/// ```
pub fn parse_str(input: &str) -> QueryMap {
    de::parse::parse(input)
}
