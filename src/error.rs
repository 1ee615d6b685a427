use serde::{de, ser};

use std::fmt::Display;
use std::io;
use std::string;

/// Errors raised by the serde layers and the querystring writer.
///
/// Parsing itself never fails: `parse_str` accepts any input. These errors
/// only arise when a parsed map does not fit the requested Rust type, or when
/// writing to an `io::Write` fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Custom string-based error, usually produced by serde.
    #[error("{0}")]
    Custom(String),

    /// The requested type cannot be produced from the root of a querystring.
    #[error("cannot deserialize {0} at the top level. Try deserializing into a struct.")]
    TopLevel(&'static str),

    /// Error proxied from the underlying writer.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The writer produced bytes that are not valid UTF-8.
    #[error(transparent)]
    FromUtf8(#[from] string::FromUtf8Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Generate error to show top-level type cannot be deserialized.
    pub fn top_level(object: &'static str) -> Self {
        Error::TopLevel(object)
    }
}

impl de::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::Custom(msg.to_string())
    }
}

impl ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::Custom(msg.to_string())
    }
}
