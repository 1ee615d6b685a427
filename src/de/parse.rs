use crate::key::Key;
use crate::map::{QueryMap, Value};

pub(crate) mod decode;

/// Parses a querystring into a [`QueryMap`], following PHP's `parse_str`.
///
/// The input is split on `&`, each pair on its first `=`, and both halves
/// are urldecoded *before* the key is interpreted. So `a%5Bb%5D=1` nests just
/// like `a[b]=1`.
pub fn parse(encoded_string: &str) -> QueryMap {
    let mut root = QueryMap::new();
    if encoded_string.is_empty() {
        return root;
    }

    for pair in encoded_string.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode::decode(key);
        let value = decode::decode(value).into_owned();
        register(&mut root, &key, value);
    }

    root
}

/// One `[...]` group of a variable name.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum Segment<'a> {
    /// `[]`: append at the next free index.
    Next,
    /// `[key]`: the raw key text, not yet classified.
    Key(&'a str),
}

/// A variable name split into its sanitized base name and bracket segments.
///
/// `arr.x[3][]` becomes `arr_x` with segments `[Key("3"), Next]`.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct VarName<'a> {
    pub name: String,
    pub segments: Vec<Segment<'a>>,
}

impl<'a> VarName<'a> {
    /// Splits a decoded key into its base name and segments.
    ///
    /// Returns `None` when the base name is empty (e.g. `=1`, `[]=1`, or a
    /// key made only of leading spaces), in which case PHP drops the pair.
    pub fn tokenize(raw: &'a str) -> Option<Self> {
        let raw = raw.trim_start_matches(' ');

        // spaces and dots are not allowed in variable names, but only the part
        // before the first `[` is rewritten
        let mut name = String::with_capacity(raw.len());
        let mut tail = None;
        for (idx, c) in raw.char_indices() {
            match c {
                ' ' | '.' => name.push('_'),
                '[' => {
                    tail = Some(&raw[idx..]);
                    break;
                }
                c => name.push(c),
            }
        }

        if name.is_empty() {
            return None;
        }

        let Some(tail) = tail else {
            return Some(VarName {
                name,
                segments: Vec::new(),
            });
        };

        let bytes = tail.as_bytes();
        let mut segments = Vec::new();
        // the cursor always sits right after a `[`
        let mut cursor = 1;
        loop {
            let start = cursor;
            if bytes.get(cursor).is_some_and(is_php_space) {
                cursor += 1;
            }

            if bytes.get(cursor) == Some(&b']') {
                segments.push(Segment::Next);
            } else if let Some(len) = tail[cursor..].find(']') {
                segments.push(Segment::Key(&tail[cursor..cursor + len]));
                cursor += len;
            } else {
                // unterminated: the `[` turns into `_`. Only when nothing was
                // parsed yet does the remainder join the name
                if segments.is_empty() {
                    name.push('_');
                    name.push_str(&tail[start..]);
                }
                tracing::trace!(key = raw, "unterminated `[` in variable name");
                break;
            }

            // step over `]`
            cursor += 1;
            if bytes.get(cursor) == Some(&b'[') {
                cursor += 1;
            } else {
                break;
            }
        }

        Some(VarName { name, segments })
    }
}

/// `isspace` in the C locale.
fn is_php_space(b: &u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

/// Installs one decoded `key=value` pair into `root`.
pub(crate) fn register(root: &mut QueryMap, key: &str, value: String) {
    let Some(VarName { name, segments }) = VarName::tokenize(key) else {
        tracing::trace!(key, "dropping pair without a variable name");
        return;
    };

    let Some((last, parents)) = segments.split_last() else {
        root.set(name, Value::Text(value));
        return;
    };

    let mut node = root.child(Key::from(name));
    for segment in parents {
        node = match *segment {
            Segment::Key(raw) => node.child(Key::classify(raw)),
            Segment::Next => match node.push_child() {
                Some(child) => child,
                None => return exhausted(key),
            },
        };
    }

    match *last {
        Segment::Key(raw) => {
            node.set(Key::classify(raw), Value::Text(value));
        }
        Segment::Next => {
            if node.set_next(Value::Text(value)).is_none() {
                exhausted(key);
            }
        }
    }
}

fn exhausted(key: &str) {
    tracing::debug!(key, "dropping pair: no free integer index left");
}
