use std::borrow::Cow;

#[inline(always)]
fn char_to_digit(c: &u8) -> Option<u8> {
    char::from(*c).to_digit(16).map(|d| d as u8)
}

/// Decodes one urlencoded token the way PHP's `urldecode` does:
/// - Replaces `+` with a space
/// - Decodes `%XY` when both `X` and `Y` are hex digits
/// - Leaves any other `%` untouched, and resumes scanning right after it
/// - Replaces each run of invalid UTF-8 in the result with U+FFFD
///
/// This never fails. Inputs without `+` or `%` are returned borrowed.
pub fn decode(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    if !bytes.iter().any(|&b| b == b'+' || b == b'%') {
        return Cow::Borrowed(input);
    }

    let mut decoded = Vec::with_capacity(bytes.len());
    let mut last_segment = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        match bytes[idx] {
            b'+' => {
                decoded.extend_from_slice(&bytes[last_segment..idx]);
                decoded.push(b' ');
                idx += 1;
                last_segment = idx;
            }
            b'%' => {
                // peek rather than consume: in `%a%41` the second escape
                // must still be seen
                let hi = bytes.get(idx + 1).and_then(char_to_digit);
                let lo = bytes.get(idx + 2).and_then(char_to_digit);
                if let (Some(h), Some(l)) = (hi, lo) {
                    decoded.extend_from_slice(&bytes[last_segment..idx]);
                    decoded.push(h * 0x10 + l);
                    idx += 3;
                    last_segment = idx;
                } else {
                    idx += 1;
                }
            }
            _ => idx += 1,
        }
    }

    decoded.extend_from_slice(&bytes[last_segment..]);
    match String::from_utf8(decoded) {
        Ok(s) => Cow::Owned(s),
        Err(e) => Cow::Owned(to_valid_utf8(e.as_bytes())),
    }
}

fn to_valid_utf8(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut in_invalid_run = false;
    for chunk in bytes.utf8_chunks() {
        let valid = chunk.valid();
        if !valid.is_empty() {
            out.push_str(valid);
            in_invalid_run = false;
        }
        if !chunk.invalid().is_empty() {
            if !in_invalid_run {
                out.push(char::REPLACEMENT_CHARACTER);
            }
            in_invalid_run = true;
        }
    }
    out
}
