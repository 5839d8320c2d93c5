//! Strict percent-decoding of request paths.

use percent_encoding::percent_decode_str;
use thiserror::Error;

/// Why an escaped path could not be turned into a logical path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnescapeError {
    #[error("malformed escape sequence at byte {0}")]
    MalformedEscape(usize),

    #[error("decoded path is not valid UTF-8")]
    InvalidUtf8,
}

/// Decode `%XX` sequences in an escaped path.
///
/// Unlike `percent_decode_str` on its own, a `%` that is not followed by two
/// hex digits is an error rather than passed through.
pub fn unescape_path(raw: &str) -> Result<String, UnescapeError> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(UnescapeError::MalformedEscape(i));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| UnescapeError::InvalidUtf8)
}
