//! Filesystem reader with an explicit decoding cascade
//!
//! Decoding never fails: strict UTF-8 first, then the configured fallback
//! codec, then lossy UTF-8 replacement. Missing files and permission errors
//! do surface as `TriageError::Io`; callers degrade those per file instead
//! of aborting the batch.

use std::fs;
use std::path::Path;

use crate::config::FallbackEncoding;
use crate::error::Result;

/// Read a file and decode it through the cascade.
pub fn read_text(path: &Path, fallback: FallbackEncoding) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(decode(bytes, fallback))
}

/// Decode bytes: strict UTF-8, then the fallback codec, then lossy.
pub fn decode(bytes: Vec<u8>, fallback: FallbackEncoding) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            let bytes = err.into_bytes();
            match fallback {
                FallbackEncoding::Latin1 => decode_latin1(&bytes),
                FallbackEncoding::None => String::from_utf8_lossy(&bytes).into_owned(),
            }
        }
    }
}

/// ISO-8859-1: each byte is the code point of the same value, so this
/// decode is total and the cascade never reaches the lossy step for it.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_utf8_passthrough() {
        let text = decode("héllo wörld".as_bytes().to_vec(), FallbackEncoding::Latin1);
        assert_eq!(text, "héllo wörld");
    }

    #[test]
    fn test_latin1_fallback() {
        // 0xE9 is 'é' in ISO-8859-1 but invalid as a lone UTF-8 byte
        let bytes = vec![b'c', b'a', b'f', 0xE9];
        assert_eq!(decode(bytes, FallbackEncoding::Latin1), "café");
    }

    #[test]
    fn test_lossy_fallback() {
        let bytes = vec![b'o', b'k', 0xFF, 0xFE];
        let text = decode(bytes, FallbackEncoding::None);
        assert!(text.starts_with("ok"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_text(
            Path::new("/definitely/not/here.md"),
            FallbackEncoding::Latin1,
        )
        .unwrap_err();
        assert!(matches!(err, crate::error::TriageError::Io(_)));
    }
}
