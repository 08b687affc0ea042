//! Turning captured ffmpeg output bytes into text safe to pattern-match.

/// Decodes captured diagnostic output into a `String`.
///
/// ffmpeg writes its banner and stream descriptions in whatever encoding the
/// container metadata happens to use; tags from old AVI/MP3 files are often
/// ISO-8859-1. Running the parsing regexes over invalid UTF-8 is not an
/// option, so the whole buffer is validated once up front and, when
/// validation fails, reinterpreted byte-for-byte as ISO-8859-1 (every byte
/// maps to the code point of the same value). Valid UTF-8 passes through
/// untouched.
pub fn decode_output(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            log::debug!("ffmpeg output is not valid UTF-8, falling back to ISO-8859-1");
            err.into_bytes().iter().map(|&b| b as char).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_utf8_passes_through() {
        let input = "Duration: 00:01:00.0, bitrate: 128 kb/s\n".as_bytes().to_vec();
        assert_eq!(decode_output(input), "Duration: 00:01:00.0, bitrate: 128 kb/s\n");
    }

    #[test]
    fn test_multibyte_utf8_is_preserved() {
        let input = "title           : caf\u{e9}\n".as_bytes().to_vec();
        assert_eq!(decode_output(input), "title           : caf\u{e9}\n");
    }

    #[test]
    fn test_invalid_utf8_reinterpreted_as_latin1() {
        // 0xE9 is 'é' in ISO-8859-1 but an invalid UTF-8 start byte here.
        let input = b"title: caf\xe9\n".to_vec();
        assert_eq!(decode_output(input), "title: caf\u{e9}\n");
    }

    #[test]
    fn test_latin1_fallback_keeps_ascii_intact() {
        let input = b"Stream #0.0: Video: h264\xff\n".to_vec();
        let decoded = decode_output(input);
        assert!(decoded.starts_with("Stream #0.0: Video: h264"));
        assert!(decoded.contains('\u{ff}'));
    }
}
