//! UTF-8 helpers for the input boundary.
//!
//! Everything that enters a [`Line`](crate::line::Line) goes through
//! [`decode_one`] first, so a line never holds a partial codepoint and its
//! character count can never drift from its byte content.

use crate::error::{FrameError, Result};

/// Expected byte length of a UTF-8 sequence from its lead byte.
/// Returns 0 for bytes that cannot start a sequence (continuation bytes,
/// overlong leads 0xC0/0xC1, and 0xF5..=0xFF).
#[must_use]
pub const fn sequence_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

/// `true` for bytes of the form `10xxxxxx`.
#[inline]
#[must_use]
pub const fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Decode a byte sequence that must hold exactly one codepoint.
///
/// # Errors
///
/// - [`FrameError::InvalidUtf8`] if the bytes are not valid UTF-8.
/// - [`FrameError::NotOneCodepoint`] if they decode to zero or more than one
///   codepoint.
pub fn decode_one(bytes: &[u8]) -> Result<char> {
    let text = std::str::from_utf8(bytes).map_err(|e| FrameError::InvalidUtf8 {
        offset: e.valid_up_to(),
    })?;
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(FrameError::NotOneCodepoint { len: bytes.len() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_len_by_lead_byte() {
        assert_eq!(sequence_len(b'a'), 1);
        assert_eq!(sequence_len(0xC3), 2); // é
        assert_eq!(sequence_len(0xE4), 3); // 中
        assert_eq!(sequence_len(0xF0), 4); // 😀
        assert_eq!(sequence_len(0x80), 0);
        assert_eq!(sequence_len(0xC0), 0);
        assert_eq!(sequence_len(0xFF), 0);
    }

    #[test]
    fn continuation_bytes() {
        let bytes = "中".as_bytes();
        assert!(!is_continuation(bytes[0]));
        assert!(is_continuation(bytes[1]));
        assert!(is_continuation(bytes[2]));
        assert!(!is_continuation(b'a'));
    }

    #[test]
    fn decode_one_accepts_every_width() {
        for ch in ['a', 'é', '中', '😀'] {
            let mut buf = [0; 4];
            assert_eq!(decode_one(ch.encode_utf8(&mut buf).as_bytes()).unwrap(), ch);
        }
    }

    #[test]
    fn decode_one_rejects_truncated_sequence() {
        let bytes = &"中".as_bytes()[..2];
        assert!(matches!(
            decode_one(bytes),
            Err(FrameError::InvalidUtf8 { offset: 0 })
        ));
    }

    #[test]
    fn decode_one_rejects_lone_continuation() {
        assert!(matches!(
            decode_one(&[0x80]),
            Err(FrameError::InvalidUtf8 { .. })
        ));
    }

    #[test]
    fn decode_one_rejects_empty_and_multiple() {
        assert!(matches!(
            decode_one(b""),
            Err(FrameError::NotOneCodepoint { len: 0 })
        ));
        assert!(matches!(
            decode_one(b"ab"),
            Err(FrameError::NotOneCodepoint { len: 2 })
        ));
    }
}
