//! Length-Prefixed Text Frames
//!
//! The stream transport exchanges one frame per request and per response:
//! a `u16` big-endian byte length followed by that many bytes of UTF-8.
//! This is the classic "write string, read string" framing, so a frame can
//! never exceed [`MAX_FRAME_LEN`] bytes of payload.
//!
//! ## Incremental Decoding
//!
//! TCP is a stream: a read may deliver half a frame or several frames at
//! once. [`decode`] therefore works against an accumulating buffer and
//! returns:
//!
//! - `Ok(Some((text, consumed)))` - a complete frame; advance the buffer by
//!   `consumed` bytes
//! - `Ok(None)` - incomplete, wait for more data
//! - `Err(FrameError)` - the payload is not valid UTF-8; the connection is
//!   beyond recovery

use thiserror::Error;

/// Maximum frame payload in bytes (the length prefix is a `u16`).
pub const MAX_FRAME_LEN: usize = u16::MAX as usize;

/// Size of the length prefix in bytes.
pub const PREFIX_LEN: usize = 2;

/// Errors produced while encoding or decoding frames.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// A frame payload was not valid UTF-8
    #[error("invalid UTF-8 in frame: {0}")]
    InvalidUtf8(String),

    /// An outgoing message exceeds what the length prefix can describe
    #[error("frame too large: {size} bytes (max: {max})")]
    TooLarge { size: usize, max: usize },
}

/// Result type for frame operations.
pub type FrameResult<T> = Result<T, FrameError>;

/// Appends one encoded frame to `buf`.
pub fn encode(text: &str, buf: &mut Vec<u8>) -> FrameResult<()> {
    let payload = text.as_bytes();
    if payload.len() > MAX_FRAME_LEN {
        return Err(FrameError::TooLarge {
            size: payload.len(),
            max: MAX_FRAME_LEN,
        });
    }

    buf.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    buf.extend_from_slice(payload);
    Ok(())
}

/// Attempts to decode one frame from the front of `buf`.
pub fn decode(buf: &[u8]) -> FrameResult<Option<(String, usize)>> {
    if buf.len() < PREFIX_LEN {
        return Ok(None);
    }

    let len = u16::from_be_bytes([buf[0], buf[1]]) as usize;
    let total = PREFIX_LEN + len;
    if buf.len() < total {
        return Ok(None);
    }

    let text = std::str::from_utf8(&buf[PREFIX_LEN..total])
        .map_err(|e| FrameError::InvalidUtf8(e.to_string()))?
        .to_string();
    Ok(Some((text, total)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let mut buf = Vec::new();
        encode("PUT alpha 123", &mut buf).unwrap();

        let (text, consumed) = decode(&buf).unwrap().unwrap();
        assert_eq!(text, "PUT alpha 123");
        assert_eq!(consumed, buf.len());
    }

    #[test]
    fn test_encode_shape() {
        let mut buf = Vec::new();
        encode("KEYS", &mut buf).unwrap();
        assert_eq!(buf, [0, 4, b'K', b'E', b'Y', b'S']);
    }

    #[test]
    fn test_empty_frame() {
        let mut buf = Vec::new();
        encode("", &mut buf).unwrap();
        assert_eq!(buf, [0, 0]);

        let (text, consumed) = decode(&buf).unwrap().unwrap();
        assert_eq!(text, "");
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_incomplete_prefix() {
        assert_eq!(decode(&[]).unwrap(), None);
        assert_eq!(decode(&[0]).unwrap(), None);
    }

    #[test]
    fn test_incomplete_payload() {
        let mut buf = Vec::new();
        encode("GET alpha", &mut buf).unwrap();
        assert_eq!(decode(&buf[..buf.len() - 1]).unwrap(), None);
    }

    #[test]
    fn test_two_frames_in_one_buffer() {
        let mut buf = Vec::new();
        encode("PUT a 1", &mut buf).unwrap();
        encode("GET a", &mut buf).unwrap();

        let (first, consumed) = decode(&buf).unwrap().unwrap();
        assert_eq!(first, "PUT a 1");

        let (second, rest) = decode(&buf[consumed..]).unwrap().unwrap();
        assert_eq!(second, "GET a");
        assert_eq!(consumed + rest, buf.len());
    }

    #[test]
    fn test_invalid_utf8() {
        let buf = [0u8, 2, 0xff, 0xfe];
        assert!(matches!(decode(&buf), Err(FrameError::InvalidUtf8(_))));
    }

    #[test]
    fn test_oversized_message() {
        let big = "x".repeat(MAX_FRAME_LEN + 1);
        let mut buf = Vec::new();
        assert!(matches!(
            encode(&big, &mut buf),
            Err(FrameError::TooLarge { .. })
        ));
    }
}
