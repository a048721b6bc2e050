//! Length-prefixed framing for JSON packets.
//!
//! Wire format: the payload length in bytes as ASCII decimal digits, a `#`
//! delimiter, then exactly that many payload bytes.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io;
use thiserror::Error;
use tokio_util::codec::{Decoder, Encoder};

/// Maximum frame payload in bytes (16 MB).
pub const DEFAULT_MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// `usize::MAX` has 20 decimal digits.
const MAX_LENGTH_DIGITS: usize = 20;

const DELIMITER: u8 = b'#';

/// Framing errors. Any of them ends the connection.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The underlying socket failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The length prefix is empty, too long, or not decimal.
    #[error("invalid frame length prefix")]
    InvalidLength,

    /// The frame exceeds the configured size limit.
    #[error("frame of {len} bytes exceeds the {max} byte limit")]
    TooLarge {
        /// Announced or actual payload length.
        len: usize,
        /// Configured limit.
        max: usize,
    },
}

/// Codec splitting a byte stream into `<length>#<payload>` frames.
#[derive(Debug, Clone)]
pub struct FrameCodec {
    max_frame_size: usize,
    pending_len: Option<usize>,
}

impl FrameCodec {
    /// Creates a codec with the default size limit.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_max_frame_size(DEFAULT_MAX_FRAME_SIZE)
    }

    /// Creates a codec rejecting payloads above `max_frame_size` bytes.
    #[must_use]
    pub const fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self {
            max_frame_size,
            pending_len: None,
        }
    }

    fn read_prefix(&self, src: &mut BytesMut) -> Result<Option<usize>, FrameError> {
        let Some(delimiter_pos) = src
            .iter()
            .take(MAX_LENGTH_DIGITS + 1)
            .position(|&b| b == DELIMITER)
        else {
            if src.len() > MAX_LENGTH_DIGITS || !src.iter().all(u8::is_ascii_digit) {
                return Err(FrameError::InvalidLength);
            }
            return Ok(None);
        };

        let prefix = src.split_to(delimiter_pos);
        src.advance(1);
        let len = parse_length(&prefix)?;
        if len > self.max_frame_size {
            return Err(FrameError::TooLarge {
                len,
                max: self.max_frame_size,
            });
        }
        Ok(Some(len))
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for FrameCodec {
    type Item = Bytes;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let len = match self.pending_len {
            Some(len) => len,
            None => match self.read_prefix(src)? {
                Some(len) => {
                    self.pending_len = Some(len);
                    len
                }
                None => return Ok(None),
            },
        };

        // Wait for the complete payload
        if src.len() < len {
            src.reserve(len - src.len());
            return Ok(None);
        }

        self.pending_len = None;
        Ok(Some(src.split_to(len).freeze()))
    }
}

impl Encoder<Bytes> for FrameCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if item.len() > self.max_frame_size {
            return Err(FrameError::TooLarge {
                len: item.len(),
                max: self.max_frame_size,
            });
        }

        let prefix = item.len().to_string();
        dst.reserve(prefix.len() + 1 + item.len());
        dst.put_slice(prefix.as_bytes());
        dst.put_u8(DELIMITER);
        dst.put_slice(&item);
        Ok(())
    }
}

fn parse_length(prefix: &[u8]) -> Result<usize, FrameError> {
    if prefix.is_empty() || !prefix.iter().all(u8::is_ascii_digit) {
        return Err(FrameError::InvalidLength);
    }
    std::str::from_utf8(prefix)
        .ok()
        .and_then(|digits| digits.parse().ok())
        .ok_or(FrameError::InvalidLength)
}
