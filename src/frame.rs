//! The frame: one complete protocol message.
//!
//! A [`Frame`] borrows its payload, either from the parser's buffer on the
//! device side or from the caller when a host encodes a request.

use crate::consts::{FRAME_HEADER_LEN, FRAME_PREFIX, MAX_DECLARED_LEN};
use crate::error::FrameError;

/// A parsed or to-be-encoded frame.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Frame<'a> {
    /// Raw command id. Requests are decoded with [`Request::try_from`](crate::command::Request).
    pub command_id: u8,
    /// Correlation token echoed by the reply.
    pub request_id: u16,
    /// Command-specific body.
    pub payload: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Creates a frame borrowing `payload`.
    pub fn new(command_id: u8, request_id: u16, payload: &'a [u8]) -> Self {
        Self {
            command_id,
            request_id,
            payload,
        }
    }

    /// Number of bytes [`encode`](Frame::encode) writes.
    pub fn encoded_len(&self) -> usize {
        FRAME_HEADER_LEN + self.payload.len()
    }

    /// Encodes the frame into `out`, as the host does when issuing a request.
    ///
    /// # Returns
    /// The number of bytes written.
    ///
    /// # Errors
    /// - [`FrameError::PayloadTooLong`] if the payload exceeds the 16-bit length field
    /// - [`FrameError::BufferTooSmall`] if `out` cannot hold the frame
    pub fn encode(&self, out: &mut [u8]) -> Result<usize, FrameError> {
        let len = self.payload.len();
        if len > MAX_DECLARED_LEN {
            return Err(FrameError::PayloadTooLong(len));
        }
        let needed = self.encoded_len();
        if out.len() < needed {
            return Err(FrameError::BufferTooSmall {
                needed,
                available: out.len(),
            });
        }
        let prefix_len = FRAME_PREFIX.len();
        out[..prefix_len].copy_from_slice(&FRAME_PREFIX);
        out[prefix_len] = self.command_id;
        out[prefix_len + 1..prefix_len + 3].copy_from_slice(&self.request_id.to_be_bytes());
        out[prefix_len + 3..FRAME_HEADER_LEN].copy_from_slice(&(len as u16).to_be_bytes());
        out[FRAME_HEADER_LEN..needed].copy_from_slice(self.payload);
        Ok(needed)
    }
}
