//! Byte-at-a-time frame parser.
//!
//! This module implements the receive side of the serial protocol: a small state machine
//! that is fed one byte at a time, reassembles frames, and yields each complete frame
//! exactly once. It never blocks; when the source runs dry the parser simply keeps its
//! state until the next byte arrives.
//!
//! ## States
//!
//! ```text
//! WaitingForPrefix --"ZPB"--> WaitingForCommand --1--> WaitingForRequestId --2-->
//! WaitingForLength --2--> WaitingForData --length--> (frame) --> WaitingForPrefix
//! ```
//!
//! - A prefix mismatch restarts the prefix from scratch. The mismatching byte is not
//!   reconsidered as the first prefix byte.
//! - A declared length above the buffer capacity drops the frame silently.
//! - A declared length of zero yields the frame right after the length field.

use heapless::Vec;

use crate::consts::{FRAME_PREFIX, LENGTH_SIZE, MAX_PAYLOAD_LEN, REQUEST_ID_SIZE};
use crate::frame::Frame;

/// Parser phase, carrying only the fields accumulated so far.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
enum ParserState {
    WaitingForPrefix {
        matched: usize,
    },
    WaitingForCommand,
    WaitingForRequestId {
        command_id: u8,
        request_id: u16,
        received: usize,
    },
    WaitingForLength {
        command_id: u8,
        request_id: u16,
        length: usize,
        received: usize,
    },
    WaitingForData {
        command_id: u8,
        request_id: u16,
        length: usize,
    },
}

impl ParserState {
    const IDLE: ParserState = ParserState::WaitingForPrefix { matched: 0 };
}

/// Reassembles frames from a byte stream into a fixed-capacity buffer.
///
/// `N` is the largest payload accepted; longer frames are counted in
/// [`oversized`](FrameParser::oversized) and discarded.
///
/// ## Example
///
/// ```rust
/// use zpb_bridge::parser::FrameParser;
///
/// let mut parser: FrameParser = FrameParser::new();
/// let frames = parser.feed(b"ZPB\x04\x00\x07\x00\x00", |frame| {
///     assert_eq!(frame.command_id, 0x04);
///     assert_eq!(frame.request_id, 7);
///     assert!(frame.payload.is_empty());
/// });
/// assert_eq!(frames, 1);
/// ```
#[derive(Debug)]
pub struct FrameParser<const N: usize = MAX_PAYLOAD_LEN> {
    state: ParserState,
    data: Vec<u8, N>,
    /// Number of frames dropped because their declared length exceeded `N`.
    pub oversized: u16,
}

impl<const N: usize> FrameParser<N> {
    /// Creates a parser waiting for the first prefix byte.
    pub fn new() -> Self {
        Self {
            state: ParserState::IDLE,
            data: Vec::new(),
            oversized: 0,
        }
    }

    /// Payload capacity of this parser.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns `true` when no partial frame is held, i.e. the next byte must
    /// be the first prefix byte.
    pub fn is_idle(&self) -> bool {
        self.state == ParserState::IDLE
    }

    /// Drops any partial frame and waits for a new prefix.
    pub fn reset(&mut self) {
        self.state = ParserState::IDLE;
    }

    /// Advances the state machine by one byte.
    ///
    /// # Returns
    /// - `Some(frame)`: `byte` completed a frame; the payload borrows the parser's buffer
    /// - `None`: more bytes are needed (or a frame was just dropped)
    pub fn push_byte(&mut self, byte: u8) -> Option<Frame<'_>> {
        match self.state {
            ParserState::WaitingForPrefix { matched } => {
                if FRAME_PREFIX[matched] != byte {
                    if matched > 0 {
                        trace!("prefix broken after {} bytes, resyncing", matched);
                    }
                    self.reset();
                } else if matched + 1 == FRAME_PREFIX.len() {
                    self.state = ParserState::WaitingForCommand;
                } else {
                    self.state = ParserState::WaitingForPrefix {
                        matched: matched + 1,
                    };
                }
                None
            }
            ParserState::WaitingForCommand => {
                self.state = ParserState::WaitingForRequestId {
                    command_id: byte,
                    request_id: 0,
                    received: 0,
                };
                None
            }
            ParserState::WaitingForRequestId {
                command_id,
                request_id,
                received,
            } => {
                let request_id = (request_id << 8) | u16::from(byte);
                self.state = if received + 1 >= REQUEST_ID_SIZE {
                    ParserState::WaitingForLength {
                        command_id,
                        request_id,
                        length: 0,
                        received: 0,
                    }
                } else {
                    ParserState::WaitingForRequestId {
                        command_id,
                        request_id,
                        received: received + 1,
                    }
                };
                None
            }
            ParserState::WaitingForLength {
                command_id,
                request_id,
                length,
                received,
            } => {
                let length = (length << 8) | usize::from(byte);
                if received + 1 < LENGTH_SIZE {
                    self.state = ParserState::WaitingForLength {
                        command_id,
                        request_id,
                        length,
                        received: received + 1,
                    };
                    return None;
                }
                if length > N {
                    warn!(
                        "dropping frame {}: {} bytes exceed the {}-byte buffer",
                        request_id, length, N
                    );
                    self.oversized = self.oversized.saturating_add(1);
                    self.reset();
                    return None;
                }
                self.data.clear();
                if length == 0 {
                    self.reset();
                    return Some(Frame::new(command_id, request_id, &self.data));
                }
                self.state = ParserState::WaitingForData {
                    command_id,
                    request_id,
                    length,
                };
                None
            }
            ParserState::WaitingForData {
                command_id,
                request_id,
                length,
            } => {
                if self.data.push(byte).is_err() {
                    // Unreachable while `length <= N`; treat it as a drop.
                    self.reset();
                    return None;
                }
                if self.data.len() < length {
                    return None;
                }
                self.reset();
                Some(Frame::new(command_id, request_id, &self.data))
            }
        }
    }

    /// Feeds every byte of `bytes`, calling `on_frame` for each completed frame.
    ///
    /// # Returns
    /// The number of frames completed.
    pub fn feed<F>(&mut self, bytes: &[u8], mut on_frame: F) -> usize
    where
        F: FnMut(Frame<'_>),
    {
        let mut frames = 0;
        for &byte in bytes {
            if let Some(frame) = self.push_byte(byte) {
                frames += 1;
                on_frame(frame);
            }
        }
        frames
    }
}

impl<const N: usize> Default for FrameParser<N> {
    fn default() -> Self {
        Self::new()
    }
}
