//! Constants used across the ZPB serial protocol implementation.
//!
//! This module defines the protocol-wide constants used for buffer sizing,
//! header layout, and pending-address table geometry.
//!
//! ## Key Concepts
//!
//! - **Prefix**: Fixed 3-byte magic sequence that opens every frame in both directions.
//! - **Headers**: Command byte, 2-byte request id and 2-byte length, all big-endian.
//! - **Payload Limits**: The wire allows 65535 bytes, the parser only buffers [`MAX_PAYLOAD_LEN`].
//! - **Scratch**: `GetObject` replies are assembled in a fixed [`OBJECT_SCRATCH_LEN`] buffer.
//! - **Pending Table**: 8 extended and 8 short address slots in one shared address table.
//!
//! These values should be used wherever framing or buffer logic is implemented to ensure
//! both ends of the link agree on frame boundaries.

/// Magic prefix opening every frame.
pub const FRAME_PREFIX: [u8; 3] = *b"ZPB";

/// Width (in bytes) of the big-endian request id field.
pub const REQUEST_ID_SIZE: usize = 2;

/// Width (in bytes) of the big-endian payload length field.
pub const LENGTH_SIZE: usize = 2;

/// Length (in bytes) of a frame header: prefix, command, request id and length.
pub const FRAME_HEADER_LEN: usize = FRAME_PREFIX.len() + 1 + REQUEST_ID_SIZE + LENGTH_SIZE;

/// Largest payload length a header can declare.
///
/// Longer payloads saturate to this value when written.
pub const MAX_DECLARED_LEN: usize = u16::MAX as usize;

/// Capacity (in bytes) of the parser's payload buffer.
///
/// Frames declaring a longer payload are dropped without being dispatched.
pub const MAX_PAYLOAD_LEN: usize = 255;

/// Capacity (in bytes) of the `GetObject` scratch buffer, including the 2-byte result code.
pub const OBJECT_SCRATCH_LEN: usize = 64;

/// Request id carried by device-originated event frames.
pub const EVENT_REQUEST_ID: u16 = u16::MAX;

/// Number of bytes the receive ring can buffer between two polls.
///
/// [`heapless::spsc::Queue`] keeps one slot free, so `RX_RING_LEN - 1` bytes fit.
pub const RX_RING_LEN: usize = 128;

/// Number of slots in each of the extended and short pending-address tables.
pub const PENDING_SLOTS: u8 = 8;

/// Length (in bytes) of an extended (EUI-64) address slot.
pub const EXT_ADDR_LEN: usize = 8;

/// Length (in bytes) of a short address slot: PAN id followed by short address.
pub const SHORT_ADDR_LEN: usize = 4;

/// Offset of the first short address slot in the shared address table.
///
/// Extended slots occupy the start of the table.
pub const SHORT_TABLE_OFFSET: usize = PENDING_SLOTS as usize * EXT_ADDR_LEN;

/// Bit of the `SetPending` index byte selecting the extended table.
pub const PENDING_EXT_FLAG: u8 = 0x80;
