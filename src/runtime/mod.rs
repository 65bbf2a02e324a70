//! Scheduling helpers for the packet bridge.
//!
//! The bridge has no timing of its own; it only needs [`PacketBridge::poll`] to run often
//! enough that the receive ring never overflows. Two approaches are provided: a global
//! bridge shared with interrupt handlers through `critical_section::with` (`bridge-isr`
//! feature), or a blocking poll loop paced by a delay provider (`poll-loop` feature).
//!
//! Contains:
//! - `max_poll_interval_us`: how long the bridge may go unpolled at a given baud rate
//! - `frame_time_us`: how long a reply occupies the link
//! - `poll_once_or_idle` / `run_bridge_loop`: blocking poll loop over `DelayNs` (feature `poll-loop`)
//! - `global_bridge_*` and `init_packet_bridge!()`: interrupt-safe singleton (feature `bridge-isr`)
//!
//! Fill times of the default 128-byte ring:
//!
//! | Baud    | Max poll interval |
//! |---------|-------------------|
//! |    9600 |         132291 µs |
//! |  115200 |          11024 µs |
//! |  460800 |           2756 µs |
//!
//! [`PacketBridge::poll`]: crate::bridge::PacketBridge::poll

use crate::consts::FRAME_HEADER_LEN;

#[cfg(feature = "poll-loop")]
mod delay;
#[cfg(feature = "poll-loop")]
pub use delay::*;

#[cfg(feature = "bridge-isr")]
mod isr;
#[cfg(feature = "bridge-isr")]
pub use isr::*;

#[cfg(feature = "bridge-isr")]
mod macros;

/// UART bits per byte: start, 8 data, stop.
pub const BITS_PER_BYTE: u64 = 10;

/// Longest time, in microseconds, the bridge may go unpolled before a ring of
/// `ring_len` slots overflows at `baud`.
///
/// A `heapless` ring of `ring_len` slots holds `ring_len - 1` bytes. This is the time
/// between polls with interrupts enabled: `global_bridge_poll` keeps them masked while
/// it writes replies, see [`frame_time_us`].
///
/// # Example
/// ```rust
/// use zpb_bridge::consts::RX_RING_LEN;
/// use zpb_bridge::runtime::max_poll_interval_us;
///
/// const POLL_US: u32 = max_poll_interval_us(115_200, RX_RING_LEN);
/// assert_eq!(POLL_US, 11_024);
/// ```
pub const fn max_poll_interval_us(baud: u32, ring_len: usize) -> u32 {
    if baud == 0 || ring_len < 2 {
        return 0;
    }
    let bytes = (ring_len - 1) as u64;
    let us = bytes.saturating_mul(BITS_PER_BYTE * 1_000_000) / baud as u64;
    if us > u32::MAX as u64 {
        u32::MAX
    } else {
        us as u32
    }
}

/// Time, in microseconds, to put a frame with `payload_len` payload bytes on the wire at `baud`.
///
/// The longest reply is a full `GetObject`, 8 header bytes plus
/// [`OBJECT_SCRATCH_LEN`](crate::consts::OBJECT_SCRATCH_LEN).
pub const fn frame_time_us(baud: u32, payload_len: usize) -> u32 {
    if baud == 0 {
        return 0;
    }
    let bytes = FRAME_HEADER_LEN.saturating_add(payload_len) as u64;
    let us = bytes.saturating_mul(BITS_PER_BYTE * 1_000_000) / baud as u64;
    if us > u32::MAX as u64 {
        u32::MAX
    } else {
        us as u32
    }
}
