//! # zpb-bridge
//!
//! A portable, no_std Rust packet bridge that exposes an IEEE 802.15.4 radio transceiver
//! to a host computer over a plain byte-oriented serial link.
//!
//! The host drives the radio with small request frames; the bridge answers every request
//! with a reply frame carrying the same request id, and pushes received radio packets up
//! as unsolicited event frames.
//!
//! This crate implements:
//! - a byte-at-a-time frame parser that resynchronizes on the `ZPB` magic prefix
//! - a command dispatcher that validates payloads before touching the radio
//! - a frame writer that can stream an event from several buffers without allocating
//! - pending-address table configuration through a register access trait
//!
//! ## Crate features
//! | Feature                | Description |
//! |------------------------|-------------|
//! | `std`                  | Disables `#![no_std]` and adds `std::io` transport adapters |
//! | `bridge-isr` (default) | Global bridge singleton guarded by `critical_section::with` |
//! | `poll-loop`            | Blocking poll loop driven by `embedded_hal::delay::DelayNs` |
//! | `legacy-get-value`     | Reproduces the duplicated-result `GetValue` reply layout |
//! | `defmt-0-3`            | Uses `defmt` logging |
//! | `log`                  | Uses `log` logging |
//!
//! ## Wire format
//!
//! ```text
//! offset  size    field
//! 0       3       magic prefix "ZPB"
//! 3       1       command id
//! 4       2       request id (big-endian, 0xFFFF on event frames)
//! 6       2       payload length (big-endian)
//! 8       length  payload
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zpb_bridge::bridge::PacketBridge;
//!
//! let mut bridge = PacketBridge::new(rx_consumer, uart_tx, radio, registers);
//! loop {
//!     bridge.poll()?; // Drain every byte the UART interrupt has queued
//! }
//! ```
//!
//! Or, use `run_bridge_loop()` with a `DelayNs` implementation:
//!
//! ```rust,ignore
//! zpb_bridge::runtime::run_bridge_loop(&mut bridge, &mut delay, 500);
//! ```
//!
//! ## Integration Notes
//!
//! - Requests are handled strictly one at a time: a reply is fully written before the next
//!   frame starts parsing.
//! - Replies and `OnPacket` events share one writer. Route both through the same
//!   [`bridge::PacketBridge`] (or the `bridge-isr` globals) so frames never interleave.
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "bridge-isr")]
pub use critical_section;

pub use heapless;

#[macro_use]
mod fmt;

pub mod bridge;
pub mod command;
pub mod consts;
pub mod dispatcher;
pub mod encoding;
pub mod error;
pub mod frame;
pub mod parser;
pub mod pending;
pub mod radio;
pub mod runtime;
pub mod transport;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_support;
