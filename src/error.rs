//! Error types.
//!
//! Only transport failures ([`BridgeError`]) escape [`PacketBridge::poll`](crate::bridge::PacketBridge::poll).
//! Everything else is answered on the wire and the bridge carries on with the next frame.

use thiserror::Error;

/// A request the dispatcher refused before calling the radio.
///
/// Answered with an empty [`Reply::Err`](crate::command::Reply::Err) frame.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ProtocolError {
    /// The command id is not a known request.
    #[error("unknown command id {0:#04x}")]
    UnknownCommand(u8),
    /// The payload is shorter than the request's fixed fields.
    #[error("payload of {actual} bytes is shorter than the {required} bytes required")]
    PayloadTooShort {
        /// Minimum payload length for the request.
        required: usize,
        /// Payload length received.
        actual: usize,
    },
    /// A `GetObject` reply would not fit the scratch buffer.
    #[error("object reply of {requested} bytes exceeds the {capacity}-byte scratch buffer")]
    ObjectTooLarge {
        /// Result code plus requested object length.
        requested: usize,
        /// Scratch buffer capacity.
        capacity: usize,
    },
}

/// Host-side frame encoding failures.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum FrameError {
    /// The payload cannot be described by a 16-bit length field.
    #[error("payload of {0} bytes exceeds the 16-bit length field")]
    PayloadTooLong(usize),
    /// The output buffer cannot hold the encoded frame.
    #[error("frame needs {needed} bytes but the buffer holds {available}")]
    BufferTooSmall {
        /// Encoded frame length.
        needed: usize,
        /// Output buffer length.
        available: usize,
    },
}

/// Pending-address table failures, reported to the host as numeric codes.
///
/// Initialization codes identify which filter check failed; slot codes
/// identify which argument was rejected. See [`PendingError::code`].
#[derive(PartialEq, Eq, Clone, Copy, Debug, Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum PendingError {
    /// Frame filtering is disabled (`FRMFILT0` bit 0).
    #[error("frame filtering is disabled")]
    FrameFilterDisabled,
    /// Not every frame type is accepted (`FRMFILT1` mask `0x78`).
    #[error("frame filter does not accept every frame type")]
    FrameTypesRejected,
    /// Source address matching is disabled (`SRCMATCH` bit 0).
    #[error("source address matching is disabled")]
    SourceMatchDisabled,
    /// Automatic pending flag is disabled (`SRCMATCH` bit 1).
    #[error("automatic pending flag is disabled")]
    AutoPendDisabled,
    /// The slot index is 8 or above.
    #[error("pending slot {0} is out of range")]
    SlotOutOfRange(u8),
    /// The address is neither empty nor the table's address length.
    #[error("address of {0} bytes does not fit a pending slot")]
    BadAddressLength(usize),
}

impl PendingError {
    /// Numeric code sent to the host in place of `0` (success).
    pub fn code(self) -> i32 {
        match self {
            PendingError::FrameFilterDisabled => 1,
            PendingError::FrameTypesRejected => 2,
            PendingError::SourceMatchDisabled => 3,
            PendingError::AutoPendDisabled => 4,
            PendingError::SlotOutOfRange(_) => 1,
            PendingError::BadAddressLength(_) => 2,
        }
    }
}

/// Transport failure while polling the bridge.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Error)]
pub enum BridgeError<SE, KE> {
    /// Reading from the byte source failed.
    #[error("byte source failed: {0:?}")]
    Source(SE),
    /// Writing to the byte sink failed.
    #[error("byte sink failed: {0:?}")]
    Sink(KE),
}
