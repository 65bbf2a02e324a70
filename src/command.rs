//! Command catalog.
//!
//! Command ids split the byte range into three disjoint groups so a frame's
//! direction is visible on the wire:
//!
//! | Range         | Direction              | Type        |
//! |---------------|------------------------|-------------|
//! | `0x00..0x80`  | host -> device request | [`Request`] |
//! | `0x80..0xC0`  | device -> host reply   | [`Reply`]   |
//! | `0xC0..=0xFF` | device -> host event   | [`Reply`]   |

use crate::error::ProtocolError;

/// Requests sent from the host, each answered with exactly one reply frame.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[repr(u8)]
pub enum Request {
    /// Load a packet into the radio's transmit buffer.
    RadioPrepare = 0x00,
    /// Transmit the prepared packet.
    RadioTransmit = 0x01,
    /// Prepare and transmit in one step.
    RadioSend = 0x02,
    /// Run a clear channel assessment.
    RadioChannelClear = 0x03,
    /// Turn the radio on.
    RadioOn = 0x04,
    /// Turn the radio off.
    RadioOff = 0x05,
    /// Read a radio parameter.
    RadioGetValue = 0x06,
    /// Write a radio parameter.
    RadioSetValue = 0x07,
    /// Read a radio object (e.g. the extended address).
    RadioGetObject = 0x08,
    /// Write a radio object.
    RadioSetObject = 0x09,
    /// Enable source matching and clear every pending-address slot.
    RadioInitPendingTable = 0x0A,
    /// Enable, replace or disable one pending-address slot.
    RadioSetPending = 0x0B,
}

impl TryFrom<u8> for Request {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0x00 => Request::RadioPrepare,
            0x01 => Request::RadioTransmit,
            0x02 => Request::RadioSend,
            0x03 => Request::RadioChannelClear,
            0x04 => Request::RadioOn,
            0x05 => Request::RadioOff,
            0x06 => Request::RadioGetValue,
            0x07 => Request::RadioSetValue,
            0x08 => Request::RadioGetObject,
            0x09 => Request::RadioSetObject,
            0x0A => Request::RadioInitPendingTable,
            0x0B => Request::RadioSetPending,
            other => return Err(ProtocolError::UnknownCommand(other)),
        })
    }
}

impl From<Request> for u8 {
    fn from(request: Request) -> Self {
        request as u8
    }
}

/// Frames sent from the device.
///
/// `Ok` may still carry a non-zero radio result code; `Err` means the request
/// itself was rejected and the radio was never touched.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[repr(u8)]
pub enum Reply {
    /// The request was executed.
    Ok = 0x80,
    /// The request was malformed or unknown.
    Err = 0x81,
    /// Unsolicited event: the radio received a packet.
    OnPacket = 0xC0,
}

impl Reply {
    /// Returns `true` for device-originated frames not tied to a request.
    pub fn is_event(self) -> bool {
        u8::from(self) >= 0xC0
    }
}

impl TryFrom<u8> for Reply {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x80 => Ok(Reply::Ok),
            0x81 => Ok(Reply::Err),
            0xC0 => Ok(Reply::OnPacket),
            other => Err(ProtocolError::UnknownCommand(other)),
        }
    }
}

impl From<Reply> for u8 {
    fn from(reply: Reply) -> Self {
        reply as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_codes_are_contiguous_from_zero() {
        for code in 0x00..=0x0Bu8 {
            let request = Request::try_from(code).unwrap();
            assert_eq!(u8::from(request), code);
        }
        assert_eq!(
            Request::try_from(0x0C),
            Err(ProtocolError::UnknownCommand(0x0C))
        );
    }

    #[test]
    fn test_reply_codes_are_disjoint_from_requests() {
        assert!(Request::try_from(u8::from(Reply::Ok)).is_err());
        assert!(Request::try_from(u8::from(Reply::Err)).is_err());
        assert!(Request::try_from(u8::from(Reply::OnPacket)).is_err());
        assert_eq!(Reply::try_from(0x81), Ok(Reply::Err));
        assert!(Reply::try_from(0x05).is_err());
    }

    #[test]
    fn test_only_on_packet_is_an_event() {
        assert!(!Reply::Ok.is_event());
        assert!(!Reply::Err.is_event());
        assert!(Reply::OnPacket.is_event());
    }
}
