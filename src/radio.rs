//! Radio capability consumed by the dispatcher.
//!
//! The bridge does not drive the transceiver itself; it forwards each request to a
//! [`Radio`] implementation and reports the returned code verbatim. Codes follow the
//! usual 802.15.4 driver conventions listed below, but any `i32` is passed through.

/// Radio parameter identifier (channel, TX power, PAN id, ...).
pub type RadioParam = u16;

/// Radio parameter value.
pub type RadioValue = i32;

/// Transmission succeeded.
pub const RADIO_TX_OK: i32 = 0;
/// Transmission failed.
pub const RADIO_TX_ERR: i32 = 1;
/// The channel was busy.
pub const RADIO_TX_COLLISION: i32 = 2;
/// No acknowledgement was received.
pub const RADIO_TX_NOACK: i32 = 3;

/// Parameter access succeeded.
pub const RADIO_RESULT_OK: i32 = 0;
/// The parameter is not supported by this radio.
pub const RADIO_RESULT_NOT_SUPPORTED: i32 = 1;
/// The value is out of range for the parameter.
pub const RADIO_RESULT_INVALID_VALUE: i32 = 2;
/// Parameter access failed.
pub const RADIO_RESULT_ERROR: i32 = 3;

/// Operations the host may invoke on the transceiver.
///
/// Every method returns the driver's native result code, which the bridge
/// forwards to the host without interpretation.
pub trait Radio {
    /// Copies `payload` into the transmit buffer.
    fn prepare(&mut self, payload: &[u8]) -> i32;

    /// Sends `transmit_len` bytes of the prepared packet.
    fn transmit(&mut self, transmit_len: u16) -> i32;

    /// Prepares and transmits `payload`.
    fn send(&mut self, payload: &[u8]) -> i32;

    /// Performs a clear channel assessment; non-zero means the channel is clear.
    fn channel_clear(&mut self) -> i32;

    /// Turns the transceiver on.
    fn on(&mut self) -> i32;

    /// Turns the transceiver off.
    fn off(&mut self) -> i32;

    /// Reads a parameter.
    ///
    /// # Returns
    /// The result code and the value read (meaningful only on success).
    fn get_value(&mut self, param: RadioParam) -> (i32, RadioValue);

    /// Writes a parameter.
    fn set_value(&mut self, param: RadioParam, value: RadioValue) -> i32;

    /// Reads an object into `dest`, whose length is the expected object size.
    fn get_object(&mut self, param: RadioParam, dest: &mut [u8]) -> i32;

    /// Writes an object.
    fn set_object(&mut self, param: RadioParam, src: &[u8]) -> i32;
}

impl<R: Radio + ?Sized> Radio for &mut R {
    fn prepare(&mut self, payload: &[u8]) -> i32 {
        (**self).prepare(payload)
    }

    fn transmit(&mut self, transmit_len: u16) -> i32 {
        (**self).transmit(transmit_len)
    }

    fn send(&mut self, payload: &[u8]) -> i32 {
        (**self).send(payload)
    }

    fn channel_clear(&mut self) -> i32 {
        (**self).channel_clear()
    }

    fn on(&mut self) -> i32 {
        (**self).on()
    }

    fn off(&mut self) -> i32 {
        (**self).off()
    }

    fn get_value(&mut self, param: RadioParam) -> (i32, RadioValue) {
        (**self).get_value(param)
    }

    fn set_value(&mut self, param: RadioParam, value: RadioValue) -> i32 {
        (**self).set_value(param, value)
    }

    fn get_object(&mut self, param: RadioParam, dest: &mut [u8]) -> i32 {
        (**self).get_object(param, dest)
    }

    fn set_object(&mut self, param: RadioParam, src: &[u8]) -> i32 {
        (**self).set_object(param, src)
    }
}
