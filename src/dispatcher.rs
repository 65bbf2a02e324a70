//! Command dispatcher.
//!
//! Maps each complete request frame onto one [`Radio`] or pending-table operation
//! and answers it through the [`FrameWriter`]. Payloads are validated before any
//! hardware is touched; a rejected request is answered with an empty
//! [`Reply::Err`](crate::command::Reply::Err) frame.
//!
//! ## Payloads
//!
//! | Request                 | Payload                           | `Ok` reply                  |
//! |-------------------------|-----------------------------------|-----------------------------|
//! | `RadioPrepare`          | packet                            | result (2)                  |
//! | `RadioTransmit`         | length (2)                        | result (2)                  |
//! | `RadioSend`             | packet                            | result (2)                  |
//! | `RadioChannelClear`     | -                                 | result (2)                  |
//! | `RadioOn` / `RadioOff`  | -                                 | result (2)                  |
//! | `RadioGetValue`         | param (2)                         | result (2), value (2)       |
//! | `RadioSetValue`         | param (2), value (2)              | result (2)                  |
//! | `RadioGetObject`        | param (2), length (2)             | result (2), object (length) |
//! | `RadioSetObject`        | param (2), object                 | result (2)                  |
//! | `RadioInitPendingTable` | -                                 | check code (2)              |
//! | `RadioSetPending`       | index (1), address (0, 4 or 8)    | slot code (2)               |
//!
//! Every reply echoes the request id of the frame it answers.

use crate::command::Request;
use crate::consts::OBJECT_SCRATCH_LEN;
use crate::encoding::{decode_be_int, decode_be_u16, decode_be_uint, encode_be_int};
use crate::error::{PendingError, ProtocolError};
use crate::frame::Frame;
use crate::pending::{FilterRegisters, init_pending_table, set_pending};
use crate::radio::{Radio, RadioValue};
use crate::transport::ByteSink;
use crate::writer::FrameWriter;

/// How a frame was answered.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Dispatch {
    /// The request ran and an `Ok` reply was sent.
    Replied,
    /// The request was refused and an `Err` reply was sent.
    Rejected(ProtocolError),
}

/// Reply computed for a request, written once the radio call has returned.
enum Response {
    Int(i32),
    Value { result: i32, value: RadioValue },
    Object { len: usize },
}

fn require(payload: &[u8], required: usize) -> Result<(), ProtocolError> {
    if payload.len() < required {
        return Err(ProtocolError::PayloadTooShort {
            required,
            actual: payload.len(),
        });
    }
    Ok(())
}

fn leading_u16(payload: &[u8]) -> Result<u16, ProtocolError> {
    decode_be_u16(payload).ok_or(ProtocolError::PayloadTooShort {
        required: 2,
        actual: payload.len(),
    })
}

fn pending_code(result: Result<(), PendingError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => err.code(),
    }
}

/// Routes requests to a radio and its filter registers.
#[derive(Debug)]
pub struct Dispatcher<R: Radio, F: FilterRegisters> {
    radio: R,
    registers: F,
    scratch: [u8; OBJECT_SCRATCH_LEN],
}

impl<R: Radio, F: FilterRegisters> Dispatcher<R, F> {
    /// Creates a dispatcher owning the radio and its filter registers.
    pub fn new(radio: R, registers: F) -> Self {
        Self {
            radio,
            registers,
            scratch: [0; OBJECT_SCRATCH_LEN],
        }
    }

    /// Borrows the radio.
    pub fn radio(&self) -> &R {
        &self.radio
    }

    /// Mutably borrows the radio.
    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    /// Borrows the filter registers.
    pub fn registers(&self) -> &F {
        &self.registers
    }

    /// Mutably borrows the filter registers.
    pub fn registers_mut(&mut self) -> &mut F {
        &mut self.registers
    }

    fn execute(&mut self, command_id: u8, payload: &[u8]) -> Result<Response, ProtocolError> {
        let request = Request::try_from(command_id)?;
        let response = match request {
            Request::RadioPrepare => Response::Int(self.radio.prepare(payload)),
            Request::RadioTransmit => {
                let transmit_len = leading_u16(payload)?;
                Response::Int(self.radio.transmit(transmit_len))
            }
            Request::RadioSend => Response::Int(self.radio.send(payload)),
            Request::RadioChannelClear => Response::Int(self.radio.channel_clear()),
            Request::RadioOn => Response::Int(self.radio.on()),
            Request::RadioOff => Response::Int(self.radio.off()),
            Request::RadioGetValue => {
                let param = leading_u16(payload)?;
                let (result, value) = self.radio.get_value(param);
                Response::Value { result, value }
            }
            Request::RadioSetValue => {
                require(payload, 4)?;
                let param = leading_u16(payload)?;
                let value = decode_be_int(&payload[2..4]);
                Response::Int(self.radio.set_value(param, value))
            }
            Request::RadioGetObject => {
                require(payload, 4)?;
                let param = leading_u16(payload)?;
                let len = 2 + decode_be_uint(&payload[2..4]) as usize;
                if len > OBJECT_SCRATCH_LEN {
                    return Err(ProtocolError::ObjectTooLarge {
                        requested: len,
                        capacity: OBJECT_SCRATCH_LEN,
                    });
                }
                let result = self.radio.get_object(param, &mut self.scratch[2..len]);
                encode_be_int(result, &mut self.scratch[..2]);
                Response::Object { len }
            }
            Request::RadioSetObject => {
                let param = leading_u16(payload)?;
                Response::Int(self.radio.set_object(param, &payload[2..]))
            }
            Request::RadioInitPendingTable => {
                Response::Int(pending_code(init_pending_table(&mut self.registers)))
            }
            Request::RadioSetPending => {
                require(payload, 1)?;
                let result = set_pending(&mut self.registers, payload[0], &payload[1..]);
                Response::Int(pending_code(result))
            }
        };
        Ok(response)
    }

    /// Executes `frame` and writes exactly one reply carrying its request id.
    ///
    /// # Errors
    /// Only sink failures; refused requests are reported as [`Dispatch::Rejected`].
    pub fn handle<K: ByteSink>(
        &mut self,
        frame: &Frame<'_>,
        writer: &mut FrameWriter<K>,
    ) -> Result<Dispatch, K::Error> {
        let request_id = frame.request_id;
        debug!(
            "request {}: command {:#x}, {} bytes",
            request_id,
            frame.command_id,
            frame.payload.len()
        );
        match self.execute(frame.command_id, frame.payload) {
            Ok(Response::Int(result)) => writer.send_ok_int(request_id, result)?,
            Ok(Response::Value { result, value }) => {
                let second = if cfg!(feature = "legacy-get-value") {
                    result
                } else {
                    value
                };
                let mut data = [0u8; 4];
                encode_be_int(result, &mut data[..2]);
                encode_be_int(second, &mut data[2..]);
                writer.send_ok(request_id, &data)?
            }
            Ok(Response::Object { len }) => writer.send_ok(request_id, &self.scratch[..len])?,
            Err(err) => {
                warn!("request {} rejected: {:?}", request_id, err);
                writer.send_err(request_id, &[])?;
                return Ok(Dispatch::Rejected(err));
            }
        }
        Ok(Dispatch::Replied)
    }
}
