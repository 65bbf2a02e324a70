//! Outbound frame writer.
//!
//! The [`FrameWriter`] owns the byte sink and emits frames in two ways:
//!
//! - **One-shot**: [`send_frame`](FrameWriter::send_frame) writes header, payload and flush.
//! - **Streaming**: [`send_header`](FrameWriter::send_header) declares a total length,
//!   [`send_data`](FrameWriter::send_data) writes chunks against that budget, and
//!   [`send_flush`](FrameWriter::send_flush) zero-pads whatever was not written.
//!
//! Streaming lets an `OnPacket` event carry the radio's packet buffer and the
//! RSSI/link-quality postfix without copying them into one buffer.
//!
//! ## Length accounting
//!
//! The declared length saturates at 65535 and the data budget is set to the
//! *declared* length, so the bytes following a header always match its length
//! field: excess data is dropped and a shortfall is padded.

use nb::block;

use crate::command::Reply;
use crate::consts::{EVENT_REQUEST_ID, FRAME_PREFIX, MAX_DECLARED_LEN};
use crate::encoding::encode_be_int;
use crate::transport::ByteSink;

/// Frame emitter over a [`ByteSink`].
///
/// A writer must not be shared between two concurrent senders: a frame is
/// only well-formed if its header, data and flush are not interleaved with
/// another frame's. The bridge keeps a single writer for both replies and events.
#[derive(Debug)]
pub struct FrameWriter<K: ByteSink> {
    sink: K,
    remaining: usize,
}

impl<K: ByteSink> FrameWriter<K> {
    /// Creates a writer with no frame in progress.
    pub fn new(sink: K) -> Self {
        Self { sink, remaining: 0 }
    }

    /// Borrows the sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Mutably borrows the sink.
    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    /// Returns the sink.
    pub fn into_sink(self) -> K {
        self.sink
    }

    /// Bytes still owed to the frame currently being streamed.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), K::Error> {
        block!(self.sink.write(byte))
    }

    fn pad(&mut self) -> Result<(), K::Error> {
        while self.remaining > 0 {
            self.write_byte(0)?;
            self.remaining -= 1;
        }
        Ok(())
    }

    /// Starts a frame declaring `data_len` payload bytes.
    ///
    /// Lengths above 65535 are declared as 65535. If the previous streamed
    /// frame is still short, it is zero-padded first so the link stays framed.
    pub fn send_header(
        &mut self,
        command: u8,
        request_id: u16,
        data_len: usize,
    ) -> Result<(), K::Error> {
        if self.remaining > 0 {
            warn!("previous frame short by {} bytes, padding", self.remaining);
            self.pad()?;
        }
        let declared = if data_len > MAX_DECLARED_LEN {
            warn!("frame length {} saturated to {}", data_len, MAX_DECLARED_LEN);
            MAX_DECLARED_LEN
        } else {
            data_len
        };

        for byte in FRAME_PREFIX {
            self.write_byte(byte)?;
        }
        self.write_byte(command)?;
        for byte in request_id.to_be_bytes() {
            self.write_byte(byte)?;
        }
        for byte in (declared as u16).to_be_bytes() {
            self.write_byte(byte)?;
        }
        self.remaining = declared;
        Ok(())
    }

    /// Writes as much of `data` as the declared length still allows.
    ///
    /// # Returns
    /// The number of bytes written; bytes past the budget are dropped.
    pub fn send_data(&mut self, data: &[u8]) -> Result<usize, K::Error> {
        let len = data.len().min(self.remaining);
        for &byte in &data[..len] {
            self.write_byte(byte)?;
        }
        self.remaining -= len;
        Ok(len)
    }

    /// Zero-pads the current frame to its declared length and flushes the sink.
    pub fn send_flush(&mut self) -> Result<(), K::Error> {
        self.pad()?;
        block!(self.sink.flush())
    }

    /// Writes a complete frame.
    pub fn send_frame(&mut self, command: u8, request_id: u16, data: &[u8]) -> Result<(), K::Error> {
        self.send_header(command, request_id, data.len())?;
        let _ = self.send_data(data)?;
        self.send_flush()
    }

    /// Replies [`Reply::Ok`] with `data`.
    pub fn send_ok(&mut self, request_id: u16, data: &[u8]) -> Result<(), K::Error> {
        self.send_frame(Reply::Ok.into(), request_id, data)
    }

    /// Replies [`Reply::Ok`] with `value` as a 2-byte big-endian signed integer.
    pub fn send_ok_int(&mut self, request_id: u16, value: i32) -> Result<(), K::Error> {
        let mut data = [0u8; 2];
        encode_be_int(value, &mut data);
        self.send_ok(request_id, &data)
    }

    /// Replies [`Reply::Err`] with `data`.
    pub fn send_err(&mut self, request_id: u16, data: &[u8]) -> Result<(), K::Error> {
        self.send_frame(Reply::Err.into(), request_id, data)
    }

    /// Replies [`Reply::Err`] with `value` as a 2-byte big-endian signed integer.
    pub fn send_err_int(&mut self, request_id: u16, value: i32) -> Result<(), K::Error> {
        let mut data = [0u8; 2];
        encode_be_int(value, &mut data);
        self.send_err(request_id, &data)
    }

    /// Emits an unsolicited [`Reply::OnPacket`] event.
    ///
    /// Payload: the packet bytes followed by `rssi` and `link_quality`.
    pub fn send_event_on_packet(
        &mut self,
        packet: &[u8],
        rssi: u8,
        link_quality: u8,
    ) -> Result<(), K::Error> {
        let postfix = [rssi, link_quality];
        self.send_header(
            Reply::OnPacket.into(),
            EVENT_REQUEST_ID,
            packet.len() + postfix.len(),
        )?;
        let _ = self.send_data(packet)?;
        let _ = self.send_data(&postfix)?;
        self.send_flush()
    }
}
