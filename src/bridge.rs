//! Serial-to-radio packet bridge.
//!
//! [`PacketBridge`] ties the pieces together: bytes pulled from a [`ByteSource`] are fed to
//! the [`FrameParser`], each complete frame is handed to the [`Dispatcher`], and every reply
//! and radio event goes out through one shared [`FrameWriter`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use zpb_bridge::bridge::PacketBridge;
//! use zpb_bridge::transport::RxQueue;
//!
//! static mut RX: RxQueue = RxQueue::new();
//!
//! let (producer, consumer) = unsafe { RX.split() };
//! // hand `producer` to the UART receive interrupt
//! let mut bridge = PacketBridge::new(consumer, uart_tx, radio, registers);
//!
//! loop {
//!     bridge.poll()?;
//!     if let Some((packet, rssi, lqi)) = radio_rx.take() {
//!         bridge.on_packet(&packet, rssi, lqi)?;
//!     }
//! }
//! ```
//!
//! ## Design Notes
//!
//! The bridge handles one request at a time: a reply is written in full before the
//! next byte is parsed. Events raised with [`on_packet`](PacketBridge::on_packet) take
//! `&mut self`, so they can never split a reply in half. When the receive interrupt of the
//! radio needs to raise events, share the bridge through [`crate::runtime`].

use crate::dispatcher::{Dispatch, Dispatcher};
use crate::error::BridgeError;
use crate::parser::FrameParser;
use crate::pending::FilterRegisters;
use crate::radio::Radio;
use crate::transport::{ByteSink, ByteSource};
use crate::writer::FrameWriter;

/// Host-facing end of the radio.
///
/// ## Type Parameters
///
/// - `S`: the inbound half of the serial link
/// - `K`: the outbound half of the serial link
/// - `R`: the transceiver
/// - `F`: the transceiver's frame filter registers
#[derive(Debug)]
pub struct PacketBridge<S, K, R, F>
where
    S: ByteSource,
    K: ByteSink,
    R: Radio,
    F: FilterRegisters,
{
    /// Inbound byte source
    pub source: S,
    parser: FrameParser,
    writer: FrameWriter<K>,
    dispatcher: Dispatcher<R, F>,

    /// Counter of request frames dispatched, whatever their outcome.
    /// Like every bridge counter it saturates at `u16::MAX`.
    pub frames_dispatched: u16,

    /// Counter of requests answered with an `Err` reply.
    /// Incremented for unknown commands and malformed payloads.
    pub protocol_errors: u16,

    /// Counter of `OnPacket` events written to the host.
    pub events_sent: u16,
}

impl<S, K, R, F> PacketBridge<S, K, R, F>
where
    S: ByteSource,
    K: ByteSink,
    R: Radio,
    F: FilterRegisters,
{
    /// Creates a bridge with an idle parser and no frame in progress.
    pub fn new(source: S, sink: K, radio: R, registers: F) -> Self {
        Self {
            source,
            parser: FrameParser::new(),
            writer: FrameWriter::new(sink),
            dispatcher: Dispatcher::new(radio, registers),
            frames_dispatched: 0,
            protocol_errors: 0,
            events_sent: 0,
        }
    }

    /// Frames dropped because their declared length exceeded the receive buffer.
    pub fn oversized(&self) -> u16 {
        self.parser.oversized
    }

    /// Borrows the frame parser.
    pub fn parser(&self) -> &FrameParser {
        &self.parser
    }

    /// Borrows the frame writer.
    pub fn writer(&self) -> &FrameWriter<K> {
        &self.writer
    }

    /// Borrows the dispatcher, and through it the radio and filter registers.
    pub fn dispatcher(&self) -> &Dispatcher<R, F> {
        &self.dispatcher
    }

    /// Mutably borrows the dispatcher.
    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<R, F> {
        &mut self.dispatcher
    }

    /// Parses one byte and answers the frame it completes, if any.
    fn process_byte(&mut self, byte: u8) -> Result<bool, K::Error> {
        let Some(frame) = self.parser.push_byte(byte) else {
            return Ok(false);
        };
        let outcome = self.dispatcher.handle(&frame, &mut self.writer)?;
        self.frames_dispatched = self.frames_dispatched.saturating_add(1);
        if let Dispatch::Rejected(_) = outcome {
            self.protocol_errors = self.protocol_errors.saturating_add(1);
        }
        Ok(true)
    }

    /// Drains the byte source, answering every frame it completes.
    ///
    /// Returns once the source reports [`nb::Error::WouldBlock`]. A partial frame stays
    /// in the parser until the next call.
    ///
    /// # Returns
    /// The number of frames dispatched during this call.
    ///
    /// # Errors
    /// The first source or sink failure. Frames answered before it are not rolled back.
    pub fn poll(&mut self) -> Result<usize, BridgeError<S::Error, K::Error>> {
        let mut frames = 0;
        loop {
            let byte = match self.source.read() {
                Ok(byte) => byte,
                Err(nb::Error::WouldBlock) => return Ok(frames),
                Err(nb::Error::Other(err)) => return Err(BridgeError::Source(err)),
            };
            if self.process_byte(byte).map_err(BridgeError::Sink)? {
                frames += 1;
            }
        }
    }

    /// Processes bytes that were received outside the byte source, e.g. a USB bulk transfer.
    ///
    /// # Returns
    /// The number of frames dispatched.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<usize, K::Error> {
        let mut frames = 0;
        for &byte in bytes {
            if self.process_byte(byte)? {
                frames += 1;
            }
        }
        Ok(frames)
    }

    /// Reports a packet received by the radio as an `OnPacket` event.
    ///
    /// # Arguments
    /// - `packet`: the received frame, without FCS
    /// - `rssi`: raw RSSI byte from the radio
    /// - `link_quality`: raw link quality (correlation) byte
    pub fn on_packet(&mut self, packet: &[u8], rssi: u8, link_quality: u8) -> Result<(), K::Error> {
        self.writer.send_event_on_packet(packet, rssi, link_quality)?;
        self.events_sent = self.events_sent.saturating_add(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Reply, Request};
    use crate::consts::{EVENT_REQUEST_ID, MAX_PAYLOAD_LEN};
    use crate::test_support::{
        LineBroken, RadioCall, RecordingRadio, RegisterFile, ScriptSource, VecSink, encode,
        replies,
    };
    use crate::transport::RxQueue;

    type TestBridge = PacketBridge<ScriptSource, VecSink, RecordingRadio, RegisterFile>;

    fn bridge(input: &[u8]) -> TestBridge {
        PacketBridge::new(
            ScriptSource::new(input),
            VecSink::default(),
            RecordingRadio::default(),
            RegisterFile::default(),
        )
    }

    fn push(bridge: &mut TestBridge, bytes: &[u8]) {
        bridge.source.bytes.extend(bytes.iter().copied());
    }

    const OK: u8 = Reply::Ok as u8;
    const ERR: u8 = Reply::Err as u8;

    #[test]
    fn test_poll_answers_each_request_with_its_id() {
        let mut input = encode(Request::RadioOn as u8, 0x0101, &[]);
        input.extend(encode(Request::RadioChannelClear as u8, 0x0202, &[]));
        input.extend(encode(Request::RadioOff as u8, 0x0303, &[]));
        let mut bridge = bridge(&input);

        assert_eq!(bridge.poll().unwrap(), 3);
        let ids: Vec<(u8, u16)> = replies(&bridge.writer().sink().bytes)
            .into_iter()
            .map(|(command, id, _)| (command, id))
            .collect();
        assert_eq!(ids, vec![(OK, 0x0101), (OK, 0x0202), (OK, 0x0303)]);
        assert_eq!(bridge.frames_dispatched, 3);
        assert_eq!(bridge.protocol_errors, 0);
    }

    #[test]
    fn test_partial_frame_survives_between_polls() {
        let request = encode(Request::RadioSend as u8, 9, b"hello");
        let mut bridge = bridge(&request[..6]);

        assert_eq!(bridge.poll().unwrap(), 0);
        assert!(bridge.writer().sink().bytes.is_empty());
        assert!(!bridge.parser().is_idle());

        push(&mut bridge, &request[6..]);
        assert_eq!(bridge.poll().unwrap(), 1);
        assert_eq!(
            bridge.dispatcher().radio().calls,
            vec![RadioCall::Send(b"hello".to_vec())]
        );
    }

    #[test]
    fn test_noise_before_frame_is_skipped() {
        let mut input = b"\x00garbage\xff".to_vec();
        input.extend(encode(Request::RadioOn as u8, 4, &[]));
        let mut bridge = bridge(&input);

        assert_eq!(bridge.poll().unwrap(), 1);
        assert_eq!(replies(&bridge.writer().sink().bytes), vec![(OK, 4, vec![0, 0])]);
    }

    #[test]
    fn test_oversized_frame_is_counted_and_next_frame_served() {
        let mut input = encode(Request::RadioSend as u8, 1, &[0u8; MAX_PAYLOAD_LEN + 1])[..8].to_vec();
        input.extend(encode(Request::RadioOn as u8, 2, &[]));
        let mut bridge = bridge(&input);

        assert_eq!(bridge.poll().unwrap(), 1);
        assert_eq!(bridge.oversized(), 1);
        assert_eq!(replies(&bridge.writer().sink().bytes), vec![(OK, 2, vec![0, 0])]);
    }

    #[test]
    fn test_protocol_errors_are_counted() {
        let mut input = encode(0x55, 1, &[]);
        input.extend(encode(Request::RadioTransmit as u8, 2, &[]));
        input.extend(encode(Request::RadioOn as u8, 3, &[]));
        let mut bridge = bridge(&input);

        assert_eq!(bridge.poll().unwrap(), 3);
        assert_eq!(bridge.frames_dispatched, 3);
        assert_eq!(bridge.protocol_errors, 2);
        let commands: Vec<u8> = replies(&bridge.writer().sink().bytes)
            .into_iter()
            .map(|reply| reply.0)
            .collect();
        assert_eq!(commands, vec![ERR, ERR, OK]);
    }

    #[test]
    fn test_event_between_requests_is_not_interleaved() {
        let request = encode(Request::RadioOn as u8, 7, &[]);
        let mut bridge = bridge(&request[..4]);
        assert_eq!(bridge.poll().unwrap(), 0);

        bridge.on_packet(&[0x41, 0x88], 0xc8, 0x7f).unwrap();
        push(&mut bridge, &request[4..]);
        assert_eq!(bridge.poll().unwrap(), 1);

        assert_eq!(
            replies(&bridge.writer().sink().bytes),
            vec![
                (Reply::OnPacket as u8, EVENT_REQUEST_ID, vec![0x41, 0x88, 0xc8, 0x7f]),
                (OK, 7, vec![0, 0]),
            ]
        );
        assert_eq!(bridge.events_sent, 1);
    }

    #[test]
    fn test_source_error_stops_poll() {
        let mut bridge = bridge(&encode(Request::RadioOn as u8, 1, &[]));
        bridge.source.fail_when_empty = true;

        assert_eq!(bridge.poll(), Err(BridgeError::Source(LineBroken)));
        // The frame read before the failure was still answered
        assert_eq!(bridge.frames_dispatched, 1);
    }

    #[test]
    fn test_counters_saturate() {
        let mut input = encode(0x55, 1, &[]);
        input.extend(encode(Request::RadioOn as u8, 2, &[]));
        let mut bridge = bridge(&input);
        bridge.frames_dispatched = u16::MAX;
        bridge.protocol_errors = u16::MAX;
        bridge.events_sent = u16::MAX;

        assert_eq!(bridge.poll().unwrap(), 2);
        bridge.on_packet(&[0x01], 0, 0).unwrap();
        assert_eq!(bridge.frames_dispatched, u16::MAX);
        assert_eq!(bridge.protocol_errors, u16::MAX);
        assert_eq!(bridge.events_sent, u16::MAX);
    }

    #[test]
    fn test_feed_dispatches_without_source() {
        let mut bridge = bridge(&[]);
        let input = encode(Request::RadioSetValue as u8, 0x0a0b, &[0x00, 0x03, 0x00, 0x0f]);
        assert_eq!(bridge.feed(&input).unwrap(), 1);
        assert_eq!(
            bridge.dispatcher().radio().calls,
            vec![RadioCall::SetValue(3, 15)]
        );
    }

    #[test]
    fn test_poll_drains_rx_queue() {
        let mut queue = RxQueue::new();
        let (mut producer, consumer) = queue.split();
        let mut bridge = PacketBridge::new(
            consumer,
            VecSink::default(),
            RecordingRadio::default(),
            RegisterFile::filtering_ready(),
        );

        for byte in encode(Request::RadioInitPendingTable as u8, 0x4242, &[]) {
            producer.enqueue(byte).unwrap();
        }
        assert_eq!(bridge.poll(), Ok(1));
        assert_eq!(bridge.poll(), Ok(0));
        assert_eq!(
            replies(&bridge.writer().sink().bytes),
            vec![(OK, 0x4242, vec![0, 0])]
        );
    }
}
