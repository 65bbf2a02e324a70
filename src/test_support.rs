//! Test doubles shared by the unit tests.

#![allow(dead_code)]

use core::convert::Infallible;
use std::collections::VecDeque;

use crate::consts::{PENDING_SLOTS, SHORT_ADDR_LEN, SHORT_TABLE_OFFSET};
use crate::frame::Frame;
use crate::parser::FrameParser;
use crate::pending::{FRMFILT0_FRM_FILTER_EN, FRMFILT1_ACCEPT_ALL, FilterRegister, FilterRegisters};
use crate::radio::{Radio, RadioParam, RadioValue};
use crate::transport::{ByteSink, ByteSource};

/// Encodes a frame into a fresh vector.
pub(crate) fn encode(command_id: u8, request_id: u16, payload: &[u8]) -> Vec<u8> {
    let frame = Frame::new(command_id, request_id, payload);
    let mut out = vec![0u8; frame.encoded_len()];
    let n = frame.encode(&mut out).unwrap();
    assert_eq!(n, out.len());
    out
}

/// Parses every frame in `bytes`, the way the host reads replies.
pub(crate) fn replies(bytes: &[u8]) -> Vec<(u8, u16, Vec<u8>)> {
    let mut parser: FrameParser<{ u16::MAX as usize }> = FrameParser::new();
    let mut frames = Vec::new();
    let _ = parser.feed(bytes, |frame| {
        frames.push((frame.command_id, frame.request_id, frame.payload.to_vec()))
    });
    assert!(parser.is_idle(), "trailing partial frame");
    frames
}

/// Sink collecting every byte written.
#[derive(Debug, Default)]
pub(crate) struct VecSink {
    pub(crate) bytes: Vec<u8>,
    pub(crate) flushes: usize,
    pub(crate) stalls: usize,
    stall: usize,
    pending: usize,
}

impl VecSink {
    /// A sink that reports `WouldBlock` `stall` times before each accepted byte.
    pub(crate) fn stalling(stall: usize) -> Self {
        Self {
            stall,
            pending: stall,
            ..Self::default()
        }
    }
}

impl ByteSink for VecSink {
    type Error = Infallible;

    fn write(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        if self.pending > 0 {
            self.pending -= 1;
            self.stalls += 1;
            return Err(nb::Error::WouldBlock);
        }
        self.pending = self.stall;
        self.bytes.push(byte);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}

/// Source replaying scripted bytes, optionally failing once drained.
#[derive(Debug, Default)]
pub(crate) struct ScriptSource {
    pub(crate) bytes: VecDeque<u8>,
    pub(crate) fail_when_empty: bool,
}

impl ScriptSource {
    pub(crate) fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.iter().copied().collect(),
            fail_when_empty: false,
        }
    }
}

/// Error raised by [`ScriptSource`] once drained.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) struct LineBroken;

impl ByteSource for ScriptSource {
    type Error = LineBroken;

    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        match self.bytes.pop_front() {
            Some(byte) => Ok(byte),
            None if self.fail_when_empty => Err(nb::Error::Other(LineBroken)),
            None => Err(nb::Error::WouldBlock),
        }
    }
}

/// A call received by [`RecordingRadio`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) enum RadioCall {
    Prepare(Vec<u8>),
    Transmit(u16),
    Send(Vec<u8>),
    ChannelClear,
    On,
    Off,
    GetValue(RadioParam),
    SetValue(RadioParam, RadioValue),
    GetObject(RadioParam, usize),
    SetObject(RadioParam, Vec<u8>),
}

/// Radio recording its calls and answering with fixed results.
#[derive(Debug, Default)]
pub(crate) struct RecordingRadio {
    pub(crate) calls: Vec<RadioCall>,
    pub(crate) code: i32,
    pub(crate) value: RadioValue,
    pub(crate) object: Vec<u8>,
}

impl Radio for RecordingRadio {
    fn prepare(&mut self, payload: &[u8]) -> i32 {
        self.calls.push(RadioCall::Prepare(payload.to_vec()));
        self.code
    }

    fn transmit(&mut self, transmit_len: u16) -> i32 {
        self.calls.push(RadioCall::Transmit(transmit_len));
        self.code
    }

    fn send(&mut self, payload: &[u8]) -> i32 {
        self.calls.push(RadioCall::Send(payload.to_vec()));
        self.code
    }

    fn channel_clear(&mut self) -> i32 {
        self.calls.push(RadioCall::ChannelClear);
        self.code
    }

    fn on(&mut self) -> i32 {
        self.calls.push(RadioCall::On);
        self.code
    }

    fn off(&mut self) -> i32 {
        self.calls.push(RadioCall::Off);
        self.code
    }

    fn get_value(&mut self, param: RadioParam) -> (i32, RadioValue) {
        self.calls.push(RadioCall::GetValue(param));
        (self.code, self.value)
    }

    fn set_value(&mut self, param: RadioParam, value: RadioValue) -> i32 {
        self.calls.push(RadioCall::SetValue(param, value));
        self.code
    }

    fn get_object(&mut self, param: RadioParam, dest: &mut [u8]) -> i32 {
        self.calls.push(RadioCall::GetObject(param, dest.len()));
        for (slot, byte) in dest.iter_mut().zip(self.object.iter()) {
            *slot = *byte;
        }
        self.code
    }

    fn set_object(&mut self, param: RadioParam, src: &[u8]) -> i32 {
        self.calls.push(RadioCall::SetObject(param, src.to_vec()));
        self.code
    }
}

/// A register access seen by [`RegisterFile`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) enum RegisterOp {
    Read(FilterRegister),
    Write(FilterRegister, u8),
    Address { offset: usize, len: usize },
}

const TABLE_LEN: usize = SHORT_TABLE_OFFSET + PENDING_SLOTS as usize * SHORT_ADDR_LEN;

/// In-memory filter registers and source address table.
#[derive(Debug)]
pub(crate) struct RegisterFile {
    regs: [u8; 15],
    pub(crate) table: [u8; TABLE_LEN],
    pub(crate) ops: Vec<RegisterOp>,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self {
            regs: [0; 15],
            table: [0; TABLE_LEN],
            ops: Vec::new(),
        }
    }
}

impl RegisterFile {
    /// Frame filtering enabled for every frame type, source matching still off.
    pub(crate) fn filtering_ready() -> Self {
        let mut regs = Self::default();
        regs.set(FilterRegister::FrmFilt0, FRMFILT0_FRM_FILTER_EN);
        regs.set(FilterRegister::FrmFilt1, FRMFILT1_ACCEPT_ALL);
        regs
    }

    /// Sets a register without recording an access.
    pub(crate) fn set(&mut self, reg: FilterRegister, value: u8) {
        self.regs[reg as usize] = value;
    }

    /// Reads a register without recording an access.
    pub(crate) fn get(&self, reg: FilterRegister) -> u8 {
        self.regs[reg as usize]
    }
}

impl FilterRegisters for RegisterFile {
    fn read(&mut self, reg: FilterRegister) -> u8 {
        self.ops.push(RegisterOp::Read(reg));
        self.get(reg)
    }

    fn write(&mut self, reg: FilterRegister, value: u8) {
        self.ops.push(RegisterOp::Write(reg, value));
        self.set(reg, value);
    }

    fn write_address(&mut self, offset: usize, bytes: &[u8]) {
        self.ops.push(RegisterOp::Address {
            offset,
            len: bytes.len(),
        });
        self.table[offset..offset + bytes.len()].copy_from_slice(bytes);
    }
}
