//! Byte transport contract.
//!
//! The bridge talks to the serial link through two single-byte traits built on
//! [`nb`]: a [`ByteSource`] that reports [`nb::Error::WouldBlock`] when no byte is
//! buffered, and a [`ByteSink`] that the writer drives with [`nb::block!`].
//!
//! On firmware the usual source is the consumer half of an [`RxQueue`] that the
//! UART receive interrupt fills:
//!
//! ```rust
//! use zpb_bridge::transport::{ByteSource, RxQueue};
//!
//! let mut queue = RxQueue::new();
//! let (mut producer, mut consumer) = queue.split();
//!
//! // In the UART interrupt
//! producer.enqueue(b'Z').ok();
//!
//! // In the bridge task
//! assert_eq!(consumer.read(), Ok(b'Z'));
//! assert_eq!(consumer.read(), Err(nb::Error::WouldBlock));
//! ```

use core::convert::Infallible;
use core::fmt::Debug;

use heapless::spsc::{Consumer, Queue};

use crate::consts::RX_RING_LEN;

/// Receive ring filled from the byte-arrival interrupt and drained by the bridge.
pub type RxQueue = Queue<u8, RX_RING_LEN>;

/// Inbound half of the serial link.
pub trait ByteSource {
    /// Transport error.
    type Error: Debug;

    /// Takes the next buffered byte, or [`nb::Error::WouldBlock`] when none is available.
    fn read(&mut self) -> nb::Result<u8, Self::Error>;
}

/// Outbound half of the serial link.
pub trait ByteSink {
    /// Transport error.
    type Error: Debug;

    /// Writes one byte.
    fn write(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Pushes any buffered bytes onto the wire.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    type Error = T::Error;

    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        (**self).read()
    }
}

impl<T: ByteSink + ?Sized> ByteSink for &mut T {
    type Error = T::Error;

    fn write(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        (**self).write(byte)
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        (**self).flush()
    }
}

impl<const N: usize> ByteSource for Consumer<'_, u8, N> {
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        self.dequeue().ok_or(nb::Error::WouldBlock)
    }
}

#[cfg(feature = "std")]
pub use self::io::{IoSink, IoSource};

#[cfg(feature = "std")]
mod io {
    use super::{ByteSink, ByteSource};
    use std::io::{ErrorKind, Read, Write};

    fn is_transient(kind: ErrorKind) -> bool {
        matches!(
            kind,
            ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
        )
    }

    /// [`ByteSource`] over any [`std::io::Read`], e.g. a serial port with a read timeout.
    ///
    /// Timeouts and end-of-stream are reported as [`nb::Error::WouldBlock`].
    #[derive(Debug)]
    pub struct IoSource<R> {
        inner: R,
    }

    impl<R: Read> IoSource<R> {
        /// Wraps a reader.
        pub fn new(inner: R) -> Self {
            Self { inner }
        }

        /// Returns the wrapped reader.
        pub fn into_inner(self) -> R {
            self.inner
        }
    }

    impl<R: Read> ByteSource for IoSource<R> {
        type Error = std::io::Error;

        fn read(&mut self) -> nb::Result<u8, Self::Error> {
            let mut byte = [0u8; 1];
            match self.inner.read(&mut byte) {
                Ok(0) => Err(nb::Error::WouldBlock),
                Ok(_) => Ok(byte[0]),
                Err(err) if is_transient(err.kind()) => Err(nb::Error::WouldBlock),
                Err(err) => Err(nb::Error::Other(err)),
            }
        }
    }

    /// [`ByteSink`] over any [`std::io::Write`].
    ///
    /// A writer that accepts zero bytes is full or closed; that is reported as
    /// [`ErrorKind::WriteZero`] rather than retried.
    #[derive(Debug)]
    pub struct IoSink<W> {
        inner: W,
    }

    impl<W: Write> IoSink<W> {
        /// Wraps a writer.
        pub fn new(inner: W) -> Self {
            Self { inner }
        }

        /// Borrows the wrapped writer.
        pub fn get_ref(&self) -> &W {
            &self.inner
        }

        /// Returns the wrapped writer.
        pub fn into_inner(self) -> W {
            self.inner
        }
    }

    impl<W: Write> ByteSink for IoSink<W> {
        type Error = std::io::Error;

        fn write(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
            match self.inner.write(&[byte]) {
                Ok(0) => Err(nb::Error::Other(ErrorKind::WriteZero.into())),
                Ok(_) => Ok(()),
                Err(err) if is_transient(err.kind()) => Err(nb::Error::WouldBlock),
                Err(err) => Err(nb::Error::Other(err)),
            }
        }

        fn flush(&mut self) -> nb::Result<(), Self::Error> {
            match self.inner.flush() {
                Ok(()) => Ok(()),
                Err(err) if is_transient(err.kind()) => Err(nb::Error::WouldBlock),
                Err(err) => Err(nb::Error::Other(err)),
            }
        }
    }
}
