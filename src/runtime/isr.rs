use crate::bridge::PacketBridge;
use crate::error::BridgeError;
use crate::pending::FilterRegisters;
use crate::radio::Radio;
use crate::transport::{ByteSink, ByteSource};
use core::cell::RefCell;
use critical_section::Mutex;

/// A [`PacketBridge`] shared between the main loop and interrupt handlers.
pub type GlobalBridge<S, K, R, F> = Mutex<RefCell<Option<PacketBridge<S, K, R, F>>>>;

/// Used to initialize the global static `PacketBridge` for use with
/// `critical_section`.
///
/// # Returns
/// * An empty mutable ref-cell
///
/// # Example
/// ```rust,ignore
/// use zpb_bridge::runtime::{GlobalBridge, global_bridge_init};
///
/// static BRIDGE: GlobalBridge<RxConsumer, UartTx, Cc2538Radio, Cc2538Filter> =
///     global_bridge_init();
/// ```
pub const fn global_bridge_init<S, K, R, F>() -> GlobalBridge<S, K, R, F>
where
    S: ByteSource,
    K: ByteSink,
    R: Radio,
    F: FilterRegisters,
{
    Mutex::new(RefCell::new(None))
}

/// Installs `bridge` in the global slot, replacing any previous bridge.
///
/// # Example
/// ```rust,ignore
/// global_bridge_setup(&BRIDGE, PacketBridge::new(consumer, uart_tx, radio, registers));
/// ```
pub fn global_bridge_setup<S, K, R, F>(
    global: &GlobalBridge<S, K, R, F>,
    bridge: PacketBridge<S, K, R, F>,
) where
    S: ByteSource,
    K: ByteSink,
    R: Radio,
    F: FilterRegisters,
{
    critical_section::with(|cs| {
        let _ = global.borrow(cs).replace(Some(bridge));
    });
}

/// Polls the global bridge.
///
/// # Returns
/// `None` if the bridge has not been set up or is already in use further up the stack,
/// otherwise the result of [`PacketBridge::poll`].
///
/// # Notes
/// - The whole drain runs inside one critical section, reply writes included. With
///   interrupts masked the UART receive ISR cannot refill the ring, so bytes arriving
///   during the reply are held by the UART alone. Budget for it with
///   [`frame_time_us`](super::frame_time_us) on the longest reply.
///
/// # Example
/// ```rust,ignore
/// loop {
///     if let Some(Err(err)) = global_bridge_poll(&BRIDGE) {
///         // transport failure
///     }
/// }
/// ```
pub fn global_bridge_poll<S, K, R, F>(
    global: &GlobalBridge<S, K, R, F>,
) -> Option<Result<usize, BridgeError<S::Error, K::Error>>>
where
    S: ByteSource,
    K: ByteSink,
    R: Radio,
    F: FilterRegisters,
{
    critical_section::with(|cs| {
        let mut slot = global.borrow(cs).try_borrow_mut().ok()?;
        let bridge = slot.as_mut()?;
        Some(bridge.poll())
    })
}

/// Raises an `OnPacket` event from the radio receive interrupt.
///
/// The event is written immediately, inside the critical section, so it can never land
/// inside a reply. If the bridge is not set up or is borrowed by the interrupted code,
/// the packet is dropped.
///
/// # Returns
/// `true` if the event was written to the sink.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn RF_RX() {
///     let (packet, rssi, lqi) = radio_rx_fifo.take();
///     global_bridge_on_packet(&BRIDGE, &packet, rssi, lqi);
/// }
/// ```
pub fn global_bridge_on_packet<S, K, R, F>(
    global: &GlobalBridge<S, K, R, F>,
    packet: &[u8],
    rssi: u8,
    link_quality: u8,
) -> bool
where
    S: ByteSource,
    K: ByteSink,
    R: Radio,
    F: FilterRegisters,
{
    critical_section::with(|cs| {
        let Ok(mut slot) = global.borrow(cs).try_borrow_mut() else {
            warn!("bridge busy, dropping {}-byte packet", packet.len());
            return false;
        };
        match slot.as_mut() {
            Some(bridge) => bridge.on_packet(packet, rssi, link_quality).is_ok(),
            None => false,
        }
    })
}

/// Runs `f` on the global bridge, e.g. to read its counters.
///
/// # Returns
/// `None` if the bridge has not been set up or is already borrowed.
pub fn global_bridge_with<S, K, R, F, T>(
    global: &GlobalBridge<S, K, R, F>,
    f: impl FnOnce(&mut PacketBridge<S, K, R, F>) -> T,
) -> Option<T>
where
    S: ByteSource,
    K: ByteSink,
    R: Radio,
    F: FilterRegisters,
{
    critical_section::with(|cs| {
        let mut slot = global.borrow(cs).try_borrow_mut().ok()?;
        slot.as_mut().map(f)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Reply, Request};
    use crate::consts::EVENT_REQUEST_ID;
    use crate::test_support::{RecordingRadio, RegisterFile, ScriptSource, VecSink, encode, replies};

    type TestGlobal = GlobalBridge<ScriptSource, VecSink, RecordingRadio, RegisterFile>;

    fn bridge(input: &[u8]) -> PacketBridge<ScriptSource, VecSink, RecordingRadio, RegisterFile> {
        PacketBridge::new(
            ScriptSource::new(input),
            VecSink::default(),
            RecordingRadio::default(),
            RegisterFile::default(),
        )
    }

    fn sink_bytes(global: &TestGlobal) -> Vec<u8> {
        global_bridge_with(global, |bridge| bridge.writer().sink().bytes.clone()).unwrap()
    }

    #[test]
    fn test_calls_before_setup_do_nothing() {
        let global: TestGlobal = global_bridge_init();
        assert!(global_bridge_poll(&global).is_none());
        assert!(!global_bridge_on_packet(&global, &[1, 2], 0, 0));
        assert!(global_bridge_with(&global, |bridge| bridge.events_sent).is_none());
    }

    #[test]
    fn test_poll_and_event_share_one_writer() {
        let global: TestGlobal = global_bridge_init();
        global_bridge_setup(&global, bridge(&encode(Request::RadioOn as u8, 3, &[])));

        assert!(global_bridge_on_packet(&global, &[0xaa], 0x10, 0x20));
        assert_eq!(global_bridge_poll(&global), Some(Ok(1)));
        assert_eq!(
            replies(&sink_bytes(&global)),
            vec![
                (Reply::OnPacket as u8, EVENT_REQUEST_ID, vec![0xaa, 0x10, 0x20]),
                (Reply::Ok as u8, 3, vec![0, 0]),
            ]
        );
    }

    #[test]
    fn test_event_while_bridge_borrowed_is_dropped() {
        let global: TestGlobal = global_bridge_init();
        global_bridge_setup(&global, bridge(&[]));

        // An interrupt firing while the main loop holds the bridge
        let nested = global_bridge_with(&global, |_| {
            global_bridge_on_packet(&global, &[0x01], 0, 0)
        });
        assert_eq!(nested, Some(false));
        assert!(sink_bytes(&global).is_empty());
        assert_eq!(global_bridge_with(&global, |bridge| bridge.events_sent), Some(0));
    }

    #[test]
    fn test_setup_replaces_previous_bridge() {
        let global: TestGlobal = global_bridge_init();
        global_bridge_setup(&global, bridge(&[]));
        assert!(global_bridge_on_packet(&global, &[0x01], 0, 0));

        global_bridge_setup(&global, bridge(&[]));
        assert!(sink_bytes(&global).is_empty());
    }
}
