/// Declares a static global `PACKET_BRIDGE` protected by a `critical_section` mutex.
///
/// This macro creates a `static` singleton `PACKET_BRIDGE` suitable for use in
/// interrupt-based environments, where the main loop polls the bridge and the
/// radio receive interrupt raises events on it.
///
/// # Arguments
/// - `$source`: The concrete byte source type (must implement `ByteSource`)
/// - `$sink`: The concrete byte sink type (must implement `ByteSink`)
/// - `$radio`: The concrete radio type (must implement `Radio`)
/// - `$registers`: The concrete filter register type (must implement `FilterRegisters`)
///
/// # Example
/// ```rust,ignore
/// init_packet_bridge!(Consumer<'static, u8, 128>, UartTx, Cc2538Radio, Cc2538Filter);
/// ```
#[macro_export]
macro_rules! init_packet_bridge {
    ( $source:ty, $sink:ty, $radio:ty, $registers:ty ) => {
        pub static PACKET_BRIDGE: $crate::runtime::GlobalBridge<$source, $sink, $radio, $registers> =
            $crate::runtime::global_bridge_init();
    };
}

/// Builds a `PacketBridge` and installs it in the global `PACKET_BRIDGE`.
///
/// # Example
/// ```rust,ignore
/// setup_packet_bridge!(consumer, uart_tx, radio, registers);
/// ```
///
/// # Notes
/// - Requires `init_packet_bridge!` to have been used earlier.
#[macro_export]
macro_rules! setup_packet_bridge {
    ( $source:expr, $sink:expr, $radio:expr, $registers:expr ) => {
        $crate::runtime::global_bridge_setup(
            &PACKET_BRIDGE,
            $crate::bridge::PacketBridge::new($source, $sink, $radio, $registers),
        )
    };
}

/// Polls the global `PACKET_BRIDGE`, see [`global_bridge_poll`](crate::runtime::global_bridge_poll).
///
/// # Notes
/// - Safe to call before setup; it evaluates to `None`.
#[macro_export]
macro_rules! poll_packet_bridge {
    () => {
        $crate::runtime::global_bridge_poll(&PACKET_BRIDGE)
    };
}

/// Raises an `OnPacket` event on the global `PACKET_BRIDGE` from an interrupt handler.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn RF_RX() {
///     packet_bridge_on_packet!(&packet, rssi, lqi);
/// }
/// ```
#[macro_export]
macro_rules! packet_bridge_on_packet {
    ( $packet:expr, $rssi:expr, $link_quality:expr ) => {
        $crate::runtime::global_bridge_on_packet(&PACKET_BRIDGE, $packet, $rssi, $link_quality)
    };
}
