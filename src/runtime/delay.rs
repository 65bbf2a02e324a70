use crate::bridge::PacketBridge;
use crate::error::BridgeError;
use crate::pending::FilterRegisters;
use crate::radio::Radio;
use crate::transport::{ByteSink, ByteSource};
use embedded_hal::delay::DelayNs;

/// Polls the bridge once, then sleeps for `idle_us` if no frame was dispatched.
///
/// # Arguments
/// - `bridge`: A mutable reference to a `PacketBridge` instance.
/// - `delay`: A delay provider implementing `DelayNs`, typically from the HAL.
/// - `idle_us`: The pause after an idle poll, in microseconds. Keep it below
///   [`max_poll_interval_us`](super::max_poll_interval_us) for the link's baud rate.
///
/// # Returns
/// The number of frames dispatched by the poll.
pub fn poll_once_or_idle<D, S, K, R, F>(
    bridge: &mut PacketBridge<S, K, R, F>,
    delay: &mut D,
    idle_us: u32,
) -> Result<usize, BridgeError<S::Error, K::Error>>
where
    D: DelayNs,
    S: ByteSource,
    K: ByteSink,
    R: Radio,
    F: FilterRegisters,
{
    let frames = bridge.poll()?;
    if frames == 0 {
        delay.delay_us(idle_us);
    }
    Ok(frames)
}

/// Runs a blocking loop that keeps polling the provided bridge.
///
/// This is a simple scheduling loop for firmware where the bridge is the only task.
/// Transport errors are logged and the loop carries on after an idle pause.
///
/// # Example
/// ```rust,ignore
/// use zpb_bridge::runtime::run_bridge_loop;
///
/// let mut bridge = PacketBridge::new(consumer, uart_tx, radio, registers);
/// run_bridge_loop(&mut bridge, &mut delay, 500);
/// ```
///
/// # Notes
/// - This loop never returns. Raise radio events from an interrupt through the
///   `bridge-isr` globals instead when the radio must be serviced concurrently.
pub fn run_bridge_loop<D, S, K, R, F>(
    bridge: &mut PacketBridge<S, K, R, F>,
    delay: &mut D,
    idle_us: u32,
) -> !
where
    D: DelayNs,
    S: ByteSource,
    K: ByteSink,
    R: Radio,
    F: FilterRegisters,
{
    loop {
        if poll_once_or_idle(bridge, delay, idle_us).is_err() {
            warn!("bridge transport failed, idling");
            delay.delay_us(idle_us);
        }
    }
}
