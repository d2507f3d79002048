//! Notification Loop (§4.10): subscribes to the `monitor` multicast group
//! and renders events until cancelled.
//!
//! Cancellation is a single SIGINT/SIGTERM observed within one timeout
//! tick, matching §5's "the flag is set from a signal context and only
//! written once". `tokio::signal::ctrl_c()` and a `SIGTERM` stream are
//! polled alongside the per-iteration wait rather than through a
//! hand-rolled flag, which is the same guarantee without a busy-read.

use std::time::Duration;

use tokio::signal::unix::{signal, SignalKind};

use crate::error::{CoreError, DecodeError, TransportError};
use crate::model::{Device, EventKind, NotificationEvent, Payload, Pin};
use crate::render::render_notification_event;
use crate::sink::Sink;
use crate::transport::Transport;
use crate::wire::decoder::AttributeSet;

const TICK: Duration = Duration::from_secs(1);

pub async fn run(transport: &mut Transport, sink: &mut dyn Sink) -> Result<(), CoreError> {
    let mut monitor = transport.subscribe_monitor().await?;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut sigterm =
        signal(SignalKind::terminate()).map_err(TransportError::SocketSetup)?;

    sink.open_array("monitor");
    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            _ = sigterm.recv() => break,
            received = monitor.next_notification(TICK) => {
                let Some(message) = received else { continue };
                match EventKind::from_cmd(message.cmd) {
                    Some(kind) => match decode_event(kind, &message.payload) {
                        Ok(event) => render_notification_event(sink, &event),
                        Err(e) => log::warn!("dropping undecodable notification: {e}"),
                    },
                    None => log::warn!("unknown notification command {}", message.cmd),
                }
            }
        }
    }
    sink.close_array();
    Ok(())
}

fn decode_event(kind: EventKind, payload: &[u8]) -> Result<NotificationEvent, DecodeError> {
    let set = AttributeSet::parse(payload)?;
    let is_pin = matches!(
        kind,
        EventKind::PinCreate | EventKind::PinChange | EventKind::PinDelete
    );
    let payload = if is_pin {
        Payload::Pin(Pin::from_attrs(&set)?)
    } else {
        Payload::Device(Device::from_attrs(&set)?)
    };
    Ok(NotificationEvent { kind, payload })
}
