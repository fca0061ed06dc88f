//! Per-connection handler: decode inbound frames, deliver outbound events.
//!
//! Each accepted connection gets its own Tokio task running
//! [`handle_connection`]. The flow is:
//!   1. Register a [`ChannelSink`] with the coordinator
//!   2. Spawn a writer task that drains the sink's channel onto the socket
//!   3. Loop: receive frames → decode → forward to the coordinator
//!   4. On close or error, report the disconnect exactly once
//!
//! There is no receive timeout. A match ends only by a decisive move or by
//! a dropped connection.

use std::sync::Arc;

use noughts_protocol::{ClientEvent, Codec, ProtocolError, ServerEvent};
use noughts_transport::{Connection, ConnectionId, TransportError};
use tokio::sync::mpsc;

use crate::NoughtsError;
use crate::coordinator::CoordinatorHandle;
use crate::gateway::{ChannelSink, EventSink};

/// Reports the disconnect when the handler exits, panics included.
///
/// `CoordinatorHandle::disconnect` only pushes onto an unbounded channel,
/// so it is fine to call from `Drop`.
struct DisconnectGuard {
    id: ConnectionId,
    coordinator: CoordinatorHandle<ChannelSink>,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        if let Err(e) = self.coordinator.disconnect(self.id) {
            tracing::debug!(conn_id = %self.id, error = %e, "disconnect not delivered");
        }
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<Conn, C>(
    conn: Conn,
    coordinator: CoordinatorHandle<ChannelSink>,
    codec: C,
) -> Result<(), NoughtsError>
where
    Conn: Connection<Error = TransportError>,
    C: Codec + Clone,
{
    let conn = Arc::new(conn);
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let (sink, outbound) = ChannelSink::channel(conn_id);
    // Kept for replies that never reach the coordinator.
    let local = sink.clone();
    coordinator.connect(sink)?;
    let guard = DisconnectGuard {
        id: conn_id,
        coordinator: coordinator.clone(),
    };

    let writer = tokio::spawn(write_outbound(Arc::clone(&conn), outbound, codec.clone()));

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        match codec.decode::<ClientEvent>(&data) {
            Ok(event) => {
                tracing::trace!(%conn_id, ?event, "inbound event");
                coordinator.submit(conn_id, event)?;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "undecodable frame");
                local.deliver(invalid_message(&e));
            }
        }
    }

    // The coordinator drops its sink on disconnect; with `local` gone too,
    // the writer drains what is left and stops.
    drop(local);
    drop(guard);
    if let Err(e) = writer.await {
        tracing::warn!(%conn_id, error = %e, "writer task failed");
    }
    if let Err(e) = conn.close().await {
        tracing::debug!(%conn_id, error = %e, "close failed");
    }
    Ok(())
}

/// Encodes queued events and sends them, in order, until the channel
/// closes or the socket fails.
async fn write_outbound<Conn, C>(
    conn: Arc<Conn>,
    mut outbound: mpsc::UnboundedReceiver<ServerEvent>,
    codec: C,
) where
    Conn: Connection<Error = TransportError>,
    C: Codec,
{
    let conn_id = conn.id();
    while let Some(event) = outbound.recv().await {
        let bytes = match codec.encode(&event) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(%conn_id, event = event.name(), error = %e, "encode failed");
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(%conn_id, error = %e, "send failed, writer stopping");
            break;
        }
    }
}

/// The `error` reply for a frame that did not decode.
fn invalid_message(err: &ProtocolError) -> ServerEvent {
    let detail = match err {
        ProtocolError::Decode(inner) => inner.to_string(),
        other => other.to_string(),
    };
    ServerEvent::error(format!("invalid message: {detail}"))
}
