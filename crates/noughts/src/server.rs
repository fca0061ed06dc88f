//! `NoughtsServer` builder and server loop.
//!
//! This is the entry point for running a Noughts server. It ties together
//! all the layers: transport → protocol → coordinator → gateway, with the
//! stats reporter off to the side.

use std::sync::Arc;

use noughts_protocol::JsonCodec;
use noughts_session::SessionConfig;
use noughts_stats::StatsStore;
use noughts_transport::{Transport, WebSocketTransport};

use crate::NoughtsError;
use crate::config::ServerConfig;
use crate::coordinator::{CoordinatorHandle, SessionCoordinator, spawn_coordinator};
use crate::gateway::ChannelSink;
use crate::handler::handle_connection;
use crate::reporter::spawn_stats_reporter;

/// Builder for configuring and starting a Noughts server.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use noughts::prelude::*;
///
/// # async fn start() -> Result<(), NoughtsError> {
/// let server = NoughtsServer::builder()
///     .bind("0.0.0.0:8080")
///     .build(Arc::new(MemoryStatsStore::new()))
///     .await?;
/// server.run().await
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct NoughtsServerBuilder {
    config: ServerConfig,
}

impl NoughtsServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.config.session = config;
        self
    }

    /// Binds the listener and starts the coordinator and stats reporter.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`. Must be called inside a
    /// Tokio runtime.
    ///
    /// # Errors
    /// Returns [`NoughtsError::Transport`] if the address cannot be bound.
    pub async fn build<S: StatsStore>(self, store: Arc<S>) -> Result<NoughtsServer, NoughtsError> {
        let transport = WebSocketTransport::bind(&self.config.bind_addr).await?;

        let (reporter, _reporter_task) = spawn_stats_reporter(store);
        let coordinator = SessionCoordinator::new(self.config.session, reporter);
        let (coordinator, _coordinator_task) = spawn_coordinator(coordinator);

        Ok(NoughtsServer {
            transport,
            coordinator,
            codec: JsonCodec,
        })
    }
}

/// A bound Noughts server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct NoughtsServer {
    transport: WebSocketTransport,
    coordinator: CoordinatorHandle<ChannelSink>,
    codec: JsonCodec,
}

impl NoughtsServer {
    /// Creates a new builder.
    pub fn builder() -> NoughtsServerBuilder {
        NoughtsServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Spawns a handler task for each accepted connection. Accept failures
    /// are logged and the loop carries on. Runs until the process is
    /// terminated.
    pub async fn run(mut self) -> Result<(), NoughtsError> {
        match self.local_addr() {
            Ok(addr) => tracing::info!(%addr, "noughts server running"),
            Err(_) => tracing::info!("noughts server running"),
        }

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let coordinator = self.coordinator.clone();
                    let codec = self.codec;
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, coordinator, codec).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
