//! Adapter runtime integration.
//!
//! Bridges the synchronous scorecard loop with the async TCP server. The loop
//! owns the engine; it drains [`InboundCommand`]s with [`Adapter::try_recv`]
//! and answers through [`Adapter::send`].

use std::sync::Arc;

use anyhow::Context;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::protocol::{AckMessage, ErrorMessage, ObservationMessage};
use crate::server::{run_server_with_stats, FeedStats, ServerConfig, ServerState};

/// Command delivered to the game loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    pub command: ClientCommand,
}

/// Command payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    /// Raw pinfall reading; the engine decides whether it is legal.
    Throw(i32),
    Restart,
    /// A client finished its handshake and wants the current state.
    SnapshotRequest,
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClientAck { client_id: usize, ack: AckMessage },
    ToClientError { client_id: usize, err: ErrorMessage },
    ToClientObservation { client_id: usize, obs: ObservationMessage },
    BroadcastObservation { obs: ObservationMessage },
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    stats: Arc<FeedStats>,
}

impl Adapter {
    /// Start the adapter from environment variables.
    ///
    /// Returns `Ok(None)` if `BOWLING_FEED_DISABLED` is set.
    pub fn start_from_env() -> anyhow::Result<Option<Self>> {
        if ServerState::is_disabled() {
            tracing::info!("pinfall feed disabled via BOWLING_FEED_DISABLED");
            return Ok(None);
        }
        Self::start(ServerConfig::from_env()).map(Some)
    }

    pub fn start(config: ServerConfig) -> anyhow::Result<Self> {
        // Fail fast on a bad address instead of inside the background task.
        config.socket_addr()?;

        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
        let stats = Arc::new(FeedStats::default());

        let rt = Runtime::new().context("failed to create tokio runtime")?;
        let server_stats = Arc::clone(&stats);
        rt.spawn(async move {
            if let Err(e) = run_server_with_stats(config, cmd_tx, out_rx, None, server_stats).await
            {
                tracing::error!(error = %e, "pinfall feed stopped");
            }
        });

        Ok(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
            stats,
        })
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }

    pub fn client_count(&self) -> usize {
        self.stats.client_count()
    }

    pub fn controller_id(&self) -> Option<usize> {
        self.stats.controller_id()
    }
}
