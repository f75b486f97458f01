//! TCP server for the pinfall feed
//!
//! Handles incoming connections and manages client lifecycle. The server
//! never touches the score engine: throws are forwarded to the game loop over
//! a bounded channel, and acks/observations come back on an outbound one.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};

use crate::protocol::*;
use crate::runtime::{ClientCommand, InboundCommand, OutboundMessage};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7878;
pub const DEFAULT_MAX_PENDING: usize = 10;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Capacity of the command queue into the game loop.
    pub max_pending_commands: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_pending_commands: DEFAULT_MAX_PENDING,
        }
    }
}

impl ServerConfig {
    /// Create from `BOWLING_FEED_*` environment variables.
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("BOWLING_FEED_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = lookup("BOWLING_FEED_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let max_pending_commands = lookup("BOWLING_FEED_MAX_PENDING")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_PENDING);

        Self {
            host,
            port,
            max_pending_commands,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid feed address {}:{}", self.host, self.port))
    }
}

/// Connection counters readable from the game loop without locking.
#[derive(Debug, Default)]
pub struct FeedStats {
    clients: AtomicUsize,
    /// Controller client id, 0 when nobody holds control.
    controller: AtomicUsize,
}

impl FeedStats {
    pub fn client_count(&self) -> usize {
        self.clients.load(Ordering::Relaxed)
    }

    pub fn controller_id(&self) -> Option<usize> {
        match self.controller.load(Ordering::Relaxed) {
            0 => None,
            id => Some(id),
        }
    }

    fn set_controller(&self, id: Option<usize>) {
        self.controller.store(id.unwrap_or(0), Ordering::Relaxed);
    }
}

/// Shared server state
pub struct ServerState {
    clients: RwLock<Vec<ClientHandle>>,
    controller: RwLock<Option<usize>>,
    stats: Arc<FeedStats>,
}

impl ServerState {
    pub fn new(stats: Arc<FeedStats>) -> Self {
        Self {
            clients: RwLock::new(Vec::new()),
            controller: RwLock::new(None),
            stats,
        }
    }

    /// Check if the feed is disabled via `BOWLING_FEED_DISABLED`.
    pub fn is_disabled() -> bool {
        std::env::var("BOWLING_FEED_DISABLED")
            .map(|v| is_truthy(&v))
            .unwrap_or(false)
    }

    async fn send_to(&self, client_id: usize, msg: ClientOutbound) {
        let clients = self.clients.read().await;
        if let Some(c) = clients.iter().find(|c| c.id == client_id) {
            let _ = c.tx.send(msg);
        }
    }

    async fn is_handshaken(&self, client_id: usize) -> bool {
        let clients = self.clients.read().await;
        clients
            .iter()
            .any(|c| c.id == client_id && c.handshaken)
    }

    async fn is_controller(&self, client_id: usize) -> bool {
        *self.controller.read().await == Some(client_id)
    }

    /// Record `seq` if it is strictly greater than the client's last one.
    async fn accept_seq(&self, client_id: usize, seq: u64) -> bool {
        let mut clients = self.clients.write().await;
        let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
            return false;
        };
        match client.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                client.last_seq = Some(seq);
                true
            }
        }
    }
}

fn is_truthy(v: &str) -> bool {
    let v = v.trim();
    v == "1" || v.eq_ignore_ascii_case("true")
}

/// Handle to a connected client
pub struct ClientHandle {
    pub id: usize,
    pub addr: SocketAddr,
    pub stream_observations: bool,
    pub handshaken: bool,
    pub last_seq: Option<u64>,
    pub tx: mpsc::UnboundedSender<ClientOutbound>,
}

/// Messages queued for one client's writer task.
#[derive(Debug, Clone)]
pub enum ClientOutbound {
    Welcome(WelcomeMessage),
    Ack(AckMessage),
    Error(ErrorMessage),
    Observation(ObservationMessage),
}

/// Start the TCP server.
///
/// `ready_tx` receives the bound address (useful with port 0).
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    run_server_with_stats(config, command_tx, out_rx, ready_tx, Arc::default()).await
}

pub async fn run_server_with_stats(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
    stats: Arc<FeedStats>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind pinfall feed on {addr}"))?;
    let bound = listener.local_addr()?;
    tracing::info!(%bound, "pinfall feed listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new(stats));
    let mut client_id_counter = 0usize;

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                match msg {
                    OutboundMessage::ToClientAck { client_id, ack } => {
                        state.send_to(client_id, ClientOutbound::Ack(ack)).await;
                    }
                    OutboundMessage::ToClientError { client_id, err } => {
                        state.send_to(client_id, ClientOutbound::Error(err)).await;
                    }
                    OutboundMessage::ToClientObservation { client_id, obs } => {
                        state
                            .send_to(client_id, ClientOutbound::Observation(obs))
                            .await;
                    }
                    OutboundMessage::BroadcastObservation { obs } => {
                        let clients = state.clients.read().await;
                        for c in clients.iter() {
                            if c.handshaken && c.stream_observations {
                                let _ = c.tx.send(ClientOutbound::Observation(obs.clone()));
                            }
                        }
                    }
                }
            }
        });
    }

    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;
        tracing::info!(client_id, %addr, "feed client connected");

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, addr, client_id, state, command_tx).await {
                tracing::warn!(client_id, error = %e, "feed client error");
            }
            tracing::info!(client_id, "feed client disconnected");
        });
    }
}

async fn handle_client(
    socket: TcpStream,
    addr: SocketAddr,
    client_id: usize,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
) -> anyhow::Result<()> {
    let (reader, writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);
    let (tx, rx) = mpsc::unbounded_channel::<ClientOutbound>();

    {
        let mut clients = state.clients.write().await;
        clients.push(ClientHandle {
            id: client_id,
            addr,
            stream_observations: false,
            handshaken: false,
            last_seq: None,
            tx: tx.clone(),
        });
        state.stats.clients.store(clients.len(), Ordering::Relaxed);
    }

    let write_task = tokio::spawn(write_loop(writer, rx));

    let result = read_loop(&mut reader, client_id, &state, &command_tx, &tx).await;

    disconnect(&state, client_id).await;
    drop(tx);
    let _ = write_task.await;
    result
}

async fn read_loop<R>(
    reader: &mut BufReader<R>,
    client_id: usize,
    state: &ServerState,
    command_tx: &mpsc::Sender<InboundCommand>,
    tx: &mpsc::UnboundedSender<ClientOutbound>,
) -> anyhow::Result<()>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let reply_error = |seq: u64, code: ErrorCode, message: &str| {
        let _ = tx.send(ClientOutbound::Error(create_error(seq, code, message)));
    };

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(());
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        tracing::trace!(client_id, line = trimmed, "feed recv");

        let (seq, command) = match parse_message(trimmed) {
            Ok(ParsedMessage::Hello(hello)) => {
                if state.is_handshaken(client_id).await
                    && !state.accept_seq(client_id, hello.seq).await
                {
                    reply_error(hello.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }
                if !hello.protocol_version.starts_with(PROTOCOL_MAJOR) {
                    reply_error(
                        hello.seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("protocol version {} not supported", hello.protocol_version),
                    );
                    return Ok(());
                }
                welcome(state, client_id, &hello, tx).await;
                // Waits for queue space: a streaming client always gets its
                // first observation.
                if hello.requested.stream_observations
                    && command_tx
                        .send(InboundCommand {
                            client_id,
                            seq: hello.seq,
                            command: ClientCommand::SnapshotRequest,
                        })
                        .await
                        .is_err()
                {
                    tracing::debug!(client_id, "game loop gone, no initial observation");
                }
                continue;
            }
            Ok(ParsedMessage::Throw(msg)) => {
                let pins = msg.pins.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
                (msg.seq, ClientCommand::Throw(pins))
            }
            Ok(ParsedMessage::Control(msg)) => match msg.action {
                ControlAction::Restart => (msg.seq, ClientCommand::Restart),
            },
            Ok(ParsedMessage::Unknown(msg)) => {
                if !state.is_handshaken(client_id).await {
                    reply_error(msg.seq, ErrorCode::HandshakeRequired, "send hello first");
                } else if !state.accept_seq(client_id, msg.seq).await {
                    reply_error(msg.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                } else {
                    reply_error(msg.seq, ErrorCode::InvalidCommand, "unknown message type");
                }
                continue;
            }
            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                reply_error(seq, ErrorCode::InvalidCommand, &format!("JSON parse error: {e}"));
                continue;
            }
        };

        if !state.is_handshaken(client_id).await {
            reply_error(seq, ErrorCode::HandshakeRequired, "send hello first");
            continue;
        }
        if !state.accept_seq(client_id, seq).await {
            reply_error(seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
            continue;
        }
        if !state.is_controller(client_id).await {
            reply_error(seq, ErrorCode::NotController, "only the controller may report pinfall");
            continue;
        }

        // Acks are sent by the game loop once the command has been applied.
        if command_tx
            .try_send(InboundCommand {
                client_id,
                seq,
                command,
            })
            .is_err()
        {
            tracing::debug!(client_id, seq, "feed command queue full");
            reply_error(seq, ErrorCode::Backpressure, "command queue is full");
        }
    }
}

/// Complete the handshake: assign a role and send `welcome`.
async fn welcome(
    state: &ServerState,
    client_id: usize,
    hello: &HelloMessage,
    tx: &mpsc::UnboundedSender<ClientOutbound>,
) {
    let mut controller = state.controller.write().await;
    let mut clients = state.clients.write().await;
    if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
        client.handshaken = true;
        client.last_seq = Some(hello.seq);
        client.stream_observations = hello.requested.stream_observations;
    }

    if controller.is_none() {
        *controller = Some(client_id);
        state.stats.set_controller(*controller);
        tracing::info!(client_id, client = %hello.client.name, "feed controller assigned");
    }
    let role = if *controller == Some(client_id) {
        AssignedRole::Controller
    } else {
        AssignedRole::Observer
    };

    let _ = tx.send(ClientOutbound::Welcome(create_welcome(
        hello.seq,
        client_id as u64,
        role,
        controller.map(|id| id as u64),
    )));
}

/// Remove a client and hand control to the oldest remaining handshaken one.
async fn disconnect(state: &ServerState, client_id: usize) {
    let mut controller = state.controller.write().await;
    let mut clients = state.clients.write().await;
    clients.retain(|c| c.id != client_id);
    state.stats.clients.store(clients.len(), Ordering::Relaxed);

    if *controller == Some(client_id) {
        *controller = clients
            .iter()
            .filter(|c| c.handshaken)
            .map(|c| c.id)
            .min();
        state.stats.set_controller(*controller);
        match *controller {
            Some(next) => tracing::info!(client_id = next, "feed controller promoted"),
            None => tracing::info!(client_id, "feed controller released"),
        }
    }
}

async fn write_loop<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<ClientOutbound>)
where
    W: AsyncWrite + Unpin,
{
    let mut buf: Vec<u8> = Vec::with_capacity(4096);
    while let Some(msg) = rx.recv().await {
        buf.clear();
        let encoded = match &msg {
            ClientOutbound::Welcome(m) => encode_line(&mut buf, m),
            ClientOutbound::Ack(m) => encode_line(&mut buf, m),
            ClientOutbound::Error(m) => encode_line(&mut buf, m),
            ClientOutbound::Observation(m) => encode_line(&mut buf, m),
        };
        if let Err(e) = encoded {
            tracing::warn!(error = %e, "failed to encode feed message");
            continue;
        }
        if writer.write_all(&buf).await.is_err() || writer.flush().await.is_err() {
            break;
        }
    }
}

fn encode_line<T: Serialize>(buf: &mut Vec<u8>, msg: &T) -> serde_json::Result<()> {
    serde_json::to_writer(&mut *buf, msg)?;
    buf.push(b'\n');
    Ok(())
}
