//! Adapter module - pinfall feed over a TCP socket with a JSON protocol
//!
//! Lets an external pinsetter controller (or a lane simulator) report throws
//! to the running scorecard, and lets any number of observers follow the game.
//!
//! # Protocol Overview
//!
//! A **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: client connects (default: 127.0.0.1:7878)
//! 2. **Handshake**: client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: the first client to say hello becomes the
//!    controller; later clients are observers. When the controller leaves,
//!    the oldest remaining client is promoted.
//! 4. **Reporting**: the controller sends `throw` (and `control` restart)
//! 5. **Observation Streaming**: after every applied command the server
//!    broadcasts the scorecard to clients that asked for observations
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: handshake with client info and protocol version (`1.x`)
//! - **throw**: one pinfall reading, `{"pins": n}`
//! - **control**: `{"action": "restart"}` starts a fresh game
//!
//! ## Server → Client
//!
//! - **welcome**: role assignment and capabilities
//! - **ack**: the command was applied; throws carry the frame event
//! - **error**: `code` plus a human-readable message. Rejected throws use
//!   `invalid_pin_count` or `frame_overflow` and leave the game unchanged.
//! - **observation**: frames, marks, per-frame and cumulative totals
//!
//! Sequence numbers must strictly increase per client.
//!
//! # Environment Variables
//!
//! - `BOWLING_FEED_HOST`: bind address (default: "127.0.0.1")
//! - `BOWLING_FEED_PORT`: port number (default: 7878)
//! - `BOWLING_FEED_MAX_PENDING`: command queue capacity (default: 10)
//! - `BOWLING_FEED_DISABLED`: set to "1" or "true" to disable the feed
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":0,"client":{"name":"lane-3","version":"1.0"},"protocol_version":"1.0.0"}
//! Server -> Client: {"type":"welcome","seq":1,"ts":...,"protocol_version":"1.0.0","client_id":1,"role":"controller",...}
//! Server -> Client: {"type":"observation","seq":1,"ts":...,"state":"awaiting_first_throw","frames":[],...}
//! Client -> Server: {"type":"throw","seq":2,"ts":0,"pins":10}
//! Server -> Client: {"type":"ack","seq":2,"ts":...,"status":"ok","event":"frame_complete"}
//! Client -> Server: {"type":"throw","seq":3,"ts":0,"pins":11}
//! Server -> Client: {"type":"error","seq":3,"ts":...,"code":"invalid_pin_count","message":"..."}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7878
//! {"type":"hello","seq":1,"ts":0,"client":{"name":"nc","version":"0"},"protocol_version":"1.0.0"}
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;

pub use tui_bowling_core as core;
pub use tui_bowling_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use runtime::{Adapter, ClientCommand, InboundCommand, OutboundMessage};
pub use server::*;
