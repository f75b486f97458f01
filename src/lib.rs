//! TUI Bowling (workspace facade crate).
//!
//! Re-exports the workspace crates as `tui_bowling::{core,adapter,term,input,types}`
//! and hosts the session glue shared by the binary and the integration tests.

pub mod headless;
pub mod session;

pub use tui_bowling_adapter as adapter;
pub use tui_bowling_core as core;
pub use tui_bowling_input as input;
pub use tui_bowling_term as term;
pub use tui_bowling_types as types;

pub use session::Session;
