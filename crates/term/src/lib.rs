//! Terminal scorecard module.
//!
//! A small rendering layer for the bowling scorecard. It avoids widget
//! toolkits and instead renders into a plain framebuffer that is diffed and
//! flushed to the terminal through crossterm.
//!
//! - [`fb`]: styled cell framebuffer
//! - [`scorecard_view`]: pure `GameSnapshot` to framebuffer mapping
//! - [`renderer`]: terminal setup/teardown and diff flushing

pub mod fb;
pub mod renderer;
pub mod scorecard_view;

pub use tui_bowling_core as core;
pub use tui_bowling_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::{diff_runs, encode_diff_into, encode_full_into, Run, TerminalRenderer};
pub use scorecard_view::{
    AnchorY, FeedStatusView, ScorecardView, Viewport, CARD_HEIGHT, CARD_WIDTH,
};
