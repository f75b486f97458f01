//! Core scoring module - pure, deterministic, and testable
//!
//! This module contains the bowling rules: frame segmentation, throw
//! validation, and bonus resolution for strikes and spares.
//! It has **zero dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: the same throws always produce the same scorecard
//! - **Testable**: every rule is covered by unit tests beside the code
//! - **Portable**: usable from a terminal, a pinsetter bridge, or headless
//! - **Allocation-free**: frames and slots live in fixed-capacity `ArrayVec`s
//!
//! # Module Structure
//!
//! - [`frame`]: one frame's throws, kind, standing pins and scorecard marks
//! - [`machine`]: frame state machine (throw slots, frame boundaries, legality)
//! - [`ledger`]: per-throw score slots with deferred strike/spare bonuses
//! - [`engine`]: [`ScoreEngine`], the single entry point tying both together
//! - [`snapshot`]: plain-data copy of the engine state for views and adapters
//! - [`error`]: typed rejections ([`ScoreError`])
//!
//! # Game Rules
//!
//! - **Frames 1-9**: a strike ends the frame; otherwise two balls whose pins
//!   sum to at most 10
//! - **Strike**: 10 plus the next two throws, wherever they land
//! - **Spare**: 10 plus the next throw
//! - **Frame 10**: a strike or spare earns a third ball; pins re-rack after
//!   each strike or spare, and the frame scores the sum of its throws
//!
//! Unresolved bonuses stay pending; they are never estimated. The running
//! total counts only resolved throws and never decreases.
//!
//! # Example
//!
//! ```
//! use tui_bowling_core::ScoreEngine;
//! use tui_bowling_types::FrameEvent;
//!
//! let mut game = ScoreEngine::new();
//!
//! assert_eq!(game.add_throw(10).unwrap(), FrameEvent::FrameComplete);
//! assert_eq!(game.add_throw(7).unwrap(), FrameEvent::FrameContinues);
//! assert_eq!(game.add_throw(2).unwrap(), FrameEvent::FrameComplete);
//!
//! assert_eq!(game.frame_totals().as_slice(), &[Some(19), Some(9)]);
//! assert_eq!(game.total_score(), 28);
//!
//! // Out-of-range pinfall is rejected and changes nothing.
//! assert!(game.add_throw(11).is_err());
//! assert_eq!(game.total_score(), 28);
//! ```

pub mod engine;
pub mod error;
pub mod frame;
pub mod ledger;
pub mod machine;
pub mod snapshot;

pub use tui_bowling_types as types;

// Re-export commonly used types for convenience
pub use engine::ScoreEngine;
pub use error::{OverflowReason, ScoreError};
pub use frame::{Frame, Mark};
pub use ledger::{Awaiting, LedgerEntry, ScoreLedger, Slot};
pub use machine::{FrameStateMachine, Step};
pub use snapshot::{FrameSnapshot, GameSnapshot};
