//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (scoring core, terminal rendering, pinfall feed protocol).
//!
//! # Game Dimensions
//!
//! Standard ten-pin bowling:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FRAME_COUNT` | 10 | Frames per game |
//! | `PIN_COUNT` | 10 | Pins racked at the start of a frame |
//! | `FINAL_FRAME` | 10 | Ordinal of the frame with bonus throws |
//! | `MAX_FRAME_THROWS` | 3 | Most throws any frame can hold (frame 10) |
//! | `MAX_GAME_THROWS` | 21 | Most throws a game can hold (9 x 2 + 3) |
//! | `PERFECT_SCORE` | 300 | Twelve strikes in a row |
//!
//! # Examples
//!
//! ```
//! use tui_bowling_types::{BowlingAction, FrameEvent, ThrowState, FRAME_COUNT};
//!
//! // Parse a pinfall action (case-insensitive)
//! assert_eq!(BowlingAction::from_str("strike"), Some(BowlingAction::Strike));
//! assert_eq!(BowlingAction::from_str("7"), Some(BowlingAction::Pins(7)));
//!
//! // Wire names
//! assert_eq!(FrameEvent::GameComplete.as_str(), "game_complete");
//! assert_eq!(ThrowState::AwaitingThirdThrow.as_str(), "awaiting_third_throw");
//!
//! assert_eq!(FRAME_COUNT, 10);
//! ```

/// Frames per game
pub const FRAME_COUNT: usize = 10;

/// Pins racked at the start of every frame (and after a tenth-frame reset)
pub const PIN_COUNT: u8 = 10;

/// Ordinal (1-based) of the final frame
pub const FINAL_FRAME: u8 = 10;

/// Most throws a single frame can hold (only the final frame reaches it)
pub const MAX_FRAME_THROWS: usize = 3;

/// Most throws a complete game can hold
pub const MAX_GAME_THROWS: usize = (FRAME_COUNT - 1) * 2 + MAX_FRAME_THROWS;

/// Score of a perfect game
pub const PERFECT_SCORE: u32 = 300;

/// Terminal loop poll interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;


/// How a frame was scored
///
/// - **Strike**: all ten pins on the first throw
/// - **Spare**: all ten pins using the first two throws
/// - **Open**: pins left standing after two throws
/// - **Incomplete**: the frame still expects throws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    Strike,
    Spare,
    Open,
    Incomplete,
}

impl FrameKind {
    /// Parse frame kind from its wire name (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "strike" => Some(FrameKind::Strike),
            "spare" => Some(FrameKind::Spare),
            "open" => Some(FrameKind::Open),
            "incomplete" => Some(FrameKind::Incomplete),
            _ => None,
        }
    }

    /// Convert to lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameKind::Strike => "strike",
            FrameKind::Spare => "spare",
            FrameKind::Open => "open",
            FrameKind::Incomplete => "incomplete",
        }
    }

    /// Number of later throws whose pins count toward this frame's score
    ///
    /// Only meaningful for frames 1-9; the final frame never borrows throws.
    pub fn bonus_throws(&self) -> usize {
        match self {
            FrameKind::Strike => 2,
            FrameKind::Spare => 1,
            FrameKind::Open | FrameKind::Incomplete => 0,
        }
    }
}

/// Signal returned for every accepted throw
///
/// The pinsetter reacts to it:
/// - **FrameContinues**: same frame, more throws expected (leave standing pins,
///   unless the final frame just reset after a strike or spare)
/// - **FrameComplete**: re-rack for the next frame
/// - **GameComplete**: the game is over, show the final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameEvent {
    FrameContinues,
    FrameComplete,
    GameComplete,
}

impl FrameEvent {
    /// Convert to snake_case wire name
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_bowling_types::FrameEvent;
    ///
    /// assert_eq!(FrameEvent::FrameContinues.as_str(), "frame_continues");
    /// assert_eq!(FrameEvent::FrameComplete.as_str(), "frame_complete");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameEvent::FrameContinues => "frame_continues",
            FrameEvent::FrameComplete => "frame_complete",
            FrameEvent::GameComplete => "game_complete",
        }
    }
}

/// Which throw slot the frame state machine expects next
///
/// `AwaitingThirdThrow` is reachable only in the final frame, after a strike
/// or a spare on its first two throws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThrowState {
    AwaitingFirstThrow,
    AwaitingSecondThrow,
    AwaitingThirdThrow,
    GameComplete,
}

impl ThrowState {
    /// Parse throw state from its wire name (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "awaiting_first_throw" => Some(ThrowState::AwaitingFirstThrow),
            "awaiting_second_throw" => Some(ThrowState::AwaitingSecondThrow),
            "awaiting_third_throw" => Some(ThrowState::AwaitingThirdThrow),
            "game_complete" => Some(ThrowState::GameComplete),
            _ => None,
        }
    }

    /// Convert to snake_case wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ThrowState::AwaitingFirstThrow => "awaiting_first_throw",
            ThrowState::AwaitingSecondThrow => "awaiting_second_throw",
            ThrowState::AwaitingThirdThrow => "awaiting_third_throw",
            ThrowState::GameComplete => "game_complete",
        }
    }

    /// 1-based ball number within the frame, `None` once the game is over
    pub fn ball_number(&self) -> Option<u8> {
        match self {
            ThrowState::AwaitingFirstThrow => Some(1),
            ThrowState::AwaitingSecondThrow => Some(2),
            ThrowState::AwaitingThirdThrow => Some(3),
            ThrowState::GameComplete => None,
        }
    }
}

/// Actions that feed or control a game
///
/// Used by both keyboard input and the pinfall feed protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BowlingAction {
    /// Record an exact pinfall
    Pins(u8),
    /// Record all pins standing on the first ball of a rack
    Strike,
    /// Record every pin still standing (completes a spare)
    Spare,
    /// Discard the current game and start a new one
    Restart,
}

impl BowlingAction {
    /// Parse action from string (for the feed protocol and key bindings)
    ///
    /// Accepts pin counts `"0"`..=`"10"` plus the names `strike`/`x`,
    /// `spare`/`/`, `gutter`/`-` and `restart`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_bowling_types::BowlingAction;
    ///
    /// assert_eq!(BowlingAction::from_str("x"), Some(BowlingAction::Strike));
    /// assert_eq!(BowlingAction::from_str("-"), Some(BowlingAction::Pins(0)));
    /// assert_eq!(BowlingAction::from_str("12"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(pins) = s.parse::<u8>() {
            return (pins <= PIN_COUNT).then_some(BowlingAction::Pins(pins));
        }
        match s.to_lowercase().as_str() {
            "strike" | "x" => Some(BowlingAction::Strike),
            "spare" | "/" => Some(BowlingAction::Spare),
            "gutter" | "-" => Some(BowlingAction::Pins(0)),
            "restart" => Some(BowlingAction::Restart),
            _ => None,
        }
    }
}
