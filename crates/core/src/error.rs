//! Typed rejections for throws the engine refuses.
//!
//! Every error here is a caller contract violation (the pinfall source
//! produced a throw that cannot happen). A rejected throw never mutates
//! engine state, so callers can log and carry on.

use std::fmt;

use thiserror::Error;

/// Why a throw was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScoreError {
    /// Pin count outside `0..=10`.
    #[error("invalid pin count {pins}: expected 0..=10")]
    InvalidPinCount { pins: i32 },

    /// The throw does not fit in the frame (or the game is already over).
    #[error("frame {frame} overflow: {reason}")]
    FrameOverflow { frame: u8, reason: OverflowReason },
}

impl ScoreError {
    /// Stable snake_case code used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            ScoreError::InvalidPinCount { .. } => "invalid_pin_count",
            ScoreError::FrameOverflow { .. } => "frame_overflow",
        }
    }
}

/// Detail for [`ScoreError::FrameOverflow`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowReason {
    /// More pins than were standing.
    PinSum { standing: u8, pins: u8 },
    /// The final frame is finished; nothing more can be thrown.
    GameComplete,
}

impl fmt::Display for OverflowReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowReason::PinSum { standing, pins } => {
                write!(f, "{pins} pins thrown but only {standing} standing")
            }
            OverflowReason::GameComplete => write!(f, "game is already complete"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(
            ScoreError::InvalidPinCount { pins: 11 }.code(),
            "invalid_pin_count"
        );
        assert_eq!(
            ScoreError::FrameOverflow {
                frame: 10,
                reason: OverflowReason::GameComplete
            }
            .code(),
            "frame_overflow"
        );
    }

    #[test]
    fn error_messages_name_the_problem() {
        let err = ScoreError::InvalidPinCount { pins: -1 };
        assert_eq!(err.to_string(), "invalid pin count -1: expected 0..=10");

        let err = ScoreError::FrameOverflow {
            frame: 3,
            reason: OverflowReason::PinSum {
                standing: 4,
                pins: 7,
            },
        };
        assert_eq!(
            err.to_string(),
            "frame 3 overflow: 7 pins thrown but only 4 standing"
        );
    }
}
