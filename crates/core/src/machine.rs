//! Frame state machine - throw slots, frame boundaries and pin legality
//!
//! The machine decides where each throw lands. It owns the ordered list of
//! [`Frame`] records (never more than ten) and the [`ThrowState`] that says
//! which ball is expected next.
//!
//! Validation ([`FrameStateMachine::check`]) is separate from mutation
//! ([`FrameStateMachine::advance`]) so a rejected throw leaves the machine
//! untouched.

use arrayvec::ArrayVec;

use crate::error::{OverflowReason, ScoreError};
use crate::frame::Frame;
use crate::types::{FrameEvent, FrameKind, ThrowState, FINAL_FRAME, FRAME_COUNT, PIN_COUNT};

/// Outcome of one accepted throw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub event: FrameEvent,
    /// Ordinal of the frame the throw landed in
    pub frame: u8,
    /// Set when this throw completed the frame
    pub completed: Option<FrameKind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameStateMachine {
    state: ThrowState,
    /// Ordinal of the frame receiving the next throw (stays at 10 once complete).
    current: u8,
    frames: ArrayVec<Frame, FRAME_COUNT>,
}

impl Default for FrameStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStateMachine {
    pub fn new() -> Self {
        Self {
            state: ThrowState::AwaitingFirstThrow,
            current: 1,
            frames: ArrayVec::new(),
        }
    }

    pub fn state(&self) -> ThrowState {
        self.state
    }

    pub fn current_frame(&self) -> u8 {
        self.current
    }

    /// Frames started so far, in order
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn is_game_complete(&self) -> bool {
        self.state == ThrowState::GameComplete
    }

    fn is_final(&self) -> bool {
        self.current == FINAL_FRAME
    }

    /// The frame currently receiving throws, if it has been started
    fn open_frame(&self) -> Option<&Frame> {
        self.frames
            .last()
            .filter(|f| f.number() == self.current && !f.is_complete())
    }

    /// Pins the pinsetter should present for the next throw
    pub fn pins_standing(&self) -> u8 {
        match self.state {
            ThrowState::GameComplete => 0,
            ThrowState::AwaitingFirstThrow => PIN_COUNT,
            ThrowState::AwaitingSecondThrow | ThrowState::AwaitingThirdThrow => self
                .open_frame()
                .map(Frame::pins_standing)
                .unwrap_or(PIN_COUNT),
        }
    }

    /// Validate a raw pin count against the current slot without mutating.
    ///
    /// Returns the pin count narrowed to `u8` on success.
    pub fn check(&self, pins: i32) -> Result<u8, ScoreError> {
        let pins = u8::try_from(pins)
            .ok()
            .filter(|&p| p <= PIN_COUNT)
            .ok_or(ScoreError::InvalidPinCount { pins })?;

        match self.state {
            ThrowState::GameComplete => Err(ScoreError::FrameOverflow {
                frame: self.current,
                reason: OverflowReason::GameComplete,
            }),
            ThrowState::AwaitingFirstThrow | ThrowState::AwaitingThirdThrow => Ok(pins),
            ThrowState::AwaitingSecondThrow => {
                let first = self
                    .open_frame()
                    .and_then(|f| f.throws().first().copied())
                    .unwrap_or(0);
                // A tenth-frame strike re-racks, so the second ball is unconstrained.
                if self.is_final() && first == PIN_COUNT {
                    return Ok(pins);
                }
                let standing = PIN_COUNT - first;
                if pins > standing {
                    return Err(ScoreError::FrameOverflow {
                        frame: self.current,
                        reason: OverflowReason::PinSum { standing, pins },
                    });
                }
                Ok(pins)
            }
        }
    }

    /// Record a throw that already passed [`check`](Self::check).
    pub fn advance(&mut self, pins: u8) -> Step {
        let frame = self.current;

        match self.state {
            ThrowState::GameComplete => {
                debug_assert!(false, "advance called after game completion");
                return Step {
                    event: FrameEvent::GameComplete,
                    frame,
                    completed: None,
                };
            }
            ThrowState::AwaitingFirstThrow => {
                let mut f = Frame::new(frame);
                f.push(pins);
                self.frames.push(f);
            }
            ThrowState::AwaitingSecondThrow | ThrowState::AwaitingThirdThrow => {
                if let Some(f) = self.frames.last_mut() {
                    f.push(pins);
                }
            }
        }

        let (kind, complete) = self
            .frames
            .last()
            .map(|f| (f.kind(), f.is_complete()))
            .unwrap_or((FrameKind::Incomplete, false));

        if !complete {
            self.state = match self.state {
                ThrowState::AwaitingFirstThrow => ThrowState::AwaitingSecondThrow,
                _ => ThrowState::AwaitingThirdThrow,
            };
            return Step {
                event: FrameEvent::FrameContinues,
                frame,
                completed: None,
            };
        }

        let event = if self.is_final() {
            self.state = ThrowState::GameComplete;
            FrameEvent::GameComplete
        } else {
            self.current += 1;
            self.state = ThrowState::AwaitingFirstThrow;
            FrameEvent::FrameComplete
        };

        Step {
            event,
            frame,
            completed: Some(kind),
        }
    }

    /// Validate and record a throw.
    pub fn add_throw(&mut self, pins: i32) -> Result<Step, ScoreError> {
        let pins = self.check(pins)?;
        Ok(self.advance(pins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(m: &mut FrameStateMachine, throws: &[i32]) -> Step {
        let mut last = None;
        for &t in throws {
            last = Some(m.add_throw(t).unwrap());
        }
        last.unwrap()
    }

    #[test]
    fn test_new_machine() {
        let m = FrameStateMachine::new();
        assert_eq!(m.state(), ThrowState::AwaitingFirstThrow);
        assert_eq!(m.current_frame(), 1);
        assert!(m.frames().is_empty());
        assert!(!m.is_game_complete());
        assert_eq!(m.pins_standing(), 10);
    }

    #[test]
    fn test_strike_completes_regular_frame() {
        let mut m = FrameStateMachine::new();
        let step = m.add_throw(10).unwrap();
        assert_eq!(step.event, FrameEvent::FrameComplete);
        assert_eq!(step.frame, 1);
        assert_eq!(step.completed, Some(FrameKind::Strike));
        assert_eq!(m.current_frame(), 2);
        assert_eq!(m.state(), ThrowState::AwaitingFirstThrow);
    }

    #[test]
    fn test_two_ball_frame() {
        let mut m = FrameStateMachine::new();
        let step = m.add_throw(3).unwrap();
        assert_eq!(step.event, FrameEvent::FrameContinues);
        assert_eq!(m.state(), ThrowState::AwaitingSecondThrow);
        assert_eq!(m.pins_standing(), 7);

        let step = m.add_throw(7).unwrap();
        assert_eq!(step.event, FrameEvent::FrameComplete);
        assert_eq!(step.completed, Some(FrameKind::Spare));
        assert_eq!(m.current_frame(), 2);
    }

    #[test]
    fn test_pin_sum_overflow_rejected_without_mutation() {
        let mut m = FrameStateMachine::new();
        m.add_throw(6).unwrap();
        let before = m.clone();

        let err = m.add_throw(5).unwrap_err();
        assert_eq!(
            err,
            ScoreError::FrameOverflow {
                frame: 1,
                reason: OverflowReason::PinSum {
                    standing: 4,
                    pins: 5
                }
            }
        );
        assert_eq!(m, before);
    }

    #[test]
    fn test_invalid_pin_counts() {
        let mut m = FrameStateMachine::new();
        assert_eq!(
            m.add_throw(11).unwrap_err(),
            ScoreError::InvalidPinCount { pins: 11 }
        );
        assert_eq!(
            m.add_throw(-1).unwrap_err(),
            ScoreError::InvalidPinCount { pins: -1 }
        );
        assert_eq!(
            m.add_throw(i32::MAX).unwrap_err(),
            ScoreError::InvalidPinCount { pins: i32::MAX }
        );
        assert!(m.frames().is_empty());
    }

    #[test]
    fn test_final_frame_open_ends_game_after_two() {
        let mut m = FrameStateMachine::new();
        feed(&mut m, &[10; 9]);
        assert_eq!(m.current_frame(), 10);

        assert_eq!(m.add_throw(3).unwrap().event, FrameEvent::FrameContinues);
        let step = m.add_throw(4).unwrap();
        assert_eq!(step.event, FrameEvent::GameComplete);
        assert_eq!(step.completed, Some(FrameKind::Open));
        assert!(m.is_game_complete());
        assert_eq!(m.frames().len(), 10);
    }

    #[test]
    fn test_final_frame_strike_allows_unconstrained_bonus_balls() {
        let mut m = FrameStateMachine::new();
        feed(&mut m, &[0; 18]);
        assert_eq!(m.current_frame(), 10);

        assert_eq!(m.add_throw(10).unwrap().event, FrameEvent::FrameContinues);
        assert_eq!(m.state(), ThrowState::AwaitingSecondThrow);
        assert_eq!(m.pins_standing(), 10);

        assert_eq!(m.add_throw(8).unwrap().event, FrameEvent::FrameContinues);
        assert_eq!(m.state(), ThrowState::AwaitingThirdThrow);
        assert_eq!(m.pins_standing(), 2);

        // No cross-throw cap on the bonus ball.
        let step = m.add_throw(9).unwrap();
        assert_eq!(step.event, FrameEvent::GameComplete);
        assert_eq!(step.completed, Some(FrameKind::Strike));
    }

    #[test]
    fn test_final_frame_spare_earns_third_ball() {
        let mut m = FrameStateMachine::new();
        feed(&mut m, &[0; 18]);
        m.add_throw(6).unwrap();
        assert!(m.add_throw(5).is_err());
        m.add_throw(4).unwrap();
        assert_eq!(m.state(), ThrowState::AwaitingThirdThrow);
        assert_eq!(m.pins_standing(), 10);

        let step = m.add_throw(10).unwrap();
        assert_eq!(step.event, FrameEvent::GameComplete);
        assert_eq!(step.completed, Some(FrameKind::Spare));
    }

    #[test]
    fn test_throw_after_game_complete_is_overflow() {
        let mut m = FrameStateMachine::new();
        feed(&mut m, &[10; 12]);
        assert!(m.is_game_complete());
        let before = m.clone();

        assert_eq!(
            m.add_throw(0).unwrap_err(),
            ScoreError::FrameOverflow {
                frame: 10,
                reason: OverflowReason::GameComplete
            }
        );
        assert_eq!(m, before);
        assert_eq!(m.pins_standing(), 0);
    }

    #[test]
    fn test_never_more_than_ten_frames() {
        let mut m = FrameStateMachine::new();
        for _ in 0..30 {
            let _ = m.add_throw(1);
        }
        assert_eq!(m.frames().len(), 10);
        assert!(m.frames().iter().all(|f| f.number() <= FINAL_FRAME));
    }
}
