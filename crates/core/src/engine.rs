//! Score engine module - the public entry point for a single game
//!
//! This module ties the frame state machine and the score ledger together.
//! Each throw is validated by the state machine, recorded into the current
//! frame, then appended to the ledger, which resolves any pending bonuses
//! before the frame event is returned.

use std::fmt;

use arrayvec::ArrayVec;

use crate::error::ScoreError;
use crate::frame::Frame;
use crate::ledger::ScoreLedger;
use crate::machine::FrameStateMachine;
use crate::snapshot::{FrameSnapshot, GameSnapshot};
use crate::types::{FrameEvent, ThrowState, FINAL_FRAME, FRAME_COUNT};

/// Complete scoring state of one game
#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    machine: FrameStateMachine,
    ledger: ScoreLedger,
    /// Monotonic game id (increments on reset).
    episode_id: u32,
    /// Event returned by the most recent accepted throw.
    last_event: Option<FrameEvent>,
}

impl ScoreEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one throw.
    ///
    /// On error nothing changes: the throw is simply not counted.
    pub fn add_throw(&mut self, pins: i32) -> Result<FrameEvent, ScoreError> {
        let pins = self.machine.check(pins)?;
        let opens_frame = self.machine.state() == ThrowState::AwaitingFirstThrow;
        let step = self.machine.advance(pins);

        self.ledger.record(step.frame, pins, opens_frame);
        if let Some(kind) = step.completed {
            self.ledger
                .close_frame(step.frame, kind, step.frame == FINAL_FRAME);
            tracing::debug!(
                frame = step.frame,
                kind = kind.as_str(),
                total = self.ledger.total_score(),
                "frame complete"
            );
        }

        self.last_event = Some(step.event);
        Ok(step.event)
    }

    /// Record a sequence of throws, stopping at the first rejection.
    ///
    /// Throws before the rejected one stay recorded. Returns the event of the
    /// last throw, or `None` for an empty slice.
    pub fn add_throws(&mut self, throws: &[i32]) -> Result<Option<FrameEvent>, ScoreError> {
        let mut last = None;
        for &pins in throws {
            last = Some(self.add_throw(pins)?);
        }
        Ok(last)
    }

    /// Discard the current game and start a fresh one.
    pub fn reset(&mut self) {
        self.machine = FrameStateMachine::new();
        self.ledger = ScoreLedger::new();
        self.last_event = None;
        self.episode_id = self.episode_id.wrapping_add(1);
    }

    /// Score per frame so far, `None` where a bonus is still outstanding.
    pub fn frame_totals(&self) -> ArrayVec<Option<u32>, FRAME_COUNT> {
        self.ledger.frame_totals()
    }

    /// Running score per frame; `None` from the first unresolved frame on.
    pub fn cumulative_totals(&self) -> ArrayVec<Option<u32>, FRAME_COUNT> {
        let mut running = Some(0u32);
        self.frame_totals()
            .into_iter()
            .map(|total| {
                running = running.zip(total).map(|(acc, t)| acc + t);
                running
            })
            .collect()
    }

    /// Sum of every resolved slot (a live total while the game is running).
    pub fn total_score(&self) -> u32 {
        self.ledger.total_score()
    }

    /// Final score, once the game is over and every bonus is resolved.
    pub fn final_score(&self) -> Option<u32> {
        (self.is_game_complete() && self.ledger.is_fully_resolved())
            .then(|| self.ledger.total_score())
    }

    pub fn is_game_complete(&self) -> bool {
        self.machine.is_game_complete()
    }

    pub fn state(&self) -> ThrowState {
        self.machine.state()
    }

    pub fn current_frame(&self) -> u8 {
        self.machine.current_frame()
    }

    pub fn frames(&self) -> &[Frame] {
        self.machine.frames()
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    pub fn pins_standing(&self) -> u8 {
        self.machine.pins_standing()
    }

    pub fn throw_count(&self) -> usize {
        self.ledger.len()
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn last_event(&self) -> Option<FrameEvent> {
        self.last_event
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        let totals = self.frame_totals();
        let cumulative = self.cumulative_totals();

        out.frames.clear();
        for (i, frame) in self.frames().iter().enumerate() {
            out.frames.push(FrameSnapshot::from_frame(
                frame,
                totals.get(i).copied().flatten(),
                cumulative.get(i).copied().flatten(),
            ));
        }
        out.state = self.state();
        out.current_frame = self.current_frame();
        out.pins_standing = self.pins_standing();
        out.total_score = self.total_score();
        out.final_score = self.final_score();
        out.game_complete = self.is_game_complete();
        out.episode_id = self.episode_id;
        out.throw_count = self.throw_count() as u32;
        out.last_event = self.last_event;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Human-readable per-frame breakdown.
    ///
    /// One line per frame with its marks and cumulative score (`pending` while
    /// a bonus is outstanding), followed by the running total.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ScoreEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cumulative = self.cumulative_totals();
        for (frame, score) in self.frames().iter().zip(cumulative) {
            let mut marks = String::with_capacity(6);
            for (i, mark) in frame.marks().into_iter().enumerate() {
                if i > 0 {
                    marks.push(' ');
                }
                marks.push(mark);
            }
            write!(f, "Frame {:>2}: {:<6}", frame.number(), marks)?;
            match score {
                Some(score) => writeln!(f, "{score:>4}")?,
                None => writeln!(f, " pending")?,
            }
        }

        write!(f, "Total: {}", self.total_score())?;
        if self.final_score().is_some() {
            f.write_str(" (final)")?;
        }
        writeln!(f)
    }
}
