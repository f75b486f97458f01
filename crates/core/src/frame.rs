//! Frame module - one scoring unit of a game
//!
//! A frame is an ordered record of the throws made in it, built incrementally
//! by the frame state machine. Frames 1-9 hold one throw (strike) or two; the
//! final frame holds two, or three when it opens with a strike or a spare.
//!
//! Throws are stored inline (`ArrayVec`), so frames never allocate.

use arrayvec::ArrayVec;

use crate::types::{FrameKind, FINAL_FRAME, MAX_FRAME_THROWS, PIN_COUNT};

/// Scorecard notation for a single throw, e.g. `X`, `/`, `-`, `7`
pub type Mark = char;

/// A single frame and the throws recorded in it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    /// 1-based ordinal
    number: u8,
    throws: ArrayVec<u8, MAX_FRAME_THROWS>,
}

impl Frame {
    /// Create an empty frame with the given 1-based ordinal
    pub fn new(number: u8) -> Self {
        debug_assert!((1..=FINAL_FRAME).contains(&number));
        Self {
            number,
            throws: ArrayVec::new(),
        }
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn throws(&self) -> &[u8] {
        &self.throws
    }

    pub fn is_final(&self) -> bool {
        self.number == FINAL_FRAME
    }

    /// Total pins knocked down in this frame (no bonuses)
    pub fn pinfall(&self) -> u32 {
        self.throws.iter().map(|&p| u32::from(p)).sum()
    }

    /// Record a throw.
    ///
    /// The state machine validates before calling; a full frame is a logic error.
    pub(crate) fn push(&mut self, pins: u8) {
        debug_assert!(!self.is_complete(), "throw pushed into a complete frame");
        self.throws.push(pins);
    }

    /// Whether the frame has received every throw it is entitled to
    pub fn is_complete(&self) -> bool {
        let t = self.throws.as_slice();
        if !self.is_final() {
            return t.first() == Some(&PIN_COUNT) || t.len() == 2;
        }
        match t {
            [_, _, _] => true,
            [first, second] => *first < PIN_COUNT && first + second < PIN_COUNT,
            _ => false,
        }
    }

    /// Frame kind, `Incomplete` until every throw is in
    ///
    /// The final frame is classified by its opening throws: `[10, 3, 4]` is
    /// a strike frame, `[6, 4, 10]` a spare frame.
    pub fn kind(&self) -> FrameKind {
        if !self.is_complete() {
            return FrameKind::Incomplete;
        }
        match self.throws.as_slice() {
            [first, ..] if *first == PIN_COUNT => FrameKind::Strike,
            [first, second, ..] if first + second == PIN_COUNT => FrameKind::Spare,
            _ => FrameKind::Open,
        }
    }

    /// Pins standing for the next throw into this frame
    ///
    /// The final frame re-racks after a strike or a completed spare.
    pub fn pins_standing(&self) -> u8 {
        if self.is_complete() {
            return 0;
        }
        match self.throws.as_slice() {
            [] => PIN_COUNT,
            [first] if *first == PIN_COUNT => PIN_COUNT,
            [first] => PIN_COUNT - first,
            // Final frame only: [10, x] or a spare.
            [first, second] if *first == PIN_COUNT => {
                if *second == PIN_COUNT {
                    PIN_COUNT
                } else {
                    PIN_COUNT - second
                }
            }
            [_, _] => PIN_COUNT,
            _ => 0,
        }
    }

    /// Scorecard notation for each throw recorded so far
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_bowling_core::ScoreEngine;
    ///
    /// let mut engine = ScoreEngine::new();
    /// engine.add_throws(&[0, 10, 10]).unwrap();
    /// let marks: Vec<char> = engine.frames()[0].marks().into_iter().collect();
    /// assert_eq!(marks, vec!['-', '/']);
    /// ```
    pub fn marks(&self) -> ArrayVec<Mark, MAX_FRAME_THROWS> {
        let mut out = ArrayVec::new();
        let mut standing = PIN_COUNT;
        let mut fresh_rack = true;

        for &pins in &self.throws {
            let mark = if fresh_rack && pins == PIN_COUNT {
                'X'
            } else if !fresh_rack && pins == standing {
                '/'
            } else if pins == 0 {
                '-'
            } else if pins >= PIN_COUNT {
                'X'
            } else {
                (b'0' + pins) as char
            };
            out.push(mark);

            if fresh_rack && pins < PIN_COUNT {
                standing = PIN_COUNT - pins;
                fresh_rack = false;
            } else {
                standing = PIN_COUNT;
                fresh_rack = true;
            }
        }
        out
    }
}
