use arrayvec::ArrayVec;

use crate::frame::Frame;
use crate::types::{FrameEvent, FrameKind, ThrowState, FRAME_COUNT, MAX_FRAME_THROWS, PIN_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameSnapshot {
    pub number: u8,
    pub throws: [Option<u8>; MAX_FRAME_THROWS],
    pub marks: [Option<char>; MAX_FRAME_THROWS],
    pub kind: FrameKind,
    /// Frame score, `None` while a bonus is outstanding.
    pub total: Option<u32>,
    /// Running score through this frame.
    pub cumulative: Option<u32>,
}

impl FrameSnapshot {
    pub fn from_frame(frame: &Frame, total: Option<u32>, cumulative: Option<u32>) -> Self {
        let mut throws = [None; MAX_FRAME_THROWS];
        for (slot, &pins) in throws.iter_mut().zip(frame.throws()) {
            *slot = Some(pins);
        }
        let mut marks = [None; MAX_FRAME_THROWS];
        for (slot, mark) in marks.iter_mut().zip(frame.marks()) {
            *slot = Some(mark);
        }
        Self {
            number: frame.number(),
            throws,
            marks,
            kind: frame.kind(),
            total,
            cumulative,
        }
    }

    pub fn throw_count(&self) -> usize {
        self.throws.iter().take_while(|t| t.is_some()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub frames: ArrayVec<FrameSnapshot, FRAME_COUNT>,
    pub state: ThrowState,
    pub current_frame: u8,
    pub pins_standing: u8,
    pub total_score: u32,
    pub final_score: Option<u32>,
    pub game_complete: bool,
    pub episode_id: u32,
    pub throw_count: u32,
    pub last_event: Option<FrameEvent>,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.frames.clear();
        self.state = ThrowState::AwaitingFirstThrow;
        self.current_frame = 1;
        self.pins_standing = PIN_COUNT;
        self.total_score = 0;
        self.final_score = None;
        self.game_complete = false;
        self.episode_id = 0;
        self.throw_count = 0;
        self.last_event = None;
    }

    pub fn playable(&self) -> bool {
        !self.game_complete
    }

    /// Snapshot for a frame ordinal (1-based), if that frame has started
    pub fn frame(&self, number: u8) -> Option<&FrameSnapshot> {
        self.frames.iter().find(|f| f.number == number)
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            frames: ArrayVec::new(),
            state: ThrowState::AwaitingFirstThrow,
            current_frame: 1,
            pins_standing: PIN_COUNT,
            total_score: 0,
            final_score: None,
            game_complete: false,
            episode_id: 0,
            throw_count: 0,
            last_event: None,
        };
        s.clear();
        s
    }
}

#[cfg(test)]
mod tests {
    use crate::ScoreEngine;

    use super::*;

    #[test]
    fn test_default_snapshot_is_fresh_game() {
        let snap = GameSnapshot::default();
        assert!(snap.frames.is_empty());
        assert!(snap.playable());
        assert_eq!(snap.current_frame, 1);
        assert_eq!(snap.pins_standing, 10);
    }

    #[test]
    fn test_snapshot_mirrors_engine() {
        let mut engine = ScoreEngine::new();
        engine.add_throws(&[10, 7, 3, 4]).unwrap();

        let snap = engine.snapshot();
        assert_eq!(snap.frames.len(), 3);
        assert_eq!(snap.total_score, engine.total_score());
        assert_eq!(snap.state, ThrowState::AwaitingSecondThrow);
        assert_eq!(snap.current_frame, 3);
        assert_eq!(snap.pins_standing, 6);
        assert_eq!(snap.throw_count, 4);
        assert_eq!(snap.last_event, Some(FrameEvent::FrameContinues));

        let first = snap.frame(1).unwrap();
        assert_eq!(first.kind, FrameKind::Strike);
        assert_eq!(first.throws, [Some(10), None, None]);
        assert_eq!(first.marks, [Some('X'), None, None]);
        assert_eq!(first.total, Some(20));
        assert_eq!(first.cumulative, Some(20));

        let second = snap.frame(2).unwrap();
        assert_eq!(second.marks, [Some('7'), Some('/'), None]);
        assert_eq!(second.total, Some(14));
        assert_eq!(second.cumulative, Some(34));
        assert_eq!(second.throw_count(), 2);

        let third = snap.frame(3).unwrap();
        assert_eq!(third.kind, FrameKind::Incomplete);
        assert_eq!(third.total, None);
        assert_eq!(third.cumulative, None);
    }

    #[test]
    fn test_snapshot_into_reuses_buffer() {
        let mut engine = ScoreEngine::new();
        let mut snap = GameSnapshot::default();
        engine.add_throws(&[10; 12]).unwrap();
        engine.snapshot_into(&mut snap);
        assert_eq!(snap.frames.len(), 10);
        assert_eq!(snap.final_score, Some(300));
        assert!(!snap.playable());

        engine.reset();
        engine.snapshot_into(&mut snap);
        assert!(snap.frames.is_empty());
        assert_eq!(snap.episode_id, 1);
        assert_eq!(snap.final_score, None);
    }
}
