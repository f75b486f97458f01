//! Score ledger - per-throw slots with deferred bonus resolution
//!
//! Every accepted throw becomes one [`LedgerEntry`]. Its [`Slot`] is either a
//! resolved score contribution or a pending marker:
//!
//! - The first throw of a frame in progress is pending until the frame's kind
//!   is known ([`Awaiting::FrameEnd`]).
//! - Once the frame closes, an open frame's first throw resolves to its pins,
//!   a spare's waits for one more throw and a strike's for two
//!   ([`Awaiting::Bonus`]). Bonus throws are taken from wherever they land in
//!   the stream, including the next frame or frame 10.
//! - Every other throw resolves to its own pins immediately.
//! - The final frame borrows nothing: its first throw resolves to its own pins
//!   when the frame closes, so frame 10 scores the sum of its throws.
//!
//! A pending slot contributes nothing until it can be computed from actual
//! recorded throws. Slots only ever move from pending to resolved, so the
//! running total never decreases.

use arrayvec::ArrayVec;

use crate::types::{FrameKind, FRAME_COUNT, MAX_GAME_THROWS};

/// Pending marker detail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Awaiting {
    /// The owning frame is still in progress.
    FrameEnd,
    /// This many later throws must be recorded.
    Bonus(u8),
}

/// Score contribution of a single throw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Resolved(u32),
    Pending(Awaiting),
}

impl Slot {
    pub fn value(&self) -> Option<u32> {
        match self {
            Slot::Resolved(v) => Some(*v),
            Slot::Pending(_) => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Slot::Pending(_))
    }
}

/// One recorded throw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LedgerEntry {
    /// Ordinal of the frame the throw belongs to
    pub frame: u8,
    pub pins: u8,
    pub slot: Slot,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreLedger {
    entries: ArrayVec<LedgerEntry, MAX_GAME_THROWS>,
    /// Entries waiting on bonus throws, oldest first.
    waiting: ArrayVec<usize, MAX_GAME_THROWS>,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a throw and resolve whatever it unblocks.
    ///
    /// `opens_frame` marks the first throw of a frame.
    pub fn record(&mut self, frame: u8, pins: u8, opens_frame: bool) {
        let slot = if opens_frame {
            Slot::Pending(Awaiting::FrameEnd)
        } else {
            Slot::Resolved(u32::from(pins))
        };
        self.entries.push(LedgerEntry { frame, pins, slot });
        self.resolve();
    }

    /// Classify a finished frame's opening slot.
    pub fn close_frame(&mut self, frame: u8, kind: FrameKind, is_final: bool) {
        let Some(idx) = self.entries.iter().position(|e| e.frame == frame) else {
            return;
        };

        let bonus = if is_final { 0 } else { kind.bonus_throws() };
        let entry = &mut self.entries[idx];
        if bonus == 0 {
            entry.slot = Slot::Resolved(u32::from(entry.pins));
        } else {
            entry.slot = Slot::Pending(Awaiting::Bonus(bonus as u8));
            self.waiting.push(idx);
        }
        self.resolve();
    }

    /// Fill every bonus slot that now has enough later throws.
    fn resolve(&mut self) {
        let entries = &mut self.entries;
        self.waiting.retain(|idx| {
            let i = *idx;
            let Slot::Pending(Awaiting::Bonus(needed)) = entries[i].slot else {
                return false;
            };
            let needed = usize::from(needed);
            let frame = entries[i].frame;
            // Bonus throws start after the anchor's own frame; a spare's
            // second ball is not its bonus.
            let later: ArrayVec<u8, 2> = entries[i + 1..]
                .iter()
                .filter(|e| e.frame != frame)
                .take(needed.min(2))
                .map(|e| e.pins)
                .collect();
            if later.len() < needed {
                return true;
            }
            let bonus: u32 = later.iter().copied().map(u32::from).sum();
            entries[i].slot = Slot::Resolved(u32::from(entries[i].pins) + bonus);
            false
        });
    }

    /// Per-frame totals for every frame with at least one throw.
    ///
    /// A frame with any pending slot reports `None`.
    pub fn frame_totals(&self) -> ArrayVec<Option<u32>, FRAME_COUNT> {
        let mut out: ArrayVec<Option<u32>, FRAME_COUNT> = ArrayVec::new();
        for e in &self.entries {
            let idx = usize::from(e.frame.saturating_sub(1));
            while out.len() <= idx {
                out.push(Some(0));
            }
            out[idx] = match (out[idx], e.slot) {
                (Some(total), Slot::Resolved(v)) => Some(total + v),
                _ => None,
            };
        }
        out
    }

    /// Sum of every resolved slot.
    pub fn total_score(&self) -> u32 {
        self.entries.iter().filter_map(|e| e.slot.value()).sum()
    }

    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|e| e.slot.is_pending()).count()
    }

    pub fn is_fully_resolved(&self) -> bool {
        self.pending_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_frame_resolves_on_close() {
        let mut ledger = ScoreLedger::new();
        ledger.record(1, 3, true);
        assert_eq!(ledger.total_score(), 0);
        assert_eq!(ledger.frame_totals().as_slice(), &[None]);

        ledger.record(1, 4, false);
        ledger.close_frame(1, FrameKind::Open, false);
        assert_eq!(ledger.total_score(), 7);
        assert_eq!(ledger.frame_totals().as_slice(), &[Some(7)]);
        assert!(ledger.is_fully_resolved());
    }

    #[test]
    fn test_spare_waits_for_one_throw() {
        let mut ledger = ScoreLedger::new();
        ledger.record(1, 5, true);
        ledger.record(1, 5, false);
        ledger.close_frame(1, FrameKind::Spare, false);
        assert_eq!(
            ledger.entries()[0].slot,
            Slot::Pending(Awaiting::Bonus(1))
        );
        assert_eq!(ledger.frame_totals().as_slice(), &[None]);
        assert_eq!(ledger.total_score(), 5);

        ledger.record(2, 3, true);
        assert_eq!(ledger.entries()[0].slot, Slot::Resolved(8));
        assert_eq!(ledger.frame_totals().as_slice(), &[Some(13), None]);
    }

    #[test]
    fn test_spare_bonus_skips_its_own_second_ball() {
        let mut ledger = ScoreLedger::new();
        ledger.record(1, 1, true);
        ledger.record(1, 9, false);
        ledger.close_frame(1, FrameKind::Spare, false);
        assert!(ledger.entries()[0].slot.is_pending());

        ledger.record(2, 4, true);
        assert_eq!(ledger.entries()[0].slot, Slot::Resolved(5));
        assert_eq!(ledger.frame_totals()[0], Some(14));
    }

    #[test]
    fn test_strike_waits_for_two_throws_across_frames() {
        let mut ledger = ScoreLedger::new();
        ledger.record(1, 10, true);
        ledger.close_frame(1, FrameKind::Strike, false);
        ledger.record(2, 10, true);
        ledger.close_frame(2, FrameKind::Strike, false);
        assert_eq!(ledger.pending_count(), 2);

        ledger.record(3, 4, true);
        assert_eq!(ledger.entries()[0].slot, Slot::Resolved(24));
        assert!(ledger.entries()[1].slot.is_pending());

        ledger.record(3, 2, false);
        ledger.close_frame(3, FrameKind::Open, false);
        assert_eq!(ledger.entries()[1].slot, Slot::Resolved(16));
        assert_eq!(
            ledger.frame_totals().as_slice(),
            &[Some(24), Some(16), Some(6)]
        );
        assert_eq!(ledger.total_score(), 46);
    }

    #[test]
    fn test_final_frame_borrows_nothing() {
        let mut ledger = ScoreLedger::new();
        ledger.record(10, 10, true);
        ledger.record(10, 10, false);
        ledger.record(10, 10, false);
        ledger.close_frame(10, FrameKind::Strike, true);
        assert_eq!(ledger.frame_totals().as_slice()[9], Some(30));
        assert_eq!(ledger.total_score(), 30);
    }

    #[test]
    fn test_unresolvable_slot_stays_pending() {
        let mut ledger = ScoreLedger::new();
        ledger.record(1, 10, true);
        ledger.close_frame(1, FrameKind::Strike, false);
        ledger.record(2, 7, true);
        // Only one bonus throw known: never approximated.
        assert_eq!(ledger.entries()[0].slot, Slot::Pending(Awaiting::Bonus(2)));
        assert_eq!(ledger.total_score(), 0);
    }
}
