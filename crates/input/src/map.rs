//! Key mapping from terminal events to pinfall actions.

use crate::types::BowlingAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to bowling actions.
///
/// Digits record that many pins, `x` a strike, `/` a spare and `-` a gutter
/// ball. Ten pins on a later ball is entered as a spare.
pub fn handle_key_event(key: KeyEvent) -> Option<BowlingAction> {
    match key.code {
        // Pinfall
        KeyCode::Char(c @ '0'..='9') => Some(BowlingAction::Pins(c as u8 - b'0')),
        KeyCode::Char('-') => Some(BowlingAction::Pins(0)),
        KeyCode::Char('x') | KeyCode::Char('X') => Some(BowlingAction::Strike),
        KeyCode::Char('/') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(BowlingAction::Spare)
        }

        // Restart
        KeyCode::Char('r') | KeyCode::Char('R') => Some(BowlingAction::Restart),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
