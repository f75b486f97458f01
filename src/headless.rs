//! Headless scoring: `tui-bowling score X 7 / 9 - ...` prints the scorecard
//! for a throw sequence without entering the terminal UI.

use anyhow::{anyhow, Result};

use crate::session::Session;
use crate::types::BowlingAction;

/// Returns the throw tokens if `args` is a `score` invocation.
pub fn parse_score_args(args: &[String]) -> Result<Option<Vec<BowlingAction>>> {
    let Some((cmd, rest)) = args.split_first() else {
        return Ok(None);
    };
    if cmd != "score" {
        return Ok(None);
    }

    let mut throws = Vec::with_capacity(rest.len());
    for token in rest {
        match BowlingAction::from_str(token) {
            Some(BowlingAction::Restart) | None => {
                return Err(anyhow!("score: invalid throw {token:?}"));
            }
            Some(action) => throws.push(action),
        }
    }
    Ok(Some(throws))
}

/// Score a throw sequence and return the rendered breakdown.
///
/// Stops at the first rejected throw.
pub fn score_card(throws: &[BowlingAction]) -> Result<String> {
    let mut session = Session::new();
    for (i, &action) in throws.iter().enumerate() {
        session
            .apply(action)
            .map_err(|e| anyhow!("throw {}: {e}", i + 1))?;
    }
    Ok(session.engine().render())
}
