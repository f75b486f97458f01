//! Game session: one score engine plus the glue between keyboard actions,
//! pinfall feed commands and the scorecard view.

use crate::adapter::{
    build_observation, create_ack, create_rejection, ClientCommand, InboundCommand,
    OutboundMessage,
};
use crate::core::{GameSnapshot, ScoreEngine, ScoreError};
use crate::types::{BowlingAction, FrameEvent, PIN_COUNT};

#[derive(Debug, Default)]
pub struct Session {
    engine: ScoreEngine,
    snap: GameSnapshot,
    /// Last rejection, shown until the next accepted throw.
    notice: Option<String>,
    /// Sequence number for server-originated observations.
    obs_seq: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn engine(&self) -> &ScoreEngine {
        &self.engine
    }

    pub fn snapshot(&self) -> &GameSnapshot {
        &self.snap
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Apply one action. `Restart` returns `Ok(None)`.
    ///
    /// `Strike` reports a full rack and `Spare` whatever is still standing;
    /// both go through the same validation as an explicit pin count.
    pub fn apply(&mut self, action: BowlingAction) -> Result<Option<FrameEvent>, ScoreError> {
        let pins = match action {
            BowlingAction::Pins(n) => n,
            BowlingAction::Strike => PIN_COUNT,
            BowlingAction::Spare => self.engine.pins_standing(),
            BowlingAction::Restart => {
                self.restart();
                return Ok(None);
            }
        };
        self.throw(i32::from(pins)).map(Some)
    }

    /// Record a raw pinfall reading.
    pub fn throw(&mut self, pins: i32) -> Result<FrameEvent, ScoreError> {
        match self.engine.add_throw(pins) {
            Ok(event) => {
                self.notice = None;
                self.refresh();
                if event == FrameEvent::GameComplete {
                    tracing::info!(
                        episode = self.engine.episode_id(),
                        score = self.engine.total_score(),
                        "game complete"
                    );
                }
                Ok(event)
            }
            Err(err) => {
                tracing::warn!(pins, code = err.code(), "throw rejected: {err}");
                self.notice = Some(format!("rejected: {err}"));
                Err(err)
            }
        }
    }

    pub fn restart(&mut self) {
        self.engine.reset();
        self.notice = None;
        self.refresh();
        tracing::info!(episode = self.engine.episode_id(), "new game");
    }

    /// Observation of the current state for every streaming client.
    pub fn broadcast(&mut self) -> OutboundMessage {
        OutboundMessage::BroadcastObservation {
            obs: self.observation(),
        }
    }

    /// Apply a feed command and emit the replies it calls for.
    ///
    /// Accepted commands are acked to the sender and broadcast to observers;
    /// rejected throws get an error reply and change nothing.
    pub fn handle_feed(&mut self, cmd: &InboundCommand, mut send: impl FnMut(OutboundMessage)) {
        let client_id = cmd.client_id;
        match cmd.command {
            ClientCommand::Throw(pins) => match self.throw(pins) {
                Ok(event) => {
                    send(OutboundMessage::ToClientAck {
                        client_id,
                        ack: create_ack(cmd.seq, Some(event)),
                    });
                    send(self.broadcast());
                }
                Err(err) => send(OutboundMessage::ToClientError {
                    client_id,
                    err: create_rejection(cmd.seq, &err),
                }),
            },
            ClientCommand::Restart => {
                self.restart();
                send(OutboundMessage::ToClientAck {
                    client_id,
                    ack: create_ack(cmd.seq, None),
                });
                send(self.broadcast());
            }
            ClientCommand::SnapshotRequest => send(OutboundMessage::ToClientObservation {
                client_id,
                obs: self.observation(),
            }),
        }
    }

    fn observation(&mut self) -> crate::adapter::ObservationMessage {
        self.obs_seq += 1;
        build_observation(&self.snap, self.obs_seq)
    }

    fn refresh(&mut self) {
        self.engine.snapshot_into(&mut self.snap);
    }
}
