//! Protocol module - JSON message types for the pinfall feed
//!
//! Line-delimited JSON. Every message carries `type`, `seq` (sender-side
//! sequence number) and `ts` (milliseconds since the Unix epoch).

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::core::{FrameSnapshot, GameSnapshot, ScoreError};
use crate::types::{FrameEvent, FrameKind, ThrowState, FRAME_COUNT, MAX_FRAME_THROWS};

/// Version announced in `welcome`; clients must share the major version.
pub const PROTOCOL_VERSION: &str = "1.0.0";
pub const PROTOCOL_MAJOR: &str = "1.";
pub const GAME_ID: &str = "tui-bowling";

// ============== Client -> Game Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HelloType {
    #[default]
    #[serde(rename = "hello")]
    Hello,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ThrowType {
    #[default]
    #[serde(rename = "throw")]
    Throw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ControlType {
    #[default]
    #[serde(rename = "control")]
    Control,
}

/// Client hello message (first message on every connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type", default)]
    pub msg_type: HelloType,
    pub seq: u64,
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
    #[serde(default)]
    pub requested: RequestedCapabilities,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedCapabilities {
    #[serde(default = "default_true")]
    pub stream_observations: bool,
}

impl Default for RequestedCapabilities {
    fn default() -> Self {
        Self {
            stream_observations: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// One pinfall reading (controller only)
///
/// `pins` is carried wide so that out-of-range readings reach the engine and
/// come back as `invalid_pin_count` rather than as a JSON error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrowMessage {
    #[serde(rename = "type", default)]
    pub msg_type: ThrowType,
    pub seq: u64,
    pub ts: u64,
    pub pins: i64,
}

/// Game control (controller only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlMessage {
    #[serde(rename = "type", default)]
    pub msg_type: ControlType,
    pub seq: u64,
    pub ts: u64,
    pub action: ControlAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    Restart,
}

impl<'de> Deserialize<'de> for ControlAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        if s.eq_ignore_ascii_case("restart") {
            Ok(Self::Restart)
        } else {
            Err(serde::de::Error::custom("invalid control action"))
        }
    }
}

impl Serialize for ControlAction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            ControlAction::Restart => serializer.serialize_str("restart"),
        }
    }
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckStatus {
    #[serde(rename = "ok")]
    Ok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignedRole {
    Controller,
    Observer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    HandshakeRequired,
    ProtocolMismatch,
    NotController,
    InvalidCommand,
    Backpressure,
    InvalidPinCount,
    FrameOverflow,
}

impl ErrorCode {
    /// Wire code for an engine rejection.
    pub fn for_score_error(err: &ScoreError) -> Self {
        match err {
            ScoreError::InvalidPinCount { .. } => ErrorCode::InvalidPinCount,
            ScoreError::FrameOverflow { .. } => ErrorCode::FrameOverflow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityCommand {
    Throw,
    Restart,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    pub formats: [String; 1],
    pub commands: [CapabilityCommand; 2],
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub client_id: u64,
    pub role: AssignedRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller_id: Option<u64>,
    pub game_id: String,
    pub capabilities: ServerCapabilities,
}

/// Acknowledgment sent once a command has been applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    pub status: AckStatus,
    /// Frame event of an accepted throw (absent for control acks).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<FrameEventName>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

// ============== Observation payload ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameEventName {
    FrameContinues,
    FrameComplete,
    GameComplete,
}

impl From<FrameEvent> for FrameEventName {
    fn from(value: FrameEvent) -> Self {
        match value {
            FrameEvent::FrameContinues => Self::FrameContinues,
            FrameEvent::FrameComplete => Self::FrameComplete,
            FrameEvent::GameComplete => Self::GameComplete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrowStateName {
    AwaitingFirstThrow,
    AwaitingSecondThrow,
    AwaitingThirdThrow,
    GameComplete,
}

impl From<ThrowState> for ThrowStateName {
    fn from(value: ThrowState) -> Self {
        match value {
            ThrowState::AwaitingFirstThrow => Self::AwaitingFirstThrow,
            ThrowState::AwaitingSecondThrow => Self::AwaitingSecondThrow,
            ThrowState::AwaitingThirdThrow => Self::AwaitingThirdThrow,
            ThrowState::GameComplete => Self::GameComplete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameKindName {
    Strike,
    Spare,
    Open,
    Incomplete,
}

impl From<FrameKind> for FrameKindName {
    fn from(value: FrameKind) -> Self {
        match value {
            FrameKind::Strike => Self::Strike,
            FrameKind::Spare => Self::Spare,
            FrameKind::Open => Self::Open,
            FrameKind::Incomplete => Self::Incomplete,
        }
    }
}

/// One frame as seen by feed clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameObservation {
    pub number: u8,
    pub throws: ArrayVec<u8, MAX_FRAME_THROWS>,
    /// Scorecard marks, e.g. `"X"`, `"7/"`, `"9-"`.
    pub marks: String,
    pub kind: FrameKindName,
    pub total: Option<u32>,
    pub cumulative: Option<u32>,
}

impl From<&FrameSnapshot> for FrameObservation {
    fn from(frame: &FrameSnapshot) -> Self {
        Self {
            number: frame.number,
            throws: frame.throws.iter().map_while(|t| *t).collect(),
            marks: frame.marks.iter().map_while(|m| *m).collect(),
            kind: frame.kind.into(),
            total: frame.total,
            cumulative: frame.cumulative,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub episode_id: u32,
    pub state: ThrowStateName,
    pub current_frame: u8,
    pub pins_standing: u8,
    pub game_complete: bool,
    pub total_score: u32,
    pub final_score: Option<u32>,
    pub throw_count: u32,
    pub frames: ArrayVec<FrameObservation, FRAME_COUNT>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_event: Option<FrameEventName>,
}

// ============== Message Parsing ==============

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Throw(ThrowMessage),
    Control(ControlMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

/// Parse one JSON line.
///
/// An unrecognized `type` is not a parse error; it yields
/// [`ParsedMessage::Unknown`] so the server can answer with the sender's seq.
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "throw")]
        Throw(ThrowMessage),
        #[serde(rename = "control")]
        Control(ControlMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Throw(m)) => Ok(ParsedMessage::Throw(m)),
        Ok(InboundMessage::Control(m)) => Ok(ParsedMessage::Control(m)),
        Err(e) => {
            #[derive(Debug, Deserialize)]
            struct Header<'a> {
                #[serde(rename = "type", borrow)]
                msg_type: Option<&'a str>,
                seq: Option<u64>,
            }
            let header = serde_json::from_str::<Header>(json)?;
            match header.msg_type {
                Some("hello" | "throw" | "control") => Err(e),
                _ => Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: header.seq.unwrap_or(0),
                })),
            }
        }
    }
}

/// Pull `seq` out of a line that failed to parse, if it is there at all.
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let rest = s[start + 5..].trim_start().strip_prefix(':')?.trim_start();
    let end = rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

// ============== Utility Functions ==============

pub fn create_hello(seq: u64, client_name: &str, protocol_version: &str) -> HelloMessage {
    HelloMessage {
        msg_type: HelloType::Hello,
        seq,
        ts: current_timestamp_ms(),
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: protocol_version.to_string(),
        requested: RequestedCapabilities::default(),
    }
}

pub fn create_throw(seq: u64, pins: i64) -> ThrowMessage {
    ThrowMessage {
        msg_type: ThrowType::Throw,
        seq,
        ts: current_timestamp_ms(),
        pins,
    }
}

pub fn create_restart(seq: u64) -> ControlMessage {
    ControlMessage {
        msg_type: ControlType::Control,
        seq,
        ts: current_timestamp_ms(),
        action: ControlAction::Restart,
    }
}

pub fn create_welcome(
    seq: u64,
    client_id: u64,
    role: AssignedRole,
    controller_id: Option<u64>,
) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: PROTOCOL_VERSION.to_string(),
        client_id,
        role,
        controller_id,
        game_id: GAME_ID.to_string(),
        capabilities: ServerCapabilities {
            formats: ["json".to_string()],
            commands: [CapabilityCommand::Throw, CapabilityCommand::Restart],
        },
    }
}

pub fn create_ack(seq: u64, event: Option<FrameEvent>) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: current_timestamp_ms(),
        status: AckStatus::Ok,
        event: event.map(FrameEventName::from),
    }
}

pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Error reply for a throw the engine refused.
pub fn create_rejection(seq: u64, err: &ScoreError) -> ErrorMessage {
    create_error(seq, ErrorCode::for_score_error(err), &err.to_string())
}

/// Build an observation from a game snapshot.
pub fn build_observation(snap: &GameSnapshot, seq: u64) -> ObservationMessage {
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        episode_id: snap.episode_id,
        state: snap.state.into(),
        current_frame: snap.current_frame,
        pins_standing: snap.pins_standing,
        game_complete: snap.game_complete,
        total_score: snap.total_score,
        final_score: snap.final_score,
        throw_count: snap.throw_count,
        frames: snap.frames.iter().map(FrameObservation::from).collect(),
        last_event: snap.last_event.map(FrameEventName::from),
    }
}

fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScoreEngine;

    #[test]
    fn test_parse_hello() {
        let json = r#"{"type":"hello","seq":1,"ts":5,"client":{"name":"lane-7","version":"0.3"},"protocol_version":"1.0.0"}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Hello(hello) => {
                assert_eq!(hello.seq, 1);
                assert_eq!(hello.client.name, "lane-7");
                assert!(hello.requested.stream_observations);
            }
            other => panic!("expected hello, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_throw_keeps_out_of_range_pins() {
        let json = r#"{"type":"throw","seq":3,"ts":0,"pins":-4}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Throw(t) => assert_eq!((t.seq, t.pins), (3, -4)),
            other => panic!("expected throw, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_control() {
        let json = r#"{"type":"control","seq":9,"ts":0,"action":"RESTART"}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Control(c) => assert_eq!(c.action, ControlAction::Restart),
            other => panic!("expected control, got {other:?}"),
        }
        assert!(parse_message(r#"{"type":"control","seq":9,"ts":0,"action":"pause"}"#).is_err());
    }

    #[test]
    fn test_unknown_type_keeps_seq() {
        match parse_message(r#"{"type":"spin","seq":12}"#).unwrap() {
            ParsedMessage::Unknown(u) => assert_eq!(u.seq, 12),
            other => panic!("expected unknown, got {other:?}"),
        }
        assert!(parse_message("not json").is_err());
    }

    #[test]
    fn test_extract_seq_best_effort() {
        assert_eq!(extract_seq_best_effort(r#"{"seq": 42, "pins": }"#), Some(42));
        assert_eq!(extract_seq_best_effort(r#"{"pins":3}"#), None);
    }

    #[test]
    fn test_create_welcome() {
        let welcome = create_welcome(1, 3, AssignedRole::Observer, Some(1));
        let v = serde_json::to_value(&welcome).unwrap();
        assert_eq!(v["type"], "welcome");
        assert_eq!(v["role"], "observer");
        assert_eq!(v["controller_id"], 1);
        assert_eq!(v["protocol_version"], PROTOCOL_VERSION);
        assert_eq!(v["capabilities"]["commands"][0], "throw");
    }

    #[test]
    fn test_ack_carries_frame_event() {
        let v = serde_json::to_value(create_ack(4, Some(FrameEvent::FrameComplete))).unwrap();
        assert_eq!(v["type"], "ack");
        assert_eq!(v["status"], "ok");
        assert_eq!(v["event"], "frame_complete");

        let v = serde_json::to_value(create_ack(5, None)).unwrap();
        assert!(v.get("event").is_none());
    }

    #[test]
    fn test_rejection_maps_score_error() {
        let mut engine = ScoreEngine::new();
        engine.add_throw(6).unwrap();
        let err = engine.add_throw(5).unwrap_err();

        let msg = create_rejection(2, &err);
        assert_eq!(msg.code, ErrorCode::FrameOverflow);
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["code"], "frame_overflow");
        assert_eq!(v["seq"], 2);

        let err = engine.add_throw(11).unwrap_err();
        assert_eq!(ErrorCode::for_score_error(&err), ErrorCode::InvalidPinCount);
    }

    #[test]
    fn test_build_observation() {
        let mut engine = ScoreEngine::new();
        engine.add_throws(&[10, 9, 1, 0]).unwrap();

        let obs = build_observation(&engine.snapshot(), 7);
        assert_eq!(obs.frames.len(), 3);
        assert_eq!(obs.frames[0].marks, "X");
        assert_eq!(obs.frames[0].total, Some(20));
        assert_eq!(obs.frames[1].marks, "9/");
        assert_eq!(obs.frames[1].cumulative, Some(30));
        assert_eq!(obs.frames[2].throws.as_slice(), &[0]);
        assert_eq!(obs.total_score, 30);

        let v = serde_json::to_value(&obs).unwrap();
        assert_eq!(v["type"], "observation");
        assert_eq!(v["state"], "awaiting_second_throw");
        assert_eq!(v["frames"][1]["kind"], "spare");
        assert_eq!(v["frames"][2]["total"], serde_json::Value::Null);
        assert_eq!(v["last_event"], "frame_continues");
    }
}
