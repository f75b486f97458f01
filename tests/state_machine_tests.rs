//! Integration tests for frame segmentation and throw legality

use tui_bowling::core::{FrameStateMachine, OverflowReason, ScoreEngine, ScoreError};
use tui_bowling::types::{FrameEvent, FrameKind, ThrowState};

#[test]
fn test_strike_advances_frame_immediately() {
    let mut engine = ScoreEngine::new();
    assert_eq!(engine.add_throw(10).unwrap(), FrameEvent::FrameComplete);
    assert_eq!(engine.current_frame(), 2);
    assert_eq!(engine.state(), ThrowState::AwaitingFirstThrow);
    assert_eq!(engine.pins_standing(), 10);
}

#[test]
fn test_second_ball_limited_by_standing_pins() {
    let mut engine = ScoreEngine::new();
    engine.add_throw(6).unwrap();
    assert_eq!(engine.pins_standing(), 4);

    let err = engine.add_throw(5).unwrap_err();
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
    assert_eq!(engine.add_throw(4).unwrap(), FrameEvent::FrameComplete);
}

#[test]
fn test_open_tenth_frame_ends_after_two_balls() {
    let mut engine = ScoreEngine::new();
    engine.add_throws(&[0; 18]).unwrap();
    assert_eq!(engine.current_frame(), 10);
    assert_eq!(engine.add_throw(3).unwrap(), FrameEvent::FrameContinues);
    assert_eq!(engine.add_throw(4).unwrap(), FrameEvent::GameComplete);
    assert_eq!(engine.state(), ThrowState::GameComplete);
    assert_eq!(engine.pins_standing(), 0);

    assert!(matches!(
        engine.add_throw(0),
        Err(ScoreError::FrameOverflow {
            frame: 10,
            reason: OverflowReason::GameComplete
        })
    ));
}

#[test]
fn test_tenth_frame_spare_earns_third_ball() {
    let mut engine = ScoreEngine::new();
    engine.add_throws(&[0; 18]).unwrap();
    engine.add_throws(&[8, 2]).unwrap();
    assert_eq!(engine.state(), ThrowState::AwaitingThirdThrow);
    assert_eq!(engine.pins_standing(), 10);

    assert_eq!(engine.add_throw(10).unwrap(), FrameEvent::GameComplete);
    assert_eq!(engine.frame_totals()[9], Some(20));
}

#[test]
fn test_tenth_frame_strike_reracks_for_second_ball() {
    let mut engine = ScoreEngine::new();
    engine.add_throws(&[0; 18]).unwrap();
    engine.add_throw(10).unwrap();
    assert_eq!(engine.pins_standing(), 10);

    // Second ball after a strike may be anything 0-10.
    assert_eq!(engine.add_throw(10).unwrap(), FrameEvent::FrameContinues);
    assert_eq!(engine.state(), ThrowState::AwaitingThirdThrow);
}

#[test]
fn test_tenth_frame_third_ball_only_range_checked() {
    let mut engine = ScoreEngine::new();
    engine.add_throws(&[0; 18]).unwrap();
    engine.add_throws(&[10, 3]).unwrap();

    assert_eq!(
        engine.add_throw(11),
        Err(ScoreError::InvalidPinCount { pins: 11 })
    );
    // No cross-throw cap on the bonus ball.
    assert_eq!(engine.add_throw(9).unwrap(), FrameEvent::GameComplete);
    assert_eq!(engine.frame_totals()[9], Some(22));
}

#[test]
fn test_never_more_than_ten_frames() {
    let mut engine = ScoreEngine::new();
    engine.add_throws(&[10; 12]).unwrap();
    assert_eq!(engine.frames().len(), 10);
    assert_eq!(engine.frames().last().map(|f| f.number()), Some(10));
    assert_eq!(engine.throw_count(), 12);
}

#[test]
fn test_machine_records_frame_kinds() {
    let mut machine = FrameStateMachine::new();
    for pins in [10, 3, 7, 2, 2] {
        machine.add_throw(pins).unwrap();
    }
    let kinds: Vec<FrameKind> = machine.frames().iter().map(|f| f.kind()).collect();
    assert_eq!(kinds, vec![FrameKind::Strike, FrameKind::Spare, FrameKind::Open]);
}

#[test]
fn test_check_does_not_mutate() {
    let mut machine = FrameStateMachine::new();
    machine.add_throw(4).unwrap();
    let before = machine.clone();

    assert!(machine.check(7).is_err());
    assert_eq!(machine.check(6), Ok(6));
    assert_eq!(machine, before);
}
