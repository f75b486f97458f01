//! Integration tests for the text breakdown and the terminal scorecard

use tui_bowling::core::ScoreEngine;
use tui_bowling::term::{
    diff_runs, encode_diff_into, AnchorY, FeedStatusView, FrameBuffer, ScorecardView, Viewport,
    CARD_WIDTH,
};

fn card(engine: &ScoreEngine) -> FrameBuffer {
    ScorecardView::new()
        .with_anchor_y(AnchorY::Top)
        .render(&engine.snapshot(), Viewport::new(CARD_WIDTH, 14))
}

#[test]
fn test_render_breakdown_lists_every_started_frame() {
    let mut engine = ScoreEngine::new();
    engine.add_throws(&[9, 1, 10, 0, 0, 3]).unwrap();

    let text = engine.render();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("Frame  1: 9 /"));
    assert!(lines[0].ends_with("20"));
    assert!(lines[1].starts_with("Frame  2: X"));
    assert!(lines[1].ends_with("30"));
    assert!(lines[2].starts_with("Frame  3: - -"));
    assert!(lines[2].ends_with("30"));
    assert!(lines[3].starts_with("Frame  4: 3"));
    assert!(lines[3].ends_with("pending"));
    assert_eq!(lines[4], "Total: 30");
}

#[test]
fn test_scorecard_shows_running_totals() {
    let mut engine = ScoreEngine::new();
    engine
        .add_throws(&[6, 2, 10, 3, 2, 5, 5, 10, 10, 1, 4, 9, 0, 3, 2, 10, 10, 10])
        .unwrap();
    let fb = card(&engine);

    let scores = fb.row_text(4);
    for total in ["8", "23", "28", "48", "69", "84", "89", "98", "103", "133"] {
        assert!(scores.contains(total), "missing {total} in {scores:?}");
    }
    assert!(!scores.contains('…'));
    assert!(fb.row_text(6).contains("FINAL 133"));
}

#[test]
fn test_scorecard_marks_pending_frames() {
    let mut engine = ScoreEngine::new();
    engine.add_throws(&[10, 10]).unwrap();
    let fb = card(&engine);

    let scores = fb.row_text(4);
    assert_eq!(scores.matches('…').count(), 2);
    assert!(fb.row_text(7).starts_with("TOTAL 0"));
}

#[test]
fn test_feed_status_and_notice_in_panel() {
    let engine = ScoreEngine::new();
    let feed = FeedStatusView {
        client_count: 1,
        controller_id: None,
    };
    let fb = ScorecardView::new().with_anchor_y(AnchorY::Top).render_with_feed(
        &engine.snapshot(),
        Some(&feed),
        Some("rejected: pin count 12 out of range"),
        Viewport::new(80, 14),
    );

    let text: Vec<String> = (0..fb.height()).map(|y| fb.row_text(y)).collect();
    assert!(text.iter().any(|l| l.contains("FEED ON 1 clients  CTRL -")));
    assert!(text.iter().any(|l| l.contains("rejected: pin count 12")));
}

#[test]
fn test_single_throw_redraws_only_its_cells() {
    let mut engine = ScoreEngine::new();
    engine.add_throw(7).unwrap();
    let before = card(&engine);
    engine.add_throw(2).unwrap();
    let after = card(&engine);

    let mut runs = Vec::new();
    diff_runs(&before, &after, &mut runs);
    assert!(!runs.is_empty());
    // Marks row, score row, the panel and the frame-2 highlight move; the
    // frame numbers and borders stay put.
    assert!(runs.iter().all(|r| r.y >= 3));
    let changed: u32 = runs.iter().map(|r| u32::from(r.len)).sum();
    assert!(changed < u32::from(CARD_WIDTH) * 4);

    let mut out = Vec::new();
    encode_diff_into(&before, &after, &mut out).unwrap();
    assert!(String::from_utf8_lossy(&out).contains('9'));
}
