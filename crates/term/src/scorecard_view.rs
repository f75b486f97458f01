//! ScorecardView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Layout (frames 1-9 get a 5-column box, frame 10 a 7-column one):
//!
//! ```text
//! ┌─────┬─────┬ ... ┬───────┐
//! │  1  │  2  │     │  10   │
//! ├─────┼─────┼ ... ┼───────┤
//! │ 6 2 │ X   │     │ X X X │
//! │    8│   23│     │    133│
//! └─────┴─────┴ ... ┴───────┘
//! ```

use crate::core::{FrameSnapshot, GameSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{FINAL_FRAME, FRAME_COUNT};

const BOX_W: u16 = 5;
const FINAL_BOX_W: u16 = 7;
/// Total card width including every border column.
pub const CARD_WIDTH: u16 = 1 + (FRAME_COUNT as u16 - 1) * (BOX_W + 1) + FINAL_BOX_W + 1;
/// Border, number row, separator, marks row, score row, border.
pub const CARD_HEIGHT: u16 = 6;
const PANEL_HEIGHT: u16 = 6;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Pinfall feed status shown in the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedStatusView {
    pub client_count: u16,
    pub controller_id: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// A terminal renderer for a bowling scorecard.
#[derive(Debug, Clone, Copy)]
pub struct ScorecardView {
    anchor_y: AnchorY,
}

impl Default for ScorecardView {
    fn default() -> Self {
        Self {
            anchor_y: AnchorY::Center,
        }
    }
}

impl ScorecardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render the scorecard into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across ticks and only resize when the
    /// terminal size changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        self.render_into_with_feed(snap, None, None, viewport, fb);
    }

    /// Render with the feed status and an optional one-line notice (the last
    /// rejected throw, for instance).
    pub fn render_into_with_feed(
        &self,
        snap: &GameSnapshot,
        feed: Option<&FeedStatusView>,
        notice: Option<&str>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let total_h = CARD_HEIGHT + 1 + PANEL_HEIGHT;
        let start_x = viewport.width.saturating_sub(CARD_WIDTH) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(total_h) / 2,
            AnchorY::Top => 0,
        };

        self.draw_card(fb, snap, start_x, start_y);

        let below = start_y.saturating_add(CARD_HEIGHT);
        if snap.game_complete {
            let text = match snap.final_score {
                Some(score) => format!("GAME OVER  FINAL {score}"),
                None => "GAME OVER".to_string(),
            };
            self.draw_overlay_text(fb, start_x, below, &text);
        }

        self.draw_side_panel(fb, snap, feed, notice, start_x, below.saturating_add(1));
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    pub fn render_with_feed(
        &self,
        snap: &GameSnapshot,
        feed: Option<&FeedStatusView>,
        notice: Option<&str>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into_with_feed(snap, feed, notice, viewport, &mut fb);
        fb
    }

    fn draw_card(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, x: u16, y: u16) {
        let border = CellStyle::fg(Rgb::new(200, 200, 200));
        let number = CellStyle::fg(Rgb::new(140, 140, 160)).dim();

        self.draw_rule(fb, x, y, ('┌', '┬', '┐'), border);
        self.draw_rule(fb, x, y + 2, ('├', '┼', '┤'), border);
        self.draw_rule(fb, x, y + 5, ('└', '┴', '┘'), border);

        for n in 1..=FINAL_FRAME {
            let (rel, w) = box_span(n);
            let left = x + rel;
            for row in [1, 3, 4] {
                fb.put_char(left, y + row, '│', border);
            }

            let label_x = left + 1 + w.saturating_sub(digits(n)) / 2;
            fb.put_u32(label_x, y + 1, u32::from(n), number);

            let current = !snap.game_complete && n == snap.current_frame;
            if current {
                let highlight = CellStyle::default().on(Rgb::new(40, 40, 70));
                fb.fill_rect(left + 1, y + 3, w, 2, ' ', highlight);
            }
            if let Some(frame) = snap.frame(n) {
                self.draw_frame(fb, frame, left, w, y, current);
            }
        }
        let right = x + CARD_WIDTH - 1;
        for row in [1, 3, 4] {
            fb.put_char(right, y + row, '│', border);
        }
    }

    fn draw_frame(
        &self,
        fb: &mut FrameBuffer,
        frame: &FrameSnapshot,
        left: u16,
        w: u16,
        y: u16,
        current: bool,
    ) {
        let bg = if current {
            Rgb::new(40, 40, 70)
        } else {
            Rgb::new(0, 0, 0)
        };

        for (i, mark) in frame.marks.iter().enumerate() {
            let Some(mark) = *mark else { break };
            let style = mark_style(mark).on(bg);
            fb.put_char(left + 2 + 2 * i as u16, y + 3, mark, style);
        }

        let right = left + w;
        match frame.cumulative {
            Some(score) => {
                let style = CellStyle::fg(Rgb::new(255, 255, 255)).bold().on(bg);
                let len = digits_u32(score);
                fb.put_u32(right + 1 - len, y + 4, score, style);
            }
            None => {
                let style = CellStyle::fg(Rgb::new(150, 150, 150)).dim().on(bg);
                fb.put_char(right, y + 4, '…', style);
            }
        }
    }

    fn draw_rule(
        &self,
        fb: &mut FrameBuffer,
        x: u16,
        y: u16,
        (start, mid, end): (char, char, char),
        style: CellStyle,
    ) {
        fb.put_char(x, y, start, style);
        for n in 1..=FINAL_FRAME {
            let (rel, w) = box_span(n);
            let left = x + rel;
            if n > 1 {
                fb.put_char(left, y, mid, style);
            }
            fb.fill_rect(left + 1, y, w, 1, '─', style);
        }
        fb.put_char(x + CARD_WIDTH - 1, y, end, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        feed: Option<&FeedStatusView>,
        notice: Option<&str>,
        x: u16,
        y: u16,
    ) {
        let label = CellStyle::fg(Rgb::new(220, 220, 220)).bold();
        let value = CellStyle::fg(Rgb::new(200, 200, 200));
        let dim = value.dim();

        let cx = fb.put_str(x, y, "TOTAL ", label);
        fb.put_u32(cx, y, snap.total_score, value);

        let mut cx = fb.put_str(x, y + 1, "FRAME ", label);
        cx = fb.put_u32(cx, y + 1, u32::from(snap.current_frame), value);
        cx = fb.put_str(cx + 2, y + 1, "BALL ", label);
        match snap.state.ball_number() {
            Some(ball) => fb.put_u32(cx, y + 1, u32::from(ball), value),
            None => fb.put_str(cx, y + 1, "-", value),
        };

        let cx = fb.put_str(x, y + 2, "PINS ", label);
        if snap.game_complete {
            fb.put_str(cx, y + 2, "-", value);
        } else {
            fb.put_u32(cx, y + 2, u32::from(snap.pins_standing), value);
        }

        let cx = fb.put_str(x, y + 3, "FEED ", label);
        match feed {
            Some(st) => {
                let mut cx = fb.put_str(cx, y + 3, "ON ", value);
                cx = fb.put_u32(cx, y + 3, u32::from(st.client_count), value);
                cx = fb.put_str(cx, y + 3, " clients", dim);
                cx = fb.put_str(cx + 2, y + 3, "CTRL ", label);
                match st.controller_id {
                    Some(id) => fb.put_u32(cx, y + 3, id as u32, value),
                    None => fb.put_str(cx, y + 3, "-", value),
                };
            }
            None => {
                fb.put_str(cx, y + 3, "OFF", value);
            }
        }

        if let Some(text) = notice {
            let style = CellStyle::fg(Rgb::new(240, 120, 100));
            fb.put_str(x, y + 4, text, style);
        }

        let help = "0-9 pins  x strike  / spare  r restart  q quit";
        fb.put_str(x, y + 5, help, dim);
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, start_x: u16, y: u16, text: &str) {
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(CARD_WIDTH.saturating_sub(text_w) / 2);
        let style = CellStyle::fg(Rgb::new(255, 255, 255)).bold();
        fb.put_str(x, y, text, style);
    }
}

/// Left border column (relative to the card origin) and inner width of a frame box.
fn box_span(n: u8) -> (u16, u16) {
    let left = u16::from(n - 1) * (BOX_W + 1);
    let w = if n == FINAL_FRAME { FINAL_BOX_W } else { BOX_W };
    (left, w)
}

fn mark_style(mark: char) -> CellStyle {
    match mark {
        'X' => CellStyle::fg(Rgb::new(240, 200, 80)).bold(),
        '/' => CellStyle::fg(Rgb::new(100, 200, 240)).bold(),
        '-' => CellStyle::fg(Rgb::new(140, 140, 140)),
        _ => CellStyle::fg(Rgb::new(220, 220, 220)),
    }
}

fn digits(n: u8) -> u16 {
    digits_u32(u32::from(n))
}

fn digits_u32(mut n: u32) -> u16 {
    let mut len = 1;
    while n >= 10 {
        n /= 10;
        len += 1;
    }
    len
}
