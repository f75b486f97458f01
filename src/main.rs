//! Terminal bowling scorekeeper (default binary).
//!
//! Keys record throws; a pinsetter controller can report them over the TCP
//! pinfall feed instead. `tui-bowling score X 7 / ...` scores a sequence
//! headlessly and prints the breakdown.

use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tui_bowling::adapter::Adapter;
use tui_bowling::headless::{parse_score_args, score_card};
use tui_bowling::input::{handle_key_event, should_quit};
use tui_bowling::term::{FeedStatusView, FrameBuffer, ScorecardView, TerminalRenderer, Viewport};
use tui_bowling::types::TICK_MS;
use tui_bowling::Session;

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(throws) = parse_score_args(&args)? {
        print!("{}", score_card(&throws)?);
        return Ok(());
    }

    let mut adapter = match Adapter::start_from_env() {
        Ok(adapter) => adapter,
        Err(e) => {
            tracing::warn!(error = %e, "pinfall feed unavailable");
            None
        }
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, adapter.as_mut());

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Logs go to `BOWLING_LOG_PATH` only; without a file there are no logs,
/// since stdout/stderr belong to the scorecard.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file = std::env::var("BOWLING_LOG_PATH")
        .ok()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .and_then(|p| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&p)
                .ok()
                .map(|f| (p, f))
        });

    match file {
        Some((path, file)) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(env_filter)
                .init();
            tracing::info!(%path, "logging initialized");
        }
        None => tracing_subscriber::registry().with(env_filter).init(),
    }
}

fn run(term: &mut TerminalRenderer, mut adapter: Option<&mut Adapter>) -> Result<()> {
    let mut session = Session::new();
    let view = ScorecardView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let tick = Duration::from_millis(u64::from(TICK_MS));

    loop {
        // Pinfall feed.
        if let Some(adapter) = adapter.as_deref_mut() {
            while let Some(cmd) = adapter.try_recv() {
                session.handle_feed(&cmd, |msg| adapter.send(msg));
            }
        }

        // Render.
        let feed = adapter.as_deref().map(|a| FeedStatusView {
            client_count: u16::try_from(a.client_count()).unwrap_or(u16::MAX),
            controller_id: a.controller_id(),
        });
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into_with_feed(
            session.snapshot(),
            feed.as_ref(),
            session.notice(),
            Viewport::new(w, h),
            &mut fb,
        );
        term.draw(&fb)?;

        // Input with a tick timeout so feed throws show up promptly.
        if !event::poll(tick)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if should_quit(key) {
                    return Ok(());
                }
                if let Some(action) = handle_key_event(key) {
                    if session.apply(action).is_ok() {
                        if let Some(adapter) = adapter.as_deref() {
                            adapter.send(session.broadcast());
                        }
                    }
                }
            }
            Event::Resize(..) => term.invalidate(),
            _ => {}
        }
    }
}
