//! TUI Runner - main loop that owns the terminal and the App
//!
//! Draws every iteration, dispatches key presses to the App, and forwards
//! ticks so pending removals commit once their exit transition ends.

use std::time::{Duration, Instant};

use crossterm::event::KeyEventKind;
use eyre::Result;
use tracing::{debug, info, warn};

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::views;

/// Owns the terminal, the App and the event source
pub struct TuiRunner {
    app: App,
    terminal: Tui,
    event_handler: EventHandler,
}

impl TuiRunner {
    pub fn new(app: App, terminal: Tui, tick_rate: Duration) -> Self {
        debug!(?tick_rate, "TuiRunner::new: called");
        Self {
            app,
            terminal,
            event_handler: EventHandler::new(tick_rate),
        }
    }

    /// Run the TUI main loop
    ///
    /// Removals still animating are committed on every way out, errors included,
    /// since the user already saw those items leave.
    pub async fn run(&mut self) -> Result<()> {
        debug!("TuiRunner::run: entering main loop");
        let result = self.event_loop().await;
        self.app.flush();
        match &result {
            Ok(()) => info!(tasks = self.app.session().store().len(), "TuiRunner::run: exiting"),
            Err(e) => warn!(error = %e, "TuiRunner::run: exiting on error"),
        }
        result
    }

    async fn event_loop(&mut self) -> Result<()> {
        loop {
            let app = &self.app;
            self.terminal.draw(|frame| views::render(app, frame, Instant::now()))?;

            match self.event_handler.next().await? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if self.app.handle_key(key) {
                        debug!("TuiRunner::run: force quit");
                        return Ok(());
                    }
                }
                Event::Key(_) => {}
                Event::Tick => self.app.tick(Instant::now()),
                Event::Resize(width, height) => {
                    debug!(width, height, "TuiRunner::run: resize");
                    self.terminal.autoresize()?;
                }
            }

            if self.app.state().should_quit {
                debug!("TuiRunner::run: should_quit is true, breaking");
                return Ok(());
            }
        }
    }
}
