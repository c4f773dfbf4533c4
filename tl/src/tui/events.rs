//! TUI event handling
//!
//! Terminal input is polled on a blocking thread and forwarded over a tokio
//! channel. A Tick is sent every tick rate whether or not input is arriving,
//! which drives exit transitions.

use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEvent};
use eyre::Result;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Terminal events
#[derive(Debug)]
pub enum Event {
    /// Key press
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// Tick (periodic refresh)
    Tick,
}

/// Fixed-rate tick schedule for the polling thread
#[derive(Debug, Clone, Copy)]
struct TickClock {
    rate: Duration,
    last: Instant,
}

impl TickClock {
    fn new(rate: Duration, now: Instant) -> Self {
        Self { rate, last: now }
    }

    /// How long input polling may block before the next tick is due
    fn timeout(&self, now: Instant) -> Duration {
        self.rate.saturating_sub(now.saturating_duration_since(self.last))
    }

    /// Whether a tick is due; if so the schedule restarts from `now`
    fn take_due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) >= self.rate {
            self.last = now;
            true
        } else {
            false
        }
    }
}

/// Event handler for the TUI
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Create a new event handler with the given tick rate
    pub fn new(tick_rate: Duration) -> Self {
        debug!(?tick_rate, "EventHandler::new: called");
        let (tx, rx) = mpsc::unbounded_channel();

        std::thread::spawn(move || {
            debug!("EventHandler: event polling thread started");
            let mut clock = TickClock::new(tick_rate, Instant::now());
            loop {
                if event::poll(clock.timeout(Instant::now())).unwrap_or(false) {
                    let event = match event::read() {
                        Ok(event::Event::Key(key)) => {
                            trace!(?key, "EventHandler: key event received");
                            Some(Event::Key(key))
                        }
                        Ok(event::Event::Resize(w, h)) => {
                            debug!(w, h, "EventHandler: resize event received");
                            Some(Event::Resize(w, h))
                        }
                        Ok(_) => None,
                        Err(e) => {
                            debug!(error = %e, "EventHandler: read failed, skipping");
                            None
                        }
                    };
                    if let Some(event) = event
                        && tx.send(event).is_err()
                    {
                        debug!("EventHandler: channel closed, exiting loop");
                        break;
                    }
                }

                // Steady input must not starve the tick
                if clock.take_due(Instant::now()) && tx.send(Event::Tick).is_err() {
                    debug!("EventHandler: channel closed on tick, exiting loop");
                    break;
                }
            }
        });

        Self { rx }
    }

    /// Get the next event (async)
    pub async fn next(&mut self) -> Result<Event> {
        self.rx.recv().await.ok_or_else(|| eyre::eyre!("Event channel closed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: Duration = Duration::from_millis(30);

    #[test]
    fn test_event_handler_creation() {
        let _handler = EventHandler::new(Duration::from_millis(100));
    }

    #[test]
    fn test_tick_due_during_steady_input() {
        let t0 = Instant::now();
        let mut clock = TickClock::new(RATE, t0);

        // Events every 10ms never let a poll time out, yet ticks keep coming
        let ticks = (1..=9)
            .map(|n| t0 + Duration::from_millis(10 * n))
            .filter(|&now| clock.take_due(now))
            .count();
        assert_eq!(ticks, 3);
    }

    #[test]
    fn test_timeout_shrinks_toward_next_tick() {
        let t0 = Instant::now();
        let mut clock = TickClock::new(RATE, t0);
        assert_eq!(clock.timeout(t0), RATE);
        assert_eq!(clock.timeout(t0 + Duration::from_millis(20)), Duration::from_millis(10));
        assert_eq!(clock.timeout(t0 + Duration::from_millis(50)), Duration::ZERO);

        assert!(clock.take_due(t0 + Duration::from_millis(50)));
        assert_eq!(clock.timeout(t0 + Duration::from_millis(50)), RATE);
    }
}
