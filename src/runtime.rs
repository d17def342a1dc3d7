use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseButton, MouseEventKind};

use crate::game::{GameEvent, GameSession};
use crate::scheduler::TimerQueue;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    /// Left mouse button pressed at a terminal cell
    Click { column: u16, row: u16 },
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, mouse, resize)
pub trait AppEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) => Some(AppEvent::Key(key)),
                Ok(CtEvent::Mouse(mouse)) => match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => Some(AppEvent::Click {
                        column: mouse.column,
                        row: mouse.row,
                    }),
                    _ => None,
                },
                Ok(CtEvent::Resize(_, _)) => Some(AppEvent::Resize),
                Ok(_) => None,
                Err(_) => break,
            };
            if let Some(evt) = evt {
                if tx.send(evt).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AppEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel-fed event source for tests and headless drivers
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl AppEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: AppEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: AppEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> AppEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => AppEvent::Tick,
        }
    }
}

/// Fire every timer that is due at `now` against `session`.
///
/// Timers scheduled while firing (removal after evaluation, for instance)
/// land back in `queue` and wait for their own deadline.
pub fn fire_due(queue: &mut TimerQueue, session: &mut GameSession, now: Instant) -> Vec<GameEvent> {
    let due = queue.due(now);
    let mut events = Vec::new();
    for timer in due {
        events.extend(session.fire(timer, queue));
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::ProjectionMode;
    use crate::scheduler::Timings;
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let runner = Runner::new(es, ticker);

        match runner.step() {
            AppEvent::Tick => {}
            other => panic!("expected Tick on timeout, got {other:?}"),
        }
    }

    #[test]
    fn step_passes_through_clicks() {
        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Click { column: 4, row: 7 }).unwrap();
        let es = TestEventSource::new(rx);
        let runner = Runner::new(es, FixedTicker::new(Duration::from_millis(10)));

        match runner.step() {
            AppEvent::Click { column: 4, row: 7 } => {}
            other => panic!("expected Click event, got {other:?}"),
        }
    }

    #[test]
    fn fire_due_runs_evaluation_then_waits_for_removal() {
        let mut session = GameSession::from_layout(
            vec![("shuǐ", 0), ("水", 0)],
            ProjectionMode::PinyinHanzi,
            Timings::default(),
        )
        .unwrap();
        let mut queue = TimerQueue::new();

        session.select_tile(0, &mut queue);
        session.select_tile(1, &mut queue);
        assert!(fire_due(&mut queue, &mut session, Instant::now()).is_empty());

        let later = Instant::now() + Duration::from_millis(550);
        let events = fire_due(&mut queue, &mut session, later);
        assert_eq!(events.len(), 2);
        assert_eq!(session.score(), 10);
        assert_eq!(queue.len(), 1);

        let events = fire_due(&mut queue, &mut session, later + Duration::from_secs(1));
        assert!(events.contains(&GameEvent::Completed { score: 10 }));
        assert!(session.is_complete());
        assert!(queue.is_empty());
    }
}
