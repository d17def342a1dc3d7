use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Generation number identifying one game session
pub type SessionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Compare the two selected tiles
    Evaluate,
    /// Take a matched pair off the board
    Removal,
    /// Return a mismatched pair to idle
    Reset,
}

/// A delayed callback addressed to one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub session: SessionId,
    pub kind: TimerKind,
}

/// Anything that can invoke a timer after a delay.
pub trait Scheduler {
    fn schedule(&mut self, after: Duration, timer: Timer);
}

/// The three feedback pauses, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    pub evaluate_ms: u64,
    pub removal_ms: u64,
    pub reset_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            evaluate_ms: 500,
            removal_ms: 600,
            reset_ms: 900,
        }
    }
}

impl Timings {
    /// Every pause must be nonzero, and a mismatch lingers at least as long as a match.
    pub fn validate(&self) -> Result<()> {
        if self.evaluate_ms == 0 || self.removal_ms == 0 || self.reset_ms == 0 {
            return Err(Error::invalid("feedback delays must be nonzero"));
        }
        if self.reset_ms < self.removal_ms {
            return Err(Error::invalid(format!(
                "reset delay ({} ms) must not be shorter than removal delay ({} ms)",
                self.reset_ms, self.removal_ms
            )));
        }
        Ok(())
    }

    pub fn delay(&self, kind: TimerKind) -> Duration {
        Duration::from_millis(match kind {
            TimerKind::Evaluate => self.evaluate_ms,
            TimerKind::Removal => self.removal_ms,
            TimerKind::Reset => self.reset_ms,
        })
    }
}

#[derive(Debug, Clone)]
struct Entry {
    deadline: Instant,
    seq: u64,
    timer: Timer,
}

/// Deadline ordered timer store polled by the event loop.
#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_at(&mut self, now: Instant, after: Duration, timer: Timer) {
        self.entries.push(Entry {
            deadline: now + after,
            seq: self.next_seq,
            timer,
        });
        self.next_seq += 1;
    }

    /// Remove and return every timer whose deadline is at or before `now`,
    /// earliest first; equal deadlines keep scheduling order.
    pub fn due(&mut self, now: Instant) -> Vec<Timer> {
        let (mut ready, pending): (Vec<Entry>, Vec<Entry>) = self
            .entries
            .drain(..)
            .partition(|e| e.deadline <= now);
        self.entries = pending;
        ready.sort_by_key(|e| (e.deadline, e.seq));
        ready.into_iter().map(|e| e.timer).collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Drop every timer addressed to `session`.
    pub fn cancel_session(&mut self, session: SessionId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.timer.session != session);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, after: Duration, timer: Timer) {
        self.schedule_at(Instant::now(), after, timer);
    }
}
