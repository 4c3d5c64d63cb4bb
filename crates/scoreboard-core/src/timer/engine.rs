//! Quarter countdown engine.
//!
//! The engine is deadline-based: starting it records the absolute instant at
//! which the quarter ends, and every observation recomputes the remaining time
//! from that instant. It owns no thread and no scheduler. The caller invokes
//! `tick()` periodically and `resync()` whenever the board becomes visible
//! again; both are safe to call late, early, rarely or repeatedly.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused -> Running)* -> Expired
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(900);
//! engine.start(now_ms());
//! // In a loop:
//! engine.tick(now_ms()); // Returns Some(Event::TimerExpired) once at zero
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidationError;
use crate::events::{at, Event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// Full duration, never started since the last reset.
    Idle,
    Running,
    Paused,
    /// Reached zero. Starting again re-arms a zero-length cycle.
    Expired,
}

/// Core countdown engine.
///
/// `deadline_ms` is `Some` exactly when the timer is running. While running,
/// `remaining_secs` is only a cache of the last observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TimerRecord")]
pub struct TimerEngine {
    duration_secs: u64,
    remaining_secs: u64,
    /// Epoch milliseconds at which the countdown hits zero.
    deadline_ms: Option<u64>,
}

/// Unchecked wire form of [`TimerEngine`].
#[derive(Deserialize)]
struct TimerRecord {
    duration_secs: u64,
    remaining_secs: u64,
    #[serde(default)]
    deadline_ms: Option<u64>,
}

impl TryFrom<TimerRecord> for TimerEngine {
    type Error = ValidationError;

    fn try_from(record: TimerRecord) -> Result<Self, Self::Error> {
        if record.remaining_secs > record.duration_secs {
            return Err(ValidationError::InvalidValue {
                field: "remaining_secs".to_string(),
                message: format!(
                    "{} exceeds the {} second duration",
                    record.remaining_secs, record.duration_secs
                ),
            });
        }
        Ok(Self {
            duration_secs: record.duration_secs,
            remaining_secs: record.remaining_secs,
            deadline_ms: record.deadline_ms,
        })
    }
}

impl TimerEngine {
    /// Create a stopped engine holding the full `duration_secs`.
    pub fn new(duration_secs: u64) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            deadline_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    /// Last observed remaining seconds.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn running(&self) -> bool {
        self.deadline_ms.is_some()
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// Remaining seconds at `now_ms` without mutating anything.
    pub fn remaining_at(&self, now_ms: u64) -> u64 {
        match self.deadline_ms {
            Some(deadline) => secs_until(deadline, now_ms),
            None => self.remaining_secs,
        }
    }

    pub fn state(&self) -> TimerState {
        if self.running() {
            TimerState::Running
        } else if self.remaining_secs == 0 {
            TimerState::Expired
        } else if self.remaining_secs == self.duration_secs {
            TimerState::Idle
        } else {
            TimerState::Paused
        }
    }

    /// 0.0 .. 1.0 elapsed fraction of the quarter.
    pub fn progress(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / self.duration_secs as f64)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Arm the countdown. No-op while running.
    ///
    /// At zero the deadline is `now`, so the next observation expires again.
    pub fn start(&mut self, now_ms: u64) -> Option<Event> {
        if self.running() {
            return None;
        }
        let deadline = now_ms.saturating_add(self.remaining_secs.saturating_mul(1000));
        self.deadline_ms = Some(deadline);
        debug!(remaining_secs = self.remaining_secs, deadline_ms = deadline, "timer armed");
        Some(Event::TimerStarted {
            remaining_secs: self.remaining_secs,
            deadline_ms: deadline,
            at: at(now_ms),
        })
    }

    /// Freeze the countdown at its current value.
    ///
    /// A pause observed at or past the deadline is reported as the expiry,
    /// so the cycle still produces its single `TimerExpired`.
    pub fn pause(&mut self, now_ms: u64) -> Option<Event> {
        let deadline = self.deadline_ms?;
        self.remaining_secs = secs_until(deadline, now_ms);
        self.deadline_ms = None;
        if self.remaining_secs == 0 {
            debug!("timer expired while pausing");
            return Some(Event::TimerExpired { at: at(now_ms) });
        }
        debug!(remaining_secs = self.remaining_secs, "timer disarmed");
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: at(now_ms),
        })
    }

    pub fn toggle(&mut self, now_ms: u64) -> Option<Event> {
        if self.running() {
            self.pause(now_ms)
        } else {
            self.start(now_ms)
        }
    }

    /// Call periodically. Returns `Some(Event::TimerExpired)` when the
    /// countdown reaches zero, and `None` on every other call.
    pub fn tick(&mut self, now_ms: u64) -> Option<Event> {
        self.observe(now_ms)
    }

    /// Call when the board comes back to the foreground.
    ///
    /// Same check as `tick`; kept separate so callers can tell the two
    /// triggers apart in logs.
    pub fn resync(&mut self, now_ms: u64) -> Option<Event> {
        if self.running() {
            debug!(now_ms, "resynchronizing timer from deadline");
        }
        self.observe(now_ms)
    }

    /// Back to the full duration, stopped.
    pub fn reset(&mut self) {
        self.remaining_secs = self.duration_secs;
        self.deadline_ms = None;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn observe(&mut self, now_ms: u64) -> Option<Event> {
        let deadline = self.deadline_ms?;
        self.remaining_secs = secs_until(deadline, now_ms);
        if self.remaining_secs > 0 {
            return None;
        }
        self.deadline_ms = None;
        debug!("timer expired");
        Some(Event::TimerExpired { at: at(now_ms) })
    }
}

/// `max(0, ceil((deadline - now) / 1000))`
fn secs_until(deadline_ms: u64, now_ms: u64) -> u64 {
    deadline_ms.saturating_sub(now_ms).div_ceil(1000)
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Render whole seconds as `MM:SS`.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
