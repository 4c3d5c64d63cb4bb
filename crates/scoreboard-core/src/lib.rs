//! # Scoreboard Core Library
//!
//! This library provides the logic behind a single-screen, four-quarter
//! scoreboard. Front-ends (the `scoreboard` terminal binary among them) are
//! thin views over it: they forward input, render events and show the
//! notifications the core queues.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A deadline-based countdown that requires the caller
//!   to periodically invoke `tick()` and to `resync()` on foreground
//! - **Ticker**: The scoped tokio interval that drives `tick()`
//! - **Game**: Active quarter, per-quarter score ledger and team labels
//! - **Feedback**: Haptic patterns and the expiry alarm tone, sent to
//!   optional devices
//! - **Storage**: TOML-based preferences (never game state)
//!
//! ## Key Components
//!
//! - [`Scoreboard`]: Input routing, feedback and notifications
//! - [`Game`]: The aggregate root
//! - [`TimerEngine`]: Countdown state machine
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod feedback;
pub mod game;
pub mod scoreboard;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, FeedbackError, ValidationError};
pub use events::{Event, Notification, NotificationLevel};
pub use feedback::{Cue, FeedbackEmitter, HapticPattern, Haptics, Silent, Tone, ToneOutput};
pub use game::{Game, QuarterScore, Team, QUARTER_COUNT, QUARTER_DURATION_SECS};
pub use scoreboard::Scoreboard;
pub use storage::Config;
pub use timer::{format_clock, now_ms, Ticker, TimerEngine, TimerState};
