mod engine;
mod ticker;

pub use engine::{format_clock, now_ms, TimerEngine, TimerState};
pub use ticker::{Ticker, DEFAULT_POLL_INTERVAL};
