//! Feedback devices available to a terminal.
//!
//! A terminal has a bell but no vibration motor. Haptic patterns are
//! reported through tracing instead, which is enough to see them with `-v`.

use std::io::{IsTerminal, Write};

use scoreboard_core::{FeedbackError, HapticPattern, Haptics, Tone, ToneOutput};
use tracing::{debug, info};

/// Rings the terminal bell for tones. Silent when stdout is piped.
#[derive(Debug)]
pub struct TerminalBell {
    enabled: bool,
}

impl TerminalBell {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl ToneOutput for TerminalBell {
    fn available(&self) -> bool {
        self.enabled && std::io::stdout().is_terminal()
    }

    fn play(&mut self, tone: &Tone) -> Result<(), FeedbackError> {
        debug!(
            frequency_hz = tone.frequency_hz,
            duration_ms = tone.duration.as_millis() as u64,
            "ringing bell"
        );
        let mut out = std::io::stdout().lock();
        out.write_all(b"\x07")
            .and_then(|()| out.flush())
            .map_err(|e| FeedbackError::PlaybackFailed(e.to_string()))
    }
}

/// Logs haptic patterns at info level.
#[derive(Debug)]
pub struct TracingHaptics {
    enabled: bool,
}

impl TracingHaptics {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Haptics for TracingHaptics {
    fn available(&self) -> bool {
        self.enabled
    }

    fn vibrate(&mut self, pattern: HapticPattern) -> Result<(), FeedbackError> {
        info!(
            target: "scoreboard::haptics",
            pattern = ?pattern.durations(),
            total_ms = pattern.total_ms(),
            "vibrate"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_devices_report_unavailable() {
        assert!(!TerminalBell::new(false).available());
        assert!(!TracingHaptics::new(false).available());
        assert!(TracingHaptics::new(true).available());
    }

    #[test]
    fn tracing_haptics_accepts_any_pattern() {
        let mut haptics = TracingHaptics::new(true);
        assert!(haptics.vibrate(HapticPattern(&[200, 100, 200])).is_ok());
    }
}
