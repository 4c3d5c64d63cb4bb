//! Haptic and audible feedback.
//!
//! Devices are optional. The emitter checks each capability before use and
//! drops any device error after logging it, so a board without a vibration
//! motor or an audio output behaves exactly like one with them.

mod tone;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::FeedbackError;

pub use tone::{GainEnvelope, Tone, Waveform};

/// Discrete moments that produce feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    ScoreAdded,
    ScoreRemoved,
    QuarterAdvanced,
    GameReset,
    TimerToggled,
    TimerExpired,
}

impl Cue {
    pub fn haptic(self) -> HapticPattern {
        match self {
            Cue::ScoreAdded => HapticPattern(&[100, 50, 100]),
            Cue::ScoreRemoved => HapticPattern(&[50]),
            Cue::QuarterAdvanced => HapticPattern(&[100, 50, 100, 50, 100]),
            Cue::GameReset => HapticPattern(&[200, 100, 200]),
            Cue::TimerToggled => HapticPattern(&[75]),
            Cue::TimerExpired => HapticPattern(&[200, 100, 200, 100, 200, 100, 200]),
        }
    }

    pub fn tone(self) -> Option<Tone> {
        match self {
            Cue::TimerExpired => Some(Tone::ALARM),
            _ => None,
        }
    }
}

/// Alternating vibrate/pause durations in milliseconds, starting with a
/// vibration. A single entry is one pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HapticPattern(pub &'static [u32]);

impl HapticPattern {
    pub fn durations(&self) -> &'static [u32] {
        self.0
    }

    pub fn is_single(&self) -> bool {
        self.0.len() == 1
    }

    pub fn pulse_count(&self) -> usize {
        self.0.len().div_ceil(2)
    }

    pub fn total_ms(&self) -> u32 {
        self.0.iter().sum()
    }
}

/// Vibration capability of the host.
pub trait Haptics {
    fn available(&self) -> bool;
    fn vibrate(&mut self, pattern: HapticPattern) -> Result<(), FeedbackError>;
}

/// Tone generation capability of the host.
pub trait ToneOutput {
    fn available(&self) -> bool;
    fn play(&mut self, tone: &Tone) -> Result<(), FeedbackError>;
}

/// A host with neither capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Haptics for Silent {
    fn available(&self) -> bool {
        false
    }

    fn vibrate(&mut self, _pattern: HapticPattern) -> Result<(), FeedbackError> {
        Err(FeedbackError::Unavailable("haptic"))
    }
}

impl ToneOutput for Silent {
    fn available(&self) -> bool {
        false
    }

    fn play(&mut self, _tone: &Tone) -> Result<(), FeedbackError> {
        Err(FeedbackError::Unavailable("audio"))
    }
}

/// Maps cues to device output. Holds device handles and nothing else.
#[derive(Debug, Default)]
pub struct FeedbackEmitter<H, T> {
    haptics: H,
    audio: T,
}

impl<H: Haptics, T: ToneOutput> FeedbackEmitter<H, T> {
    pub fn new(haptics: H, audio: T) -> Self {
        Self { haptics, audio }
    }

    pub fn haptics(&self) -> &H {
        &self.haptics
    }

    pub fn audio(&self) -> &T {
        &self.audio
    }

    /// Best effort: never fails, never panics.
    pub fn emit(&mut self, cue: Cue) {
        trace!(?cue, "feedback cue");
        if self.haptics.available() {
            if let Err(e) = self.haptics.vibrate(cue.haptic()) {
                debug!(?cue, error = %e, "haptic feedback dropped");
            }
        }
        if let Some(tone) = cue.tone() {
            if self.audio.available() {
                if let Err(e) = self.audio.play(&tone) {
                    debug!(?cue, error = %e, "tone playback dropped");
                }
            }
        }
    }
}
