//! Tone description and synthesis.
//!
//! A tone is an oscillator at a fixed frequency shaped by an exponential
//! gain ramp, matching how the alarm decays from a sharp attack.
//!
//! Output devices receive the `Tone` description. [`Tone::render`] is the
//! reference synthesis for sinks that play raw samples; the terminal bell
//! only rings.

use std::f32::consts::TAU;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
}

impl Waveform {
    /// Amplitude in -1.0..=1.0 at `phase` cycles (only the fractional part
    /// matters).
    pub fn sample(self, phase: f32) -> f32 {
        let p = phase.fract();
        match self {
            Waveform::Sine => (TAU * p).sin(),
        }
    }
}

/// Exponential ramp from `start` to `end` over the tone's duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainEnvelope {
    pub start: f32,
    pub end: f32,
}

impl GainEnvelope {
    /// Gain after `fraction` (0.0..=1.0) of the duration:
    /// `start * (end / start) ^ fraction`.
    pub fn gain_at(&self, fraction: f32) -> f32 {
        let f = fraction.clamp(0.0, 1.0);
        if self.start <= 0.0 || self.end <= 0.0 {
            // An exponential ramp cannot touch zero; fall back to linear.
            return self.start + (self.end - self.start) * f;
        }
        self.start * (self.end / self.start).powf(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub frequency_hz: f32,
    pub waveform: Waveform,
    pub duration: Duration,
    pub envelope: GainEnvelope,
}

impl Tone {
    /// 800 Hz sine, half a second, decaying from 0.3 to 0.01.
    pub const ALARM: Tone = Tone {
        frequency_hz: 800.0,
        waveform: Waveform::Sine,
        duration: Duration::from_millis(500),
        envelope: GainEnvelope {
            start: 0.3,
            end: 0.01,
        },
    };

    /// Number of samples the tone spans at `sample_rate`.
    pub fn sample_count(&self, sample_rate: u32) -> usize {
        (self.duration.as_secs_f64() * f64::from(sample_rate)).round() as usize
    }

    /// Synthesize mono samples in -1.0..=1.0.
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let count = self.sample_count(sample_rate);
        if count == 0 || sample_rate == 0 {
            return Vec::new();
        }
        let rate = sample_rate as f32;
        let last = (count - 1).max(1) as f32;
        (0..count)
            .map(|n| {
                let t = n as f32 / rate;
                let gain = self.envelope.gain_at(n as f32 / last);
                gain * self.waveform.sample(self.frequency_hz * t)
            })
            .collect()
    }
}
