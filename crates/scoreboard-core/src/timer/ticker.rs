//! Recurring poll trigger for the countdown.
//!
//! The ticker owns the only scheduled resource in the system. It holds a
//! tokio interval while armed and nothing while disarmed; dropping the
//! interval deschedules it, so disarming, dropping the ticker or ending the
//! session all release the trigger.

use std::time::Duration;

use tokio::time::{interval, Instant, Interval, MissedTickBehavior};

/// Default poll period. Sub-second so the displayed seconds change within
/// 100 ms of the real boundary.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    interval: Option<Interval>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Start polling. Idempotent.
    pub fn arm(&mut self) {
        if self.interval.is_none() {
            let mut interval = interval(self.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            self.interval = Some(interval);
        }
    }

    /// Stop polling. Idempotent.
    pub fn disarm(&mut self) {
        self.interval = None;
    }

    /// Arm or disarm to match `armed`.
    pub fn set_armed(&mut self, armed: bool) {
        if armed {
            self.arm();
        } else {
            self.disarm();
        }
    }

    /// Resolves on the next period while armed. Never resolves while
    /// disarmed, which keeps a `tokio::select!` branch inert.
    pub async fn tick(&mut self) -> Instant {
        match self.interval.as_mut() {
            Some(interval) => interval.tick().await,
            None => std::future::pending().await,
        }
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn armed_ticker_fires_every_period() {
        let mut ticker = Ticker::new(Duration::from_millis(100));
        ticker.arm();
        let first = ticker.tick().await;
        let second = ticker.tick().await;
        assert_eq!(second - first, Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn disarmed_ticker_never_fires() {
        let mut ticker = Ticker::default();
        let fired = tokio::time::timeout(Duration::from_secs(5), ticker.tick()).await;
        assert!(fired.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_releases_the_interval() {
        let mut ticker = Ticker::default();
        ticker.arm();
        ticker.tick().await;
        ticker.disarm();
        assert!(!ticker.is_armed());
        let fired = tokio::time::timeout(Duration::from_secs(1), ticker.tick()).await;
        assert!(fired.is_err());
    }

    #[test]
    fn arm_is_idempotent() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        rt.block_on(async {
            let mut ticker = Ticker::default();
            ticker.set_armed(true);
            ticker.set_armed(true);
            assert!(ticker.is_armed());
            ticker.set_armed(false);
            assert!(!ticker.is_armed());
        });
    }
}
