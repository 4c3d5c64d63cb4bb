//! Input routing for a single board.
//!
//! Each operation mutates the game, fires the matching feedback cue and
//! queues any toast for the view. The view drains notifications after every
//! call; the core never decides how they are shown.

use std::collections::VecDeque;

use tracing::info;

use crate::events::{Event, Notification};
use crate::feedback::{Cue, FeedbackEmitter, Haptics, ToneOutput};
use crate::game::{Game, Team};

pub struct Scoreboard<H, T> {
    game: Game,
    feedback: FeedbackEmitter<H, T>,
    notifications: VecDeque<Notification>,
}

impl<H: Haptics, T: ToneOutput> Scoreboard<H, T> {
    pub fn new(haptics: H, audio: T) -> Self {
        Self {
            game: Game::new(),
            feedback: FeedbackEmitter::new(haptics, audio),
            notifications: VecDeque::new(),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn feedback(&self) -> &FeedbackEmitter<H, T> {
        &self.feedback
    }

    pub fn is_running(&self) -> bool {
        self.game.timer().running()
    }

    pub fn snapshot(&self, now_ms: u64) -> Event {
        self.game.snapshot(now_ms)
    }

    /// Take every queued notification, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    pub fn add_score(&mut self, team: Team, now_ms: u64) -> Event {
        self.feedback.emit(Cue::ScoreAdded);
        self.game.add_score(team, now_ms)
    }

    /// Pulses even when the score is already zero and nothing changes.
    pub fn remove_score(&mut self, team: Team, now_ms: u64) -> Option<Event> {
        self.feedback.emit(Cue::ScoreRemoved);
        self.game.remove_score(team, now_ms)
    }

    pub fn toggle_timer(&mut self, now_ms: u64) -> Option<Event> {
        self.feedback.emit(Cue::TimerToggled);
        let event = self.game.toggle_timer(now_ms);
        self.after_clock(event)
    }

    pub fn next_quarter(&mut self, now_ms: u64) -> Event {
        self.feedback.emit(Cue::QuarterAdvanced);
        let event = self.game.advance(now_ms);
        match &event {
            Event::QuarterAdvanced { quarter, .. } => {
                info!(quarter, "quarter advanced");
                self.notify(Notification::success(format!("Moving to Quarter {quarter}")));
            }
            Event::GameComplete { .. } => {
                self.notify(Notification::info("Game complete! Reset to start a new game."));
            }
            _ => {}
        }
        event
    }

    pub fn reset_game(&mut self, now_ms: u64) -> Event {
        self.feedback.emit(Cue::GameReset);
        let event = self.game.reset(now_ms);
        info!("game reset");
        self.notify(Notification::success("Game reset!"));
        event
    }

    pub fn rename(&mut self, team: Team, raw: &str, now_ms: u64) -> Event {
        self.game.rename(team, raw, now_ms)
    }

    /// Poll from the recurring ticker.
    pub fn tick(&mut self, now_ms: u64) -> Option<Event> {
        let event = self.game.tick(now_ms);
        self.after_clock(event)
    }

    /// The board became visible again.
    pub fn resync(&mut self, now_ms: u64) -> Option<Event> {
        let event = self.game.resync(now_ms);
        self.after_clock(event)
    }

    fn after_clock(&mut self, event: Option<Event>) -> Option<Event> {
        if event.as_ref().is_some_and(Event::is_expiry) {
            let quarter = self.game.quarter();
            info!(quarter, "quarter clock expired");
            self.feedback.emit(Cue::TimerExpired);
            self.notify(
                Notification::error("Time's up!")
                    .with_description(format!("Quarter {quarter} has ended")),
            );
        }
        event
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push_back(notification);
    }
}
