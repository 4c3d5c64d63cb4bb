//! The game aggregate: active quarter, per-quarter scores, team labels and
//! the quarter countdown.

mod ledger;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::events::{at, Event};
use crate::timer::{format_clock, TimerEngine};

pub use ledger::{QuarterScore, ScoreLedger};

pub const QUARTER_COUNT: u8 = 4;
pub const QUARTER_DURATION_SECS: u64 = 15 * 60;
/// Team labels are cut to this many characters.
pub const TEAM_NAME_MAX_CHARS: usize = 20;
pub const DEFAULT_HOME_NAME: &str = "HOME";
pub const DEFAULT_AWAY_NAME: &str = "AWAY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Home,
    Away,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Home => f.write_str("home"),
            Team::Away => f.write_str("away"),
        }
    }
}

impl FromStr for Team {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" | "h" => Ok(Team::Home),
            "away" | "a" => Ok(Team::Away),
            other => Err(ValidationError::UnknownTeam(other.to_string())),
        }
    }
}

/// Truncate to `TEAM_NAME_MAX_CHARS` characters and uppercase.
pub fn normalize_team_name(raw: &str) -> String {
    raw.chars()
        .take(TEAM_NAME_MAX_CHARS)
        .collect::<String>()
        .to_uppercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameRecord")]
pub struct Game {
    current_quarter: u8,
    home_name: String,
    away_name: String,
    ledger: ScoreLedger,
    timer: TimerEngine,
}

/// Unchecked wire form of [`Game`]. The timer validates itself.
#[derive(Deserialize)]
struct GameRecord {
    current_quarter: u8,
    home_name: String,
    away_name: String,
    ledger: ScoreLedger,
    timer: TimerEngine,
}

impl TryFrom<GameRecord> for Game {
    type Error = ValidationError;

    fn try_from(record: GameRecord) -> Result<Self, Self::Error> {
        if !(1..=QUARTER_COUNT).contains(&record.current_quarter) {
            return Err(ValidationError::InvalidValue {
                field: "current_quarter".to_string(),
                message: format!(
                    "{} is outside 1..={QUARTER_COUNT}",
                    record.current_quarter
                ),
            });
        }
        Ok(Self {
            current_quarter: record.current_quarter,
            home_name: record.home_name,
            away_name: record.away_name,
            ledger: record.ledger,
            timer: record.timer,
        })
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Quarter 1, zero scores, full stopped clock, default labels.
    pub fn new() -> Self {
        Self {
            current_quarter: 1,
            home_name: DEFAULT_HOME_NAME.to_string(),
            away_name: DEFAULT_AWAY_NAME.to_string(),
            ledger: ScoreLedger::new(),
            timer: TimerEngine::new(QUARTER_DURATION_SECS),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Active quarter, 1-based.
    pub fn quarter(&self) -> u8 {
        self.current_quarter
    }

    pub fn quarter_count(&self) -> u8 {
        QUARTER_COUNT
    }

    pub fn is_final_quarter(&self) -> bool {
        self.current_quarter >= QUARTER_COUNT
    }

    pub fn name(&self, team: Team) -> &str {
        match team {
            Team::Home => &self.home_name,
            Team::Away => &self.away_name,
        }
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    pub fn timer(&self) -> &TimerEngine {
        &self.timer
    }

    pub fn total_for(&self, team: Team) -> u32 {
        self.ledger.total_for(team)
    }

    /// Full state snapshot as observed at `now_ms`.
    pub fn snapshot(&self, now_ms: u64) -> Event {
        let remaining_secs = self.timer.remaining_at(now_ms);
        Event::StateSnapshot {
            quarter: self.current_quarter,
            quarter_count: QUARTER_COUNT,
            home_name: self.home_name.clone(),
            away_name: self.away_name.clone(),
            home_total: self.total_for(Team::Home),
            away_total: self.total_for(Team::Away),
            quarters: self.ledger.quarters().to_vec(),
            timer_state: self.timer.state(),
            remaining_secs,
            clock: format_clock(remaining_secs),
            at: at(now_ms),
        }
    }

    // ── Scores ───────────────────────────────────────────────────────

    pub fn add_score(&mut self, team: Team, now_ms: u64) -> Event {
        let quarter_score = self.ledger.add(self.current_quarter, team);
        Event::ScoreAdded {
            team,
            quarter: self.current_quarter,
            quarter_score,
            total: self.total_for(team),
            at: at(now_ms),
        }
    }

    /// `None` when the active quarter's count is already zero.
    pub fn remove_score(&mut self, team: Team, now_ms: u64) -> Option<Event> {
        if !self.ledger.remove(self.current_quarter, team) {
            return None;
        }
        let quarter_score = self
            .ledger
            .quarter(self.current_quarter)
            .map(|q| q.get(team))
            .unwrap_or(0);
        Some(Event::ScoreRemoved {
            team,
            quarter: self.current_quarter,
            quarter_score,
            total: self.total_for(team),
            at: at(now_ms),
        })
    }

    // ── Quarters ─────────────────────────────────────────────────────

    /// Move to the next quarter with a fresh stopped clock.
    /// On the final quarter nothing changes and `GameComplete` is returned.
    pub fn advance(&mut self, now_ms: u64) -> Event {
        if self.is_final_quarter() {
            return Event::GameComplete {
                quarter: self.current_quarter,
                at: at(now_ms),
            };
        }
        self.current_quarter += 1;
        self.timer.reset();
        Event::QuarterAdvanced {
            quarter: self.current_quarter,
            at: at(now_ms),
        }
    }

    /// Replace the whole aggregate, labels included.
    pub fn reset(&mut self, now_ms: u64) -> Event {
        *self = Self::new();
        Event::GameReset { at: at(now_ms) }
    }

    pub fn rename(&mut self, team: Team, raw: &str, now_ms: u64) -> Event {
        let name = normalize_team_name(raw);
        match team {
            Team::Home => self.home_name = name.clone(),
            Team::Away => self.away_name = name.clone(),
        }
        Event::TeamRenamed {
            team,
            name,
            at: at(now_ms),
        }
    }

    // ── Clock ────────────────────────────────────────────────────────

    pub fn toggle_timer(&mut self, now_ms: u64) -> Option<Event> {
        self.timer.toggle(now_ms)
    }

    pub fn tick(&mut self, now_ms: u64) -> Option<Event> {
        self.timer.tick(now_ms)
    }

    pub fn resync(&mut self, now_ms: u64) -> Option<Event> {
        self.timer.resync(now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerState;

    const T0: u64 = 1_700_000_000_000;

    #[test]
    fn new_game_defaults() {
        let game = Game::new();
        assert_eq!(game.quarter(), 1);
        assert_eq!(game.name(Team::Home), "HOME");
        assert_eq!(game.name(Team::Away), "AWAY");
        assert_eq!(game.timer().remaining_secs(), QUARTER_DURATION_SECS);
        assert!(!game.timer().running());
        assert!(game.ledger().quarters().iter().all(|q| *q == QuarterScore::default()));
    }

    #[test]
    fn scores_go_to_active_quarter() {
        let mut game = Game::new();
        game.add_score(Team::Home, T0);
        game.advance(T0);
        let event = game.add_score(Team::Home, T0);
        assert!(matches!(
            event,
            Event::ScoreAdded { quarter: 2, quarter_score: 1, total: 2, .. }
        ));
        assert_eq!(game.ledger().quarter(1).map(|q| q.home), Some(1));
    }

    #[test]
    fn remove_on_empty_quarter_is_noop() {
        let mut game = Game::new();
        game.add_score(Team::Away, T0);
        game.advance(T0);
        let before = game.clone();
        assert!(game.remove_score(Team::Away, T0).is_none());
        assert_eq!(game, before);
    }

    #[test]
    fn advance_resets_clock_but_keeps_scores() {
        let mut game = Game::new();
        game.add_score(Team::Home, T0);
        game.toggle_timer(T0);
        game.tick(T0 + 42_000);

        for expected in 2..=4 {
            let event = game.advance(T0 + 50_000);
            assert!(matches!(event, Event::QuarterAdvanced { quarter, .. } if quarter == expected));
            assert_eq!(game.timer().state(), TimerState::Idle);
            assert_eq!(game.timer().remaining_secs(), QUARTER_DURATION_SECS);
        }
        assert_eq!(game.total_for(Team::Home), 1);

        let before = game.clone();
        assert!(matches!(game.advance(T0 + 60_000), Event::GameComplete { quarter: 4, .. }));
        assert_eq!(game, before);
    }

    #[test]
    fn reset_restores_everything() {
        let mut game = Game::new();
        game.rename(Team::Home, "lions", T0);
        game.add_score(Team::Home, T0);
        game.advance(T0);
        game.toggle_timer(T0);
        game.reset(T0 + 1_000);
        assert_eq!(game, Game::new());
    }

    #[test]
    fn names_are_truncated_and_uppercased() {
        let mut game = Game::new();
        game.rename(Team::Away, "the quick brown fox jumps", T0);
        assert_eq!(game.name(Team::Away), "THE QUICK BROWN FOX ");
        assert_eq!(normalize_team_name("ünïcode"), "ÜNÏCODE");
    }

    #[test]
    fn team_parsing() {
        assert_eq!("Home".parse::<Team>(), Ok(Team::Home));
        assert_eq!("a".parse::<Team>(), Ok(Team::Away));
        assert!("referee".parse::<Team>().is_err());
    }

    #[test]
    fn snapshot_projects_running_clock() {
        let mut game = Game::new();
        game.toggle_timer(T0);
        match game.snapshot(T0 + 61_000) {
            Event::StateSnapshot { remaining_secs, clock, timer_state, quarters, .. } => {
                assert_eq!(remaining_secs, 839);
                assert_eq!(clock, "13:59");
                assert_eq!(timer_state, TimerState::Running);
                assert_eq!(quarters.len(), 4);
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn deserialize_checks_quarter_and_clock() {
        let mut game = Game::new();
        game.add_score(Team::Home, T0);
        game.advance(T0);
        let mut value = serde_json::to_value(&game).unwrap();
        let restored: Game = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(restored, game);

        value["current_quarter"] = 5.into();
        let err = serde_json::from_value::<Game>(value.clone()).unwrap_err();
        assert!(err.to_string().contains("current_quarter"));

        value["current_quarter"] = 0.into();
        assert!(serde_json::from_value::<Game>(value.clone()).is_err());

        value["current_quarter"] = 2.into();
        value["timer"]["remaining_secs"] = (QUARTER_DURATION_SECS + 1).into();
        assert!(serde_json::from_value::<Game>(value).is_err());
    }
}
