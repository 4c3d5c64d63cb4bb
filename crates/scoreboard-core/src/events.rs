use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::{QuarterScore, Team};
use crate::timer::TimerState;

/// Every state change in the system produces an Event.
/// The view renders them; nothing in the core prints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ScoreAdded {
        team: Team,
        quarter: u8,
        quarter_score: u32,
        total: u32,
        at: DateTime<Utc>,
    },
    ScoreRemoved {
        team: Team,
        quarter: u8,
        quarter_score: u32,
        total: u32,
        at: DateTime<Utc>,
    },
    QuarterAdvanced {
        quarter: u8,
        at: DateTime<Utc>,
    },
    /// Advance was requested on the final quarter. Nothing changed.
    GameComplete {
        quarter: u8,
        at: DateTime<Utc>,
    },
    GameReset {
        at: DateTime<Utc>,
    },
    TeamRenamed {
        team: Team,
        name: String,
        at: DateTime<Utc>,
    },
    TimerStarted {
        remaining_secs: u64,
        deadline_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// The countdown reached zero. Emitted once per start/pause cycle.
    TimerExpired {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        quarter: u8,
        quarter_count: u8,
        home_name: String,
        away_name: String,
        home_total: u32,
        away_total: u32,
        quarters: Vec<QuarterScore>,
        timer_state: TimerState,
        remaining_secs: u64,
        clock: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// True for the expiry transition, regardless of which call produced it.
    pub fn is_expiry(&self) -> bool {
        matches!(self, Event::TimerExpired { .. })
    }
}

/// Classification of a transient user-visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// Toast-style message for the view. Not stored after it is drained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Notification {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.into(),
            description: None,
        }
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            title: title.into(),
            description: None,
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Converts epoch milliseconds into the timestamp carried by events.
pub(crate) fn at(epoch_ms: u64) -> DateTime<Utc> {
    i64::try_from(epoch_ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = Event::QuarterAdvanced {
            quarter: 2,
            at: at(0),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "QuarterAdvanced");
        assert_eq!(json["quarter"], 2);
    }

    #[test]
    fn epoch_conversion_keeps_millis() {
        assert_eq!(at(1_500).timestamp_millis(), 1_500);
    }

    #[test]
    fn notification_description_is_optional_in_json() {
        let plain = serde_json::to_value(Notification::success("Game reset!")).unwrap();
        assert!(plain.get("description").is_none());

        let described = Notification::error("Time's up!").with_description("Quarter 3 has ended");
        let json = serde_json::to_value(described).unwrap();
        assert_eq!(json["level"], "error");
        assert_eq!(json["description"], "Quarter 3 has ended");
    }
}
