//! Integration tests for a full game driven through the public API.

use scoreboard_core::{
    Event, NotificationLevel, QuarterScore, Scoreboard, Silent, Team, TimerState,
    QUARTER_DURATION_SECS,
};

const T0: u64 = 1_700_000_000_000;

fn board() -> Scoreboard<Silent, Silent> {
    Scoreboard::new(Silent, Silent)
}

#[test]
fn test_quarter_runs_to_expiry() {
    let mut board = board();
    board.toggle_timer(T0);

    // Ticks every 100ms for the first few seconds.
    for n in 1..=30 {
        assert!(board.tick(T0 + n * 100).is_none());
    }
    assert_eq!(board.game().timer().remaining_secs(), 897);

    let mut expiries = 0;
    for n in 0..20 {
        if board.tick(T0 + 900_000 + n * 100).is_some_and(|e| e.is_expiry()) {
            expiries += 1;
        }
    }
    assert_eq!(expiries, 1);
    assert_eq!(board.game().timer().remaining_secs(), 0);
    assert!(!board.is_running());
}

#[test]
fn test_background_gap_is_accounted_on_resync() {
    let mut board = board();
    for _ in 0..3 {
        board.next_quarter(T0);
    }
    board.drain_notifications();

    board.toggle_timer(T0);
    // Polling stopped while hidden; only the foreground signal arrives.
    let event = board.resync(T0 + (QUARTER_DURATION_SECS + 15) * 1000);
    assert!(matches!(event, Some(Event::TimerExpired { .. })));
    assert_eq!(board.game().timer().state(), TimerState::Expired);

    let notes = board.drain_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
    assert_eq!(notes[0].description.as_deref(), Some("Quarter 4 has ended"));
}

#[test]
fn test_scores_survive_quarter_changes() {
    let mut board = board();
    board.add_score(Team::Home, T0);
    board.add_score(Team::Home, T0);
    board.next_quarter(T0);
    board.add_score(Team::Away, T0);
    board.remove_score(Team::Home, T0);
    board.next_quarter(T0);
    board.next_quarter(T0);
    board.add_score(Team::Away, T0);

    let quarters = board.game().ledger().quarters().to_vec();
    assert_eq!(
        quarters,
        vec![
            QuarterScore { home: 2, away: 0 },
            QuarterScore { home: 0, away: 1 },
            QuarterScore { home: 0, away: 0 },
            QuarterScore { home: 0, away: 1 },
        ]
    );
    assert_eq!(board.game().total_for(Team::Home), 2);
    assert_eq!(board.game().total_for(Team::Away), 2);
}

#[test]
fn test_reset_after_mixed_play() {
    let mut board = board();
    board.rename(Team::Home, "north shore", T0);
    board.add_score(Team::Home, T0);
    board.next_quarter(T0);
    board.toggle_timer(T0);
    board.tick(T0 + 12_345);

    board.reset_game(T0 + 20_000);
    let game = board.game();
    assert_eq!(game.quarter(), 1);
    assert_eq!(game.name(Team::Home), "HOME");
    assert_eq!(game.timer().remaining_secs(), QUARTER_DURATION_SECS);
    assert!(!game.timer().running());
    assert!(game
        .ledger()
        .quarters()
        .iter()
        .all(|q| *q == QuarterScore::default()));

    // A tick that was already scheduled before the reset lands harmlessly.
    assert!(board.tick(T0 + 900_000).is_none());
    assert_eq!(board.game().timer().remaining_secs(), QUARTER_DURATION_SECS);
}

#[test]
fn test_snapshot_serializes_for_views() {
    let mut board = board();
    board.rename(Team::Away, "Rovers", T0);
    board.add_score(Team::Away, T0);
    let json = serde_json::to_value(board.snapshot(T0)).unwrap();
    assert_eq!(json["type"], "StateSnapshot");
    assert_eq!(json["away_name"], "ROVERS");
    assert_eq!(json["away_total"], 1);
    assert_eq!(json["clock"], "15:00");
    assert_eq!(json["timer_state"], "idle");
    assert_eq!(json["quarters"].as_array().map(Vec::len), Some(4));
}
