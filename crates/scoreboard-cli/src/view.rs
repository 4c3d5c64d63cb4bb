//! Text rendering of the board.

use scoreboard_core::{format_clock, Game, Notification, NotificationLevel, Team, TimerState};

const WIDTH: usize = 44;

/// Full board: clock, totals and (optionally) the per-quarter table.
pub fn render_board(game: &Game, remaining_secs: u64, show_breakdown: bool) -> String {
    let mut out = String::new();
    let rule = "=".repeat(WIDTH);
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&center(&format!(
        "Quarter {} / {}   [{}]",
        game.quarter(),
        game.quarter_count(),
        state_label(game.timer().state())
    )));
    out.push_str(&center(&format_clock(remaining_secs)));
    out.push_str(&"-".repeat(WIDTH));
    out.push('\n');
    out.push_str(&format!(
        "{:<20}  {:>20}\n",
        game.name(Team::Home),
        game.name(Team::Away)
    ));
    out.push_str(&format!(
        "{:<20}  {:>20}\n",
        game.total_for(Team::Home),
        game.total_for(Team::Away)
    ));

    if show_breakdown {
        out.push_str(&"-".repeat(WIDTH));
        out.push('\n');
        let mut header = String::from("      ");
        let mut home = String::from("home  ");
        let mut away = String::from("away  ");
        for (i, q) in game.ledger().quarters().iter().enumerate() {
            let n = i + 1;
            let marker = if n == usize::from(game.quarter()) { '*' } else { ' ' };
            header.push_str(&format!("{:>5}{marker}", format!("Q{n}")));
            home.push_str(&format!("{:>5} ", q.home));
            away.push_str(&format!("{:>5} ", q.away));
        }
        for line in [header, home, away] {
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
    out.push_str(&rule);
    out.push('\n');
    out
}

/// Single status line redrawn in place while the clock runs.
pub fn render_clock_line(game: &Game, remaining_secs: u64) -> String {
    format!(
        "Q{} {}  {} {} - {} {}",
        game.quarter(),
        format_clock(remaining_secs),
        game.name(Team::Home),
        game.total_for(Team::Home),
        game.total_for(Team::Away),
        game.name(Team::Away)
    )
}

pub fn render_notification(notification: &Notification) -> String {
    let tag = match notification.level {
        NotificationLevel::Success => "ok",
        NotificationLevel::Info => "info",
        NotificationLevel::Error => "!!",
    };
    match &notification.description {
        Some(description) => format!("[{tag}] {} {description}", notification.title),
        None => format!("[{tag}] {}", notification.title),
    }
}

pub const HELP: &str = "\
commands:
  +h / +a            add a point for home / away
  -h / -a            remove a point for home / away
  t, toggle          start or pause the clock
  n, next            move to the next quarter
  r, reset           start a new game
  name home|away X   rename a team
  hide / show        board goes to background / comes back
  sync               recompute the clock now
  s, status          print the board
  help               this text
  q, quit            leave";

fn state_label(state: TimerState) -> &'static str {
    match state {
        TimerState::Idle => "ready",
        TimerState::Running => "running",
        TimerState::Paused => "paused",
        TimerState::Expired => "time up",
    }
}

fn center(text: &str) -> String {
    format!("{text:^width$}\n", width = WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_shows_names_totals_and_active_quarter() {
        let mut game = Game::new();
        game.add_score(Team::Home, 0);
        game.advance(0);
        game.add_score(Team::Away, 0);
        let text = render_board(&game, 900, true);
        assert!(text.contains("Quarter 2 / 4"));
        assert!(text.contains("15:00"));
        assert!(text.contains("HOME"));
        assert!(text.contains("AWAY"));
        assert!(text.contains("Q2*"));
        assert!(!text.contains("Q1*"));
    }

    #[test]
    fn breakdown_can_be_hidden() {
        let text = render_board(&Game::new(), 900, false);
        assert!(!text.contains("Q1"));
    }

    #[test]
    fn clock_line_is_compact() {
        let game = Game::new();
        assert_eq!(render_clock_line(&game, 61), "Q1 01:01  HOME 0 - 0 AWAY");
    }

    #[test]
    fn notifications_carry_level_tag() {
        let note = Notification::error("Time's up!").with_description("Quarter 2 has ended");
        assert_eq!(render_notification(&note), "[!!] Time's up! Quarter 2 has ended");
        assert_eq!(
            render_notification(&Notification::success("Game reset!")),
            "[ok] Game reset!"
        );
    }
}
