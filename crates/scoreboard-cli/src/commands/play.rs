use std::io::{IsTerminal, Write};
use std::str::FromStr;

use clap::Args;
use scoreboard_core::{
    now_ms, Config, CoreError, Event, Notification, Scoreboard, Team, Ticker, ValidationError,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::devices::{TerminalBell, TracingHaptics};
use crate::view;

#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Never ring the bell
    #[arg(long)]
    pub no_sound: bool,
    /// Do not report haptic patterns
    #[arg(long)]
    pub no_haptics: bool,
    /// Print events and snapshots as JSON lines instead of the board
    #[arg(long)]
    pub json: bool,
}

/// One line typed at the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Add(Team),
    Remove(Team),
    Toggle,
    Next,
    Reset,
    Rename(Team, String),
    Hide,
    Show,
    Sync,
    Status,
    Help,
    Quit,
    Empty,
}

impl FromStr for Input {
    type Err = ValidationError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if let Some(team) = line.strip_prefix('+') {
            return Ok(Input::Add(team.parse()?));
        }
        if let Some(team) = line.strip_prefix('-') {
            return Ok(Input::Remove(team.parse()?));
        }

        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match word.to_ascii_lowercase().as_str() {
            "" => Ok(Input::Empty),
            "t" | "toggle" => Ok(Input::Toggle),
            "n" | "next" => Ok(Input::Next),
            "r" | "reset" => Ok(Input::Reset),
            "hide" => Ok(Input::Hide),
            "show" => Ok(Input::Show),
            "sync" => Ok(Input::Sync),
            "s" | "status" => Ok(Input::Status),
            "help" | "?" => Ok(Input::Help),
            "q" | "quit" | "exit" => Ok(Input::Quit),
            "name" => {
                let rest = rest.trim_start();
                let (team, name) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Ok(Input::Rename(team.parse()?, name.trim().to_string()))
            }
            other => Err(ValidationError::InvalidValue {
                field: "command".to_string(),
                message: format!("unknown command '{other}', try 'help'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub json: bool,
    pub show_breakdown: bool,
    /// stdout is a terminal, so the running clock can be redrawn in place.
    pub live: bool,
}

/// The view: owns the board and the ticker for the life of one session.
pub struct Session<W> {
    board: Scoreboard<TracingHaptics, TerminalBell>,
    ticker: Ticker,
    visible: bool,
    options: SessionOptions,
    out: W,
    /// Seconds shown on the in-place clock line, if one is open.
    live_line: Option<u64>,
    /// Epoch milliseconds handed to the board by the input loop.
    clock: Box<dyn Fn() -> u64>,
}

impl<W: Write> Session<W> {
    pub fn new(
        board: Scoreboard<TracingHaptics, TerminalBell>,
        ticker: Ticker,
        out: W,
        options: SessionOptions,
    ) -> Self {
        Self {
            board,
            ticker,
            visible: true,
            options,
            out,
            live_line: None,
            clock: Box::new(now_ms),
        }
    }

    /// Replace the wall clock used by `drive`.
    #[cfg(test)]
    pub fn with_clock(mut self, clock: impl Fn() -> u64 + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[cfg(test)]
    pub fn board(&self) -> &Scoreboard<TracingHaptics, TerminalBell> {
        &self.board
    }

    #[cfg(test)]
    pub fn is_polling(&self) -> bool {
        self.ticker.is_armed()
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    pub fn open(&mut self, now: u64) -> Result<(), CoreError> {
        if !self.options.json {
            self.say("type 'help' for commands")?;
        }
        self.show_board(now)
    }

    pub fn handle(&mut self, input: Input, now: u64) -> Result<Flow, CoreError> {
        debug!(?input, "input");
        let redraw = !matches!(input, Input::Help | Input::Empty | Input::Quit);
        match input {
            Input::Add(team) => {
                let event = self.board.add_score(team, now);
                self.emit(&event)?;
            }
            Input::Remove(team) => {
                if let Some(event) = self.board.remove_score(team, now) {
                    self.emit(&event)?;
                }
            }
            Input::Toggle => {
                if let Some(event) = self.board.toggle_timer(now) {
                    self.emit(&event)?;
                }
            }
            Input::Next => {
                let event = self.board.next_quarter(now);
                self.emit(&event)?;
            }
            Input::Reset => {
                let event = self.board.reset_game(now);
                self.emit(&event)?;
            }
            Input::Rename(team, name) => {
                let event = self.board.rename(team, &name, now);
                self.emit(&event)?;
            }
            Input::Hide => {
                self.visible = false;
                debug!("board hidden, polling suspended");
            }
            Input::Show | Input::Sync => {
                self.visible = true;
                if let Some(event) = self.board.resync(now) {
                    self.emit(&event)?;
                }
            }
            Input::Status => {}
            Input::Help => self.say(view::HELP)?,
            Input::Quit => return Ok(Flow::Quit),
            Input::Empty => {}
        }
        self.flush_notifications()?;
        self.sync_ticker();
        if redraw {
            self.show_board(now)?;
        }
        Ok(Flow::Continue)
    }

    pub fn on_tick(&mut self, now: u64) -> Result<(), CoreError> {
        match self.board.tick(now) {
            Some(event) => {
                self.emit(&event)?;
                self.flush_notifications()?;
                self.show_board(now)?;
            }
            None if self.options.live && !self.options.json => {
                let remaining = self.board.game().timer().remaining_secs();
                if self.live_line != Some(remaining) {
                    let line = view::render_clock_line(self.board.game(), remaining);
                    write!(self.out, "\r{line}")?;
                    self.out.flush()?;
                    self.live_line = Some(remaining);
                }
            }
            None => {}
        }
        self.sync_ticker();
        Ok(())
    }

    /// Poll only while the clock runs and the board is on screen.
    fn sync_ticker(&mut self) {
        self.ticker
            .set_armed(self.visible && self.board.is_running());
    }

    fn emit(&mut self, event: &Event) -> Result<(), CoreError> {
        if self.options.json {
            self.close_live_line()?;
            writeln!(self.out, "{}", serde_json::to_string(event)?)?;
        }
        Ok(())
    }

    fn flush_notifications(&mut self) -> Result<(), CoreError> {
        for notification in self.board.drain_notifications() {
            if self.options.json {
                self.close_live_line()?;
                writeln!(self.out, "{}", notification_json(&notification)?)?;
            } else {
                self.say(&view::render_notification(&notification))?;
            }
        }
        Ok(())
    }

    fn show_board(&mut self, now: u64) -> Result<(), CoreError> {
        if self.options.json {
            let snapshot = self.board.snapshot(now);
            return self.emit(&snapshot);
        }
        let remaining = self.board.game().timer().remaining_at(now);
        let text = view::render_board(self.board.game(), remaining, self.options.show_breakdown);
        self.close_live_line()?;
        write!(self.out, "{text}")?;
        self.out.flush()?;
        Ok(())
    }

    fn say(&mut self, text: &str) -> Result<(), CoreError> {
        self.close_live_line()?;
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    fn close_live_line(&mut self) -> Result<(), CoreError> {
        if self.live_line.take().is_some() {
            writeln!(self.out)?;
        }
        Ok(())
    }

    /// Read input until `quit` or EOF, polling the clock in between.
    async fn run_loop<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<(), CoreError> {
        let mut lines = input.lines();
        self.sync_ticker();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    match line.parse::<Input>() {
                        Ok(input) => {
                            let now = (self.clock)();
                            if self.handle(input, now)? == Flow::Quit {
                                break;
                            }
                        }
                        Err(e) => self.say(&format!("error: {e}"))?,
                    }
                }
                _ = self.ticker.tick() => {
                    let now = (self.clock)();
                    self.on_tick(now)?;
                }
            }
        }
        Ok(())
    }

    /// Drive the session to completion. The ticker is released on every
    /// exit path.
    pub async fn drive<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<(), CoreError> {
        let result = self.run_loop(input).await;
        self.ticker.disarm();
        self.close_live_line()?;
        result
    }
}

fn notification_json(notification: &Notification) -> Result<String, CoreError> {
    let mut value = serde_json::to_value(notification)?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert("type".to_string(), "Notification".into());
    }
    Ok(serde_json::to_string(&value)?)
}

fn load_config() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "using default configuration");
            Config::default()
        }
    }
}

pub fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config();
    let haptics = TracingHaptics::new(config.feedback.haptics && !args.no_haptics);
    let bell = TerminalBell::new(config.feedback.sound && !args.no_sound);

    let stdout = std::io::stdout();
    let options = SessionOptions {
        json: args.json,
        show_breakdown: config.display.show_breakdown,
        live: stdout.is_terminal(),
    };
    let mut session = Session::new(
        Scoreboard::new(haptics, bell),
        Ticker::new(config.poll_interval()),
        stdout,
        options,
    );

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = rt.block_on(async {
        session.open(now_ms())?;
        session.drive(BufReader::new(tokio::io::stdin())).await
    });
    // stdin reads run on a blocking thread that may never return.
    rt.shutdown_background();
    result?;
    Ok(())
}
