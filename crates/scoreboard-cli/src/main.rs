use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod commands;
mod devices;
mod logging;
mod view;

use logging::{init_logging, LogFormat};

#[derive(Parser)]
#[command(name = "scoreboard", version, about = "Four-quarter scoreboard with a countdown clock")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Human)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive board reading commands from stdin
    Play(commands::play::PlayArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.verbose);

    let result = match cli.command {
        Commands::Play(args) => commands::play::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "scoreboard", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
