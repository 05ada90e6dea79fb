//! FocusGuard CLI — Command-line interface for replaying focus sessions.
//!
//! Usage:
//!   focusguard replay <INPUTS>     Run recorded inputs through a session
//!   focusguard simulate            Write a scripted session to JSONL
//!   focusguard config init         Write the default config file
//!   focusguard config show         Print the effective configuration
//!   focusguard config validate     Check a config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use focusguard_common::config::LoggingConfig;

mod commands;
mod writer;

#[derive(Parser)]
#[command(
    name = "focusguard",
    about = "Webcam focus discipline from face landmarks",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/focusguard/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded input stream through a focus session
    Replay {
        /// Session inputs (JSONL)
        input: PathBuf,

        /// Where to write engine events (JSONL)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Never derive 1 Hz ticks from input timestamps
        #[arg(long)]
        no_synthetic_ticks: bool,

        /// Print the summary as JSON instead of a report card
        #[arg(long)]
        json: bool,
    },

    /// Write a scripted session built from synthetic faces
    Simulate {
        /// Output file (JSONL)
        #[arg(short, long, default_value = "session.jsonl")]
        output: PathBuf,

        /// Frames per second
        #[arg(long, default_value = "2")]
        fps: u32,

        /// Leave out tick records so replay derives them
        #[arg(long)]
        no_ticks: bool,

        /// Emit 468-point frames without iris landmarks
        #[arg(long)]
        no_iris: bool,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,

    /// Load and validate the configuration strictly
    Validate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // a broken config file is reported by the command that loads it
    let logging = if cli.verbose {
        LoggingConfig {
            level: "debug".to_string(),
            ..Default::default()
        }
    } else {
        commands::config::load(cli.config.as_deref())
            .map(|config| config.logging)
            .unwrap_or_default()
    };
    focusguard_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Replay {
            input,
            output,
            no_synthetic_ticks,
            json,
        } => {
            commands::replay::run(input, output, cli.config.as_deref(), no_synthetic_ticks, json)
                .await
        }
        Commands::Simulate {
            output,
            fps,
            no_ticks,
            no_iris,
        } => commands::simulate::run(output, fps, !no_ticks, !no_iris),
        Commands::Config { action } => match action {
            ConfigAction::Init { force } => commands::config::init(cli.config, force),
            ConfigAction::Show => commands::config::show(cli.config.as_deref()),
            ConfigAction::Validate => commands::config::validate(cli.config),
        },
    }
}
