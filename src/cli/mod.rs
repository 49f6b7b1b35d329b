pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "routinely")]
#[command(about = "Routinely CLI - track items and completion counters from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Account and token management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Tracked items")]
    Items {
        #[command(subcommand)]
        cmd: commands::items::ItemCommands,
    },

    #[command(about = "Recurrence intervals")]
    Intervals {
        #[command(subcommand)]
        cmd: commands::intervals::IntervalCommands,
    },
}

#[derive(Debug, Clone)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::Items { cmd } => commands::items::handle(cmd, output_format).await,
        Commands::Intervals { cmd } => commands::intervals::handle(cmd, output_format).await,
    }
}
