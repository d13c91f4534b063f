mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "showcase")]
#[command(about = "Device ids and calendar exports for the showcase site")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the voter id a browser with these signals would get
    DeviceId {
        #[arg(long)]
        user_agent: String,

        /// Language tag, e.g. "en-US"
        #[arg(long)]
        language: String,

        #[arg(long)]
        width: u32,

        #[arg(long)]
        height: u32,

        /// Minutes behind UTC, as browsers report it (UTC+2 is -120)
        #[arg(long, allow_negative_numbers = true)]
        timezone_offset: i32,
    },
    /// Print the web calendar link for an event file
    CalendarUrl {
        /// Event file (TOML)
        event: PathBuf,

        /// Calendar endpoint to link to instead of Google Calendar
        #[arg(long)]
        provider_url: Option<String>,
    },
    /// Write the .ics file for an event file
    Export {
        /// Event file (TOML)
        event: PathBuf,

        /// Directory to write into
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Hash a password for the `accounts` section of the config
    HashPassword,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::DeviceId {
            user_agent,
            language,
            width,
            height,
            timezone_offset,
        } => commands::device_id::run(user_agent, language, width, height, timezone_offset),
        Commands::CalendarUrl {
            event,
            provider_url,
        } => commands::calendar_url::run(&event, provider_url.as_deref()),
        Commands::Export { event, out } => commands::export::run(&event, &out),
        Commands::HashPassword => commands::hash_password::run(),
    }
}
