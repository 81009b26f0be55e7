//! Configuration and CLI argument handling

use clap::{Parser, ValueEnum};

use crate::{
    state::{EngineConfig, FirstTick},
    utils::parse_duration,
};

/// How the console presents timer events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Clock, progress bar and spinner on one line per tick
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "countdown-timer")]
#[command(about = "A countdown timer with pause, resume and cancel")]
#[command(version)]
pub struct Config {
    /// Countdown length as SS, MM:SS or HH:MM:SS
    #[arg(short, long, default_value = "00:01:00", value_parser = parse_duration)]
    pub duration: u64,

    /// When the first tick fires after starting
    #[arg(long, value_enum, default_value_t = FirstTick::Delayed)]
    pub first_tick: FirstTick,

    /// Output format for timer events
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Start the countdown right away instead of waiting for input
    #[arg(long)]
    pub autostart: bool,

    /// Do not ring the terminal bell when the countdown finishes
    #[arg(long)]
    pub no_bell: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Engine options derived from the CLI
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            first_tick: self.first_tick,
        }
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
