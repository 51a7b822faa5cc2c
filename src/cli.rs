//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Terminal Minesweeper with levels, experience and unlockable abilities
#[derive(Parser, Debug)]
#[command(name = "minesweep")]
#[command(version)]
pub struct Cli {
    /// Seed for mine placement and ability rolls (random when omitted)
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Profile file to use instead of ~/.minesweep/profile.json
    #[arg(long, global = true)]
    pub profile: Option<PathBuf>,

    /// Keep progress in memory only
    #[arg(long, global = true)]
    pub no_save: bool,

    /// Write logs to this file (set the level with RUST_LOG)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Play in the terminal (default)
    Play,
    /// Print profile statistics
    Stats,
    /// Delete saved progress and start over
    ResetProfile,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Play)
    }
}
