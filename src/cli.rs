use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::{Accent, Distro};

/// kickstart - run installation steps under a fixed logo and status header
#[derive(Parser, Debug)]
#[command(name = "kickstart")]
#[command(about = "Run installation steps under a fixed logo and status header")]
#[command(version)]
pub struct Cli {
    /// Preview the steps without executing commands
    #[arg(short, long, global = true)]
    pub dry: bool,

    /// Distribution branding for the header
    #[arg(long, global = true)]
    pub distro: Option<Distro>,

    /// Accent colour for the status line (defaults to the distribution's)
    #[arg(long, global = true)]
    pub accent: Option<Accent>,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Rows that must fit below the header before the fixed layout is used
    #[arg(long, global = true)]
    pub min_scroll_rows: Option<u16>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the steps of a JSON plan
    Run {
        /// Path to the plan file
        plan: PathBuf,
    },
    /// Walk through a full installation without changing anything
    Demo,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
