//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// FeatureQuest - Feature Research and PRD Workflow Orchestrator
#[derive(Parser)]
#[command(
    name = "fq",
    about = "Feature research, PRD, and issue-tracking workflow orchestrator",
    version,
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full research workflow for a feature
    Run {
        /// Feature name (prompted for when omitted)
        #[arg(value_name = "NAME")]
        name: Option<String>,

        /// Feature description (prompted for when omitted)
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Serve the HTTP API
    Serve {
        /// Bind host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check and triage comments on an existing tracker issue
    CheckComments {
        /// Issue id to monitor
        issue_id: String,
    },
}
