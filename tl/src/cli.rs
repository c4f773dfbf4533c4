//! CLI command definitions and subcommands

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// tl - terminal task list
#[derive(Debug, Parser)]
#[command(
    name = "tl",
    about = "Terminal task list with persistent state",
    version,
    after_help = "Run without a subcommand to open the interactive list."
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

    /// Override the storage directory
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Keep everything in memory for this run
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the task list
    List,

    /// Add a task to the top of the list
    Add {
        /// Task text (joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Mark a task done, or not done
    Toggle {
        /// Task ID or unique prefix
        id: String,
    },

    /// Change a task's text
    Edit {
        /// Task ID or unique prefix
        id: String,

        /// New text (joined with spaces); blank keeps the old text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Delete a task
    Remove {
        /// Task ID or unique prefix
        id: String,
    },

    /// Delete all completed tasks
    ClearCompleted,

    /// Delete every task
    ClearAll {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show or switch the display theme
    Theme {
        #[arg(value_enum, default_value = "show")]
        action: ThemeAction,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeAction {
    Show,
    Toggle,
}
