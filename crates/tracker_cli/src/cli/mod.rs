use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Color theme for the calendar (overrides the config file)
    #[arg(long, global = true, value_name = "THEME")]
    pub theme: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: tracker add "Stretch for ten minutes"
    /// Example: tracker add "File taxes" --once
    Add {
        title: Option<String>,
        /// Create a one-off task instead of a daily one
        #[arg(long)]
        once: bool,
    },
    /// Rename a task
    ///
    /// Example: tracker rename task-1 "Stretch for twenty minutes"
    Rename { id: String, new_title: String },
    /// Archive a task; it keeps its history but leaves every list
    ///
    /// Example: tracker archive task-1
    Archive { id: String },
    /// Mark a task completed for a day
    ///
    /// Example: tracker done task-1
    /// Example: tracker done task-1 --date 2026-08-01
    Done {
        id: String,
        /// Day to mark, YYYY-MM-DD (defaults to today)
        #[arg(long, value_name = "DATE")]
        date: Option<String>,
    },
    /// Mark a task missed for a day, recording why
    ///
    /// Example: tracker miss task-1 "slept in"
    Miss {
        id: String,
        note: String,
        /// Day to mark, YYYY-MM-DD (defaults to today)
        #[arg(long, value_name = "DATE")]
        date: Option<String>,
    },
    /// List active tasks with today's completion state
    List,
    /// Show current and longest streaks
    Stats,
    /// Show the 28-day completion calendar
    Calendar,
}
