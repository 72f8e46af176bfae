use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `agency` binary.
#[derive(Debug, Parser)]
#[command(
    name = "agency",
    version,
    about = "Agency workbench - projects, task dependencies, budgets and capacity"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory (defaults to auto-detect via .agency)
    #[arg(short, long, global = true)]
    pub project_dir: Option<String>,

    /// Act as this user ID (defaults to actor.user_id from config)
    #[arg(long = "as", global = true, value_name = "USER_ID")]
    pub actor: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            project_dir: self.project_dir.clone(),
            actor: self.actor.clone(),
        }
    }
}
