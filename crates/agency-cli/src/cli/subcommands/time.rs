use clap::Subcommand;

/// Time tracking commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TimeCommands {
    /// Log hours against a project.
    Log {
        #[arg(long)]
        project: String,
        #[arg(long)]
        task: Option<String>,
        /// Log for another user (managers only).
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        hours: String,
        /// Hourly rate used for the labour cost rollup.
        #[arg(long)]
        rate: Option<String>,
        /// YYYY-MM-DD (defaults to today).
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// List the time entries of a project.
    List {
        #[arg(long)]
        project: String,
    },
    /// Delete a time entry.
    Delete { id: String },
}
