use clap::Subcommand;

/// Project commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProjectCommands {
    /// Create a project.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        client: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        budget: Option<String>,
        /// Three-letter currency code (defaults to planning.default_currency).
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// List projects, newest first.
    List {
        /// Include the financial rollup of each project.
        #[arg(long)]
        financials: bool,
    },
    /// Get a project by ID.
    Get { id: String },
    /// Update a project. Pass "none" to clear an optional field.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        client: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        budget: Option<String>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Delete a project with its tasks, expenses and time entries.
    Delete { id: String },
    /// Budget, spend and profitability of a project.
    Financials { id: String },
}
