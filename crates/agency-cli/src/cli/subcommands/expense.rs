use clap::Subcommand;

/// Project expense commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense against a project.
    Add {
        #[arg(long)]
        project: String,
        #[arg(long)]
        amount: String,
        /// YYYY-MM-DD (defaults to today).
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        description: String,
    },
    /// List the expenses of a project.
    List {
        #[arg(long)]
        project: String,
    },
    /// Delete an expense.
    Delete { id: String },
}
