use clap::Subcommand;

/// Task commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TaskCommands {
    /// Create a task.
    Create {
        #[arg(long)]
        project: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        due: Option<String>,
        /// Estimated hours.
        #[arg(long)]
        estimate: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
    },
    /// Update a task. Pass "none" to clear an optional field.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        estimate: Option<String>,
        /// Actual hours spent.
        #[arg(long)]
        actual: Option<String>,
        #[arg(long, conflicts_with = "unassign")]
        assignee: Option<String>,
        #[arg(long)]
        unassign: bool,
    },
    /// List the tasks of a project.
    List {
        #[arg(long)]
        project: String,
    },
    /// Get a task by ID.
    Get { id: String },
    /// Delete a task and its dependency edges.
    Delete { id: String },
}
