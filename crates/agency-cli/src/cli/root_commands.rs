use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    DepCommands, ExpenseCommands, ProjectCommands, TaskCommands, TimeCommands, UserCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create the local database and the first organization with its admin.
    Init(InitArgs),
    /// Organization members and their capacity.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Client projects and their financial rollup.
    Project {
        #[command(subcommand)]
        action: ProjectCommands,
    },
    /// Tasks.
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
    /// Task dependencies and scheduling.
    Dep {
        #[command(subcommand)]
        action: DepCommands,
    },
    /// Project expenses.
    Expense {
        #[command(subcommand)]
        action: ExpenseCommands,
    },
    /// Time tracking.
    Time {
        #[command(subcommand)]
        action: TimeCommands,
    },
    /// Upcoming workload against availability.
    Capacity(CapacityArgs),
    /// View audit trail.
    Audit(AuditArgs),
}

/// Arguments for `agency init`.
#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Organization name.
    #[arg(long)]
    pub org: String,
    #[arg(long)]
    pub admin_name: String,
    #[arg(long)]
    pub admin_email: String,
}

/// Arguments for `agency capacity`.
#[derive(Clone, Debug, Args)]
pub struct CapacityArgs {
    /// Report for one user instead of the whole team.
    #[arg(long)]
    pub user: Option<String>,
    /// Reference date (YYYY-MM-DD, defaults to today).
    #[arg(long)]
    pub today: Option<String>,
}

/// Arguments for `agency audit`.
#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    #[arg(long)]
    pub entity_type: Option<String>,
    #[arg(long)]
    pub entity_id: Option<String>,
    #[arg(long)]
    pub action: Option<String>,
    /// Only entries written by this user.
    #[arg(long)]
    pub actor_id: Option<String>,
}
