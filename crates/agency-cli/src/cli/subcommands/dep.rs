use clap::Subcommand;

/// Task dependency commands.
#[derive(Clone, Debug, Subcommand)]
pub enum DepCommands {
    /// Make DEPENDENT wait for DEPENDS_ON.
    Add {
        dependent: String,
        depends_on: String,
    },
    /// Remove a dependency edge. Removing a missing edge is not an error.
    Remove {
        dependent: String,
        depends_on: String,
    },
    /// List the edges of a project, or the neighbours of one task.
    List {
        #[arg(long, conflicts_with = "task", required_unless_present = "task")]
        project: Option<String>,
        #[arg(long)]
        task: Option<String>,
    },
    /// Project tasks ordered so that prerequisites come first.
    Schedule {
        #[arg(long)]
        project: String,
    },
    /// Tasks waiting on unfinished prerequisites.
    Blocked {
        #[arg(long)]
        project: String,
    },
    /// Open tasks whose prerequisites are all done.
    Ready {
        #[arg(long)]
        project: String,
    },
}
