use clap::Subcommand;

/// Organization member commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Add a user to the organization.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// admin, manager or member
        #[arg(long, default_value = "member")]
        role: String,
        /// Daily capacity in hours (0-24).
        #[arg(long)]
        capacity: Option<String>,
    },
    /// List users in the organization.
    List,
    /// Get a user by ID.
    Get { id: String },
    /// Set or clear a user's daily capacity.
    Capacity {
        id: String,
        #[arg(long, conflicts_with = "clear", required_unless_present = "clear")]
        hours: Option<String>,
        #[arg(long)]
        clear: bool,
    },
}
