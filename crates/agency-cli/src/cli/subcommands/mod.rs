pub mod dep;
pub mod expense;
pub mod project;
pub mod task;
pub mod time;
pub mod user;

pub use dep::DepCommands;
pub use expense::ExpenseCommands;
pub use project::ProjectCommands;
pub use task::TaskCommands;
pub use time::TimeCommands;
pub use user::UserCommands;
