pub mod audit;
pub mod capacity;
pub mod dep;
pub mod dispatch;
pub mod expense;
pub mod init;
pub mod project;
pub mod shared;
pub mod task;
pub mod time;
pub mod user;
