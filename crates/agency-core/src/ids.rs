//! ID prefix constants.
//!
//! Every entity ID is `<prefix>-<8 hex chars>`, generated by `agency-db`.

pub const PREFIX_ORGANIZATION: &str = "org";
pub const PREFIX_USER: &str = "usr";
pub const PREFIX_PROJECT: &str = "prj";
pub const PREFIX_TASK: &str = "tsk";
pub const PREFIX_EXPENSE: &str = "exp";
pub const PREFIX_TIME_ENTRY: &str = "tim";
pub const PREFIX_AUDIT: &str = "aud";

pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_ORGANIZATION,
    PREFIX_USER,
    PREFIX_PROJECT,
    PREFIX_TASK,
    PREFIX_EXPENSE,
    PREFIX_TIME_ENTRY,
    PREFIX_AUDIT,
];
