pub mod limit;
pub mod parse;

use serde::Serialize;

/// Response for delete commands.
#[derive(Debug, Serialize)]
pub struct Deleted<'a> {
    pub id: &'a str,
    pub deleted: bool,
}

impl<'a> Deleted<'a> {
    pub const fn new(id: &'a str) -> Self {
        Self { id, deleted: true }
    }
}
