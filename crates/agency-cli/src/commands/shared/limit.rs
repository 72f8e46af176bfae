/// Compute effective limit with precedence: global flag -> configured default.
///
/// A zero limit falls back to the default.
#[must_use]
pub fn effective_limit(flag: Option<u32>, default_limit: u32) -> u32 {
    flag.filter(|limit| *limit > 0).unwrap_or(default_limit)
}
