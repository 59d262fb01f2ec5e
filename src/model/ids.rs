// src/model/ids.rs

//! Sequence-based identifiers of the form `<prefix>-<n>`.

/// Prefix used for dependency edge ids.
pub const DEPENDENCY_ID_PREFIX: &str = "dep";

pub fn format_id(prefix: &str, seq: u64) -> String {
    format!("{prefix}-{seq}")
}

/// Numeric suffix of `id` if it was minted with `prefix`.
///
/// Ids from another prefix, or with a non-numeric suffix, yield `None`.
pub fn parse_sequence(prefix: &str, id: &str) -> Option<u64> {
    id.strip_prefix(prefix)?
        .strip_prefix('-')?
        .parse::<u64>()
        .ok()
}

/// Next free sequence number given every id currently known.
pub fn next_sequence<'a>(prefix: &str, ids: impl IntoIterator<Item = &'a str>) -> u64 {
    ids.into_iter()
        .filter_map(|id| parse_sequence(prefix, id))
        .max()
        .map_or(1, |max| max + 1)
}
