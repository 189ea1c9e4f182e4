//! Semicolon-delimited identifier lists
//! ------------------------------------
//! Single source of truth for the wire form used to flatten a set of
//! discipline ids into one session/store field and back.

use uuid::Uuid;

pub const SEPARATOR: char = ';';

/// Parse a semicolon-delimited id list. Returns `None` when the input is
/// empty or any segment fails to parse; callers treat that as invalid input
/// rather than a partial result.
pub fn parse(list: &str) -> Option<Vec<Uuid>> {
    let trimmed = list.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut out = Vec::new();
    for part in trimmed.split(SEPARATOR) {
        let p = part.trim();
        if p.is_empty() {
            return None;
        }
        match Uuid::parse_str(p) {
            Ok(id) => out.push(id),
            Err(_) => return None,
        }
    }
    Some(out)
}

/// Join ids back into the flattened wire form, preserving order.
pub fn join(ids: &[Uuid]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(";")
}

/// True when any id occurs more than once. Lists are short (a student's
/// enrolled disciplines), so the quadratic scan is fine.
pub fn has_duplicates(ids: &[Uuid]) -> bool {
    ids.iter().enumerate().any(|(i, id)| ids[i + 1..].contains(id))
}
