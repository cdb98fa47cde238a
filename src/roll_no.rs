//! Canonical form of participant roll numbers.
//!
//! Every boundary that writes or reads team membership goes through
//! [`normalize`], otherwise lookups silently miss.

/// Separator used when joining members into a [`membership_key`].
const KEY_SEPARATOR: &str = "|";

/// Trim surrounding whitespace and upper-case the roll number.
///
/// Returns `None` when nothing is left after trimming.
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_uppercase())
}

/// Normalize a batch of roll numbers, dropping blank entries.
///
/// Order and duplicates are preserved so callers can report one outcome per
/// submitted entry.
pub fn normalize_all<I, S>(raws: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raws.into_iter()
        .filter_map(|raw| normalize(raw.as_ref()))
        .collect()
}

/// Normalize, sort and de-duplicate a member list so it can be compared as a set.
pub fn canonical_members<I, S>(raws: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut members = normalize_all(raws);
    members.sort();
    members.dedup();
    members
}

/// Key identifying a team by its exact member set.
///
/// Empty when the list holds no usable roll number.
pub fn membership_key<I, S>(raws: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    canonical_members(raws).join(KEY_SEPARATOR)
}
