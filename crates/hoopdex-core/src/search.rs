use crate::models::PlayerEntry;

/// Maximum number of results returned by [`search`].
pub const MAX_RESULTS: usize = 10;

/// Queries shorter than this (in characters, after trimming) match nothing.
pub const MIN_QUERY_CHARS: usize = 2;

/// Rank players whose display name contains `query`, case-insensitively.
///
/// Names starting with the query come first; within each group names are
/// ordered by their lowercased form. Ties keep index order. At most
/// [`MAX_RESULTS`] entries are returned.
pub fn search(entries: &[PlayerEntry], query: &str) -> Vec<PlayerEntry> {
    let needle = query.trim().to_lowercase();
    if needle.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }

    let mut matches: Vec<(bool, String, &PlayerEntry)> = entries
        .iter()
        .filter_map(|entry| {
            let name = entry.display_name.to_lowercase();
            name.contains(&needle)
                .then(|| (name.starts_with(&needle), name, entry))
        })
        .collect();

    // `sort_by` is stable, so equal keys keep index order.
    matches.sort_by(|(a_prefix, a_name, _), (b_prefix, b_name, _)| {
        b_prefix.cmp(a_prefix).then_with(|| a_name.cmp(b_name))
    });

    matches
        .into_iter()
        .take(MAX_RESULTS)
        .map(|(_, _, entry)| entry.clone())
        .collect()
}
