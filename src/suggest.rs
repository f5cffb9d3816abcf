//! Fuzzy matching of object names.

use std::cmp::Ordering;

/// Minimum Jaro-Winkler similarity for a name to count as close.
pub const SIMILARITY_THRESHOLD: f64 = 0.8;

/// Names from `pool` similar to `name`, best first.
///
/// Ties are broken alphabetically and at most `limit` names are returned.
pub fn closest_matches<I, S>(name: &str, pool: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut scored: Vec<(f64, String)> = pool
        .into_iter()
        .filter_map(|candidate| {
            let candidate = candidate.as_ref();
            let score = strsim::jaro_winkler(name, candidate);
            (score >= SIMILARITY_THRESHOLD).then(|| (score, candidate.to_string()))
        })
        .collect();

    scored.sort_by(|(sa, na), (sb, nb)| {
        sb.partial_cmp(sa).unwrap_or(Ordering::Equal).then_with(|| na.cmp(nb))
    });
    scored.dedup_by(|a, b| a.1 == b.1);
    scored.truncate(limit);

    scored.into_iter().map(|(_, name)| name).collect()
}
