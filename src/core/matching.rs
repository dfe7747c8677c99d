//! Title resolution - Turning what a user typed into a catalog title.
//!
//! Comparison is case-insensitive. An exact match resolves directly; otherwise
//! titles are ranked by normalized Levenshtein similarity and the best few
//! above the cutoff are offered as choices.

use std::cmp::Ordering;

/// Most candidates offered for an ambiguous title.
pub const MAX_CANDIDATES: usize = 5;

/// Minimum similarity (0.0 to 1.0) for a title to be offered.
pub const SIMILARITY_CUTOFF: f64 = 0.6;

/// Result of resolving user input against a list of titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleMatch {
    /// The input names this title exactly (ignoring case)
    Exact(String),
    /// Closest titles, best first; never empty, at most [`MAX_CANDIDATES`]
    Candidates(Vec<String>),
    /// Nothing came close enough
    NoMatch,
}

/// Resolves `input` against `titles`.
///
/// A title identical to the input wins outright, then the first one equal
/// ignoring case. Otherwise every title scoring at least [`SIMILARITY_CUTOFF`]
/// is ranked by score (ties broken alphabetically) and the top
/// [`MAX_CANDIDATES`] are returned.
pub fn resolve_title<'a, I>(input: &str, titles: I) -> TitleMatch
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return TitleMatch::NoMatch;
    }
    let needle_len = needle.chars().count();
    let verbatim = input.trim();

    let mut scored: Vec<(&str, f64)> = Vec::new();
    let mut caseless: Option<&str> = None;
    for title in titles {
        if title == verbatim {
            return TitleMatch::Exact(title.to_string());
        }
        let candidate = title.to_lowercase();
        if candidate == needle {
            caseless.get_or_insert(title);
            continue;
        }

        // Edit distance is at least the length difference, which bounds the score
        let candidate_len = candidate.chars().count();
        let (short, long) = if candidate_len < needle_len {
            (candidate_len, needle_len)
        } else {
            (needle_len, candidate_len)
        };
        #[allow(clippy::cast_precision_loss)] // Title lengths are tiny
        let unreachable_score = (short as f64) < SIMILARITY_CUTOFF * long as f64;
        if unreachable_score {
            continue;
        }

        let score = strsim::normalized_levenshtein(&needle, &candidate);
        if score >= SIMILARITY_CUTOFF {
            scored.push((title, score));
        }
    }

    if let Some(title) = caseless {
        return TitleMatch::Exact(title.to_string());
    }
    if scored.is_empty() {
        return TitleMatch::NoMatch;
    }

    scored.sort_by(|a, b| match b.1.total_cmp(&a.1) {
        Ordering::Equal => a.0.cmp(b.0),
        other => other,
    });

    TitleMatch::Candidates(
        scored
            .into_iter()
            .take(MAX_CANDIDATES)
            .map(|(title, _)| title.to_string())
            .collect(),
    )
}
