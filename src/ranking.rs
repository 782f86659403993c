//! Candidate ranking
//!
//! Address results are ranked by how spatially precise their type tags are;
//! name-search candidates are filtered by admin region and ordered by
//! population.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::models::{GeoCandidate, RawGeocodeResult};

/// Score for results whose tags match no row of [`SPECIFICITY_TABLE`]
pub const FALLBACK_SCORE: u32 = 10;

/// Ordered `(tags, score)` rows; the first row with any tag present wins
pub const SPECIFICITY_TABLE: &[(&[&str], u32)] = &[
    (&["street_address"], 100),
    (&["premise", "subpremise"], 90),
    (&["route"], 80),
    (&["intersection"], 70),
    (&["sublocality", "locality"], 60),
    (&["political"], 50),
];

/// Specificity of a result's type tags
#[must_use]
pub fn specificity_score<S: AsRef<str>>(types: &[S]) -> u32 {
    SPECIFICITY_TABLE
        .iter()
        .find(|(tags, _)| types.iter().any(|t| tags.contains(&t.as_ref())))
        .map_or(FALLBACK_SCORE, |(_, score)| *score)
}

/// Most specific result; the earliest one wins ties
#[must_use]
pub fn pick_best(results: &[RawGeocodeResult]) -> Option<&RawGeocodeResult> {
    let mut best: Option<(&RawGeocodeResult, u32)> = None;
    for result in results {
        let score = specificity_score(&result.types);
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((result, score));
        }
    }
    best.map(|(result, _)| result)
}

/// Keep candidates whose admin1 contains `admin`, ignoring case and accents
///
/// When nothing matches the input is returned untouched.
#[must_use]
pub fn filter_by_admin(candidates: Vec<GeoCandidate>, admin: &str) -> Vec<GeoCandidate> {
    let needle = fold_key(admin);
    let matching: Vec<GeoCandidate> = candidates
        .iter()
        .filter(|c| {
            c.admin1
                .as_deref()
                .is_some_and(|a| fold_key(a).contains(&needle))
        })
        .cloned()
        .collect();

    if matching.is_empty() {
        candidates
    } else {
        matching
    }
}

/// Stable sort by population, largest first, unknown populations last
pub fn sort_by_population(candidates: &mut [GeoCandidate]) {
    candidates.sort_by(|a, b| b.population.cmp(&a.population));
}

/// Lowercase, trimmed, with diacritics stripped
#[must_use]
pub fn fold_key(s: &str) -> String {
    s.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}
