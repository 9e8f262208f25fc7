use crate::types::{Keyword, KeywordScore, KeywordScoreMap};

/// Sorts a mapping of keywords to their scores.
///
/// ### Sorting Order:
/// - **Primary:** Sorts by score in descending order (higher score first).
/// - **Secondary:** If two keywords have the same score, sorts by keyword
///   in ascending lexicographical order for deterministic ordering.
///
/// ### Example:
/// ```rust
/// use std::collections::HashMap;
/// use keyword_sniffer::sort_results;
///
/// let mut results = HashMap::new();
/// results.insert("python".to_string(), 2.0);
/// results.insert("rust".to_string(), 3.0);
/// results.insert("django".to_string(), 2.0);
///
/// let sorted = sort_results(&results);
/// assert_eq!(sorted, vec![
///     ("rust".to_string(), 3.0),
///     ("django".to_string(), 2.0),
///     ("python".to_string(), 2.0)
/// ]);
/// ```
pub fn sort_results(results: &KeywordScoreMap) -> Vec<(Keyword, KeywordScore)> {
    let mut sorted_results: Vec<(Keyword, KeywordScore)> = results
        .iter()
        .map(|(keyword, score)| (keyword.to_owned(), *score))
        .collect();

    sorted_results.sort_by(|a, b| {
        b.1.partial_cmp(&a.1) // Sort by score (descending)
            .unwrap_or(std::cmp::Ordering::Equal) // Handle NaN gracefully
            .then_with(|| a.0.cmp(&b.0)) // Secondary sort by keyword (ascending)
    });

    sorted_results
}
