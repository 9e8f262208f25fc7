use crate::types::OccurrenceCount;
use std::collections::HashMap;
use std::hash::Hash;

/// Counts the frequency of items in the given sequence.
///
/// # Arguments
/// * `items` - An iterator over the items to analyze.
///
/// # Returns
/// * A `HashMap` where the keys are the distinct items and the values are their
///   respective frequencies.
///
/// # Example
/// ```ignore
/// let keywords = vec!["python", "rust", "python"];
/// let frequencies = count_token_frequencies(keywords);
/// assert_eq!(frequencies.get("python"), Some(&2));
/// assert_eq!(frequencies.get("rust"), Some(&1));
/// ```
pub fn count_token_frequencies<I, T>(items: I) -> HashMap<T, OccurrenceCount>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash,
{
    let mut frequencies: HashMap<T, OccurrenceCount> = HashMap::new();

    for item in items {
        *frequencies.entry(item).or_insert(0) += 1;
    }

    frequencies
}
