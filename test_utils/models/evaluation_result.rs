use crate::constants::{DEFAULT_FALSE_NEGATIVE_WEIGHT, DEFAULT_FALSE_POSITIVE_WEIGHT};
use std::collections::HashSet;

/// Expected vs. found keywords of one test document.
#[derive(Debug)]
pub struct EvaluationResult {
    pub expected: Vec<String>,
    pub false_positives: Vec<String>,
    pub false_negatives: Vec<String>,
    pub mse: f32,
}

impl EvaluationResult {
    pub fn new(expected: &[String], results: &[String]) -> Self {
        let expected_set: HashSet<_> = expected.iter().cloned().collect();
        let results_set: HashSet<_> = results.iter().cloned().collect();

        let mut false_positives: Vec<String> =
            results_set.difference(&expected_set).cloned().collect();
        let mut false_negatives: Vec<String> =
            expected_set.difference(&results_set).cloned().collect();

        false_positives.sort();
        false_negatives.sort();

        let mut evaluation_result = Self {
            expected: expected.to_vec(),
            false_positives,
            false_negatives,
            mse: 0.0, // Placeholder, will be updated
        };

        evaluation_result.mse = evaluation_result
            .compute_mse(DEFAULT_FALSE_NEGATIVE_WEIGHT, DEFAULT_FALSE_POSITIVE_WEIGHT);

        evaluation_result
    }

    pub fn is_exact(&self) -> bool {
        self.false_positives.is_empty() && self.false_negatives.is_empty()
    }

    /// Weighted mean squared error over expected, missing and unexpected keywords.
    pub fn compute_mse(&self, false_negative_weight: f32, false_positive_weight: f32) -> f32 {
        let weighted_squared_differences: f32 = self.false_negatives.len() as f32
            * false_negative_weight
            + self.false_positives.len() as f32 * false_positive_weight;

        let total_keywords =
            self.expected.len() + self.false_positives.len() + self.false_negatives.len();

        if total_keywords > 0 {
            weighted_squared_differences / total_keywords as f32
        } else {
            0.0 // Handle edge case where there are no keywords
        }
    }
}
