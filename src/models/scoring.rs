use crate::types::{KeywordOccurrenceMap, KeywordScore, KeywordScoreMap};
use crate::{Error, KeywordsChief};
use log::debug;
use std::fmt;
use std::sync::Arc;

/// Turns keyword occurrence counts of one document into scores.
pub trait Scoring: Send + Sync {
    fn score(
        &self,
        chief: &KeywordsChief,
        keywords: &KeywordOccurrenceMap,
    ) -> Result<KeywordScoreMap, Error>;
}

/// Scores are the raw occurrence counts.
pub struct CountScoring;

impl Scoring for CountScoring {
    fn score(
        &self,
        _chief: &KeywordsChief,
        keywords: &KeywordOccurrenceMap,
    ) -> Result<KeywordScoreMap, Error> {
        Ok(keywords
            .iter()
            .map(|(keyword, &count)| (keyword.clone(), count as KeywordScore))
            .collect())
    }
}

/// Sigmoid of the keyword usage relative to its baseline occurrence count.
///
/// With `c` the document count of a keyword, `b` its baseline count, `avg`
/// the sum of `c_i / b_i` over all found keywords and `total_avg` the mean
/// baseline count of the dictionary, the score is
/// `sigmoid(((c + b) / avg) - total_avg)`, always in `[0, 1]`.
pub struct RelativeUsageScoring;

impl RelativeUsageScoring {
    pub fn scoring_func(
        baseline_occurrence_count: f64,
        keyword_occurrence_count: f64,
        keywords_avg_occurrence_count: f64,
        total_average_occurrence_count: f64,
    ) -> KeywordScore {
        let x = ((keyword_occurrence_count + baseline_occurrence_count)
            / keywords_avg_occurrence_count)
            - total_average_occurrence_count;

        if x.is_nan() {
            return 0.0;
        }

        // e^-x saturates to inf or 0 for large |x|, giving exactly 0.0 or 1.0
        let score = 1.0 / (1.0 + (-x).exp());

        debug!("sigmoid({}) = {}", -x, score);

        score
    }
}

impl Scoring for RelativeUsageScoring {
    fn score(
        &self,
        chief: &KeywordsChief,
        keywords: &KeywordOccurrenceMap,
    ) -> Result<KeywordScoreMap, Error> {
        let baseline = |keyword: &str| {
            chief
                .entry(keyword)
                .map(|entry| entry.occurrence_count() as f64)
                .ok_or_else(|| {
                    Error::InvalidInput(format!(
                        "Keyword '{}' is not part of the keyword dictionary",
                        keyword
                    ))
                })
        };

        let total_average_occurrence_count = chief.average_occurrence_count();

        let mut keywords_avg_occurrence_count = 0.0;
        for (keyword, &count) in keywords {
            keywords_avg_occurrence_count += count as f64 / baseline(keyword)?;
        }

        let mut scores = KeywordScoreMap::with_capacity(keywords.len());
        for (keyword, &count) in keywords {
            debug!("Scoring keyword '{}'", keyword);

            scores.insert(
                keyword.clone(),
                Self::scoring_func(
                    baseline(keyword)?,
                    count as f64,
                    keywords_avg_occurrence_count,
                    total_average_occurrence_count,
                ),
            );
        }

        Ok(scores)
    }
}

/// TF-IDF scoring needs a document corpus, which is not available.
pub struct TfIdfScoring;

impl Scoring for TfIdfScoring {
    fn score(
        &self,
        _chief: &KeywordsChief,
        _keywords: &KeywordOccurrenceMap,
    ) -> Result<KeywordScoreMap, Error> {
        Err(Error::NotImplemented("TF-IDF scoring".to_string()))
    }
}

pub type ScoringFactory = fn() -> Arc<dyn Scoring>;

/// Named scorer constructors, populated explicitly at startup.
#[derive(Clone, Default)]
pub struct ScoringRegistry {
    scorers: Vec<(String, ScoringFactory)>,
}

impl ScoringRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `Count`, `RelativeUsage` and `TfIdf`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register_scoring("Count", || Arc::new(CountScoring));
        registry.register_scoring("RelativeUsage", || Arc::new(RelativeUsageScoring));
        registry.register_scoring("TfIdf", || Arc::new(TfIdfScoring));

        registry
    }

    /// Registers a scorer under `name`, replacing any previous registration
    /// with the same name while keeping its position.
    pub fn register_scoring(&mut self, name: &str, factory: ScoringFactory) {
        if let Some(existing) = self.scorers.iter_mut().find(|(n, _)| n == name) {
            existing.1 = factory;
        } else {
            self.scorers.push((name.to_string(), factory));
        }
    }

    pub fn get_scoring(&self, name: &str) -> Result<Arc<dyn Scoring>, Error> {
        self.scorers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, factory)| factory())
            .ok_or_else(|| Error::ScorerNotFound(name.to_string()))
    }

    /// Names of all registered scorers, in registration order.
    pub fn get_registered_scorers(&self) -> Vec<&str> {
        self.scorers.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl fmt::Debug for ScoringRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoringRegistry")
            .field("scorers", &self.get_registered_scorers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chief() -> KeywordsChief {
        KeywordsChief::from_json_str(
            r#"{
                "python": {"occurrence_count": 3},
                "functional-programming": {"occurrence_count": 3},
                "rust": {"occurrence_count": 3}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_registered_scorers() {
        let registry = ScoringRegistry::with_defaults();

        assert_eq!(
            registry.get_registered_scorers(),
            vec!["Count", "RelativeUsage", "TfIdf"]
        );
        assert!(matches!(
            registry.get_scoring("Unknown"),
            Err(Error::ScorerNotFound(name)) if name == "Unknown"
        ));
    }

    #[test]
    fn test_count_scoring() {
        let chief = chief();
        let keywords = chief.extract_keywords(["python", "functional-programming", "python"]);

        let scores = CountScoring.score(&chief, &keywords).unwrap();

        assert_eq!(scores["python"], 2.0);
        assert_eq!(scores["functional-programming"], 1.0);
    }

    #[test]
    fn test_relative_usage_scoring() {
        let chief = chief();

        // avg = 1/3 + 1/3, x = (1 + 3) / (2/3) - 3 = 3
        let keywords = chief.extract_keywords(["python", "functional-programming"]);
        let scores = RelativeUsageScoring.score(&chief, &keywords).unwrap();

        let expected = 1.0 / (1.0 + (-3.0f64).exp());
        assert!((scores["python"] - expected).abs() < 1e-12);
        assert_eq!(scores["python"], scores["functional-programming"]);

        let keywords = chief.extract_keywords(["python", "python", "functional-programming"]);
        let scores = RelativeUsageScoring.score(&chief, &keywords).unwrap();
        assert!(scores["python"] > scores["functional-programming"]);
        assert!(scores.values().all(|score| (0.0..=1.0).contains(score)));
    }

    #[test]
    fn test_relative_usage_scoring_is_deterministic() {
        let chief = chief();
        let keywords = chief.extract_keywords(["python", "rust", "rust"]);

        let first = RelativeUsageScoring.score(&chief, &keywords).unwrap();
        let second = RelativeUsageScoring.score(&chief, &keywords).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_relative_usage_rejects_unknown_keywords() {
        let mut keywords = KeywordOccurrenceMap::new();
        keywords.insert("cobol".to_string(), 1);

        let result = RelativeUsageScoring.score(&chief(), &keywords);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_sigmoid_saturates() {
        assert_eq!(RelativeUsageScoring::scoring_func(0.0, 0.0, 1.0, 1000.0), 0.0);
        assert_eq!(RelativeUsageScoring::scoring_func(1000.0, 0.0, 1.0, 0.0), 1.0);
        assert_eq!(RelativeUsageScoring::scoring_func(1.0, 1.0, 0.0, 0.0), 1.0);
    }

    #[test]
    fn test_tfidf_is_not_implemented() {
        let chief = chief();
        let keywords = chief.extract_keywords(["python"]);

        assert!(matches!(
            TfIdfScoring.score(&chief, &keywords),
            Err(Error::NotImplemented(_))
        ));
    }
}
