use crate::constants::{
    DEFAULT_OCCURRENCE_COUNT, SYNONYM_JOIN_DELIMITERS, SYNONYM_SPLIT_DELIMITERS,
    SYNONYM_WORD_DELIMITERS,
};
use crate::models::stopword_list::strip_anchors;
use crate::types::{
    Keyword, KeywordOccurrenceMap, OccurrenceCount, Synonym, TokenizedDocument,
};
use crate::utils::{count_token_frequencies, full_match_regex, read_text_file};
use crate::{Error, Lemmatizer, Stemmer, StopwordList, Taxonomy, TaxonomyEntry};
use log::{debug, info};
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::LazyLock;

static KEYWORD_PATTERN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9\-_.]*$").unwrap());

/// One keyword of the dictionary with its normalized synonyms and compiled patterns.
#[derive(Debug, Clone)]
pub struct KeywordEntry {
    name: Keyword,
    synonyms: Vec<Synonym>,
    regexes: Vec<Regex>,
    occurrence_count: OccurrenceCount,
}

impl KeywordEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Synonyms in declaration order; the keyword name itself comes last.
    pub fn synonyms(&self) -> &[Synonym] {
        &self.synonyms
    }

    pub fn regexes(&self) -> &[Regex] {
        &self.regexes
    }

    /// The regular expressions as they were written in the taxonomy.
    pub fn regex_patterns(&self) -> Vec<&str> {
        self.regexes
            .iter()
            .map(|regex| strip_anchors(regex.as_str()))
            .collect()
    }

    pub fn occurrence_count(&self) -> OccurrenceCount {
        self.occurrence_count
    }

    fn matching_regex(&self, token: &str) -> Option<&Regex> {
        self.regexes.iter().find(|regex| regex.is_match(token))
    }
}

/// The keyword dictionary: answers which keyword a token denotes.
#[derive(Debug, Clone)]
pub struct KeywordsChief {
    entries: Vec<KeywordEntry>,
    keyword_index: HashMap<Keyword, usize>,
    synonym_index: HashMap<Synonym, usize>,
    blacklist: StopwordList,
}

impl KeywordsChief {
    /// Builds the dictionary from a taxonomy without normalizing synonyms.
    pub fn new(taxonomy: &Taxonomy) -> Result<Self, Error> {
        Self::with_normalizers(taxonomy, None, None)
    }

    /// Builds the dictionary from a taxonomy.
    ///
    /// Every synonym (the keyword name included) is split at spaces, `_` and
    /// `-`; each part is lemmatized, then stemmed, and the parts are joined
    /// back with their original delimiters. Keyword names themselves are kept
    /// verbatim for exact lookups.
    pub fn with_normalizers(
        taxonomy: &Taxonomy,
        stemmer: Option<&dyn Stemmer>,
        lemmatizer: Option<&dyn Lemmatizer>,
    ) -> Result<Self, Error> {
        let mut entries = Vec::with_capacity(taxonomy.len());
        let mut keyword_index = HashMap::with_capacity(taxonomy.len());
        let mut synonym_index = HashMap::new();

        for (name, config) in taxonomy.iter() {
            let occurrence_count = config.occurrence_count.unwrap_or(DEFAULT_OCCURRENCE_COUNT);

            if occurrence_count == 0 {
                return Err(Error::InvalidInput(format!(
                    "Occurrence count of keyword '{}' has to be a positive integer",
                    name
                )));
            }

            let regexes = config
                .regexp
                .iter()
                .flatten()
                .map(|pattern| full_match_regex(pattern))
                .collect::<Result<Vec<_>, _>>()?;

            let mut synonyms: Vec<Synonym> = Vec::new();
            for synonym in config.synonyms.iter().flatten().chain(std::iter::once(name)) {
                let normalized = Self::normalize_synonym(synonym, stemmer, lemmatizer);

                if normalized != *synonym {
                    debug!(
                        "Normalized synonym '{}' of keyword '{}' to '{}'",
                        synonym, name, normalized
                    );
                }

                if !synonyms.contains(&normalized) {
                    synonyms.push(normalized);
                }
            }

            let idx = entries.len();

            keyword_index.insert(name.clone(), idx);

            for synonym in &synonyms {
                // The first declared keyword owns a shared synonym
                synonym_index.entry(synonym.clone()).or_insert(idx);
            }

            entries.push(KeywordEntry {
                name: name.clone(),
                synonyms,
                regexes,
                occurrence_count,
            });
        }

        info!("Loaded {} keywords", entries.len());

        Ok(Self {
            entries,
            keyword_index,
            synonym_index,
            blacklist: StopwordList::empty(),
        })
    }

    /// The dictionary built from the bundled taxonomy.
    pub fn default_chief() -> Result<Self, Error> {
        Self::new(&Taxonomy::default_taxonomy()?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        Self::new(&Taxonomy::from_json_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, Error> {
        Self::new(&Taxonomy::from_path(path)?)
    }

    /// Tokens in `blacklist` are never reported by `is_keyword`.
    pub fn with_blacklist(mut self, blacklist: StopwordList) -> Self {
        self.blacklist = blacklist;
        self
    }

    /// Loads a blacklist file in stopword format.
    pub fn with_blacklist_file(self, path: &Path) -> Result<Self, Error> {
        let blacklist = StopwordList::parse(&read_text_file(path)?)?;
        Ok(self.with_blacklist(blacklist))
    }

    pub fn blacklist(&self) -> &StopwordList {
        &self.blacklist
    }

    fn normalize_synonym(
        synonym: &str,
        stemmer: Option<&dyn Stemmer>,
        lemmatizer: Option<&dyn Lemmatizer>,
    ) -> Synonym {
        if stemmer.is_none() && lemmatizer.is_none() {
            return synonym.to_string();
        }

        let normalize_part = |part: &str| {
            if part.is_empty() {
                return String::new();
            }

            let mut normalized = part.to_string();
            if let Some(lemmatizer) = lemmatizer {
                normalized = lemmatizer.lemmatize(&normalized);
            }
            if let Some(stemmer) = stemmer {
                normalized = stemmer.stem(&normalized);
            }
            normalized
        };

        let mut result = String::with_capacity(synonym.len());
        let mut part_start = 0;

        for (idx, c) in synonym.char_indices() {
            if SYNONYM_WORD_DELIMITERS.contains(&c) {
                result.push_str(&normalize_part(&synonym[part_start..idx]));
                result.push(c);
                part_start = idx + c.len_utf8();
            }
        }
        result.push_str(&normalize_part(&synonym[part_start..]));

        result
    }

    /// Resolves a token to the keyword it denotes.
    ///
    /// Lookup order: exact keyword name, then synonyms (the earliest declared
    /// keyword wins a shared synonym), then regular expressions in declaration
    /// order (the first fully matching one wins).
    pub fn get_keyword(&self, token: &str) -> Option<&str> {
        if let Some(&idx) = self.keyword_index.get(token) {
            debug!("Found direct keyword '{}'", token);
            return Some(&self.entries[idx].name);
        }

        if let Some(&idx) = self.synonym_index.get(token) {
            let keyword = &self.entries[idx].name;
            debug!("Found keyword '{}' for synonym '{}'", keyword, token);
            return Some(keyword);
        }

        for entry in &self.entries {
            if let Some(regex) = entry.matching_regex(token) {
                debug!(
                    "Found keyword '{}' for token '{}' based on regexp '{}'",
                    entry.name,
                    token,
                    regex.as_str()
                );
                return Some(&entry.name);
            }
        }

        None
    }

    /// Counts how often each keyword is denoted by the given tokens.
    pub fn extract_keywords<I, T>(&self, tokens: I) -> KeywordOccurrenceMap
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let keywords: Vec<Keyword> = tokens
            .into_iter()
            .filter_map(|token| self.get_keyword(token.as_ref()).map(str::to_string))
            .collect();

        count_token_frequencies(keywords)
    }

    /// Counts keywords over every token of every sentence, n-gram sentence included.
    pub fn extract_keywords_from_document(&self, document: &TokenizedDocument) -> KeywordOccurrenceMap {
        self.extract_keywords(document.iter().flatten())
    }

    /// The largest number of space-separated words in any synonym; at least 1.
    pub fn compute_ngram_size(&self) -> usize {
        self.entries
            .iter()
            .flat_map(|entry| entry.synonyms.iter())
            .map(|synonym| synonym.split(' ').count())
            .max()
            .unwrap_or(1)
            .max(1)
    }

    /// Exact keyword name which is not blacklisted.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.keyword_index.contains_key(word) && !self.blacklist.contains(word)
    }

    /// Spelling variants of a keyword: for each of `-`, `.` and `_` present in
    /// it, the keyword is split there and re-joined with every other delimiter
    /// (space and the empty string included).
    pub fn compute_synonyms(keyword: &str) -> BTreeSet<Synonym> {
        let mut synonyms = BTreeSet::new();

        for &split_delimiter in SYNONYM_SPLIT_DELIMITERS {
            if !keyword.contains(split_delimiter) {
                continue;
            }

            let parts: Vec<&str> = keyword.split(split_delimiter).collect();

            for &join_delimiter in SYNONYM_JOIN_DELIMITERS {
                if join_delimiter == split_delimiter {
                    continue;
                }
                synonyms.insert(parts.join(join_delimiter));
            }
        }

        synonyms
    }

    /// Whether a string is acceptable as a keyword name: at least two
    /// characters fully matching `[A-Za-z0-9][A-Za-z0-9\-_.]*`.
    pub fn matches_keyword_pattern(keyword: &str) -> bool {
        keyword.len() >= 2 && KEYWORD_PATTERN_RE.is_match(keyword)
    }

    /// Canonical keyword form: spaces become `-`, then leading and trailing
    /// `.` and `_` are removed.
    pub fn filter_keyword(keyword: &str) -> Keyword {
        keyword
            .split(' ')
            .collect::<Vec<_>>()
            .join("-")
            .trim_matches(|c| c == '.' || c == '_')
            .to_string()
    }

    /// Normalized synonyms of a keyword; empty for unknown keywords.
    pub fn get_synonyms(&self, keyword: &str) -> &[Synonym] {
        self.entry(keyword).map_or(&[][..], |entry| entry.synonyms())
    }

    pub fn entry(&self, keyword: &str) -> Option<&KeywordEntry> {
        self.keyword_index.get(keyword).map(|&idx| &self.entries[idx])
    }

    pub fn entries(&self) -> &[KeywordEntry] {
        &self.entries
    }

    pub fn keywords_count(&self) -> usize {
        self.entries.len()
    }

    /// Mean occurrence count over the dictionary; `0.0` when it is empty.
    pub fn average_occurrence_count(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }

        let total: f64 = self
            .entries
            .iter()
            .map(|entry| entry.occurrence_count as f64)
            .sum();
        total / self.entries.len() as f64
    }

    /// The dictionary rendered back as a taxonomy, with normalized synonyms.
    pub fn to_taxonomy(&self) -> Taxonomy {
        let mut taxonomy = Taxonomy::new();

        for entry in &self.entries {
            let regexp: Vec<String> = entry
                .regex_patterns()
                .into_iter()
                .map(str::to_string)
                .collect();

            taxonomy.insert(
                entry.name.clone(),
                TaxonomyEntry {
                    synonyms: Some(entry.synonyms.clone()),
                    regexp: if regexp.is_empty() { None } else { Some(regexp) },
                    occurrence_count: Some(entry.occurrence_count),
                },
            );
        }

        taxonomy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAXONOMY: &str = r#"{
        "python": {"synonyms": ["py", "python3"], "occurrence_count": 10},
        "django": {"synonyms": ["py"]},
        "javascript": {"regexp": ["es[0-9]+", "ecmascript"]},
        "ecma": {"regexp": ["ecmascript"]},
        "machine-learning": {"synonyms": ["machine learning"]},
        "http": null
    }"#;

    fn chief() -> KeywordsChief {
        KeywordsChief::from_json_str(TAXONOMY).unwrap()
    }

    #[test]
    fn test_direct_keyword_lookup() {
        assert_eq!(chief().get_keyword("python"), Some("python"));
        assert_eq!(chief().get_keyword("http"), Some("http"));
    }

    #[test]
    fn test_synonym_lookup_prefers_first_declared_keyword() {
        let chief = chief();

        assert_eq!(chief.get_keyword("python3"), Some("python"));
        assert_eq!(chief.get_keyword("py"), Some("python"));
    }

    #[test]
    fn test_exact_name_beats_synonym_and_regex() {
        let chief = KeywordsChief::from_json_str(
            r#"{
                "a": {"synonyms": ["b"]},
                "b": {},
                "js": {"regexp": ["[a-z]+script"]},
                "typescript": null
            }"#,
        )
        .unwrap();

        assert_eq!(chief.get_keyword("b"), Some("b"));
        assert_eq!(chief.get_keyword("typescript"), Some("typescript"));
        assert_eq!(chief.get_keyword("coffeescript"), Some("js"));
    }

    #[test]
    fn test_regex_lookup_is_full_match_in_declaration_order() {
        let chief = chief();

        assert_eq!(chief.get_keyword("es6"), Some("javascript"));
        assert_eq!(chief.get_keyword("ecmascript"), Some("javascript"));
        assert_eq!(chief.get_keyword("es6x"), None);
        assert_eq!(chief.get_keyword("unknown"), None);
    }

    #[test]
    fn test_extract_keywords_counts_occurrences() {
        let tokens = ["python", "py", "es5", "rust", "machine learning"];
        let keywords = chief().extract_keywords(tokens.iter());

        assert_eq!(keywords.len(), 3);
        assert_eq!(keywords["python"], 2);
        assert_eq!(keywords["javascript"], 1);
        assert_eq!(keywords["machine-learning"], 1);
    }

    #[test]
    fn test_compute_ngram_size() {
        assert_eq!(chief().compute_ngram_size(), 2);
        assert_eq!(
            KeywordsChief::from_json_str("{}").unwrap().compute_ngram_size(),
            1
        );
    }

    #[test]
    fn test_compute_synonyms() {
        let synonyms = KeywordsChief::compute_synonyms("functional-programming");
        let expected: BTreeSet<String> = [
            "functional programming",
            "functional.programming",
            "functional_programming",
            "functionalprogramming",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        assert_eq!(synonyms, expected);
        assert!(KeywordsChief::compute_synonyms("python").is_empty());
    }

    #[test]
    fn test_matches_keyword_pattern() {
        assert!(KeywordsChief::matches_keyword_pattern("node.js"));
        assert!(KeywordsChief::matches_keyword_pattern("machine-learning"));
        assert!(KeywordsChief::matches_keyword_pattern("py"));
        assert!(!KeywordsChief::matches_keyword_pattern("p"));
        assert!(!KeywordsChief::matches_keyword_pattern("-py"));
        assert!(!KeywordsChief::matches_keyword_pattern("c++"));
        assert!(!KeywordsChief::matches_keyword_pattern("machine learning"));
    }

    #[test]
    fn test_filter_keyword() {
        assert_eq!(KeywordsChief::filter_keyword("machine learning"), "machine-learning");
        assert_eq!(KeywordsChief::filter_keyword("._python_."), "python");
        assert_eq!(KeywordsChief::filter_keyword("node.js"), "node.js");
    }

    #[test]
    fn test_is_keyword_honors_blacklist() {
        let chief = chief().with_blacklist(StopwordList::parse("http").unwrap());

        assert!(chief.is_keyword("python"));
        assert!(!chief.is_keyword("http"));
        assert!(!chief.is_keyword("py"));
    }

    #[test]
    fn test_synonyms_are_normalized_per_word() {
        let chop = |token: &str| token.trim_end_matches("ing").to_string();
        let taxonomy = Taxonomy::from_json_str(TAXONOMY).unwrap();
        let chief = KeywordsChief::with_normalizers(&taxonomy, Some(&chop), None).unwrap();

        assert_eq!(
            chief.get_synonyms("machine-learning"),
            &["machine learn", "machine-learn"]
        );
        assert_eq!(chief.get_keyword("machine learn"), Some("machine-learning"));
        // Names stay verbatim for direct lookups
        assert_eq!(chief.get_keyword("machine-learning"), Some("machine-learning"));
    }

    #[test]
    fn test_zero_occurrence_count_is_rejected() {
        let result = KeywordsChief::from_json_str(r#"{"python": {"occurrence_count": 0}}"#);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_regexp_is_rejected() {
        let result = KeywordsChief::from_json_str(r#"{"python": {"regexp": ["py[thon"]}}"#);
        assert!(matches!(result, Err(Error::RegexError(_))));
    }

    #[test]
    fn test_average_occurrence_count() {
        // 10 + 5 * 1
        assert!((chief().average_occurrence_count() - 15.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_occurrence_count_with_huge_counts() {
        let mut taxonomy = Taxonomy::new();
        for (name, count) in [("a", 1), ("b", usize::MAX)] {
            taxonomy.insert(
                name.to_string(),
                TaxonomyEntry {
                    occurrence_count: Some(count),
                    ..TaxonomyEntry::default()
                },
            );
        }

        let average = KeywordsChief::new(&taxonomy).unwrap().average_occurrence_count();

        assert!(average.is_finite());
        assert!(average > (usize::MAX / 4) as f64);
    }

    #[test]
    fn test_to_taxonomy() {
        let taxonomy = chief().to_taxonomy();
        let python = taxonomy.get("python").unwrap();

        assert_eq!(
            python.synonyms,
            Some(vec!["py".to_string(), "python3".to_string(), "python".to_string()])
        );
        assert_eq!(python.occurrence_count, Some(10));
        assert_eq!(
            taxonomy.get("javascript").unwrap().regexp,
            Some(vec!["es[0-9]+".to_string(), "ecmascript".to_string()])
        );
    }
}
