use crate::constants::{DEFAULT_STOPWORDS_TXT, REGEX_STOPWORD_PREFIX};
use crate::utils::{full_match_regex, read_text_file, read_text_reader};
use crate::{Error, Lemmatizer, Stemmer};
use log::{debug, warn};
use regex::Regex;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// A set of literal stopwords plus full-match regular expression stopwords.
///
/// Line format:
/// - blank lines are ignored;
/// - lines starting with `#` (other than a lone `#`) are comments;
/// - lines starting with `re: ` are regular expressions;
/// - anything else is a literal, case-sensitive stopword.
#[derive(Debug, Clone, Default)]
pub struct StopwordList {
    raw_stopwords: Vec<String>,
    raw_lookup: HashSet<String>,
    regex_stopwords: Vec<Regex>,
}

impl StopwordList {
    /// An empty list which matches nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The stopword list bundled with the crate.
    pub fn default_list() -> Result<Self, Error> {
        Self::parse(DEFAULT_STOPWORDS_TXT)
    }

    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let content = read_text_file(path)?;
        Self::parse(&content)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let content = read_text_reader(reader)?;
        Self::parse(&content)
    }

    /// Loads from `path` when given, falling back to the bundled list.
    pub fn from_optional_path(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::default_list(),
        }
    }

    pub fn parse(content: &str) -> Result<Self, Error> {
        let mut list = Self::empty();

        for line in content.lines() {
            let word = line.trim_end_matches('\r');

            if word.trim().is_empty() {
                continue;
            }

            if word.starts_with('#') && word != "#" {
                continue;
            }

            if let Some(pattern) = word.strip_prefix(REGEX_STOPWORD_PREFIX) {
                list.regex_stopwords.push(full_match_regex(pattern)?);
                continue;
            }

            if word.starts_with("re:") {
                warn!(
                    "Stopword '{}' starts with 're:' but is treated as a raw stopword, missing space after?",
                    word
                );
            }

            list.push_raw(word.to_string());
        }

        debug!(
            "Registered {} raw stopwords and {} regexp stopwords",
            list.raw_stopwords.len(),
            list.regex_stopwords.len()
        );

        Ok(list)
    }

    fn push_raw(&mut self, word: String) {
        if self.raw_lookup.insert(word.clone()) {
            self.raw_stopwords.push(word);
        }
    }

    /// Applies the lemmatizer, then the stemmer, to every literal stopword so
    /// they compare equal to equally normalized tokens. Regular expressions are
    /// left untouched.
    pub fn normalize(
        self,
        stemmer: Option<&dyn Stemmer>,
        lemmatizer: Option<&dyn Lemmatizer>,
    ) -> Self {
        if stemmer.is_none() && lemmatizer.is_none() {
            return self;
        }

        let mut normalized = Self {
            raw_stopwords: Vec::with_capacity(self.raw_stopwords.len()),
            raw_lookup: HashSet::with_capacity(self.raw_lookup.len()),
            regex_stopwords: self.regex_stopwords,
        };

        for word in self.raw_stopwords {
            let mut new_word = word.clone();
            if let Some(lemmatizer) = lemmatizer {
                new_word = lemmatizer.lemmatize(&new_word);
            }
            if let Some(stemmer) = stemmer {
                new_word = stemmer.stem(&new_word);
            }

            if new_word != word {
                debug!("Normalized stopword '{}' to '{}'", word, new_word);
            }

            normalized.push_raw(new_word);
        }

        normalized
    }

    pub fn is_raw_stopword(&self, token: &str) -> bool {
        self.raw_lookup.contains(token)
    }

    /// The regular expression stopword which fully matches `token`, if any.
    pub fn matching_regex(&self, token: &str) -> Option<&Regex> {
        self.regex_stopwords.iter().find(|regex| regex.is_match(token))
    }

    pub fn contains(&self, token: &str) -> bool {
        self.is_raw_stopword(token) || self.matching_regex(token).is_some()
    }

    pub fn raw_stopwords(&self) -> &[String] {
        &self.raw_stopwords
    }

    /// The regular expression stopwords, rendered back in their `re: <pattern>` line form.
    pub fn regex_stopwords(&self) -> Vec<String> {
        self.regex_stopwords
            .iter()
            .map(|regex| format!("{}{}", REGEX_STOPWORD_PREFIX, strip_anchors(regex.as_str())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.raw_stopwords.len() + self.regex_stopwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reverses the anchoring added by `full_match_regex`.
pub(crate) fn strip_anchors(pattern: &str) -> &str {
    pattern
        .strip_prefix("^(?:")
        .and_then(|p| p.strip_suffix(")$"))
        .unwrap_or(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STOPWORDS: &str = "# comment line\n\
                             i\n\
                             me\n\
                             \n\
                             our\n\
                             #\n\
                             re: [0-9.]+\n\
                             re:missing-space\n";

    #[test]
    fn test_parse_lines() {
        let list = StopwordList::parse(STOPWORDS).unwrap();

        assert_eq!(
            list.raw_stopwords(),
            &["i", "me", "our", "#", "re:missing-space"]
        );
        assert_eq!(list.regex_stopwords(), vec!["re: [0-9.]+"]);
        assert_eq!(list.len(), 6);
    }

    #[test]
    fn test_contains_literal_and_regex() {
        let list = StopwordList::parse(STOPWORDS).unwrap();

        assert!(list.contains("me"));
        assert!(list.contains("123"));
        assert!(list.contains("6.502"));
        assert!(!list.contains("-123"));
        assert!(!list.contains("python"));
        // Literal stopwords are case-sensitive
        assert!(!list.contains("Me"));
    }

    #[test]
    fn test_regex_requires_full_match() {
        let list = StopwordList::parse("re: py").unwrap();

        assert!(list.contains("py"));
        assert!(!list.contains("python"));
    }

    #[test]
    fn test_invalid_regex_is_reported() {
        let result = StopwordList::parse("re: [unclosed");
        assert!(matches!(result, Err(Error::RegexError(_))));
    }

    #[test]
    fn test_normalize_literals_only() {
        let list = StopwordList::parse("tests\nre: tests").unwrap();
        let chop = |token: &str| token.trim_end_matches('s').to_string();

        let list = list.normalize(Some(&chop), None);

        assert!(list.is_raw_stopword("test"));
        assert!(!list.is_raw_stopword("tests"));
        assert_eq!(list.regex_stopwords(), vec!["re: tests"]);
    }

    #[test]
    fn test_default_list_loads() {
        let list = StopwordList::default_list().unwrap();

        assert!(list.contains("the"));
        assert!(list.contains("42"));
        assert!(!list.contains("python"));
    }
}
