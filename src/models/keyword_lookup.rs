use crate::config::DEFAULT_LOOKUP_CONFIG;
use crate::constants::DEFAULT_SCORER;
use crate::types::{FileLookupResults, KeywordScoreMap};
use crate::utils::{iter_files, read_text_file};
use crate::{
    CoreParser, EnglishLemmatizer, Error, KeywordsChief, Lemmatizer, ReadmePayload, Scoring,
    ScoringRegistry, StemmerRegistry, StopwordList, Taxonomy, Tokenizer,
};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything needed to assemble a `KeywordLookup`.
///
/// `None` values fall back to the bundled taxonomy and stopwords, no stemming,
/// an n-gram size computed from the taxonomy and `Count` scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupConfig {
    pub keywords_file: Option<PathBuf>,
    pub stopwords_file: Option<PathBuf>,
    pub blacklist_file: Option<PathBuf>,
    pub stemmer: Option<String>,
    pub lemmatize: bool,
    pub ngram_size: Option<usize>,
    pub scorer: Option<String>,
    pub ignore_errors: bool,
}

impl Default for LookupConfig {
    fn default() -> Self {
        DEFAULT_LOOKUP_CONFIG.clone()
    }
}

/// The normalized dictionary and stopwords a lookup would work with.
#[derive(Debug, Clone, Serialize)]
pub struct ReckonResult {
    pub keywords: Taxonomy,
    pub stopwords: Vec<String>,
}

/// Runs text, README payloads, files and directory trees through the
/// tokenizer, the keyword dictionary and a scorer.
pub struct KeywordLookup {
    chief: KeywordsChief,
    tokenizer: Tokenizer,
    scorer: Arc<dyn Scoring>,
    ignore_errors: bool,
}

impl KeywordLookup {
    pub fn new(
        config: &LookupConfig,
        stemmers: &StemmerRegistry,
        scorers: &ScoringRegistry,
    ) -> Result<Self, Error> {
        let stemmer = config
            .stemmer
            .as_deref()
            .map(|name| stemmers.get_stemmer(name))
            .transpose()?;

        let lemmatizer: Option<Arc<dyn Lemmatizer>> = if config.lemmatize {
            Some(Arc::new(EnglishLemmatizer::new()))
        } else {
            None
        };

        let scorer = scorers.get_scoring(config.scorer.as_deref().unwrap_or(DEFAULT_SCORER))?;

        let taxonomy = Taxonomy::from_optional_path(config.keywords_file.as_deref())?;
        let mut chief =
            KeywordsChief::with_normalizers(&taxonomy, stemmer.as_deref(), lemmatizer.as_deref())?;

        if let Some(blacklist_file) = &config.blacklist_file {
            chief = chief.with_blacklist_file(blacklist_file)?;
        }

        let computed_ngram_size = chief.compute_ngram_size();
        let ngram_size = match config.ngram_size {
            Some(ngram_size) => {
                if ngram_size < computed_ngram_size {
                    warn!(
                        "Computed ngram size ({}) does not reflect supplied ngram size ({}), some synonyms will be omitted",
                        computed_ngram_size, ngram_size
                    );
                }
                ngram_size
            }
            None => computed_ngram_size,
        };

        let stopwords = StopwordList::from_optional_path(config.stopwords_file.as_deref())?;
        let tokenizer = Tokenizer::new(stopwords, ngram_size, stemmer, lemmatizer)?;

        Ok(Self {
            chief,
            tokenizer,
            scorer,
            ignore_errors: config.ignore_errors,
        })
    }

    pub fn chief(&self) -> &KeywordsChief {
        &self.chief
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn ngram_size(&self) -> usize {
        self.tokenizer.ngram_size()
    }

    /// Scores the keywords found in plain text.
    pub fn lookup_text(&self, text: &str) -> Result<KeywordScoreMap, Error> {
        let document = self.tokenizer.tokenize(text, true);
        let keywords = self.chief.extract_keywords_from_document(&document);

        debug!("Found keywords: {:?}", keywords);

        self.scorer.score(&self.chief, &keywords)
    }

    pub fn lookup_readme(&self, payload: &ReadmePayload) -> Result<KeywordScoreMap, Error> {
        self.lookup_text(&CoreParser::parse_readme(payload)?)
    }

    pub fn lookup_readme_json(&self, json: &str) -> Result<KeywordScoreMap, Error> {
        self.lookup_readme(&ReadmePayload::from_json_str(json)?)
    }

    /// Scores a single file; `.json` files are README payloads, anything else
    /// is parsed according to its extension.
    pub fn lookup_file(&self, path: &Path) -> Result<KeywordScoreMap, Error> {
        debug!("Looking up keywords in '{}'", path.display());

        let content = read_text_file(path)?;

        let text = if CoreParser::is_readme_json_path(path) {
            CoreParser::parse_readme_json(&content)?
        } else {
            CoreParser::parse(&content, CoreParser::content_type_for_path(path))?
        };

        self.lookup_text(&text)
    }

    /// The files `lookup_path` would visit, sorted.
    pub fn collect_files(&self, path: &Path) -> Result<Vec<PathBuf>, Error> {
        iter_files(path, self.ignore_errors)
    }

    /// Scores every file of a file or directory tree.
    pub fn lookup_path(&self, path: &Path) -> Result<FileLookupResults, Error> {
        let files = self.collect_files(path)?;
        self.lookup_files(&files, |_| {})
    }

    /// Scores the given files, calling `on_file` after each one.
    ///
    /// Failing files abort the batch unless errors are ignored, in which case
    /// they are logged and left out of the results.
    pub fn lookup_files<F>(&self, files: &[PathBuf], mut on_file: F) -> Result<FileLookupResults, Error>
    where
        F: FnMut(&Path),
    {
        let mut results = FileLookupResults::new();

        for file in files {
            match self.lookup_file(file) {
                Ok(scores) => {
                    results.insert(file.display().to_string(), scores);
                }
                Err(err) => {
                    if !self.ignore_errors {
                        return Err(err);
                    }
                    warn!("Failed to lookup keywords in '{}': {}", file.display(), err);
                }
            }

            on_file(file);
        }

        info!("Looked up keywords in {} of {} files", results.len(), files.len());

        Ok(results)
    }

    /// The normalized dictionary and stopwords in use.
    pub fn reckon(&self) -> ReckonResult {
        let stopwords = self.tokenizer.stopwords();

        ReckonResult {
            keywords: self.chief.to_taxonomy(),
            stopwords: stopwords
                .raw_stopwords()
                .iter()
                .cloned()
                .chain(stopwords.regex_stopwords())
                .collect(),
        }
    }
}
