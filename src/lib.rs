#[cfg(doctest)]
doc_comment::doctest!("../README.md");

mod config;
mod constants;
pub mod models;
pub use config::DEFAULT_LOOKUP_CONFIG;
pub use models::{
    AggregateOptions, ChangeAction, ChangeKind, CoreParser, CountScoring, DiffOptions,
    EnglishLemmatizer, Error, KeywordEntry, KeywordLookup, KeywordsChief, Lemmatizer,
    LookupConfig, MarkupParser, ReadmePayload, ReckonResult, RelativeUsageScoring, Scoring,
    ScoringRegistry, SnowballStemmer, Stemmer, StemmerRegistry, StopwordList, Taxonomy,
    TaxonomyChange, TaxonomyEntry, TfIdfScoring, Tokenizer,
};
pub mod types;
mod utils;
pub use types::{
    FileLookupResults, Keyword, KeywordOccurrenceMap, KeywordScore, KeywordScoreMap,
    OccurrenceCount, Synonym, Token, TokenSentence, TokenizedDocument,
};
pub use utils::sort_results;

/// Extracts keywords from text using the given dictionary and the bundled
/// stopwords, with `Count` scoring.
///
/// The n-gram size is derived from the dictionary so multi-word synonyms are found.
pub fn extract_keywords_from_text(
    text: &str,
    chief: &KeywordsChief,
) -> Result<KeywordScoreMap, Error> {
    let tokenizer = Tokenizer::text_doc_parser(chief.compute_ngram_size())?;
    let document = tokenizer.tokenize(text, true);
    let keywords = chief.extract_keywords_from_document(&document);

    CountScoring.score(chief, &keywords)
}

/// Extracts keywords from text with a fully configured lookup, resolving
/// stemmers and scorers from the default registries.
pub fn extract_keywords_from_text_with_custom_config(
    text: &str,
    config: &LookupConfig,
) -> Result<KeywordScoreMap, Error> {
    let lookup = KeywordLookup::new(
        config,
        &StemmerRegistry::with_defaults(),
        &ScoringRegistry::with_defaults(),
    )?;

    lookup.lookup_text(text)
}

/// Shows the normalized keyword dictionary and stopwords a lookup with
/// `config` would use.
pub fn reckon(config: &LookupConfig, stemmers: &StemmerRegistry) -> Result<ReckonResult, Error> {
    let lookup = KeywordLookup::new(config, stemmers, &ScoringRegistry::with_defaults())?;

    Ok(lookup.reckon())
}
