use std::collections::{BTreeMap, HashMap};

// Types listed here are either shared across multiple files and/or exposed via the library.

/// Represents a token as an owned `String`. Tokens are the basic units used for processing text.
pub type Token = String;

/// A single sentence worth of normalized tokens.
pub type TokenSentence = Vec<Token>;

/// The output of the `Tokenizer`: every sentence of the document, followed by
/// one trailing sentence holding the computed n-grams (if n-grams are enabled).
pub type TokenizedDocument = Vec<TokenSentence>;

/// Represents the canonical name of a keyword, as declared in the taxonomy.
pub type Keyword = String;

/// Represents an alternate surface form which resolves to a `Keyword`.
pub type Synonym = String;

/// Number of times a keyword was observed, either within a document or as the
/// baseline importance recorded in the taxonomy.
pub type OccurrenceCount = usize;

/// Represents a map of keywords to their occurrence counts within a text document.
pub type KeywordOccurrenceMap = HashMap<Keyword, OccurrenceCount>;

/// Represents the final score assigned to a keyword.
pub type KeywordScore = f64;

/// Represents a map of keywords to their computed scores within a text document.
pub type KeywordScoreMap = HashMap<Keyword, KeywordScore>;

/// Per-file lookup results, keyed by file path. Ordered so that batch output is deterministic.
pub type FileLookupResults = BTreeMap<String, KeywordScoreMap>;
