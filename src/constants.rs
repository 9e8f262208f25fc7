/// Default keyword taxonomy, used when no keywords file is supplied.
pub const DEFAULT_KEYWORDS_JSON: &str = include_str!("../data/keywords.json");

/// Default stopword list, used when no stopwords file is supplied.
pub const DEFAULT_STOPWORDS_TXT: &str = include_str!("../data/stopwords.txt");

/// Delimiters used to split multi-word synonyms before stemming/lemmatization.
pub const SYNONYM_WORD_DELIMITERS: &[char] = &[' ', '_', '-'];

/// Delimiters which `KeywordsChief::compute_synonyms` splits a keyword on.
pub const SYNONYM_SPLIT_DELIMITERS: &[&str] = &["-", ".", "_"];

/// Delimiters which split keyword parts are re-joined with. The empty string
/// produces the concatenated form.
pub const SYNONYM_JOIN_DELIMITERS: &[&str] = &[" ", "-", ".", "_", ""];

/// Prefix marking a stopword line as a regular expression.
pub const REGEX_STOPWORD_PREFIX: &str = "re: ";

/// Baseline occurrence count for taxonomy entries which do not declare one.
pub const DEFAULT_OCCURRENCE_COUNT: usize = 1;

/// Scorer used when none is configured.
pub const DEFAULT_SCORER: &str = "Count";

/// Keywords with an aggregated occurrence count below this are dropped by `Taxonomy::aggregate`.
pub const DEFAULT_OCCURRENCE_COUNT_FILTER: usize = 2;

/// Content type assumed for files with an unrecognized extension.
pub const UNKNOWN_CONTENT_TYPE: &str = "unknown";

pub const GZIP_MAGIC_BYTES: [u8; 2] = [0x1f, 0x8b];
