use crate::models::LookupConfig;

pub const DEFAULT_LOOKUP_CONFIG: &LookupConfig = &LookupConfig {
    keywords_file: None,
    stopwords_file: None,
    blacklist_file: None,
    stemmer: None,
    lemmatize: false,
    ngram_size: None,
    scorer: None,
    ignore_errors: false,
};
