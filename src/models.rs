pub mod core_parser;
pub use core_parser::{CoreParser, MarkupParser, ReadmePayload};

pub mod error;
pub use error::Error;

pub mod keyword_lookup;
pub use keyword_lookup::{KeywordLookup, LookupConfig, ReckonResult};

pub mod keywords_chief;
pub use keywords_chief::{KeywordEntry, KeywordsChief};

pub mod lemmatizer;
pub use lemmatizer::{EnglishLemmatizer, Lemmatizer};

pub mod scoring;
pub use scoring::{
    CountScoring, RelativeUsageScoring, Scoring, ScoringFactory, ScoringRegistry, TfIdfScoring,
};

pub mod stemmer;
pub use stemmer::{SnowballStemmer, Stemmer, StemmerFactory, StemmerRegistry};

pub mod stopword_list;
pub use stopword_list::StopwordList;

pub mod taxonomy;
pub use taxonomy::{
    AggregateOptions, ChangeAction, ChangeKind, DiffOptions, Taxonomy, TaxonomyChange,
    TaxonomyEntry,
};

pub mod tokenizer;
pub use tokenizer::Tokenizer;
