use std::collections::HashMap;

/// Reduces a token to its dictionary form.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, token: &str) -> String;
}

impl<F> Lemmatizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn lemmatize(&self, token: &str) -> String {
        self(token)
    }
}

/// Irregular noun plurals which suffix rules cannot recover.
const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("children", "child"),
    ("data", "data"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("men", "man"),
    ("mice", "mouse"),
    ("people", "person"),
    ("teeth", "tooth"),
    ("vertices", "vertex"),
    ("women", "woman"),
];

/// Endings which look plural but belong to singular words (`status`, `analysis`, `class`).
const SINGULAR_ENDINGS: &[&str] = &["ss", "us", "is", "ous"];

/// Plural suffix rewrites, tried in order; the first matching suffix wins.
const PLURAL_SUFFIX_RULES: &[(&str, &str)] = &[
    ("ies", "y"),
    ("sses", "ss"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("s", ""),
];

/// Tokens shorter than this are never rewritten.
const MIN_LEMMATIZED_LENGTH: usize = 4;

/// Rule-based English noun lemmatizer.
///
/// Handles regular plural suffixes plus a table of irregular forms; anything
/// else is returned unchanged.
pub struct EnglishLemmatizer {
    irregular: HashMap<&'static str, &'static str>,
}

impl EnglishLemmatizer {
    pub fn new() -> Self {
        Self {
            irregular: IRREGULAR_NOUNS.iter().copied().collect(),
        }
    }
}

impl Default for EnglishLemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer for EnglishLemmatizer {
    fn lemmatize(&self, token: &str) -> String {
        if let Some(lemma) = self.irregular.get(token) {
            return lemma.to_string();
        }

        if token.chars().count() < MIN_LEMMATIZED_LENGTH
            || !token.chars().all(|c| c.is_alphabetic())
            || SINGULAR_ENDINGS.iter().any(|ending| token.ends_with(ending))
        {
            return token.to_string();
        }

        for (suffix, replacement) in PLURAL_SUFFIX_RULES {
            if let Some(stem) = token.strip_suffix(suffix) {
                return format!("{}{}", stem, replacement);
            }
        }

        token.to_string()
    }
}
