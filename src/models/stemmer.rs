use crate::Error;
use rust_stemmers::{Algorithm, Stemmer as SnowballBackend};
use std::fmt;
use std::sync::Arc;

/// Reduces a token to its stem.
pub trait Stemmer: Send + Sync {
    fn stem(&self, token: &str) -> String;
}

impl<F> Stemmer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn stem(&self, token: &str) -> String {
        self(token)
    }
}

/// Snowball stemmer for a single language.
pub struct SnowballStemmer {
    backend: SnowballBackend,
}

impl SnowballStemmer {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            backend: SnowballBackend::create(algorithm),
        }
    }
}

impl Stemmer for SnowballStemmer {
    fn stem(&self, token: &str) -> String {
        self.backend.stem(token).into_owned()
    }
}

pub type StemmerFactory = fn() -> Arc<dyn Stemmer>;

/// Named stemmer constructors.
///
/// Populated explicitly at startup (see `StemmerRegistry::with_defaults`) and
/// passed to whatever needs to resolve a stemmer by name.
#[derive(Clone, Default)]
pub struct StemmerRegistry {
    stemmers: Vec<(String, StemmerFactory)>,
}

impl StemmerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the Snowball stemmers. `PorterStemmer` resolves to the
    /// Porter2 English algorithm.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register_stemmer("EnglishStemmer", || {
            Arc::new(SnowballStemmer::new(Algorithm::English))
        });
        registry.register_stemmer("PorterStemmer", || {
            Arc::new(SnowballStemmer::new(Algorithm::English))
        });
        registry.register_stemmer("DanishStemmer", || {
            Arc::new(SnowballStemmer::new(Algorithm::Danish))
        });
        registry.register_stemmer("DutchStemmer", || {
            Arc::new(SnowballStemmer::new(Algorithm::Dutch))
        });
        registry.register_stemmer("FinnishStemmer", || {
            Arc::new(SnowballStemmer::new(Algorithm::Finnish))
        });
        registry.register_stemmer("FrenchStemmer", || {
            Arc::new(SnowballStemmer::new(Algorithm::French))
        });
        registry.register_stemmer("GermanStemmer", || {
            Arc::new(SnowballStemmer::new(Algorithm::German))
        });
        registry.register_stemmer("ItalianStemmer", || {
            Arc::new(SnowballStemmer::new(Algorithm::Italian))
        });
        registry.register_stemmer("PortugueseStemmer", || {
            Arc::new(SnowballStemmer::new(Algorithm::Portuguese))
        });
        registry.register_stemmer("SpanishStemmer", || {
            Arc::new(SnowballStemmer::new(Algorithm::Spanish))
        });
        registry.register_stemmer("SwedishStemmer", || {
            Arc::new(SnowballStemmer::new(Algorithm::Swedish))
        });

        registry
    }

    /// Registers a stemmer under `name`, replacing any previous registration
    /// with the same name while keeping its position.
    pub fn register_stemmer(&mut self, name: &str, factory: StemmerFactory) {
        if let Some(existing) = self.stemmers.iter_mut().find(|(n, _)| n == name) {
            existing.1 = factory;
        } else {
            self.stemmers.push((name.to_string(), factory));
        }
    }

    pub fn get_stemmer(&self, name: &str) -> Result<Arc<dyn Stemmer>, Error> {
        self.stemmers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, factory)| factory())
            .ok_or_else(|| Error::StemmerNotFound(name.to_string()))
    }

    /// Names of all registered stemmers, in registration order.
    pub fn registered_stemmers(&self) -> Vec<&str> {
        self.stemmers.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl fmt::Debug for StemmerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StemmerRegistry")
            .field("stemmers", &self.registered_stemmers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_stemmer() {
        let registry = StemmerRegistry::with_defaults();
        let stemmer = registry.get_stemmer("EnglishStemmer").unwrap();

        assert_eq!(stemmer.stem("programming"), "program");
        assert_eq!(stemmer.stem("libraries"), "librari");
    }

    #[test]
    fn test_unknown_stemmer() {
        let registry = StemmerRegistry::with_defaults();
        let result = registry.get_stemmer("NoSuchStemmer");

        assert!(matches!(result, Err(Error::StemmerNotFound(name)) if name == "NoSuchStemmer"));
    }

    #[test]
    fn test_registration_order_and_replacement() {
        let mut registry = StemmerRegistry::new();
        registry.register_stemmer("Upper", || Arc::new(|t: &str| t.to_uppercase()));
        registry.register_stemmer("Identity", || Arc::new(|t: &str| t.to_string()));
        registry.register_stemmer("Upper", || Arc::new(|t: &str| format!("{}!", t)));

        assert_eq!(registry.registered_stemmers(), vec!["Upper", "Identity"]);
        assert_eq!(registry.get_stemmer("Upper").unwrap().stem("go"), "go!");
    }

    #[test]
    fn test_closures_are_stemmers() {
        let chop = |token: &str| token.trim_end_matches('s').to_string();
        assert_eq!(Stemmer::stem(&chop, "tests"), "test");
    }
}
