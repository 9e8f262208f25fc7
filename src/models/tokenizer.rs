use crate::types::{Token, TokenSentence, TokenizedDocument};
use crate::{Error, Lemmatizer, Stemmer, StopwordList};
use log::debug;
use std::sync::Arc;

/// Characters which separate words in addition to whitespace.
const WORD_SEPARATORS: &[char] = &[
    ',', ';', '(', ')', '[', ']', '{', '}', '<', '>', '"', '|', '`', '*', '=',
];

/// Splits plain text into normalized tokens ready for keyword lookup.
#[derive(Clone)]
pub struct Tokenizer {
    stopwords: StopwordList,
    ngram_size: usize,
    stemmer: Option<Arc<dyn Stemmer>>,
    lemmatizer: Option<Arc<dyn Lemmatizer>>,
}

impl Tokenizer {
    /// Creates a tokenizer producing n-grams up to `ngram_size` words.
    ///
    /// Literal stopwords go through the same lemmatizer and stemmer as the
    /// tokens do, so that normalized tokens still match them.
    pub fn new(
        stopwords: StopwordList,
        ngram_size: usize,
        stemmer: Option<Arc<dyn Stemmer>>,
        lemmatizer: Option<Arc<dyn Lemmatizer>>,
    ) -> Result<Self, Error> {
        if ngram_size == 0 {
            return Err(Error::InvalidInput(
                "N-gram size has to be at least 1".to_string(),
            ));
        }

        debug!("ngram size is {}", ngram_size);

        let stopwords = stopwords.normalize(stemmer.as_deref(), lemmatizer.as_deref());

        Ok(Self {
            stopwords,
            ngram_size,
            stemmer,
            lemmatizer,
        })
    }

    /// Configuration for arbitrary text doc parsing with the bundled stopwords
    /// and no stemming
    pub fn text_doc_parser(ngram_size: usize) -> Result<Self, Error> {
        Self::new(StopwordList::default_list()?, ngram_size, None, None)
    }

    pub fn ngram_size(&self) -> usize {
        self.ngram_size
    }

    pub fn stopwords(&self) -> &StopwordList {
        &self.stopwords
    }

    /// Tokenizes plain content.
    ///
    /// Every sentence becomes a list of lower-cased, lemmatized and stemmed
    /// tokens (stopwords dropped when `remove_stopwords` is set). When the
    /// n-gram size is above 1, one extra trailing sentence is appended holding
    /// the n-grams of every sentence, each joined with a single space.
    pub fn tokenize(&self, content: &str, remove_stopwords: bool) -> TokenizedDocument {
        let content = content.replace("\r\n", "\n").replace('\r', "\n");

        let mut sentences: TokenizedDocument = Self::split_sentences(&content)
            .into_iter()
            .map(|sentence| {
                Self::split_words(sentence)
                    .into_iter()
                    .map(|word| self.normalize_token(&word.to_lowercase()))
                    .collect::<TokenSentence>()
            })
            .filter(|sentence| !sentence.is_empty())
            .collect();

        debug!("Extracted tokens with lemmatization and stemming: {:?}", sentences);

        if remove_stopwords {
            sentences = sentences
                .into_iter()
                .map(|sentence| self.remove_stopwords(sentence))
                .collect();

            debug!("Extracted tokens without stopwords: {:?}", sentences);
        }

        if self.ngram_size > 1 {
            let ngrams = Self::compute_ngrams(&sentences, self.ngram_size);
            sentences.push(ngrams);
        }

        debug!(
            "Final tokens with ngrams (ngram size: {}): {:?}",
            self.ngram_size, sentences
        );

        sentences
    }

    /// Drops every token which is a literal stopword or fully matches a
    /// regular expression stopword.
    pub fn remove_stopwords(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .filter(|token| {
                if self.stopwords.is_raw_stopword(token) {
                    debug!("Dropping raw stopword '{}'", token);
                    return false;
                }

                if let Some(regex) = self.stopwords.matching_regex(token) {
                    debug!(
                        "Dropping stopword '{}' based on regexp '{}'",
                        token,
                        regex.as_str()
                    );
                    return false;
                }

                true
            })
            .collect()
    }

    /// Applies the lemmatizer, then the stemmer.
    fn normalize_token(&self, token: &str) -> Token {
        let mut normalized = token.to_string();

        if let Some(lemmatizer) = &self.lemmatizer {
            normalized = lemmatizer.lemmatize(&normalized);
        }

        if let Some(stemmer) = &self.stemmer {
            normalized = stemmer.stem(&normalized);
        }

        normalized
    }

    /// Splits text into sentences at `.`, `!` or `?` followed by whitespace
    /// (or the end of the text), and at blank lines.
    pub fn split_sentences(text: &str) -> Vec<&str> {
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut chars = text.char_indices().peekable();

        while let Some((idx, c)) = chars.next() {
            let sentence_end = match c {
                '.' | '!' | '?' => match chars.peek() {
                    None => Some(idx + c.len_utf8()),
                    Some(&(_, next)) if next.is_whitespace() => Some(idx + c.len_utf8()),
                    _ => None,
                },
                '\n' => match chars.peek() {
                    Some(&(_, '\n')) => Some(idx),
                    _ => None,
                },
                _ => None,
            };

            if let Some(end) = sentence_end {
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = end;
            }
        }

        let rest = text[start..].trim();
        if !rest.is_empty() {
            sentences.push(rest);
        }

        sentences
    }

    /// Splits a sentence into words, trimming surrounding punctuation.
    ///
    /// Inner `-`, `.` and `_` are kept (`node.js`, `functional-programming`),
    /// as are trailing `+` and `#` (`c++`, `c#`) and a leading `.` directly
    /// followed by an alphanumeric character (`.net`). Possessive `'s` is dropped.
    ///
    /// Note: This explicitly does not modify the case of the text.
    pub fn split_words(sentence: &str) -> Vec<String> {
        sentence
            .split(|c: char| c.is_whitespace() || WORD_SEPARATORS.contains(&c))
            .filter_map(Self::trim_word)
            .collect()
    }

    fn trim_word(word: &str) -> Option<String> {
        let word = word.trim_end_matches(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'));

        // Remove possessive endings
        let word = word
            .strip_suffix("'s")
            .or_else(|| word.strip_suffix("\u{2019}s"))
            .unwrap_or(word);

        let mut start = word.len();
        for (idx, c) in word.char_indices() {
            let keeps_leading_dot = c == '.'
                && word[idx + 1..]
                    .chars()
                    .next()
                    .map_or(false, |next| next.is_alphanumeric());

            if c.is_alphanumeric() || keeps_leading_dot {
                start = idx;
                break;
            }
        }

        let trimmed = &word[start..];

        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Builds all n-grams of sizes `2..=ngram_size` over each sentence.
    pub fn compute_ngrams(sentences: &[TokenSentence], ngram_size: usize) -> TokenSentence {
        let mut ngrams = TokenSentence::new();

        for sentence in sentences {
            for size in 2..=ngram_size {
                ngrams.extend(sentence.windows(size).map(|window| window.join(" ")));
            }
        }

        ngrams
    }
}
