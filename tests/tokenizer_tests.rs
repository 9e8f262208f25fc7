use keyword_sniffer::{
    CountScoring, EnglishLemmatizer, KeywordsChief, Scoring, StemmerRegistry, StopwordList,
    Tokenizer,
};
use std::sync::Arc;

#[cfg(test)]
mod text_doc_tokenizer_tests {
    use super::*;

    fn plain_tokenizer(ngram_size: usize) -> Tokenizer {
        Tokenizer::new(StopwordList::empty(), ngram_size, None, None).unwrap()
    }

    #[test]
    fn test_lowercases_and_drops_stopwords() {
        let tokenizer = Tokenizer::text_doc_parser(1).unwrap();

        let tokens = tokenizer.tokenize("These are all Lowercase TOKENS", true);
        assert_eq!(tokens, vec![vec!["lowercase", "tokens"]]);
    }

    #[test]
    fn test_keeps_stopwords_when_asked() {
        let tokenizer = Tokenizer::text_doc_parser(1).unwrap();

        let tokens = tokenizer.tokenize("These are all Lowercase TOKENS", false);
        assert_eq!(tokens, vec![vec!["these", "are", "all", "lowercase", "tokens"]]);
    }

    #[test]
    fn test_tokenize_with_multiple_spaces() {
        let tokenizer = plain_tokenizer(1);

        let tokens = tokenizer.tokenize("Rust    and\tPython     together", true);
        assert_eq!(tokens, vec![vec!["rust", "and", "python", "together"]]);
    }

    #[test]
    fn test_sentences_and_ngrams() {
        let tokenizer = plain_tokenizer(2);

        let tokens = tokenizer.tokenize("Machine learning rocks. Deep learning too!", true);
        assert_eq!(
            tokens,
            vec![
                vec!["machine", "learning", "rocks"],
                vec!["deep", "learning", "too"],
                vec![
                    "machine learning",
                    "learning rocks",
                    "deep learning",
                    "learning too"
                ],
            ]
        );
    }

    #[test]
    fn test_stopword_removal_is_noop_without_stopwords() {
        let tokenizer = Tokenizer::new(StopwordList::parse("zebra").unwrap(), 1, None, None).unwrap();
        let text = "Fast JSON parsing for Rust. Works with serde!";

        assert_eq!(tokenizer.tokenize(text, true), tokenizer.tokenize(text, false));
    }

    #[test]
    fn test_regex_stopwords_filter_tokens() {
        let stopwords = StopwordList::parse("re: [0-9]+\nre: v[0-9]+").unwrap();
        let tokenizer = Tokenizer::new(stopwords, 1, None, None).unwrap();

        let tokens = tokenizer.tokenize("python 3 rust 42 v2 v2x", true);
        assert_eq!(tokens, vec![vec!["python", "rust", "v2x"]]);
    }

    #[test]
    fn test_stemming() {
        let stemmer = StemmerRegistry::with_defaults()
            .get_stemmer("EnglishStemmer")
            .unwrap();
        let tokenizer = Tokenizer::new(StopwordList::empty(), 1, Some(stemmer), None).unwrap();

        let tokens = tokenizer.tokenize("Programming libraries", true);
        assert_eq!(tokens, vec![vec!["program", "librari"]]);
    }

    #[test]
    fn test_stopwords_are_normalized_like_tokens() {
        let stopwords = StopwordList::parse("libraries").unwrap();
        let tokenizer = Tokenizer::new(
            stopwords,
            1,
            None,
            Some(Arc::new(EnglishLemmatizer::new())),
        )
        .unwrap();

        let tokens = tokenizer.tokenize("Useful libraries and frameworks", true);
        assert_eq!(tokens, vec![vec!["useful", "and", "framework"]]);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let chief = KeywordsChief::from_json_str(r#"{"python": {}}"#).unwrap();
        let tokenizer = plain_tokenizer(chief.compute_ngram_size());

        let tokens = tokenizer.tokenize("I love Python programming", true);
        assert_eq!(tokens, vec![vec!["i", "love", "python", "programming"]]);

        let keywords = chief.extract_keywords_from_document(&tokens);
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords["python"], 1);

        let scores = CountScoring.score(&chief, &keywords).unwrap();
        assert_eq!(scores["python"], 1.0);
    }
}
