use std::path::PathBuf;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    #[error("File Not Found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Stemmer Not Found: '{0}'")]
    StemmerNotFound(String),

    #[error("Scorer Not Found: '{0}'")]
    ScorerNotFound(String),

    #[error("Not Implemented: {0}")]
    NotImplemented(String),

    #[error("Parser Error: {0}")]
    ParserError(String),

    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON Error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV Error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Regex Error: {0}")]
    RegexError(#[from] regex::Error),
}

impl From<String> for Error {
    fn from(msg: String) -> Error {
        Error::InvalidInput(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Error {
        Error::InvalidInput(msg.to_string())
    }
}
