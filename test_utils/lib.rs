pub mod constants;
pub mod models;
pub use models::EvaluationResult;

use std::{fs, path::Path};

const EXPECTED_PREFIX: &str = "EXPECTED:";
const COMMENT_PREFIX: &str = "COMMENT:";

// Helper function to get the expected keywords from the text file
pub fn get_expected_keywords(file_path: &Path) -> Vec<String> {
    let content = fs::read_to_string(file_path).expect("Failed to read test file");

    // Extract keywords from lines starting with EXPECTED:
    content
        .lines()
        .filter_map(|line| {
            line.trim()
                .strip_prefix(EXPECTED_PREFIX)
                .map(|keyword| keyword.trim().to_string())
        })
        .filter(|keyword| !keyword.is_empty())
        .collect()
}

/// Document text of a test file, without its `EXPECTED:` and `COMMENT:` lines.
pub fn strip_expectation_lines(raw_text: &str) -> String {
    raw_text
        .lines()
        .filter(|line| {
            !line.trim_start().starts_with(EXPECTED_PREFIX)
                && !line.trim_start().starts_with(COMMENT_PREFIX)
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Reads a test file, returning its document text and expected keywords.
pub fn load_test_file(file_path: &Path) -> (String, Vec<String>) {
    let raw_text = fs::read_to_string(file_path).expect("Failed to read test file");

    (
        strip_expectation_lines(&raw_text),
        get_expected_keywords(file_path),
    )
}

/// Every regular file in the test files directory, sorted.
pub fn list_test_files(directory: &Path) -> Vec<std::path::PathBuf> {
    let mut files: Vec<_> = fs::read_dir(directory)
        .expect("Failed to read test files directory")
        .map(|entry| entry.expect("Failed to read file").path())
        .filter(|path| path.is_file())
        .collect();

    files.sort();
    files
}
