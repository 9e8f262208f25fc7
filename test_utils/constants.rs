pub const DEFAULT_FALSE_NEGATIVE_WEIGHT: f32 = 2.0; // Higher penalty for missing keywords
pub const DEFAULT_FALSE_POSITIVE_WEIGHT: f32 = 1.0; // Lower penalty for unexpected keywords

pub const TEST_FILES_DIRECTORY: &str = "tests/test_files";

pub const TEST_TAXONOMY_JSON_PATH: &str = "tests/test_data_files/test_keywords.json";

pub const TEST_TAXONOMY_CSV_PATH: &str = "tests/test_data_files/test_keywords.csv";

pub const TEST_STOPWORDS_PATH: &str = "tests/test_data_files/test_stopwords.txt";
