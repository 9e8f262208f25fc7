pub mod count_token_frequencies;
pub mod full_match_regex;
pub mod iter_files;
pub mod read_source;
pub mod sort_results;

pub use count_token_frequencies::count_token_frequencies;
pub use full_match_regex::full_match_regex;
pub use iter_files::iter_files;
pub use read_source::{read_text_file, read_text_reader};
pub use sort_results::sort_results;
