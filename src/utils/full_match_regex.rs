use regex::Regex;

/// Compiles `pattern` so that it only matches a whole token, never a substring.
pub fn full_match_regex(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}
