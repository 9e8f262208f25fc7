use crate::constants::UNKNOWN_CONTENT_TYPE;
use crate::Error;
use log::debug;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::sync::LazyLock;

/// Converts one markup language into plain text.
pub trait MarkupParser: Send + Sync {
    fn parse(&self, content: &str) -> Result<String, Error>;
}

/// Plain text passes through as is.
pub struct TextParser;

impl MarkupParser for TextParser {
    fn parse(&self, content: &str) -> Result<String, Error> {
        Ok(content.to_string())
    }
}

static HTML_HIDDEN_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|head)\b[^>]*>.*?</(script|style|head)\s*>|<!--.*?-->").unwrap()
});

static HTML_BLOCK_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(p|div|br|h[1-6]|li|ul|ol|tr|td|th|table|pre|blockquote|section|article|header|footer)\b[^>]*>")
        .unwrap()
});

static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Strips tags, comments, scripts and styles; block level tags become blank
/// lines so they still separate sentences.
pub struct HtmlParser;

impl HtmlParser {
    fn decode_entities(text: &str) -> String {
        text.replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&apos;", "'")
            .replace("&amp;", "&")
    }
}

impl MarkupParser for HtmlParser {
    fn parse(&self, content: &str) -> Result<String, Error> {
        let text = HTML_HIDDEN_BLOCK_RE.replace_all(content, " ");
        let text = HTML_BLOCK_TAG_RE.replace_all(&text, "\n\n");
        let text = HTML_TAG_RE.replace_all(&text, "");

        Ok(Self::decode_entities(&text))
    }
}

static MARKDOWN_IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\([^)]*\)").unwrap());

static MARKDOWN_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap());

static MARKDOWN_REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]{0,3}\[[^\]]+\]:[ \t]+\S+.*$").unwrap());

static MARKDOWN_LINE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]{0,3}(#{1,6}[ \t]+|>[ \t]?|[-*+][ \t]+|\d+\.[ \t]+)").unwrap());

static MARKDOWN_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(```|~~~).*$").unwrap());

/// Drops Markdown syntax (links keep their text, images their alt text),
/// then strips any inline HTML.
pub struct MarkdownParser;

impl MarkupParser for MarkdownParser {
    fn parse(&self, content: &str) -> Result<String, Error> {
        let text = MARKDOWN_FENCE_RE.replace_all(content, "");
        let text = MARKDOWN_REFERENCE_RE.replace_all(&text, "");
        let text = MARKDOWN_IMAGE_RE.replace_all(&text, "$1");
        let text = MARKDOWN_LINK_RE.replace_all(&text, "$1");
        let text = MARKDOWN_LINE_PREFIX_RE.replace_all(&text, "");

        HtmlParser.parse(&text)
    }
}

/// Markup which is recognized but cannot be converted.
pub struct UnsupportedParser {
    content_type: &'static str,
}

impl MarkupParser for UnsupportedParser {
    fn parse(&self, _content: &str) -> Result<String, Error> {
        Err(Error::NotImplemented(format!(
            "Parser for '{}' not implemented",
            self.content_type
        )))
    }
}

/// Markup types which are recognized but not converted.
const UNSUPPORTED_CONTENT_TYPES: &[&str] = &[
    "asciidoc",
    "creole",
    "mediawiki",
    "org",
    "pod",
    "rdoc",
    "restructuredtext",
    "textile",
];

/// File extension -> content type, following GitHub's markup list.
const FILE_EXTENSIONS: &[(&str, &str)] = &[
    ("adoc", "asciidoc"),
    ("asc", "asciidoc"),
    ("asciidoc", "asciidoc"),
    ("creole", "creole"),
    ("markdown", "markdown"),
    ("md", "markdown"),
    ("mdown", "markdown"),
    ("mediawiki", "mediawiki"),
    ("mkdn", "markdown"),
    ("org", "org"),
    ("pod", "pod"),
    ("rdoc", "rdoc"),
    ("rst", "restructuredtext"),
    ("textile", "textile"),
    ("txt", "txt"),
    ("wiki", "mediawiki"),
    ("htm", "html"),
    ("html", "html"),
];

/// A preprocessed README, as stored in `.json` files.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReadmePayload {
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub content: Option<String>,
}

impl ReadmePayload {
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Dispatches content to the parser of its markup type.
pub struct CoreParser;

impl CoreParser {
    fn parser_for(content_type: &str) -> Option<Box<dyn MarkupParser>> {
        let content_type = content_type.to_lowercase();

        match content_type.as_str() {
            "txt" | "text" | UNKNOWN_CONTENT_TYPE => Some(Box::new(TextParser)),
            "html" => Some(Box::new(HtmlParser)),
            "markdown" => Some(Box::new(MarkdownParser)),
            other => UNSUPPORTED_CONTENT_TYPES
                .iter()
                .copied()
                .find(|&unsupported| unsupported == other)
                .map(|unsupported| {
                    Box::new(UnsupportedParser {
                        content_type: unsupported,
                    }) as Box<dyn MarkupParser>
                }),
        }
    }

    /// Converts `content` of the given markup type into plain text.
    pub fn parse(content: &str, content_type: &str) -> Result<String, Error> {
        let parser = Self::parser_for(content_type).ok_or_else(|| {
            Error::ParserError(format!(
                "No parser registered for content type '{}'",
                content_type
            ))
        })?;

        if content.is_empty() {
            return Err(Error::ParserError("No content to parse".to_string()));
        }

        debug!("Parsing content of type '{}'", content_type);

        parser.parse(content)
    }

    /// Parses a README payload; both `type` and `content` have to be present.
    pub fn parse_readme(payload: &ReadmePayload) -> Result<String, Error> {
        let content = payload.content.as_deref().ok_or_else(|| {
            Error::InvalidInput("No content in README payload".to_string())
        })?;

        let content_type = payload.content_type.as_deref().ok_or_else(|| {
            Error::InvalidInput("No content type in README payload".to_string())
        })?;

        Self::parse(content, content_type)
    }

    pub fn parse_readme_json(json: &str) -> Result<String, Error> {
        Self::parse_readme(&ReadmePayload::from_json_str(json)?)
    }

    /// Content type derived from the file extension; `unknown` when unrecognized.
    pub fn content_type_for_path(path: &Path) -> &'static str {
        let extension = path
            .extension()
            .map(|extension| extension.to_string_lossy().to_lowercase());

        extension
            .and_then(|extension| {
                FILE_EXTENSIONS
                    .iter()
                    .find(|(known, _)| *known == extension)
                    .map(|(_, content_type)| *content_type)
            })
            .unwrap_or(UNKNOWN_CONTENT_TYPE)
    }

    /// Whether the file holds a README payload rather than markup.
    pub fn is_readme_json_path(path: &Path) -> bool {
        path.extension()
            .map_or(false, |extension| extension.eq_ignore_ascii_case("json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_passes_through() {
        assert_eq!(CoreParser::parse("Hello", "TXT").unwrap(), "Hello");
        assert_eq!(CoreParser::parse("Hello", "unknown").unwrap(), "Hello");
    }

    #[test]
    fn test_html_is_stripped() {
        let html = "<html><head><title>x</title></head><body><h1>Flask</h1>\
                    <script>var a = 1;</script><p>A <b>python</b> &amp; web framework</p></body></html>";

        let text = CoreParser::parse(html, "html").unwrap();

        assert!(text.contains("Flask"));
        assert!(text.contains("A python & web framework"));
        assert!(!text.contains("var a"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_markdown_is_stripped() {
        let markdown = "# Requests\n\n\
                        ![logo](https://example.com/logo.png)\n\n\
                        An [HTTP library](https://example.com) for **python**.\n\n\
                        ```python\nimport requests\n```\n";

        let text = CoreParser::parse(markdown, "markdown").unwrap();

        assert!(text.contains("Requests"));
        assert!(text.contains("An HTTP library for **python**."));
        assert!(text.contains("import requests"));
        assert!(!text.contains("https://"));
        assert!(!text.contains("```"));
        assert!(!text.contains('#'));
    }

    #[test]
    fn test_unsupported_markup() {
        assert!(matches!(
            CoreParser::parse("= Title", "asciidoc"),
            Err(Error::NotImplemented(_))
        ));
        assert!(matches!(
            CoreParser::parse("Title\n=====", "restructuredtext"),
            Err(Error::NotImplemented(_))
        ));
    }

    #[test]
    fn test_unknown_type_and_empty_content() {
        assert!(matches!(
            CoreParser::parse("content", "docx"),
            Err(Error::ParserError(_))
        ));
        assert!(matches!(
            CoreParser::parse("", "txt"),
            Err(Error::ParserError(_))
        ));
    }

    #[test]
    fn test_readme_payload() {
        let text =
            CoreParser::parse_readme_json(r##"{"type": "Markdown", "content": "# Django"}"##).unwrap();
        assert_eq!(text.trim(), "Django");

        assert!(matches!(
            CoreParser::parse_readme_json(r#"{"type": "txt"}"#),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            CoreParser::parse_readme_json(r#"{"content": "django"}"#),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_content_type_for_path() {
        assert_eq!(CoreParser::content_type_for_path(Path::new("README.md")), "markdown");
        assert_eq!(
            CoreParser::content_type_for_path(Path::new("docs/index.RST")),
            "restructuredtext"
        );
        assert_eq!(CoreParser::content_type_for_path(Path::new("a.html")), "html");
        assert_eq!(CoreParser::content_type_for_path(Path::new("LICENSE")), "unknown");
        assert!(CoreParser::is_readme_json_path(Path::new("README.json")));
        assert!(!CoreParser::is_readme_json_path(Path::new("README.md")));
    }
}
