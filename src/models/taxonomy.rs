use crate::constants::{
    DEFAULT_KEYWORDS_JSON, DEFAULT_OCCURRENCE_COUNT, DEFAULT_OCCURRENCE_COUNT_FILTER,
};
use crate::types::{Keyword, OccurrenceCount, Synonym};
use crate::utils::read_text_file;
use crate::{Error, KeywordsChief};
use csv::ReaderBuilder;
use log::debug;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;
use std::path::Path;

/// Separator of list cells in the `Synonyms` CSV column.
const CSV_SYNONYM_SEPARATOR: char = ',';

/// Separator of list cells in the `Regexp` CSV column. Commas are common in
/// regular expressions (`{1,3}`), so a different one is used.
const CSV_REGEXP_SEPARATOR: char = ';';

/// Raw configuration of one keyword, as written in a taxonomy file.
///
/// Every field is optional; `KeywordsChief` fills in the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaxonomyEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<Vec<Synonym>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regexp: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occurrence_count: Option<OccurrenceCount>,
}

impl TaxonomyEntry {
    fn from_json_value(keyword: &str, value: Value) -> Result<Self, Error> {
        let mut object = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(object) => object,
            other => {
                return Err(Error::InvalidInput(format!(
                    "Configuration of keyword '{}' has to be a mapping, got '{}'",
                    keyword, other
                )))
            }
        };

        let synonyms = Self::string_list(keyword, "synonyms", object.remove("synonyms"))?;
        let regexp = Self::string_list(keyword, "regexp", object.remove("regexp"))?;

        let occurrence_count = match object.remove("occurrence_count") {
            None | Some(Value::Null) => None,
            Some(Value::Number(number)) => Some(
                number
                    .as_u64()
                    .map(|count| count as OccurrenceCount)
                    .ok_or_else(|| {
                        Error::InvalidInput(format!(
                            "Occurrence count of keyword '{}' has to be a positive integer, got '{}'",
                            keyword, number
                        ))
                    })?,
            ),
            Some(other) => {
                return Err(Error::InvalidInput(format!(
                    "Occurrence count of keyword '{}' has to be a positive integer, got '{}'",
                    keyword, other
                )))
            }
        };

        for unknown in object.keys() {
            debug!(
                "Ignoring unknown configuration '{}' of keyword '{}'",
                unknown, keyword
            );
        }

        Ok(Self {
            synonyms,
            regexp,
            occurrence_count,
        })
    }

    /// Scalars are accepted and turned into strings, so `- 3` still becomes the synonym `"3"`.
    fn string_list(
        keyword: &str,
        field: &str,
        value: Option<Value>,
    ) -> Result<Option<Vec<String>>, Error> {
        let items = match value {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(Error::InvalidInput(format!(
                    "'{}' of keyword '{}' has to be a list, got '{}'",
                    field, keyword, other
                )))
            }
        };

        items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                Value::Number(n) => Ok(n.to_string()),
                Value::Bool(b) => Ok(b.to_string()),
                other => Err(Error::InvalidInput(format!(
                    "'{}' of keyword '{}' has to hold plain values, got '{}'",
                    field, keyword, other
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    fn effective_occurrence_count(&self) -> OccurrenceCount {
        self.occurrence_count.unwrap_or(DEFAULT_OCCURRENCE_COUNT)
    }
}

/// Keyword -> configuration mapping, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Taxonomy {
    entries: Vec<(Keyword, TaxonomyEntry)>,
    index: HashMap<Keyword, usize>,
}

impl Taxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    /// The taxonomy bundled with the crate.
    pub fn default_taxonomy() -> Result<Self, Error> {
        Self::from_json_str(DEFAULT_KEYWORDS_JSON)
    }

    /// Parses a JSON mapping of keyword -> `{synonyms, regexp, occurrence_count}`.
    /// A `null` value means "all defaults". Declaration order is preserved.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let object = match serde_json::from_str::<Value>(json)? {
            Value::Object(object) => object,
            Value::Null => return Ok(Self::new()),
            other => {
                return Err(Error::InvalidInput(format!(
                    "Keyword taxonomy has to be a mapping, got '{}'",
                    other
                )))
            }
        };

        let mut taxonomy = Self::new();
        for (keyword, value) in object {
            let entry = TaxonomyEntry::from_json_value(&keyword, value)?;
            taxonomy.insert(keyword, entry);
        }

        Ok(taxonomy)
    }

    /// Parses CSV with a required `Keyword` column and optional `Synonyms`
    /// (comma separated), `Regexp` (semicolon separated) and
    /// `Occurrence Count` columns.
    pub fn from_csv_str(csv: &str) -> Result<Self, Error> {
        let mut taxonomy = Self::new();

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(Cursor::new(csv));

        let headers = reader
            .headers()
            .map_err(|e| Error::ParserError(format!("Failed to read headers: {}", e)))?
            .clone();

        let column = |name: &str| headers.iter().position(|h| h.trim() == name);

        let keyword_column = column("Keyword")
            .ok_or_else(|| Error::InvalidInput("Missing 'Keyword' column".to_string()))?;
        let synonyms_column = column("Synonyms");
        let regexp_column = column("Regexp");
        let occurrence_count_column = column("Occurrence Count");

        for record in reader.records() {
            let record =
                record.map_err(|e| Error::ParserError(format!("Failed to read record: {}", e)))?;

            let keyword = record
                .get(keyword_column)
                .map(|k| k.trim())
                .filter(|k| !k.is_empty())
                .ok_or_else(|| Error::InvalidInput("Missing 'Keyword' field".to_string()))?;

            let cell = |column: Option<usize>| {
                column
                    .and_then(|idx| record.get(idx))
                    .map(|value| value.trim())
                    .filter(|value| !value.is_empty())
            };

            let split_cell = |value: &str, separator: char| -> Vec<String> {
                value
                    .split(separator)
                    .map(|item| item.trim().to_string()) // Trim whitespace and convert to String
                    .filter(|item| !item.is_empty())
                    .collect()
            };

            let occurrence_count = match cell(occurrence_count_column) {
                Some(value) => Some(value.parse::<OccurrenceCount>().map_err(|_| {
                    Error::InvalidInput(format!(
                        "Occurrence count of keyword '{}' has to be a positive integer, got '{}'",
                        keyword, value
                    ))
                })?),
                None => None,
            };

            let entry = TaxonomyEntry {
                synonyms: cell(synonyms_column).map(|v| split_cell(v, CSV_SYNONYM_SEPARATOR)),
                regexp: cell(regexp_column).map(|v| split_cell(v, CSV_REGEXP_SEPARATOR)),
                occurrence_count,
            };

            taxonomy.insert(keyword.to_string(), entry);
        }

        Ok(taxonomy)
    }

    /// Loads a taxonomy file; `.csv` (optionally gzip-compressed) files are read
    /// as CSV, everything else as JSON.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let content = read_text_file(path)?;

        if Self::is_csv_path(path) {
            Self::from_csv_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    /// Loads from `path` when given, falling back to the bundled taxonomy.
    pub fn from_optional_path(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::default_taxonomy(),
        }
    }

    fn is_csv_path(path: &Path) -> bool {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        file_name.ends_with(".csv") || file_name.ends_with(".csv.gz")
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Inserts or replaces the configuration of `keyword`. A replaced keyword
    /// keeps its original position.
    pub fn insert(&mut self, keyword: Keyword, entry: TaxonomyEntry) {
        if let Some(&idx) = self.index.get(&keyword) {
            self.entries[idx].1 = entry;
        } else {
            self.index.insert(keyword.clone(), self.entries.len());
            self.entries.push((keyword, entry));
        }
    }

    pub fn remove(&mut self, keyword: &str) -> Option<TaxonomyEntry> {
        let idx = self.index.remove(keyword)?;
        let (_, entry) = self.entries.remove(idx);

        for position in self.index.values_mut() {
            if *position > idx {
                *position -= 1;
            }
        }

        Some(entry)
    }

    pub fn get(&self, keyword: &str) -> Option<&TaxonomyEntry> {
        self.index.get(keyword).map(|&idx| &self.entries[idx].1)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.index.contains_key(keyword)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Keyword, &TaxonomyEntry)> {
        self.entries.iter().map(|(keyword, entry)| (keyword, entry))
    }

    pub fn keywords(&self) -> impl Iterator<Item = &Keyword> {
        self.entries.iter().map(|(keyword, _)| keyword)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merges several taxonomies into one.
    ///
    /// Keyword names are normalized with `KeywordsChief::filter_keyword` and
    /// names not matching the keyword pattern are dropped. For keywords seen
    /// more than once, synonyms and regular expressions are unioned and
    /// occurrence counts summed. Keywords whose resulting occurrence count is
    /// below `options.occurrence_count_filter` are dropped.
    pub fn aggregate(inputs: &[Taxonomy], options: &AggregateOptions) -> Taxonomy {
        let mut aggregated = Taxonomy::new();

        for input in inputs {
            for (raw_keyword, entry) in input.iter() {
                let keyword = KeywordsChief::filter_keyword(raw_keyword);

                if !KeywordsChief::matches_keyword_pattern(&keyword) {
                    debug!("Dropping keyword '{}' not matching keyword pattern", raw_keyword);
                    continue;
                }

                let merged = match aggregated.get(&keyword) {
                    Some(existing) => TaxonomyEntry {
                        synonyms: union_lists(&existing.synonyms, &entry.synonyms),
                        regexp: union_lists(&existing.regexp, &entry.regexp),
                        occurrence_count: Some(
                            existing
                                .effective_occurrence_count()
                                .saturating_add(entry.effective_occurrence_count()),
                        ),
                    },
                    None => entry.clone(),
                };

                aggregated.insert(keyword, merged);
            }
        }

        let dropped: Vec<Keyword> = aggregated
            .iter()
            .filter(|(_, entry)| {
                entry.effective_occurrence_count() < options.occurrence_count_filter
            })
            .map(|(keyword, _)| keyword.clone())
            .collect();

        for keyword in dropped {
            debug!("Dropping keyword '{}' with low occurrence count", keyword);
            aggregated.remove(&keyword);
        }

        if options.compute_synonyms {
            for (keyword, entry) in aggregated.entries.iter_mut() {
                let computed: Vec<Synonym> = KeywordsChief::compute_synonyms(keyword)
                    .into_iter()
                    .filter(|synonym| synonym != keyword)
                    .collect();

                if !computed.is_empty() {
                    entry.synonyms = union_lists(&entry.synonyms, &Some(computed));
                }
            }
        }

        aggregated
    }

    /// Lists the keywords, synonyms and regular expressions removed in (or
    /// added by) `other` compared to `self`.
    pub fn diff(&self, other: &Taxonomy, options: &DiffOptions) -> Result<Vec<TaxonomyChange>, Error> {
        if options.synonyms_only && options.keywords_only {
            return Err(Error::InvalidInput(
                "Cannot compare synonyms only and keywords only at the same time".to_string(),
            ));
        }

        let compare_keywords = !options.synonyms_only && !options.regexp_only;
        let compare_synonyms = !options.keywords_only && !options.regexp_only;
        let compare_regexp = !options.keywords_only && !options.synonyms_only;

        let mut changes = Vec::new();
        let empty = TaxonomyEntry::default();

        for (action, taxonomy_a, taxonomy_b) in [
            (ChangeAction::Removed, self, other),
            (ChangeAction::Added, other, self),
        ] {
            for (keyword, entry_a) in taxonomy_a.iter() {
                let entry_b = taxonomy_b.get(keyword);

                if entry_b.is_none() && compare_keywords {
                    changes.push(TaxonomyChange {
                        action,
                        kind: ChangeKind::Keyword,
                        keyword: keyword.clone(),
                        value: None,
                    });
                    continue;
                }

                let entry_b = entry_b.unwrap_or(&empty);

                if compare_synonyms {
                    for synonym in missing_items(&entry_a.synonyms, &entry_b.synonyms) {
                        changes.push(TaxonomyChange {
                            action,
                            kind: ChangeKind::Synonym,
                            keyword: keyword.clone(),
                            value: Some(synonym),
                        });
                    }
                }

                if compare_regexp {
                    for regexp in missing_items(&entry_a.regexp, &entry_b.regexp) {
                        changes.push(TaxonomyChange {
                            action,
                            kind: ChangeKind::Regexp,
                            keyword: keyword.clone(),
                            value: Some(regexp),
                        });
                    }
                }
            }
        }

        Ok(changes)
    }
}

impl Serialize for Taxonomy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (keyword, entry) in &self.entries {
            map.serialize_entry(keyword, entry)?;
        }
        map.end()
    }
}

/// Items of `a` in order, followed by the items of `b` not already present.
fn union_lists(a: &Option<Vec<String>>, b: &Option<Vec<String>>) -> Option<Vec<String>> {
    match (a, b) {
        (None, None) => None,
        _ => {
            let mut union: Vec<String> = Vec::new();
            for item in a.iter().flatten().chain(b.iter().flatten()) {
                if !union.contains(item) {
                    union.push(item.clone());
                }
            }
            Some(union)
        }
    }
}

/// Items of `a` which do not appear in `b`.
fn missing_items(a: &Option<Vec<String>>, b: &Option<Vec<String>>) -> Vec<String> {
    let b_items: &[String] = b.as_deref().unwrap_or(&[]);

    a.iter()
        .flatten()
        .filter(|item| !b_items.contains(item))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOptions {
    pub compute_synonyms: bool,
    pub occurrence_count_filter: OccurrenceCount,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            compute_synonyms: true,
            occurrence_count_filter: DEFAULT_OCCURRENCE_COUNT_FILTER,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffOptions {
    pub synonyms_only: bool,
    pub keywords_only: bool,
    pub regexp_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    Removed,
    Added,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Keyword,
    Synonym,
    Regexp,
}

/// One difference between two taxonomies.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxonomyChange {
    pub action: ChangeAction,
    pub kind: ChangeKind,
    pub keyword: Keyword,
    /// The synonym or regular expression concerned; `None` for keyword changes.
    pub value: Option<String>,
}

impl fmt::Display for TaxonomyChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self.action {
            ChangeAction::Removed => "Removed",
            ChangeAction::Added => "Added",
        };

        match (self.kind, &self.value) {
            (ChangeKind::Synonym, Some(value)) => write!(
                f,
                "{} synonym '{}' for keyword '{}'",
                action, value, self.keyword
            ),
            (ChangeKind::Regexp, Some(value)) => write!(
                f,
                "{} regexp '{}' for keyword '{}'",
                action, value, self.keyword
            ),
            _ => write!(f, "{} keyword '{}'", action, self.keyword),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_preserves_declaration_order() {
        let taxonomy =
            Taxonomy::from_json_str(r#"{"zope": null, "apache": {}, "mongo": {"synonyms": []}}"#)
                .unwrap();

        let keywords: Vec<&Keyword> = taxonomy.keywords().collect();
        assert_eq!(keywords, vec!["zope", "apache", "mongo"]);
    }

    #[test]
    fn test_json_entry_fields() {
        let taxonomy = Taxonomy::from_json_str(
            r#"{"python": {"synonyms": ["py", 3], "regexp": ["python[23]"], "occurrence_count": 42}}"#,
        )
        .unwrap();

        let entry = taxonomy.get("python").unwrap();
        assert_eq!(
            entry.synonyms,
            Some(vec!["py".to_string(), "3".to_string()])
        );
        assert_eq!(entry.regexp, Some(vec!["python[23]".to_string()]));
        assert_eq!(entry.occurrence_count, Some(42));
    }

    #[test]
    fn test_json_rejects_malformed_input() {
        assert!(matches!(
            Taxonomy::from_json_str("[\"python\"]"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            Taxonomy::from_json_str(r#"{"python": "snake"}"#),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            Taxonomy::from_json_str(r#"{"python": {"occurrence_count": -1}}"#),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            Taxonomy::from_json_str("{not json"),
            Err(Error::JsonError(_))
        ));
    }

    #[test]
    fn test_csv_parsing() {
        let csv = "Keyword,Synonyms,Regexp,Occurrence Count\n\
                   python,\"py, python3\",python[23];py[23],10\n\
                   rust,,,\n";

        let taxonomy = Taxonomy::from_csv_str(csv).unwrap();

        assert_eq!(taxonomy.len(), 2);

        let python = taxonomy.get("python").unwrap();
        assert_eq!(
            python.synonyms,
            Some(vec!["py".to_string(), "python3".to_string()])
        );
        assert_eq!(
            python.regexp,
            Some(vec!["python[23]".to_string(), "py[23]".to_string()])
        );
        assert_eq!(python.occurrence_count, Some(10));

        assert_eq!(taxonomy.get("rust"), Some(&TaxonomyEntry::default()));
    }

    #[test]
    fn test_csv_requires_keyword_column() {
        let result = Taxonomy::from_csv_str("Name,Synonyms\npython,py\n");
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_to_json_round_trips_order() {
        let taxonomy = Taxonomy::from_json_str(
            r#"{"b": {"occurrence_count": 2}, "a": {"synonyms": ["aa"]}}"#,
        )
        .unwrap();

        let json = taxonomy.to_json().unwrap();
        assert_eq!(Taxonomy::from_json_str(&json).unwrap(), taxonomy);
        assert!(json.find("\"b\"").unwrap() < json.find("\"a\"").unwrap());
    }

    #[test]
    fn test_remove_keeps_index_consistent() {
        let mut taxonomy = Taxonomy::from_json_str(r#"{"a": null, "b": null, "c": null}"#).unwrap();

        assert!(taxonomy.remove("a").is_some());
        assert!(taxonomy.remove("a").is_none());
        assert!(taxonomy.get("c").is_some());

        let keywords: Vec<&Keyword> = taxonomy.keywords().collect();
        assert_eq!(keywords, vec!["b", "c"]);
    }
}
