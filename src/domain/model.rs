use crate::utils::error::{Result, SaveError};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_FILE_NAME: &str = "downloaded_text.txt";
pub const TEXT_PLAIN_UTF8: &str = "text/plain;charset=utf-8";
pub const TEXT_PLAIN: &str = "text/plain";

/// A named piece of text ready to be handed to a [`Delivery`](crate::domain::ports::Delivery).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFile {
    pub name: String,
    pub content: String,
    pub mime: String,
}

impl TextFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>, mime: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            mime: mime.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Human-readable label for one category of output, e.g. "Error Log".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectionName(String);

impl SectionName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SaveError::InvalidSectionName {
                reason: "section name cannot be empty".to_string(),
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercases the label, turns spaces into underscores and appends `.txt`.
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.0.replace(' ', "_").to_lowercase())
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SectionName {
    type Error = SaveError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SectionName> for String {
    fn from(value: SectionName) -> Self {
        value.0
    }
}

/// Ordered, immutable list of section names. Payload `i` is saved under name `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct SectionTable {
    names: Vec<SectionName>,
}

impl SectionTable {
    pub const DEFAULT_NAMES: [&'static str; 11] = [
        "Indexed Text",
        "Indexing Results",
        "Indexing Debug Log",
        "Preprocessed Text",
        "Preprocessing Results",
        "Preprocessing Debug Log",
        "Translated Text",
        "JE Check Text",
        "Translator Debug Log",
        "Overall Debug Log",
        "Error Log",
    ];

    /// Builds a table, rejecting empty labels and labels that map to the same file name.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names
            .into_iter()
            .map(SectionName::new)
            .collect::<Result<Vec<_>>>()?;

        let mut seen = std::collections::HashSet::new();
        for name in &names {
            let file_name = name.file_name();
            crate::utils::validation::validate_file_name(&file_name)?;
            if !seen.insert(file_name.clone()) {
                return Err(SaveError::InvalidSectionName {
                    reason: format!("'{}' collides with another section as {}", name, file_name),
                });
            }
        }

        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SectionName> {
        self.names.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SectionName> {
        self.names.iter()
    }

    pub fn file_names(&self) -> Vec<String> {
        self.names.iter().map(SectionName::file_name).collect()
    }
}

impl Default for SectionTable {
    fn default() -> Self {
        Self {
            names: Self::DEFAULT_NAMES
                .iter()
                .map(|n| SectionName(n.to_string()))
                .collect(),
        }
    }
}

impl TryFrom<Vec<String>> for SectionTable {
    type Error = SaveError;

    fn try_from(names: Vec<String>) -> Result<Self> {
        Self::new(names)
    }
}

impl From<SectionTable> for Vec<String> {
    fn from(table: SectionTable) -> Self {
        table.names.into_iter().map(String::from).collect()
    }
}

/// What to do when more payloads arrive than there are section names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Refuse the whole call before anything is delivered.
    #[default]
    Reject,
    /// Deliver the first `len` payloads and drop the rest.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionFailure {
    pub section: String,
    pub file_name: String,
    pub error: String,
}

/// Outcome of one multi-section save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReport {
    pub delivered: Vec<String>,
    pub failed: Vec<SectionFailure>,
    pub skipped: usize,
}

impl SaveReport {
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn into_result(self) -> Result<Self> {
        match self.failed.first() {
            None => Ok(self),
            Some(first) => Err(SaveError::PartialFailure {
                failed: self.failed.len(),
                total: self.attempted(),
                first: format!("{}: {}", first.file_name, first.error),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_file_names() {
        let table = SectionTable::default();
        assert_eq!(table.len(), 11);
        assert_eq!(
            table.file_names(),
            vec![
                "indexed_text.txt",
                "indexing_results.txt",
                "indexing_debug_log.txt",
                "preprocessed_text.txt",
                "preprocessing_results.txt",
                "preprocessing_debug_log.txt",
                "translated_text.txt",
                "je_check_text.txt",
                "translator_debug_log.txt",
                "overall_debug_log.txt",
                "error_log.txt",
            ]
        );
    }

    #[test]
    fn test_every_space_is_replaced() {
        let name = SectionName::new("Very  Long Name").unwrap();
        assert_eq!(name.file_name(), "very__long_name.txt");
    }

    #[test]
    fn test_empty_section_name_rejected() {
        assert!(SectionName::new("").is_err());
        assert!(SectionName::new("  ").is_err());
        assert!(SectionTable::new(["Indexed Text", ""]).is_err());
    }

    #[test]
    fn test_colliding_section_names_rejected() {
        let result = SectionTable::new(["Error Log", "error log"]);
        assert!(matches!(result, Err(SaveError::InvalidSectionName { .. })));
    }

    #[test]
    fn test_section_name_with_separator_rejected() {
        let result = SectionTable::new(["Input/Output"]);
        assert!(matches!(result, Err(SaveError::InvalidFileName { .. })));
    }

    #[test]
    fn test_default_table_matches_new() {
        let built = SectionTable::new(SectionTable::DEFAULT_NAMES).unwrap();
        assert_eq!(built, SectionTable::default());
    }

    #[test]
    fn test_deserialized_table_is_validated() {
        #[derive(Debug, Deserialize)]
        struct Wrapper {
            table: SectionTable,
        }

        let ok: Wrapper = toml::from_str("table = [\"Source\", \"Error Log\"]").unwrap();
        assert_eq!(ok.table.file_names(), vec!["source.txt", "error_log.txt"]);

        assert!(toml::from_str::<Wrapper>("table = [\"Log\", \"log\"]").is_err());
        assert!(toml::from_str::<Wrapper>("table = [\"\"]").is_err());
        assert!(toml::from_str::<Wrapper>("table = [\"In/Out\"]").is_err());
    }

    #[test]
    fn test_table_serializes_as_names() {
        let json = serde_json::to_string(&SectionTable::new(["A b"]).unwrap()).unwrap();
        assert_eq!(json, "[\"A b\"]");
    }

    #[test]
    fn test_overflow_policy_from_toml_value() {
        #[derive(Deserialize)]
        struct Wrapper {
            on_overflow: OverflowPolicy,
        }
        let parsed: Wrapper = toml::from_str("on_overflow = \"skip\"").unwrap();
        assert_eq!(parsed.on_overflow, OverflowPolicy::Skip);
    }

    #[test]
    fn test_report_into_result() {
        let ok = SaveReport {
            delivered: vec!["indexed_text.txt".into()],
            ..Default::default()
        };
        assert!(ok.clone().into_result().is_ok());

        let partial = SaveReport {
            delivered: vec!["indexed_text.txt".into()],
            failed: vec![SectionFailure {
                section: "Indexing Results".into(),
                file_name: "indexing_results.txt".into(),
                error: "disk full".into(),
            }],
            skipped: 0,
        };
        match partial.into_result() {
            Err(SaveError::PartialFailure { failed, total, first }) => {
                assert_eq!(failed, 1);
                assert_eq!(total, 2);
                assert!(first.contains("indexing_results.txt"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
