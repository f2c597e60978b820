//! # Code Versioning Domain Types
//!
//! Read-only snapshots of versioned training scripts and the parser output
//! attached to each version, plus the request bodies used to append new
//! versions.
//!
//! Every sequence is ordered by creation: the "latest" entry is always the
//! last element, and version numbers are strictly increasing.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::timestamp;

// ── Code ─────────────────────────────────────────────────────────────────────

/// A named training script with its ordered version history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Code {
    pub id: i64,
    pub name: String,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub updated_at: NaiveDateTime,
    #[serde(default)]
    pub versions: Vec<CodeVersion>,
}

impl Code {
    /// The most recently created version, if any.
    pub fn latest_version(&self) -> Option<&CodeVersion> {
        self.versions.last()
    }

    pub fn version_by_id(&self, id: i64) -> Option<&CodeVersion> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// Version number the backend will assign to the next appended version.
    pub fn next_version_number(&self) -> i64 {
        self.versions.iter().map(|v| v.version).max().unwrap_or(0) + 1
    }

    /// Case-insensitive substring match on the name, as used by the list filter.
    pub fn name_matches(&self, query: &str) -> bool {
        query.is_empty() || self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

// ── CodeVersion ──────────────────────────────────────────────────────────────

/// Immutable snapshot of a script's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeVersion {
    pub id: i64,
    pub version: i64,
    pub content: String,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub parsing_results: Vec<ParsingResult>,
}

impl CodeVersion {
    pub fn latest_parsing_result(&self) -> Option<&ParsingResult> {
        self.parsing_results.last()
    }

    pub fn parsing_result_by_id(&self, id: i64) -> Option<&ParsingResult> {
        self.parsing_results.iter().find(|r| r.id == id)
    }

    /// Name given to the next parsing result created for this version.
    pub fn next_parsing_result_name(&self) -> String {
        format!("Parsing Result v{}", self.parsing_results.len() + 1)
    }

    /// Short label used by selectors: `v3 (2024-05-01 10:00)`
    pub fn label(&self) -> String {
        format!("v{} ({})", self.version, timestamp::display(&self.created_at))
    }
}

// ── ParsingResult ────────────────────────────────────────────────────────────

/// Structured extraction produced from a code version by the external parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsingResult {
    pub id: i64,
    pub code_version_id: i64,
    pub name: String,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub versions: Vec<ParsingResultVersion>,
}

impl ParsingResult {
    pub fn latest_version(&self) -> Option<&ParsingResultVersion> {
        self.versions.last()
    }

    pub fn version_by_id(&self, id: i64) -> Option<&ParsingResultVersion> {
        self.versions.iter().find(|v| v.id == id)
    }
}

/// One append-only revision of a parsing result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsingResultVersion {
    pub id: i64,
    pub version: i64,
    pub content: ParsedContent,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

impl ParsingResultVersion {
    /// Pretty-printed JSON used to seed the edit buffer.
    pub fn content_json(&self) -> String {
        serde_json::to_string_pretty(&self.content).unwrap_or_default()
    }
}

// ── ParsedContent ────────────────────────────────────────────────────────────

/// Parser output for a single script.
///
/// The parser is an external service and users may hand-edit saved versions,
/// so decoding is lenient: non-string block values are kept as their JSON text,
/// a single metric string becomes a one-element list, and unknown keys survive
/// in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedContent {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_metrics",
        skip_serializing_if = "Option::is_none"
    )]
    pub metric: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub parameter: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub model_block: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub data_block: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ParsedContent {
    pub fn framework_display(&self) -> &str {
        self.framework.as_deref().unwrap_or("N/A")
    }

    pub fn metric_display(&self) -> String {
        match &self.metric {
            Some(metrics) => serde_json::to_string_pretty(metrics).unwrap_or_default(),
            None => "N/A".to_string(),
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn lenient_metrics<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(vec![s]),
        Value::Array(items) => Some(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
        ),
        other => Some(vec![other.to_string()]),
    })
}

// ── Request bodies ───────────────────────────────────────────────────────────

/// `POST /codes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCode {
    pub name: String,
    pub content: String,
}

/// `PUT /codes/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameCode {
    pub name: String,
}

/// `POST /codes/{id}/versions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCodeVersion {
    pub content: String,
}

/// `POST /parsing/code-versions/{versionId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewParsingResult {
    pub name: String,
}

/// `POST /parsing/results/{id}/versions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewParsingResultVersion {
    pub content: Map<String, Value>,
}
