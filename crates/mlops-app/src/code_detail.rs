//! Version selection and edit buffers for the code detail view
//!
//! The selection is a chain: code version -> parsing result -> parsing result
//! version. Changing any link resets every link below it (to that entity's
//! latest child, or nothing) and reloads the dependent buffers in the same
//! call, so no buffer ever shows content belonging to a previous selection.

use serde_json::{Map, Value};

use mlops_core::prelude::*;
use mlops_core::{Code, CodeVersion, ParsingResult, ParsingResultVersion};

use crate::text_buffer::TextBuffer;

/// Which selection to restore after the code is re-fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reselect {
    /// Latest version and its latest nested entries
    #[default]
    Latest,
    /// A specific code version, nested entries reset to latest
    Version(i64),
    /// A specific code version and parsing result; the result's latest
    /// version is selected
    ParsingResult { version_id: i64, result_id: i64 },
    /// Leave the current selection and buffers untouched if still valid
    Keep,
}

#[derive(Debug, Clone, Default)]
pub struct VersionSelection {
    pub version_id: Option<i64>,
    pub parsing_result_id: Option<i64>,
    pub parsing_result_version_id: Option<i64>,
    /// Script editor buffer, seeded from the selected version
    pub content: TextBuffer,
    /// Parsing result JSON buffer, seeded from the selected result version
    pub json: TextBuffer,
    /// JSON editor shown instead of the read-only parsed fields
    pub editing_json: bool,
}

impl VersionSelection {
    pub fn new() -> Self {
        Self {
            content: TextBuffer::multi_line(""),
            json: TextBuffer::multi_line(""),
            ..Default::default()
        }
    }

    pub fn version<'a>(&self, code: &'a Code) -> Option<&'a CodeVersion> {
        code.version_by_id(self.version_id?)
    }

    pub fn parsing_result<'a>(&self, code: &'a Code) -> Option<&'a ParsingResult> {
        self.version(code)?
            .parsing_result_by_id(self.parsing_result_id?)
    }

    pub fn parsing_result_version<'a>(&self, code: &'a Code) -> Option<&'a ParsingResultVersion> {
        self.parsing_result(code)?
            .version_by_id(self.parsing_result_version_id?)
    }

    /// Apply a freshly fetched code according to `reselect`.
    pub fn apply(&mut self, code: &Code, reselect: Reselect) {
        match reselect {
            Reselect::Keep if self.is_valid_for(code) => {}
            Reselect::Keep | Reselect::Latest => self.select_latest(code),
            Reselect::Version(id) => match code.version_by_id(id) {
                Some(_) => self.select_version(code, id),
                None => self.select_latest(code),
            },
            Reselect::ParsingResult {
                version_id,
                result_id,
            } => match code.version_by_id(version_id) {
                Some(version) => {
                    self.select_version(code, version_id);
                    if version.parsing_result_by_id(result_id).is_some() {
                        self.select_parsing_result(code, result_id);
                    }
                }
                None => self.select_latest(code),
            },
        }
    }

    fn is_valid_for(&self, code: &Code) -> bool {
        let Some(version) = self.version(code) else {
            return false;
        };
        match self.parsing_result_id {
            None => version.parsing_results.is_empty() || self.parsing_result_version_id.is_none(),
            Some(id) => match version.parsing_result_by_id(id) {
                None => false,
                Some(result) => self
                    .parsing_result_version_id
                    .map_or(true, |pv| result.version_by_id(pv).is_some()),
            },
        }
    }

    pub fn select_latest(&mut self, code: &Code) {
        match code.latest_version() {
            Some(latest) => self.select_version(code, latest.id),
            None => {
                self.version_id = None;
                self.content.clear();
                self.clear_parsing_selection();
            }
        }
    }

    /// Select a code version; nested selections reset to its latest entries.
    pub fn select_version(&mut self, code: &Code, version_id: i64) {
        let Some(version) = code.version_by_id(version_id) else {
            return;
        };
        self.version_id = Some(version.id);
        self.content.set_text(&version.content);
        match version.latest_parsing_result() {
            Some(result) => self.select_parsing_result(code, result.id),
            None => self.clear_parsing_selection(),
        }
    }

    /// Select a parsing result of the current version; its latest version
    /// becomes the selected result version.
    pub fn select_parsing_result(&mut self, code: &Code, result_id: i64) {
        let Some(result) = self
            .version(code)
            .and_then(|v| v.parsing_result_by_id(result_id))
        else {
            return;
        };
        self.parsing_result_id = Some(result.id);
        match result.latest_version() {
            Some(latest) => {
                self.parsing_result_version_id = Some(latest.id);
                self.json.set_text(&latest.content_json());
            }
            None => {
                self.parsing_result_version_id = None;
                self.json.clear();
            }
        }
        self.editing_json = false;
    }

    pub fn select_parsing_result_version(&mut self, code: &Code, prv_id: i64) {
        let Some(prv) = self
            .parsing_result(code)
            .and_then(|r| r.version_by_id(prv_id))
        else {
            return;
        };
        self.parsing_result_version_id = Some(prv.id);
        self.json.set_text(&prv.content_json());
        self.editing_json = false;
    }

    fn clear_parsing_selection(&mut self) {
        self.parsing_result_id = None;
        self.parsing_result_version_id = None;
        self.json.clear();
        self.editing_json = false;
    }

    /// Step the version selection by `delta` positions (clamped)
    pub fn step_version(&mut self, code: &Code, delta: isize) {
        let ids: Vec<i64> = code.versions.iter().map(|v| v.id).collect();
        if let Some(id) = step(&ids, self.version_id, delta) {
            if Some(id) != self.version_id {
                self.select_version(code, id);
            }
        }
    }

    pub fn step_parsing_result(&mut self, code: &Code, delta: isize) {
        let Some(version) = self.version(code) else {
            return;
        };
        let ids: Vec<i64> = version.parsing_results.iter().map(|r| r.id).collect();
        if let Some(id) = step(&ids, self.parsing_result_id, delta) {
            if Some(id) != self.parsing_result_id {
                self.select_parsing_result(code, id);
            }
        }
    }

    pub fn step_parsing_result_version(&mut self, code: &Code, delta: isize) {
        let Some(result) = self.parsing_result(code) else {
            return;
        };
        let ids: Vec<i64> = result.versions.iter().map(|v| v.id).collect();
        if let Some(id) = step(&ids, self.parsing_result_version_id, delta) {
            if Some(id) != self.parsing_result_version_id {
                self.select_parsing_result_version(code, id);
            }
        }
    }
}

fn step(ids: &[i64], current: Option<i64>, delta: isize) -> Option<i64> {
    if ids.is_empty() {
        return None;
    }
    let pos = current
        .and_then(|c| ids.iter().position(|id| *id == c))
        .unwrap_or(ids.len() - 1) as isize;
    let next = (pos + delta).clamp(0, ids.len() as isize - 1) as usize;
    Some(ids[next])
}

/// Validate the hand-edited parsing result buffer.
///
/// The content must be a JSON object; anything else is a validation error
/// and nothing is sent.
pub fn parse_json_buffer(text: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(Error::validation(
            "Parsing result content must be a JSON object",
        )),
        Err(e) => Err(Error::validation(format!("Invalid JSON: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use mlops_core::ParsedContent;

    fn prv(id: i64, version: i64, framework: &str) -> ParsingResultVersion {
        ParsingResultVersion {
            id,
            version,
            content: ParsedContent {
                framework: Some(framework.to_string()),
                ..Default::default()
            },
            created_at: NaiveDateTime::default(),
        }
    }

    fn result(id: i64, version_id: i64, versions: Vec<ParsingResultVersion>) -> ParsingResult {
        ParsingResult {
            id,
            code_version_id: version_id,
            name: format!("Parsing Result {id}"),
            created_at: NaiveDateTime::default(),
            versions,
        }
    }

    fn version(id: i64, n: i64, content: &str, results: Vec<ParsingResult>) -> CodeVersion {
        CodeVersion {
            id,
            version: n,
            content: content.to_string(),
            created_at: NaiveDateTime::default(),
            parsing_results: results,
        }
    }

    /// v1 has no results; v2 has two results, the second with two versions
    fn sample_code() -> Code {
        Code {
            id: 1,
            name: "mnist".into(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
            versions: vec![
                version(10, 1, "x=1", vec![]),
                version(
                    20,
                    2,
                    "x=2",
                    vec![
                        result(30, 20, vec![prv(31, 1, "keras")]),
                        result(40, 20, vec![prv(41, 1, "torch"), prv(42, 2, "jax")]),
                    ],
                ),
            ],
        }
    }

    #[test]
    fn test_initial_load_selects_latest_chain() {
        let code = sample_code();
        let mut sel = VersionSelection::new();
        sel.apply(&code, Reselect::Latest);
        assert_eq!(sel.version_id, Some(20));
        assert_eq!(sel.parsing_result_id, Some(40));
        assert_eq!(sel.parsing_result_version_id, Some(42));
        assert_eq!(sel.content.text(), "x=2");
        assert!(sel.json.text().contains("jax"));
    }

    #[test]
    fn test_switching_version_resets_nested_selection() {
        let code = sample_code();
        let mut sel = VersionSelection::new();
        sel.apply(&code, Reselect::Latest);
        sel.editing_json = true;

        sel.select_version(&code, 10);
        assert_eq!(sel.version_id, Some(10));
        assert_eq!(sel.parsing_result_id, None);
        assert_eq!(sel.parsing_result_version_id, None);
        assert_eq!(sel.json.text(), "");
        assert!(!sel.editing_json);
        assert_eq!(sel.content.text(), "x=1");

        sel.select_version(&code, 20);
        assert_eq!(sel.parsing_result_id, Some(40));
        assert_eq!(sel.parsing_result_version_id, Some(42));
    }

    #[test]
    fn test_switching_version_discards_unsaved_edits() {
        let code = sample_code();
        let mut sel = VersionSelection::new();
        sel.apply(&code, Reselect::Latest);
        sel.content.insert_str("# local");
        sel.json.insert_str("garbage");

        sel.select_version(&code, 10);
        sel.select_version(&code, 20);
        assert_eq!(sel.content.text(), "x=2");
        assert!(!sel.content.is_dirty());
        assert!(!sel.json.text().contains("garbage"));
    }

    #[test]
    fn test_select_parsing_result_picks_its_latest_version() {
        let code = sample_code();
        let mut sel = VersionSelection::new();
        sel.apply(&code, Reselect::Latest);
        sel.select_parsing_result(&code, 30);
        assert_eq!(sel.parsing_result_version_id, Some(31));
        assert!(sel.json.text().contains("keras"));
    }

    #[test]
    fn test_foreign_parsing_result_is_ignored() {
        let code = sample_code();
        let mut sel = VersionSelection::new();
        sel.select_version(&code, 10);
        // Result 30 belongs to version 20
        sel.select_parsing_result(&code, 30);
        assert_eq!(sel.parsing_result_id, None);
    }

    #[test]
    fn test_reselect_version_after_refetch() {
        let code = sample_code();
        let mut sel = VersionSelection::new();
        sel.apply(&code, Reselect::Version(10));
        assert_eq!(sel.version_id, Some(10));
        // Unknown id falls back to latest
        sel.apply(&code, Reselect::Version(999));
        assert_eq!(sel.version_id, Some(20));
    }

    #[test]
    fn test_reselect_parsing_result_after_refetch() {
        let code = sample_code();
        let mut sel = VersionSelection::new();
        sel.apply(
            &code,
            Reselect::ParsingResult {
                version_id: 20,
                result_id: 30,
            },
        );
        assert_eq!(sel.parsing_result_id, Some(30));
        assert_eq!(sel.parsing_result_version_id, Some(31));
    }

    #[test]
    fn test_keep_preserves_buffers_when_valid() {
        let code = sample_code();
        let mut sel = VersionSelection::new();
        sel.apply(&code, Reselect::Latest);
        sel.select_version(&code, 10);
        sel.content.insert_str("# wip ");
        sel.apply(&code, Reselect::Keep);
        assert_eq!(sel.version_id, Some(10));
        assert!(sel.content.text().starts_with("# wip "));
    }

    #[test]
    fn test_keep_falls_back_when_version_vanished() {
        let code = sample_code();
        let mut sel = VersionSelection::new();
        sel.version_id = Some(999);
        sel.apply(&code, Reselect::Keep);
        assert_eq!(sel.version_id, Some(20));
    }

    #[test]
    fn test_code_without_versions_clears_everything() {
        let mut code = sample_code();
        code.versions.clear();
        let mut sel = VersionSelection::new();
        sel.content.insert_str("stale");
        sel.apply(&code, Reselect::Latest);
        assert_eq!(sel.version_id, None);
        assert_eq!(sel.content.text(), "");
        assert_eq!(sel.parsing_result_id, None);
    }

    #[test]
    fn test_step_version_clamps() {
        let code = sample_code();
        let mut sel = VersionSelection::new();
        sel.apply(&code, Reselect::Latest);
        sel.step_version(&code, 1);
        assert_eq!(sel.version_id, Some(20));
        sel.step_version(&code, -1);
        assert_eq!(sel.version_id, Some(10));
        sel.step_version(&code, -1);
        assert_eq!(sel.version_id, Some(10));
    }

    #[test]
    fn test_step_parsing_result_version() {
        let code = sample_code();
        let mut sel = VersionSelection::new();
        sel.apply(&code, Reselect::Latest);
        sel.step_parsing_result_version(&code, -1);
        assert_eq!(sel.parsing_result_version_id, Some(41));
        assert!(sel.json.text().contains("torch"));
    }

    #[test]
    fn test_parse_json_buffer() {
        assert!(parse_json_buffer(r#"{"framework": "torch"}"#).is_ok());

        let err = parse_json_buffer("[1, 2]").unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));

        let err = parse_json_buffer("{ not json").unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON"));
    }
}
