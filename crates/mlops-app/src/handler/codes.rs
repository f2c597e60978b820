//! Code tool handlers: list, bulk delete, create, version editing, parsing

use std::time::Instant;

use mlops_core::prelude::*;
use mlops_core::{
    Code, CodeVersion, NewCodeVersion, NewParsingResult, NewParsingResultVersion, ParsingResult,
    ParsingResultVersion,
};

use crate::code_detail::{parse_json_buffer, Reselect};
use crate::confirm_dialog::ConfirmDialogState;
use crate::diff::VersionDiffState;
use crate::message::Message;
use crate::remote::RequestTicket;
use crate::route::Route;
use crate::selection::BulkDeleteOutcome;
use crate::state::{AppState, UiMode};

use super::navigation::{fetch_code, fetch_codes};
use super::{UpdateAction, UpdateResult};

// ─────────────────────────────────────────────────────────────────────────────
// Code List
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_codes_loaded(
    state: &mut AppState,
    ticket: RequestTicket,
    result: std::result::Result<Vec<Code>, String>,
) -> UpdateResult {
    if let Err(e) = &result {
        if state.codes.data.is_current(&ticket) {
            state.notifications.error(format!("Failed to load codes: {e}"));
        }
    }
    if state.codes.data.resolve(&ticket, result) {
        let ids: Vec<i64> = state
            .codes
            .data
            .data()
            .map(|codes| codes.iter().map(|c| c.id).collect())
            .unwrap_or_default();
        state.codes.selection.retain_present(&ids);
        state.codes.clamp_cursor();
    }
    UpdateResult::none()
}

pub fn toggle_current(state: &mut AppState) {
    if let Some(id) = state.codes.current().map(|c| c.id) {
        state.codes.selection.toggle(id);
    }
}

/// Ask for confirmation before deleting the selected codes
pub fn request_bulk_delete(state: &mut AppState) -> UpdateResult {
    if state.codes.deleting {
        return UpdateResult::none();
    }
    if state.codes.selection.is_empty() {
        state.notifications.info("No codes selected.");
        return UpdateResult::none();
    }
    let count = state.codes.selection.len();
    state.show_dialog(ConfirmDialogState::delete_codes(count));
    UpdateResult::none()
}

pub fn confirm_bulk_delete(state: &mut AppState) -> UpdateResult {
    state.close_dialog();
    let ids = state.codes.selection.ids();
    if ids.is_empty() || state.codes.deleting {
        return UpdateResult::none();
    }
    info!("Deleting {} codes", ids.len());
    state.codes.deleting = true;
    UpdateResult::action(UpdateAction::DeleteCodes { ids })
}

/// Selection is cleared and the list re-fetched whatever the outcome.
pub fn handle_codes_deleted(state: &mut AppState, outcome: BulkDeleteOutcome) -> UpdateResult {
    state.codes.deleting = false;
    state.codes.selection.clear();
    let summary = outcome.summary("codes");
    if outcome.is_success() {
        state.notifications.success(summary);
    } else {
        warn!("{}", summary);
        state.notifications.error(summary);
    }
    UpdateResult::maybe_action(fetch_codes(state))
}

// ─────────────────────────────────────────────────────────────────────────────
// Code Create
// ─────────────────────────────────────────────────────────────────────────────

pub fn submit_new_code(state: &mut AppState) -> UpdateResult {
    let form = &mut state.code_create;
    if form.submitting {
        return UpdateResult::none();
    }
    match form.validate() {
        Ok(body) => {
            form.error = None;
            form.submitting = true;
            UpdateResult::action(UpdateAction::CreateCode(body))
        }
        Err(e) => {
            form.error = Some(e.to_string());
            UpdateResult::none()
        }
    }
}

pub fn handle_code_created(
    state: &mut AppState,
    result: std::result::Result<Code, String>,
) -> UpdateResult {
    state.code_create.submitting = false;
    match result {
        Ok(code) => {
            info!("Created code {} ({})", code.id, code.name);
            state.notifications.success(format!("Created code '{}'", code.name));
            if state.route == Route::CodeCreate {
                return UpdateResult::message(Message::Back);
            }
            UpdateResult::none()
        }
        Err(e) => {
            state.code_create.error = Some(e);
            UpdateResult::none()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Code Detail
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_code_loaded(
    state: &mut AppState,
    ticket: RequestTicket,
    result: std::result::Result<Code, String>,
) -> UpdateResult {
    let detail = &mut state.code_detail;
    if let Err(e) = &result {
        if detail.data.is_current(&ticket) {
            state.notifications.error(format!("Failed to load code: {e}"));
        }
    }
    if !detail.data.resolve(&ticket, result) {
        return UpdateResult::none();
    }
    let reselect = std::mem::replace(&mut detail.pending_reselect, Reselect::Keep);
    if let Some(code) = detail.data.data() {
        detail.selection.apply(code, reselect);
        if reselect != Reselect::Keep {
            detail.json_error = None;
            if matches!(state.ui_mode, UiMode::EditContent | UiMode::EditJson) {
                state.ui_mode = UiMode::Normal;
            }
        }
        let content = detail.selection.content.text();
        if !detail.height.is_pending() {
            detail.height.reset_to(&content);
        }
        let len = code.versions.len();
        let diff_stale = detail
            .diff
            .as_ref()
            .is_some_and(|d| d.old_index >= len || d.new_index >= len);
        if diff_stale {
            detail.diff = VersionDiffState::for_code(code);
        }
    }
    UpdateResult::none()
}

/// Reload editor height after the selection replaced the buffer
fn reset_height(state: &mut AppState) {
    let content = state.code_detail.selection.content.text();
    state.code_detail.height.reset_to(&content);
}

pub fn step_version(state: &mut AppState, delta: isize) {
    let detail = &mut state.code_detail;
    if let Some(code) = detail.data.data() {
        detail.selection.step_version(code, delta);
        detail.json_error = None;
    }
    reset_height(state);
}

pub fn step_parsing_result(state: &mut AppState, delta: isize) {
    let detail = &mut state.code_detail;
    if let Some(code) = detail.data.data() {
        detail.selection.step_parsing_result(code, delta);
        detail.json_error = None;
    }
}

pub fn step_parsing_result_version(state: &mut AppState, delta: isize) {
    let detail = &mut state.code_detail;
    if let Some(code) = detail.data.data() {
        detail.selection.step_parsing_result_version(code, delta);
        detail.json_error = None;
    }
}

/// Record a script edit; the editor height follows after the quiet period.
pub fn note_content_edit(state: &mut AppState, now: Instant) {
    state.code_detail.height.note_edit(now);
}

/// Debounced height recomputation, driven by Tick
pub fn poll_editor_height(state: &mut AppState, now: Instant) -> bool {
    if !matches!(state.route, Route::CodeDetail { .. }) {
        return false;
    }
    let content = state.code_detail.selection.content.text();
    state.code_detail.height.poll(now, &content)
}

fn open_code_id(state: &AppState) -> Option<i64> {
    match state.route {
        Route::CodeDetail { id } => Some(id),
        _ => None,
    }
}

/// Save the script buffer as a new version of the open code
pub fn save_code_version(state: &mut AppState) -> UpdateResult {
    let Some(code_id) = open_code_id(state) else {
        return UpdateResult::none();
    };
    let detail = &mut state.code_detail;
    if detail.saving || detail.code().is_none() {
        return UpdateResult::none();
    }
    detail.saving = true;
    let body = NewCodeVersion {
        content: detail.selection.content.text(),
    };
    UpdateResult::action(UpdateAction::CreateCodeVersion { code_id, body })
}

pub fn handle_code_version_saved(
    state: &mut AppState,
    code_id: i64,
    result: std::result::Result<CodeVersion, String>,
) -> UpdateResult {
    state.code_detail.saving = false;
    match result {
        Ok(version) => {
            info!("Saved version {} of code {}", version.version, code_id);
            state
                .notifications
                .success(format!("Saved version v{}", version.version));
            if state.ui_mode == UiMode::EditContent {
                state.ui_mode = UiMode::Normal;
            }
            UpdateResult::maybe_action(fetch_code(state, code_id, Reselect::Version(version.id)))
        }
        Err(e) => {
            state
                .notifications
                .error(format!("Failed to save version: {e}"));
            UpdateResult::none()
        }
    }
}

/// Run the parser over the selected version
pub fn parse_version(state: &mut AppState) -> UpdateResult {
    let Some(code_id) = open_code_id(state) else {
        return UpdateResult::none();
    };
    let detail = &mut state.code_detail;
    if detail.saving {
        return UpdateResult::none();
    }
    let Some(version) = detail.code().and_then(|c| detail.selection.version(c)) else {
        state.notifications.info("No version selected.");
        return UpdateResult::none();
    };
    let version_id = version.id;
    let body = NewParsingResult {
        name: version.next_parsing_result_name(),
    };
    let label = version.label();
    detail.saving = true;
    state.notifications.info(format!("Parsing {label}..."));
    UpdateResult::action(UpdateAction::ParseCodeVersion {
        code_id,
        version_id,
        body,
    })
}

pub fn handle_version_parsed(
    state: &mut AppState,
    code_id: i64,
    version_id: i64,
    result: std::result::Result<ParsingResult, String>,
) -> UpdateResult {
    state.code_detail.saving = false;
    match result {
        Ok(parsing_result) => {
            state
                .notifications
                .success(format!("Created {}", parsing_result.name));
            UpdateResult::maybe_action(fetch_code(
                state,
                code_id,
                Reselect::ParsingResult {
                    version_id,
                    result_id: parsing_result.id,
                },
            ))
        }
        Err(e) => {
            state.notifications.error(format!("Failed to parse code: {e}"));
            UpdateResult::none()
        }
    }
}

pub fn start_json_edit(state: &mut AppState) {
    let detail = &mut state.code_detail;
    if detail.selection.parsing_result_version_id.is_none() {
        state.notifications.info("No parsing result to edit.");
        return;
    }
    detail.selection.editing_json = true;
    detail.json_error = None;
    state.ui_mode = UiMode::EditJson;
}

pub fn cancel_json_edit(state: &mut AppState) {
    let detail = &mut state.code_detail;
    if let Some(prv) = detail
        .code()
        .and_then(|code| detail.selection.parsing_result_version(code))
    {
        let json = prv.content_json();
        detail.selection.json.set_text(&json);
    }
    detail.selection.editing_json = false;
    detail.json_error = None;
    state.ui_mode = UiMode::Normal;
}

/// Validate the JSON buffer and save it as a new parsing result version.
pub fn save_parsing_result_version(state: &mut AppState) -> UpdateResult {
    let Some(code_id) = open_code_id(state) else {
        return UpdateResult::none();
    };
    let detail = &mut state.code_detail;
    if detail.saving {
        return UpdateResult::none();
    }
    let (Some(version_id), Some(parsing_result_id)) = (
        detail.selection.version_id,
        detail.selection.parsing_result_id,
    ) else {
        return UpdateResult::none();
    };
    match parse_json_buffer(&detail.selection.json.text()) {
        Ok(content) => {
            detail.json_error = None;
            detail.saving = true;
            UpdateResult::action(UpdateAction::CreateParsingResultVersion {
                code_id,
                version_id,
                parsing_result_id,
                body: NewParsingResultVersion { content },
            })
        }
        Err(e) => {
            detail.json_error = Some(e.to_string());
            UpdateResult::none()
        }
    }
}

pub fn handle_parsing_result_version_saved(
    state: &mut AppState,
    code_id: i64,
    version_id: i64,
    parsing_result_id: i64,
    result: std::result::Result<ParsingResultVersion, String>,
) -> UpdateResult {
    state.code_detail.saving = false;
    match result {
        Ok(prv) => {
            state
                .notifications
                .success(format!("Saved parsing result version v{}", prv.version));
            if state.ui_mode == UiMode::EditJson {
                state.ui_mode = UiMode::Normal;
            }
            state.code_detail.selection.editing_json = false;
            UpdateResult::maybe_action(fetch_code(
                state,
                code_id,
                Reselect::ParsingResult {
                    version_id,
                    result_id: parsing_result_id,
                },
            ))
        }
        Err(e) => {
            state.code_detail.json_error = Some(e.clone());
            state
                .notifications
                .error(format!("Failed to save parsing result: {e}"));
            UpdateResult::none()
        }
    }
}

pub fn start_rename(state: &mut AppState) {
    let Some(name) = state.code_detail.code().map(|c| c.name.clone()) else {
        return;
    };
    state.code_detail.rename.set_text(&name);
    state.code_detail.rename.move_to_end();
    state.ui_mode = UiMode::Rename;
}

pub fn submit_rename(state: &mut AppState) -> UpdateResult {
    let Some(code_id) = open_code_id(state) else {
        return UpdateResult::none();
    };
    let name = state.code_detail.rename.text().trim().to_string();
    if name.is_empty() {
        state.notifications.error("Name is required");
        return UpdateResult::none();
    }
    state.ui_mode = UiMode::Normal;
    if state.code_detail.code().map(|c| c.name.as_str()) == Some(name.as_str()) {
        return UpdateResult::none();
    }
    state.code_detail.saving = true;
    UpdateResult::action(UpdateAction::RenameCode { code_id, name })
}

pub fn handle_code_renamed(
    state: &mut AppState,
    code_id: i64,
    result: std::result::Result<Code, String>,
) -> UpdateResult {
    state.code_detail.saving = false;
    match result {
        Ok(code) => {
            state
                .notifications
                .success(format!("Renamed to '{}'", code.name));
            UpdateResult::maybe_action(fetch_code(state, code_id, Reselect::Keep))
        }
        Err(e) => {
            state.notifications.error(format!("Failed to rename: {e}"));
            UpdateResult::none()
        }
    }
}

pub fn open_diff(state: &mut AppState) {
    match state.code_detail.code().and_then(VersionDiffState::for_code) {
        Some(diff) => {
            state.code_detail.diff = Some(diff);
            state.ui_mode = UiMode::Diff;
        }
        None => state.notifications.info("No versions to compare."),
    }
}

pub fn close_diff(state: &mut AppState) {
    state.code_detail.diff = None;
    state.ui_mode = UiMode::Normal;
}
