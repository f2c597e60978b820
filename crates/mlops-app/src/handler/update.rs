//! Main update function - handles state transitions (TEA pattern)
//!
//! Handler implementations live in:
//! - `navigation`: route changes and the fetches they issue
//! - `codes`: code tool handlers
//! - `clusters`: cluster tool handlers
//! - `logs`: pod log stream handlers

use std::time::Instant;

use tracing::debug;

use crate::message::Message;
use crate::state::AppState;

use super::{clusters, codes, keys::handle_key, logs, navigation, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            state.request_quit();
            UpdateResult::none()
        }

        Message::Key(key) => handle_key(state, key),

        Message::Tick => {
            let now = Instant::now();
            state.notifications.expire(now);
            if codes::poll_editor_height(state, now) {
                debug!(
                    "Editor height recomputed: {} rows",
                    state.code_detail.editor_rows()
                );
            }
            UpdateResult::maybe_action(navigation::refresh_due(state, now))
        }

        // ─────────────────────────────────────────────────────────
        // Navigation
        // ─────────────────────────────────────────────────────────
        Message::Navigate(route) => navigation::navigate(state, route, true),
        Message::Replace(route) => navigation::navigate(state, route, false),
        Message::Back => navigation::go_back(state),
        Message::Refresh => UpdateResult::maybe_action(navigation::refresh_route(state)),

        // ─────────────────────────────────────────────────────────
        // Fetch Results
        // ─────────────────────────────────────────────────────────
        Message::CodesLoaded { ticket, result } => {
            codes::handle_codes_loaded(state, ticket, result)
        }
        Message::CodeLoaded { ticket, result } => codes::handle_code_loaded(state, ticket, result),
        Message::ClustersLoaded { ticket, result } => {
            clusters::handle_clusters_loaded(state, ticket, result)
        }
        Message::ClusterDetailsLoaded { ticket, result } => {
            clusters::handle_details_loaded(state, ticket, result)
        }
        Message::ResourcesLoaded { ticket, result } => {
            clusters::handle_resources_loaded(state, ticket, result)
        }
        Message::ResourceLoaded { ticket, result } => {
            clusters::handle_resource_loaded(state, ticket, result)
        }

        // ─────────────────────────────────────────────────────────
        // Code Tool
        // ─────────────────────────────────────────────────────────
        Message::CodeCreated { result } => codes::handle_code_created(state, result),
        Message::ConfirmDeleteCodes => codes::confirm_bulk_delete(state),
        Message::CodesDeleted { outcome } => codes::handle_codes_deleted(state, outcome),
        Message::CodeVersionSaved { code_id, result } => {
            codes::handle_code_version_saved(state, code_id, result)
        }
        Message::VersionParsed {
            code_id,
            version_id,
            result,
        } => codes::handle_version_parsed(state, code_id, version_id, result),
        Message::ParsingResultVersionSaved {
            code_id,
            version_id,
            parsing_result_id,
            result,
        } => codes::handle_parsing_result_version_saved(
            state,
            code_id,
            version_id,
            parsing_result_id,
            result,
        ),
        Message::CodeRenamed { code_id, result } => {
            codes::handle_code_renamed(state, code_id, result)
        }

        // ─────────────────────────────────────────────────────────
        // Cluster Tool
        // ─────────────────────────────────────────────────────────
        Message::ClusterCreateAccepted { submission, result } => {
            clusters::handle_create_accepted(state, submission, result)
        }
        Message::TaskStatusReceived { task_id, task } => {
            clusters::handle_task_status(state, &task_id, task)
        }
        Message::TaskPollFailed { task_id, error } => {
            clusters::handle_task_poll_failed(state, &task_id, &error);
            UpdateResult::none()
        }
        Message::TaskPollGaveUp { task_id, error } => {
            clusters::handle_task_gave_up(state, &task_id, &error)
        }
        Message::ConfirmDeleteCluster { name } => clusters::confirm_delete_cluster(state, name),
        Message::ClusterDeleted { name, result } => {
            clusters::handle_cluster_deleted(state, &name, result)
        }
        Message::CloseDialog => {
            state.close_dialog();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Pod Logs
        // ─────────────────────────────────────────────────────────
        Message::LogLine { generation, line } => logs::handle_line(state, generation, line),
        Message::LogStreamEnded { generation, result } => {
            logs::handle_ended(state, generation, result)
        }
        Message::LogsDownloaded { result } => logs::handle_downloaded(state, result),
    }
}
