//! Cluster tool handlers: list, create modal with task polling, delete,
//! details and resource views

use serde_json::Value;

use mlops_core::prelude::*;
use mlops_core::{Cluster, ClusterDetails, ResourceKind, ResourceList, Task, TaskAccepted};

use crate::confirm_dialog::ConfirmDialogState;
use crate::input_key::InputKey;
use crate::message::Message;
use crate::poller::PollTransition;
use crate::remote::RequestTicket;
use crate::route::{nav_items, Route};
use crate::state::{AppState, CreateClusterModal, DetailTab, UiMode};

use super::navigation::{fetch_clusters, fetch_resources};
use super::{UpdateAction, UpdateResult};

// ─────────────────────────────────────────────────────────────────────────────
// Fetch Results
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_clusters_loaded(
    state: &mut AppState,
    ticket: RequestTicket,
    result: std::result::Result<Vec<Cluster>, String>,
) -> UpdateResult {
    if let Err(e) = &result {
        if state.clusters.data.is_current(&ticket) {
            state
                .notifications
                .error(format!("Failed to load clusters: {e}"));
        }
    }
    if state.clusters.data.resolve(&ticket, result) {
        let len = state.clusters.data.data().map_or(0, Vec::len);
        state.clusters.cursor = state.clusters.cursor.min(len.saturating_sub(1));
    }
    UpdateResult::none()
}

pub fn handle_details_loaded(
    state: &mut AppState,
    ticket: RequestTicket,
    result: std::result::Result<ClusterDetails, String>,
) -> UpdateResult {
    state.cluster_details.resolve(&ticket, result);
    UpdateResult::none()
}

pub fn handle_resources_loaded(
    state: &mut AppState,
    ticket: RequestTicket,
    result: std::result::Result<ResourceList, String>,
) -> UpdateResult {
    if state.resources.data.resolve(&ticket, result) {
        let len = state.resources.data.data().map_or(0, |l| l.items.len());
        state.resources.cursor = state.resources.cursor.min(len.saturating_sub(1));
    }
    UpdateResult::none()
}

pub fn handle_resource_loaded(
    state: &mut AppState,
    ticket: RequestTicket,
    result: std::result::Result<Value, String>,
) -> UpdateResult {
    state.resource_detail.data.resolve(&ticket, result);
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────────────────────────
// Create Cluster Modal
// ─────────────────────────────────────────────────────────────────────────────

pub fn open_create_modal(state: &mut AppState) {
    state.clusters.create = Some(CreateClusterModal::new());
    state.ui_mode = UiMode::CreateCluster;
}

/// Close the modal; an in-flight task stops being polled, without error.
pub fn close_create_modal(state: &mut AppState) -> UpdateResult {
    state.ui_mode = UiMode::Normal;
    let Some(mut modal) = state.clusters.create.take() else {
        return UpdateResult::none();
    };
    if modal.poller.clear() {
        debug!("Create modal closed while polling; polling stopped");
        return UpdateResult::action(UpdateAction::StopTaskPolling);
    }
    UpdateResult::none()
}

pub fn handle_create_modal_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    if state.clusters.create.is_none() {
        state.ui_mode = UiMode::Normal;
        return UpdateResult::none();
    }
    match key {
        InputKey::Esc => return close_create_modal(state),
        k if k.is_save() => return submit_create_cluster(state),
        _ => {}
    }
    if let Some(modal) = state.clusters.create.as_mut() {
        if !modal.is_busy() {
            modal.form.handle_key(key);
        }
    }
    UpdateResult::none()
}

pub fn submit_create_cluster(state: &mut AppState) -> UpdateResult {
    let clusters = &mut state.clusters;
    let Some(modal) = clusters.create.as_mut() else {
        return UpdateResult::none();
    };
    if modal.is_busy() {
        return UpdateResult::none();
    }
    match modal.form.validate() {
        Ok(body) => {
            clusters.submissions += 1;
            let submission = clusters.submissions;
            info!(
                "Creating cluster '{}' (submission {})",
                body.cluster_name, submission
            );
            modal.error = None;
            modal.status = None;
            modal.poller.clear();
            modal.submitting = true;
            modal.submission = submission;
            UpdateResult::action(UpdateAction::CreateCluster { submission, body })
        }
        Err(e) => {
            modal.error = Some(e.to_string());
            UpdateResult::none()
        }
    }
}

pub fn handle_create_accepted(
    state: &mut AppState,
    submission: u64,
    result: std::result::Result<TaskAccepted, String>,
) -> UpdateResult {
    let Some(modal) = state.clusters.create.as_mut() else {
        // Modal cancelled before the backend answered
        return UpdateResult::none();
    };
    if !modal.submitting || modal.submission != submission {
        debug!(
            "Dropping answer to cancelled cluster submission {}",
            submission
        );
        return UpdateResult::none();
    }
    modal.submitting = false;
    match result {
        Ok(accepted) => {
            info!("Cluster creation queued as task {}", accepted.task_id);
            modal.poller.start(accepted.task_id.clone());
            UpdateResult::action(UpdateAction::PollTask {
                task_id: accepted.task_id,
            })
        }
        Err(e) => {
            modal.error = Some(e);
            UpdateResult::none()
        }
    }
}

pub fn handle_task_status(state: &mut AppState, task_id: &str, task: Task) -> UpdateResult {
    let Some(modal) = state.clusters.create.as_mut() else {
        return UpdateResult::none();
    };
    let transition = modal.poller.on_status(task_id, &task);
    if transition != PollTransition::Ignored {
        modal.status = Some(task);
    }
    apply_transition(state, transition)
}

pub fn handle_task_poll_failed(state: &mut AppState, task_id: &str, error: &str) {
    if let Some(modal) = state.clusters.create.as_mut() {
        modal.poller.on_error(task_id, error);
    }
}

pub fn handle_task_gave_up(state: &mut AppState, task_id: &str, error: &str) -> UpdateResult {
    let Some(modal) = state.clusters.create.as_mut() else {
        return UpdateResult::none();
    };
    let transition = modal.poller.on_gave_up(task_id, error);
    apply_transition(state, transition)
}

fn apply_transition(state: &mut AppState, transition: PollTransition) -> UpdateResult {
    match transition {
        PollTransition::Ignored | PollTransition::Progress => UpdateResult::none(),
        PollTransition::Completed(result) => {
            info!("Cluster creation completed: {}", result);
            state.clusters.create = None;
            if state.ui_mode == UiMode::CreateCluster {
                state.ui_mode = UiMode::Normal;
            }
            state
                .notifications
                .success(format!("Cluster creation completed: {result}"));
            UpdateResult::maybe_action(fetch_clusters(state))
        }
        PollTransition::Failed(result) => {
            let error = Error::task_failed(result);
            warn!("Cluster creation failed: {}", error);
            if let Some(modal) = state.clusters.create.as_mut() {
                modal.error = Some(format!("Cluster creation failed: {error}"));
            }
            UpdateResult::none()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Delete Cluster
// ─────────────────────────────────────────────────────────────────────────────

pub fn request_delete_cluster(state: &mut AppState) {
    if let Some(name) = state.clusters.current().map(|c| c.name.clone()) {
        state.show_dialog(ConfirmDialogState::delete_cluster(&name));
    }
}

pub fn confirm_delete_cluster(state: &mut AppState, name: String) -> UpdateResult {
    state.close_dialog();
    info!("Deleting cluster '{}'", name);
    UpdateResult::action(UpdateAction::DeleteCluster { name })
}

pub fn handle_cluster_deleted(
    state: &mut AppState,
    name: &str,
    result: std::result::Result<(), String>,
) -> UpdateResult {
    match result {
        Ok(()) => {
            state
                .notifications
                .success(format!("Cluster '{name}' deleted"));
        }
        Err(e) => {
            state
                .notifications
                .error(format!("Failed to delete cluster '{name}': {e}"));
        }
    }
    if state.route == Route::ClusterList {
        return UpdateResult::maybe_action(fetch_clusters(state));
    }
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────────────────────────
// Cluster-Scoped Navigation
// ─────────────────────────────────────────────────────────────────────────────

/// Next (or previous) enabled menu entry relative to the active one
pub fn cycle_nav(state: &AppState, forward: bool) -> Option<Route> {
    let items = nav_items(&state.route);
    let enabled: Vec<_> = items.iter().filter(|i| i.enabled()).collect();
    if enabled.is_empty() {
        return None;
    }
    let len = enabled.len();
    let next = match enabled.iter().position(|i| i.active) {
        Some(pos) if forward => (pos + 1) % len,
        Some(pos) => (pos + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    enabled[next].target.clone()
}

pub fn toggle_all_namespaces(state: &mut AppState) -> UpdateResult {
    let Route::ResourceList { cluster, kind } = state.route.clone() else {
        return UpdateResult::none();
    };
    if !kind.supports_all_namespaces() {
        return UpdateResult::none();
    }
    state.resources.all_namespaces = !state.resources.all_namespaces;
    UpdateResult::maybe_action(fetch_resources(state, &cluster, kind))
}

/// Detail route for the row under the cursor
pub fn open_current_resource(state: &AppState) -> Option<Route> {
    let Route::ResourceList { cluster, kind } = &state.route else {
        return None;
    };
    let item = state.resources.current()?;
    let name = ResourceList::item_name(item)?;
    let namespace = if kind.is_namespaced() {
        Some(
            ResourceList::item_namespace(item)
                .unwrap_or(state.settings.logs.default_namespace.as_str())
                .to_string(),
        )
    } else {
        None
    };
    Some(Route::ResourceDetail {
        cluster: cluster.clone(),
        kind: *kind,
        name: name.to_string(),
        namespace,
    })
}

/// Logs route for the pod under the cursor, namespace carried over
pub fn open_current_pod_logs(state: &AppState) -> Option<Route> {
    let Route::ResourceList {
        cluster,
        kind: ResourceKind::Pods,
    } = &state.route
    else {
        return None;
    };
    let item = state.resources.current()?;
    Some(Route::PodLogs {
        cluster: cluster.clone(),
        pod: ResourceList::item_name(item)?.to_string(),
        namespace: ResourceList::item_namespace(item)
            .unwrap_or(state.settings.logs.default_namespace.as_str())
            .to_string(),
    })
}

/// Switch detail tabs; the Logs tab opens the pod logs route.
pub fn cycle_detail_tab(state: &mut AppState, forward: bool) -> UpdateResult {
    let Route::ResourceDetail {
        cluster,
        kind,
        name,
        namespace,
    } = state.route.clone()
    else {
        return UpdateResult::none();
    };
    let tabs = DetailTab::available(kind);
    let pos = tabs
        .iter()
        .position(|t| *t == state.resource_detail.tab)
        .unwrap_or(0);
    let next = if forward {
        (pos + 1) % tabs.len()
    } else {
        (pos + tabs.len() - 1) % tabs.len()
    };
    let tab = tabs[next];
    if tab == DetailTab::Logs {
        return UpdateResult::message(Message::Navigate(Route::PodLogs {
            cluster,
            pod: name,
            namespace: namespace.unwrap_or_else(|| state.settings.logs.default_namespace.clone()),
        }));
    }
    state.resource_detail.tab = tab;
    state.resource_detail.scroll = 0;
    UpdateResult::none()
}
