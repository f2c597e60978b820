//! Route changes
//!
//! Entering a route issues the keyed requests its view needs; leaving one
//! disables the slots and connections only that route used, so late results
//! for it are dropped.

use std::time::Instant;

use mlops_client::LogStreamRequest;
use mlops_core::prelude::*;
use mlops_core::ResourceKind;

use crate::code_detail::Reselect;
use crate::forms::CodeCreateForm;
use crate::route::Route;
use crate::state::{AppState, CodeDetailState, DetailTab, UiMode};

use super::{UpdateAction, UpdateResult};

/// Move to `route`; `push` records the current route for Back.
pub fn navigate(state: &mut AppState, route: Route, push: bool) -> UpdateResult {
    if route == state.route {
        return UpdateResult::maybe_action(refresh_route(state));
    }
    debug!("Navigate {} -> {}", state.route, route);

    let mut actions = leave_route(state, &route);
    if push {
        let previous = std::mem::replace(&mut state.route, route);
        state.history.push(previous);
    } else {
        state.route = route;
    }
    state.ui_mode = UiMode::Normal;
    state.confirm_dialog = None;
    release_unused_slots(state);
    actions.extend(enter_route(state));
    UpdateResult::actions(actions)
}

/// Return to the previous route, or the parent when there is no history.
pub fn go_back(state: &mut AppState) -> UpdateResult {
    while let Some(route) = state.history.pop() {
        if route != state.route {
            return navigate(state, route, false);
        }
    }
    match state.route.parent() {
        Some(parent) => navigate(state, parent, false),
        None => UpdateResult::none(),
    }
}

fn leave_route(state: &mut AppState, next: &Route) -> Vec<UpdateAction> {
    let mut actions = Vec::new();
    match &state.route {
        Route::PodLogs { .. } if !matches!(next, Route::PodLogs { .. }) => {
            state.logs.close();
            actions.push(UpdateAction::StopLogStream);
        }
        Route::CodeDetail { .. } => {
            state.code_detail.height.cancel();
            state.code_detail.diff = None;
        }
        Route::ClusterList => {
            if let Some(modal) = state.clusters.create.take() {
                if modal.poller.is_active() {
                    actions.push(UpdateAction::StopTaskPolling);
                }
            }
        }
        _ => {}
    }
    actions
}

fn release_unused_slots(state: &mut AppState) {
    if !matches!(state.route, Route::CodeDetail { .. }) {
        state.code_detail.data.reset();
    }
    if !matches!(state.route, Route::ClusterDetail { .. }) {
        state.cluster_details.reset();
    }
    if !matches!(state.route, Route::ResourceList { .. }) {
        state.resources.data.reset();
    }
    if !matches!(state.route, Route::ResourceDetail { .. }) {
        state.resource_detail.data.reset();
    }
}

fn enter_route(state: &mut AppState) -> Vec<UpdateAction> {
    match state.route.clone() {
        Route::CodeList => {
            state.codes.clamp_cursor();
            fetch_codes(state).into_iter().collect()
        }
        Route::CodeCreate => {
            state.code_create = CodeCreateForm::new();
            Vec::new()
        }
        Route::CodeDetail { id } => {
            if state.code_detail.data.key() != Some(id.to_string().as_str()) {
                state.code_detail = CodeDetailState::new(&state.settings);
            }
            fetch_code(state, id, Reselect::Latest).into_iter().collect()
        }
        Route::ClusterList => fetch_clusters(state).into_iter().collect(),
        Route::ClusterDetail { cluster } => state
            .cluster_details
            .request(Some(cluster.clone()))
            .map(|ticket| UpdateAction::FetchClusterDetails { ticket, cluster })
            .into_iter()
            .collect(),
        Route::ResourceList { cluster, kind } => {
            fetch_resources(state, &cluster, kind).into_iter().collect()
        }
        Route::ResourceDetail { .. } => {
            state.resource_detail.tab = DetailTab::Details;
            state.resource_detail.scroll = 0;
            fetch_resource(state).into_iter().collect()
        }
        Route::PodLogs {
            cluster,
            pod,
            namespace,
        } => {
            let request = LogStreamRequest::new(cluster, pod)
                .with_namespace(namespace)
                .with_follow(state.settings.logs.follow)
                .with_tail(state.settings.logs.tail);
            state
                .logs
                .open(request.clone())
                .map(|generation| UpdateAction::StartLogStream {
                    request,
                    generation,
                })
                .into_iter()
                .collect()
        }
    }
}

/// Re-issue the current route's requests
pub fn refresh_route(state: &mut AppState) -> Option<UpdateAction> {
    match state.route.clone() {
        Route::CodeList => fetch_codes(state),
        Route::CodeCreate => None,
        Route::CodeDetail { id } => fetch_code(state, id, Reselect::Keep),
        Route::ClusterList => fetch_clusters(state),
        Route::ClusterDetail { cluster } => state
            .cluster_details
            .request(Some(cluster.clone()))
            .map(|ticket| UpdateAction::FetchClusterDetails { ticket, cluster }),
        Route::ResourceList { cluster, kind } => fetch_resources(state, &cluster, kind),
        Route::ResourceDetail { .. } => fetch_resource(state),
        Route::PodLogs { .. } => super::logs::restart(state),
    }
}

/// Periodic refresh of the cluster views
pub fn refresh_due(state: &mut AppState, now: Instant) -> Option<UpdateAction> {
    let due = match &state.route {
        Route::ClusterList => state.clusters.data.refresh_due(now),
        Route::ClusterDetail { .. } => state.cluster_details.refresh_due(now),
        Route::ResourceList { .. } => state.resources.data.refresh_due(now),
        _ => false,
    };
    if due {
        trace!("Periodic refresh of {}", state.route);
        refresh_route(state)
    } else {
        None
    }
}

pub fn fetch_codes(state: &mut AppState) -> Option<UpdateAction> {
    state
        .codes
        .data
        .request(Some("codes".to_string()))
        .map(|ticket| UpdateAction::FetchCodes { ticket })
}

/// Fetch code `id` if it is the open code; `reselect` applies to the result.
pub fn fetch_code(state: &mut AppState, id: i64, reselect: Reselect) -> Option<UpdateAction> {
    if state.route != (Route::CodeDetail { id }) {
        return None;
    }
    let key = id.to_string();
    let detail = &mut state.code_detail;
    // A plain refresh keeps the reselect of the fetch it supersedes
    let in_flight = detail.data.is_loading() && detail.data.key() == Some(key.as_str());
    if reselect != Reselect::Keep || !in_flight {
        detail.pending_reselect = reselect;
    }
    detail
        .data
        .request(Some(key))
        .map(|ticket| UpdateAction::FetchCode { ticket, id })
}

pub fn fetch_clusters(state: &mut AppState) -> Option<UpdateAction> {
    state
        .clusters
        .data
        .request(Some("clusters".to_string()))
        .map(|ticket| UpdateAction::FetchClusters { ticket })
}

pub fn fetch_resources(
    state: &mut AppState,
    cluster: &str,
    kind: ResourceKind,
) -> Option<UpdateAction> {
    let all_namespaces = state.resources.all_namespaces_for(kind);
    let key = match all_namespaces {
        Some(all) => format!("{cluster}/{kind}?all_namespaces={all}"),
        None => format!("{cluster}/{kind}"),
    };
    if state.resources.data.key() != Some(key.as_str()) {
        state.resources.cursor = 0;
    }
    state
        .resources
        .data
        .request(Some(key))
        .map(|ticket| UpdateAction::FetchResources {
            ticket,
            cluster: cluster.to_string(),
            kind,
            all_namespaces,
        })
}

fn fetch_resource(state: &mut AppState) -> Option<UpdateAction> {
    let Route::ResourceDetail {
        cluster,
        kind,
        name,
        namespace,
    } = state.route.clone()
    else {
        return None;
    };
    let key = state.route.path();
    state
        .resource_detail
        .data
        .request(Some(key))
        .map(|ticket| UpdateAction::FetchResource {
            ticket,
            cluster,
            kind,
            name,
            namespace,
        })
}
