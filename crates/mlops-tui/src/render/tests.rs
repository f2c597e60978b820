//! Full-screen rendering tests for each route and overlay

use super::view;
use mlops_app::confirm_dialog::ConfirmDialogState;
use mlops_app::route::Route;
use mlops_app::state::{AppState, CreateClusterModal, UiMode};
use mlops_client::LogStreamRequest;
use mlops_core::{Cluster, ResourceKind};

use crate::test_utils::{loaded, sample_code, TestTerminal};

fn render_screen(state: &mut AppState) -> TestTerminal {
    let mut term = TestTerminal::with_size(100, 30);
    term.draw_with(|frame| view(frame, state));
    term
}

#[test]
fn test_code_list_screen() {
    let mut state = AppState::new();
    state.codes.data = loaded(vec![sample_code(1)]);

    let term = render_screen(&mut state);

    assert!(term.buffer_contains("mlops-console"));
    assert!(term.buffer_contains("train.py"));
    assert!(term.buffer_contains("[/] Search"));
}

#[test]
fn test_search_mode_hints() {
    let mut state = AppState::new();
    state.ui_mode = UiMode::Search;

    let term = render_screen(&mut state);

    assert!(term.buffer_contains("[Enter] Apply"));
}

#[test]
fn test_notification_replaces_hints() {
    let mut state = AppState::new();
    state.notifications.success("Code created");

    let term = render_screen(&mut state);

    assert!(term.buffer_contains("Code created"));
    assert!(!term.buffer_contains("[/] Search"));
}

#[test]
fn test_confirm_dialog_overlay() {
    let mut state = AppState::new();
    state.show_dialog(ConfirmDialogState::delete_cluster("dev"));

    let term = render_screen(&mut state);

    assert_eq!(state.ui_mode, UiMode::ConfirmDialog);
    assert!(term.buffer_contains("Delete cluster"));
    assert!(term.buffer_contains("[Enter] Confirm"));
}

#[test]
fn test_cluster_list_with_create_modal() {
    let mut state = AppState::new();
    state.route = Route::ClusterList;
    state.clusters.data = loaded(vec![Cluster { name: "dev".into() }]);
    state.clusters.create = Some(CreateClusterModal::new());
    state.ui_mode = UiMode::CreateCluster;

    let term = render_screen(&mut state);

    assert!(term.buffer_contains("Create cluster"));
    assert!(term.buffer_contains("Cluster Name"));
}

#[test]
fn test_resource_list_shows_cluster_menu() {
    let mut state = AppState::new();
    state.route = Route::ResourceList {
        cluster: "dev".into(),
        kind: ResourceKind::Pods,
    };

    let term = render_screen(&mut state);

    assert!(term.buffer_contains("Pods"));
    assert!(term.buffer_contains("[a] Namespaces"));
}

#[test]
fn test_pod_logs_records_visible_rows() {
    let mut state = AppState::new();
    state.route = Route::PodLogs {
        cluster: "dev".into(),
        pod: "web-1".into(),
        namespace: "default".into(),
    };
    let generation = state
        .logs
        .open(LogStreamRequest::new("dev", "web-1"))
        .unwrap();
    state.logs.push_line(generation, "hello".into());

    let term = render_screen(&mut state);

    assert!(term.buffer_contains("hello"));
    assert!(state.logs.visible_rows > 0);
}

#[test]
fn test_diff_overlay() {
    let mut state = AppState::new();
    let code = sample_code(1);
    state.route = Route::CodeDetail { id: 1 };
    state.code_detail.diff = mlops_app::diff::VersionDiffState::for_code(&code);
    state.code_detail.data = loaded(code);
    state.ui_mode = UiMode::Diff;

    let term = render_screen(&mut state);

    assert!(term.buffer_contains("Compare versions"));
}
