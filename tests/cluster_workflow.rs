//! Cluster tool workflows driven through the engine against the in-memory
//! backend
//!
//! Run with: cargo test --test cluster_workflow

use std::time::Duration;

use mlops_app::config::Settings;
use mlops_app::input_key::InputKey;
use mlops_app::log_stream::StreamStatus;
use mlops_app::message::Message;
use mlops_app::route::Route;
use mlops_app::state::UiMode;
use mlops_app::Engine;
use mlops_client::test_utils::FakeBackend;
use mlops_core::{ClusterDetails, ResourceKind, TaskStatus};

/// Step the paused clock far enough for task polling to make progress
async fn settle(engine: &mut Engine<FakeBackend>) {
    for _ in 0..30 {
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(500)).await;
        engine.drain_pending_messages();
    }
}

fn press(engine: &mut Engine<FakeBackend>, key: InputKey) {
    engine.process_message(Message::Key(key));
}

#[tokio::test(start_paused = true)]
async fn test_create_cluster_polls_until_completed() {
    let backend = FakeBackend::new();
    backend.script_task(vec![
        (TaskStatus::Queued, None),
        (TaskStatus::InProgress, None),
        (TaskStatus::Completed, Some("Cluster 'qa' created")),
    ]);
    let mut engine = Engine::new(backend.clone(), Settings::default(), Route::ClusterList);
    settle(&mut engine).await;

    press(&mut engine, InputKey::Char('c'));
    assert_eq!(engine.state.ui_mode, UiMode::CreateCluster);
    for c in "qa".chars() {
        press(&mut engine, InputKey::Char(c));
    }
    press(&mut engine, InputKey::CharCtrl('s'));
    settle(&mut engine).await;

    assert_eq!(backend.count_requests("POST /clusters"), 1);
    assert_eq!(backend.count_requests("GET /tasks/"), 3);
    let state = &engine.state;
    assert!(state.clusters.create.is_none());
    assert_eq!(state.ui_mode, UiMode::Normal);
    let note = state.notifications.latest().expect("completion notice");
    assert!(note.text.contains("Cluster 'qa' created"), "{}", note.text);
    let names: Vec<_> = state
        .clusters
        .data
        .data()
        .expect("list reloaded")
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["qa"]);
}

#[tokio::test(start_paused = true)]
async fn test_failed_task_keeps_modal_open() {
    let backend = FakeBackend::new();
    backend.script_task(vec![(TaskStatus::Failed, Some("kind exited with 1"))]);
    let mut engine = Engine::new(backend, Settings::default(), Route::ClusterList);
    settle(&mut engine).await;

    press(&mut engine, InputKey::Char('c'));
    press(&mut engine, InputKey::Char('x'));
    press(&mut engine, InputKey::CharCtrl('s'));
    settle(&mut engine).await;

    let modal = engine.state.clusters.create.as_ref().expect("modal open");
    assert!(!modal.is_busy());
    let error = modal.error.as_deref().unwrap_or_default();
    assert!(error.contains("kind exited with 1"), "{error}");
}

#[tokio::test(start_paused = true)]
async fn test_cluster_detail_loads_counts() {
    let backend = FakeBackend::new();
    backend.seed_cluster(
        "dev",
        ClusterDetails {
            node_count: 2,
            ..Default::default()
        },
    );
    let mut engine = Engine::new(
        backend.clone(),
        Settings::default(),
        Route::ClusterDetail {
            cluster: "dev".into(),
        },
    );
    settle(&mut engine).await;

    let details = engine.state.cluster_details.data().expect("details loaded");
    assert_eq!(details.node_count, 2);
    assert_eq!(backend.count_requests("GET /clusters/dev/details"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_pod_logs_stream_and_leave() {
    let backend = FakeBackend::new();
    backend.script_logs(&["starting", "ready"], None);
    let mut engine = Engine::new(
        backend,
        Settings::default(),
        Route::ResourceList {
            cluster: "dev".into(),
            kind: ResourceKind::Pods,
        },
    );
    settle(&mut engine).await;

    engine.process_message(Message::Navigate(Route::PodLogs {
        cluster: "dev".into(),
        pod: "web-1".into(),
        namespace: "default".into(),
    }));
    settle(&mut engine).await;

    assert_eq!(engine.state.logs.lines(), ["starting", "ready"]);
    assert_eq!(engine.state.logs.status(), &StreamStatus::Ended);

    press(&mut engine, InputKey::Esc);
    assert!(matches!(engine.state.route, Route::ResourceList { .. }));
    assert_eq!(engine.state.logs.status(), &StreamStatus::Idle);

    engine.shutdown().await;
}
