//! Code tool workflows driven through the engine against the in-memory backend
//!
//! Run with: cargo test --test code_workflow

use std::time::Duration;

use mlops_app::config::Settings;
use mlops_app::input_key::InputKey;
use mlops_app::message::Message;
use mlops_app::route::Route;
use mlops_app::state::UiMode;
use mlops_app::Engine;
use mlops_client::test_utils::FakeBackend;

/// Let background tasks run and feed their results back
async fn settle(engine: &mut Engine<FakeBackend>) {
    for _ in 0..20 {
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        engine.drain_pending_messages();
    }
}

fn press(engine: &mut Engine<FakeBackend>, key: InputKey) {
    engine.process_message(Message::Key(key));
}

fn type_text(engine: &mut Engine<FakeBackend>, text: &str) {
    for c in text.chars() {
        press(engine, InputKey::Char(c));
    }
}

#[tokio::test]
async fn test_create_code_returns_to_list() {
    let backend = FakeBackend::new();
    let mut engine = Engine::new(backend.clone(), Settings::default(), Route::CodeList);
    settle(&mut engine).await;

    press(&mut engine, InputKey::Char('n'));
    assert_eq!(engine.state.route, Route::CodeCreate);
    type_text(&mut engine, "train.py");
    press(&mut engine, InputKey::CharCtrl('s'));
    settle(&mut engine).await;

    let codes = backend.codes();
    assert_eq!(codes.len(), 1);
    assert_eq!(codes[0].name, "train.py");
    assert!(codes[0].versions.is_empty());
    assert_eq!(engine.state.route, Route::CodeList);
    let listed = engine.state.codes.data.data().expect("list reloaded");
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_create_code_requires_name() {
    let backend = FakeBackend::new();
    let mut engine = Engine::new(backend.clone(), Settings::default(), Route::CodeCreate);
    settle(&mut engine).await;

    press(&mut engine, InputKey::CharCtrl('s'));
    settle(&mut engine).await;

    assert_eq!(backend.count_requests("POST /codes"), 0);
    assert!(engine.state.code_create.error.is_some());
}

#[tokio::test]
async fn test_bulk_delete_reports_partial_failure() {
    let backend = FakeBackend::new();
    let keep = backend.seed_code("keep.py", &["a"]);
    backend.seed_code("drop.py", &["b"]);
    backend.fail_code_delete(keep.id);
    let mut engine = Engine::new(backend.clone(), Settings::default(), Route::CodeList);
    settle(&mut engine).await;

    press(&mut engine, InputKey::Char(' '));
    press(&mut engine, InputKey::Down);
    press(&mut engine, InputKey::Char(' '));
    press(&mut engine, InputKey::Char('d'));
    assert_eq!(engine.state.ui_mode, UiMode::ConfirmDialog);
    press(&mut engine, InputKey::Enter);
    settle(&mut engine).await;

    assert_eq!(backend.count_requests("DELETE /codes/"), 2);
    let remaining = backend.codes();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "keep.py");

    let state = &engine.state;
    assert!(state.codes.selection.is_empty());
    assert!(!state.codes.deleting);
    let note = state.notifications.latest().expect("summary shown");
    assert!(note.text.contains("deleted 1 of 2"), "{}", note.text);
    assert_eq!(state.codes.data.data().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_edit_and_save_new_version() {
    let backend = FakeBackend::new();
    let code = backend.seed_code("train.py", &["print(1)"]);
    let mut engine = Engine::new(
        backend.clone(),
        Settings::default(),
        Route::CodeDetail { id: code.id },
    );
    settle(&mut engine).await;
    assert_eq!(
        engine.state.code_detail.selection.content.text(),
        "print(1)"
    );

    press(&mut engine, InputKey::Char('e'));
    assert_eq!(engine.state.ui_mode, UiMode::EditContent);
    press(&mut engine, InputKey::End);
    type_text(&mut engine, "  # tuned");
    press(&mut engine, InputKey::CharCtrl('s'));
    settle(&mut engine).await;

    let saved = &backend.codes()[0];
    assert_eq!(saved.versions.len(), 2);
    let latest = saved.latest_version().expect("new version");
    assert_eq!(latest.content, "print(1)  # tuned");

    let detail = &engine.state.code_detail;
    assert_eq!(detail.selection.version_id, Some(latest.id));
    assert_eq!(detail.selection.content.text(), "print(1)  # tuned");
    assert!(!detail.saving);
    assert_eq!(engine.state.ui_mode, UiMode::Normal);
}

#[tokio::test]
async fn test_parse_attaches_result_to_selected_version() {
    let backend = FakeBackend::new();
    let code = backend.seed_code("train.py", &["import torch"]);
    let mut engine = Engine::new(
        backend.clone(),
        Settings::default(),
        Route::CodeDetail { id: code.id },
    );
    settle(&mut engine).await;

    press(&mut engine, InputKey::Char('p'));
    settle(&mut engine).await;

    let version_id = code.versions[0].id;
    assert_eq!(
        backend.count_requests(&format!("POST /parsing/code-versions/{version_id}")),
        1
    );
    let selection = &engine.state.code_detail.selection;
    assert_eq!(selection.version_id, Some(version_id));
    assert!(selection.parsing_result_id.is_some());
    assert!(selection.parsing_result_version_id.is_some());
}

#[tokio::test]
async fn test_backend_offline_shows_error() {
    let backend = FakeBackend::new();
    backend.set_offline(true);
    let mut engine = Engine::new(backend, Settings::default(), Route::CodeList);
    settle(&mut engine).await;

    let data = &engine.state.codes.data;
    assert!(data.data().is_none());
    assert!(data.error().is_some());
    assert!(!data.is_loading());
}
