//! Key event handlers for different UI modes
//!
//! Text inputs own the keyboard while focused, so they are checked before
//! the global shortcuts.

use std::time::Instant;

use crate::input_key::InputKey;
use crate::message::Message;
use crate::route::Route;
use crate::state::{AppState, UiMode};

use super::{clusters, codes, logs, UpdateResult};

/// Route a key press to the handler for the current mode and route
pub fn handle_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    // Force quit from anywhere
    if key == InputKey::CharCtrl('c') {
        return UpdateResult::message(Message::Quit);
    }
    match state.ui_mode {
        UiMode::ConfirmDialog => handle_key_confirm_dialog(state, key),
        UiMode::CreateCluster => clusters::handle_create_modal_key(state, key),
        UiMode::Search => handle_key_search(state, key),
        UiMode::EditContent => handle_key_edit_content(state, key),
        UiMode::EditJson => handle_key_edit_json(state, key),
        UiMode::Rename => handle_key_rename(state, key),
        UiMode::Diff => handle_key_diff(state, key),
        UiMode::Normal => handle_key_normal(state, key),
    }
}

fn handle_key_confirm_dialog(state: &mut AppState, key: InputKey) -> UpdateResult {
    let Some(dialog) = state.confirm_dialog.as_mut() else {
        state.ui_mode = UiMode::Normal;
        return UpdateResult::none();
    };
    match key {
        InputKey::Left | InputKey::BackTab | InputKey::Char('h') => {
            dialog.select_prev();
            UpdateResult::none()
        }
        InputKey::Right | InputKey::Tab | InputKey::Char('l') => {
            dialog.select_next();
            UpdateResult::none()
        }
        InputKey::Enter => match dialog.selected_message() {
            Some(msg) => UpdateResult::message(msg),
            None => UpdateResult::message(Message::CloseDialog),
        },
        InputKey::Esc | InputKey::Char('n' | 'N') => UpdateResult::message(Message::CloseDialog),
        _ => UpdateResult::none(),
    }
}

fn handle_key_search(state: &mut AppState, key: InputKey) -> UpdateResult {
    match key {
        // Keep the query, leave input mode
        InputKey::Enter => state.ui_mode = UiMode::Normal,
        InputKey::Esc => {
            state.codes.search.clear();
            state.ui_mode = UiMode::Normal;
        }
        InputKey::CharCtrl('u') => state.codes.search.clear(),
        other => {
            state.codes.search.handle_key(other);
        }
    }
    state.codes.clamp_cursor();
    UpdateResult::none()
}

fn handle_key_edit_content(state: &mut AppState, key: InputKey) -> UpdateResult {
    if key.is_save() {
        return codes::save_code_version(state);
    }
    if key == InputKey::Esc {
        state.ui_mode = UiMode::Normal;
        return UpdateResult::none();
    }
    if state.code_detail.selection.content.handle_key(key) {
        codes::note_content_edit(state, Instant::now());
    }
    UpdateResult::none()
}

fn handle_key_edit_json(state: &mut AppState, key: InputKey) -> UpdateResult {
    if key.is_save() {
        return codes::save_parsing_result_version(state);
    }
    if key == InputKey::Esc {
        codes::cancel_json_edit(state);
        return UpdateResult::none();
    }
    if state.code_detail.selection.json.handle_key(key) {
        state.code_detail.json_error = None;
    }
    UpdateResult::none()
}

fn handle_key_rename(state: &mut AppState, key: InputKey) -> UpdateResult {
    match key {
        InputKey::Enter => codes::submit_rename(state),
        InputKey::Esc => {
            state.ui_mode = UiMode::Normal;
            UpdateResult::none()
        }
        other => {
            state.code_detail.rename.handle_key(other);
            UpdateResult::none()
        }
    }
}

fn handle_key_diff(state: &mut AppState, key: InputKey) -> UpdateResult {
    if matches!(key, InputKey::Esc | InputKey::Char('q')) {
        codes::close_diff(state);
        return UpdateResult::none();
    }
    let len = state.code_detail.code().map_or(0, |c| c.versions.len());
    let Some(diff) = state.code_detail.diff.as_mut() else {
        state.ui_mode = UiMode::Normal;
        return UpdateResult::none();
    };
    match key {
        InputKey::Char('o') => diff.cycle_old(len, true),
        InputKey::Char('O') => diff.cycle_old(len, false),
        InputKey::Char('n') => diff.cycle_new(len, true),
        InputKey::Char('N') => diff.cycle_new(len, false),
        InputKey::Up | InputKey::Char('k') => diff.scroll = diff.scroll.saturating_sub(1),
        InputKey::Down | InputKey::Char('j') => diff.scroll += 1,
        InputKey::PageUp => diff.scroll = diff.scroll.saturating_sub(20),
        InputKey::PageDown => diff.scroll += 20,
        _ => {}
    }
    UpdateResult::none()
}

/// Normal mode: form routes first, then global shortcuts, then the route
fn handle_key_normal(state: &mut AppState, key: InputKey) -> UpdateResult {
    if state.route == Route::CodeCreate {
        return handle_key_code_create(state, key);
    }

    match key {
        InputKey::Char('q') => return UpdateResult::message(Message::Quit),
        InputKey::Esc => return UpdateResult::message(Message::Back),
        InputKey::Char('1') => return UpdateResult::message(Message::Navigate(Route::CodeList)),
        InputKey::Char('2') => {
            return UpdateResult::message(Message::Navigate(Route::ClusterList))
        }
        InputKey::Char('r') if !matches!(state.route, Route::PodLogs { .. }) => {
            return UpdateResult::message(Message::Refresh)
        }
        _ => {}
    }

    match state.route.clone() {
        Route::CodeList => handle_key_code_list(state, key),
        Route::CodeCreate => UpdateResult::none(),
        Route::CodeDetail { .. } => handle_key_code_detail(state, key),
        Route::ClusterList => handle_key_cluster_list(state, key),
        Route::ClusterDetail { .. } => handle_key_cluster_nav(state, key),
        Route::ResourceList { .. } => handle_key_resource_list(state, key),
        Route::ResourceDetail { .. } => handle_key_resource_detail(state, key),
        Route::PodLogs { .. } => match key {
            InputKey::Tab | InputKey::BackTab => handle_key_cluster_nav(state, key),
            other => logs::handle_key(state, other),
        },
    }
}

fn handle_key_code_create(state: &mut AppState, key: InputKey) -> UpdateResult {
    match key {
        InputKey::Esc => UpdateResult::message(Message::Back),
        k if k.is_save() => codes::submit_new_code(state),
        other => {
            if !state.code_create.submitting {
                state.code_create.handle_key(other);
            }
            UpdateResult::none()
        }
    }
}

fn move_cursor(cursor: &mut usize, len: usize, key: InputKey) -> bool {
    match key {
        InputKey::Up | InputKey::Char('k') => *cursor = cursor.saturating_sub(1),
        InputKey::Down | InputKey::Char('j') => {
            *cursor = (*cursor + 1).min(len.saturating_sub(1))
        }
        InputKey::Home | InputKey::Char('g') => *cursor = 0,
        InputKey::End | InputKey::Char('G') => *cursor = len.saturating_sub(1),
        _ => return false,
    }
    true
}

fn handle_key_code_list(state: &mut AppState, key: InputKey) -> UpdateResult {
    let len = state.codes.visible().len();
    if move_cursor(&mut state.codes.cursor, len, key) {
        return UpdateResult::none();
    }
    match key {
        InputKey::Char(' ') => {
            codes::toggle_current(state);
            UpdateResult::none()
        }
        InputKey::Char('/') => {
            state.ui_mode = UiMode::Search;
            UpdateResult::none()
        }
        InputKey::Char('n') => UpdateResult::message(Message::Navigate(Route::CodeCreate)),
        InputKey::Enter => match state.codes.current().map(|c| c.id) {
            Some(id) => UpdateResult::message(Message::Navigate(Route::CodeDetail { id })),
            None => UpdateResult::none(),
        },
        InputKey::Char('d') | InputKey::Delete => codes::request_bulk_delete(state),
        _ => UpdateResult::none(),
    }
}

fn handle_key_code_detail(state: &mut AppState, key: InputKey) -> UpdateResult {
    if state.code_detail.code().is_none() {
        return UpdateResult::none();
    }
    match key {
        InputKey::Char('[') => codes::step_version(state, -1),
        InputKey::Char(']') => codes::step_version(state, 1),
        InputKey::Char('{') => codes::step_parsing_result(state, -1),
        InputKey::Char('}') => codes::step_parsing_result(state, 1),
        InputKey::Char('<') => codes::step_parsing_result_version(state, -1),
        InputKey::Char('>') => codes::step_parsing_result_version(state, 1),
        InputKey::Char('e') => state.ui_mode = UiMode::EditContent,
        InputKey::Char('E') => codes::start_json_edit(state),
        InputKey::Char('R') => codes::start_rename(state),
        InputKey::Char('D') => codes::open_diff(state),
        InputKey::Char('p') => return codes::parse_version(state),
        k if k.is_save() => return codes::save_code_version(state),
        _ => {}
    }
    UpdateResult::none()
}

fn handle_key_cluster_list(state: &mut AppState, key: InputKey) -> UpdateResult {
    let len = state.clusters.data.data().map_or(0, Vec::len);
    if move_cursor(&mut state.clusters.cursor, len, key) {
        return UpdateResult::none();
    }
    match key {
        InputKey::Char('c') => {
            clusters::open_create_modal(state);
            UpdateResult::none()
        }
        InputKey::Char('d') | InputKey::Delete => {
            clusters::request_delete_cluster(state);
            UpdateResult::none()
        }
        InputKey::Enter => match state.clusters.current() {
            Some(cluster) => UpdateResult::message(Message::Navigate(Route::ClusterDetail {
                cluster: cluster.name.clone(),
            })),
            None => UpdateResult::none(),
        },
        _ => handle_key_cluster_nav(state, key),
    }
}

/// Tab/BackTab walk the cluster-scoped menu
fn handle_key_cluster_nav(state: &mut AppState, key: InputKey) -> UpdateResult {
    let forward = match key {
        InputKey::Tab => true,
        InputKey::BackTab => false,
        _ => return UpdateResult::none(),
    };
    match clusters::cycle_nav(state, forward) {
        Some(route) => UpdateResult::message(Message::Navigate(route)),
        None => UpdateResult::none(),
    }
}

fn handle_key_resource_list(state: &mut AppState, key: InputKey) -> UpdateResult {
    let len = state.resources.data.data().map_or(0, |l| l.items.len());
    if move_cursor(&mut state.resources.cursor, len, key) {
        return UpdateResult::none();
    }
    match key {
        InputKey::Char('a') => clusters::toggle_all_namespaces(state),
        InputKey::Char('l') => match clusters::open_current_pod_logs(state) {
            Some(route) => UpdateResult::message(Message::Navigate(route)),
            None => UpdateResult::none(),
        },
        InputKey::Enter => match clusters::open_current_resource(state) {
            Some(route) => UpdateResult::message(Message::Navigate(route)),
            None => UpdateResult::none(),
        },
        _ => handle_key_cluster_nav(state, key),
    }
}

fn handle_key_resource_detail(state: &mut AppState, key: InputKey) -> UpdateResult {
    match key {
        InputKey::Char('t') | InputKey::Right => clusters::cycle_detail_tab(state, true),
        InputKey::Left => clusters::cycle_detail_tab(state, false),
        InputKey::Up | InputKey::Char('k') => {
            state.resource_detail.scroll = state.resource_detail.scroll.saturating_sub(1);
            UpdateResult::none()
        }
        InputKey::Down | InputKey::Char('j') => {
            state.resource_detail.scroll += 1;
            UpdateResult::none()
        }
        InputKey::PageUp => {
            state.resource_detail.scroll = state.resource_detail.scroll.saturating_sub(20);
            UpdateResult::none()
        }
        InputKey::PageDown => {
            state.resource_detail.scroll += 20;
            UpdateResult::none()
        }
        InputKey::Home | InputKey::Char('g') => {
            state.resource_detail.scroll = 0;
            UpdateResult::none()
        }
        _ => handle_key_cluster_nav(state, key),
    }
}

