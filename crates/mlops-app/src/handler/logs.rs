//! Pod log view handlers

use std::path::PathBuf;

use mlops_core::prelude::*;

use crate::input_key::InputKey;
use crate::log_stream::{download_file_name, StreamStatus};
use crate::route::Route;
use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

/// Rows moved by PageUp/PageDown
const PAGE: usize = 20;

pub fn handle_line(state: &mut AppState, generation: u64, line: String) -> UpdateResult {
    state.logs.push_line(generation, line);
    UpdateResult::none()
}

pub fn handle_ended(
    state: &mut AppState,
    generation: u64,
    result: std::result::Result<(), String>,
) -> UpdateResult {
    if state.logs.finish(generation, result) {
        if let StreamStatus::Failed(message) = state.logs.status() {
            state.notifications.error(message.clone());
        }
    }
    UpdateResult::none()
}

/// Discard the buffer and reconnect with the same key
pub fn restart(state: &mut AppState) -> Option<UpdateAction> {
    if !matches!(state.route, Route::PodLogs { .. }) {
        return None;
    }
    let (request, generation) = state.logs.restart()?;
    info!("Restarting log stream for {}", request.pod);
    Some(UpdateAction::StartLogStream {
        request,
        generation,
    })
}

pub fn toggle_follow(state: &mut AppState) -> Option<UpdateAction> {
    let (request, generation) = state.logs.toggle_follow()?;
    Some(UpdateAction::StartLogStream {
        request,
        generation,
    })
}

pub fn download(state: &mut AppState) -> Option<UpdateAction> {
    let pod = state.logs.request()?.pod.clone();
    if state.logs.lines().is_empty() {
        state.notifications.info("No logs to download.");
        return None;
    }
    Some(UpdateAction::DownloadLogs {
        dir: state.settings.logs.download_dir.clone(),
        pod,
        lines: state.logs.lines().to_vec(),
    })
}

pub fn handle_downloaded(
    state: &mut AppState,
    result: std::result::Result<PathBuf, String>,
) -> UpdateResult {
    match result {
        Ok(path) => state
            .notifications
            .success(format!("Saved logs to {}", path.display())),
        Err(e) => {
            let name = state
                .logs
                .request()
                .map(|r| download_file_name(&r.pod))
                .unwrap_or_default();
            state
                .notifications
                .error(format!("Failed to save {name}: {e}"));
        }
    }
    UpdateResult::none()
}

pub fn handle_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    let visible_rows = state.logs.visible_rows;
    match key {
        InputKey::Char('f') => UpdateResult::maybe_action(toggle_follow(state)),
        InputKey::Char('r') => UpdateResult::maybe_action(restart(state)),
        InputKey::Char('s') => UpdateResult::maybe_action(download(state)),
        InputKey::Up | InputKey::Char('k') => {
            let offset = state.logs.offset(visible_rows);
            state.logs.scroll = offset;
            state.logs.scroll_up(1);
            UpdateResult::none()
        }
        InputKey::Down | InputKey::Char('j') => {
            state.logs.scroll_down(1, visible_rows);
            UpdateResult::none()
        }
        InputKey::PageUp => {
            let offset = state.logs.offset(visible_rows);
            state.logs.scroll = offset;
            state.logs.scroll_up(PAGE);
            UpdateResult::none()
        }
        InputKey::PageDown => {
            state.logs.scroll_down(PAGE, visible_rows);
            UpdateResult::none()
        }
        InputKey::End | InputKey::Char('G') => {
            state.logs.auto_scroll = true;
            UpdateResult::none()
        }
        InputKey::Home | InputKey::Char('g') => {
            state.logs.scroll = 0;
            state.logs.auto_scroll = false;
            UpdateResult::none()
        }
        _ => UpdateResult::none(),
    }
}
