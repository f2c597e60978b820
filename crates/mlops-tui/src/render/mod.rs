//! Main render/view function (View in TEA pattern)

use ratatui::{style::Style, widgets::Block, Frame};

use mlops_app::route::Route;
use mlops_app::state::{AppState, UiMode};

use crate::layout;
use crate::theme::palette;
use crate::widgets;

#[cfg(test)]
mod tests;

type Hints = &'static [(&'static str, &'static str)];

/// Key hints for the status bar
fn hints(route: &Route, mode: UiMode) -> Hints {
    match mode {
        UiMode::Search => &[("Enter", "Apply"), ("Esc", "Clear"), ("Ctrl+U", "Reset")],
        UiMode::EditContent => &[("Ctrl+S", "Save as new version"), ("Esc", "Done")],
        UiMode::EditJson => &[("Ctrl+S", "Save result version"), ("Esc", "Cancel")],
        UiMode::Rename => &[("Enter", "Rename"), ("Esc", "Cancel")],
        UiMode::Diff => &[("o/O", "Old"), ("n/N", "New"), ("j/k", "Scroll"), ("Esc", "Close")],
        UiMode::CreateCluster => &[("Tab", "Next field"), ("Ctrl+S", "Create"), ("Esc", "Close")],
        UiMode::ConfirmDialog => &[("←/→", "Choose"), ("Enter", "Confirm"), ("Esc", "Cancel")],
        UiMode::Normal => match route {
            Route::CodeList => &[
                ("/", "Search"),
                ("Space", "Select"),
                ("n", "New"),
                ("Enter", "Open"),
                ("d", "Delete"),
                ("2", "Clusters"),
                ("q", "Quit"),
            ],
            Route::CodeCreate => &[("Tab", "Next field"), ("Ctrl+S", "Create"), ("Esc", "Back")],
            Route::CodeDetail { .. } => &[
                ("[ ]", "Version"),
                ("{ }", "Result"),
                ("< >", "Result ver"),
                ("e", "Edit"),
                ("E", "JSON"),
                ("p", "Parse"),
                ("R", "Rename"),
                ("D", "Diff"),
                ("Esc", "Back"),
            ],
            Route::ClusterList => &[
                ("Enter", "Open"),
                ("c", "Create"),
                ("d", "Delete"),
                ("r", "Refresh"),
                ("1", "Codes"),
                ("q", "Quit"),
            ],
            Route::ClusterDetail { .. } => &[("Tab", "Next view"), ("r", "Refresh"), ("Esc", "Back")],
            Route::ResourceList { .. } => &[
                ("Enter", "Details"),
                ("l", "Logs"),
                ("a", "Namespaces"),
                ("Tab", "Next view"),
                ("Esc", "Back"),
            ],
            Route::ResourceDetail { .. } => &[("t", "Tab"), ("j/k", "Scroll"), ("Esc", "Back")],
            Route::PodLogs { .. } => &[
                ("f", "Follow"),
                ("r", "Restart"),
                ("s", "Save"),
                ("j/k", "Scroll"),
                ("Esc", "Back"),
            ],
        },
    }
}

/// Render the complete UI (View function in TEA)
///
/// Only writes back viewport sizes the key handlers need (log rows).
pub fn view(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette::DEEPEST_BG)),
        area,
    );

    let areas = layout::create(area, state.route.is_cluster_tool());
    frame.render_widget(widgets::MainHeader::new(&state.route), areas.header);

    let body = areas.body;
    match &state.route {
        Route::CodeList => frame.render_widget(
            widgets::CodeList::new(&state.codes).searching(state.ui_mode == UiMode::Search),
            body,
        ),
        Route::CodeCreate => frame.render_widget(widgets::CodeCreate::new(&state.code_create), body),
        Route::CodeDetail { .. } => frame.render_widget(
            widgets::CodeDetail::new(&state.code_detail, state.ui_mode),
            body,
        ),
        Route::ClusterList => frame.render_widget(widgets::ClusterList::new(&state.clusters), body),
        Route::ClusterDetail { cluster } => frame.render_widget(
            widgets::ClusterOverview::new(cluster, &state.cluster_details),
            body,
        ),
        Route::ResourceList { kind, .. } => frame.render_widget(
            widgets::ResourceTable::new(*kind, &state.resources),
            body,
        ),
        Route::ResourceDetail { kind, name, .. } => frame.render_widget(
            widgets::ResourceDetail::new(*kind, name, &state.resource_detail),
            body,
        ),
        Route::PodLogs { pod, .. } => {
            state.logs.visible_rows = widgets::log_rows(body);
            frame.render_widget(widgets::LogView::new(pod, &state.logs), body);
        }
    }

    let hints = hints(&state.route, state.ui_mode);
    frame.render_widget(
        widgets::StatusBar::new(&state.notifications, hints),
        areas.status,
    );

    // Overlays
    match state.ui_mode {
        UiMode::ConfirmDialog => {
            if let Some(dialog) = &state.confirm_dialog {
                frame.render_widget(widgets::ConfirmDialog::new(dialog), area);
            }
        }
        UiMode::CreateCluster => {
            if let Some(modal) = &state.clusters.create {
                frame.render_widget(widgets::CreateClusterView::new(modal), area);
            }
        }
        UiMode::Diff => {
            if let (Some(code), Some(diff)) = (state.code_detail.code(), &state.code_detail.diff) {
                frame.render_widget(widgets::DiffModal::new(code, diff), area);
            }
        }
        UiMode::Normal
        | UiMode::Search
        | UiMode::EditContent
        | UiMode::EditJson
        | UiMode::Rename => {}
    }
}
