//! Widgets for each screen plus the shared text input and modal helpers

use ratatui::{text::Span, widgets::Paragraph, widgets::Wrap};

use mlops_app::remote::RemoteData;

use crate::theme::styles;

mod cluster_detail;
mod cluster_list;
mod code_create;
mod code_detail;
mod code_list;
mod confirm_dialog;
mod create_cluster_modal;
mod diff_modal;
mod header;
mod log_view;
pub mod modal_overlay;
mod resource_detail;
mod resource_list;
mod status_bar;
mod text_area;

pub use cluster_detail::ClusterOverview;
pub use cluster_list::ClusterList;
pub use code_create::CodeCreate;
pub use code_detail::CodeDetail;
pub use code_list::CodeList;
pub use confirm_dialog::ConfirmDialog;
pub use create_cluster_modal::CreateClusterView;
pub use diff_modal::DiffModal;
pub use header::MainHeader;
pub use log_view::{log_rows, LogView};
pub use resource_detail::ResourceDetail;
pub use resource_list::ResourceTable;
pub use status_bar::StatusBar;
pub use text_area::TextArea;

/// Loading or error text for a slot that has nothing to show yet.
///
/// Stale data wins over both: a refresh in flight or a failed refresh keeps
/// the previous result on screen.
pub(crate) fn remote_placeholder<T>(data: &RemoteData<T>, noun: &str) -> Option<Paragraph<'static>> {
    if data.data().is_some() {
        return None;
    }
    if data.is_loading() {
        return Some(Paragraph::new(Span::styled(
            format!("Loading {noun}…"),
            styles::text_muted(),
        )));
    }
    data.error().map(|error| {
        Paragraph::new(Span::styled(error.to_string(), styles::error())).wrap(Wrap { trim: true })
    })
}
