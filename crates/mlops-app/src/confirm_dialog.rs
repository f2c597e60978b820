//! Confirm dialog state.
//!
//! Data model for confirmation dialogs. The rendering widget lives in
//! mlops-tui.

use crate::message::Message;

#[derive(Debug, Clone)]
pub struct ConfirmDialogState {
    pub title: String,
    pub message: String,
    pub options: Vec<(String, Message)>,
    pub selected: usize,
}

impl ConfirmDialogState {
    /// Create a generic confirmation dialog
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        options: Vec<(&str, Message)>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            options: options
                .into_iter()
                .map(|(label, msg)| (label.to_string(), msg))
                .collect(),
            selected: 0,
        }
    }

    /// Bulk code deletion
    pub fn delete_codes(count: usize) -> Self {
        Self::new(
            "Delete codes",
            format!("Are you sure you want to delete {count} selected codes?"),
            vec![
                ("Delete", Message::ConfirmDeleteCodes),
                ("Cancel", Message::CloseDialog),
            ],
        )
    }

    pub fn delete_cluster(name: &str) -> Self {
        Self::new(
            "Delete cluster",
            format!(
                "Are you sure you want to delete cluster '{name}'? This action cannot be undone."
            ),
            vec![
                (
                    "Delete",
                    Message::ConfirmDeleteCluster {
                        name: name.to_string(),
                    },
                ),
                ("Cancel", Message::CloseDialog),
            ],
        )
    }

    pub fn select_next(&mut self) {
        if !self.options.is_empty() {
            self.selected = (self.selected + 1) % self.options.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.options.is_empty() {
            self.selected = (self.selected + self.options.len() - 1) % self.options.len();
        }
    }

    /// Message bound to the highlighted option
    pub fn selected_message(&self) -> Option<Message> {
        self.options.get(self.selected).map(|(_, msg)| msg.clone())
    }
}
