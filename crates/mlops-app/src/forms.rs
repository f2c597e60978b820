//! Input forms: new code, new cluster, rename

use mlops_core::prelude::*;
use mlops_core::{ClusterCreateRequest, NewCode};

use crate::input_key::InputKey;
use crate::text_buffer::TextBuffer;

/// Initial content of a new code
pub const DEFAULT_CODE_CONTENT: &str = "# Enter your Python code here";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeCreateField {
    #[default]
    Name,
    Content,
}

impl CodeCreateField {
    pub fn next(self) -> Self {
        match self {
            CodeCreateField::Name => CodeCreateField::Content,
            CodeCreateField::Content => CodeCreateField::Name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CodeCreateForm {
    pub name: TextBuffer,
    pub content: TextBuffer,
    pub focus: CodeCreateField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl Default for CodeCreateForm {
    fn default() -> Self {
        Self {
            name: TextBuffer::single_line(""),
            content: TextBuffer::multi_line(DEFAULT_CODE_CONTENT),
            focus: CodeCreateField::Name,
            error: None,
            submitting: false,
        }
    }
}

impl CodeCreateForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a key to the focused field; Tab moves focus.
    pub fn handle_key(&mut self, key: InputKey) -> bool {
        match key {
            InputKey::Tab | InputKey::BackTab => {
                self.focus = self.focus.next();
                true
            }
            _ => match self.focus {
                CodeCreateField::Name => self.name.handle_key(key),
                CodeCreateField::Content => self.content.handle_key(key),
            },
        }
    }

    pub fn validate(&self) -> Result<NewCode> {
        let name = self.name.text().trim().to_string();
        if name.is_empty() {
            return Err(Error::validation("Name is required"));
        }
        Ok(NewCode {
            name,
            content: self.content.text(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClusterField {
    #[default]
    Name,
    NodeVersion,
    Workers,
    Config,
}

impl ClusterField {
    pub fn next(self) -> Self {
        match self {
            ClusterField::Name => ClusterField::NodeVersion,
            ClusterField::NodeVersion => ClusterField::Workers,
            ClusterField::Workers => ClusterField::Config,
            ClusterField::Config => ClusterField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ClusterField::Name => ClusterField::Config,
            ClusterField::NodeVersion => ClusterField::Name,
            ClusterField::Workers => ClusterField::NodeVersion,
            ClusterField::Config => ClusterField::Workers,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ClusterField::Name => "Cluster Name",
            ClusterField::NodeVersion => "Node Version (e.g., 1.27.3)",
            ClusterField::Workers => "Number of Worker Nodes",
            ClusterField::Config => "Kind Config YAML (Optional)",
        }
    }
}

/// Create-cluster modal form
#[derive(Debug, Clone)]
pub struct CreateClusterForm {
    pub name: TextBuffer,
    pub node_version: TextBuffer,
    pub workers: TextBuffer,
    pub config: TextBuffer,
    pub focus: ClusterField,
}

impl Default for CreateClusterForm {
    fn default() -> Self {
        Self {
            name: TextBuffer::single_line(""),
            node_version: TextBuffer::single_line(""),
            workers: TextBuffer::single_line(""),
            config: TextBuffer::multi_line(""),
            focus: ClusterField::Name,
        }
    }
}

impl CreateClusterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, field: ClusterField) -> &TextBuffer {
        match field {
            ClusterField::Name => &self.name,
            ClusterField::NodeVersion => &self.node_version,
            ClusterField::Workers => &self.workers,
            ClusterField::Config => &self.config,
        }
    }

    fn focused_mut(&mut self) -> &mut TextBuffer {
        match self.focus {
            ClusterField::Name => &mut self.name,
            ClusterField::NodeVersion => &mut self.node_version,
            ClusterField::Workers => &mut self.workers,
            ClusterField::Config => &mut self.config,
        }
    }

    pub fn handle_key(&mut self, key: InputKey) -> bool {
        match key {
            InputKey::Tab => {
                self.focus = self.focus.next();
                true
            }
            InputKey::BackTab => {
                self.focus = self.focus.prev();
                true
            }
            // Worker count only takes digits
            InputKey::Char(c) if self.focus == ClusterField::Workers && !c.is_ascii_digit() => {
                false
            }
            _ => self.focused_mut().handle_key(key),
        }
    }

    /// The submit button is enabled only with a cluster name
    pub fn can_submit(&self) -> bool {
        !self.name.text().trim().is_empty()
    }

    /// Build the request; empty optional fields are omitted.
    pub fn validate(&self) -> Result<ClusterCreateRequest> {
        let cluster_name = self.name.text().trim().to_string();
        if cluster_name.is_empty() {
            return Err(Error::validation("Cluster name is required"));
        }

        let workers = self.workers.text();
        let num_workers = match workers.trim() {
            "" => None,
            n => Some(n.parse::<u32>().map_err(|_| {
                Error::validation("Number of worker nodes must be a non-negative integer")
            })?),
        };

        let node_version = Some(self.node_version.text().trim().to_string())
            .filter(|v| !v.is_empty());
        let config = Some(self.config.text()).filter(|c| !c.trim().is_empty());

        Ok(ClusterCreateRequest {
            cluster_name,
            node_version,
            num_workers,
            config,
        })
    }
}
