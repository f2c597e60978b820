//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `keys`: Key event handlers for UI modes and routes
//! - `navigation`: Route changes and the fetches they trigger
//! - `codes`: Code list, create and detail handlers
//! - `clusters`: Cluster list, create modal, task polling, resources
//! - `logs`: Pod log stream handlers

pub(crate) mod clusters;
pub(crate) mod codes;
pub(crate) mod keys;
pub(crate) mod logs;
pub(crate) mod navigation;
pub(crate) mod update;


use std::path::PathBuf;

use mlops_client::LogStreamRequest;
use mlops_core::{
    ClusterCreateRequest, NewCode, NewCodeVersion, NewParsingResult, NewParsingResultVersion,
    ResourceKind,
};

use crate::message::Message;
use crate::remote::RequestTicket;

// Re-export main entry point
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    // ─────────────────────────────────────────────────────────
    // Fetches (one in flight per slot; a new one aborts the old)
    // ─────────────────────────────────────────────────────────
    FetchCodes {
        ticket: RequestTicket,
    },
    FetchCode {
        ticket: RequestTicket,
        id: i64,
    },
    FetchClusters {
        ticket: RequestTicket,
    },
    FetchClusterDetails {
        ticket: RequestTicket,
        cluster: String,
    },
    FetchResources {
        ticket: RequestTicket,
        cluster: String,
        kind: ResourceKind,
        all_namespaces: Option<bool>,
    },
    FetchResource {
        ticket: RequestTicket,
        cluster: String,
        kind: ResourceKind,
        name: String,
        namespace: Option<String>,
    },

    // ─────────────────────────────────────────────────────────
    // Code Mutations
    // ─────────────────────────────────────────────────────────
    CreateCode(NewCode),
    /// Delete every id concurrently and report one aggregate outcome
    DeleteCodes {
        ids: Vec<i64>,
    },
    CreateCodeVersion {
        code_id: i64,
        body: NewCodeVersion,
    },
    ParseCodeVersion {
        code_id: i64,
        version_id: i64,
        body: NewParsingResult,
    },
    CreateParsingResultVersion {
        code_id: i64,
        version_id: i64,
        parsing_result_id: i64,
        body: NewParsingResultVersion,
    },
    RenameCode {
        code_id: i64,
        name: String,
    },

    // ─────────────────────────────────────────────────────────
    // Cluster Mutations and Task Polling
    // ─────────────────────────────────────────────────────────
    CreateCluster {
        submission: u64,
        body: ClusterCreateRequest,
    },
    /// Poll `GET /tasks/{id}` until the task is terminal
    PollTask {
        task_id: String,
    },
    StopTaskPolling,
    DeleteCluster {
        name: String,
    },

    // ─────────────────────────────────────────────────────────
    // Pod Logs
    // ─────────────────────────────────────────────────────────
    /// Open a log connection; replaces any live one
    StartLogStream {
        request: LogStreamRequest,
        generation: u64,
    },
    StopLogStream,
    DownloadLogs {
        dir: PathBuf,
        pod: String,
        lines: Vec<String>,
    },

    /// Several actions from one update (e.g. leaving the log view while
    /// entering another route)
    Batch(Vec<UpdateAction>),
}

impl UpdateAction {
    /// Combine optional actions; `None` when there is nothing to do
    pub fn batch(actions: Vec<UpdateAction>) -> Option<UpdateAction> {
        let mut actions: Vec<UpdateAction> = actions
            .into_iter()
            .flat_map(|a| match a {
                UpdateAction::Batch(inner) => inner,
                other => vec![other],
            })
            .collect();
        match actions.len() {
            0 => None,
            1 => actions.pop(),
            _ => Some(UpdateAction::Batch(actions)),
        }
    }

    /// Flattened view, for dispatch and assertions
    pub fn into_vec(self) -> Vec<UpdateAction> {
        match self {
            UpdateAction::Batch(actions) => actions,
            other => vec![other],
        }
    }
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }

    /// Action if there is one, otherwise nothing
    pub fn maybe_action(action: Option<UpdateAction>) -> Self {
        Self {
            message: None,
            action,
        }
    }

    pub fn actions(actions: Vec<UpdateAction>) -> Self {
        Self::maybe_action(UpdateAction::batch(actions))
    }
}
