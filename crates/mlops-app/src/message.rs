//! Message types for the application (TEA pattern)
//!
//! Results coming back from background tasks carry `Result<_, String>`: the
//! error has already been rendered for display by the action that produced it.

use std::path::PathBuf;

use serde_json::Value;

use mlops_core::{
    Cluster, ClusterDetails, Code, CodeVersion, ParsingResult, ParsingResultVersion,
    ResourceList, Task, TaskAccepted,
};

use crate::input_key::InputKey;
use crate::remote::RequestTicket;
use crate::route::Route;
use crate::selection::BulkDeleteOutcome;

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from the terminal
    Key(InputKey),
    /// Periodic tick (expiry, debounce, refresh timers)
    Tick,
    /// Request to quit
    Quit,

    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────
    /// Go to a route, remembering the current one
    Navigate(Route),
    /// Go to a route without touching history
    Replace(Route),
    Back,
    /// Re-fetch everything the current route shows
    Refresh,

    // ─────────────────────────────────────────────────────────
    // Fetch Results
    // ─────────────────────────────────────────────────────────
    CodesLoaded {
        ticket: RequestTicket,
        result: Result<Vec<Code>, String>,
    },
    CodeLoaded {
        ticket: RequestTicket,
        result: Result<Code, String>,
    },
    ClustersLoaded {
        ticket: RequestTicket,
        result: Result<Vec<Cluster>, String>,
    },
    ClusterDetailsLoaded {
        ticket: RequestTicket,
        result: Result<ClusterDetails, String>,
    },
    ResourcesLoaded {
        ticket: RequestTicket,
        result: Result<ResourceList, String>,
    },
    ResourceLoaded {
        ticket: RequestTicket,
        result: Result<Value, String>,
    },

    // ─────────────────────────────────────────────────────────
    // Code Tool
    // ─────────────────────────────────────────────────────────
    CodeCreated {
        result: Result<Code, String>,
    },
    /// Selected codes are deleted after the user confirmed
    ConfirmDeleteCodes,
    CodesDeleted {
        outcome: BulkDeleteOutcome,
    },
    CodeVersionSaved {
        code_id: i64,
        result: Result<CodeVersion, String>,
    },
    VersionParsed {
        code_id: i64,
        version_id: i64,
        result: Result<ParsingResult, String>,
    },
    ParsingResultVersionSaved {
        code_id: i64,
        version_id: i64,
        parsing_result_id: i64,
        result: Result<ParsingResultVersion, String>,
    },
    CodeRenamed {
        code_id: i64,
        result: Result<Code, String>,
    },

    // ─────────────────────────────────────────────────────────
    // Cluster Tool
    // ─────────────────────────────────────────────────────────
    /// Response to `POST /clusters`, tagged with the submission it answers
    ClusterCreateAccepted {
        submission: u64,
        result: Result<TaskAccepted, String>,
    },
    /// Status report for a polled task (terminal or not)
    TaskStatusReceived {
        task_id: String,
        task: Task,
    },
    /// A single poll failed; polling continues
    TaskPollFailed {
        task_id: String,
        error: String,
    },
    /// Polling stopped after too many consecutive failures
    TaskPollGaveUp {
        task_id: String,
        error: String,
    },
    ConfirmDeleteCluster {
        name: String,
    },
    ClusterDeleted {
        name: String,
        result: Result<(), String>,
    },
    /// Dismiss the confirmation dialog
    CloseDialog,

    // ─────────────────────────────────────────────────────────
    // Pod Logs
    // ─────────────────────────────────────────────────────────
    LogLine {
        generation: u64,
        line: String,
    },
    LogStreamEnded {
        generation: u64,
        result: Result<(), String>,
    },
    LogsDownloaded {
        result: Result<PathBuf, String>,
    },
}
