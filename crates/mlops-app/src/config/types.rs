//! Configuration types for mlops-console
//!
//! Every section is optional in `config.toml`; missing keys fall back to the
//! defaults below.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub polling: PollingSettings,

    #[serde(default)]
    pub editor: EditorSettings,

    #[serde(default)]
    pub logs: LogSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

/// Backend endpoints
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiSettings {
    /// Base URL of the code / parsing service
    #[serde(default = "default_base_url")]
    pub code_base_url: String,

    /// Base URL of the cluster service
    #[serde(default = "default_base_url")]
    pub cluster_base_url: String,

    /// Per-request timeout in milliseconds (log streams are exempt)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            code_base_url: default_base_url(),
            cluster_base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ApiSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

/// Cluster creation task polling
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PollingSettings {
    #[serde(default = "default_task_interval_ms")]
    pub task_interval_ms: u64,

    /// Give up after this many failed polls in a row
    #[serde(default = "default_max_consecutive_errors")]
    pub max_consecutive_errors: u32,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            task_interval_ms: default_task_interval_ms(),
            max_consecutive_errors: default_max_consecutive_errors(),
        }
    }
}

impl PollingSettings {
    /// Poll interval, never below 100ms
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.task_interval_ms.max(100))
    }
}

fn default_task_interval_ms() -> u64 {
    3000
}

fn default_max_consecutive_errors() -> u32 {
    3
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EditorSettings {
    /// Quiet period before the editor height is recomputed
    #[serde(default = "default_height_debounce_ms")]
    pub height_debounce_ms: u64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            height_debounce_ms: default_height_debounce_ms(),
        }
    }
}

impl EditorSettings {
    pub fn height_debounce(&self) -> Duration {
        Duration::from_millis(self.height_debounce_ms)
    }
}

fn default_height_debounce_ms() -> u64 {
    100
}

/// Pod log viewer
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LogSettings {
    #[serde(default = "default_namespace")]
    pub default_namespace: String,

    #[serde(default = "default_true")]
    pub follow: bool,

    /// Only fetch the last N lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tail: Option<u32>,

    /// Where downloaded logs are written
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            default_namespace: default_namespace(),
            follow: true,
            tail: None,
            download_dir: default_download_dir(),
        }
    }
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_download_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UiSettings {
    /// How long a status bar notification stays visible
    #[serde(default = "default_notification_secs")]
    pub notification_secs: u64,

    /// Periodic refresh of cluster views; 0 disables
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            notification_secs: default_notification_secs(),
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

impl UiSettings {
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_interval_secs > 0).then(|| Duration::from_secs(self.refresh_interval_secs))
    }
}

fn default_notification_secs() -> u64 {
    4
}

fn default_refresh_interval_secs() -> u64 {
    30
}
