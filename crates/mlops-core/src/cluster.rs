//! # Cluster Domain Types
//!
//! Snapshots returned by the kind cluster backend: cluster names, aggregate
//! details, raw Kubernetes objects, and the status of background tasks.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Cluster ──────────────────────────────────────────────────────────────────

/// A kind cluster, identified by its unique name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub name: String,
}

/// `POST /clusters`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterCreateRequest {
    pub cluster_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_workers: Option<u32>,
    /// kind cluster configuration YAML
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
}

/// Response to an accepted background operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAccepted {
    #[serde(default)]
    pub message: String,
    pub task_id: String,
}

// ── ClusterDetails ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodSummary {
    pub running: u32,
    pub succeeded: u32,
    pub pending: u32,
    pub failed: u32,
}

impl PodSummary {
    pub fn total(&self) -> u32 {
        self.running + self.succeeded + self.pending + self.failed
    }

    /// `2 Running, 0 Succeeded, 1 Pending, 0 Failed`
    pub fn describe(&self) -> String {
        format!(
            "{} Running, {} Succeeded, {} Pending, {} Failed",
            self.running, self.succeeded, self.pending, self.failed
        )
    }
}

/// Aggregate counts for one cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterDetails {
    pub node_count: u32,
    pub pod_summary: PodSummary,
    pub service_count: u32,
    pub deployment_count: u32,
}

// ── Task ─────────────────────────────────────────────────────────────────────

/// Lifecycle of a backend task.
///
/// `Queued` and `InProgress` are transient; `Completed` and `Failed` are
/// terminal and never change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskStatus::Queued => "queued",
            TaskStatus::InProgress => "in progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// `GET /tasks/{taskId}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub status: TaskStatus,
    #[serde(default)]
    pub result: Option<String>,
}

impl Task {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The `result` message, or a generic one when the backend sent none
    pub fn result_message(&self) -> String {
        self.result
            .clone()
            .unwrap_or_else(|| format!("Task {}", self.status))
    }
}

// ── Resources ────────────────────────────────────────────────────────────────

/// Kubernetes resource collections the backend proxies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Nodes,
    Pods,
    Services,
    Deployments,
    Namespaces,
}

impl ResourceKind {
    /// Kinds shown in the cluster navigation menu, in menu order
    pub const NAVIGABLE: [ResourceKind; 4] = [
        ResourceKind::Nodes,
        ResourceKind::Pods,
        ResourceKind::Services,
        ResourceKind::Deployments,
    ];

    /// Path segment used by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Nodes => "nodes",
            ResourceKind::Pods => "pods",
            ResourceKind::Services => "services",
            ResourceKind::Deployments => "deployments",
            ResourceKind::Namespaces => "namespaces",
        }
    }

    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "nodes" => Some(ResourceKind::Nodes),
            "pods" => Some(ResourceKind::Pods),
            "services" => Some(ResourceKind::Services),
            "deployments" => Some(ResourceKind::Deployments),
            "namespaces" => Some(ResourceKind::Namespaces),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ResourceKind::Nodes => "Nodes",
            ResourceKind::Pods => "Pods",
            ResourceKind::Services => "Services",
            ResourceKind::Deployments => "Deployments",
            ResourceKind::Namespaces => "Namespaces",
        }
    }

    /// Whether the list endpoint honours `?all_namespaces=`
    pub fn supports_all_namespaces(&self) -> bool {
        matches!(self, ResourceKind::Pods)
    }

    /// Whether a single object of this kind is namespaced
    pub fn is_namespaced(&self) -> bool {
        !matches!(self, ResourceKind::Nodes | ResourceKind::Namespaces)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `kubectl get -o json` list, items kept as raw objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceList {
    #[serde(default, rename = "apiVersion", skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default)]
    pub items: Vec<Value>,
}

/// Sections consulted, in order, when building table columns and cells
const SECTIONS: [&str; 3] = ["metadata", "spec", "status"];

impl ResourceList {
    /// Column keys: union of the first item's metadata, spec and status keys.
    ///
    /// Earlier sections win when a key appears in more than one.
    pub fn columns(&self) -> Vec<String> {
        let Some(first) = self.items.first() else {
            return Vec::new();
        };
        let mut columns: Vec<String> = Vec::new();
        for section in SECTIONS {
            if let Some(obj) = first.get(section).and_then(Value::as_object) {
                for key in obj.keys() {
                    if !columns.iter().any(|c| c == key) {
                        columns.push(key.clone());
                    }
                }
            }
        }
        columns
    }

    /// Cell text for `key`: first present value among metadata, spec and
    /// status. Objects and arrays are JSON-encoded; missing is `-`.
    pub fn cell(item: &Value, key: &str) -> String {
        SECTIONS
            .iter()
            .filter_map(|section| item.get(section).and_then(|s| s.get(key)))
            .find(|v| !v.is_null())
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_else(|| "-".to_string())
    }

    pub fn item_name(item: &Value) -> Option<&str> {
        item.get("metadata")?.get("name")?.as_str()
    }

    pub fn item_namespace(item: &Value) -> Option<&str> {
        item.get("metadata")?.get("namespace")?.as_str()
    }
}

/// `creation_timestamp` -> `Creation Timestamp`
pub fn humanize_key(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_status_terminality() {
        assert!(!TaskStatus::Queued.is_terminal());
        assert!(!TaskStatus::InProgress.is_terminal());
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
    }

    #[test]
    fn test_task_deserializes_snake_case() {
        let task: Task =
            serde_json::from_value(json!({"status": "in_progress", "result": null})).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.result, None);
        assert_eq!(task.result_message(), "Task in progress");
    }

    #[test]
    fn test_create_request_omits_unset_fields() {
        let req = ClusterCreateRequest {
            cluster_name: "dev".into(),
            num_workers: Some(2),
            ..Default::default()
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, json!({"cluster_name": "dev", "num_workers": 2}));
    }

    #[test]
    fn test_pod_summary_describe() {
        let summary = PodSummary {
            running: 3,
            succeeded: 1,
            pending: 0,
            failed: 2,
        };
        assert_eq!(
            summary.describe(),
            "3 Running, 1 Succeeded, 0 Pending, 2 Failed"
        );
        assert_eq!(summary.total(), 6);
    }

    #[test]
    fn test_resource_kind_parse_matches_as_str() {
        for kind in ResourceKind::NAVIGABLE {
            assert_eq!(ResourceKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ResourceKind::parse("secrets"), None);
    }

    #[test]
    fn test_columns_union_without_duplicates() {
        let list = ResourceList {
            api_version: None,
            items: vec![json!({
                "metadata": {"name": "web", "namespace": "default"},
                "spec": {"nodeName": "n1", "name": "dup"},
                "status": {"phase": "Running"}
            })],
        };
        let columns = list.columns();
        assert_eq!(columns.len(), 4);
        assert_eq!(columns.iter().filter(|c| *c == "name").count(), 1);
        assert!(columns.contains(&"phase".to_string()));
    }

    #[test]
    fn test_columns_empty_list() {
        assert!(ResourceList::default().columns().is_empty());
    }

    #[test]
    fn test_cell_lookup_order_and_fallback() {
        let item = json!({
            "metadata": {"name": "web", "labels": {"app": "web"}},
            "spec": {"name": "shadowed", "replicas": 2},
            "status": {}
        });
        assert_eq!(ResourceList::cell(&item, "name"), "web");
        assert_eq!(ResourceList::cell(&item, "replicas"), "2");
        assert_eq!(ResourceList::cell(&item, "labels"), r#"{"app":"web"}"#);
        assert_eq!(ResourceList::cell(&item, "missing"), "-");
    }

    #[test]
    fn test_item_name_and_namespace() {
        let item = json!({"metadata": {"name": "web", "namespace": "prod"}});
        assert_eq!(ResourceList::item_name(&item), Some("web"));
        assert_eq!(ResourceList::item_namespace(&item), Some("prod"));
        assert_eq!(ResourceList::item_name(&json!({})), None);
    }

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("creation_timestamp"), "Creation Timestamp");
        assert_eq!(humanize_key("nodeName"), "NodeName");
        assert_eq!(humanize_key("name"), "Name");
    }
}
