//! Backend service traits
//!
//! The app layer only talks to these traits, so the HTTP implementation can be
//! swapped for the in-memory one in tests.

use tokio::sync::mpsc;

use mlops_core::prelude::*;
use mlops_core::{
    Cluster, ClusterCreateRequest, ClusterDetails, Code, CodeVersion, NewCode, NewCodeVersion,
    NewParsingResult, NewParsingResultVersion, ParsingResult, ParsingResultVersion, RenameCode,
    ResourceKind, ResourceList, Task, TaskAccepted,
};
use serde_json::Value;

/// Code-versioning backend
#[trait_variant::make(CodeBackend: Send)]
pub trait LocalCodeBackend {
    async fn list_codes(&self) -> Result<Vec<Code>>;

    async fn get_code(&self, id: i64) -> Result<Code>;

    async fn create_code(&self, body: NewCode) -> Result<Code>;

    async fn rename_code(&self, id: i64, body: RenameCode) -> Result<Code>;

    async fn delete_code(&self, id: i64) -> Result<()>;

    /// Append a version; the backend assigns the next version number
    async fn create_code_version(&self, code_id: i64, body: NewCodeVersion)
        -> Result<CodeVersion>;

    /// Run the external parser over a code version
    async fn create_parsing_result(
        &self,
        code_version_id: i64,
        body: NewParsingResult,
    ) -> Result<ParsingResult>;

    async fn create_parsing_result_version(
        &self,
        parsing_result_id: i64,
        body: NewParsingResultVersion,
    ) -> Result<ParsingResultVersion>;
}

/// kind cluster backend
#[trait_variant::make(ClusterBackend: Send)]
pub trait LocalClusterBackend {
    async fn list_clusters(&self) -> Result<Vec<Cluster>>;

    /// Queue cluster creation; completion is observed through [`Self::task_status`]
    async fn create_cluster(&self, body: ClusterCreateRequest) -> Result<TaskAccepted>;

    async fn delete_cluster(&self, name: &str) -> Result<()>;

    async fn cluster_details(&self, name: &str) -> Result<ClusterDetails>;

    async fn list_resources(
        &self,
        cluster: &str,
        kind: ResourceKind,
        all_namespaces: Option<bool>,
    ) -> Result<ResourceList>;

    async fn get_resource(
        &self,
        cluster: &str,
        kind: ResourceKind,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<Value>;

    async fn task_status(&self, task_id: &str) -> Result<Task>;

    /// Stream pod log lines into `lines` until the backend closes the body.
    ///
    /// Returns `Ok` on a clean end of stream. Dropping the future closes the
    /// connection.
    async fn stream_logs(
        &self,
        request: LogStreamRequest,
        lines: mpsc::Sender<String>,
    ) -> Result<()>;
}

/// Everything the console needs from its backends.
pub trait Backend: CodeBackend + ClusterBackend + Send + Sync + 'static {}

impl<T> Backend for T where T: CodeBackend + ClusterBackend + Send + Sync + 'static {}

/// Identity of one log connection.
///
/// Any field change means a different stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogStreamRequest {
    pub cluster: String,
    pub pod: String,
    pub namespace: String,
    pub follow: bool,
    pub tail: Option<u32>,
}

impl LogStreamRequest {
    pub fn new(cluster: impl Into<String>, pod: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            pod: pod.into(),
            namespace: "default".to_string(),
            follow: true,
            tail: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_follow(mut self, follow: bool) -> Self {
        self.follow = follow;
        self
    }

    pub fn with_tail(mut self, tail: Option<u32>) -> Self {
        self.tail = tail;
        self
    }

    /// Query string parameters for the logs endpoint
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("namespace", self.namespace.clone()),
            ("follow", self.follow.to_string()),
        ];
        if let Some(tail) = self.tail {
            query.push(("tail", tail.to_string()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_request_defaults() {
        let req = LogStreamRequest::new("dev", "web-1");
        assert_eq!(req.namespace, "default");
        assert!(req.follow);
        assert_eq!(
            req.query(),
            vec![
                ("namespace", "default".to_string()),
                ("follow", "true".to_string())
            ]
        );
    }

    #[test]
    fn test_log_request_tail_in_query() {
        let req = LogStreamRequest::new("dev", "web-1")
            .with_namespace("kube-system")
            .with_follow(false)
            .with_tail(Some(100));
        let query = req.query();
        assert!(query.contains(&("namespace", "kube-system".to_string())));
        assert!(query.contains(&("follow", "false".to_string())));
        assert!(query.contains(&("tail", "100".to_string())));
    }

    #[test]
    fn test_log_request_identity() {
        let a = LogStreamRequest::new("dev", "web-1");
        let b = a.clone().with_follow(false);
        assert_ne!(a, b);
        assert_eq!(a, LogStreamRequest::new("dev", "web-1"));
    }
}
