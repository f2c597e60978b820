//! HTTP implementation of the backend traits

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tokio::sync::mpsc;

use mlops_core::prelude::*;
use mlops_core::{
    Cluster, ClusterCreateRequest, ClusterDetails, Code, CodeVersion, NewCode, NewCodeVersion,
    NewParsingResult, NewParsingResultVersion, ParsingResult, ParsingResultVersion, RenameCode,
    ResourceKind, ResourceList, Task, TaskAccepted,
};

use crate::backend::{ClusterBackend, CodeBackend, LogStreamRequest};
use crate::client::{transport_error, ApiClient};
use crate::sse::{EventDecoder, Framing};

/// Both backends reached over HTTP.
///
/// The code tool and the cluster tool are separate services, each with its
/// own base URL.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    codes: ApiClient,
    clusters: ApiClient,
}

impl HttpBackend {
    pub fn new(code_base_url: &str, cluster_base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            codes: ApiClient::new(code_base_url, timeout)?,
            clusters: ApiClient::new(cluster_base_url, timeout)?,
        })
    }

    pub fn code_client(&self) -> &ApiClient {
        &self.codes
    }

    pub fn cluster_client(&self) -> &ApiClient {
        &self.clusters
    }
}

impl CodeBackend for HttpBackend {
    async fn list_codes(&self) -> Result<Vec<Code>> {
        self.codes.get_json(&["codes", ""], &[]).await
    }

    async fn get_code(&self, id: i64) -> Result<Code> {
        self.codes.get_json(&["codes", &id.to_string()], &[]).await
    }

    async fn create_code(&self, body: NewCode) -> Result<Code> {
        self.codes.post_json(&["codes", ""], &body).await
    }

    async fn rename_code(&self, id: i64, body: RenameCode) -> Result<Code> {
        self.codes.put_json(&["codes", &id.to_string()], &body).await
    }

    async fn delete_code(&self, id: i64) -> Result<()> {
        self.codes.delete(&["codes", &id.to_string()]).await
    }

    async fn create_code_version(
        &self,
        code_id: i64,
        body: NewCodeVersion,
    ) -> Result<CodeVersion> {
        self.codes
            .post_json(&["codes", &code_id.to_string(), "versions", ""], &body)
            .await
    }

    async fn create_parsing_result(
        &self,
        code_version_id: i64,
        body: NewParsingResult,
    ) -> Result<ParsingResult> {
        self.codes
            .post_json(
                &["parsing", "code-versions", &code_version_id.to_string()],
                &body,
            )
            .await
    }

    async fn create_parsing_result_version(
        &self,
        parsing_result_id: i64,
        body: NewParsingResultVersion,
    ) -> Result<ParsingResultVersion> {
        self.codes
            .post_json(
                &[
                    "parsing",
                    "results",
                    &parsing_result_id.to_string(),
                    "versions",
                ],
                &body,
            )
            .await
    }
}

impl ClusterBackend for HttpBackend {
    async fn list_clusters(&self) -> Result<Vec<Cluster>> {
        self.clusters.get_json(&["clusters"], &[]).await
    }

    async fn create_cluster(&self, body: ClusterCreateRequest) -> Result<TaskAccepted> {
        self.clusters.post_json(&["clusters"], &body).await
    }

    async fn delete_cluster(&self, name: &str) -> Result<()> {
        self.clusters.delete(&["clusters", name]).await
    }

    async fn cluster_details(&self, name: &str) -> Result<ClusterDetails> {
        self.clusters
            .get_json(&["clusters", name, "details"], &[])
            .await
    }

    async fn list_resources(
        &self,
        cluster: &str,
        kind: ResourceKind,
        all_namespaces: Option<bool>,
    ) -> Result<ResourceList> {
        let query: Vec<(&str, String)> = all_namespaces
            .map(|all| vec![("all_namespaces", all.to_string())])
            .unwrap_or_default();
        self.clusters
            .get_json(&["clusters", cluster, kind.as_str()], &query)
            .await
    }

    async fn get_resource(
        &self,
        cluster: &str,
        kind: ResourceKind,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<Value> {
        let query: Vec<(&str, String)> = namespace
            .map(|ns| vec![("namespace", ns.to_string())])
            .unwrap_or_default();
        self.clusters
            .get_json(&["clusters", cluster, kind.as_str(), name], &query)
            .await
    }

    async fn task_status(&self, task_id: &str) -> Result<Task> {
        self.clusters.get_json(&["tasks", task_id], &[]).await
    }

    async fn stream_logs(
        &self,
        request: LogStreamRequest,
        lines: mpsc::Sender<String>,
    ) -> Result<()> {
        let response = self
            .clusters
            .stream(
                &[
                    "clusters",
                    &request.cluster,
                    "pods",
                    &request.pod,
                    "logs",
                ],
                &request.query(),
            )
            .await?;

        let framing = Framing::from_content_type(
            response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
        );
        info!(
            "Log stream opened for {}/{} ({:?})",
            request.cluster, request.pod, framing
        );

        let mut decoder = EventDecoder::new(framing);
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| Error::stream(transport_error(e).to_string()))?;
            for line in decoder.feed(&chunk) {
                if lines.send(line).await.is_err() {
                    // Consumer went away; nothing left to deliver to
                    return Ok(());
                }
            }
        }
        for line in decoder.finish() {
            if lines.send(line).await.is_err() {
                break;
            }
        }
        info!("Log stream ended for {}/{}", request.cluster, request.pod);
        Ok(())
    }
}
