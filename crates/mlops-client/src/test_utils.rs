//! In-memory backend for tests
//!
//! Behaves like the real services for the happy paths (ids, version numbers,
//! nested parsing results) and can be scripted to fail specific calls or to
//! report a fixed sequence of task statuses.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use serde_json::Value;
use tokio::sync::mpsc;

use mlops_core::prelude::*;
use mlops_core::{
    Cluster, ClusterCreateRequest, ClusterDetails, Code, CodeVersion, NewCode, NewCodeVersion,
    NewParsingResult, NewParsingResultVersion, ParsedContent, ParsingResult,
    ParsingResultVersion, RenameCode, ResourceKind, ResourceList, Task, TaskAccepted, TaskStatus,
};

use crate::backend::{ClusterBackend, CodeBackend, LogStreamRequest};

#[derive(Debug, Default)]
struct FakeState {
    codes: Vec<Code>,
    next_id: i64,
    clusters: Vec<Cluster>,
    details: HashMap<String, ClusterDetails>,
    resources: HashMap<(String, ResourceKind), ResourceList>,
    task_scripts: VecDeque<Task>,
    failing_code_deletes: HashSet<i64>,
    offline: bool,
    log_lines: Vec<String>,
    log_error: Option<String>,
    requests: Vec<String>,
}

/// Cloneable handle to a shared in-memory backend.
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Every call made so far, as `METHOD path`
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    pub fn count_requests(&self, prefix: &str) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.starts_with(prefix))
            .count()
    }

    pub fn codes(&self) -> Vec<Code> {
        self.lock().codes.clone()
    }

    /// Insert a code with the given version contents (version 1, 2, ...)
    pub fn seed_code(&self, name: &str, contents: &[&str]) -> Code {
        let mut state = self.lock();
        let id = state.allocate_id();
        let now = Utc::now().naive_utc();
        let mut code = Code {
            id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
            versions: Vec::new(),
        };
        for (i, content) in contents.iter().enumerate() {
            let vid = state.allocate_id();
            code.versions.push(CodeVersion {
                id: vid,
                version: i as i64 + 1,
                content: content.to_string(),
                created_at: now,
                parsing_results: Vec::new(),
            });
        }
        state.codes.push(code.clone());
        code
    }

    pub fn seed_cluster(&self, name: &str, details: ClusterDetails) {
        let mut state = self.lock();
        state.clusters.push(Cluster {
            name: name.to_string(),
        });
        state.details.insert(name.to_string(), details);
    }

    pub fn seed_resources(&self, cluster: &str, kind: ResourceKind, items: Vec<Value>) {
        self.lock().resources.insert(
            (cluster.to_string(), kind),
            ResourceList {
                api_version: Some("v1".to_string()),
                items,
            },
        );
    }

    /// Statuses returned by successive `task_status` calls. The last one
    /// repeats once the script runs out.
    pub fn script_task(&self, statuses: Vec<(TaskStatus, Option<&str>)>) {
        self.lock().task_scripts = statuses
            .into_iter()
            .map(|(status, result)| Task {
                status,
                result: result.map(str::to_string),
            })
            .collect();
    }

    pub fn fail_code_delete(&self, id: i64) {
        self.lock().failing_code_deletes.insert(id);
    }

    /// Make every call fail with a transport error
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    pub fn script_logs(&self, lines: &[&str], error: Option<&str>) {
        let mut state = self.lock();
        state.log_lines = lines.iter().map(|l| l.to_string()).collect();
        state.log_error = error.map(str::to_string);
    }

    fn record(&self, request: String) -> Result<()> {
        let mut state = self.lock();
        state.requests.push(request);
        if state.offline {
            return Err(Error::http("Could not connect to backend: connection refused"));
        }
        Ok(())
    }
}

impl FakeState {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn code_mut(&mut self, id: i64) -> Result<&mut Code> {
        self.codes
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::backend(404, "Code not found"))
    }

    fn version_mut(&mut self, id: i64) -> Result<&mut CodeVersion> {
        self.codes
            .iter_mut()
            .flat_map(|c| c.versions.iter_mut())
            .find(|v| v.id == id)
            .ok_or_else(|| Error::backend(404, "Code version not found"))
    }

    fn parsing_result_mut(&mut self, id: i64) -> Result<&mut ParsingResult> {
        self.codes
            .iter_mut()
            .flat_map(|c| c.versions.iter_mut())
            .flat_map(|v| v.parsing_results.iter_mut())
            .find(|r| r.id == id)
            .ok_or_else(|| Error::backend(404, "Parsing result not found"))
    }
}

impl CodeBackend for FakeBackend {
    async fn list_codes(&self) -> Result<Vec<Code>> {
        self.record("GET /codes".to_string())?;
        Ok(self.lock().codes.clone())
    }

    async fn get_code(&self, id: i64) -> Result<Code> {
        self.record(format!("GET /codes/{id}"))?;
        let mut state = self.lock();
        state.code_mut(id).map(|c| c.clone())
    }

    async fn create_code(&self, body: NewCode) -> Result<Code> {
        self.record("POST /codes".to_string())?;
        if body.name.trim().is_empty() {
            return Err(Error::backend(422, "name must not be empty"));
        }
        let mut state = self.lock();
        let now = Utc::now().naive_utc();
        let code = Code {
            id: state.allocate_id(),
            name: body.name,
            created_at: now,
            updated_at: now,
            versions: Vec::new(),
        };
        state.codes.push(code.clone());
        Ok(code)
    }

    async fn rename_code(&self, id: i64, body: RenameCode) -> Result<Code> {
        self.record(format!("PUT /codes/{id}"))?;
        let mut state = self.lock();
        let code = state.code_mut(id)?;
        code.name = body.name;
        code.updated_at = Utc::now().naive_utc();
        Ok(code.clone())
    }

    async fn delete_code(&self, id: i64) -> Result<()> {
        self.record(format!("DELETE /codes/{id}"))?;
        let mut state = self.lock();
        if state.failing_code_deletes.contains(&id) {
            return Err(Error::backend(500, format!("Failed to delete code {id}")));
        }
        let before = state.codes.len();
        state.codes.retain(|c| c.id != id);
        if state.codes.len() == before {
            return Err(Error::backend(404, "Code not found"));
        }
        Ok(())
    }

    async fn create_code_version(
        &self,
        code_id: i64,
        body: NewCodeVersion,
    ) -> Result<CodeVersion> {
        self.record(format!("POST /codes/{code_id}/versions"))?;
        let mut state = self.lock();
        let id = state.allocate_id();
        let code = state
            .code_mut(code_id)
            .map_err(|_| Error::backend(404, "Parent code not found"))?;
        let now = Utc::now().naive_utc();
        let version = CodeVersion {
            id,
            version: code.next_version_number(),
            content: body.content,
            created_at: now,
            parsing_results: Vec::new(),
        };
        code.versions.push(version.clone());
        code.updated_at = now;
        Ok(version)
    }

    async fn create_parsing_result(
        &self,
        code_version_id: i64,
        body: NewParsingResult,
    ) -> Result<ParsingResult> {
        self.record(format!("POST /parsing/code-versions/{code_version_id}"))?;
        let mut state = self.lock();
        let result_id = state.allocate_id();
        let version_id = state.allocate_id();
        let code_version = state.version_mut(code_version_id)?;
        let now = Utc::now().naive_utc();
        let content = ParsedContent {
            name: body.name.clone(),
            framework: Some("pytorch".to_string()),
            metric: Some(vec!["accuracy".to_string()]),
            parameter: String::new(),
            model_block: code_version.content.clone(),
            data_block: String::new(),
            extra: Default::default(),
        };
        let result = ParsingResult {
            id: result_id,
            code_version_id,
            name: body.name,
            created_at: now,
            versions: vec![ParsingResultVersion {
                id: version_id,
                version: 1,
                content,
                created_at: now,
            }],
        };
        code_version.parsing_results.push(result.clone());
        Ok(result)
    }

    async fn create_parsing_result_version(
        &self,
        parsing_result_id: i64,
        body: NewParsingResultVersion,
    ) -> Result<ParsingResultVersion> {
        self.record(format!("POST /parsing/results/{parsing_result_id}/versions"))?;
        let content: ParsedContent = serde_json::from_value(Value::Object(body.content))
            .map_err(|e| Error::backend(422, e.to_string()))?;
        let mut state = self.lock();
        let id = state.allocate_id();
        let result = state.parsing_result_mut(parsing_result_id)?;
        let version = ParsingResultVersion {
            id,
            version: result.versions.iter().map(|v| v.version).max().unwrap_or(0) + 1,
            content,
            created_at: Utc::now().naive_utc(),
        };
        result.versions.push(version.clone());
        Ok(version)
    }
}

impl ClusterBackend for FakeBackend {
    async fn list_clusters(&self) -> Result<Vec<Cluster>> {
        self.record("GET /clusters".to_string())?;
        Ok(self.lock().clusters.clone())
    }

    async fn create_cluster(&self, body: ClusterCreateRequest) -> Result<TaskAccepted> {
        self.record("POST /clusters".to_string())?;
        let mut state = self.lock();
        let task_id = format!("task-{}", state.allocate_id());
        state.clusters.push(Cluster {
            name: body.cluster_name.clone(),
        });
        Ok(TaskAccepted {
            message: format!("Cluster '{}' creation has been queued.", body.cluster_name),
            task_id,
        })
    }

    async fn delete_cluster(&self, name: &str) -> Result<()> {
        self.record(format!("DELETE /clusters/{name}"))?;
        let mut state = self.lock();
        let before = state.clusters.len();
        state.clusters.retain(|c| c.name != name);
        if state.clusters.len() == before {
            return Err(Error::backend(
                404,
                format!("Cluster '{name}' not found or could not be deleted."),
            ));
        }
        Ok(())
    }

    async fn cluster_details(&self, name: &str) -> Result<ClusterDetails> {
        self.record(format!("GET /clusters/{name}/details"))?;
        self.lock()
            .details
            .get(name)
            .copied()
            .ok_or_else(|| Error::backend(500, "Failed to get nodes"))
    }

    async fn list_resources(
        &self,
        cluster: &str,
        kind: ResourceKind,
        all_namespaces: Option<bool>,
    ) -> Result<ResourceList> {
        let suffix = all_namespaces
            .map(|all| format!("?all_namespaces={all}"))
            .unwrap_or_default();
        self.record(format!("GET /clusters/{cluster}/{kind}{suffix}"))?;
        Ok(self
            .lock()
            .resources
            .get(&(cluster.to_string(), kind))
            .cloned()
            .unwrap_or_default())
    }

    async fn get_resource(
        &self,
        cluster: &str,
        kind: ResourceKind,
        name: &str,
        _namespace: Option<&str>,
    ) -> Result<Value> {
        self.record(format!("GET /clusters/{cluster}/{kind}/{name}"))?;
        self.lock()
            .resources
            .get(&(cluster.to_string(), kind))
            .and_then(|list| {
                list.items
                    .iter()
                    .find(|item| ResourceList::item_name(item) == Some(name))
                    .cloned()
            })
            .ok_or_else(|| Error::backend(404, format!("{kind} '{name}' not found")))
    }

    async fn task_status(&self, task_id: &str) -> Result<Task> {
        self.record(format!("GET /tasks/{task_id}"))?;
        let mut state = self.lock();
        let task = if state.task_scripts.len() > 1 {
            state.task_scripts.pop_front()
        } else {
            state.task_scripts.front().cloned()
        };
        task.ok_or_else(|| Error::backend(404, "Task not found"))
    }

    async fn stream_logs(
        &self,
        request: LogStreamRequest,
        lines: mpsc::Sender<String>,
    ) -> Result<()> {
        self.record(format!(
            "GET /clusters/{}/pods/{}/logs",
            request.cluster, request.pod
        ))?;
        let (script, error) = {
            let state = self.lock();
            (state.log_lines.clone(), state.log_error.clone())
        };
        for line in script {
            if lines.send(line).await.is_err() {
                return Ok(());
            }
        }
        match error {
            Some(message) => Err(Error::stream(message)),
            None => Ok(()),
        }
    }
}
