//! Mutating backend calls. These are never superseded; each one reports back
//! exactly once.

use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::mpsc;

use mlops_client::{Backend, ClusterBackend, CodeBackend};
use mlops_core::prelude::*;
use mlops_core::{
    ClusterCreateRequest, NewCode, NewCodeVersion, NewParsingResult, NewParsingResultVersion,
    RenameCode,
};

use crate::message::Message;
use crate::selection::BulkDeleteOutcome;

use super::report;

pub(super) async fn create_code<B: Backend>(
    backend: Arc<B>,
    body: NewCode,
    msg_tx: mpsc::Sender<Message>,
) {
    let result = backend
        .create_code(body)
        .await
        .map_err(|e| report("Creating code", e));
    let _ = msg_tx.send(Message::CodeCreated { result }).await;
}

/// One request per id, all in flight together
pub(super) async fn delete_codes<B: Backend>(
    backend: Arc<B>,
    ids: Vec<i64>,
    msg_tx: mpsc::Sender<Message>,
) {
    let requests = ids.iter().map(|&id| {
        let backend = backend.clone();
        async move {
            let result = backend
                .delete_code(id)
                .await
                .map_err(|e| report(&format!("Deleting code {id}"), e));
            (id, result)
        }
    });
    let outcome = BulkDeleteOutcome::from_results(join_all(requests).await);
    info!(
        "Bulk delete finished: {} deleted, {} failed",
        outcome.deleted.len(),
        outcome.failed.len()
    );
    let _ = msg_tx.send(Message::CodesDeleted { outcome }).await;
}

pub(super) async fn create_code_version<B: Backend>(
    backend: Arc<B>,
    code_id: i64,
    body: NewCodeVersion,
    msg_tx: mpsc::Sender<Message>,
) {
    let result = backend
        .create_code_version(code_id, body)
        .await
        .map_err(|e| report("Saving code version", e));
    let _ = msg_tx
        .send(Message::CodeVersionSaved { code_id, result })
        .await;
}

pub(super) async fn parse_code_version<B: Backend>(
    backend: Arc<B>,
    code_id: i64,
    version_id: i64,
    body: NewParsingResult,
    msg_tx: mpsc::Sender<Message>,
) {
    let result = backend
        .create_parsing_result(version_id, body)
        .await
        .map_err(|e| report(&format!("Parsing code version {version_id}"), e));
    let _ = msg_tx
        .send(Message::VersionParsed {
            code_id,
            version_id,
            result,
        })
        .await;
}

pub(super) async fn create_parsing_result_version<B: Backend>(
    backend: Arc<B>,
    code_id: i64,
    version_id: i64,
    parsing_result_id: i64,
    body: NewParsingResultVersion,
    msg_tx: mpsc::Sender<Message>,
) {
    let result = backend
        .create_parsing_result_version(parsing_result_id, body)
        .await
        .map_err(|e| report("Saving parsing result version", e));
    let _ = msg_tx
        .send(Message::ParsingResultVersionSaved {
            code_id,
            version_id,
            parsing_result_id,
            result,
        })
        .await;
}

pub(super) async fn rename_code<B: Backend>(
    backend: Arc<B>,
    code_id: i64,
    name: String,
    msg_tx: mpsc::Sender<Message>,
) {
    let result = backend
        .rename_code(code_id, RenameCode { name })
        .await
        .map_err(|e| report("Renaming code", e));
    let _ = msg_tx.send(Message::CodeRenamed { code_id, result }).await;
}

pub(super) async fn create_cluster<B: Backend>(
    backend: Arc<B>,
    submission: u64,
    body: ClusterCreateRequest,
    msg_tx: mpsc::Sender<Message>,
) {
    let result = backend
        .create_cluster(body)
        .await
        .map_err(|e| report("Creating cluster", e));
    let _ = msg_tx
        .send(Message::ClusterCreateAccepted { submission, result })
        .await;
}

pub(super) async fn delete_cluster<B: Backend>(
    backend: Arc<B>,
    name: String,
    msg_tx: mpsc::Sender<Message>,
) {
    let result = backend
        .delete_cluster(&name)
        .await
        .map_err(|e| report(&format!("Deleting cluster '{name}'"), e));
    let _ = msg_tx.send(Message::ClusterDeleted { name, result }).await;
}
