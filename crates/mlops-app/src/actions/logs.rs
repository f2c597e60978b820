//! Pod log streaming and download.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use mlops_client::{Backend, ClusterBackend, LogStreamRequest};
use mlops_core::prelude::*;

use crate::log_stream::write_download;
use crate::message::Message;

/// Forward lines from one connection, tagged with its generation, then
/// report how the connection ended. Aborting the task closes the connection.
pub(super) async fn stream<B: Backend>(
    backend: Arc<B>,
    request: LogStreamRequest,
    generation: u64,
    msg_tx: mpsc::Sender<Message>,
) {
    info!(
        "Opening log stream for {}/{} (namespace {}, follow {})",
        request.cluster, request.pod, request.namespace, request.follow
    );
    let (line_tx, mut line_rx) = mpsc::channel::<String>(256);

    let forward = async {
        while let Some(line) = line_rx.recv().await {
            if msg_tx
                .send(Message::LogLine { generation, line })
                .await
                .is_err()
            {
                break;
            }
        }
    };

    // `stream_logs` drops `line_tx` when it returns, which ends `forward`
    let (result, ()) = tokio::join!(backend.stream_logs(request, line_tx), forward);

    let result = result.map_err(|e| {
        warn!("Log stream (generation {}) failed: {}", generation, e);
        e.to_string()
    });
    let _ = msg_tx
        .send(Message::LogStreamEnded { generation, result })
        .await;
}

pub(super) async fn download(
    dir: PathBuf,
    pod: String,
    lines: Vec<String>,
    msg_tx: mpsc::Sender<Message>,
) {
    let result = tokio::task::spawn_blocking(move || write_download(&dir, &pod, &lines))
        .await
        .map_err(|e| e.to_string())
        .and_then(|r| r.map_err(|e| e.to_string()));
    if let Err(e) = &result {
        warn!("Log download failed: {}", e);
    }
    let _ = msg_tx.send(Message::LogsDownloaded { result }).await;
}
