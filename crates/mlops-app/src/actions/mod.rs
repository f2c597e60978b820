//! Action handlers: UpdateAction dispatch and background task spawning
//!
//! Fetches, task polling and log streaming run in named slots. Spawning into
//! an occupied slot aborts the task already there, so each slot has at most
//! one request in flight.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, MutexGuard};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use mlops_client::Backend;
use mlops_core::prelude::*;

use crate::config::Settings;
use crate::message::Message;
use crate::UpdateAction;

pub(super) mod fetch;
pub(super) mod logs;
pub(super) mod mutations;
pub(super) mod poll;

/// Background work that must not run twice at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskSlot {
    CodeList,
    CodeDetail,
    ClusterList,
    ClusterDetails,
    Resources,
    Resource,
    TaskPoll,
    LogStream,
}

/// Convenience type alias for slot task tracking
pub type TaskSlots = Arc<std::sync::Mutex<HashMap<TaskSlot, JoinHandle<()>>>>;

pub(crate) fn lock_slots(slots: &TaskSlots) -> MutexGuard<'_, HashMap<TaskSlot, JoinHandle<()>>> {
    match slots.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Run `task` in `slot`, aborting whatever ran there before. The task also
/// stops when shutdown is signalled.
fn spawn_in_slot<F>(slots: &TaskSlots, slot: TaskSlot, shutdown_rx: &watch::Receiver<bool>, task: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    let mut shutdown = shutdown_rx.clone();
    let handle = tokio::spawn(async move {
        tokio::select! {
            _ = task => {}
            _ = shutdown.wait_for(|stop| *stop) => {
                trace!("{:?} task stopped by shutdown", slot);
            }
        }
    });
    if let Some(previous) = lock_slots(slots).insert(slot, handle) {
        if !previous.is_finished() {
            debug!("Superseding in-flight {:?} task", slot);
            previous.abort();
        }
    }
}

fn abort_slot(slots: &TaskSlots, slot: TaskSlot) {
    if let Some(handle) = lock_slots(slots).remove(&slot) {
        handle.abort();
    }
}

/// Execute an action by spawning a background task
pub fn handle_action<B: Backend>(
    action: UpdateAction,
    msg_tx: mpsc::Sender<Message>,
    backend: Arc<B>,
    slots: TaskSlots,
    shutdown_rx: watch::Receiver<bool>,
    settings: &Settings,
) {
    let shutdown = &shutdown_rx;
    match action {
        // ─────────────────────────────────────────────────────────
        // Fetches
        // ─────────────────────────────────────────────────────────
        UpdateAction::FetchCodes { ticket } => spawn_in_slot(
            &slots,
            TaskSlot::CodeList,
            shutdown,
            fetch::codes(backend, ticket, msg_tx),
        ),
        UpdateAction::FetchCode { ticket, id } => spawn_in_slot(
            &slots,
            TaskSlot::CodeDetail,
            shutdown,
            fetch::code(backend, ticket, id, msg_tx),
        ),
        UpdateAction::FetchClusters { ticket } => spawn_in_slot(
            &slots,
            TaskSlot::ClusterList,
            shutdown,
            fetch::clusters(backend, ticket, msg_tx),
        ),
        UpdateAction::FetchClusterDetails { ticket, cluster } => spawn_in_slot(
            &slots,
            TaskSlot::ClusterDetails,
            shutdown,
            fetch::cluster_details(backend, ticket, cluster, msg_tx),
        ),
        UpdateAction::FetchResources {
            ticket,
            cluster,
            kind,
            all_namespaces,
        } => spawn_in_slot(
            &slots,
            TaskSlot::Resources,
            shutdown,
            fetch::resources(backend, ticket, cluster, kind, all_namespaces, msg_tx),
        ),
        UpdateAction::FetchResource {
            ticket,
            cluster,
            kind,
            name,
            namespace,
        } => spawn_in_slot(
            &slots,
            TaskSlot::Resource,
            shutdown,
            fetch::resource(backend, ticket, cluster, kind, name, namespace, msg_tx),
        ),

        // ─────────────────────────────────────────────────────────
        // Mutations (never superseded)
        // ─────────────────────────────────────────────────────────
        UpdateAction::CreateCode(body) => {
            tokio::spawn(mutations::create_code(backend, body, msg_tx));
        }
        UpdateAction::DeleteCodes { ids } => {
            tokio::spawn(mutations::delete_codes(backend, ids, msg_tx));
        }
        UpdateAction::CreateCodeVersion { code_id, body } => {
            tokio::spawn(mutations::create_code_version(
                backend, code_id, body, msg_tx,
            ));
        }
        UpdateAction::ParseCodeVersion {
            code_id,
            version_id,
            body,
        } => {
            tokio::spawn(mutations::parse_code_version(
                backend, code_id, version_id, body, msg_tx,
            ));
        }
        UpdateAction::CreateParsingResultVersion {
            code_id,
            version_id,
            parsing_result_id,
            body,
        } => {
            tokio::spawn(mutations::create_parsing_result_version(
                backend,
                code_id,
                version_id,
                parsing_result_id,
                body,
                msg_tx,
            ));
        }
        UpdateAction::RenameCode { code_id, name } => {
            tokio::spawn(mutations::rename_code(backend, code_id, name, msg_tx));
        }
        UpdateAction::CreateCluster { submission, body } => {
            tokio::spawn(mutations::create_cluster(
                backend, submission, body, msg_tx,
            ));
        }
        UpdateAction::DeleteCluster { name } => {
            tokio::spawn(mutations::delete_cluster(backend, name, msg_tx));
        }

        // ─────────────────────────────────────────────────────────
        // Task Polling
        // ─────────────────────────────────────────────────────────
        UpdateAction::PollTask { task_id } => spawn_in_slot(
            &slots,
            TaskSlot::TaskPoll,
            shutdown,
            poll::poll_task(
                backend,
                task_id,
                settings.polling.interval(),
                settings.polling.max_consecutive_errors,
                msg_tx,
                shutdown_rx.clone(),
            ),
        ),
        UpdateAction::StopTaskPolling => {
            debug!("Stopping task polling");
            abort_slot(&slots, TaskSlot::TaskPoll);
        }

        // ─────────────────────────────────────────────────────────
        // Pod Logs
        // ─────────────────────────────────────────────────────────
        UpdateAction::StartLogStream {
            request,
            generation,
        } => spawn_in_slot(
            &slots,
            TaskSlot::LogStream,
            shutdown,
            logs::stream(backend, request, generation, msg_tx),
        ),
        UpdateAction::StopLogStream => {
            debug!("Closing log stream");
            abort_slot(&slots, TaskSlot::LogStream);
        }
        UpdateAction::DownloadLogs { dir, pod, lines } => {
            tokio::spawn(logs::download(dir, pod, lines, msg_tx));
        }

        UpdateAction::Batch(actions) => {
            for action in actions {
                handle_action(
                    action,
                    msg_tx.clone(),
                    backend.clone(),
                    slots.clone(),
                    shutdown_rx.clone(),
                    settings,
                );
            }
        }
    }
}

/// Log a failed backend call and render it for display
pub(super) fn report(context: &str, error: Error) -> String {
    if error.is_recoverable() {
        warn!("{} failed: {}", context, error);
    } else {
        error!("{} failed: {:?}", context, error);
    }
    error.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_spawning_into_slot_aborts_previous() {
        let slots: TaskSlots = Arc::new(std::sync::Mutex::new(HashMap::new()));
        let (_tx, rx) = watch::channel(false);
        let (done_tx, mut done_rx) = mpsc::channel::<()>(1);

        spawn_in_slot(&slots, TaskSlot::CodeList, &rx, async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            let _ = done_tx.send(()).await;
        });
        spawn_in_slot(&slots, TaskSlot::CodeList, &rx, async {});

        // The aborted task drops its sender without sending
        let received = tokio::time::timeout(Duration::from_secs(1), done_rx.recv()).await;
        assert!(matches!(received, Ok(None)));
        assert_eq!(lock_slots(&slots).len(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_stops_slot_tasks() {
        let slots: TaskSlots = Arc::new(std::sync::Mutex::new(HashMap::new()));
        let (tx, rx) = watch::channel(false);

        spawn_in_slot(&slots, TaskSlot::LogStream, &rx, async {
            tokio::time::sleep(Duration::from_secs(60)).await;
        });
        tx.send(true).unwrap();

        let handle = lock_slots(&slots)
            .remove(&TaskSlot::LogStream)
            .expect("stream task");
        let joined = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert!(matches!(joined, Ok(Ok(()))));
    }
}
