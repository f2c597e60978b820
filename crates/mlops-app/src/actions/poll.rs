//! Task status polling for cluster creation.
//!
//! Runs [`poll_until`] against `GET /tasks/{id}` and forwards every report to
//! the TEA loop. Intermediate reports use `try_send`: a dropped progress update
//! is harmless, the terminal report is always delivered.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};

use mlops_client::{Backend, ClusterBackend};
use mlops_core::prelude::*;
use mlops_core::Task;

use crate::message::Message;
use crate::poller::{poll_until, PollEvent, PollOutcome};

pub(super) async fn poll_task<B: Backend>(
    backend: Arc<B>,
    task_id: String,
    interval: Duration,
    max_consecutive_errors: u32,
    msg_tx: mpsc::Sender<Message>,
    shutdown_rx: watch::Receiver<bool>,
) {
    info!("Polling task {} every {:?}", task_id, interval);

    let outcome = poll_until(
        interval,
        max_consecutive_errors,
        || {
            let backend = backend.clone();
            let task_id = task_id.clone();
            async move { backend.task_status(&task_id).await }
        },
        Task::is_terminal,
        |event| match event {
            PollEvent::Status(task) => {
                trace!("Task {} is {}", task_id, task.status);
                let _ = msg_tx.try_send(Message::TaskStatusReceived {
                    task_id: task_id.clone(),
                    task: task.clone(),
                });
            }
            PollEvent::Error {
                message,
                consecutive,
            } => {
                warn!(
                    "Polling task {} failed ({} in a row): {}",
                    task_id, consecutive, message
                );
                let _ = msg_tx.try_send(Message::TaskPollFailed {
                    task_id: task_id.clone(),
                    error: message.to_string(),
                });
            }
        },
        shutdown_rx,
    )
    .await;

    let message = match outcome {
        PollOutcome::Terminal(task) => {
            info!("Task {} finished: {}", task_id, task.status);
            Message::TaskStatusReceived { task_id, task }
        }
        PollOutcome::GaveUp(error) => {
            warn!("Gave up polling task {}: {}", task_id, error);
            Message::TaskPollGaveUp { task_id, error }
        }
        PollOutcome::Cancelled => {
            debug!("Polling task {} cancelled", task_id);
            return;
        }
    };
    let _ = msg_tx.send(message).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlops_client::test_utils::FakeBackend;
    use mlops_core::TaskStatus;

    #[tokio::test(start_paused = true)]
    async fn test_poll_reports_progress_then_terminal() {
        let backend = Arc::new(FakeBackend::new());
        backend.script_task(vec![
            (TaskStatus::Queued, None),
            (TaskStatus::InProgress, None),
            (TaskStatus::Completed, Some("Cluster qa created")),
        ]);
        let (tx, mut rx) = mpsc::channel(16);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        poll_task(
            backend.clone(),
            "t1".into(),
            Duration::from_secs(3),
            3,
            tx,
            shutdown_rx,
        )
        .await;

        let mut statuses = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            match msg {
                Message::TaskStatusReceived { task, .. } => statuses.push(task.status),
                other => panic!("unexpected message: {other:?}"),
            }
        }
        assert_eq!(
            statuses,
            vec![
                TaskStatus::Queued,
                TaskStatus::InProgress,
                TaskStatus::Completed
            ]
        );
        assert_eq!(backend.count_requests("GET /tasks/t1"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_gives_up_when_backend_unreachable() {
        let backend = Arc::new(FakeBackend::new());
        backend.script_task(vec![(TaskStatus::InProgress, None)]);
        backend.set_offline(true);
        let (tx, mut rx) = mpsc::channel(16);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        poll_task(backend, "t1".into(), Duration::from_secs(3), 2, tx, shutdown_rx).await;

        let mut messages = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            messages.push(msg);
        }
        assert!(matches!(messages[0], Message::TaskPollFailed { .. }));
        assert!(matches!(messages.last(), Some(Message::TaskPollGaveUp { .. })));
    }
}
