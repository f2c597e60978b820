//! Background task polling
//!
//! [`TaskPoller`] is the TEA-side record of one cluster-creation task; it
//! guarantees completion effects fire once per task id. [`poll_until`] is the
//! cancellable retry loop that runs in a spawned task and drives the status
//! endpoint until the task reaches a terminal state.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use mlops_core::prelude::*;
use mlops_core::{Task, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PollPhase {
    #[default]
    Idle,
    /// Task id known, no status received yet
    Pending,
    Running(TaskStatus),
    Completed(String),
    Failed(String),
}

impl PollPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PollPhase::Completed(_) | PollPhase::Failed(_))
    }
}

/// What the update loop should do with a status report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollTransition {
    /// Stale task id or poller already finished
    Ignored,
    Progress,
    Completed(String),
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct TaskPoller {
    task_id: Option<String>,
    phase: PollPhase,
    /// Most recent transient error, shown until the next good status
    last_error: Option<String>,
}

impl TaskPoller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn phase(&self) -> &PollPhase {
        &self.phase
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Polling in progress
    pub fn is_active(&self) -> bool {
        self.task_id.is_some() && !self.phase.is_terminal()
    }

    pub fn start(&mut self, task_id: impl Into<String>) {
        self.task_id = Some(task_id.into());
        self.phase = PollPhase::Pending;
        self.last_error = None;
    }

    /// Forget the task. Returns `true` if polling was active.
    pub fn clear(&mut self) -> bool {
        let was_active = self.is_active();
        *self = Self::default();
        was_active
    }

    fn accepts(&self, task_id: &str) -> bool {
        self.task_id.as_deref() == Some(task_id) && !self.phase.is_terminal()
    }

    /// Apply a status report for `task_id`.
    pub fn on_status(&mut self, task_id: &str, task: &Task) -> PollTransition {
        if !self.accepts(task_id) {
            return PollTransition::Ignored;
        }
        self.last_error = None;
        match task.status {
            TaskStatus::Completed => {
                let result = task.result_message();
                self.phase = PollPhase::Completed(result.clone());
                PollTransition::Completed(result)
            }
            TaskStatus::Failed => {
                let result = task.result_message();
                self.phase = PollPhase::Failed(result.clone());
                PollTransition::Failed(result)
            }
            status => {
                self.phase = PollPhase::Running(status);
                PollTransition::Progress
            }
        }
    }

    /// Record a transient polling error; polling continues.
    pub fn on_error(&mut self, task_id: &str, message: &str) -> bool {
        if !self.accepts(task_id) {
            return false;
        }
        self.last_error = Some(message.to_string());
        true
    }

    /// The polling loop gave up after repeated errors.
    pub fn on_gave_up(&mut self, task_id: &str, message: &str) -> PollTransition {
        if !self.accepts(task_id) {
            return PollTransition::Ignored;
        }
        self.phase = PollPhase::Failed(message.to_string());
        PollTransition::Failed(message.to_string())
    }
}

/// How a polling loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Terminal(T),
    /// Too many consecutive fetch errors; carries the last one
    GaveUp(String),
    Cancelled,
}

/// Non-terminal observation reported while polling
#[derive(Debug)]
pub enum PollEvent<'a, T> {
    Status(&'a T),
    Error { message: &'a str, consecutive: u32 },
}

/// Poll `fetch` every `interval` until `is_terminal` holds.
///
/// The first fetch happens immediately. A fetch error is reported through
/// `on_event` and polling continues until `max_consecutive_errors` errors in
/// a row (0 means never give up). Setting `shutdown` to `true` cancels.
pub async fn poll_until<T, F, Fut>(
    interval: Duration,
    max_consecutive_errors: u32,
    mut fetch: F,
    is_terminal: impl Fn(&T) -> bool,
    mut on_event: impl FnMut(PollEvent<'_, T>),
    mut shutdown: watch::Receiver<bool>,
) -> PollOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut consecutive = 0u32;

    loop {
        if *shutdown.borrow() {
            return PollOutcome::Cancelled;
        }

        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return PollOutcome::Cancelled;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return PollOutcome::Cancelled;
                }
                continue;
            }
            result = fetch() => result,
        };

        match result {
            Ok(value) if is_terminal(&value) => return PollOutcome::Terminal(value),
            Ok(value) => {
                consecutive = 0;
                on_event(PollEvent::Status(&value));
            }
            Err(e) => {
                consecutive += 1;
                let message = e.to_string();
                debug!("Poll failed ({} in a row): {}", consecutive, message);
                if max_consecutive_errors > 0 && consecutive >= max_consecutive_errors {
                    return PollOutcome::GaveUp(message);
                }
                on_event(PollEvent::Error {
                    message: &message,
                    consecutive,
                });
            }
        }
    }
}
