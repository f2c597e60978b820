//! Engine - shared orchestration state for the terminal runner
//!
//! Owns the TEA state, the message channel, the background task slots and the
//! shutdown signal, and drives messages through [`process::process_message`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use mlops_client::Backend;

use crate::actions::{lock_slots, TaskSlots};
use crate::config::Settings;
use crate::message::Message;
use crate::process;
use crate::route::Route;
use crate::signals;
use crate::state::AppState;

/// Orchestration engine for the console.
pub struct Engine<B: Backend> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources (signal handler, terminal events).
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    pub msg_rx: mpsc::Receiver<Message>,

    /// In-flight background work, one task per slot
    pub slots: TaskSlots,

    /// Send `true` to stop every background task
    pub shutdown_tx: watch::Sender<bool>,

    pub shutdown_rx: watch::Receiver<bool>,

    backend: Arc<B>,
}

impl<B: Backend> Engine<B> {
    /// Create an engine and enter `start`.
    ///
    /// Must be called inside a tokio runtime: entering the first route spawns
    /// its fetches, and the signal handler is spawned here too.
    pub fn new(backend: B, settings: Settings, start: Route) -> Self {
        let state = AppState::with_settings(settings);
        let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let slots: TaskSlots = Arc::new(std::sync::Mutex::new(HashMap::new()));

        signals::spawn_signal_handler(msg_tx.clone());

        let mut engine = Self {
            state,
            msg_tx,
            msg_rx,
            slots,
            shutdown_tx,
            shutdown_rx,
            backend: Arc::new(backend),
        };
        info!("Starting at {}", start);
        engine.process_message(Message::Replace(start));
        engine
    }

    /// Process a single message through the TEA update cycle.
    pub fn process_message(&mut self, msg: Message) {
        process::process_message(
            &mut self.state,
            msg,
            &self.msg_tx,
            &self.backend,
            &self.slots,
            &self.shutdown_rx,
        );
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed. The runner calls this before
    /// every render.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Wait for the next message and process it. Returns `false` once every
    /// sender is gone.
    pub async fn next_message(&mut self) -> bool {
        match self.msg_rx.recv().await {
            Some(msg) => {
                self.process_message(msg);
                true
            }
            None => false,
        }
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    /// Get a clone of the shutdown receiver for background tasks.
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Signal background tasks to stop and wait briefly for each.
    pub async fn shutdown(&mut self) {
        let _ = self.shutdown_tx.send(true);

        let tasks: Vec<_> = lock_slots(&self.slots).drain().collect();
        for (slot, handle) in tasks {
            match tokio::time::timeout(Duration::from_secs(2), handle).await {
                Ok(Ok(())) => debug!("{:?} task stopped", slot),
                Ok(Err(e)) if e.is_cancelled() => debug!("{:?} task was aborted", slot),
                Ok(Err(e)) => warn!("{:?} task panicked: {}", slot, e),
                Err(_) => warn!("{:?} task shutdown timed out", slot),
            }
        }
        info!("Engine shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::TaskSlot;
    use crate::input_key::InputKey;
    use mlops_client::test_utils::FakeBackend;

    async fn settle<B: Backend>(engine: &mut Engine<B>) {
        for _ in 0..20 {
            tokio::task::yield_now().await;
            tokio::time::sleep(Duration::from_millis(5)).await;
            engine.drain_pending_messages();
        }
    }

    #[tokio::test]
    async fn test_engine_loads_start_route() {
        let backend = FakeBackend::new();
        backend.seed_code("train", &["print(1)"]);
        let mut engine = Engine::new(backend.clone(), Settings::default(), Route::CodeList);

        settle(&mut engine).await;

        assert!(!engine.should_quit());
        let codes = engine.state.codes.data.data().expect("codes loaded");
        assert_eq!(codes.len(), 1);
        assert_eq!(backend.count_requests("GET /codes"), 1);
    }

    #[tokio::test]
    async fn test_engine_drain_empty_channel() {
        let mut engine = Engine::new(FakeBackend::new(), Settings::default(), Route::ClusterList);
        settle(&mut engine).await;
        assert_eq!(engine.drain_pending_messages(), 0);
    }

    #[tokio::test]
    async fn test_engine_quits_on_q() {
        let mut engine = Engine::new(FakeBackend::new(), Settings::default(), Route::CodeList);
        engine.process_message(Message::Key(InputKey::Char('q')));
        assert!(engine.should_quit());
    }

    #[tokio::test]
    async fn test_shutdown_drains_slots() {
        let backend = FakeBackend::new();
        backend.script_logs(&["a"], None);
        let mut engine = Engine::new(
            backend,
            Settings::default(),
            Route::PodLogs {
                cluster: "dev".into(),
                pod: "web-1".into(),
                namespace: "default".into(),
            },
        );
        assert!(lock_slots(&engine.slots).contains_key(&TaskSlot::LogStream));

        engine.shutdown().await;

        assert!(lock_slots(&engine.slots).is_empty());
        assert!(*engine.shutdown_rx.borrow());
    }
}
