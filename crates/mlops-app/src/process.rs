//! Message processing: run the TEA update loop and dispatch its actions

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use mlops_client::Backend;

use crate::actions::{handle_action, TaskSlots};
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function, following any
/// chained messages until the update settles.
pub fn process_message<B: Backend>(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    backend: &Arc<B>,
    slots: &TaskSlots,
    shutdown_rx: &watch::Receiver<bool>,
) {
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(
                action,
                msg_tx.clone(),
                backend.clone(),
                slots.clone(),
                shutdown_rx.clone(),
                &state.settings,
            );
        }

        msg = result.message;
    }
}
