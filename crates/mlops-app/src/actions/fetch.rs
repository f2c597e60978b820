//! Keyed fetches. Each resolves with the ticket it was issued under; the
//! update function decides whether the result is still wanted.

use std::sync::Arc;

use tokio::sync::mpsc;

use mlops_client::{Backend, ClusterBackend, CodeBackend};
use mlops_core::ResourceKind;

use crate::message::Message;
use crate::remote::RequestTicket;

use super::report;

pub(super) async fn codes<B: Backend>(
    backend: Arc<B>,
    ticket: RequestTicket,
    msg_tx: mpsc::Sender<Message>,
) {
    let result = backend
        .list_codes()
        .await
        .map_err(|e| report("Listing codes", e));
    let _ = msg_tx.send(Message::CodesLoaded { ticket, result }).await;
}

pub(super) async fn code<B: Backend>(
    backend: Arc<B>,
    ticket: RequestTicket,
    id: i64,
    msg_tx: mpsc::Sender<Message>,
) {
    let result = backend
        .get_code(id)
        .await
        .map_err(|e| report(&format!("Fetching code {id}"), e));
    let _ = msg_tx.send(Message::CodeLoaded { ticket, result }).await;
}

pub(super) async fn clusters<B: Backend>(
    backend: Arc<B>,
    ticket: RequestTicket,
    msg_tx: mpsc::Sender<Message>,
) {
    let result = backend
        .list_clusters()
        .await
        .map_err(|e| report("Listing clusters", e));
    let _ = msg_tx.send(Message::ClustersLoaded { ticket, result }).await;
}

pub(super) async fn cluster_details<B: Backend>(
    backend: Arc<B>,
    ticket: RequestTicket,
    cluster: String,
    msg_tx: mpsc::Sender<Message>,
) {
    let result = backend
        .cluster_details(&cluster)
        .await
        .map_err(|e| report(&format!("Fetching details of '{cluster}'"), e));
    let _ = msg_tx
        .send(Message::ClusterDetailsLoaded { ticket, result })
        .await;
}

pub(super) async fn resources<B: Backend>(
    backend: Arc<B>,
    ticket: RequestTicket,
    cluster: String,
    kind: ResourceKind,
    all_namespaces: Option<bool>,
    msg_tx: mpsc::Sender<Message>,
) {
    let result = backend
        .list_resources(&cluster, kind, all_namespaces)
        .await
        .map_err(|e| report(&format!("Listing {kind} in '{cluster}'"), e));
    let _ = msg_tx.send(Message::ResourcesLoaded { ticket, result }).await;
}

pub(super) async fn resource<B: Backend>(
    backend: Arc<B>,
    ticket: RequestTicket,
    cluster: String,
    kind: ResourceKind,
    name: String,
    namespace: Option<String>,
    msg_tx: mpsc::Sender<Message>,
) {
    let result = backend
        .get_resource(&cluster, kind, &name, namespace.as_deref())
        .await
        .map_err(|e| report(&format!("Fetching {kind}/{name} in '{cluster}'"), e));
    let _ = msg_tx.send(Message::ResourceLoaded { ticket, result }).await;
}
