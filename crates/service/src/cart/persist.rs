//! Cart persistence adapter.
//!
//! Loading is best-effort: a missing or undecodable record yields an empty
//! cart. Saving is fire-and-forget through a background writer task; queued
//! snapshots coalesce so only the latest one is written.

use std::sync::Arc;

use models::PersistedCart;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::storage::KvStorage;

pub const DEFAULT_CART_KEY: &str = "cart-storage";

enum PersistCommand {
    Save(PersistedCart),
    Flush(oneshot::Sender<()>),
}

/// Reads and writes the cart record under one storage key.
#[derive(Clone)]
pub struct CartPersister {
    storage: Arc<dyn KvStorage>,
    key: String,
}

impl CartPersister {
    pub fn new(storage: Arc<dyn KvStorage>, key: impl Into<String>) -> Self {
        Self { storage, key: key.into() }
    }

    pub fn key(&self) -> &str { &self.key }

    pub async fn load(&self) -> PersistedCart {
        match self.storage.get_item(&self.key).await {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!(key = %self.key, error = %e, "stored cart does not decode; starting empty");
                PersistedCart::default()
            }),
            Ok(None) => PersistedCart::default(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "cart storage unreadable; starting empty");
                PersistedCart::default()
            }
        }
    }

    async fn write(&self, snapshot: &PersistedCart) {
        let value = match serde_json::to_value(snapshot) {
            Ok(v) => v,
            Err(e) => {
                warn!(key = %self.key, error = %e, "cart snapshot not serializable");
                return;
            }
        };
        match self.storage.set_item(&self.key, value).await {
            Ok(()) => debug!(key = %self.key, lines = snapshot.items.len(), "cart persisted"),
            Err(e) => warn!(key = %self.key, error = %e, "cart persist failed"),
        }
    }

    /// Start the writer task. Must be called inside a tokio runtime.
    pub fn spawn(self) -> PersistHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_writer(self, rx));
        PersistHandle { tx, task }
    }
}

async fn run_writer(persister: CartPersister, mut rx: mpsc::UnboundedReceiver<PersistCommand>) {
    while let Some(cmd) = rx.recv().await {
        match cmd {
            PersistCommand::Save(mut latest) => {
                // Later snapshots supersede earlier ones; stop at a flush so
                // it is acknowledged only after everything queued before it.
                let mut pending_ack = None;
                loop {
                    match rx.try_recv() {
                        Ok(PersistCommand::Save(newer)) => latest = newer,
                        Ok(PersistCommand::Flush(ack)) => {
                            pending_ack = Some(ack);
                            break;
                        }
                        Err(_) => break,
                    }
                }
                persister.write(&latest).await;
                if let Some(ack) = pending_ack {
                    let _ = ack.send(());
                }
            }
            PersistCommand::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    debug!(key = %persister.key, "cart writer stopped");
}

/// Sending side of the writer task.
pub struct PersistHandle {
    tx: mpsc::UnboundedSender<PersistCommand>,
    task: JoinHandle<()>,
}

impl PersistHandle {
    /// Queue a snapshot; never blocks.
    pub fn save(&self, snapshot: PersistedCart) {
        if self.tx.send(PersistCommand::Save(snapshot)).is_err() {
            warn!("cart writer is gone; snapshot dropped");
        }
    }

    /// Wait until every snapshot queued so far has been written.
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.tx.send(PersistCommand::Flush(ack)).is_ok() {
            let _ = done.await;
        }
    }

    /// Flush and stop the writer task.
    pub async fn close(self) {
        self.flush().await;
        let PersistHandle { tx, task } = self;
        drop(tx);
        if let Err(e) = task.await {
            warn!(error = %e, "cart writer task ended abnormally");
        }
    }
}
