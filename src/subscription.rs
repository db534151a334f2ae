use std::collections::HashMap;

use parking_lot::RwLock;
use tokio::sync::mpsc;

use crate::player::PlayerId;
use crate::service::wire::StatusResponse;

/// Per-player outbox. Bounded and non-blocking from the Dispatcher's point
/// of view - see `Dispatcher::dispatch`.
pub type SubscriptionSender = mpsc::Sender<StatusResponse>;

/// Maps a player identity to its active status stream, if any.
///
/// Readers (`lookup`) and writers (`attach` / `detach`) are mutually
/// exclusive, but a lookup only ever clones a `Sender` out from under the
/// lock - the actual send happens outside it.
#[derive(Default)]
pub struct SubscriptionRegistry {
    subscriptions: RwLock<HashMap<PlayerId, SubscriptionSender>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscription for `id`, overwriting any previous one -
    /// subscribers are expected to open at most one stream at a time.
    pub fn attach(&self, id: PlayerId, sender: SubscriptionSender) {
        self.subscriptions.write().insert(id, sender);
    }

    /// Idempotent: unregistering an id with no subscription is a no-op.
    pub fn detach(&self, id: &PlayerId) {
        self.subscriptions.write().remove(id);
    }

    pub fn lookup(&self, id: &PlayerId) -> Option<SubscriptionSender> {
        self.subscriptions.read().get(id).cloned()
    }

    pub fn online_count(&self) -> usize {
        self.subscriptions.read().len()
    }
}
