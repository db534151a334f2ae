use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::change::MatchSession;
use crate::subscription::SubscriptionRegistry;

/// Routes each applied [`MatchSession`] to every player it names who has an
/// open status stream, via a non-blocking `try_send`.
///
/// A slow or absent subscriber never holds up the rest - its outbox either
/// fills up (the message is dropped) or doesn't exist (nothing to do). The
/// Command Applier's own event channel is the only place back-pressure is
/// allowed to bite.
pub async fn run(
    mut events: mpsc::Receiver<MatchSession>,
    registry: std::sync::Arc<SubscriptionRegistry>,
) {
    while let Some(session) = events.recv().await {
        let response = crate::service::wire::StatusResponse::from_session(&session);
        let mut delivered = 0usize;
        for player in &session.players {
            let Some(sender) = registry.lookup(&player.id) else {
                continue;
            };
            match sender.try_send(response.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    trace!(player = %player.id, "status outbox full, dropping notification");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    registry.detach(&player.id);
                }
            }
        }
        debug!(
            kind = %session.kind,
            delivered,
            named = session.players.len(),
            "dispatched match session"
        );
    }

    debug!("dispatcher shutting down");
}
