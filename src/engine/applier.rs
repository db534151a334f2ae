use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::change::{ChangeKind, MatchSession};
use crate::command::{Command, CommandReceiver};
use crate::pool::WaitingPool;
use crate::service::health::Health;

/// Drains the Command Bus in order and is the pool's single writer.
///
/// Every command either produces exactly one event or is a no-op - either
/// its player list was empty to begin with, or (for Remove/Timeout/
/// CreateMatch) the pool had already lost every named player to some other
/// command by the time this one was applied.
pub async fn run(
    pool: Arc<WaitingPool>,
    mut commands: CommandReceiver,
    events: mpsc::Sender<MatchSession>,
    health: Arc<Health>,
    shutdown: CancellationToken,
) {
    loop {
        let command = tokio::select! {
            command = commands.recv() => command,
            () = shutdown.cancelled() => None,
        };

        let Some(command) = command else {
            break;
        };

        if command.is_empty() {
            continue;
        }

        let Some(session) = apply(&pool, command) else {
            continue;
        };

        health.record(session.kind, session.players.len() as u64);
        if session.kind == ChangeKind::Matched {
            info!(match_id = %session.id, players = session.players.len(), "match found");
        } else {
            debug!(kind = %session.kind, players = session.players.len(), "applied command");
        }

        // The receiving end (the Dispatcher) only ever goes away on
        // shutdown, at which point there's nothing left to notify anyway.
        let _ = events.send(session).await;
    }

    debug!("command applier shutting down");
    // Dropping `events` closes the channel, which drains the Dispatcher.
}

/// Mutates the pool for one command and returns the event it produced, if
/// any.
fn apply(pool: &WaitingPool, command: Command) -> Option<MatchSession> {
    match command {
        Command::Add {
            players,
            requested_at,
        } => {
            let enrolled = players
                .into_iter()
                .map(|player| crate::player::EnrolledPlayer::new(player, requested_at))
                .collect::<Vec<_>>();
            let added: Vec<_> = enrolled.iter().map(|e| e.player.clone()).collect();
            pool.add_many(enrolled);
            Some(MatchSession::new(ChangeKind::Added, added))
        }
        Command::Remove { ids } => {
            let removed = pool.remove_many(&ids);
            (!removed.is_empty()).then(|| MatchSession::new(ChangeKind::Removed, removed))
        }
        Command::Timeout { ids } => {
            let removed = pool.remove_many(&ids);
            (!removed.is_empty()).then(|| MatchSession::new(ChangeKind::TimedOut, removed))
        }
        Command::CreateMatch { ids } => {
            let removed = pool.remove_many(&ids);
            (!removed.is_empty()).then(|| MatchSession::new(ChangeKind::Matched, removed))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Player;

    #[test]
    fn add_emits_added_for_every_requested_player() {
        let pool = WaitingPool::new();
        let session = apply(
            &pool,
            Command::add(vec![Player::new("a", 1), Player::new("b", 2)]),
        )
        .unwrap();
        assert_eq!(session.kind, ChangeKind::Added);
        assert_eq!(session.players.len(), 2);
        assert_eq!(pool.size(), 2);
    }

    #[test]
    fn remove_of_absent_player_produces_no_event() {
        let pool = WaitingPool::new();
        assert!(apply(&pool, Command::remove(vec!["ghost".into()])).is_none());
    }

    #[test]
    fn create_match_downsizes_to_still_present_players() {
        let pool = WaitingPool::new();
        pool.add_many(vec![crate::player::EnrolledPlayer::new(
            Player::new("a", 1),
            chrono::Utc::now(),
        )]);
        // "b" was never enrolled (e.g. already removed by a racing command).
        let session = apply(
            &pool,
            Command::create_match(vec!["a".into(), "b".into()]),
        )
        .unwrap();
        assert_eq!(session.kind, ChangeKind::Matched);
        assert_eq!(session.players.len(), 1);
        assert_eq!(session.players[0].id, "a");
    }

    #[test]
    fn create_match_with_all_players_absent_produces_no_event() {
        let pool = WaitingPool::new();
        assert!(apply(&pool, Command::create_match(vec!["ghost".into()])).is_none());
    }
}
