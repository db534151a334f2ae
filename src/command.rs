use chrono::{DateTime, Utc};

use crate::player::{Player, PlayerId};

/// An intent to mutate the Waiting Pool, carried by the Command Bus.
///
/// `Add` carries full `Player` data (a new enrollment needs level and id);
/// the others only need identities since they just remove from the pool.
#[derive(Debug, Clone)]
pub enum Command {
    Add {
        players: Vec<Player>,
        requested_at: DateTime<Utc>,
    },
    Remove {
        ids: Vec<PlayerId>,
    },
    Timeout {
        ids: Vec<PlayerId>,
    },
    CreateMatch {
        ids: Vec<PlayerId>,
    },
}

impl Command {
    /// The Add command's timestamp is the point a caller issued it, not
    /// when the applier later drains it off the bus - that's what keeps
    /// queueing delay from eating into a player's timeout budget.
    pub fn add(players: Vec<Player>) -> Self {
        Self::Add {
            players,
            requested_at: Utc::now(),
        }
    }

    pub fn remove(ids: Vec<PlayerId>) -> Self {
        Self::Remove { ids }
    }

    pub fn timeout(ids: Vec<PlayerId>) -> Self {
        Self::Timeout { ids }
    }

    pub fn create_match(ids: Vec<PlayerId>) -> Self {
        Self::CreateMatch { ids }
    }

    /// Commands whose player set is empty are dropped by the applier
    /// without producing an event.
    pub fn is_empty(&self) -> bool {
        match self {
            Command::Add { players, .. } => players.is_empty(),
            Command::Remove { ids } | Command::Timeout { ids } | Command::CreateMatch { ids } => {
                ids.is_empty()
            }
        }
    }
}

/// Bounded FIFO of [`Command`]s; capacity is `Config::queue_size`.
///
/// `tokio::sync::mpsc` already gives us everything the spec asks for: a
/// single consumer, back-pressure on a full channel (`send().await`
/// suspends the caller), and FIFO ordering across all producers.
pub type CommandSender = tokio::sync::mpsc::Sender<Command>;
pub type CommandReceiver = tokio::sync::mpsc::Receiver<Command>;

pub fn command_bus(capacity: usize) -> (CommandSender, CommandReceiver) {
    tokio::sync::mpsc::channel(capacity)
}
