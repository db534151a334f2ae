use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque player identity. Unique among currently enrolled players.
pub type PlayerId = String;

/// A player known to the matchmaking engine.
///
/// Immutable once created - nothing in the core ever mutates a `Player` in
/// place, it's only ever replaced wholesale (on re-enrollment) or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub level: u32,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, level: u32) -> Self {
        Self {
            id: id.into(),
            level,
        }
    }
}

/// A `Player` plus the time its `Add` command was issued.
///
/// The timestamp is taken when the command is created, not when the
/// Command Applier later processes it, so queueing delay doesn't eat into
/// the player's timeout budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrolledPlayer {
    pub player: Player,
    pub enrolled_at: DateTime<Utc>,
}

impl EnrolledPlayer {
    pub fn new(player: Player, enrolled_at: DateTime<Utc>) -> Self {
        Self {
            player,
            enrolled_at,
        }
    }

    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.enrolled_at
    }
}
