use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::player::Player;

/// What kind of change a `MatchSession` reports.
///
/// The wire values are normative string constants, fixed for interop with
/// existing clients - don't rename the variants' `serde` representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    #[serde(rename = "player_added")]
    #[strum(serialize = "player_added")]
    Added,
    #[serde(rename = "player_removed")]
    #[strum(serialize = "player_removed")]
    Removed,
    #[serde(rename = "match_timeout")]
    #[strum(serialize = "match_timeout")]
    TimedOut,
    #[serde(rename = "match_found")]
    #[strum(serialize = "match_found")]
    Matched,
}

/// A lifecycle event emitted by the Command Applier.
///
/// For `Matched` the player list is exactly `MinGroupSize` long; for the
/// other kinds it's whatever subset of the named players the pool actually
/// had present at the time.
#[derive(Debug, Clone)]
pub struct MatchSession {
    pub id: Uuid,
    pub created: DateTime<Utc>,
    pub kind: ChangeKind,
    pub players: Vec<Player>,
}

impl MatchSession {
    pub fn new(kind: ChangeKind, players: Vec<Player>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created: Utc::now(),
            kind,
            players,
        }
    }
}
