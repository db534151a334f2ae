use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::change::{ChangeKind, MatchSession};
use crate::player::Player;

/// Wire shape of a `Player`, used on both `AddPlayer`/`RemovePlayer`
/// requests and inside a `Matched` status update's roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerData {
    pub id: String,
    pub level: i32,
}

impl From<&Player> for PlayerData {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            level: player.level as i32,
        }
    }
}

impl From<PlayerData> for Player {
    fn from(data: PlayerData) -> Self {
        Player::new(data.id, data.level.max(0) as u32)
    }
}

#[derive(Debug, Deserialize)]
pub struct AddPlayerRequest {
    pub players: Vec<PlayerData>,
}

#[derive(Debug, Deserialize)]
pub struct RemovePlayerRequest {
    pub players: Vec<PlayerData>,
}

/// Empty acknowledgement body for `AddPlayer` / `RemovePlayer`.
#[derive(Debug, Serialize)]
pub struct Ack {}

/// A single notification delivered on a player's status stream.
///
/// `players` is only populated for `Matched` - it carries the session id
/// of the `MatchSession` that produced it, not the subscribing player's id.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub id: Uuid,
    pub created: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<Vec<PlayerData>>,
}

impl StatusResponse {
    pub fn from_session(session: &MatchSession) -> Self {
        let players = matches!(session.kind, ChangeKind::Matched)
            .then(|| session.players.iter().map(PlayerData::from).collect());

        Self {
            id: session.id,
            created: session.created,
            kind: session.kind,
            players,
        }
    }
}
