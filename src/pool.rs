use parking_lot::RwLock;

use crate::player::{EnrolledPlayer, Player, PlayerId};

/// The set of currently-enrolled players, kept sorted non-decreasing by
/// skill level.
///
/// Exactly one task (the Command Applier) ever calls `add_many` /
/// `remove_many`; everyone else only reads via `snapshot` / `size`. That
/// single-writer discipline is what lets this just be a plain `RwLock`
/// rather than something fancier.
#[derive(Default)]
pub struct WaitingPool {
    players: RwLock<Vec<EnrolledPlayer>>,
}

impl WaitingPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the given players, rejecting any whose identity is already
    /// enrolled. Re-sorts the pool by level afterwards.
    pub fn add_many(&self, enrolled: Vec<EnrolledPlayer>) {
        if enrolled.is_empty() {
            return;
        }

        let mut players = self.players.write();
        for candidate in enrolled {
            if players.iter().any(|p| p.player.id == candidate.player.id) {
                // First enrollment wins - silently drop the duplicate.
                continue;
            }
            players.push(candidate);
        }
        sort_by_level(&mut players);
    }

    /// Remove each listed identity that's present, returning the players
    /// that were actually removed. Absentees contribute nothing.
    pub fn remove_many(&self, ids: &[PlayerId]) -> Vec<Player> {
        if ids.is_empty() {
            return Vec::new();
        }

        let mut players = self.players.write();
        let mut removed = Vec::with_capacity(ids.len());
        players.retain(|enrolled| {
            if ids.contains(&enrolled.player.id) {
                removed.push(enrolled.player.clone());
                false
            } else {
                true
            }
        });
        sort_by_level(&mut players);
        removed
    }

    /// A copy of the pool, ascending by skill level, safe to iterate
    /// without holding any lock.
    pub fn snapshot(&self) -> Vec<EnrolledPlayer> {
        self.players.read().clone()
    }

    pub fn size(&self) -> usize {
        self.players.read().len()
    }
}

/// Stable sort - ties retain insertion order, which is what lets the
/// grouping scan's tie-breaking behave deterministically.
fn sort_by_level(players: &mut [EnrolledPlayer]) {
    players.sort_by_key(|p| p.player.level);
}
