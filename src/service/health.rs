use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::change::ChangeKind;

/// Lifecycle counters and readiness flag for the `/metrics`, `/liveness`
/// and `/readiness` endpoints.
///
/// Deliberately not a full metrics backend - the spec calls this surface
/// "optional but standard" and "not part of correctness", so it stays a
/// handful of plain atomics rather than pulling in a Prometheus exporter.
#[derive(Default)]
pub struct Health {
    ready: AtomicBool,
    added_total: AtomicU64,
    removed_total: AtomicU64,
    timed_out_total: AtomicU64,
    matched_total: AtomicU64,
}

impl Health {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Relaxed);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }

    pub fn record(&self, kind: ChangeKind, player_count: u64) {
        let counter = match kind {
            ChangeKind::Added => &self.added_total,
            ChangeKind::Removed => &self.removed_total,
            ChangeKind::TimedOut => &self.timed_out_total,
            ChangeKind::Matched => &self.matched_total,
        };
        counter.fetch_add(player_count, Ordering::Relaxed);
    }

    /// Flat `key value` text body, in the spirit of a Prometheus exposition
    /// format without depending on one.
    pub fn render(&self, online_subscriptions: usize) -> String {
        format!(
            "matchmaking_players_added_total {}\n\
             matchmaking_players_removed_total {}\n\
             matchmaking_players_timed_out_total {}\n\
             matchmaking_players_matched_total {}\n\
             matchmaking_subscriptions_online {}\n",
            self.added_total.load(Ordering::Relaxed),
            self.removed_total.load(Ordering::Relaxed),
            self.timed_out_total.load(Ordering::Relaxed),
            self.matched_total.load(Ordering::Relaxed),
            online_subscriptions,
        )
    }
}
