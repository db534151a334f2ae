use std::sync::Arc;

use chrono::Utc;
use itertools::Itertools;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::command::{Command, CommandSender};
use crate::config::Config;
use crate::player::EnrolledPlayer;
use crate::pool::WaitingPool;

/// Periodically scans the Waiting Pool and proposes `Timeout` /
/// `CreateMatch` commands back onto the Command Bus.
///
/// Never mutates the pool itself - see `engine::applier`, which is the
/// pool's only writer.
pub async fn run(
    pool: Arc<WaitingPool>,
    commands: CommandSender,
    config: Config,
    shutdown: CancellationToken,
) {
    let mut interval = tokio::time::interval(config.find_group_every_interval());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                tick_once(&pool, &commands, &config).await;
            }
            () = shutdown.cancelled() => break,
        }
    }

    debug!("grouping ticker shutting down");
}

/// One grouping pass, exposed standalone so tests (and a caller that wants
/// to force an immediate pass) don't have to wait out a real interval.
pub async fn tick_once(pool: &WaitingPool, commands: &CommandSender, config: &Config) {
    let snapshot = pool.snapshot();
    if snapshot.is_empty() {
        return;
    }

    let now = Utc::now();
    let timeout_after = config.match_timeout_after();
    let (expired, active): (Vec<_>, Vec<_>) = snapshot
        .into_iter()
        .partition(|p| p.age(now) > timeout_after);

    if !expired.is_empty() {
        let ids = expired.iter().map(|p| p.player.id.clone()).collect();
        // If the bus is full this suspends the ticker, same as any other
        // producer - back-pressure is by design, see `command` docs.
        let _ = commands.send(Command::timeout(ids)).await;
    }

    let matches_proposed = propose_matches(&active, config, commands).await;

    debug!(
        matches_proposed,
        active = active.len(),
        expired = expired.len(),
        "grouping tick"
    );
}

/// The anchor-forward scan from the spec: walk the active list left to
/// right, and for each cursor position greedily collect players within
/// `max_level_diff` of *that* anchor (not the group's midpoint) until the
/// group reaches `min_group_size`, or give up on that anchor and advance
/// by one.
async fn propose_matches(
    active: &[EnrolledPlayer],
    config: &Config,
    commands: &CommandSender,
) -> usize {
    let mut matches_proposed = 0;
    let mut i = 0;

    while i < active.len() {
        let anchor = &active[i];
        let mut candidate_indices = vec![i];

        for (j, candidate) in active.iter().enumerate().skip(i + 1) {
            if candidate.player.id == anchor.player.id {
                continue;
            }
            if level_diff(candidate.player.level, anchor.player.level) <= config.max_level_diff {
                candidate_indices.push(j);
            }
            if candidate_indices.len() == config.min_group_size {
                break;
            }
        }

        if candidate_indices.len() == config.min_group_size {
            let ids = candidate_indices
                .iter()
                .map(|&idx| active[idx].player.id.clone())
                .collect_vec();
            let _ = commands.send(Command::create_match(ids)).await;
            matches_proposed += 1;
            i = candidate_indices.into_iter().max().unwrap() + 1;
        } else {
            i += 1;
        }
    }

    matches_proposed
}

fn level_diff(a: u32, b: u32) -> u32 {
    a.abs_diff(b)
}
