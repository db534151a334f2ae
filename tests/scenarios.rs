//! End-to-end scenarios, instantiating the engine directly rather than over
//! HTTP - configuration is `QueueSize=10, MinGroupSize=2, MaxLevelDiff=1,
//! FindGroupEverySeconds=1, MatchTimeoutAfterSeconds=60` unless noted.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use matchmaking_engine::change::{ChangeKind, MatchSession};
use matchmaking_engine::command::{command_bus, Command};
use matchmaking_engine::config::Config;
use matchmaking_engine::engine;
use matchmaking_engine::player::Player;
use matchmaking_engine::pool::WaitingPool;
use matchmaking_engine::service::health::Health;

fn base_config() -> Config {
    Config {
        queue_size: 10,
        min_group_size: 2,
        max_level_diff: 1,
        find_group_every_seconds: 1,
        match_timeout_after_seconds: 60,
        ..Config::default()
    }
}

struct Harness {
    pool: Arc<WaitingPool>,
    commands_tx: matchmaking_engine::command::CommandSender,
    events_rx: mpsc::Receiver<MatchSession>,
    shutdown: CancellationToken,
    tracker: TaskTracker,
}

impl Harness {
    fn spawn(config: Config) -> Self {
        let pool = Arc::new(WaitingPool::new());
        let (commands_tx, commands_rx) = command_bus(config.queue_size);
        let health = Arc::new(Health::new());
        let shutdown = CancellationToken::new();
        let tracker = TaskTracker::new();

        let events_rx = engine::spawn(
            &tracker,
            Arc::clone(&pool),
            commands_rx,
            commands_tx.clone(),
            health,
            config,
            shutdown.clone(),
        );

        Self {
            pool,
            commands_tx,
            events_rx,
            shutdown,
            tracker,
        }
    }

    async fn enrol(&self, roster: &[(&str, u32)]) {
        let players = roster
            .iter()
            .map(|(id, level)| Player::new(*id, *level))
            .collect();
        self.commands_tx.send(Command::add(players)).await.unwrap();
    }

    async fn next_event(&mut self, timeout: Duration) -> Option<MatchSession> {
        tokio::time::timeout(timeout, self.events_rx.recv())
            .await
            .ok()
            .flatten()
    }

    async fn shutdown(self) {
        self.shutdown.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }
}

fn ids(session: &MatchSession) -> Vec<String> {
    let mut ids: Vec<_> = session.players.iter().map(|p| p.id.clone()).collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn s1_match_found() {
    let mut harness = Harness::spawn(base_config());
    harness
        .enrol(&[
            ("1", 1),
            ("2", 10),
            ("3", 20),
            ("4", 30),
            ("5", 40),
            ("6", 2),
        ])
        .await;

    // Drain the Added event first.
    let added = harness.next_event(Duration::from_secs(2)).await.unwrap();
    assert_eq!(added.kind, ChangeKind::Added);

    let matched = harness.next_event(Duration::from_secs(2)).await.unwrap();
    assert_eq!(matched.kind, ChangeKind::Matched);
    assert_eq!(ids(&matched), vec!["1", "6"]);

    harness.shutdown().await;
}

#[tokio::test]
async fn s2_match_not_found() {
    let mut harness = Harness::spawn(base_config());
    harness
        .enrol(&[
            ("1", 1),
            ("2", 10),
            ("3", 20),
            ("4", 30),
            ("5", 40),
            ("6", 50),
        ])
        .await;

    let added = harness.next_event(Duration::from_secs(2)).await.unwrap();
    assert_eq!(added.kind, ChangeKind::Added);

    // No pairing is within MaxLevelDiff=1 of any anchor, so nothing else
    // should arrive before the drain timeout elapses.
    assert!(harness.next_event(Duration::from_millis(1_100)).await.is_none());
    assert_eq!(harness.pool.size(), 6);

    harness.shutdown().await;
}

#[tokio::test]
async fn s3_remove_before_match() {
    let mut harness = Harness::spawn(base_config());
    harness
        .enrol(&[
            ("1", 1),
            ("2", 10),
            ("3", 20),
            ("4", 30),
            ("5", 40),
            ("6", 2),
        ])
        .await;
    let added = harness.next_event(Duration::from_secs(2)).await.unwrap();
    assert_eq!(added.kind, ChangeKind::Added);

    harness
        .commands_tx
        .send(Command::remove(vec!["1".to_string()]))
        .await
        .unwrap();
    let removed = harness.next_event(Duration::from_secs(2)).await.unwrap();
    assert_eq!(removed.kind, ChangeKind::Removed);
    assert_eq!(ids(&removed), vec!["1"]);
    assert!(harness.pool.snapshot().iter().all(|p| p.player.id != "1"));

    // `6` has no other partner within MaxLevelDiff=1, so no further Matched
    // event should ever mention it.
    while let Some(session) = harness.next_event(Duration::from_millis(1_100)).await {
        assert_ne!(session.kind, ChangeKind::Matched);
    }

    harness.shutdown().await;
}

#[tokio::test]
async fn s4_timeout_of_lone_player() {
    let mut harness = Harness::spawn(Config {
        match_timeout_after_seconds: 1,
        ..base_config()
    });
    harness.enrol(&[("1", 1)]).await;
    let added = harness.next_event(Duration::from_secs(2)).await.unwrap();
    assert_eq!(added.kind, ChangeKind::Added);

    let timed_out = harness.next_event(Duration::from_millis(1_200)).await.unwrap();
    assert_eq!(timed_out.kind, ChangeKind::TimedOut);
    assert_eq!(ids(&timed_out), vec!["1"]);
    assert_eq!(harness.pool.size(), 0);

    harness.shutdown().await;
}

#[tokio::test]
async fn s5_empty_queue_drain() {
    let mut harness = Harness::spawn(Config {
        match_timeout_after_seconds: 1,
        ..base_config()
    });
    // Skill gaps all exceed MaxLevelDiff=1.
    harness
        .enrol(&[("1", 0), ("2", 10), ("3", 20), ("4", 30), ("5", 40)])
        .await;
    let added = harness.next_event(Duration::from_secs(2)).await.unwrap();
    assert_eq!(added.kind, ChangeKind::Added);
    assert_eq!(added.players.len(), 5);

    let timed_out = harness.next_event(Duration::from_millis(1_200)).await.unwrap();
    assert_eq!(timed_out.kind, ChangeKind::TimedOut);
    assert_eq!(timed_out.players.len(), 5);
    assert_eq!(harness.pool.size(), 0);

    harness.shutdown().await;
}

#[tokio::test]
async fn s6_all_pair_up_via_direct_tick() {
    let config = Config {
        min_group_size: 2,
        max_level_diff: 10,
        find_group_every_seconds: 1_000,
        ..base_config()
    };
    let pool = WaitingPool::new();
    let (commands_tx, mut commands_rx) = command_bus(10);

    pool.add_many(vec![
        enrolled("1", 1),
        enrolled("2", 1),
        enrolled("3", 2),
        enrolled("4", 3),
        enrolled("5", 4),
        enrolled("6", 2),
    ]);

    engine::ticker::tick_once(&pool, &commands_tx, &config).await;
    drop(commands_tx);

    let mut matched_ids = Vec::new();
    let mut match_count = 0;
    while let Some(Command::CreateMatch { ids }) = commands_rx.recv().await {
        match_count += 1;
        matched_ids.extend(ids);
    }

    matched_ids.sort();
    assert_eq!(match_count, 3);
    assert_eq!(matched_ids, vec!["1", "2", "3", "4", "5", "6"]);
}

fn enrolled(id: &str, level: u32) -> matchmaking_engine::player::EnrolledPlayer {
    matchmaking_engine::player::EnrolledPlayer::new(Player::new(id, level), chrono::Utc::now())
}
