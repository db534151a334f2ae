pub mod applier;
pub mod ticker;

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::change::MatchSession;
use crate::command::CommandReceiver;
use crate::config::Config;
use crate::pool::WaitingPool;
use crate::service::health::Health;

/// Spawns the Command Applier and Grouping Ticker onto `tracker`, wiring
/// them to the shared pool, command bus and event channel.
///
/// Returns the receiving end of the event channel, which the Fan-out
/// Dispatcher drains.
pub fn spawn(
    tracker: &TaskTracker,
    pool: Arc<WaitingPool>,
    commands: CommandReceiver,
    commands_tx: crate::command::CommandSender,
    health: Arc<Health>,
    config: Config,
    shutdown: CancellationToken,
) -> mpsc::Receiver<MatchSession> {
    let (events_tx, events_rx) = mpsc::channel(config.queue_size);

    tracker.spawn(applier::run(
        Arc::clone(&pool),
        commands,
        events_tx,
        health,
        shutdown.clone(),
    ));

    tracker.spawn(ticker::run(pool, commands_tx, config, shutdown));

    events_rx
}
