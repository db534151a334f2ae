use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use matchmaking_engine::command::command_bus;
use matchmaking_engine::config::Config;
use matchmaking_engine::dispatcher;
use matchmaking_engine::engine;
use matchmaking_engine::pool::WaitingPool;
use matchmaking_engine::service::health::Health;
use matchmaking_engine::service::routes::{self, AppState};
use matchmaking_engine::subscription::SubscriptionRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(
                    config
                        .log_level
                        .parse::<LevelFilter>()
                        .unwrap_or(LevelFilter::INFO)
                        .into(),
                )
                .from_env_lossy(),
        )
        .init();

    let pool = Arc::new(WaitingPool::new());
    let (commands_tx, commands_rx) = command_bus(config.queue_size);
    let subscriptions = Arc::new(SubscriptionRegistry::new());
    let health = Arc::new(Health::new());

    let tracker = TaskTracker::new();
    let shutdown = CancellationToken::new();

    let events_rx = engine::spawn(
        &tracker,
        Arc::clone(&pool),
        commands_rx,
        commands_tx.clone(),
        Arc::clone(&health),
        config.clone(),
        shutdown.clone(),
    );

    tracker.spawn(dispatcher::run(events_rx, Arc::clone(&subscriptions)));

    let state = AppState {
        commands: commands_tx,
        subscriptions,
        health: Arc::clone(&health),
        outbox_capacity: config.queue_size,
    };
    let app = routes::router(state);

    let listener = TcpListener::bind(&config.http_address).await?;
    info!(address = %config.http_address, "matchmaking engine listening");
    health.mark_ready();

    tracker.spawn({
        let shutdown = shutdown.clone();
        async move {
            let serve = axum::serve(listener, app);
            tokio::select! {
                result = serve => {
                    if let Err(error) = result {
                        tracing::error!(%error, "http server exited");
                    }
                }
                () = shutdown.cancelled() => {}
            }
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    shutdown.cancel();
    tracker.close();
    tracker.wait().await;

    Ok(())
}
