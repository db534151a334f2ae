use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use futures::stream::Stream;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tracing::debug;

use crate::command::Command;
use crate::service::error::ServiceError;
use crate::service::health::Health;
use crate::service::wire::{Ack, AddPlayerRequest, PlayerData, RemovePlayerRequest, StatusResponse};
use crate::subscription::SubscriptionRegistry;

/// Everything a handler needs: a way to submit commands, and the shared
/// subscription / health state the Dispatcher and Applier also touch.
#[derive(Clone)]
pub struct AppState {
    pub commands: crate::command::CommandSender,
    pub subscriptions: Arc<SubscriptionRegistry>,
    pub health: Arc<Health>,
    pub outbox_capacity: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/players", post(add_player))
        .route("/players", delete(remove_player))
        .route("/status/{player_id}", get(status_stream))
        .route("/liveness", get(liveness))
        .route("/readiness", get(readiness))
        .route("/metrics", get(metrics))
        .with_state(state)
}

async fn add_player(
    State(state): State<AppState>,
    Json(request): Json<AddPlayerRequest>,
) -> Result<Json<Ack>, ServiceError> {
    if request.players.is_empty() {
        return Err(ServiceError::InvalidArgument);
    }
    let players = request.players.into_iter().map(Into::into).collect();
    state
        .commands
        .send(Command::add(players))
        .await
        .map_err(|_| ServiceError::Unavailable)?;
    Ok(Json(Ack {}))
}

async fn remove_player(
    State(state): State<AppState>,
    Json(request): Json<RemovePlayerRequest>,
) -> Result<Json<Ack>, ServiceError> {
    if request.players.is_empty() {
        return Err(ServiceError::InvalidArgument);
    }
    let ids = request
        .players
        .into_iter()
        .map(|p: PlayerData| p.id)
        .collect();
    state
        .commands
        .send(Command::remove(ids))
        .await
        .map_err(|_| ServiceError::Unavailable)?;
    Ok(Json(Ack {}))
}

/// Server-sent-event stream of status updates for one player.
///
/// Registers the subscription on first poll and deregisters it when the
/// client disconnects (the stream is dropped).
async fn status_stream(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, rx) = tokio::sync::mpsc::channel(state.outbox_capacity);
    state.subscriptions.attach(player_id.clone(), tx);

    debug!(player_id, "status stream opened");
    let guarded = DetachOnDrop {
        inner: ReceiverStream::new(rx),
        registry: Arc::clone(&state.subscriptions),
        player_id,
    };
    let stream = guarded.map(|status| Ok(Event::default().json_data(status).unwrap_or_default()));
    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

/// Deregisters its player's subscription once the underlying stream is
/// dropped - the only signal axum gives us that an SSE client disconnected.
struct DetachOnDrop {
    inner: ReceiverStream<StatusResponse>,
    registry: Arc<SubscriptionRegistry>,
    player_id: String,
}

impl Stream for DetachOnDrop {
    type Item = StatusResponse;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        Pin::new(&mut this.inner).poll_next(cx)
    }
}

impl Drop for DetachOnDrop {
    fn drop(&mut self) {
        self.registry.detach(&self.player_id);
    }
}

async fn liveness() -> impl IntoResponse {
    "ok"
}

async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if state.health.is_ready() {
        (axum::http::StatusCode::OK, "ready")
    } else {
        (axum::http::StatusCode::SERVICE_UNAVAILABLE, "not ready")
    }
}

async fn metrics(State(state): State<AppState>) -> String {
    state.health.render(state.subscriptions.online_count())
}
