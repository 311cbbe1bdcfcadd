use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::lookup::{self, MessageEvent};
use crate::state::BotState;

/// HTTP surface: health probe, inbound chat events and direct lookups.
/// `/metrics` is merged in by the binary when the recorder is installed.
pub fn create_router(state: BotState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/events/message", post(message_event))
        .route("/lookup/{callsign}", get(lookup_callsign))
        .with_state(state)
}

#[derive(Serialize)]
struct EventResp {
    replied: bool,
}

async fn message_event(
    State(state): State<BotState>,
    Json(ev): Json<MessageEvent>,
) -> Json<EventResp> {
    let replied = lookup::handle_message(&state, &ev).await.is_some();
    Json(EventResp { replied })
}

async fn lookup_callsign(State(state): State<BotState>, Path(callsign): Path<String>) -> String {
    lookup::respond(&state, &callsign).await
}
