//! `POST /command`: the chat-style command surface over HTTP.
//!
//! Always answers 200 with a reply; failures are part of the reply text.

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::commands::{self, Reply};
use crate::query::QueryService;

// ---

pub fn router() -> Router<QueryService> {
    Router::new().route("/command", post(handler))
}

#[derive(Debug, Deserialize)]
struct CommandRequest {
    text: String,
}

async fn handler(
    State(service): State<QueryService>,
    Json(request): Json<CommandRequest>,
) -> Json<Reply> {
    // ---
    let span = tracing::info_span!(
        "command",
        request_id = %Uuid::new_v4(),
        text = %request.text.trim()
    );
    async move {
        info!("POST /command");
        Json(commands::execute(&service, &request.text).await)
    }
    .instrument(span)
    .await
}
