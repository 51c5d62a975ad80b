//! Chat request handler.

use axum::Json;
use axum::extract::State;
use orderlens_core::chat::{self, ChatReply, ChatRequest};
use tracing::warn;

use crate::AppState;
use crate::error::{AppError, AppResult};

/// `POST /chat`: answers the last message using the startup order summary.
///
/// Model failures come back as an assistant message with status 200; only a
/// pipeline error (a last message with no `content` field) yields a 500.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> AppResult<Json<ChatReply>> {
    let reply = chat::respond(state.model.as_ref(), &state.summary, body).await;
    if let Some(detail) = reply.error {
        warn!(%detail, "chat pipeline error");
        return Err(AppError::Pipeline(detail));
    }
    Ok(Json(reply))
}
