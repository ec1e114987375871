use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument};

use super::dto::AskRequest;
use super::services;
use crate::{error::AppError, state::AppState};

pub fn ask_routes() -> Router<AppState> {
    Router::new().route("/assistant/ask", post(ask))
}

#[instrument(skip(state, payload))]
pub async fn ask(
    State(state): State<AppState>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<String>, AppError> {
    let question = payload.question.as_deref().unwrap_or_default();
    let answer = services::ask(&state, payload.recipe.as_ref(), question).await?;
    info!(
        question_len = question.len(),
        answer_len = answer.len(),
        "assistant answered"
    );
    Ok(Json(answer))
}
