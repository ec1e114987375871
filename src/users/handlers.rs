use axum::{extract::State, routing::put, Json, Router};
use tracing::{info, instrument};

use super::document::UserDocument;
use super::dto::PreferencesForm;
use super::services;
use crate::auth::AuthIdentity;
use crate::error::AppError;
use crate::state::AppState;

pub fn preference_routes() -> Router<AppState> {
    Router::new().route("/me/preferences", put(put_preferences))
}

#[instrument(skip(state, identity, form))]
pub async fn put_preferences(
    State(state): State<AppState>,
    AuthIdentity(identity): AuthIdentity,
    Json(form): Json<PreferencesForm>,
) -> Result<Json<UserDocument>, AppError> {
    let doc = services::save_preferences(&state, &identity.uid, &form).await?;
    info!(uid = %identity.uid, "preferences saved");
    Ok(Json(doc))
}
