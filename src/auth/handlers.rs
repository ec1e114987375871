use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::extractors::AuthIdentity;
use crate::error::AppError;
use crate::state::AppState;
use crate::users::document::UserDocument;
use crate::users::dto::SignInResponse;
use crate::users::services as users;

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/sign-in", post(sign_in))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

/// Exchange a provider bearer token for the stored profile, creating or
/// refreshing the user document.
#[instrument(skip(state, identity))]
pub async fn sign_in(
    State(state): State<AppState>,
    AuthIdentity(identity): AuthIdentity,
) -> Result<Json<SignInResponse>, AppError> {
    let response = users::sign_in(&state, &identity).await?;
    info!(
        uid = %identity.uid,
        needs_onboarding = response.needs_onboarding,
        "user signed in"
    );
    Ok(Json(response))
}

#[instrument(skip(state, identity))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthIdentity(identity): AuthIdentity,
) -> Result<Json<Option<UserDocument>>, AppError> {
    let doc = users::load_document(&state, &identity.uid).await?;
    Ok(Json(doc))
}
