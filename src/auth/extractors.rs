use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use jsonwebtoken::{decode, DecodingKey, Validation};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use super::claims::IdentityClaims;
use crate::error::AppError;
use crate::state::AppState;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Verified caller profile. Absent or unusable claims become empty strings
/// so nothing undefined ever reaches a stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub photo_url: String,
}

impl Identity {
    pub(crate) fn from_claims(claims: IdentityClaims) -> Self {
        let email = claims
            .email
            .filter(|e| is_valid_email(e))
            .unwrap_or_default();
        Self {
            uid: claims.sub,
            display_name: claims.name.unwrap_or_default(),
            email,
            photo_url: claims.picture.unwrap_or_default(),
        }
    }
}

/// Decode and validate a bearer token against the configured issuer,
/// audience and secret.
pub(crate) fn verify_token(state: &AppState, token: &str) -> Result<IdentityClaims, AppError> {
    let cfg = &state.config.auth;
    let mut validation = Validation::default();
    validation.set_audience(std::slice::from_ref(&cfg.audience));
    validation.set_issuer(std::slice::from_ref(&cfg.issuer));
    let decoding = DecodingKey::from_secret(cfg.secret.as_bytes());

    let data = decode::<IdentityClaims>(token, &decoding, &validation).map_err(|e| {
        warn!(error = %e, "identity token rejected");
        AppError::MissingIdentity
    })?;
    Ok(data.claims)
}

pub(crate) fn identity_for_token(state: &AppState, token: &str) -> Result<Identity, AppError> {
    verify_token(state, token).map(Identity::from_claims)
}

/// Extracts and validates the Authorization header, yielding the caller
/// identity.
pub struct AuthIdentity(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for AuthIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AppError::MissingIdentity)?;

        // Expect "Bearer <token>"
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or(AppError::MissingIdentity)?;

        let identity = identity_for_token(state, token)?;
        Ok(AuthIdentity(identity))
    }
}
