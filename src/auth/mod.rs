use crate::state::AppState;
use axum::Router;

mod claims;
pub(crate) mod extractors;
pub mod handlers;

pub use claims::IdentityClaims;
pub use extractors::{AuthIdentity, Identity};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::me_routes())
}

/// Token-minting helpers for tests. Production code only ever verifies.
#[cfg(test)]
pub(crate) mod testing {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use time::OffsetDateTime;

    use super::IdentityClaims;
    use crate::state::AppState;

    pub fn claims_for(uid: &str) -> IdentityClaims {
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        IdentityClaims {
            sub: uid.to_string(),
            iat: now,
            exp: now + 3600,
            iss: "test-issuer".into(),
            aud: "test-aud".into(),
            name: None,
            email: None,
            picture: None,
        }
    }

    pub fn encode_claims(state: &AppState, claims: &IdentityClaims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(state.config.auth.secret.as_bytes()),
        )
        .expect("encode test token")
    }

    pub fn mint_token(
        state: &AppState,
        uid: &str,
        name: Option<&str>,
        email: Option<&str>,
        picture: Option<&str>,
    ) -> String {
        let mut claims = claims_for(uid);
        claims.name = name.map(Into::into);
        claims.email = email.map(Into::into);
        claims.picture = picture.map(Into::into);
        encode_claims(state, &claims)
    }
}
