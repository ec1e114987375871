use anyhow::Context;
use time::OffsetDateTime;
use tracing::warn;

use super::document::{self, UserDocument, SCHEMA_VERSION};
use super::dto::{PreferencesForm, PublicUser, SignInResponse};
use crate::auth::Identity;
use crate::error::AppError;
use crate::state::AppState;

/// Read, scrub and decode a user document. Documents a current decoder
/// cannot read are treated as absent and rebuilt by the next write.
pub async fn load_document(
    state: &AppState,
    uid: &str,
) -> Result<Option<UserDocument>, AppError> {
    let Some(raw) = state.store.get_user(uid).await? else {
        return Ok(None);
    };
    match serde_json::from_value::<UserDocument>(document::scrub(raw)) {
        Ok(doc) => Ok(Some(doc)),
        Err(e) => {
            warn!(error = %e, uid, "unreadable user document; rebuilding");
            Ok(None)
        }
    }
}

async fn store_document(state: &AppState, doc: &UserDocument) -> Result<(), AppError> {
    let value = serde_json::to_value(doc).context("encode user document")?;
    state.store.put_user(&doc.uid, &value).await?;
    Ok(())
}

fn public_user(doc: &UserDocument) -> PublicUser {
    PublicUser {
        uid: doc.uid.clone(),
        display_name: doc.display_name.clone(),
        email: doc.email.clone(),
        photo_url: doc.photo_url.clone(),
    }
}

/// First sign-in creates the document with empty preferences; repeat
/// sign-ins refresh the identity fields and leave preferences and
/// `createdAt` alone. Onboarding is owed until a preferences write lands.
pub async fn sign_in(state: &AppState, identity: &Identity) -> Result<SignInResponse, AppError> {
    if identity.uid.trim().is_empty() {
        return Err(AppError::MissingIdentity);
    }

    let existing = load_document(state, &identity.uid).await?;
    let needs_onboarding = match &existing {
        Some(doc) => !doc.onboarding_completed,
        None => true,
    };

    let now = OffsetDateTime::now_utc();
    let mut doc = existing.unwrap_or_else(|| UserDocument {
        uid: identity.uid.clone(),
        created_at: now,
        ..Default::default()
    });

    doc.schema_version = SCHEMA_VERSION;
    doc.uid = identity.uid.clone();
    doc.display_name = identity.display_name.clone();
    doc.email = identity.email.clone();
    doc.photo_url = identity.photo_url.clone();
    doc.updated_at = now;

    store_document(state, &doc).await?;

    Ok(SignInResponse {
        user: public_user(&doc),
        needs_onboarding,
    })
}

/// Full-document preferences write: absent form groups become empty
/// sequences, `onboardingCompleted` flips to true, identity fields and
/// `createdAt` are preserved. Idempotent except for `updatedAt`.
pub async fn save_preferences(
    state: &AppState,
    uid: &str,
    form: &PreferencesForm,
) -> Result<UserDocument, AppError> {
    if uid.trim().is_empty() {
        return Err(AppError::MissingIdentity);
    }

    let now = OffsetDateTime::now_utc();
    let mut doc = load_document(state, uid).await?.unwrap_or_else(|| UserDocument {
        uid: uid.to_string(),
        created_at: now,
        ..Default::default()
    });

    doc.schema_version = SCHEMA_VERSION;
    doc.uid = uid.to_string();
    doc.goals = form.goals.clone();
    doc.dietary_preferences = form.dietary_preferences.clone();
    doc.cuisine_preferences = form.cuisine_preferences.clone();
    doc.meal_habits = form.meal_habits.clone();
    doc.onboarding_completed = true;
    doc.updated_at = now;

    store_document(state, &doc).await?;
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use serde_json::json;

    fn identity(uid: &str) -> Identity {
        Identity {
            uid: uid.into(),
            display_name: "Priya".into(),
            email: "priya@example.com".into(),
            photo_url: "https://example.com/p.jpg".into(),
        }
    }

    #[tokio::test]
    async fn first_sign_in_creates_the_document_and_owes_onboarding() {
        let state = AppState::fake();

        let response = sign_in(&state, &identity("u1")).await.expect("sign in");
        assert!(response.needs_onboarding);
        assert_eq!(response.user.display_name, "Priya");

        let doc = load_document(&state, "u1")
            .await
            .expect("load")
            .expect("document");
        assert!(!doc.onboarding_completed);
        assert!(doc.goals.is_empty());
        assert_eq!(doc.email, "priya@example.com");
    }

    #[tokio::test]
    async fn repeat_sign_in_preserves_preferences_and_created_at() {
        let state = AppState::fake();
        sign_in(&state, &identity("u1")).await.expect("sign in");

        let form = PreferencesForm {
            goals: vec!["Eat healthier".into()],
            ..Default::default()
        };
        let saved = save_preferences(&state, "u1", &form).await.expect("save");

        let mut refreshed = identity("u1");
        refreshed.display_name = "Priya S".into();
        let response = sign_in(&state, &refreshed).await.expect("sign in again");
        assert!(!response.needs_onboarding);

        let doc = load_document(&state, "u1")
            .await
            .expect("load")
            .expect("document");
        assert_eq!(doc.display_name, "Priya S");
        assert_eq!(doc.goals, vec!["Eat healthier".to_string()]);
        assert_eq!(doc.created_at, saved.created_at);
        assert!(doc.onboarding_completed);
    }

    #[tokio::test]
    async fn blank_uid_is_rejected_before_any_store_access() {
        let state = AppState::fake();
        let err = save_preferences(&state, "  ", &PreferencesForm::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingIdentity));

        let err = sign_in(
            &state,
            &Identity {
                uid: String::new(),
                display_name: String::new(),
                email: String::new(),
                photo_url: String::new(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::MissingIdentity));
    }

    #[tokio::test]
    async fn empty_form_persists_four_empty_sequences_and_completes_onboarding() {
        let state = AppState::fake();

        let doc = save_preferences(&state, "u1", &PreferencesForm::default())
            .await
            .expect("save");
        assert!(doc.goals.is_empty());
        assert!(doc.dietary_preferences.is_empty());
        assert!(doc.cuisine_preferences.is_empty());
        assert!(doc.meal_habits.is_empty());
        assert!(doc.onboarding_completed);

        // The stored value carries every key with a defined value.
        let raw = state
            .store
            .get_user("u1")
            .await
            .expect("get")
            .expect("stored doc");
        for key in [
            "uid",
            "goals",
            "dietaryPreferences",
            "cuisinePreferences",
            "mealHabits",
            "onboardingCompleted",
            "createdAt",
            "updatedAt",
        ] {
            assert!(!raw[key].is_null(), "{key} should be defined");
        }
    }

    #[tokio::test]
    async fn save_is_idempotent_except_for_the_update_timestamp() {
        let state = AppState::fake();
        let form = PreferencesForm {
            goals: vec!["Learn new cuisines".into()],
            dietary_preferences: vec!["Vegetarian".into()],
            cuisine_preferences: vec!["South Indian".into()],
            meal_habits: vec!["Dinner: Daily".into()],
        };

        let first = save_preferences(&state, "u1", &form).await.expect("save");
        let second = save_preferences(&state, "u1", &form).await.expect("save");

        let mut normalized = second.clone();
        normalized.updated_at = first.updated_at;
        assert_eq!(normalized, first);
    }

    #[tokio::test]
    async fn legacy_name_field_is_gone_after_the_next_write() {
        let state = AppState::fake();
        let legacy = json!({
            "uid": "u1",
            "name": "Priya S",
            "displayName": "Priya",
            "email": "priya@example.com",
            "photoURL": "",
            "goals": ["Eat healthier"],
            "onboardingCompleted": true,
            "createdAt": "2024-06-01T10:00:00Z",
            "updatedAt": "2024-06-01T10:00:00Z"
        });
        state
            .store
            .put_user("u1", &legacy)
            .await
            .expect("seed legacy doc");

        let form = PreferencesForm {
            goals: vec!["Eat healthier".into()],
            ..Default::default()
        };
        save_preferences(&state, "u1", &form).await.expect("save");

        let raw = state
            .store
            .get_user("u1")
            .await
            .expect("get")
            .expect("stored doc");
        assert!(raw.get("name").is_none());
        assert_eq!(raw["displayName"], "Priya");
        // createdAt survives the rewrite.
        assert_eq!(raw["createdAt"], "2024-06-01T10:00:00Z");
    }

    #[tokio::test]
    async fn unreadable_document_is_rebuilt_clean() {
        let state = AppState::fake();
        state
            .store
            .put_user("u1", &json!({ "uid": "u1", "goals": "not-a-list" }))
            .await
            .expect("seed broken doc");

        assert!(load_document(&state, "u1").await.expect("load").is_none());

        let doc = save_preferences(&state, "u1", &PreferencesForm::default())
            .await
            .expect("save");
        assert!(doc.goals.is_empty());
        assert!(doc.onboarding_completed);
    }
}
