use axum::async_trait;
use time::OffsetDateTime;

use crate::assistant::services as assistant;
use crate::auth::extractors::identity_for_token;
use crate::error::AppError;
use crate::recipes::dto::{Recipe, TodayRecipe};
use crate::recipes::services as recipes;
use crate::state::AppState;
use crate::users::dto::{PreferencesForm, SignInResponse};
use crate::users::services as users;

/// Operations the session controller needs from the backing service.
/// Tests substitute scripted implementations to drive load ordering and
/// failures deterministically.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn sign_in(&self, token: &str) -> Result<SignInResponse, AppError>;
    async fn today_recipe(&self, now: OffsetDateTime) -> Result<Option<TodayRecipe>, AppError>;
    async fn alternates(&self, day: &str, meal_time: &str) -> Result<Vec<Recipe>, AppError>;
    async fn save_preferences(&self, uid: &str, form: &PreferencesForm) -> Result<(), AppError>;
    async fn ask(&self, recipe: &Recipe, question: &str) -> Result<String, AppError>;
}

/// In-process backend over the service layer, so a whole session can run
/// against the real lookup, write and assistant paths.
pub struct LocalBackend {
    state: AppState,
}

impl LocalBackend {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Backend for LocalBackend {
    async fn sign_in(&self, token: &str) -> Result<SignInResponse, AppError> {
        let identity = identity_for_token(&self.state, token)?;
        users::sign_in(&self.state, &identity).await
    }

    async fn today_recipe(&self, now: OffsetDateTime) -> Result<Option<TodayRecipe>, AppError> {
        recipes::today_recipe(&self.state, now).await
    }

    async fn alternates(&self, day: &str, meal_time: &str) -> Result<Vec<Recipe>, AppError> {
        recipes::alternate_recipes(
            &self.state,
            Some(day.to_string()),
            Some(meal_time.to_string()),
            OffsetDateTime::now_utc(),
        )
        .await
    }

    async fn save_preferences(&self, uid: &str, form: &PreferencesForm) -> Result<(), AppError> {
        users::save_preferences(&self.state, uid, form).await?;
        Ok(())
    }

    async fn ask(&self, recipe: &Recipe, question: &str) -> Result<String, AppError> {
        assistant::ask(&self.state, Some(recipe), question).await
    }
}
