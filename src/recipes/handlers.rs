use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use super::dto::{AlternatesQuery, Recipe, TodayRecipe};
use super::services;
use crate::{error::AppError, state::AppState};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes/today", get(today))
        .route("/recipes/alternates", get(alternates))
}

#[instrument(skip(state))]
pub async fn today(
    State(state): State<AppState>,
) -> Result<Json<Option<TodayRecipe>>, AppError> {
    let found = services::today_recipe(&state, OffsetDateTime::now_utc()).await?;
    match &found {
        Some(t) => info!(day = %t.current_day, meal_time = %t.current_meal_time, "today recipe"),
        None => info!("no recipe for the current day and meal time"),
    }
    Ok(Json(found))
}

#[instrument(skip(state))]
pub async fn alternates(
    State(state): State<AppState>,
    Query(query): Query<AlternatesQuery>,
) -> Result<Json<Vec<Recipe>>, AppError> {
    let found = services::alternate_recipes(
        &state,
        query.day,
        query.meal_time,
        OffsetDateTime::now_utc(),
    )
    .await?;
    info!(count = found.len(), "alternate recipes");
    Ok(Json(found))
}
