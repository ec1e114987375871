use time::OffsetDateTime;

use super::dto::{Recipe, TodayRecipe};
use super::matcher;
use crate::error::AppError;
use crate::schedule;
use crate::state::AppState;

/// Primary recipe for the instant's IST day and meal slot, or `None` when
/// nothing matches. The whole collection is scanned and filtered in memory.
pub async fn today_recipe(
    state: &AppState,
    now: OffsetDateTime,
) -> Result<Option<TodayRecipe>, AppError> {
    let key = schedule::resolve(now);
    let current_day = key.day_name();
    let current_meal_time = key.slot.as_str().to_string();

    let recipes = state.store.list_recipes().await?;
    let recipe = matcher::primary(&recipes, &current_day, &current_meal_time).cloned();

    Ok(recipe.map(|recipe| TodayRecipe {
        recipe,
        current_day,
        current_meal_time,
    }))
}

/// All recipes for a day/meal-time pair. Blank or absent parameters fall
/// back to the current IST values.
pub async fn alternate_recipes(
    state: &AppState,
    day: Option<String>,
    meal_time: Option<String>,
    now: OffsetDateTime,
) -> Result<Vec<Recipe>, AppError> {
    let key = schedule::resolve(now);
    let day = day
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| key.day_name());
    let meal_time = meal_time
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| key.slot.as_str().to_string());

    let recipes = state.store.list_recipes().await?;
    let matches = matcher::alternates(&recipes, &day, &meal_time)
        .into_iter()
        .cloned()
        .collect();
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use serde_json::json;
    use time::macros::datetime;

    async fn seed(state: &AppState, id: &str, day: &str, meal_time: &str) {
        let doc = json!({
            "title": format!("Recipe {id}"),
            "day": day,
            "mealTime": meal_time,
            "ingredients": ["x"],
            "steps": ["y"],
            "nutritionalBenefits": "z"
        });
        state
            .store
            .insert_recipe(id, &doc)
            .await
            .expect("seed recipe");
    }

    // Tuesday 12:00 IST == Tuesday 06:30 UTC.
    const TUESDAY_NOON_UTC: time::OffsetDateTime = datetime!(2025-03-04 06:30 UTC);

    #[tokio::test]
    async fn today_returns_the_seeded_tuesday_lunch() {
        let state = AppState::fake();
        seed(&state, "dal", "Tuesday", "lunch").await;

        let found = today_recipe(&state, TUESDAY_NOON_UTC)
            .await
            .expect("lookup")
            .expect("a recipe");
        assert_eq!(found.current_day, "Tuesday");
        assert_eq!(found.current_meal_time, "lunch");
        assert_eq!(found.recipe.id.as_deref(), Some("dal"));
    }

    #[tokio::test]
    async fn today_is_none_when_nothing_matches() {
        let state = AppState::fake();
        seed(&state, "dal", "Wednesday", "lunch").await;

        let found = today_recipe(&state, TUESDAY_NOON_UTC).await.expect("lookup");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn alternates_default_blank_params_to_current_ist_values() {
        let state = AppState::fake();
        seed(&state, "a", "Tuesday", "lunch").await;
        seed(&state, "b", "Tuesday", "dinner").await;

        let defaulted = alternate_recipes(&state, None, None, TUESDAY_NOON_UTC)
            .await
            .expect("lookup");
        assert_eq!(defaulted.len(), 1);
        assert_eq!(defaulted[0].id.as_deref(), Some("a"));

        // Empty strings behave like absent parameters.
        let blank = alternate_recipes(
            &state,
            Some(String::new()),
            Some(String::new()),
            TUESDAY_NOON_UTC,
        )
        .await
        .expect("lookup");
        assert_eq!(blank.len(), 1);
    }

    #[tokio::test]
    async fn alternates_honor_explicit_params() {
        let state = AppState::fake();
        seed(&state, "a", "Tuesday", "lunch").await;
        seed(&state, "b", "Sunday", "dinner").await;

        let found = alternate_recipes(
            &state,
            Some("sunday".into()),
            Some("DINNER".into()),
            TUESDAY_NOON_UTC,
        )
        .await
        .expect("lookup");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_deref(), Some("b"));
    }
}
