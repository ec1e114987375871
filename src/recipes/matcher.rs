use super::dto::Recipe;

/// Day value snack recipes are stored under; the slot is day-independent.
pub const ANY_DAY: &str = "Any";

const SNACK_SLOT: &str = "snack";

/// All recipes for a day/meal-time pair, in store order. Matching is
/// case-insensitive on both fields. A snack query matches on meal time
/// alone; the day argument is ignored.
pub fn alternates<'a>(recipes: &'a [Recipe], day: &str, meal_time: &str) -> Vec<&'a Recipe> {
    let snack = meal_time.eq_ignore_ascii_case(SNACK_SLOT);
    recipes
        .iter()
        .filter(|r| {
            if snack {
                return r.meal_time.eq_ignore_ascii_case(meal_time);
            }
            // Documents without both fields never match.
            !r.day.is_empty()
                && !r.meal_time.is_empty()
                && r.day.eq_ignore_ascii_case(day)
                && r.meal_time.eq_ignore_ascii_case(meal_time)
        })
        .collect()
}

/// The recipe shown by default: the first alternate, when any match.
pub fn primary<'a>(recipes: &'a [Recipe], day: &str, meal_time: &str) -> Option<&'a Recipe> {
    alternates(recipes, day, meal_time).into_iter().next()
}
