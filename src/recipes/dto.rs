use serde::{Deserialize, Serialize};

/// Recipe document as stored and served. Documents may be sparse; missing
/// fields decode to their empty values rather than failing the whole list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipe {
    /// Store key, attached on read. Absent on documents not yet inserted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub day: String,
    pub meal_time: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub nutritional_benefits: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_for: Option<String>,
}

/// What to cook right now, with the resolved day and meal time echoed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayRecipe {
    pub recipe: Recipe,
    pub current_day: String,
    pub current_meal_time: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlternatesQuery {
    pub day: Option<String>,
    pub meal_time: Option<String>,
}
