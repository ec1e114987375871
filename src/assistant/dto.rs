use serde::Deserialize;

use crate::recipes::dto::Recipe;

/// Ask payload: the displayed recipe plus the user's question. Both are
/// validated by the service before anything leaves the process.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AskRequest {
    pub recipe: Option<Recipe>,
    pub question: Option<String>,
}
