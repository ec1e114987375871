use serde::{Deserialize, Serialize};

/// Identity fields exposed to the client after sign-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub uid: String,
    pub display_name: String,
    pub email: String,
    #[serde(rename = "photoURL")]
    pub photo_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub user: PublicUser,
    pub needs_onboarding: bool,
}

/// Onboarding form payload. Groups the user skipped arrive absent and are
/// stored as empty sequences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreferencesForm {
    pub goals: Vec<String>,
    pub dietary_preferences: Vec<String>,
    pub cuisine_preferences: Vec<String>,
    pub meal_habits: Vec<String>,
}
