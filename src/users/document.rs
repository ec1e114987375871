use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{serde::rfc3339, OffsetDateTime};

pub const SCHEMA_VERSION: u32 = 2;

/// Stored per-user document. Every field always serializes, so a written
/// document can never carry an undefined value; missing fields on decode
/// fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDocument {
    pub schema_version: u32,
    pub uid: String,
    pub display_name: String,
    pub email: String,
    #[serde(rename = "photoURL")]
    pub photo_url: String,
    pub goals: Vec<String>,
    pub dietary_preferences: Vec<String>,
    pub cuisine_preferences: Vec<String>,
    pub meal_habits: Vec<String>,
    pub onboarding_completed: bool,
    #[serde(with = "rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Default for UserDocument {
    fn default() -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            schema_version: SCHEMA_VERSION,
            uid: String::new(),
            display_name: String::new(),
            email: String::new(),
            photo_url: String::new(),
            goals: Vec::new(),
            dietary_preferences: Vec::new(),
            cuisine_preferences: Vec::new(),
            meal_habits: Vec::new(),
            onboarding_completed: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Pre-write normalization for documents written by earlier schema
/// versions. Currently: drop the retired `name` key. Runs on every read
/// that precedes a full-document replace, so a legacy document is rewritten
/// clean by its next write.
pub fn scrub(mut doc: Value) -> Value {
    if let Some(map) = doc.as_object_mut() {
        map.remove("name");
    }
    doc
}
