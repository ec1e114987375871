use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub auth: AuthConfig,
    pub assistant: AssistantConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let auth = AuthConfig {
            secret: std::env::var("AUTH_SECRET")?,
            issuer: std::env::var("AUTH_ISSUER").unwrap_or_else(|_| "rasoi".into()),
            audience: std::env::var("AUTH_AUDIENCE").unwrap_or_else(|_| "rasoi-users".into()),
        };
        let assistant = AssistantConfig {
            base_url: std::env::var("ASSISTANT_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            api_key: std::env::var("ASSISTANT_API_KEY")?,
            model: std::env::var("ASSISTANT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
            max_tokens: std::env::var("ASSISTANT_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(500),
        };
        Ok(Self {
            database_url,
            auth,
            assistant,
        })
    }
}
