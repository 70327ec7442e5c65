use anyhow::{Context, Result};
use std::env;

/// Credentials for the content analyzer (OpenAI only).
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub openai_api_key: String,
}

/// Credentials for the morning update (OpenAI + news + weather).
#[derive(Debug, Clone)]
pub struct MorningConfig {
    pub openai_api_key: String,
    pub newsapi_api_key: String,
    pub meteosource_api_key: String,
}

impl AnalyzerConfig {
    pub fn from_env() -> Result<Self> {
        try_load_dotenv();

        let openai_api_key = require_var("API_KEY_OPENAI")?;

        Ok(Self { openai_api_key })
    }
}

impl MorningConfig {
    pub fn from_env() -> Result<Self> {
        try_load_dotenv();

        let openai_api_key = require_var("API_KEY_OPENAI")?;
        let newsapi_api_key = require_var("API_KEY_NEWSAPI")?;
        let meteosource_api_key = require_var("API_KEY_METEOSOURCE")?;

        Ok(Self {
            openai_api_key,
            newsapi_api_key,
            meteosource_api_key,
        })
    }
}

fn require_var(name: &str) -> Result<String> {
    env::var(name).with_context(|| {
        format!(
            "{} not found.\n\n\
            To fix this, create a .env file (here or in ~/.config/ai-briefing/.env) with:\n  \
            API_KEY_OPENAI=your_key_here\n  \
            API_KEY_NEWSAPI=your_key_here\n  \
            API_KEY_METEOSOURCE=your_key_here\n\n\
            Only the keys the tool you are running needs are required.",
            name
        )
    })
}

fn try_load_dotenv() {
    // Try locations in order of preference:

    // 1. Current directory (for development)
    if dotenvy::dotenv().is_ok() {
        return;
    }

    // 2. ~/.config/ai-briefing/.env (standard config location)
    if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("ai-briefing").join(".env");
        if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
            return;
        }
    }

    // 3. ~/.env (home directory)
    if let Some(home_dir) = dirs::home_dir() {
        let home_path = home_dir.join(".env");
        if home_path.exists() && dotenvy::from_path(&home_path).is_ok() {
            return;
        }
    }

    // If none found, that's okay - environment variables might be set system-wide
}
