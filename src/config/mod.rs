//! Configuration loaded from the environment.

use crate::agent::AgentOptions;

/// Default chat model when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default turn cap for a run.
pub const DEFAULT_MAX_TURNS: u32 = 5;

/// Crate-level configuration.
///
/// Everything is resolvable from the environment; `from_env` loads a `.env`
/// file when present and falls back to defaults otherwise.
#[derive(Debug, Clone)]
pub struct DroverConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub max_turns: u32,
    pub tracing_enabled: bool,
}

impl Default for DroverConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: Some(0.7),
            top_p: Some(1.0),
            max_turns: DEFAULT_MAX_TURNS,
            tracing_enabled: false,
        }
    }
}

impl DroverConfig {
    /// Load from environment variables (OPENAI_API_KEY, OPENAI_MODEL, etc.).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let mut config = Self::default();

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            config.base_url = Some(url);
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            config.model = model;
        }
        if let Ok(temp) = std::env::var("OPENAI_TEMPERATURE") {
            if let Ok(parsed) = temp.parse::<f64>() {
                config.temperature = Some(parsed);
            }
        }
        if let Ok(top_p) = std::env::var("OPENAI_TOP_P") {
            if let Ok(parsed) = top_p.parse::<f64>() {
                config.top_p = Some(parsed);
            }
        }
        if let Ok(max) = std::env::var("AGENTS_MAX_TURNS") {
            if let Ok(parsed) = max.parse::<u32>() {
                config.max_turns = parsed;
            }
        }
        if let Ok(flag) = std::env::var("AGENTS_TRACING") {
            config.tracing_enabled = matches!(flag.as_str(), "1" | "true" | "yes");
        }

        config
    }

    /// Default agent options derived from this config.
    pub fn default_options(&self) -> AgentOptions {
        AgentOptions::default()
            .with_model(self.model.clone())
            .with_maybe_temperature(self.temperature)
            .with_maybe_top_p(self.top_p)
    }
}
