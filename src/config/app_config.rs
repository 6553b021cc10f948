use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::categorization::{
    BASE_PROMPT_TOKENS, ESTIMATED_TOKENS_PER_PRODUCT, MAX_PRODUCTS_PER_REQUEST,
    MAX_TOKENS_PER_REQUEST,
};
use crate::domain::{CategorizationLimits, DAILY_LIMIT};
use crate::infrastructure::cache::{DEFAULT_CACHE_TTL_SECS, MAX_RECOMMENDED_ENTRIES};
use crate::infrastructure::llm::DEFAULT_GEMINI_BASE_URL;
use crate::infrastructure::services::{
    DEFAULT_ATTEMPT_INTERVAL_SECS, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT,
};

/// Environment variable read when no key is configured under `gemini`
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub gemini: GeminiConfig,
    pub limits: LimitsConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_products_per_request: usize,
    pub max_tokens_per_request: usize,
    pub tokens_per_product: usize,
    pub base_prompt_tokens: usize,
    pub daily_limit: u32,
    pub cache_ttl_secs: u64,
    pub cache_max_recommended: usize,
    pub attempt_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl GeminiConfig {
    /// Configured key, ignoring blank values
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_products_per_request: MAX_PRODUCTS_PER_REQUEST,
            max_tokens_per_request: MAX_TOKENS_PER_REQUEST,
            tokens_per_product: ESTIMATED_TOKENS_PER_PRODUCT,
            base_prompt_tokens: BASE_PROMPT_TOKENS,
            daily_limit: DAILY_LIMIT,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            cache_max_recommended: MAX_RECOMMENDED_ENTRIES,
            attempt_interval_secs: DEFAULT_ATTEMPT_INTERVAL_SECS,
        }
    }
}

impl LimitsConfig {
    pub fn categorization_limits(&self) -> CategorizationLimits {
        CategorizationLimits {
            max_products: self.max_products_per_request,
            max_tokens: self.max_tokens_per_request,
            tokens_per_product: self.tokens_per_product,
            base_prompt_tokens: self.base_prompt_tokens,
        }
    }

    pub fn cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn attempt_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.attempt_interval_secs)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".easytotal"),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.apply_key_fallback(std::env::var(GEMINI_API_KEY_ENV).ok());

        Ok(app_config)
    }

    /// Use `key` when no Gemini key is configured
    pub fn apply_key_fallback(&mut self, key: Option<String>) {
        if self.gemini.api_key().is_none() {
            self.gemini.api_key = key.filter(|k| !k.trim().is_empty());
        }
    }
}
