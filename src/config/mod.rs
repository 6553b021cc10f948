//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, GeminiConfig, LimitsConfig, LogFormat, LoggingConfig, ServerConfig, StorageConfig,
    GEMINI_API_KEY_ENV,
};
