//! LLM provider implementations

mod gemini;
mod http_client;

pub use gemini::{GeminiProvider, DEFAULT_GEMINI_BASE_URL};
pub use http_client::{HttpClient, HttpClientTrait};

#[cfg(test)]
pub use http_client::mock;
