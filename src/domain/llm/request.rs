use serde::{Deserialize, Serialize};

/// Parameters for a single-turn text generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl LlmRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: None,
            max_output_tokens: None,
        }
    }

    pub fn builder() -> LlmRequestBuilder {
        LlmRequestBuilder::new()
    }
}

/// Builder for LlmRequest
#[derive(Debug, Default)]
pub struct LlmRequestBuilder {
    prompt: String,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
}

impl LlmRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    pub fn build(self) -> LlmRequest {
        LlmRequest {
            prompt: self.prompt,
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = LlmRequest::builder()
            .prompt("Categorize: Leche")
            .temperature(0.2)
            .max_output_tokens(512)
            .build();

        assert_eq!(request.prompt, "Categorize: Leche");
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.max_output_tokens, Some(512));
    }

    #[test]
    fn test_request_serialization_skips_unset() {
        let request = LlmRequest::new("hola");
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"prompt":"hola"}"#);
    }
}
