//! Gemini REST backend.

use serde_json::Value;

use crate::client::{
    GenerateContentResponse, GenerativeModel, ModelError, ModelResult, DEFAULT_ENDPOINT,
    DEFAULT_MODEL,
};

/// `generateContent` over HTTPS.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Client for the public endpoint and default model.
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_MODEL, api_key)
    }

    pub fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: &Value) -> ModelResult<String> {
        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ModelError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Malformed(e.to_string()))?;
        tracing::debug!(model = %self.model, candidates = parsed.candidates.len(), "model answered");
        Ok(parsed.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url() {
        let client = GeminiClient::new("https://example.test/v1beta/", "gemini-x", "key");
        assert_eq!(client.url(), "https://example.test/v1beta/models/gemini-x:generateContent");
        assert!(GeminiClient::with_key("k").url().contains(DEFAULT_MODEL));
    }
}
