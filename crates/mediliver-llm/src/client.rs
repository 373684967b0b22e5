//! Model client abstraction and the `generateContent` response envelope.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Default model name.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default REST endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Transport-level errors.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Model returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

pub type ModelResult<T> = Result<T, ModelError>;

/// A generative model that turns a request body into answer text.
pub trait GenerativeModel: Send + Sync {
    fn generate(&self, request: &Value) -> impl Future<Output = ModelResult<String>> + Send;
}

/// `generateContent` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts joined. Empty if there is none.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Scripted model for tests.
#[derive(Default)]
pub struct MockModel {
    replies: Mutex<VecDeque<ModelResult<String>>>,
    requests: Mutex<Vec<Value>>,
    delay: Option<Duration>,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every call after `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a reply.
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()));
        self
    }

    /// Queue a failure.
    pub fn fail(self, error: ModelError) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, reply: ModelResult<String>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    /// Bodies received so far.
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl GenerativeModel for MockModel {
    async fn generate(&self, request: &Value) -> ModelResult<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .lock()
            .map_err(|e| ModelError::Request(e.to_string()))?
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::Request("no scripted reply".into())))
    }
}
