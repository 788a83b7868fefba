use async_trait::async_trait;
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMethod {
    Get,
    Post,
}

#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: TransportMethod,
    pub url: String,
    pub body: Option<JsonValue>,
}

impl TransportRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: TransportMethod::Get,
            url: url.into(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: JsonValue) -> Self {
        Self {
            method: TransportMethod::Post,
            url: url.into(),
            body: Some(body),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("transport request failed: {0}")]
    Request(String),
}

/// Outbound HTTP capability. Injectable so the pipeline is testable against
/// any transport that can match URLs and script responses.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
