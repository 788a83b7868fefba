use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::transport::{
    Transport, TransportError, TransportMethod, TransportRequest, TransportResponse,
};

/// Production transport backed by a shared reqwest client. The client-level
/// timeout is the only network timeout in the pipeline; expiry surfaces as a
/// request error like any other transport failure.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn request(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = match request.method {
            TransportMethod::Get => self.client.get(&request.url),
            TransportMethod::Post => self.client.post(&request.url),
        };
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Request(format!("request failed: {e}")))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request(format!("failed to read body: {e}")))?
            .to_vec();
        Ok(TransportResponse { status, body })
    }
}
