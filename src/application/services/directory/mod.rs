use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::application::ports::transport::{Transport, TransportRequest};
use crate::domain::catalog::block::BlockRecord;

#[derive(thiserror::Error, Debug)]
pub enum DirectoryError {
    #[error("directory request failed")]
    Network(#[source] anyhow::Error),
    #[error("directory response was not valid JSON")]
    Parse(#[source] serde_json::Error),
    #[error("directory declined the installation: {reason}")]
    InstallRejected { reason: String },
}

/// Routes of the remote block directory. Paths are joined onto the base
/// origin as-is; the search term travels as an url-encoded query parameter.
#[derive(Debug, Clone)]
pub struct DirectoryRoutes {
    pub base_url: String,
    pub search_path: String,
    pub install_path: String,
}

impl DirectoryRoutes {
    fn search_url(&self, term: &str) -> String {
        format!(
            "{}{}?term={}",
            self.base_url.trim_end_matches('/'),
            self.search_path,
            urlencoding::encode(term)
        )
    }

    fn install_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.install_path)
    }
}

/// Stateless request/response mapping against the directory service. Safe to
/// share and to invoke concurrently for different blocks.
pub struct DirectoryClient {
    transport: Arc<dyn Transport>,
    routes: DirectoryRoutes,
}

impl DirectoryClient {
    pub fn new(transport: Arc<dyn Transport>, routes: DirectoryRoutes) -> Self {
        Self { transport, routes }
    }

    /// Searches the directory. An empty or whitespace term is valid and
    /// returns the unfiltered catalog page; an empty response array is a
    /// successful search with zero results.
    pub async fn search(&self, term: &str) -> Result<Vec<BlockRecord>, DirectoryError> {
        let url = self.routes.search_url(term);
        tracing::debug!(%url, "searching block directory");
        let response = self
            .transport
            .request(TransportRequest::get(url))
            .await
            .map_err(|e| DirectoryError::Network(e.into()))?;
        if !response.is_success() {
            return Err(DirectoryError::Network(anyhow::anyhow!(
                "directory returned status {}",
                response.status
            )));
        }
        serde_json::from_slice::<Vec<BlockRecord>>(&response.body).map_err(DirectoryError::Parse)
    }

    /// Asks the directory to install the plugin backing `record`. The service
    /// answers `true` (the search record stays authoritative), an updated
    /// record, or `false` / an error object when it declines.
    pub async fn install(&self, record: &BlockRecord) -> Result<BlockRecord, DirectoryError> {
        let url = self.routes.install_url();
        tracing::debug!(%url, slug = %record.id, "requesting block installation");
        let response = self
            .transport
            .request(TransportRequest::post(
                url,
                serde_json::json!({ "slug": record.id }),
            ))
            .await
            .map_err(|e| DirectoryError::Network(e.into()))?;
        if !response.is_success() {
            return Err(DirectoryError::Network(anyhow::anyhow!(
                "directory returned status {}",
                response.status
            )));
        }
        let payload: JsonValue =
            serde_json::from_slice(&response.body).map_err(DirectoryError::Parse)?;
        match payload {
            JsonValue::Bool(true) => Ok(record.clone()),
            JsonValue::Bool(false) => Err(DirectoryError::InstallRejected {
                reason: "directory answered false".into(),
            }),
            JsonValue::Object(ref obj) => {
                // Error payloads carry a `message`; anything else must be an
                // updated record.
                if let Some(message) = obj.get("message").and_then(JsonValue::as_str) {
                    if !obj.contains_key("name") {
                        return Err(DirectoryError::InstallRejected {
                            reason: message.to_string(),
                        });
                    }
                }
                serde_json::from_value::<BlockRecord>(payload).map_err(DirectoryError::Parse)
            }
            other => Err(DirectoryError::InstallRejected {
                reason: format!("unexpected install response: {other}"),
            }),
        }
    }
}
