use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, oneshot};

use crate::application::ports::script_host::ScriptHost;
use crate::application::ports::transport::{Transport, TransportRequest};

/// Cloneable so a single load outcome fans out to every waiter.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("failed to fetch asset {url}: {message}")]
    Fetch { url: String, message: String },
    #[error("asset {url} failed during execution: {message}")]
    Execute { url: String, message: String },
}

enum AssetSlot {
    /// A load is in flight; everyone else parks a waiter here.
    Loading {
        waiters: Vec<oneshot::Sender<Result<(), AssetError>>>,
    },
    Loaded,
}

/// Fetches and executes a script resource exactly once per distinct URL,
/// process-wide. The cache is the one piece of state shared between
/// concurrently running install pipelines. A failed load evicts its entry so
/// a later attempt can retry; success pins the entry as `Loaded` forever.
pub struct AssetInjector {
    transport: Arc<dyn Transport>,
    host: Arc<dyn ScriptHost>,
    cache: Mutex<HashMap<String, AssetSlot>>,
}

impl AssetInjector {
    pub fn new(transport: Arc<dyn Transport>, host: Arc<dyn ScriptHost>) -> Self {
        Self {
            transport,
            host,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub async fn load(&self, url: &str) -> Result<(), AssetError> {
        let waiter = {
            let mut cache = self.cache.lock().await;
            match cache.get_mut(url) {
                Some(AssetSlot::Loaded) => {
                    tracing::debug!(%url, "asset already loaded");
                    return Ok(());
                }
                Some(AssetSlot::Loading { waiters }) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Some(rx)
                }
                None => {
                    cache.insert(url.to_string(), AssetSlot::Loading { waiters: Vec::new() });
                    None
                }
            }
        };

        if let Some(rx) = waiter {
            // The first caller performs the fetch; we observe its outcome.
            return rx.await.unwrap_or_else(|_| {
                Err(AssetError::Fetch {
                    url: url.to_string(),
                    message: "asset load was abandoned".into(),
                })
            });
        }

        let outcome = self.fetch_and_execute(url).await;
        let waiters = {
            let mut cache = self.cache.lock().await;
            let drained = match cache.remove(url) {
                Some(AssetSlot::Loading { waiters }) => waiters,
                _ => Vec::new(),
            };
            if outcome.is_ok() {
                cache.insert(url.to_string(), AssetSlot::Loaded);
            }
            drained
        };
        for waiter in waiters {
            let _ = waiter.send(outcome.clone());
        }
        outcome
    }

    async fn fetch_and_execute(&self, url: &str) -> Result<(), AssetError> {
        let response = self
            .transport
            .request(TransportRequest::get(url))
            .await
            .map_err(|e| AssetError::Fetch {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        if !response.is_success() {
            return Err(AssetError::Fetch {
                url: url.to_string(),
                message: format!("asset server returned status {}", response.status),
            });
        }
        tracing::debug!(%url, bytes = response.body.len(), "executing block asset");
        self.host
            .execute(url, &response.body)
            .await
            .map_err(|e| AssetError::Execute {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}
