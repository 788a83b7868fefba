use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::block_registry::BlockRegistry;
use crate::domain::catalog::block::BlockDefinition;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("block {name} did not register within {timeout_ms} ms")]
    Timeout { name: String, timeout_ms: u64 },
}

/// Bridges side-effecting asset execution to a deterministic wait: polls the
/// registry until the block's definition appears or the deadline elapses.
pub struct RegistrationWatcher {
    registry: Arc<dyn BlockRegistry>,
    poll_interval: Duration,
}

impl RegistrationWatcher {
    pub fn new(registry: Arc<dyn BlockRegistry>, poll_interval: Duration) -> Self {
        Self {
            registry,
            poll_interval,
        }
    }

    /// Resolves as soon as `name` is registered. Fast assets may register
    /// synchronously during execution, before this is even called, so the
    /// registry is checked once up front before any wait.
    pub async fn wait_for(
        &self,
        name: &str,
        timeout: Duration,
    ) -> Result<BlockDefinition, RegistrationError> {
        if let Some(definition) = self.registry.lookup(name).await {
            tracing::debug!(block = %name, "block was already registered");
            return Ok(definition);
        }
        let poll = async {
            let mut tick = tokio::time::interval(self.poll_interval);
            // First tick fires immediately; skip it, we just looked.
            tick.tick().await;
            loop {
                tick.tick().await;
                if let Some(definition) = self.registry.lookup(name).await {
                    return definition;
                }
            }
        };
        match tokio::time::timeout(timeout, poll).await {
            Ok(definition) => Ok(definition),
            Err(_) => Err(RegistrationError::Timeout {
                name: name.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }
}
