use async_trait::async_trait;

/// Executes fetched script bytes in the host runtime. Execution is opaque to
/// the pipeline; a well-behaved asset registers its block with the registry
/// as a side effect.
#[async_trait]
pub trait ScriptHost: Send + Sync {
    async fn execute(&self, url: &str, source: &[u8]) -> anyhow::Result<()>;
}
