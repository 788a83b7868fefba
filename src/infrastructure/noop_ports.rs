use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::block_inserter::BlockInserter;
use crate::application::ports::script_host::ScriptHost;
use crate::domain::catalog::block::BlockDefinition;

/// Accepts any script without running it, for search-only embeddings and
/// tests that exercise everything up to execution.
#[derive(Debug, Clone, Default)]
pub struct NoopScriptHost;

/// Discards insertions and hands back a fresh instance id.
#[derive(Debug, Clone, Default)]
pub struct NullBlockInserter;

#[async_trait]
impl ScriptHost for NoopScriptHost {
    async fn execute(&self, url: &str, _source: &[u8]) -> anyhow::Result<()> {
        tracing::debug!(%url, "noop script host skipped execution");
        Ok(())
    }
}

#[async_trait]
impl BlockInserter for NullBlockInserter {
    async fn insert(
        &self,
        definition: &BlockDefinition,
        _position: Option<usize>,
    ) -> anyhow::Result<Uuid> {
        tracing::debug!(block = %definition.name, "null inserter discarded block instance");
        Ok(Uuid::new_v4())
    }
}
