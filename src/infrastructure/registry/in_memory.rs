use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::block_registry::BlockRegistry;
use crate::domain::catalog::block::BlockDefinition;

/// Process-local block-type registry. Hosts with their own registry supply a
/// `BlockRegistry` adapter instead; this one backs embedded and test setups,
/// with `register` exposed for the script-execution side to call into.
#[derive(Default)]
pub struct InMemoryBlockRegistry {
    blocks: RwLock<HashMap<String, BlockDefinition>>,
}

impl InMemoryBlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, definition: BlockDefinition) {
        tracing::debug!(block = %definition.name, "registering block type");
        self.blocks
            .write()
            .await
            .insert(definition.name.clone(), definition);
    }

    pub async fn unregister(&self, name: &str) -> bool {
        self.blocks.write().await.remove(name).is_some()
    }
}

#[async_trait]
impl BlockRegistry for InMemoryBlockRegistry {
    async fn lookup(&self, name: &str) -> Option<BlockDefinition> {
        self.blocks.read().await.get(name).cloned()
    }
}
