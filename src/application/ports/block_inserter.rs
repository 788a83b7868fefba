use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::catalog::block::BlockDefinition;

/// Host document capability: place an instance of a registered block and
/// return its instance id.
#[async_trait]
pub trait BlockInserter: Send + Sync {
    async fn insert(
        &self,
        definition: &BlockDefinition,
        position: Option<usize>,
    ) -> anyhow::Result<Uuid>;
}
