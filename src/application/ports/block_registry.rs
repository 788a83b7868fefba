use async_trait::async_trait;

use crate::domain::catalog::block::BlockDefinition;

/// Read side of the host's runtime block-type registry. Registration itself
/// is performed by executed assets calling back into the host, never by this
/// crate; the pipeline only observes it through `lookup`.
#[async_trait]
pub trait BlockRegistry: Send + Sync {
    async fn lookup(&self, name: &str) -> Option<BlockDefinition>;
}
