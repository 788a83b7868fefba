use crate::application::services::directory::{DirectoryClient, DirectoryError};
use crate::domain::catalog::block::BlockRecord;

/// One-shot directory search, for callers that do not need the session's
/// supersede-on-new-query behavior.
pub struct SearchBlocks<'a> {
    pub directory: &'a DirectoryClient,
}

impl<'a> SearchBlocks<'a> {
    pub async fn execute(&self, term: &str) -> Result<Vec<BlockRecord>, DirectoryError> {
        self.directory.search(term).await
    }
}
