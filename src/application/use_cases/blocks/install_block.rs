use crate::application::services::orchestrator::InstallOrchestrator;
use crate::domain::catalog::block::BlockRecord;
use crate::domain::catalog::install::{InstallFailure, InstalledBlock};

#[derive(thiserror::Error, Debug)]
pub enum InstallBlockError {
    #[error("invalid block name: {0}")]
    InvalidName(String),
    #[error(transparent)]
    Pipeline(#[from] InstallFailure),
}

/// Entry point for installing one directory record. Validates the block name
/// before any network traffic, then hands off to the orchestrator.
pub struct InstallBlock<'a> {
    pub orchestrator: &'a InstallOrchestrator,
}

impl<'a> InstallBlock<'a> {
    pub async fn execute(&self, record: &BlockRecord) -> Result<InstalledBlock, InstallBlockError> {
        if !record.has_valid_name() {
            return Err(InstallBlockError::InvalidName(record.name.clone()));
        }
        let installed = self.orchestrator.install(record).await?;
        Ok(installed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::application::ports::transport::{
        Transport, TransportError, TransportRequest, TransportResponse,
    };
    use crate::application::services::assets::AssetInjector;
    use crate::application::services::directory::{DirectoryClient, DirectoryRoutes};
    use crate::application::services::registration::RegistrationWatcher;
    use crate::infrastructure::noop_ports::{NoopScriptHost, NullBlockInserter};
    use crate::infrastructure::registry::in_memory::InMemoryBlockRegistry;

    struct UnreachableTransport;

    #[async_trait]
    impl Transport for UnreachableTransport {
        async fn request(
            &self,
            request: TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            panic!("no request expected, got {}", request.url);
        }
    }

    #[tokio::test]
    async fn rejects_malformed_names_before_any_network_traffic() {
        let transport = Arc::new(UnreachableTransport);
        let routes = DirectoryRoutes {
            base_url: "https://example.test".into(),
            search_path: "/block-directory/search".into(),
            install_path: "/block-directory/install".into(),
        };
        let directory = Arc::new(DirectoryClient::new(transport.clone(), routes));
        let registry = Arc::new(InMemoryBlockRegistry::new());
        let orchestrator = InstallOrchestrator::new(
            directory,
            Arc::new(AssetInjector::new(transport, Arc::new(NoopScriptHost))),
            Arc::new(RegistrationWatcher::new(registry, Duration::from_millis(50))),
            Arc::new(NullBlockInserter),
            Duration::from_millis(500),
        );

        let record: BlockRecord = serde_json::from_value(serde_json::json!({
            "name": "@#$@@Dsdsdfw2#$@",
            "title": "Not a block",
            "id": "not-a-block",
        }))
        .unwrap();

        let use_case = InstallBlock {
            orchestrator: &orchestrator,
        };
        assert!(matches!(
            use_case.execute(&record).await,
            Err(InstallBlockError::InvalidName(_))
        ));
    }
}
