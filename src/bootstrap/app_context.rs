use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::block_inserter::BlockInserter;
use crate::application::ports::block_registry::BlockRegistry;
use crate::application::ports::script_host::ScriptHost;
use crate::application::ports::transport::Transport;
use crate::application::services::assets::AssetInjector;
use crate::application::services::directory::{DirectoryClient, DirectoryRoutes};
use crate::application::services::orchestrator::InstallOrchestrator;
use crate::application::services::registration::RegistrationWatcher;
use crate::application::services::search::SearchSession;
use crate::bootstrap::config::Config;

/// Capabilities the embedding host supplies to the pipeline.
pub struct HostPorts {
    pub transport: Arc<dyn Transport>,
    pub registry: Arc<dyn BlockRegistry>,
    pub inserter: Arc<dyn BlockInserter>,
    pub script_host: Arc<dyn ScriptHost>,
}

/// Wires the pipeline services onto the host's ports.
#[derive(Clone)]
pub struct PipelineContext {
    pub cfg: Config,
    directory: Arc<DirectoryClient>,
    injector: Arc<AssetInjector>,
    orchestrator: InstallOrchestrator,
    search: SearchSession,
}

impl PipelineContext {
    pub fn new(cfg: Config, ports: HostPorts) -> Self {
        let routes = DirectoryRoutes {
            base_url: cfg.directory_base_url.clone(),
            search_path: cfg.search_path.clone(),
            install_path: cfg.install_path.clone(),
        };
        let directory = Arc::new(DirectoryClient::new(ports.transport.clone(), routes));
        let injector = Arc::new(AssetInjector::new(
            ports.transport.clone(),
            ports.script_host.clone(),
        ));
        let watcher = Arc::new(RegistrationWatcher::new(
            ports.registry.clone(),
            Duration::from_millis(cfg.registration_poll_ms),
        ));
        let orchestrator = InstallOrchestrator::new(
            directory.clone(),
            injector.clone(),
            watcher,
            ports.inserter.clone(),
            Duration::from_millis(cfg.registration_timeout_ms),
        );
        let search = SearchSession::new(directory.clone());
        Self {
            cfg,
            directory,
            injector,
            orchestrator,
            search,
        }
    }

    pub fn directory(&self) -> Arc<DirectoryClient> {
        self.directory.clone()
    }

    pub fn injector(&self) -> Arc<AssetInjector> {
        self.injector.clone()
    }

    pub fn orchestrator(&self) -> InstallOrchestrator {
        self.orchestrator.clone()
    }

    pub fn search(&self) -> SearchSession {
        self.search.clone()
    }
}
