use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, broadcast};

use crate::application::ports::block_inserter::BlockInserter;
use crate::application::services::assets::{AssetError, AssetInjector};
use crate::application::services::directory::{DirectoryClient, DirectoryError};
use crate::application::services::registration::RegistrationWatcher;
use crate::domain::catalog::block::BlockRecord;
use crate::domain::catalog::install::{InstallFailure, InstallState, InstalledBlock};

pub type InstallOutcome = Result<InstalledBlock, InstallFailure>;

struct InstallSlot {
    state: InstallState,
    /// Present while a pipeline is in flight; late callers subscribe here.
    done: Option<broadcast::Sender<InstallOutcome>>,
    /// Recorded once the pipeline reaches a terminal state.
    outcome: Option<InstallOutcome>,
}

/// Drives one install pipeline per block name through
/// install → asset injection → registration wait → insertion.
///
/// Installs for different names run independently; a second request for a
/// name that is already mid-flight attaches to the running pipeline instead
/// of starting a duplicate one. Pipelines run as spawned tasks so they
/// finish (or fail) even if the requesting caller goes away — script
/// execution is irreversible, so there is no mid-flight abort.
#[derive(Clone)]
pub struct InstallOrchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    directory: Arc<DirectoryClient>,
    injector: Arc<AssetInjector>,
    watcher: Arc<RegistrationWatcher>,
    inserter: Arc<dyn BlockInserter>,
    registration_timeout: Duration,
    slots: Mutex<HashMap<String, InstallSlot>>,
}

impl InstallOrchestrator {
    pub fn new(
        directory: Arc<DirectoryClient>,
        injector: Arc<AssetInjector>,
        watcher: Arc<RegistrationWatcher>,
        inserter: Arc<dyn BlockInserter>,
        registration_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                directory,
                injector,
                watcher,
                inserter,
                registration_timeout,
                slots: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Current state of the pipeline for `name`; `Idle` when none was ever
    /// started.
    pub async fn state(&self, name: &str) -> InstallState {
        self.inner
            .slots
            .lock()
            .await
            .get(name)
            .map(|slot| slot.state.clone())
            .unwrap_or(InstallState::Idle)
    }

    /// Installs `record` and inserts an instance of it into the document.
    /// Attaches to an already-running pipeline for the same name; returns the
    /// recorded outcome for a name that was already inserted; restarts from
    /// scratch after a failure.
    pub async fn install(&self, record: &BlockRecord) -> InstallOutcome {
        let mut rx = {
            let mut slots = self.inner.slots.lock().await;
            let attached = match slots.get(&record.name) {
                Some(slot) => {
                    if let Some(done) = &slot.done {
                        tracing::debug!(block = %record.name, "attaching to in-flight install");
                        Some(done.subscribe())
                    } else if slot.state == InstallState::Inserted {
                        tracing::debug!(block = %record.name, "block already inserted");
                        return slot.outcome.clone().unwrap_or(Err(InstallFailure::Aborted));
                    } else {
                        None
                    }
                }
                None => None,
            };
            match attached {
                Some(rx) => rx,
                None => self.start_pipeline(&mut slots, record),
            }
        };
        match rx.recv().await {
            Ok(outcome) => outcome,
            Err(_) => Err(InstallFailure::Aborted),
        }
    }

    /// Caller holds the slot lock. Replaces any stale (failed) slot and
    /// spawns the pipeline task.
    fn start_pipeline(
        &self,
        slots: &mut HashMap<String, InstallSlot>,
        record: &BlockRecord,
    ) -> broadcast::Receiver<InstallOutcome> {
        tracing::info!(block = %record.name, "installing block");
        let (tx, rx) = broadcast::channel(1);
        slots.insert(
            record.name.clone(),
            InstallSlot {
                state: InstallState::Installing,
                done: Some(tx.clone()),
                outcome: None,
            },
        );
        let inner = self.inner.clone();
        let record = record.clone();
        tokio::spawn(async move {
            let outcome = inner.drive(&record).await;
            {
                let mut slots = inner.slots.lock().await;
                if let Some(slot) = slots.get_mut(&record.name) {
                    slot.state = match &outcome {
                        Ok(_) => InstallState::Inserted,
                        Err(reason) => InstallState::Failed(reason.clone()),
                    };
                    slot.outcome = Some(outcome.clone());
                    slot.done = None;
                }
            }
            match &outcome {
                Ok(installed) => {
                    tracing::info!(
                        block = %installed.name,
                        instance = %installed.instance_id,
                        "block inserted"
                    );
                }
                Err(reason) => {
                    tracing::warn!(block = %record.name, error = %reason, "block install failed");
                }
            }
            let _ = tx.send(outcome);
        });
        rx
    }
}

impl Inner {
    async fn drive(&self, record: &BlockRecord) -> InstallOutcome {
        let installed_record = self.directory.install(record).await.map_err(|e| match e {
            DirectoryError::InstallRejected { reason } => InstallFailure::Rejected(reason),
            DirectoryError::Network(source) => InstallFailure::Network(source.to_string()),
            DirectoryError::Parse(source) => InstallFailure::Network(source.to_string()),
        })?;

        self.set_state(&record.name, InstallState::InjectingAssets)
            .await;
        // Strictly sequential: later assets may depend on earlier ones.
        for url in &installed_record.assets {
            self.injector.load(url).await.map_err(|e| match e {
                AssetError::Fetch { url, message } => InstallFailure::AssetFetch { url, message },
                AssetError::Execute { url, message } => {
                    InstallFailure::AssetExecution { url, message }
                }
            })?;
        }

        self.set_state(&record.name, InstallState::WaitingForRegistration)
            .await;
        let definition = self
            .watcher
            .wait_for(&record.name, self.registration_timeout)
            .await
            .map_err(|_| InstallFailure::RegistrationTimeout {
                timeout_ms: self.registration_timeout.as_millis() as u64,
            })?;

        self.set_state(&record.name, InstallState::Registered).await;
        let instance_id = self
            .inserter
            .insert(&definition, None)
            .await
            .map_err(|e| InstallFailure::Insertion(e.to_string()))?;

        Ok(InstalledBlock {
            name: record.name.clone(),
            definition,
            instance_id,
        })
    }

    async fn set_state(&self, name: &str, state: InstallState) {
        tracing::debug!(block = %name, ?state, "install state transition");
        let mut slots = self.slots.lock().await;
        if let Some(slot) = slots.get_mut(name) {
            slot.state = state;
        }
    }
}
