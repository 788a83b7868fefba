use uuid::Uuid;

use crate::domain::catalog::block::BlockDefinition;

/// Why an install pipeline ended in `Failed`. Cloneable so one outcome can be
/// fanned out to every caller attached to the same in-flight install.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InstallFailure {
    #[error("directory request failed: {0}")]
    Network(String),
    #[error("directory declined the installation: {0}")]
    Rejected(String),
    #[error("failed to fetch asset {url}: {message}")]
    AssetFetch { url: String, message: String },
    #[error("asset {url} failed during execution: {message}")]
    AssetExecution { url: String, message: String },
    #[error("block did not register within {timeout_ms} ms")]
    RegistrationTimeout { timeout_ms: u64 },
    #[error("failed to insert block into the document: {0}")]
    Insertion(String),
    #[error("install task ended without reporting an outcome")]
    Aborted,
}

/// Lifecycle of one install pipeline, keyed by block name. Transitions move
/// strictly forward except into `Failed`; `Inserted` and `Failed` are
/// terminal, and only `Failed` (or an absent slot) accepts a fresh install.
#[derive(Debug, Clone, PartialEq)]
pub enum InstallState {
    Idle,
    Installing,
    InjectingAssets,
    WaitingForRegistration,
    Registered,
    Inserted,
    Failed(InstallFailure),
}

impl InstallState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, InstallState::Inserted | InstallState::Failed(_))
    }

    /// Whether a new install request may start a fresh pipeline for this name.
    pub fn accepts_new_install(&self) -> bool {
        matches!(self, InstallState::Idle | InstallState::Failed(_))
    }

    pub fn failure(&self) -> Option<&InstallFailure> {
        match self {
            InstallState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Success payload of a completed pipeline: the registered definition and the
/// instance id the host document assigned on insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct InstalledBlock {
    pub name: String,
    pub definition: BlockDefinition,
    pub instance_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(InstallState::Inserted.is_terminal());
        assert!(InstallState::Failed(InstallFailure::Aborted).is_terminal());
        assert!(!InstallState::Installing.is_terminal());
        assert!(!InstallState::WaitingForRegistration.is_terminal());
    }

    #[test]
    fn failure_is_only_exposed_by_failed_states() {
        let failed = InstallState::Failed(InstallFailure::Rejected("declined".into()));
        assert_eq!(
            failed.failure(),
            Some(&InstallFailure::Rejected("declined".into()))
        );
        assert_eq!(InstallState::Inserted.failure(), None);
    }

    #[test]
    fn only_idle_and_failed_accept_a_new_install() {
        assert!(InstallState::Idle.accepts_new_install());
        assert!(
            InstallState::Failed(InstallFailure::RegistrationTimeout { timeout_ms: 100 })
                .accepts_new_install()
        );
        assert!(!InstallState::Installing.accepts_new_install());
        assert!(!InstallState::InjectingAssets.accepts_new_install());
        assert!(!InstallState::Inserted.accepts_new_install());
    }
}
