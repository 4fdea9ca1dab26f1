use std::sync::{Arc, RwLock};

use serde::Serialize;
use tracing::{info, warn};

use super::{Actor, HookParams, HookRegistry, HookTester, ProjectHook};
use crate::{Error, Result};

/// Message shown when a test delivery succeeded.
pub const TEST_SUCCEEDED: &str = "Hook executed successfully.";
/// Message shown when the project has nothing to send.
pub const TEST_EMPTY_REPOSITORY: &str = "Hook execution failed. Ensure the project has commits.";

/// One-shot user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "message", rename_all = "snake_case")]
pub enum Flash {
    /// Informational message.
    Notice(String),
    /// Failure message.
    Alert(String),
}

/// High-level façade for a project's hooks.
#[derive(Clone)]
pub struct HookService {
    registry: Arc<RwLock<HookRegistry>>,
    tester: Arc<dyn HookTester>,
}

impl HookService {
    /// Create a service over `registry`, delivering test events through `tester`.
    #[must_use]
    pub fn new(registry: HookRegistry, tester: Arc<dyn HookTester>) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            tester,
        }
    }

    /// All hooks of the project, in creation order.
    #[must_use]
    pub fn hooks(&self) -> Vec<ProjectHook> {
        self.read().hooks().to_vec()
    }

    /// Create a hook from whitelisted parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Hook`] when the registry rejects the parameters.
    pub fn create(&self, params: HookParams) -> Result<ProjectHook> {
        let mut registry = self.write();
        let hook = registry.create(params)?.clone();
        info!(hook = hook.id, url = %hook.url, "created hook");
        Ok(hook)
    }

    /// Delete a hook.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HookNotFound`] for an unknown id.
    pub fn destroy(&self, id: u64) -> Result<ProjectHook> {
        let hook = self.write().destroy(id).ok_or(Error::HookNotFound { id })?;
        info!(hook = id, "deleted hook");
        Ok(hook)
    }

    /// Fire a test event for hook `id` and turn the outcome into a flash message.
    ///
    /// A repository without commits is reported without contacting the tester.
    /// Tester failures are reported with the backend message verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HookNotFound`] for an unknown id.
    pub fn test(&self, id: u64, actor: &Actor, repository_empty: bool) -> Result<Flash> {
        let hook = self
            .read()
            .get(id)
            .cloned()
            .ok_or(Error::HookNotFound { id })?;

        if repository_empty {
            warn!(hook = id, "hook test skipped for empty repository");
            return Ok(Flash::Alert(TEST_EMPTY_REPOSITORY.to_owned()));
        }

        let outcome = self.tester.test(&hook, actor);
        info!(
            hook = id,
            tester = self.tester.id(),
            actor = %actor.username,
            success = outcome.success,
            "hook test finished"
        );

        Ok(if outcome.success {
            Flash::Notice(TEST_SUCCEEDED.to_owned())
        } else {
            Flash::Alert(format!("Hook execution failed: {}", outcome.message))
        })
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HookRegistry> {
        self.registry
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HookRegistry> {
        self.registry
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl std::fmt::Debug for HookService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hook_ids: Vec<u64> = self.read().hooks().iter().map(|hook| hook.id).collect();
        f.debug_struct("HookService")
            .field("hooks", &hook_ids)
            .field("tester", &self.tester.id())
            .finish()
    }
}
