//! In-memory set of hooks configured for a project.

use url::Url;

use crate::types::{HookError, HookParams, HookResult, ProjectHook};

/// Hooks of a single project, in creation order.
#[derive(Debug, Default)]
pub struct HookRegistry {
    hooks: Vec<ProjectHook>,
    next_id: u64,
}

impl HookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `params` and store a new hook.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::InvalidUrl`] unless the URL is an absolute http(s)
    /// URL with a host.
    pub fn create(&mut self, params: HookParams) -> HookResult<&ProjectHook> {
        if !is_valid_url(&params.url) {
            return Err(HookError::InvalidUrl { url: params.url });
        }

        self.next_id += 1;
        self.hooks.push(ProjectHook {
            id: self.next_id,
            url: params.url,
            events: params.events,
            enable_ssl_verification: params.enable_ssl_verification,
        });
        Ok(&self.hooks[self.hooks.len() - 1])
    }

    /// Look up a hook by identifier.
    pub fn get(&self, id: u64) -> Option<&ProjectHook> {
        self.hooks.iter().find(|hook| hook.id == id)
    }

    /// Remove a hook, returning it when it existed.
    pub fn destroy(&mut self, id: u64) -> Option<ProjectHook> {
        let position = self.hooks.iter().position(|hook| hook.id == id)?;
        Some(self.hooks.remove(position))
    }

    /// All hooks in creation order.
    pub fn hooks(&self) -> &[ProjectHook] {
        &self.hooks
    }
}

fn is_valid_url(raw: &str) -> bool {
    // The parser percent-encodes stray spaces; hook URLs must arrive encoded.
    if raw.contains(char::is_whitespace) {
        return false;
    }
    Url::parse(raw).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https")
            && url.host_str().is_some_and(|host| !host.is_empty())
    })
}
