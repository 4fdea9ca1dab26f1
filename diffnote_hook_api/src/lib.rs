//! Webhook test-trigger boundary.
//!
//! Delivery lives outside diffnote; the core only asks a [`HookTester`] to fire
//! a sample event and reports the outcome back to the user.

mod registry;
mod types;

pub use registry::HookRegistry;
pub use types::{Actor, HookError, HookEvents, HookParams, HookResult, HookTestOutcome, ProjectHook};

/// Trait implemented by webhook delivery backends.
pub trait HookTester: Send + Sync {
    /// Stable identifier used for logging.
    fn id(&self) -> &'static str;

    /// Fire a sample event at `hook` on behalf of `actor`.
    ///
    /// Failures are part of the outcome rather than an error, so the caller can
    /// show the message verbatim.
    fn test(&self, hook: &ProjectHook, actor: &Actor) -> HookTestOutcome;
}
