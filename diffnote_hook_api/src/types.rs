use serde::{Deserialize, Serialize};

/// Event subscriptions of a project hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookEvents {
    /// Pushes to any branch.
    #[serde(default = "enabled")]
    pub push_events: bool,
    /// Issue changes.
    #[serde(default)]
    pub issues_events: bool,
    /// Merge request changes.
    #[serde(default)]
    pub merge_requests_events: bool,
    /// Tag pushes.
    #[serde(default)]
    pub tag_push_events: bool,
    /// New comments.
    #[serde(default)]
    pub note_events: bool,
    /// CI build status changes.
    #[serde(default)]
    pub build_events: bool,
}

impl Default for HookEvents {
    fn default() -> Self {
        Self {
            push_events: true,
            issues_events: false,
            merge_requests_events: false,
            tag_push_events: false,
            note_events: false,
            build_events: false,
        }
    }
}

const fn enabled() -> bool {
    true
}

/// Whitelisted attributes accepted when creating a hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookParams {
    /// Delivery endpoint.
    pub url: String,
    /// Event subscriptions.
    #[serde(flatten)]
    pub events: HookEvents,
    /// Whether TLS certificates are verified on delivery.
    #[serde(default = "enabled")]
    pub enable_ssl_verification: bool,
}

impl HookParams {
    /// Parameters for a push-only hook with TLS verification.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            events: HookEvents::default(),
            enable_ssl_verification: true,
        }
    }
}

/// A persisted project hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectHook {
    /// Registry-assigned identifier.
    pub id: u64,
    /// Delivery endpoint.
    pub url: String,
    /// Event subscriptions.
    pub events: HookEvents,
    /// Whether TLS certificates are verified on delivery.
    pub enable_ssl_verification: bool,
}

/// User on whose behalf a hook is triggered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Login name.
    pub username: String,
}

impl Actor {
    /// Construct an actor.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// Result of a test delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookTestOutcome {
    /// Whether the endpoint accepted the sample event.
    pub success: bool,
    /// Backend message, shown to the user on failure.
    #[serde(default)]
    pub message: String,
}

impl HookTestOutcome {
    /// Successful delivery.
    pub fn success() -> Self {
        Self {
            success: true,
            message: String::new(),
        }
    }

    /// Failed delivery with a backend message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Errors surfaced by hook registry operations.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// URL is not an absolute http(s) URL with a host.
    #[error("hook url is invalid: {url}")]
    InvalidUrl {
        /// Rejected URL.
        url: String,
    },
}

/// Convenience result alias for hook operations.
pub type HookResult<T> = std::result::Result<T, HookError>;
