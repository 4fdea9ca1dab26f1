//! Project hook management entry points.

mod service;

pub use diffnote_hook_api::{
    Actor, HookError, HookEvents, HookParams, HookRegistry, HookTestOutcome, HookTester,
    ProjectHook,
};

pub use service::{Flash, HookService};
