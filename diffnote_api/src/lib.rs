//! Shared diffnote data models consumed by the core library and hook crates.
//!
//! The structures in this crate are designed to be:
//! - produced by an external diff engine and comment store, then treated as read-only
//! - serializable via `serde` for fixtures and transport

pub mod diff;
pub mod repository;
pub mod review;

pub use diff::*;
pub use repository::*;
pub use review::*;
