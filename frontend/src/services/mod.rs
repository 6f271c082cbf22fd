//! Browser-facing services.
//!
//! This module provides the seams between application logic and the outside
//! world:
//!
//! # Services
//!
//! - [`api`] - REST client for the attendance backend (gloo-net)
//! - [`notifier`] - Transient notifications with auto-dismiss
//! - [`storage`] - Best-effort localStorage mirror of the roster
//! - [`timer`] - Delays (gloo-timers)
//!
//! Each service is a trait with a browser implementation, so the enrollment
//! and gallery logic in [`crate::state`] can be driven by fakes in tests.

pub mod api;
pub mod notifier;
pub mod storage;
pub mod timer;

pub use api::*;
pub use notifier::*;
pub use storage::*;
pub use timer::*;
