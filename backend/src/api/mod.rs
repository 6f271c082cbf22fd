//! HTTP API module.
//!
//! The REST surface the frontend talks to, backed by the in-memory store.

pub mod server;
pub mod types;

pub use server::{build_router, serve, start_server, AppState, ServerConfig};
pub use types::*;
