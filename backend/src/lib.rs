//! # AttendMe - reference backend
//!
//! An in-memory server that honours the REST contract of the AttendMe
//! frontend: the people roster, per-person reference images and the target
//! image gallery. It does no face recognition; it exists so the frontend
//! can be developed and its wire contract exercised end to end.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Frontend   │────▶│  api (axum) │────▶│    Store    │
//! │  (Leptos)   │◀────│  envelopes  │◀────│ (in memory) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use attendme::server::{start_server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     start_server(ServerConfig { seed: true, ..Default::default() }).await.unwrap();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types and their HTTP mapping
//! - [`store`] - Roster, targets and media blobs
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod store;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ServerError, ServerResult, StoreError, StoreResult};

pub use store::{
    MediaBlob, ResourceType, Store, StoredPerson, TargetCounts, TargetFile, DEFAULT_MAX_IMAGES,
};

pub use api::types::{error_response, media_url, Success};

// Server
pub mod server {
    pub use crate::api::server::{build_router, serve, start_server, AppState, ServerConfig};
}
