//! Common types used across the frontend application.
//!
//! This module centralizes type definitions to avoid duplication
//! and ensure consistency across components.
//!
//! # Categories
//!
//! - **Roster Types** - enrolled people
//! - **Gallery Types** - target images and videos
//! - **Notification Types** - severity of user-facing messages
//! - **Error Types** - frontend error handling

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Roster Types
// =============================================================================

/// An enrolled person as reported by the backend.
///
/// Never mutated optimistically: every change comes from a fresh roster fetch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Unique, immutable identifier (national id number).
    #[serde(alias = "id_number")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Reference image URLs, oldest first.
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub is_present: bool,
}

impl Person {
    /// "First Last", as shown in the table and modals.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn image_count(&self) -> usize {
        self.image_urls.len()
    }
}

// =============================================================================
// Gallery Types
// =============================================================================

/// Media type of a target file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

/// A reference image or video used for recognition matching.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetImage {
    pub public_id: String,
    pub url: String,
    #[serde(default)]
    pub resource_type: MediaKind,
    #[serde(default, alias = "bytes")]
    pub size_bytes: u64,
}

// =============================================================================
// Notification Types
// =============================================================================

/// Severity of a user-facing notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NotifyKind {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            NotifyKind::Info => "notification info",
            NotifyKind::Success => "notification success",
            NotifyKind::Warning => "notification warning",
            NotifyKind::Error => "notification error",
        }
    }

    /// Get emoji prefix for display.
    pub fn emoji(&self) -> &'static str {
        match self {
            NotifyKind::Info => "ℹ️",
            NotifyKind::Success => "✅",
            NotifyKind::Warning => "⚠️",
            NotifyKind::Error => "❌",
        }
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Frontend application errors.
///
/// Unified error type for all frontend operations.
#[derive(Clone, Debug, PartialEq)]
pub enum AppError {
    /// Rejected on the client before any request was made.
    Validation(String),
    /// The backend answered `success: false`; carries its reason verbatim.
    Backend(String),
    /// Request never produced a response.
    Network(String),
    /// Response arrived but could not be understood.
    Decode(String),
}

impl AppError {
    /// Network and decode failures, as opposed to answers from the backend.
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Network(_) | AppError::Decode(_))
    }

    /// Text suitable for a notification.
    ///
    /// Backend reasons and validation messages are shown as-is.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::Backend(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Backend(msg) => write!(f, "Server error: {}", msg),
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Decode(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;
