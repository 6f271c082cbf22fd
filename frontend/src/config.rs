//! Application configuration.
//!
//! Centralized configuration for the AttendMe frontend. Values are compiled
//! in; the backend location can be overridden at build time with the
//! `ATTENDME_BACKEND_URL` environment variable.

/// Backend API base URL.
///
/// Empty means same origin, which is how the app is served in production.
pub const BACKEND_URL: &str = match option_env!("ATTENDME_BACKEND_URL") {
    Some(url) => url,
    None => "",
};

/// Fewest reference images a person must have before enrollment can finish.
pub const MIN_IMAGES_PER_PERSON: u8 = 3;

/// Most reference images a person may hold.
pub const MAX_IMAGES_PER_PERSON: u8 = 5;

/// Delay between two sequential image uploads (ms).
pub const UPLOAD_PACING_MS: u32 = 300;

/// How long the batch summary stays on screen before teardown (ms).
pub const PANEL_TEARDOWN_MS: u32 = 3000;

/// Notification lifetime before it starts closing (ms).
pub const NOTIFICATION_TIMEOUT_MS: u32 = 5000;

/// Length of the closing animation of a notification (ms).
pub const NOTIFICATION_FADE_MS: u32 = 300;

/// Maximum notifications kept on screen.
pub const MAX_NOTIFICATIONS: usize = 6;

/// localStorage key of the roster mirror.
pub const PEOPLE_CACHE_KEY: &str = "attendme-people";

/// File names longer than this are truncated in progress text.
pub const PROGRESS_NAME_CHARS: usize = 20;
