//! AttendMe - Frontend Rust/Leptos Application
//!
//! A WebAssembly console for a face-recognition attendance system: enroll
//! people with reference images and manage the target images the camera
//! matches against.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Header (roster counts)             NotificationStack        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  /         PeopleSection                                     │
//! │            ├── AddPersonModal                                │
//! │            ├── EnrollmentModal ── ProgressSection            │
//! │            └── PersonImagesModal                             │
//! │  /targets  TargetGallerySection                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Components turn user actions into [`controller::Command`]s. The
//! controller drives the state machines in [`state`], which talk to the
//! outside world only through the traits in [`services`].
//!
//! # Modules
//!
//! - [`types`] - Wire and domain types (Person, TargetImage, AppError)
//! - [`services`] - Backend client, notifications, timers, local cache
//! - [`state`] - Enrollment, upload orchestration, roster, gallery
//! - [`render`] - Pure view models (people table)
//! - [`controller`] - Command dispatch and shared context
//! - [`components`] - UI components

use leptos::*;
use leptos_meta::*;
use leptos_router::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod components;
pub mod config;
pub mod controller;
pub mod render;
pub mod services;
pub mod state;
pub mod types;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // Domain
    Person, TargetImage, MediaKind,
    // Notifications
    NotifyKind,
    // Errors
    AppError, AppResult,
};

// Components
pub use components::*;

// Controller
pub use controller::{AppContext, Command};

// =============================================================================
// Application Entry Point
// =============================================================================

/// Install the panic hook and console logger, then mount [`App`].
pub fn start() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 AttendMe - Starting Leptos App (backend: {:?})", BACKEND_URL);

    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    let ctx = AppContext::provide();

    // initial load
    ctx.dispatch(Command::RefreshPeople);
    ctx.dispatch(Command::RefreshTargets);

    view! {
        <Title text="AttendMe"/>
        <Router>
            <Header/>
            <NotificationStack/>
            <nav class="tabs">
                <A href="/" exact=true class="tab">"👥 People"</A>
                <A href="/targets" class="tab">"🎯 Target images"</A>
            </nav>
            <main class="container">
                <Routes>
                    <Route path="/" view=PeoplePage/>
                    <Route path="/targets" view=TargetGallerySection/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn PeoplePage() -> impl IntoView {
    view! {
        <PeopleSection/>
        <AddPersonModal/>
        <EnrollmentModal/>
        <PersonImagesModal/>
    }
}
