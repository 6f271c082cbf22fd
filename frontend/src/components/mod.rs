//! UI components for the AttendMe console.
//!
//! Every component reads [`AppContext`](crate::controller::AppContext) from
//! the Leptos context and reports user actions as
//! [`Command`](crate::controller::Command)s.
//!
//! # Layout
//! - [`Header`] - title and roster counts
//! - [`NotificationStack`] - transient notifications
//!
//! # People
//! - [`PeopleSection`] - searchable people table with row actions
//! - [`AddPersonModal`] - new person form
//! - [`EnrollmentModal`] - image enrollment for one person
//! - [`ProgressSection`] - batch progress under the enrollment picker
//! - [`PersonImagesModal`] - a person's enrolled images
//!
//! # Targets
//! - [`TargetGallerySection`] - target image gallery with bulk delete

mod add_person;
mod enrollment;
mod gallery;
mod header;
mod notifications;
mod people;
mod person_images;
mod progress;

pub use add_person::*;
pub use enrollment::*;
pub use gallery::*;
pub use header::*;
pub use notifications::*;
pub use people::*;
pub use person_images::*;
pub use progress::*;

use leptos::*;
use web_sys::{Event, File, HtmlInputElement};

/// Files picked in an `<input type="file">`, resetting the input so the
/// same files can be picked again.
pub(crate) fn take_files(ev: &Event) -> Vec<File> {
    let input: HtmlInputElement = event_target(ev);
    let files = input
        .files()
        .map(|list| (0..list.length()).filter_map(|i| list.get(i)).collect())
        .unwrap_or_default();
    input.set_value("");
    files
}
