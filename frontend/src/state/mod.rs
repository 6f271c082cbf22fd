//! Client-side state machines.
//!
//! Nothing in here touches the DOM. Side effects go through the traits in
//! [`crate::services`] so every flow can run against fakes.
//!
//! - [`people`] - roster of enrolled people
//! - [`enrollment`] - the single open image-enrollment session
//! - [`orchestrator`] - sequential per-person image uploads
//! - [`gallery`] - target images and their selection

pub mod enrollment;
pub mod gallery;
pub mod orchestrator;
pub mod people;

pub use enrollment::*;
pub use gallery::*;
pub use orchestrator::*;
pub use people::*;
