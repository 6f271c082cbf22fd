//! Pure view models derived from client state.

pub mod table;

pub use table::*;
