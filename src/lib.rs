//! Terminal task board over the Task Board REST API.
//!
//! The board keeps a cached copy of the server's task list, applies
//! mutations optimistically, and reconciles or rolls back when the
//! corresponding API call resolves.

pub mod api;
pub mod app;
pub mod logging;
pub mod realm;
pub mod settings;
pub mod types;
pub mod ui;
