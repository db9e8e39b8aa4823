//! Completion events for in-flight API calls.
//!
//! Every mutating call carries its rollback payload with it, so the reducer
//! can either reconcile with the server value or restore the exact
//! pre-mutation state when the call fails.

use uuid::Uuid;

use crate::api::ApiError;
use crate::types::Task;

#[derive(Debug)]
pub enum ApiOutcome {
    Loaded(Result<Vec<Task>, ApiError>),
    Created(Result<Task, ApiError>),
    Toggled {
        id: Uuid,
        /// Completion flag before the optimistic flip.
        previous: bool,
        result: Result<Task, ApiError>,
    },
    Deleted {
        id: Uuid,
        /// Full list as it was before the optimistic removal.
        snapshot: Vec<Task>,
        result: Result<(), ApiError>,
    },
}
