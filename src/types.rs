use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A task as the backend stores it. The board only ever holds a transient
/// cached copy; the server-returned value wins after every round trip.
///
/// Timestamps arrive as naive ISO 8601 strings (the backend serializes UTC
/// without an offset), hence `NaiveDateTime`.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Request body for `POST /api/tasks`.
#[derive(Debug, Clone, Serialize)]
pub struct TaskCreate {
    pub title: String,
}

/// Request body for `PATCH /api/tasks/{id}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TaskPatch {
    pub completed: bool,
}

/// Storage metadata the backend attaches to create/patch responses.
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
pub struct StorageMeta {
    pub saved_at: NaiveDateTime,
    pub count: usize,
}

/// Envelope around a single task in create/patch responses.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskResponse {
    pub task: Task,
    #[serde(default)]
    pub meta: Option<StorageMeta>,
}

/// Outcome indicator for the most recent mutating action.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved,
    Error,
}

impl SaveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SaveStatus::Idle => "idle",
            SaveStatus::Saving => "saving",
            SaveStatus::Saved => "saved",
            SaveStatus::Error => "error",
        }
    }
}
