//! Board state and the apply/confirm-or-revert reducer.
//!
//! `App` owns the cached task list and all UI state. Mutating operations are
//! split in two: `begin_*` validates, applies the optimistic change, and
//! captures the rollback payload; `finish_*` reconciles the server response
//! or restores the payload. The network glue between the two lives in
//! `actions.rs`, with results delivered over an mpsc channel and drained on
//! `Tick`. Everything here runs on the main event thread.

mod actions;
mod state;
mod update;

use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::KeyEvent;
use tracing::warn;
use uuid::Uuid;

use crate::api::{ApiClient, ApiError};
use crate::settings::Settings;
use crate::types::{SaveStatus, Task};

pub use state::ApiOutcome;

/// Titles shorter than this (after trimming) are rejected locally, before
/// any network call. Mirrors the backend's validation rule.
pub const MIN_TITLE_LEN: usize = 3;

pub const LOAD_ERROR: &str = "Could not load tasks — press r to retry";
pub const ADD_ERROR: &str = "Could not add task";
pub const UPDATE_ERROR: &str = "Could not update task";
pub const DELETE_ERROR: &str = "Could not delete task";
pub const TITLE_TOO_SHORT: &str = "Title must be at least 3 characters";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Key(KeyEvent),
    Tick,
    Resize(u16, u16),
}

pub struct App {
    pub settings: Settings,
    api: Arc<ApiClient>,
    outcome_tx: Sender<ApiOutcome>,
    outcome_rx: Receiver<ApiOutcome>,

    pub tasks: Vec<Task>,
    /// Index into the currently visible (focus-filtered) list.
    pub selected: usize,
    pub focus_mode: bool,
    pub save_status: SaveStatus,
    saved_revert_at: Option<Instant>,
    pub banner: Option<String>,
    pub loading: bool,
    /// `Some` while the new-title input line is focused.
    pub input: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(settings: Settings, focus_mode: bool) -> Result<Self> {
        let api = ApiClient::new(&settings.api_url)
            .with_context(|| format!("failed to build API client for '{}'", settings.api_url))?;
        let (outcome_tx, outcome_rx) = channel();

        Ok(Self {
            settings,
            api: Arc::new(api),
            outcome_tx,
            outcome_rx,
            tasks: Vec::new(),
            selected: 0,
            focus_mode,
            save_status: SaveStatus::Idle,
            saved_revert_at: None,
            banner: None,
            loading: false,
            input: None,
            should_quit: false,
        })
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // ----- derived state ---------------------------------------------------

    pub fn total_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    /// Completion percentage, rounded and clamped to 0..=100. Empty list is 0.
    pub fn percent(&self) -> u8 {
        let total = self.total_count();
        if total == 0 {
            return 0;
        }
        let ratio = self.completed_count() as f64 / total as f64 * 100.0;
        ratio.clamp(0.0, 100.0).round() as u8
    }

    pub fn all_done(&self) -> bool {
        !self.tasks.is_empty() && self.completed_count() == self.tasks.len()
    }

    /// Tasks as rendered: focus mode hides completed ones.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| !self.focus_mode || !task.completed)
            .collect()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.visible_tasks().get(self.selected).copied()
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        let max_index = self.visible_tasks().len().saturating_sub(1);
        self.selected = (self.selected + 1).min(max_index);
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_tasks().len();
        if len == 0 {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(len - 1);
        }
    }

    pub fn toggle_focus_mode(&mut self) {
        self.focus_mode = !self.focus_mode;
        self.clamp_selection();
    }

    pub fn open_input(&mut self) {
        self.input = Some(String::new());
    }

    pub fn close_input(&mut self) {
        self.input = None;
    }

    // ----- save-status indicator -------------------------------------------

    fn mark_saving(&mut self) {
        self.save_status = SaveStatus::Saving;
        self.saved_revert_at = None;
        self.banner = None;
    }

    fn mark_saved(&mut self) {
        self.save_status = SaveStatus::Saved;
        self.saved_revert_at =
            Some(Instant::now() + Duration::from_millis(self.settings.saved_notice_ms));
    }

    fn mark_failed(&mut self, message: &str) {
        self.save_status = SaveStatus::Error;
        self.saved_revert_at = None;
        self.banner = Some(message.to_string());
    }

    /// Revert a dwelling `Saved` indicator back to `Idle` once its deadline
    /// passes. Called with the current instant on every tick.
    pub fn maybe_revert_saved(&mut self, now: Instant) {
        if self.save_status == SaveStatus::Saved
            && self.saved_revert_at.is_some_and(|deadline| now >= deadline)
        {
            self.save_status = SaveStatus::Idle;
            self.saved_revert_at = None;
        }
    }

    // ----- load ------------------------------------------------------------

    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    pub fn finish_load(&mut self, result: Result<Vec<Task>, ApiError>) {
        self.loading = false;
        match result {
            Ok(tasks) => {
                self.tasks = tasks;
                self.banner = None;
                self.clamp_selection();
            }
            Err(err) => {
                warn!(error = %err, "failed to load tasks");
                self.banner = Some(LOAD_ERROR.to_string());
            }
        }
    }

    // ----- add -------------------------------------------------------------

    /// Validate the input buffer. Returns the trimmed title to send, or
    /// `None` when the title is too short (validation banner, no network).
    pub fn begin_add(&mut self) -> Option<String> {
        let title = self.input.as_deref()?.trim().to_string();
        if title.chars().count() < MIN_TITLE_LEN {
            self.banner = Some(TITLE_TOO_SHORT.to_string());
            return None;
        }
        self.mark_saving();
        Some(title)
    }

    pub fn finish_add(&mut self, result: Result<Task, ApiError>) {
        match result {
            Ok(task) => {
                self.tasks.push(task);
                // Clear the buffer but keep the input line focused.
                if self.input.is_some() {
                    self.input = Some(String::new());
                }
                self.mark_saved();
            }
            Err(err) => {
                warn!(error = %err, "failed to create task");
                self.mark_failed(ADD_ERROR);
            }
        }
    }

    // ----- toggle ----------------------------------------------------------

    /// Optimistically flip the selected task. Returns the id, the requested
    /// completion value, and the pre-toggle flag for rollback.
    pub fn begin_toggle(&mut self) -> Option<(Uuid, bool, bool)> {
        let id = self.selected_task()?.id;
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        let previous = task.completed;
        task.completed = !previous;
        self.mark_saving();
        self.clamp_selection();
        Some((id, !previous, previous))
    }

    pub fn finish_toggle(&mut self, id: Uuid, previous: bool, result: Result<Task, ApiError>) {
        match result {
            Ok(server_task) => {
                if let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) {
                    *task = server_task;
                }
                self.clamp_selection();
                self.mark_saved();
            }
            Err(err) => {
                warn!(task_id = %id, error = %err, "failed to update task completion");
                if let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) {
                    task.completed = previous;
                }
                self.clamp_selection();
                self.mark_failed(UPDATE_ERROR);
            }
        }
    }

    // ----- delete ----------------------------------------------------------

    /// Optimistically remove the selected task. Returns its id and the full
    /// pre-delete list snapshot for rollback.
    pub fn begin_delete(&mut self) -> Option<(Uuid, Vec<Task>)> {
        let id = self.selected_task()?.id;
        let snapshot = self.tasks.clone();
        self.tasks.retain(|task| task.id != id);
        self.mark_saving();
        self.clamp_selection();
        Some((id, snapshot))
    }

    pub fn finish_delete(&mut self, snapshot: Vec<Task>, result: Result<(), ApiError>) {
        match result {
            Ok(()) => self.mark_saved(),
            Err(err) => {
                warn!(error = %err, "failed to delete task");
                self.tasks = snapshot;
                self.clamp_selection();
                self.mark_failed(DELETE_ERROR);
            }
        }
    }

    // ----- background results ----------------------------------------------

    pub fn drain_api_outcomes(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            match outcome {
                ApiOutcome::Loaded(result) => self.finish_load(result),
                ApiOutcome::Created(result) => self.finish_add(result),
                ApiOutcome::Toggled {
                    id,
                    previous,
                    result,
                } => self.finish_toggle(id, previous, result),
                ApiOutcome::Deleted {
                    id: _,
                    snapshot,
                    result,
                } => self.finish_delete(snapshot, result),
            }
        }
    }
}
