//! Network glue for board actions.
//!
//! Each action applies its optimistic `begin_*` step on the main thread,
//! then spawns the API call; the completion event (with the rollback
//! payload) comes back over the outcome channel and is drained on `Tick`.
//! There is no queueing or in-flight deduplication — rapid actions on the
//! same task race, and the last response to arrive wins because
//! reconciliation overwrites by id.

use tracing::debug;

use super::{ApiOutcome, App};

impl App {
    pub fn load_tasks(&mut self) {
        self.begin_load();
        let api = self.api.clone();
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = api.list_tasks().await;
            let _ = tx.send(ApiOutcome::Loaded(result));
        });
    }

    pub fn submit_new_task(&mut self) {
        let Some(title) = self.begin_add() else {
            return;
        };
        debug!(title = %title, "creating task");
        let api = self.api.clone();
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = api.create_task(&title).await;
            let _ = tx.send(ApiOutcome::Created(result));
        });
    }

    pub fn toggle_selected(&mut self) {
        let Some((id, completed, previous)) = self.begin_toggle() else {
            return;
        };
        debug!(task_id = %id, completed, "toggling task");
        let api = self.api.clone();
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = api.set_completed(id, completed).await;
            let _ = tx.send(ApiOutcome::Toggled {
                id,
                previous,
                result,
            });
        });
    }

    pub fn delete_selected(&mut self) {
        let Some((id, snapshot)) = self.begin_delete() else {
            return;
        };
        debug!(task_id = %id, "deleting task");
        let api = self.api.clone();
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = api.delete_task(id).await;
            let _ = tx.send(ApiOutcome::Deleted {
                id,
                snapshot,
                result,
            });
        });
    }
}
