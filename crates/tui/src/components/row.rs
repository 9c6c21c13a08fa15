use serde_json::Value;
use tracing::{debug, info};

use crate::core::{Request, RequestError};
use crate::model::{Task, TaskId};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this task?";

/// Per-task interaction state. The task itself is owned by the list and
/// passed in on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskRow {
    busy: bool,
    error: Option<String>,
    confirming: bool,
}

impl TaskRow {
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_confirming(&self) -> bool {
        self.confirming
    }

    pub fn can_complete(&self, task: &Task) -> bool {
        !self.busy && !task.is_completed()
    }

    pub fn begin_complete(&mut self, task: &Task) -> Option<Request> {
        if !self.can_complete(task) {
            debug!(id = %task.id, "complete not available");
            return None;
        }
        self.busy = true;
        self.error = None;
        Some(Request::Complete(task.id.clone()))
    }

    /// Only the status changes locally; whatever the service sent back is ignored.
    pub fn finish_complete(
        &mut self,
        task: &Task,
        result: Result<Value, RequestError>,
    ) -> Option<Task> {
        self.busy = false;
        match result {
            Ok(_) => {
                info!(id = %task.id, "task completed");
                Some(task.completed())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                None
            }
        }
    }

    /// Open the confirmation prompt. Returns `false` while another call is in flight.
    pub fn request_delete(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.confirming = true;
        true
    }

    pub fn answer_delete(&mut self, task: &Task, confirmed: bool) -> Option<Request> {
        if !std::mem::take(&mut self.confirming) || !confirmed {
            return None;
        }
        self.busy = true;
        self.error = None;
        Some(Request::Delete(task.id.clone()))
    }

    pub fn finish_delete(
        &mut self,
        id: &TaskId,
        result: Result<bool, RequestError>,
    ) -> Option<TaskId> {
        self.busy = false;
        match result {
            Ok(_) => {
                info!(id = %id, "task deleted");
                Some(id.clone())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                None
            }
        }
    }
}
