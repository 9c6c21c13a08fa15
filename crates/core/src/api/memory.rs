//! In-process [`TaskApi`] that records every call, for tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::TaskApi;
use crate::error::{Operation, RequestError};
use crate::model::{NewTask, Task, TaskId, TaskStatus};

pub const CREATED_AT: &str = "2024-01-01T09:00:00Z";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    List(Option<TaskStatus>),
    Create(NewTask),
    Complete(TaskId),
    Delete(TaskId),
}

#[derive(Debug, Default)]
struct MemoryState {
    tasks: Vec<Task>,
    next_id: u64,
    calls: Vec<ApiCall>,
    failures: HashMap<Operation, u16>,
    list_body: Option<Value>,
}

/// Behaves like the real service: ids are assigned on create, new tasks start
/// pending, and the list is filtered by status.
#[derive(Debug, Default)]
pub struct MemoryTaskApi {
    state: Mutex<MemoryState>,
}

impl MemoryTaskApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let api = Self::new();
        {
            let mut state = api.lock();
            state.next_id = tasks
                .iter()
                .filter_map(|task| task.id.as_str().parse::<u64>().ok())
                .max()
                .unwrap_or(0);
            state.tasks = tasks;
        }
        api
    }

    /// Make every later call of `operation` answer with `status`.
    pub fn fail(&self, operation: Operation, status: u16) {
        self.lock().failures.insert(operation, status);
    }

    /// Answer list calls with `body` instead of the stored tasks.
    pub fn set_list_body(&self, body: Value) {
        self.lock().list_body = Some(body);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(
        &self,
        operation: Operation,
        call: ApiCall,
    ) -> Result<MutexGuard<'_, MemoryState>, RequestError> {
        let mut state = self.lock();
        state.calls.push(call);
        if let Some(status) = state.failures.get(&operation).copied() {
            return Err(RequestError::status(operation, status));
        }
        Ok(state)
    }
}

#[async_trait]
impl TaskApi for MemoryTaskApi {
    async fn list_tasks(&self, status: Option<TaskStatus>) -> Result<Value, RequestError> {
        let state = self.begin(Operation::List, ApiCall::List(status.clone()))?;
        if let Some(body) = &state.list_body {
            return Ok(body.clone());
        }
        let tasks: Vec<&Task> = state
            .tasks
            .iter()
            .filter(|task| status.as_ref().map_or(true, |s| &task.status == s))
            .collect();
        serde_json::to_value(tasks).map_err(|err| RequestError::from_error(Operation::List, err))
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, RequestError> {
        let mut state = self.begin(Operation::Create, ApiCall::Create(task.clone()))?;
        state.next_id += 1;
        let created = Task {
            id: TaskId::new(state.next_id.to_string()),
            title: task.title.clone(),
            description: task.description.clone(),
            category: task.category.clone(),
            status: TaskStatus::Pending,
            deadline: Some(task.deadline.clone()),
            created_at: Some(CREATED_AT.to_string()),
            updated_at: Some(CREATED_AT.to_string()),
        };
        state.tasks.push(created.clone());
        Ok(created)
    }

    async fn complete_task(&self, id: &TaskId) -> Result<Value, RequestError> {
        let mut state = self.begin(Operation::Complete, ApiCall::Complete(id.clone()))?;
        match state.tasks.iter_mut().find(|task| &task.id == id) {
            Some(task) => {
                task.status = TaskStatus::Completed;
                Ok(json!({ "status": "Task completed successfully!" }))
            }
            None => Err(RequestError::status(Operation::Complete, 404)),
        }
    }

    async fn delete_task(&self, id: &TaskId) -> Result<bool, RequestError> {
        let mut state = self.begin(Operation::Delete, ApiCall::Delete(id.clone()))?;
        let before = state.tasks.len();
        state.tasks.retain(|task| &task.id != id);
        if state.tasks.len() == before {
            return Err(RequestError::status(Operation::Delete, 404));
        }
        Ok(true)
    }
}
