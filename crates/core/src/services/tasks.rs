use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;
use tracing::debug;

use crate::api::{HttpTaskApi, TaskApi};
use crate::config::AppConfig;
use crate::error::RequestError;
use crate::model::{NewTask, Task, TaskId, TaskStatus};

/// A call the interface wants made against the task service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Full reload; `seq` identifies the load so stale answers can be dropped.
    Load {
        seq: u64,
        status: Option<TaskStatus>,
    },
    Create(NewTask),
    Complete(TaskId),
    Delete(TaskId),
}

/// The answer to a [`Request`], carrying enough to route it back.
#[derive(Debug, Clone)]
pub enum Reply {
    Loaded {
        seq: u64,
        result: Result<Value, RequestError>,
    },
    Created(Result<Task, RequestError>),
    Completed {
        id: TaskId,
        result: Result<Value, RequestError>,
    },
    Deleted {
        id: TaskId,
        result: Result<bool, RequestError>,
    },
}

#[derive(Clone)]
pub struct TasksService {
    api: Arc<dyn TaskApi>,
}

impl TasksService {
    pub fn new(api: Arc<dyn TaskApi>) -> Self {
        Self { api }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let api = HttpTaskApi::from_config(config)?;
        Ok(Self::new(Arc::new(api)))
    }

    pub fn api(&self) -> &dyn TaskApi {
        self.api.as_ref()
    }

    pub async fn execute(&self, request: Request) -> Reply {
        debug!(request = ?request, "executing task request");
        match request {
            Request::Load { seq, status } => Reply::Loaded {
                seq,
                result: self.api.list_tasks(status).await,
            },
            Request::Create(task) => Reply::Created(self.api.create_task(&task).await),
            Request::Complete(id) => {
                let result = self.api.complete_task(&id).await;
                Reply::Completed { id, result }
            }
            Request::Delete(id) => {
                let result = self.api.delete_task(&id).await;
                Reply::Deleted { id, result }
            }
        }
    }
}

/// Decode a list body. Anything but an array yields no tasks; array entries
/// that are not tasks are skipped.
pub fn tasks_from_body(body: Value) -> Vec<Task> {
    let Value::Array(items) = body else {
        debug!("list body is not an array; treating it as empty");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Task>(item) {
            Ok(task) => Some(task),
            Err(err) => {
                tracing::warn!(error = %err, "skipping malformed task in list body");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::{ApiCall, MemoryTaskApi};
    use crate::error::Operation;
    use crate::model::Category;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn service_with_api() -> (TasksService, Arc<MemoryTaskApi>) {
        let api = Arc::new(MemoryTaskApi::new());
        (TasksService::new(api.clone()), api)
    }

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.into(),
            description: "desc".into(),
            category: Category::Important,
            deadline: "2024-01-01T10:00".into(),
        }
    }

    #[tokio::test]
    async fn load_carries_sequence_and_status() {
        let (service, api) = service_with_api();
        let reply = service
            .execute(Request::Load {
                seq: 7,
                status: Some(TaskStatus::Pending),
            })
            .await;

        match reply {
            Reply::Loaded { seq, result } => {
                assert_eq!(seq, 7);
                assert_eq!(result.unwrap(), json!([]));
            }
            other => panic!("unexpected reply {:?}", other),
        }
        assert_eq!(api.calls(), vec![ApiCall::List(Some(TaskStatus::Pending))]);
    }

    #[tokio::test]
    async fn create_then_complete_and_delete() {
        let (service, api) = service_with_api();
        let Reply::Created(Ok(task)) = service.execute(Request::Create(new_task("Ship"))).await
        else {
            panic!("create failed");
        };
        assert_eq!(task.status, TaskStatus::Pending);

        let reply = service.execute(Request::Complete(task.id.clone())).await;
        assert!(matches!(reply, Reply::Completed { result: Ok(_), .. }));
        assert_eq!(api.tasks()[0].status, TaskStatus::Completed);

        let reply = service.execute(Request::Delete(task.id.clone())).await;
        assert!(matches!(reply, Reply::Deleted { result: Ok(true), .. }));
        assert!(api.tasks().is_empty());
    }

    #[tokio::test]
    async fn failures_come_back_wrapped() {
        let (service, api) = service_with_api();
        api.fail(Operation::Create, 503);
        let Reply::Created(Err(err)) = service.execute(Request::Create(new_task("x"))).await
        else {
            panic!("expected failure");
        };
        assert_eq!(err.to_string(), "Error creating task: HTTP 503");
    }

    #[test]
    fn non_array_bodies_decode_to_nothing() {
        assert!(tasks_from_body(json!({ "detail": "oops" })).is_empty());
        assert!(tasks_from_body(Value::Null).is_empty());
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let tasks = tasks_from_body(json!([
            { "id": 1, "title": "ok", "category": "later", "status": "pending" },
            { "title": "missing id" },
            "nonsense"
        ]));
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "ok");
    }
}
