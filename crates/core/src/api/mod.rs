//! The four calls the client makes against the remote task service.

mod http;
#[cfg(any(test, feature = "testing"))]
pub mod memory;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RequestError;
use crate::model::{NewTask, Task, TaskId, TaskStatus};

pub use http::HttpTaskApi;

/// Every method makes exactly one attempt and reports any failure as a
/// [`RequestError`] tagged with the operation that failed.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Raw list body, narrowed by `status` when given. Usually an array of tasks.
    async fn list_tasks(&self, status: Option<TaskStatus>) -> Result<Value, RequestError>;

    async fn create_task(&self, task: &NewTask) -> Result<Task, RequestError>;

    /// Whatever the service answers with; may be a partial task or a message object.
    async fn complete_task(&self, id: &TaskId) -> Result<Value, RequestError>;

    async fn delete_task(&self, id: &TaskId) -> Result<bool, RequestError>;
}
