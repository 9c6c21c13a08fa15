use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::TaskApi;
use crate::config::AppConfig;
use crate::error::{Operation, RequestError};
use crate::model::{NewTask, Task, TaskId, TaskStatus};

/// [`TaskApi`] over HTTP/JSON against `{base}/tasks/`.
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: Client,
    base: Url,
}

impl HttpTaskApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .with_context(|| format!("Invalid API base URL '{}'", base_url))?;
        if base.cannot_be_a_base() {
            bail!("Invalid API base URL '{}'", base_url);
        }
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(config.api_base_url())
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `{base}/seg1/seg2/.../` with every segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments).push("");
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(method = %method, url = %url, "sending task request");
        self.client.request(method, url)
    }

    async fn send(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<Response, RequestError> {
        let response = request.send().await.map_err(|err| {
            warn!(operation = ?operation, error = %err, "task request failed");
            RequestError::from_error(operation, err)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(operation = ?operation, status = status.as_u16(), "task service rejected request");
            return Err(RequestError::status(operation, status.as_u16()));
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        operation: Operation,
        response: Response,
    ) -> Result<T, RequestError> {
        response.json::<T>().await.map_err(|err| {
            warn!(operation = ?operation, error = %err, "could not decode task service response");
            RequestError::from_error(operation, err)
        })
    }
}

/// The service accepted the task; fields its answer leaves out are taken from
/// the draft that was sent.
fn created_task(sent: &NewTask, mut body: Value) -> Result<Task, RequestError> {
    if let (Value::Object(fields), Ok(Value::Object(draft))) =
        (&mut body, serde_json::to_value(sent))
    {
        for (key, value) in draft {
            let missing = fields.get(&key).map_or(true, Value::is_null);
            if missing {
                fields.insert(key, value);
            }
        }
    }
    serde_json::from_value(body).map_err(|err| {
        warn!(error = %err, "created task does not decode");
        RequestError::from_error(Operation::Create, err)
    })
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list_tasks(&self, status: Option<TaskStatus>) -> Result<Value, RequestError> {
        let mut url = self.endpoint(&["tasks"]);
        if let Some(status) = status {
            url.query_pairs_mut().append_pair("status", status.as_str());
        }
        let response = self
            .send(Operation::List, self.request(Method::GET, url))
            .await?;
        Self::decode(Operation::List, response).await
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, RequestError> {
        let url = self.endpoint(&["tasks"]);
        let request = self.request(Method::POST, url).json(task);
        let response = self.send(Operation::Create, request).await?;
        let body: Value = Self::decode(Operation::Create, response).await?;
        created_task(task, body)
    }

    async fn complete_task(&self, id: &TaskId) -> Result<Value, RequestError> {
        let url = self.endpoint(&["tasks", id.as_str(), "done"]);
        let request = self
            .request(Method::PATCH, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        let response = self.send(Operation::Complete, request).await?;
        Self::decode(Operation::Complete, response).await
    }

    async fn delete_task(&self, id: &TaskId) -> Result<bool, RequestError> {
        let url = self.endpoint(&["tasks", id.as_str()]);
        let response = self
            .send(Operation::Delete, self.request(Method::DELETE, url))
            .await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(true);
        }
        // Any other success must still carry JSON; its shape is not checked.
        Self::decode::<Value>(Operation::Delete, response).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn endpoints_keep_base_path_and_trailing_slash() {
        let api = HttpTaskApi::new("http://localhost:8000/api").unwrap();
        assert_eq!(
            api.endpoint(&["tasks"]).as_str(),
            "http://localhost:8000/api/tasks/"
        );
        assert_eq!(
            api.endpoint(&["tasks", "7", "done"]).as_str(),
            "http://localhost:8000/api/tasks/7/done/"
        );
    }

    #[test]
    fn endpoints_encode_opaque_ids() {
        let api = HttpTaskApi::new("http://localhost:8000/api/").unwrap();
        assert_eq!(
            api.endpoint(&["tasks", "a b/c"]).as_str(),
            "http://localhost:8000/api/tasks/a%20b%2Fc/"
        );
    }

    fn draft() -> NewTask {
        NewTask {
            title: "Buy milk".into(),
            description: "2%".into(),
            category: crate::model::Category::Urgent,
            deadline: "2024-01-01T10:00".into(),
        }
    }

    #[test]
    fn sparse_create_answers_are_completed_from_the_draft() {
        let task = created_task(&draft(), serde_json::json!({ "id": 12, "title": "Buy milk" }))
            .unwrap();

        assert_eq!(task.id, TaskId::new("12"));
        assert_eq!(task.category, crate::model::Category::Urgent);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.description, "2%");
        assert_eq!(task.deadline.as_deref(), Some("2024-01-01T10:00"));
    }

    #[test]
    fn server_values_win_over_the_draft() {
        let body = serde_json::json!({
            "id": 12,
            "title": "Buy milk",
            "category": "later",
            "status": "completed",
            "deadline": null
        });
        let task = created_task(&draft(), body).unwrap();

        assert_eq!(task.category, crate::model::Category::Later);
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.deadline.as_deref(), Some("2024-01-01T10:00"));
    }

    #[test]
    fn create_answers_without_an_id_are_errors() {
        let err = created_task(&draft(), serde_json::json!({ "title": "Buy milk" })).unwrap_err();
        assert!(err.to_string().starts_with("Error creating task: "));
        assert!(err.cause().contains("id"));
    }

    #[test]
    fn rejects_urls_that_cannot_hold_paths() {
        assert!(HttpTaskApi::new("mailto:someone@example.test").is_err());
    }
}
