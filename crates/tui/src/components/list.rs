use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, warn};

use super::form::TaskForm;
use super::row::TaskRow;
use crate::core::services::tasks_from_body;
use crate::core::{Reply, Request, RequestError};
use crate::model::{StatusFilter, Task, TaskCounts, TaskId};

pub const BANNER_TTL: Duration = Duration::from_secs(3);
pub const LOADING_TEXT: &str = "Loading tasks...";
pub const BANNER_CREATED: &str = "Task created successfully!";
pub const BANNER_UPDATED: &str = "Task updated successfully!";
pub const BANNER_DELETED: &str = "Task deleted successfully!";

pub fn empty_message(filter: StatusFilter) -> &'static str {
    match filter {
        StatusFilter::All => "No tasks found. Create a new one!",
        StatusFilter::Pending => "No pending tasks.",
        StatusFilter::Completed => "No completed tasks.",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    text: String,
    shown_at: Instant,
}

impl Banner {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            shown_at: Instant::now(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= BANNER_TTL
    }
}

/// The task collection under the current filter, together with the entry
/// form and the per-row states. Every service call leaves as a [`Request`]
/// and its outcome comes back through [`TaskListView::apply`].
#[derive(Debug, Default)]
pub struct TaskListView {
    tasks: Vec<Task>,
    filter: StatusFilter,
    loading: bool,
    error: Option<String>,
    banner: Option<Banner>,
    rows: HashMap<TaskId, TaskRow>,
    form: TaskForm,
    load_seq: u64,
}

impl TaskListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_ref().map(Banner::text)
    }

    pub fn form(&self) -> &TaskForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut TaskForm {
        &mut self.form
    }

    pub fn row(&self, id: &TaskId) -> Option<&TaskRow> {
        self.rows.get(id)
    }

    pub fn counts(&self) -> TaskCounts {
        TaskCounts::from_tasks(&self.tasks)
    }

    pub fn empty_message(&self) -> &'static str {
        empty_message(self.filter)
    }

    pub fn mount(&mut self) -> Request {
        self.reload()
    }

    /// Switching to the filter already shown still reloads.
    pub fn set_filter(&mut self, filter: StatusFilter) -> Request {
        self.filter = filter;
        self.reload()
    }

    pub fn refresh(&mut self) -> Request {
        self.reload()
    }

    fn reload(&mut self) -> Request {
        self.load_seq += 1;
        self.loading = true;
        self.error = None;
        Request::Load {
            seq: self.load_seq,
            status: self.filter.status(),
        }
    }

    pub fn submit_form(&mut self) -> Option<Request> {
        self.form.submit()
    }

    pub fn begin_complete(&mut self, id: &TaskId) -> Option<Request> {
        let task = self.task(id)?.clone();
        self.rows.entry(task.id.clone()).or_default().begin_complete(&task)
    }

    pub fn request_delete(&mut self, id: &TaskId) -> bool {
        if self.task(id).is_none() {
            return false;
        }
        self.rows.entry(id.clone()).or_default().request_delete()
    }

    pub fn answer_delete(&mut self, id: &TaskId, confirmed: bool) -> Option<Request> {
        let task = self.task(id)?.clone();
        self.rows
            .entry(task.id.clone())
            .or_default()
            .answer_delete(&task, confirmed)
    }

    /// Route the outcome of a request to whoever issued it.
    pub fn apply(&mut self, reply: Reply) {
        match reply {
            Reply::Loaded { seq, result } => self.on_loaded(seq, result),
            Reply::Created(result) => {
                if let Some(task) = self.form.finish_submit(result) {
                    self.on_task_created(task);
                }
            }
            Reply::Completed { id, result } => {
                let Some(task) = self.task(&id).cloned() else {
                    debug!(id = %id, "completed task is no longer listed");
                    self.rows.remove(&id);
                    return;
                };
                let updated = self
                    .rows
                    .entry(id)
                    .or_default()
                    .finish_complete(&task, result);
                if let Some(updated) = updated {
                    self.on_task_updated(updated);
                }
            }
            Reply::Deleted { id, result } => {
                let deleted = self
                    .rows
                    .entry(id.clone())
                    .or_default()
                    .finish_delete(&id, result);
                if let Some(id) = deleted {
                    self.on_task_deleted(&id);
                }
            }
        }
    }

    fn on_loaded(&mut self, seq: u64, result: Result<Value, RequestError>) {
        if seq != self.load_seq {
            debug!(seq, latest = self.load_seq, "discarding stale task list");
            return;
        }
        self.loading = false;
        match result {
            Ok(body) => {
                self.tasks = tasks_from_body(body);
                let tasks = &self.tasks;
                self.rows
                    .retain(|id, _| tasks.iter().any(|task| &task.id == id));
                debug!(count = self.tasks.len(), filter = ?self.filter, "task list loaded");
            }
            Err(err) => {
                warn!(error = %err, "task list failed to load");
                self.error = Some(err.to_string());
            }
        }
    }

    pub fn on_task_created(&mut self, task: Task) {
        self.tasks.insert(0, task);
        self.banner = Some(Banner::new(BANNER_CREATED));
    }

    pub fn on_task_updated(&mut self, task: Task) {
        if let Some(existing) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            *existing = task;
        }
        self.banner = Some(Banner::new(BANNER_UPDATED));
    }

    pub fn on_task_deleted(&mut self, id: &TaskId) {
        self.tasks.retain(|task| &task.id != id);
        self.rows.remove(id);
        self.banner = Some(Banner::new(BANNER_DELETED));
    }

    /// Drop the banner once it has been visible for [`BANNER_TTL`].
    pub fn prune_banner(&mut self, now: Instant) {
        if self.banner.as_ref().is_some_and(|banner| banner.expired(now)) {
            self.banner = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Operation;
    use crate::model::{Category, NewTask, TaskStatus};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn task_json(id: u64, title: &str, status: &str) -> Value {
        json!({
            "id": id,
            "title": title,
            "description": "d",
            "category": "important",
            "status": status,
            "deadline": "2024-01-01T10:00:00Z",
            "created_at": "2023-12-31T08:00:00Z"
        })
    }

    fn task(id: &str, title: &str) -> Task {
        Task {
            id: TaskId::new(id),
            title: title.into(),
            description: "d".into(),
            category: Category::Important,
            status: TaskStatus::Pending,
            deadline: Some("2024-01-01T10:00".into()),
            created_at: None,
            updated_at: None,
        }
    }

    fn loaded(view: &mut TaskListView, body: Value) {
        let Request::Load { seq, .. } = view.mount() else {
            panic!("mount must load");
        };
        view.apply(Reply::Loaded {
            seq,
            result: Ok(body),
        });
    }

    fn ids(view: &TaskListView) -> Vec<&str> {
        view.tasks().iter().map(|task| task.id.as_str()).collect()
    }

    #[test]
    fn mount_loads_everything() {
        let mut view = TaskListView::new();

        assert_eq!(view.mount(), Request::Load { seq: 1, status: None });
        assert!(view.is_loading());
    }

    #[test]
    fn switching_filter_reloads_with_status() {
        let mut view = TaskListView::new();
        loaded(&mut view, json!([task_json(1, "a", "pending"), task_json(2, "b", "completed")]));

        let request = view.set_filter(StatusFilter::Pending);
        assert_eq!(
            request,
            Request::Load {
                seq: 2,
                status: Some(TaskStatus::Pending)
            }
        );
        view.apply(Reply::Loaded {
            seq: 2,
            result: Ok(json!([task_json(1, "a", "pending")])),
        });

        assert_eq!(ids(&view), vec!["1"]);
        assert!(!view.is_loading());
    }

    #[test]
    fn same_filter_is_still_a_reload() {
        let mut view = TaskListView::new();
        view.mount();

        assert_eq!(
            view.set_filter(StatusFilter::All),
            Request::Load { seq: 2, status: None }
        );
    }

    #[test]
    fn stale_loads_are_discarded() {
        let mut view = TaskListView::new();
        view.mount();
        view.set_filter(StatusFilter::Completed);

        view.apply(Reply::Loaded {
            seq: 1,
            result: Ok(json!([task_json(1, "old", "pending")])),
        });
        assert!(view.tasks().is_empty());
        assert!(view.is_loading());

        view.apply(Reply::Loaded {
            seq: 2,
            result: Ok(json!([task_json(2, "new", "completed")])),
        });
        assert_eq!(ids(&view), vec!["2"]);
        assert!(!view.is_loading());
    }

    #[test]
    fn non_array_body_empties_the_list_without_error() {
        let mut view = TaskListView::new();
        loaded(&mut view, json!([task_json(1, "a", "pending")]));

        loaded(&mut view, json!({ "detail": "odd" }));

        assert!(view.tasks().is_empty());
        assert_eq!(view.error(), None);
        assert_eq!(view.empty_message(), "No tasks found. Create a new one!");
    }

    #[test]
    fn load_failure_keeps_the_collection() {
        let mut view = TaskListView::new();
        loaded(&mut view, json!([task_json(1, "a", "pending")]));

        let Request::Load { seq, .. } = view.refresh() else {
            panic!("refresh must load");
        };
        view.apply(Reply::Loaded {
            seq,
            result: Err(RequestError::status(Operation::List, 502)),
        });

        assert_eq!(ids(&view), vec!["1"]);
        assert_eq!(view.error(), Some("Error listing tasks: HTTP 502"));
        assert!(!view.is_loading());

        view.refresh();
        assert_eq!(view.error(), None);
    }

    #[test]
    fn create_create_delete_leaves_the_second_task() {
        let mut view = TaskListView::new();
        loaded(&mut view, json!([]));

        view.on_task_created(task("a", "A"));
        view.on_task_created(task("b", "B"));
        assert_eq!(ids(&view), vec!["b", "a"]);

        view.on_task_deleted(&TaskId::new("a"));
        assert_eq!(ids(&view), vec!["b"]);
        assert_eq!(view.banner(), Some(BANNER_DELETED));
    }

    #[test]
    fn form_reply_prepends_the_created_task() {
        let mut view = TaskListView::new();
        loaded(&mut view, json!([task_json(1, "old", "pending")]));
        let form = view.form_mut();
        form.set_title("Buy milk");
        form.set_description("2%");
        form.set_category(Some(Category::Urgent));
        form.set_deadline("2024-01-01T10:00");

        let Some(Request::Create(draft)) = view.submit_form() else {
            panic!("valid draft must submit");
        };
        assert_eq!(
            draft,
            NewTask {
                title: "Buy milk".into(),
                description: "2%".into(),
                category: Category::Urgent,
                deadline: "2024-01-01T10:00".into(),
            }
        );
        view.apply(Reply::Created(Ok(task("9", "Buy milk"))));

        assert_eq!(ids(&view), vec!["9", "1"]);
        assert_eq!(view.banner(), Some(BANNER_CREATED));
        assert_eq!(view.form().title(), "");
    }

    #[test]
    fn completing_changes_only_that_task() {
        let mut view = TaskListView::new();
        loaded(&mut view, json!([task_json(1, "a", "pending"), task_json(2, "b", "pending")]));
        let id = TaskId::new("2");

        let request = view.begin_complete(&id);
        assert_eq!(request, Some(Request::Complete(id.clone())));
        assert!(view.row(&id).is_some_and(TaskRow::is_busy));

        view.apply(Reply::Completed {
            id: id.clone(),
            result: Ok(json!({ "status": "Task completed successfully!" })),
        });

        let statuses: Vec<_> = view.tasks().iter().map(|t| t.status.clone()).collect();
        assert_eq!(statuses, vec![TaskStatus::Pending, TaskStatus::Completed]);
        assert_eq!(view.banner(), Some(BANNER_UPDATED));
        assert_eq!(view.counts().completed, 1);
    }

    #[test]
    fn declined_delete_issues_nothing() {
        let mut view = TaskListView::new();
        loaded(&mut view, json!([task_json(1, "a", "pending")]));
        let id = TaskId::new("1");

        assert!(view.request_delete(&id));
        assert_eq!(view.answer_delete(&id, false), None);
        assert_eq!(ids(&view), vec!["1"]);
    }

    #[test]
    fn confirmed_delete_removes_exactly_that_task() {
        let mut view = TaskListView::new();
        loaded(&mut view, json!([task_json(1, "a", "pending"), task_json(2, "b", "pending")]));
        let id = TaskId::new("1");

        view.request_delete(&id);
        assert_eq!(view.answer_delete(&id, true), Some(Request::Delete(id.clone())));
        view.apply(Reply::Deleted {
            id: id.clone(),
            result: Ok(true),
        });

        assert_eq!(ids(&view), vec!["2"]);
        assert!(view.row(&id).is_none());
    }

    #[test]
    fn failed_delete_surfaces_on_the_row() {
        let mut view = TaskListView::new();
        loaded(&mut view, json!([task_json(1, "a", "pending")]));
        let id = TaskId::new("1");
        view.request_delete(&id);
        view.answer_delete(&id, true);

        view.apply(Reply::Deleted {
            id: id.clone(),
            result: Err(RequestError::status(Operation::Delete, 500)),
        });

        assert_eq!(ids(&view), vec!["1"]);
        assert_eq!(
            view.row(&id).and_then(TaskRow::error),
            Some("Error deleting task: HTTP 500")
        );
        assert_eq!(view.banner(), None);
    }

    #[test]
    fn banner_clears_after_three_seconds() {
        let mut view = TaskListView::new();
        view.on_task_created(task("a", "A"));

        view.prune_banner(Instant::now());
        assert_eq!(view.banner(), Some(BANNER_CREATED));

        view.prune_banner(Instant::now() + BANNER_TTL);
        assert_eq!(view.banner(), None);
    }

    #[test]
    fn counts_follow_the_collection() {
        let mut view = TaskListView::new();
        loaded(
            &mut view,
            json!([
                task_json(1, "a", "pending"),
                task_json(2, "b", "completed"),
                task_json(3, "c", "pending")
            ]),
        );

        assert_eq!(
            view.counts(),
            TaskCounts {
                total: 3,
                pending: 2,
                completed: 1
            }
        );
    }

    #[test]
    fn empty_messages_depend_on_filter() {
        assert_eq!(empty_message(StatusFilter::Pending), "No pending tasks.");
        assert_eq!(empty_message(StatusFilter::Completed), "No completed tasks.");
    }
}
