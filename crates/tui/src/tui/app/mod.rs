use std::time::Instant;

use ratatui::style::{Color, Style};
use ratatui::widgets::TableState;
use tracing::debug;

use super::constants::*;
use crate::components::TaskListView;
use crate::config::AppConfig;
use crate::core::{Reply, Request};
use crate::model::{StatusFilter, Task, TaskId};

mod input;
mod render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Form,
    Help,
    ConfirmDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmChoice {
    Yes,
    No,
}

impl ConfirmChoice {
    fn toggle(self) -> Self {
        match self {
            ConfirmChoice::Yes => ConfirmChoice::No,
            ConfirmChoice::No => ConfirmChoice::Yes,
        }
    }
}

/// Footer hint. Service errors are shown next to what failed, not here.
#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    created_at: Instant,
}

impl StatusMessage {
    fn new<T: Into<String>>(text: T) -> Self {
        Self {
            text: text.into(),
            created_at: Instant::now(),
        }
    }

    fn style(&self) -> Style {
        Style::default().fg(Color::Cyan)
    }
}

pub(crate) struct App {
    config: AppConfig,
    view: TaskListView,
    outbox: Vec<Request>,
    selected: usize,
    table_state: TableState,
    input_mode: InputMode,
    confirm_choice: ConfirmChoice,
    pending_delete: Option<TaskId>,
    status: Option<StatusMessage>,
    should_quit: bool,
}

impl App {
    /// The initial load is queued immediately; the caller dispatches it.
    pub(crate) fn new(config: AppConfig) -> Self {
        let mut view = TaskListView::new();
        let mount = view.mount();
        Self {
            config,
            view,
            outbox: vec![mount],
            selected: 0,
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
            confirm_choice: ConfirmChoice::No,
            pending_delete: None,
            status: None,
            should_quit: false,
        }
    }

    pub(crate) fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.outbox)
    }

    pub(crate) fn on_reply(&mut self, reply: Reply) {
        let keep = self.selected_task().map(|task| task.id.clone());
        self.view.apply(reply);
        self.sync_selection(keep.as_ref());
    }

    pub(crate) fn on_tick(&mut self, now: Instant) {
        self.view.prune_banner(now);
        if let Some(status) = &self.status {
            if now.saturating_duration_since(status.created_at) > STATUS_TTL {
                self.status = None;
            }
        }
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn dispatch(&mut self, request: Request) {
        debug!(request = ?request, "queueing request");
        self.outbox.push(request);
    }

    fn selected_task(&self) -> Option<&Task> {
        self.view.tasks().get(self.selected)
    }

    /// Follow the previously selected task if it is still listed, otherwise clamp.
    fn sync_selection(&mut self, keep: Option<&TaskId>) {
        let tasks = self.view.tasks();
        if tasks.is_empty() {
            self.selected = 0;
            self.table_state.select(None);
            return;
        }
        if let Some(idx) = keep.and_then(|id| tasks.iter().position(|task| &task.id == id)) {
            self.selected = idx;
        } else if self.selected >= tasks.len() {
            self.selected = tasks.len() - 1;
        }
        self.table_state.select(Some(self.selected));
    }

    fn select_next(&mut self) {
        let len = self.view.tasks().len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
        self.table_state.select(Some(self.selected));
    }

    fn select_prev(&mut self) {
        if self.view.tasks().is_empty() {
            return;
        }
        self.selected = self.selected.saturating_sub(1);
        self.table_state.select(Some(self.selected));
    }

    fn select_edge(&mut self, last: bool) {
        let len = self.view.tasks().len();
        if len == 0 {
            return;
        }
        self.selected = if last { len - 1 } else { 0 };
        self.table_state.select(Some(self.selected));
    }

    fn switch_filter(&mut self, filter: StatusFilter) {
        let request = self.view.set_filter(filter);
        self.dispatch(request);
        self.selected = 0;
        self.table_state.select(None);
    }

    fn refresh(&mut self) {
        let request = self.view.refresh();
        self.dispatch(request);
        self.set_status_info(STATUS_REFRESHING);
    }

    fn complete_selected(&mut self) {
        let Some(task) = self.selected_task().cloned() else {
            self.set_status_info(STATUS_NOTHING_SELECTED);
            return;
        };
        if task.is_completed() {
            self.set_status_info(STATUS_ALREADY_COMPLETED);
            return;
        }
        match self.view.begin_complete(&task.id) {
            Some(request) => self.dispatch(request),
            None => self.set_status_info(STATUS_BUSY),
        }
    }

    fn prompt_delete(&mut self) {
        let Some(id) = self.selected_task().map(|task| task.id.clone()) else {
            self.set_status_info(STATUS_NOTHING_SELECTED);
            return;
        };
        if !self.view.request_delete(&id) {
            self.set_status_info(STATUS_BUSY);
            return;
        }
        self.pending_delete = Some(id);
        self.confirm_choice = ConfirmChoice::No;
        self.input_mode = InputMode::ConfirmDelete;
        self.set_status_info(STATUS_CONFIRM_DELETE);
    }

    fn answer_delete(&mut self, confirmed: bool) {
        self.input_mode = InputMode::Normal;
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        match self.view.answer_delete(&id, confirmed) {
            Some(request) => {
                self.status = None;
                self.dispatch(request);
            }
            None => self.set_status_info(STATUS_DELETE_CANCELLED),
        }
    }

    fn open_form(&mut self) {
        self.input_mode = InputMode::Form;
        self.set_status_info(STATUS_FORM);
    }

    fn submit_form(&mut self) {
        if let Some(request) = self.view.submit_form() {
            self.dispatch(request);
        }
    }

    fn show_help_overlay(&mut self) {
        self.input_mode = InputMode::Help;
        self.set_status_info(STATUS_HELP);
    }

    pub(crate) fn set_status_info<T: Into<String>>(&mut self, message: T) {
        let mut text = String::from("ℹ️  ");
        text.push_str(&message.into());
        self.status = Some(StatusMessage::new(text));
    }
}
