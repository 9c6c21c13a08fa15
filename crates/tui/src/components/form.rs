use chrono::NaiveDateTime;
use tracing::{debug, info};

use super::field::TextField;
use crate::core::{Request, RequestError, ValidationError};
use crate::model::{Category, NewTask, Task, DEADLINE_INPUT_FORMAT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    Description,
    Category,
    Deadline,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Title,
        FormField::Description,
        FormField::Category,
        FormField::Deadline,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::Category => "Category",
            FormField::Deadline => "Deadline",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|field| *field == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Draft of a new task plus the state of its pending submission.
///
/// Edits are ignored while a create request is in flight, so the draft that
/// was sent is the draft that gets cleared on success.
#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    title: TextField,
    description: TextField,
    category: Option<Category>,
    deadline: TextField,
    focus: FormField,
    submitting: bool,
    error: Option<String>,
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    pub fn deadline(&self) -> &str {
        self.deadline.as_str()
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The text field behind `field`; `None` for the category picker.
    pub fn text_field(&self, field: FormField) -> Option<&TextField> {
        match field {
            FormField::Title => Some(&self.title),
            FormField::Description => Some(&self.description),
            FormField::Deadline => Some(&self.deadline),
            FormField::Category => None,
        }
    }

    pub fn set_title<T: Into<String>>(&mut self, value: T) {
        if !self.submitting {
            self.title.set(value);
        }
    }

    pub fn set_description<T: Into<String>>(&mut self, value: T) {
        if !self.submitting {
            self.description.set(value);
        }
    }

    pub fn set_category(&mut self, category: Option<Category>) {
        if !self.submitting {
            self.category = category;
        }
    }

    pub fn set_deadline<T: Into<String>>(&mut self, value: T) {
        if !self.submitting {
            self.deadline.set(value);
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn set_focus(&mut self, field: FormField) {
        self.focus = field;
    }

    pub fn insert_char(&mut self, ch: char) {
        self.edit(|field| field.insert(ch));
    }

    /// Newlines are only meaningful in the description.
    pub fn insert_newline(&mut self) {
        if self.focus == FormField::Description {
            self.edit(|field| field.insert('\n'));
        }
    }

    pub fn backspace(&mut self) {
        if self.focus == FormField::Category {
            self.set_category(None);
        } else {
            self.edit(TextField::backspace);
        }
    }

    pub fn delete_char(&mut self) {
        self.edit(TextField::delete);
    }

    pub fn move_left(&mut self) {
        if self.focus == FormField::Category {
            self.cycle_category(false);
        } else {
            self.edit(TextField::move_left);
        }
    }

    pub fn move_right(&mut self) {
        if self.focus == FormField::Category {
            self.cycle_category(true);
        } else {
            self.edit(TextField::move_right);
        }
    }

    pub fn move_home(&mut self) {
        self.edit(TextField::move_home);
    }

    pub fn move_end(&mut self) {
        self.edit(TextField::move_end);
    }

    /// Step through the known categories; the first step selects one.
    pub fn cycle_category(&mut self, forward: bool) {
        if self.submitting {
            return;
        }
        let choices = &Category::CHOICES;
        let position = self
            .category
            .as_ref()
            .and_then(|current| choices.iter().position(|choice| choice == current));
        let next = match (position, forward) {
            (None, true) => 0,
            (None, false) => choices.len() - 1,
            (Some(idx), true) => (idx + 1) % choices.len(),
            (Some(idx), false) => (idx + choices.len() - 1) % choices.len(),
        };
        self.category = Some(choices[next].clone());
    }

    /// Check the draft in field order; the first problem wins.
    pub fn validate(&self) -> Result<NewTask, ValidationError> {
        if self.title.is_blank() {
            return Err(ValidationError::MissingTitle);
        }
        if self.description.is_blank() {
            return Err(ValidationError::MissingDescription);
        }
        let Some(category) = self.category.clone() else {
            return Err(ValidationError::MissingCategory);
        };
        if self.deadline.is_blank() {
            return Err(ValidationError::MissingDeadline);
        }
        if NaiveDateTime::parse_from_str(self.deadline.as_str().trim(), DEADLINE_INPUT_FORMAT)
            .is_err()
        {
            return Err(ValidationError::InvalidDeadline);
        }

        Ok(NewTask {
            title: self.title.as_str().to_string(),
            description: self.description.as_str().to_string(),
            category,
            deadline: self.deadline.as_str().to_string(),
        })
    }

    /// Validate the draft and, if it passes, hand back the create request.
    pub fn submit(&mut self) -> Option<Request> {
        if self.submitting {
            debug!("create already in flight; ignoring submit");
            return None;
        }
        match self.validate() {
            Ok(task) => {
                self.error = None;
                self.submitting = true;
                Some(Request::Create(task))
            }
            Err(err) => {
                self.error = Some(err.to_string());
                None
            }
        }
    }

    /// Settle the in-flight create. A created task is returned to the caller
    /// and the draft starts over; a failure keeps the draft for another try.
    pub fn finish_submit(&mut self, result: Result<Task, RequestError>) -> Option<Task> {
        self.submitting = false;
        match result {
            Ok(task) => {
                info!(id = %task.id, "task created");
                self.reset();
                Some(task)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.title.clear();
        self.description.clear();
        self.category = None;
        self.deadline.clear();
        self.focus = FormField::Title;
        self.error = None;
    }

    fn edit<F: FnOnce(&mut TextField)>(&mut self, apply: F) {
        if self.submitting {
            return;
        }
        let field = match self.focus {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
            FormField::Deadline => &mut self.deadline,
            FormField::Category => return,
        };
        apply(field);
    }
}
