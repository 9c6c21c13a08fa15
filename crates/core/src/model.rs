use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, NaiveDateTime};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Format the create payload uses for deadlines (`datetime-local` shape).
pub const DEADLINE_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Service-assigned identifier. Never interpreted by the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(String);

impl TaskId {
    pub fn new<T: Into<String>>(value: T) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Serialize for TaskId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => TaskId(text),
            RawId::Number(number) => TaskId(number.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Pending,
    Completed,
    /// A value the service sent that this client does not know about.
    Other(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
            TaskStatus::Other(raw) => raw.as_str(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Completed => "Completed",
            TaskStatus::Other(raw) => raw.as_str(),
        }
    }

    fn from_raw(raw: String) -> Self {
        match raw.as_str() {
            "pending" => TaskStatus::Pending,
            "completed" => TaskStatus::Completed,
            _ => TaskStatus::Other(raw),
        }
    }
}

/// Tasks the service returns without a status are new, hence pending.
impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "completed" | "done" => Ok(TaskStatus::Completed),
            other => Err(anyhow!(
                "Unknown status '{}': expected pending|completed",
                other
            )),
        }
    }
}

impl ValueEnum for TaskStatus {
    fn value_variants<'a>() -> &'a [Self] {
        static VARIANTS: [TaskStatus; 2] = [TaskStatus::Pending, TaskStatus::Completed];
        &VARIANTS
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        match self {
            TaskStatus::Other(_) => None,
            known => Some(clap::builder::PossibleValue::new(match known {
                TaskStatus::Pending => "pending",
                _ => "completed",
            })),
        }
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(TaskStatus::from_raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Urgent,
    Important,
    Later,
    Other(String),
}

impl Category {
    /// Categories a new task can be filed under, in picker order.
    pub const CHOICES: [Category; 3] = [Category::Urgent, Category::Important, Category::Later];

    pub fn as_str(&self) -> &str {
        match self {
            Category::Urgent => "urgent",
            Category::Important => "important",
            Category::Later => "later",
            Category::Other(raw) => raw.as_str(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Category::Urgent => "Urgent",
            Category::Important => "Important",
            Category::Later => "Later",
            Category::Other(raw) => raw.as_str(),
        }
    }

    fn from_raw(raw: String) -> Self {
        match raw.as_str() {
            "urgent" => Category::Urgent,
            "important" => Category::Important,
            "later" => Category::Later,
            _ => Category::Other(raw),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "urgent" => Ok(Category::Urgent),
            "important" => Ok(Category::Important),
            "later" => Ok(Category::Later),
            other => Err(anyhow!(
                "Unknown category '{}': expected urgent|important|later",
                other
            )),
        }
    }
}

impl ValueEnum for Category {
    fn value_variants<'a>() -> &'a [Self] {
        static VARIANTS: [Category; 3] = Category::CHOICES;
        &VARIANTS
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        match self {
            Category::Other(_) => None,
            Category::Urgent => Some(clap::builder::PossibleValue::new("urgent")),
            Category::Important => Some(clap::builder::PossibleValue::new("important")),
            Category::Later => Some(clap::builder::PossibleValue::new("later")),
        }
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Category::from_raw)
    }
}

/// The status predicate of the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [
        StatusFilter::All,
        StatusFilter::Pending,
        StatusFilter::Completed,
    ];

    /// Status query the list endpoint is narrowed by, if any.
    pub fn status(self) -> Option<TaskStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Pending => Some(TaskStatus::Pending),
            StatusFilter::Completed => Some(TaskStatus::Completed),
        }
    }

    pub fn index(self) -> usize {
        match self {
            StatusFilter::All => 0,
            StatusFilter::Pending => 1,
            StatusFilter::Completed => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn deadline_at(&self) -> Option<NaiveDateTime> {
        self.deadline.as_deref().and_then(parse_datetime)
    }

    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.created_at.as_deref().and_then(parse_datetime)
    }

    /// Copy of this task with its status moved to completed.
    pub fn completed(&self) -> Self {
        Self {
            status: TaskStatus::Completed,
            ..self.clone()
        }
    }
}

/// Body of the create request, carried exactly as the user entered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub deadline: String,
}

/// Aggregate counts over the tasks currently held by the list view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

impl TaskCounts {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut counts, task| {
            counts.total += 1;
            match task.status {
                TaskStatus::Pending => counts.pending += 1,
                TaskStatus::Completed => counts.completed += 1,
                TaskStatus::Other(_) => {}
            }
            counts
        })
    }
}

/// Parse a service or user supplied date-time, local time for offset-less values.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}
