use crate::time::{self, ClockTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const STATUS_IN_PROGRESS: &str = "⏳ In Progress";
pub const STATUS_COMPLETED: &str = "✅ Completed";

/// Status tokens that mean "done" in any supported language.
pub const COMPLETED_STATUSES: &[&str] = &[STATUS_COMPLETED, "✅ Завершено"];

/// Opaque task identity. Markdown carries no id, so ids are minted whenever a
/// task enters memory and are never reused within a task list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    /// Need not name an existing category.
    pub category_name: String,
    /// Free text, kept verbatim.
    pub status: String,
}

impl Task {
    /// Text fields are stored trimmed; the document could not carry edge
    /// whitespace through a save anyway.
    pub fn new(
        name: impl Into<String>,
        start_time: ClockTime,
        end_time: ClockTime,
        category_name: impl Into<String>,
    ) -> Self {
        Self {
            id: TaskId::generate(),
            name: trimmed(name.into()),
            start_time,
            end_time,
            category_name: trimmed(category_name.into()),
            status: STATUS_IN_PROGRESS.to_string(),
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = trimmed(status.into());
        self
    }

    pub fn is_overnight(&self) -> bool {
        time::is_overnight(self.start_time, self.end_time)
    }

    pub fn duration_minutes(&self) -> u32 {
        time::span_minutes(self.start_time, self.end_time)
    }

    pub fn is_completed(&self) -> bool {
        COMPLETED_STATUSES.contains(&self.status.trim())
    }

    /// Field-wise equality ignoring `id`; re-imported tasks are reconciled this way.
    pub fn same_content(&self, other: &Task) -> bool {
        self.name == other.name
            && self.start_time == other.start_time
            && self.end_time == other.end_time
            && self.category_name == other.category_name
            && self.status == other.status
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// `#RRGGBB`.
    pub color: String,
}

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: trimmed(name.into()),
            color: color.into(),
        }
    }
}

fn trimmed(value: String) -> String {
    if value.trim().len() == value.len() {
        value
    } else {
        value.trim().to_string()
    }
}

/// A whole-entity change coming from a UI. Deletion is a real removal; there
/// is no tombstone flag on `Task`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEdit {
    Replace(Task),
    Delete(TaskId),
}
