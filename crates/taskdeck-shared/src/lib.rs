use std::fmt;

use serde::{
  Deserialize,
  Serialize
};

/// Canonical task identifier. Backends
/// hand out numbers or strings; both are
/// kept as their decimal/text form.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
  pub fn new(
    raw: impl Into<String>
  ) -> Self {
    Self(raw.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for TaskId {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<u64> for TaskId {
  fn from(value: u64) -> Self {
    Self(value.to_string())
  }
}

impl From<&str> for TaskId {
  fn from(value: &str) -> Self {
    Self(value.to_string())
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Hash,
  Default,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
  #[default]
  #[serde(alias = "pending")]
  Todo,
  InProgress,
  Done
}

impl TaskStatus {
  pub const ALL: [TaskStatus; 3] = [
    TaskStatus::Todo,
    TaskStatus::InProgress,
    TaskStatus::Done
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      | TaskStatus::Todo => "todo",
      | TaskStatus::InProgress => {
        "in_progress"
      }
      | TaskStatus::Done => "done"
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | TaskStatus::Todo => "To do",
      | TaskStatus::InProgress => {
        "In progress"
      }
      | TaskStatus::Done => "Done"
    }
  }

  pub fn parse(
    raw: &str
  ) -> Option<Self> {
    match raw
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "todo" | "pending" => {
        Some(TaskStatus::Todo)
      }
      | "in_progress" => {
        Some(TaskStatus::InProgress)
      }
      | "done" => Some(TaskStatus::Done),
      | _ => None
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
  Low,
  #[serde(alias = "medium")]
  Med,
  High
}

impl TaskPriority {
  pub fn as_str(self) -> &'static str {
    match self {
      | TaskPriority::Low => "low",
      | TaskPriority::Med => "med",
      | TaskPriority::High => "high"
    }
  }

  pub fn parse(
    raw: &str
  ) -> Option<Self> {
    match raw
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "low" => Some(TaskPriority::Low),
      | "med" | "medium" => {
        Some(TaskPriority::Med)
      }
      | "high" => {
        Some(TaskPriority::High)
      }
      | _ => None
    }
  }
}

/// A task after boundary normalization.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct TaskDto {
  pub id:          TaskId,
  #[serde(default)]
  pub title:       String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub status:      TaskStatus,
  #[serde(default)]
  pub tags:        Vec<String>,
  pub priority:    Option<TaskPriority>,
  pub due_date:    Option<String>,
  pub created_at:  Option<String>,
  pub updated_at:  Option<String>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct TaskCreate {
  pub title:       String,
  pub description: String,
  pub status:      TaskStatus,
  #[serde(
    default,
    skip_serializing_if = "Vec::is_empty"
  )]
  pub tags:        Vec<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub priority:    Option<TaskPriority>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Default,
)]
pub struct TaskPatch {
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub title:       Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub description: Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub status:      Option<TaskStatus>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub tags:        Option<Vec<String>>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub priority:    Option<TaskPriority>
}

impl TaskPatch {
  pub fn is_empty(&self) -> bool {
    self.title.is_none()
      && self.description.is_none()
      && self.status.is_none()
      && self.tags.is_none()
      && self.priority.is_none()
  }
}
