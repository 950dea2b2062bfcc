use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value};
use taskdeck_shared::{TaskDto, TaskId, TaskPriority, TaskStatus};
use tracing::{debug, trace};

use crate::error::{Result, TaskError};

/// Identifier field names, in probe order.
pub const ID_FIELDS: [&str; 3] = ["id", "task_id", "_id"];

/// Normalize one raw task object. Returns `None` when no identifier can be
/// found; every other field degrades to a default.
pub fn normalize_task(value: &Value) -> Option<TaskDto> {
    let obj = value.as_object()?;
    let id = probe_id(obj)?;

    let status = match str_field(obj, &["status"]) {
        Some(raw) => TaskStatus::parse(&raw).unwrap_or_else(|| {
            debug!(status = %raw, task = %id, "unknown status, treating as todo");
            TaskStatus::Todo
        }),
        None => TaskStatus::Todo,
    };

    Some(TaskDto {
        title: str_field(obj, &["title"]).unwrap_or_default(),
        description: str_field(obj, &["description"]),
        status,
        tags: tags_field(obj),
        priority: str_field(obj, &["priority"]).and_then(|p| TaskPriority::parse(&p)),
        due_date: str_field(obj, &["due_date", "dueDate"]),
        created_at: str_field(obj, &["createdAt", "created_at"]),
        updated_at: str_field(obj, &["updatedAt", "updated_at"]),
        id,
    })
}

/// Decode the body of a single-task response (create, update, fetch one).
///
/// Accepts a bare task object, a `{ "data": task }` wrapper, or (for
/// backends that answer a patch with the whole collection) an array that
/// contains the task with `expected` id.
pub fn decode_task(body: &str, expected: Option<&TaskId>) -> Result<TaskDto> {
    let value: Value =
        serde_json::from_str(body).map_err(|err| TaskError::Parse(err.to_string()))?;

    let candidate = match &value {
        Value::Object(obj) if probe_id(obj).is_none() => obj.get("data").cloned(),
        Value::Array(items) => expected.and_then(|id| {
            items
                .iter()
                .find(|item| item.as_object().and_then(probe_id).as_ref() == Some(id))
                .cloned()
        }),
        _ => Some(value.clone()),
    };

    candidate
        .as_ref()
        .and_then(normalize_task)
        .ok_or_else(|| TaskError::Parse("response did not contain a task".to_string()))
}

fn probe_id(obj: &Map<String, Value>) -> Option<TaskId> {
    for field in ID_FIELDS {
        let Some(raw) = obj.get(field) else {
            continue;
        };
        let id = match raw {
            Value::Number(n) => n
                .as_u64()
                .map(TaskId::from)
                .or_else(|| n.as_i64().map(|v| TaskId::new(v.to_string()))),
            Value::String(s) if !s.trim().is_empty() => Some(TaskId::new(s.trim())),
            // Mongo extended JSON: { "$oid": "..." }
            Value::Object(inner) => inner
                .get("$oid")
                .and_then(Value::as_str)
                .map(TaskId::from),
            _ => None,
        };
        if let Some(id) = id {
            trace!(field, id = %id, "resolved task id");
            return Some(id);
        }
    }
    None
}

fn str_field(obj: &Map<String, Value>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| obj.get(*name).and_then(Value::as_str))
        .map(str::to_string)
}

fn tags_field(obj: &Map<String, Value>) -> Vec<String> {
    match obj.get("tags") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(joined)) => split_tags(joined),
        _ => vec![],
    }
}

/// Split a comma separated tag list, trimming and dropping blanks.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Add `tag` (trimmed) unless empty or already present.
pub fn push_tag_unique(tags: &mut Vec<String>, tag: &str) -> bool {
    let tag = tag.trim();
    if tag.is_empty() || tags.iter().any(|t| t == tag) {
        return false;
    }
    tags.push(tag.to_string());
    true
}

/// Timestamp shown on a row: last update, else creation.
pub fn row_timestamp(task: &TaskDto) -> Option<String> {
    task.updated_at
        .as_deref()
        .or(task.created_at.as_deref())
        .map(format_timestamp)
}

/// Due date shown on a row, if the task has one.
pub fn due_label(task: &TaskDto) -> Option<String> {
    task.due_date
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(format_timestamp)
}

/// `YYYY-MM-DD HH:MM` for RFC 3339 or naive ISO timestamps; anything else is
/// returned verbatim.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
    }
    raw.to_string()
}
