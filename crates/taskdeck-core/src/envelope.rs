use serde_json::Value;
use taskdeck_shared::TaskDto;
use tracing::{debug, warn};

use crate::task::normalize_task;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Canonical list response.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub items: Vec<TaskDto>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl Envelope {
    pub fn empty() -> Self {
        Self {
            items: vec![],
            total: 0,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The wire shapes a list endpoint is known to answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListShape {
    /// `{ items, total, page, pageSize }`
    Items,
    /// `{ data, meta: { total, page, pageSize } }`
    DataMeta,
    /// `{ results, totalCount, page, pageSize }`
    Results,
    /// `[ ... ]`
    BareArray,
}

impl ListShape {
    pub fn detect(value: &Value) -> Option<Self> {
        if value.is_array() {
            return Some(ListShape::BareArray);
        }
        let obj = value.as_object()?;
        [
            ("items", ListShape::Items),
            ("data", ListShape::DataMeta),
            ("results", ListShape::Results),
        ]
        .into_iter()
        .find(|(field, _)| obj.get(*field).is_some_and(Value::is_array))
        .map(|(_, shape)| shape)
    }
}

/// Convert any recognized list body into an [`Envelope`]. Unrecognized
/// shapes become [`Envelope::empty`]. `requested_page_size` replaces a
/// missing or zero page size.
pub fn normalize_envelope(value: &Value, requested_page_size: u32) -> Envelope {
    let Some(shape) = ListShape::detect(value) else {
        warn!("unrecognized list response shape, using empty envelope");
        return Envelope::empty();
    };

    let (raw_items, meta) = match shape {
        ListShape::Items => (&value["items"], value),
        ListShape::DataMeta => (&value["data"], &value["meta"]),
        ListShape::Results => (&value["results"], value),
        ListShape::BareArray => (value, &Value::Null),
    };
    let raw_items = raw_items.as_array().map(Vec::as_slice).unwrap_or_default();

    let items: Vec<TaskDto> = raw_items
        .iter()
        .filter_map(|raw| {
            let task = normalize_task(raw);
            if task.is_none() {
                warn!(row = %raw, "dropping list row without an identifier");
            }
            task
        })
        .collect();

    let count = raw_items.len() as u64;
    let total = match shape {
        ListShape::Results => number(meta, &["totalCount", "total_count", "total"]),
        _ => number(meta, &["total"]),
    }
    .unwrap_or(count);
    let page = number(meta, &["page"]).map(clamp_u32).unwrap_or(1).max(1);
    let page_size = number(meta, &["pageSize", "page_size"])
        .map(clamp_u32)
        .unwrap_or(count as u32);
    let page_size = if page_size == 0 {
        requested_page_size.max(1)
    } else {
        page_size
    };

    debug!(?shape, items = items.len(), total, page, page_size, "normalized list response");
    Envelope {
        items,
        total,
        page,
        page_size,
    }
}

fn number(meta: &Value, names: &[&str]) -> Option<u64> {
    names.iter().find_map(|name| {
        let v = meta.get(*name)?;
        v.as_u64()
            .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
    })
}

fn clamp_u32(v: u64) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}
