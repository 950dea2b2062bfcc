use std::collections::BTreeSet;

use serde::Serialize;
use taskdeck_shared::TaskStatus;
use tracing::trace;

use crate::envelope::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    pub fn parse(raw: &str) -> Self {
        TaskStatus::parse(raw)
            .map(StatusFilter::Only)
            .unwrap_or(StatusFilter::All)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }

    pub fn admits(self, status: TaskStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

/// User controlled list parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskQuery {
    pub status: StatusFilter,
    pub search: String,
    pub tags: BTreeSet<String>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryEdit {
    SetStatus(StatusFilter),
    SetSearch(String),
    AddTag(String),
    RemoveTag(String),
    SetPageSize(u32),
    SetPage(u32),
    Clear,
}

impl TaskQuery {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            status: StatusFilter::All,
            search: String::new(),
            tags: BTreeSet::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Next state after `edit`. Every edit other than `SetPage` lands on
    /// page 1. `allowed_sizes` bounds `SetPageSize`; an unlisted size snaps
    /// to the nearest allowed one.
    pub fn apply(&self, edit: QueryEdit, allowed_sizes: &[u32]) -> TaskQuery {
        let mut next = self.clone();
        match edit {
            QueryEdit::SetStatus(status) => next.status = status,
            QueryEdit::SetSearch(search) => next.search = search,
            QueryEdit::AddTag(tag) => {
                let tag = tag.trim();
                if !tag.is_empty() {
                    next.tags.insert(tag.to_string());
                }
            }
            QueryEdit::RemoveTag(tag) => {
                next.tags.remove(tag.trim());
            }
            QueryEdit::SetPageSize(size) => {
                next.page_size = snap_page_size(size, allowed_sizes);
            }
            QueryEdit::SetPage(page) => {
                next.page = page.max(1);
                trace!(page = next.page, "page changed");
                return next;
            }
            QueryEdit::Clear => {
                next = TaskQuery::with_page_size(self.page_size);
            }
        }
        next.page = 1;
        next
    }

    pub fn search_term(&self) -> &str {
        self.search.trim()
    }

    /// Query parameters for a server-side list request. No-op defaults
    /// (`status=all`, blank search, no tags) are omitted.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];
        if let StatusFilter::Only(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if !self.search_term().is_empty() {
            params.push(("search", self.search_term().to_string()));
        }
        if !self.tags.is_empty() {
            let joined: Vec<&str> = self.tags.iter().map(String::as_str).collect();
            params.push(("tags", joined.join(",")));
        }
        params
    }

    /// Stable serialization used as the cache key.
    pub fn cache_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

fn snap_page_size(size: u32, allowed: &[u32]) -> u32 {
    if allowed.is_empty() || allowed.contains(&size) {
        return size.max(1);
    }
    allowed
        .iter()
        .copied()
        .min_by_key(|candidate| candidate.abs_diff(size))
        .unwrap_or(DEFAULT_PAGE_SIZE)
}
