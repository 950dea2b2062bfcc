use taskdeck_shared::TaskDto;
use tracing::trace;

use crate::envelope::Envelope;
use crate::query::TaskQuery;

/// In-memory predicate used when the backend returns the whole
/// collection.
///
/// Status must match (or be `all`); the trimmed search term must occur,
/// case-insensitively, in the title or description (or be empty); every
/// selected tag must be present on the task.
pub fn matches(task: &TaskDto, query: &TaskQuery) -> bool {
    if !query.status.admits(task.status) {
        return false;
    }

    let needle = query.search_term().to_lowercase();
    if !needle.is_empty() {
        let in_title = task.title.to_lowercase().contains(&needle);
        let in_description = task
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle));
        if !in_title && !in_description {
            return false;
        }
    }

    query
        .tags
        .iter()
        .all(|tag| task.tags.iter().any(|t| t == tag))
}

/// Filter the full list, then cut out `[(page-1)*size, page*size)`.
/// `total` is the filtered count, so it always agrees with the slice.
pub fn filter_and_page(all: &[TaskDto], query: &TaskQuery) -> Envelope {
    let filtered: Vec<&TaskDto> = all.iter().filter(|t| matches(t, query)).collect();
    let size = query.page_size.max(1) as usize;
    let start = (query.page.max(1) as usize - 1).saturating_mul(size);

    let items: Vec<TaskDto> = filtered
        .iter()
        .skip(start)
        .take(size)
        .map(|t| (*t).clone())
        .collect();

    trace!(
        scanned = all.len(),
        matched = filtered.len(),
        shown = items.len(),
        "filtered locally"
    );

    Envelope {
        items,
        total: filtered.len() as u64,
        page: query.page.max(1),
        page_size: query.page_size.max(1),
    }
}
