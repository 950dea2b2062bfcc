/// `max(1, ceil(total / page_size))`.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    let pages = total.div_ceil(size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Page buttons for the selector: first, last, and the neighbours of
/// `page`, ascending and without duplicates.
pub fn page_window(page: u32, total_pages: u32) -> Vec<u32> {
    let last = total_pages.max(1);
    let page = page.clamp(1, last);
    let mut pages = vec![1, page.saturating_sub(1).max(1), page, page.saturating_add(1).min(last), last];
    pages.sort_unstable();
    pages.dedup();
    pages
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControls {
    pub page: u32,
    pub total_pages: u32,
    pub pages: Vec<u32>,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl PageControls {
    pub fn new(page: u32, page_size: u32, total: u64) -> Self {
        let total_pages = total_pages(total, page_size);
        let page = page.max(1);
        Self {
            page,
            total_pages,
            pages: page_window(page, total_pages),
            prev_enabled: page > 1,
            next_enabled: page < total_pages,
        }
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages)
    }
}
