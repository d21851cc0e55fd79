use serde::{Deserialize, Serialize};

/// One page of a server-side (or locally paged) list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    /// ceil(total_count / page_size); zero for an empty page size.
    pub fn derive_total_pages(total_count: u64, page_size: u32) -> u32 {
        if page_size == 0 {
            return 0;
        }
        total_count.div_ceil(page_size as u64) as u32
    }

    /// Page an in-memory list. Pages past the end come back empty.
    pub fn paginate_local(items: Vec<T>, page: u32, page_size: u32) -> Self {
        let page = page.max(1);
        let total_count = items.len() as u64;
        let total_pages = Self::derive_total_pages(total_count, page_size);
        let skip = (page as usize - 1).saturating_mul(page_size as usize);
        let data = items
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .collect();

        Self {
            data,
            page,
            page_size,
            total_count,
            total_pages,
        }
    }

    /// 1-based range of items on this page, `(0, 0)` when empty.
    pub fn item_range(&self) -> (u64, u64) {
        if self.data.is_empty() {
            return (0, 0);
        }
        let start = (self.page.max(1) as u64 - 1) * self.page_size as u64 + 1;
        (start, start + self.data.len() as u64 - 1)
    }

    /// "Showing 11–20 of 42"
    pub fn range_label(&self) -> String {
        let (start, end) = self.item_range();
        format!("Showing {}–{} of {}", start, end, self.total_count)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            data: self.data.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn empty(page_size: u32) -> Self {
        Self {
            data: Vec::new(),
            page: 1,
            page_size,
            total_count: 0,
            total_pages: 0,
        }
    }
}
