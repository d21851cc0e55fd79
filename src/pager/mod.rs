//! List paging, filtering and fetch sequencing.
//!
//! [`ListController`] owns page, page size and filters for one list screen.
//! Every state change marks the list dirty and the next
//! [`ListController::take_fetch`] hands out exactly one numbered ticket.
//! A response is applied only if its ticket is still the newest one, so a
//! slow reply for an old filter can never overwrite a newer result.

mod debounce;
mod window;

pub use debounce::{Debouncer, FILTER_DEBOUNCE};
pub use window::{page_window, render_window, PageSlot, MAX_VISIBLE_PAGES};

use tracing::debug;

use crate::api::{MuseumFilters, OrganizationFilters};
use crate::config::DEFAULT_PAGE_SIZE;
use crate::models::MuseumType;

pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 20, 50, 100];

/// Trim and uppercase a name filter; blank means no filter.
///
/// The backend's text search matches against uppercased names.
pub fn normalize_name_filter(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// Snapshot of everything that determines which rows a list shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub name: Option<String>,
    pub museum_type: Option<MuseumType>,
}

impl ListQuery {
    pub fn organization_filters(&self) -> OrganizationFilters {
        OrganizationFilters {
            page: self.page,
            page_size: self.page_size,
            name: self.name.clone(),
        }
    }

    pub fn museum_filters(&self) -> MuseumFilters {
        MuseumFilters {
            page: self.page,
            page_size: self.page_size,
            name: self.name.clone(),
            museum_type: self.museum_type,
        }
    }
}

/// A dispatched fetch. `seq` increases with every dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: ListQuery,
}

#[derive(Debug, Clone)]
pub struct ListController {
    query: ListQuery,
    dirty: bool,
    last_seq: u64,
}

impl ListController {
    /// Starts dirty so the first `take_fetch` loads page 1.
    pub fn new(page_size: u32) -> Self {
        let page_size = if PAGE_SIZE_OPTIONS.contains(&page_size) {
            page_size
        } else {
            DEFAULT_PAGE_SIZE
        };
        Self {
            query: ListQuery {
                page: 1,
                page_size,
                name: None,
                museum_type: None,
            },
            dirty: true,
            last_seq: 0,
        }
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.query.page
    }

    pub fn page_size(&self) -> u32 {
        self.query.page_size
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether the page changed.
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        if page == self.query.page {
            return false;
        }
        self.query.page = page;
        self.dirty = true;
        true
    }

    pub fn next_page(&mut self, total_pages: u32) -> bool {
        if self.query.page >= total_pages {
            return false;
        }
        self.set_page(self.query.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        if self.query.page <= 1 {
            return false;
        }
        self.set_page(self.query.page - 1)
    }

    /// Sizes outside `PAGE_SIZE_OPTIONS` are rejected. Resets to page 1.
    pub fn set_page_size(&mut self, page_size: u32) -> bool {
        if !PAGE_SIZE_OPTIONS.contains(&page_size) || page_size == self.query.page_size {
            return false;
        }
        self.query.page_size = page_size;
        self.reset_page();
        self.dirty = true;
        true
    }

    /// Step to the next page size option, wrapping around.
    pub fn cycle_page_size(&mut self) -> bool {
        let idx = PAGE_SIZE_OPTIONS
            .iter()
            .position(|s| *s == self.query.page_size)
            .unwrap_or(0);
        let next = PAGE_SIZE_OPTIONS[(idx + 1) % PAGE_SIZE_OPTIONS.len()];
        self.set_page_size(next)
    }

    /// Set the name filter from raw input. Resets to page 1.
    pub fn set_name_filter(&mut self, raw: &str) -> bool {
        let name = normalize_name_filter(raw);
        if name == self.query.name {
            return false;
        }
        self.query.name = name;
        self.reset_page();
        self.dirty = true;
        true
    }

    pub fn set_museum_type(&mut self, museum_type: Option<MuseumType>) -> bool {
        if museum_type == self.query.museum_type {
            return false;
        }
        self.query.museum_type = museum_type;
        self.reset_page();
        self.dirty = true;
        true
    }

    /// Force a refetch of the current page (retry, after delete).
    pub fn reload(&mut self) {
        self.dirty = true;
    }

    fn reset_page(&mut self) {
        self.query.page = 1;
    }

    /// Hand out one ticket if anything changed since the last dispatch.
    pub fn take_fetch(&mut self) -> Option<FetchTicket> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        self.last_seq += 1;
        Some(FetchTicket {
            seq: self.last_seq,
            query: self.query.clone(),
        })
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.last_seq
    }

    /// Keep `result` only if `seq` belongs to the newest dispatched fetch.
    pub fn accept<T>(&self, seq: u64, result: T) -> Option<T> {
        if self.is_current(seq) {
            Some(result)
        } else {
            debug!(seq, latest = self.last_seq, "discarding stale list response");
            None
        }
    }

    /// The server may clamp the page; follow it without refetching.
    pub fn sync_page(&mut self, page: u32) {
        self.query.page = page.max(1);
    }
}

impl Default for ListController {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
