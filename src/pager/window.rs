use std::fmt;

/// Maximum number of slots (pages plus ellipses) in a page window.
pub const MAX_VISIBLE_PAGES: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSlot::Page(n) => write!(f, "{}", n),
            PageSlot::Ellipsis => f.write_str("..."),
        }
    }
}

/// Compact page-number window for pagination controls.
///
/// First and last page are always present. Near either end the window shows
/// five consecutive pages; in the middle it shows the current page with one
/// neighbour on each side.
pub fn page_window(page: u32, total_pages: u32) -> Vec<PageSlot> {
    if total_pages == 0 {
        return Vec::new();
    }
    if total_pages <= MAX_VISIBLE_PAGES {
        return (1..=total_pages).map(PageSlot::Page).collect();
    }

    let page = page.clamp(1, total_pages);
    let mut slots = Vec::with_capacity(MAX_VISIBLE_PAGES as usize);

    if page <= 4 {
        slots.extend((1..=5).map(PageSlot::Page));
        slots.push(PageSlot::Ellipsis);
        slots.push(PageSlot::Page(total_pages));
    } else if page >= total_pages - 3 {
        slots.push(PageSlot::Page(1));
        slots.push(PageSlot::Ellipsis);
        slots.extend((total_pages - 4..=total_pages).map(PageSlot::Page));
    } else {
        slots.push(PageSlot::Page(1));
        slots.push(PageSlot::Ellipsis);
        slots.extend((page - 1..=page + 1).map(PageSlot::Page));
        slots.push(PageSlot::Ellipsis);
        slots.push(PageSlot::Page(total_pages));
    }

    slots
}

/// Render a window as `1 2 [3] 4 5 ... 20`, bracketing the current page.
pub fn render_window(page: u32, total_pages: u32) -> String {
    page_window(page, total_pages)
        .iter()
        .map(|slot| match slot {
            PageSlot::Page(n) if *n == page => format!("[{}]", n),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
