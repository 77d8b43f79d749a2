//! Paginated, filterable list of summaries.
//!
//! The view-model is split into synchronous transitions (`begin_load`,
//! `apply_page`, `apply_failure`) so the UI loop can run the network call on a
//! background task and apply the result later. [`ListView::load_next`] drives
//! the whole cycle inline for callers that can simply await.

use crate::fetch::Catalog;
use crate::models::{Page, Summary};
use tracing::error;

/// Offset/limit pair for the next page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

#[derive(Debug, Clone)]
pub struct ListView {
    items: Vec<Summary>,
    visible: Vec<usize>, // indices into items
    selected: usize,
    filter: String,
    cursor: usize,
    page_size: usize,
    loading: bool,
    exhausted: bool,
}

impl ListView {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            visible: Vec::new(),
            selected: 0,
            filter: String::new(),
            cursor: 0,
            page_size,
            loading: false,
            exhausted: false,
        }
    }

    pub fn items(&self) -> &[Summary] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True while more pages may exist.
    pub fn can_load_more(&self) -> bool {
        !self.exhausted
    }

    /// Marks a fetch in flight and returns what to fetch, or `None` if a fetch
    /// is already running or the catalog is exhausted.
    pub fn begin_load(&mut self) -> Option<PageRequest> {
        if self.loading || self.exhausted {
            return None;
        }
        self.loading = true;
        Some(PageRequest {
            offset: self.cursor,
            limit: self.page_size,
        })
    }

    /// Appends a fetched page. The catalog is exhausted once the list call
    /// itself comes back short; entries skipped during enrichment don't count.
    pub fn apply_page(&mut self, page: Page) {
        if page.listed < self.page_size {
            self.exhausted = true;
        }
        self.items.extend(page.items);
        self.cursor += self.page_size;
        self.loading = false;
        self.refilter();
    }

    pub fn apply_failure(&mut self) {
        self.loading = false;
    }

    /// Resets everything to the initial state and requests the first page.
    pub fn refresh(&mut self) -> Option<PageRequest> {
        self.items.clear();
        self.visible.clear();
        self.selected = 0;
        self.filter.clear();
        self.cursor = 0;
        self.loading = false;
        self.exhausted = false;
        self.begin_load()
    }

    pub fn set_filter(&mut self, term: &str) {
        self.filter = term.to_string();
        self.refilter();
    }

    /// Summaries currently matching the filter, in load order.
    pub fn visible(&self) -> impl Iterator<Item = &Summary> {
        self.visible.iter().filter_map(|&i| self.items.get(i))
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&Summary> {
        self.visible
            .get(self.selected)
            .and_then(|&i| self.items.get(i))
    }

    /// Moves down one row. Returns true when the selection is on the last row,
    /// which the UI treats as reaching the bottom of the scroll.
    pub fn next(&mut self) -> bool {
        if self.visible.is_empty() {
            return false;
        }
        if self.selected + 1 < self.visible.len() {
            self.selected += 1;
        }
        self.selected + 1 == self.visible.len()
    }

    pub fn previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn refilter(&mut self) {
        let q = self.filter.trim().to_lowercase();
        self.visible = if q.is_empty() {
            (0..self.items.len()).collect()
        } else {
            self.items
                .iter()
                .enumerate()
                .filter(|(_, p)| p.name.to_lowercase().contains(&q))
                .map(|(i, _)| i)
                .collect()
        };

        if self.visible.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.visible.len() {
            self.selected = self.visible.len() - 1;
        }
    }

    /// Fetches and applies the next page. Failures are logged and end the load
    /// without changing the list. Returns whether a fetch was issued.
    pub async fn load_next<C: Catalog>(&mut self, catalog: &C) -> bool {
        let Some(req) = self.begin_load() else {
            return false;
        };
        match catalog.fetch_page(req.offset, req.limit).await {
            Ok(page) => self.apply_page(page),
            Err(e) => {
                error!(offset = req.offset, error = %e, "error loading pokémon");
                self.apply_failure();
            }
        }
        true
    }
}
