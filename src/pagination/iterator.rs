//! Lazy iteration over offset-paginated results
//!
//! `PagedIterator` walks an unbounded result set by calling a `PageFetcher`
//! one window at a time, exposing the whole set as one ordered sequence.

use super::types::{Page, PagedResult};
use tracing::debug;

/// Source of pages for a `PagedIterator`
///
/// Implemented for every `FnMut(Page) -> Result<PagedResult<T>, E>`.
pub trait PageFetcher<T> {
    /// Error returned when a page cannot be fetched
    type Error;

    /// Fetch the items of one window
    fn fetch(&mut self, page: Page) -> Result<PagedResult<T>, Self::Error>;
}

impl<T, E, F> PageFetcher<T> for F
where
    F: FnMut(Page) -> Result<PagedResult<T>, E>,
{
    type Error = E;

    fn fetch(&mut self, page: Page) -> Result<PagedResult<T>, E> {
        self(page)
    }
}

/// Stateful cursor over every item of a paginated result set
///
/// Nothing is fetched until `rewind()` (or the first `Iterator::next`).
/// Pages are fetched strictly in increasing offset order, one at a time,
/// and only once the items of the current page are used up. No page is
/// cached: each `rewind()` fetches everything again.
///
/// The end of the set is decided from the declared total alone
/// (`from + size < total_elements`), never from how many items a page held.
/// A short page therefore does not stop iteration, and an empty page ends it
/// early even when the total says more should follow.
///
/// A failed fetch is returned unchanged and leaves the cursor exactly where
/// it was, so the same call can simply be retried.
pub struct PagedIterator<T, F> {
    fetcher: F,
    initial_page: Page,
    current_page: Page,
    items: Vec<T>,
    page_index: usize,
    position: u64,
    total_elements: Option<u64>,
    /// Whether `Iterator::next` already handed out the current item
    yielded: bool,
}

impl<T, F> PagedIterator<T, F>
where
    F: PageFetcher<T>,
{
    /// Create an iterator starting at `Page::default()`
    pub fn new(fetcher: F) -> Self {
        Self::with_page(fetcher, Page::default())
    }

    /// Create an iterator starting at `initial_page`
    pub fn with_page(fetcher: F, initial_page: Page) -> Self {
        Self {
            fetcher,
            initial_page,
            current_page: initial_page,
            items: Vec::new(),
            page_index: 0,
            position: 0,
            total_elements: None,
            yielded: false,
        }
    }

    /// Go back to the initial page and fetch it
    pub fn rewind(&mut self) -> Result<(), F::Error> {
        let result = self.fetch_page(self.initial_page)?;

        self.current_page = self.initial_page;
        self.position = 0;
        self.load(result);
        Ok(())
    }

    /// Move to the next item, fetching the next window at a page boundary
    ///
    /// Past the last item this only moves the position; `valid()` turns false.
    pub fn advance(&mut self) -> Result<(), F::Error> {
        if self.page_index + 1 >= self.items.len() && self.has_more_pages() {
            let next_page = self.current_page.next();
            let result = self.fetch_page(next_page)?;

            self.current_page = next_page;
            self.load(result);
        } else {
            self.page_index += 1;
            self.yielded = false;
        }

        self.position += 1;
        Ok(())
    }

    /// Item at the cursor, if any
    pub fn current(&self) -> Option<&T> {
        self.items.get(self.page_index)
    }

    /// Global 0-based index of the item `current()` returns
    pub fn key(&self) -> u64 {
        self.position
    }

    /// Check if the cursor points at an item
    pub fn valid(&self) -> bool {
        self.page_index < self.items.len()
    }

    /// Total declared by the last fetch, `None` before any fetch
    pub fn total_elements(&self) -> Option<u64> {
        self.total_elements
    }

    /// Window most recently fetched (or about to be)
    pub fn current_page(&self) -> Page {
        self.current_page
    }

    /// Window `rewind()` starts from
    pub fn initial_page(&self) -> Page {
        self.initial_page
    }

    /// Check if the declared total reaches past the current window
    fn has_more_pages(&self) -> bool {
        match self.total_elements {
            Some(total) => self.current_page.end() < total,
            None => false,
        }
    }

    fn fetch_page(&mut self, page: Page) -> Result<PagedResult<T>, F::Error> {
        let result = self.fetcher.fetch(page)?;
        debug!(
            from = page.from(),
            size = page.size(),
            items = result.size(),
            total = result.total_elements(),
            "Fetched page"
        );
        Ok(result)
    }

    fn load(&mut self, result: PagedResult<T>) {
        self.total_elements = Some(result.total_elements());
        self.items = result.into_items();
        self.page_index = 0;
        self.yielded = false;
    }
}

impl<T, F> PagedIterator<T, F>
where
    T: Clone,
    F: PageFetcher<T>,
{
    /// Drive the sequence to the end from the current position
    ///
    /// Starts with `rewind()` if nothing was fetched yet. Call `rewind()`
    /// first to collect from the beginning again.
    pub fn to_vec(&mut self) -> Result<Vec<T>, F::Error> {
        self.by_ref().collect()
    }
}

impl<T, F> Iterator for PagedIterator<T, F>
where
    T: Clone,
    F: PageFetcher<T>,
{
    type Item = Result<T, F::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let step = if self.total_elements.is_none() {
            self.rewind()
        } else if self.yielded {
            self.advance()
        } else {
            Ok(())
        };

        if let Err(e) = step {
            return Some(Err(e));
        }

        let item = self.current()?.clone();
        self.yielded = true;
        Some(Ok(item))
    }
}

impl<T, F> std::fmt::Debug for PagedIterator<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedIterator")
            .field("initial_page", &self.initial_page)
            .field("current_page", &self.current_page)
            .field("page_index", &self.page_index)
            .field("position", &self.position)
            .field("total_elements", &self.total_elements)
            .finish_non_exhaustive()
    }
}
