//! Pagination types
//!
//! `Page` describes one offset window, `PagedResult` is what a fetch of that
//! window returns. All window arithmetic lives here so every pagination
//! consumer shares one bounds policy.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Page size used when the caller does not pick one
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size the API accepts
pub const MAX_PAGE_SIZE: u32 = 1000;

// ============================================================================
// Page
// ============================================================================

/// One pagination window: items `[from, from + size)`
///
/// Immutable once built. Advancing produces a new `Page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPage")]
pub struct Page {
    from: u64,
    size: u32,
}

/// Unvalidated wire shape of a page
#[derive(Deserialize)]
struct RawPage {
    #[serde(default)]
    from: i64,
    #[serde(default = "default_size")]
    size: i64,
}

fn default_size() -> i64 {
    i64::from(DEFAULT_PAGE_SIZE)
}

impl TryFrom<RawPage> for Page {
    type Error = Error;

    fn try_from(raw: RawPage) -> Result<Self> {
        Page::new(raw.from, raw.size)
    }
}

impl Page {
    /// Create a page window
    ///
    /// Fails with `Error::InvalidArgument` if `from < 0`, `size < 1`
    /// or `size > 1000`.
    pub fn new(from: i64, size: i64) -> Result<Self> {
        if from < 0 {
            return Err(Error::invalid_argument("Page \"from\" must be >= 0"));
        }
        if size < 1 {
            return Err(Error::invalid_argument("Page \"size\" must be >= 1"));
        }
        if size > i64::from(MAX_PAGE_SIZE) {
            return Err(Error::invalid_argument("Page \"size\" must be <= 1000"));
        }

        Ok(Self {
            from: from as u64,
            size: size as u32,
        })
    }

    /// Create a page with a specific offset and size (same as `new`)
    pub fn of(from: i64, size: i64) -> Result<Self> {
        Self::new(from, size)
    }

    /// First page with the given size
    pub fn first(size: i64) -> Result<Self> {
        Self::new(0, size)
    }

    /// Starting index (0-based)
    pub fn from(&self) -> u64 {
        self.from
    }

    /// Number of items per page
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Offset one past the last item of this window
    pub fn end(&self) -> u64 {
        self.from + u64::from(self.size)
    }

    /// The following window, same size
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            from: self.end(),
            size: self.size,
        }
    }

    /// The preceding window, saturating at the first page
    #[must_use]
    pub fn previous(&self) -> Self {
        Self {
            from: self.from.saturating_sub(u64::from(self.size)),
            size: self.size,
        }
    }

    /// Check if this is the first page
    pub fn is_first(&self) -> bool {
        self.from == 0
    }

    /// Request parameters for this window
    pub fn to_params(&self) -> [(&'static str, String); 2] {
        [
            ("from", self.from.to_string()),
            ("size", self.size.to_string()),
        ]
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            from: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.from, self.end())
    }
}

// ============================================================================
// PagedResult
// ============================================================================

/// Items returned for one fetched `Page`
///
/// `total_elements` counts the whole logical result set, not just this page.
/// The number of items is not checked against `page.size()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    items: Vec<T>,
    total_elements: u64,
    page: Page,
}

impl<T> PagedResult<T> {
    /// Wrap the items of one page
    pub fn of(items: Vec<T>, total_elements: u64, page: Page) -> Self {
        Self {
            items,
            total_elements,
            page,
        }
    }

    /// Items in this page
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Take ownership of the items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Total number of elements across all pages
    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    /// The window this result answers
    pub fn page(&self) -> Page {
        self.page
    }

    /// Number of items actually returned
    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// Check if the declared total extends past this window
    ///
    /// Pure window arithmetic: the number of returned items plays no part.
    pub fn has_next(&self) -> bool {
        self.page.end() < self.total_elements
    }

    /// Check if this is the first page
    pub fn is_first(&self) -> bool {
        self.page.is_first()
    }

    /// Check if this is the last page
    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    /// Total number of pages at this page size
    pub fn total_pages(&self) -> u64 {
        if self.total_elements == 0 {
            return 0;
        }
        self.total_elements.div_ceil(u64::from(self.page.size))
    }

    /// Check if no items were returned
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Convert the items, keeping total and window
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            page: self.page,
        }
    }
}
