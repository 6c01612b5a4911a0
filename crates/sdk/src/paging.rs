//! Paged list results.
//!
//! List calls return one page of items plus an opaque `offset` cursor. Pass
//! the cursor back to fetch the next page; the gateway returns an empty page
//! once the listing is exhausted.

use config::constants::DEFAULT_PAGE_LIMIT;
use transport::proto::common::Page;

/// One page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedList<T> {
    items: Vec<T>,
    offset: String,
}

impl<T> PagedList<T> {
    /// Creates a page from items and the cursor for the next page.
    pub fn new(items: Vec<T>, offset: impl Into<String>) -> Self {
        Self {
            items,
            offset: offset.into(),
        }
    }

    /// Items on this page.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Cursor for the next page.
    pub fn offset(&self) -> &str {
        &self.offset
    }

    /// Whether this page is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the page, returning its items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Converts every item with `f`, keeping the cursor.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedList<U> {
        PagedList {
            items: self.items.into_iter().map(f).collect(),
            offset: self.offset,
        }
    }
}

/// Builds a page request. `None` starts from the beginning; a non-positive
/// `limit` uses the default page size.
pub(crate) fn page(offset: Option<&str>, limit: i32) -> Page {
    Page {
        offset: offset.unwrap_or_default().to_owned(),
        limit: if limit > 0 { limit } else { DEFAULT_PAGE_LIMIT },
    }
}
