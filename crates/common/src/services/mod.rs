//! Application services
//!
//! A service is built per request around a borrowed connection. Reads go
//! straight to the connection; every mutation opens a transaction, runs the
//! DAO calls on it and commits. Dropping an uncommitted transaction rolls it
//! back, so early returns through `?` leave nothing behind.

mod article;
mod homepage;
mod media;
mod taxonomy;

pub use article::{ArticleDetail, ArticleInput, ArticleService};
pub use homepage::{HomepageService, SectionInput, SectionItemInput};
pub use media::{MediaService, UploadInput};
pub use taxonomy::{CategoryService, TagService, TermInput};

use serde::Deserialize;
use uuid::Uuid;

/// Largest page a list endpoint will return
pub const MAX_PAGE_SIZE: u64 = 200;

/// Limit/offset window for list calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    /// Apply the endpoint default and clamp the limit to `1..=MAX_PAGE_SIZE`
    pub fn new(limit: Option<u64>, offset: Option<u64>, default_limit: u64) -> Self {
        Self {
            limit: limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE),
            offset: offset.unwrap_or(0),
        }
    }
}

/// Raw `limit`/`offset` query parameters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl PageParams {
    pub fn page(self, default_limit: u64) -> Page {
        Page::new(self.limit, self.offset, default_limit)
    }
}

/// Drop repeated ids, keeping first occurrences in order
pub(crate) fn dedup_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(*id);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_clamps_limit() {
        assert_eq!(Page::new(None, None, 20), Page { limit: 20, offset: 0 });
        assert_eq!(Page::new(Some(0), Some(5), 20), Page { limit: 1, offset: 5 });
        assert_eq!(Page::new(Some(10_000), None, 20).limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_dedup_ids_keeps_order() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        assert_eq!(dedup_ids(&[b, a, b, a]), vec![b, a]);
    }
}
