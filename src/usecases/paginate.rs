//! Generic fetch-in-pages primitive shared by conversation listing and
//! message history retrieval.
//!
//! Termination is the short-page sentinel: a page strictly smaller than the
//! requested count ends the iteration. A total that is an exact multiple of
//! the page size therefore costs one extra, empty fetch; that trailing call
//! is part of the observable contract and is not an error.

use crate::domain::DomainError;
use std::future::Future;
use std::time::Duration;

/// Hard platform ceiling on page size for listing endpoints.
pub const PAGE_SIZE: u64 = 200;

/// Pages through a fetch callback with a politeness delay between successive
/// page requests.
pub struct Paginator {
    page_size: u64,
    page_delay: Duration,
}

impl Paginator {
    pub fn new(page_delay: Duration) -> Self {
        Self::with_page_size(PAGE_SIZE, page_delay)
    }

    /// Custom page size, capped at the platform ceiling.
    pub fn with_page_size(page_size: u64, page_delay: Duration) -> Self {
        Self {
            page_size: page_size.clamp(1, PAGE_SIZE),
            page_delay,
        }
    }

    /// Fetch every page until a short page. `fetch(offset, count)` returns one
    /// page of at most `count` items.
    pub async fn collect_all<T, F, Fut>(&self, mut fetch: F) -> Result<Vec<T>, DomainError>
    where
        F: FnMut(u64, u64) -> Fut,
        Fut: Future<Output = Result<Vec<T>, DomainError>>,
    {
        let mut items = Vec::new();
        let mut offset = 0u64;

        loop {
            let page = fetch(offset, self.page_size).await?;
            let short = (page.len() as u64) < self.page_size;
            items.extend(page);
            if short {
                break;
            }
            offset += self.page_size;
            tokio::time::sleep(self.page_delay).await;
        }

        Ok(items)
    }
}

/// Progress percentage for `processed` out of `total` items. The total comes
/// from a probe taken once before iteration and is never refreshed, so the
/// raw ratio can exceed 100 on a growing source; clamp it.
pub fn progress_percent(processed: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    (processed.saturating_mul(100) / total).min(100) as u8
}
