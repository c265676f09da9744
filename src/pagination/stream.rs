//! Async counterpart of `PagedIterator`
//!
//! Same window arithmetic and termination rule, exposed as a `Stream` for
//! fetchers that perform network I/O.

use super::types::{Page, PagedResult};
use async_trait::async_trait;
use futures::stream::{self, Stream, TryStreamExt};
use std::collections::VecDeque;
use tracing::debug;

/// Async source of pages
#[async_trait]
pub trait AsyncPageFetcher<T>: Send + Sync {
    /// Error returned when a page cannot be fetched
    type Error: Send;

    /// Fetch the items of one window
    async fn fetch(&self, page: Page) -> Result<PagedResult<T>, Self::Error>;
}

/// Where the stream stands between polls
enum Cursor<T> {
    /// Nothing fetched yet
    Start(Page),
    /// Items left from the last fetched window
    Page {
        page: Page,
        items: VecDeque<T>,
        has_next: bool,
    },
}

/// Stream every item reachable from `initial`, fetching lazily
///
/// The first fetch happens on the first poll. A new window is fetched only
/// once the previous one is drained and its declared total reaches further.
/// The first fetch error ends the stream.
pub fn paged_stream<T, F>(
    fetcher: F,
    initial: Page,
) -> impl Stream<Item = Result<T, F::Error>> + Send
where
    T: Send,
    F: AsyncPageFetcher<T>,
{
    stream::try_unfold(
        (fetcher, Cursor::Start(initial)),
        |(fetcher, cursor)| step(fetcher, cursor),
    )
}

/// Collect a whole paginated set into memory
pub async fn collect_all<T, F>(fetcher: F, initial: Page) -> Result<Vec<T>, F::Error>
where
    T: Send,
    F: AsyncPageFetcher<T>,
{
    paged_stream(fetcher, initial).try_collect().await
}

async fn step<T, F>(
    fetcher: F,
    mut cursor: Cursor<T>,
) -> Result<Option<(T, (F, Cursor<T>))>, F::Error>
where
    F: AsyncPageFetcher<T>,
{
    loop {
        cursor = match cursor {
            Cursor::Start(page) => load(&fetcher, page).await?,
            Cursor::Page {
                page,
                mut items,
                has_next,
            } => {
                if let Some(item) = items.pop_front() {
                    let rest = Cursor::Page {
                        page,
                        items,
                        has_next,
                    };
                    return Ok(Some((item, (fetcher, rest))));
                }
                if !has_next {
                    return Ok(None);
                }
                load(&fetcher, page.next()).await?
            }
        };

        // An empty window ends the sequence, matching PagedIterator.
        if let Cursor::Page { items, .. } = &cursor {
            if items.is_empty() {
                return Ok(None);
            }
        }
    }
}

async fn load<T, F>(fetcher: &F, page: Page) -> Result<Cursor<T>, F::Error>
where
    F: AsyncPageFetcher<T>,
{
    let result = fetcher.fetch(page).await?;
    debug!(
        from = page.from(),
        size = page.size(),
        items = result.size(),
        total = result.total_elements(),
        "Fetched page"
    );

    let has_next = result.has_next();
    Ok(Cursor::Page {
        page,
        items: result.into_items().into(),
        has_next,
    })
}
