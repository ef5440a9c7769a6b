//! Cursor pagination as a lazy batch stream
//!
//! Listing endpoints return a page of items plus a `next` link: the full
//! URL of the following page. Only the cursor query parameter of that link
//! is reused; every other parameter (page size, filters) is already known
//! to the caller and sent again on each request.
//!
//! The stream is pull-based: no page is fetched until the consumer asks for
//! the next batch, and there is no read-ahead. Each call to a client's
//! `enumerate_*` entry point starts a fresh traversal from the first page;
//! a traversal cannot be resumed from a mid-sequence checkpoint. A failed
//! page fetch ends the whole traversal; batches already yielded stand.

use std::future::Future;

use futures::{Stream, stream};
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

/// Query parameter carrying the pagination cursor in `next` links.
const CURSOR_PARAM: &str = "startAt";

/// One page of a listing as returned by an endpoint.
pub struct Page<T> {
    pub items: Vec<T>,
    /// Full URL of the next page, absent on the last page
    pub next: Option<String>,
}

enum Cursor {
    First,
    Link(String),
    Exhausted,
}

/// Turn a page-fetching operation into a lazy stream of raw batches.
///
/// `fetch` receives the cursor extracted from the previous page's `next`
/// link (`None` for the first page) and performs one request. The stream
/// terminates after the first page without a `next` link. The link is only
/// inspected when the following batch is pulled, so a malformed link never
/// retracts a batch that was already fetched.
pub fn paginate<T, F, Fut>(fetch: F) -> impl Stream<Item = Result<Vec<T>>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    stream::try_unfold((fetch, Cursor::First), |(mut fetch, cursor)| async move {
        let start_at = match cursor {
            Cursor::First => None,
            Cursor::Link(link) => {
                let cursor = extract_cursor(&link)?;
                debug!(%cursor, "following next page link");
                Some(cursor)
            }
            Cursor::Exhausted => return Ok(None),
        };
        let page = fetch(start_at).await?;
        let next = match page.next {
            Some(link) => Cursor::Link(link),
            None => Cursor::Exhausted,
        };
        Ok(Some((page.items, (fetch, next))))
    })
}

/// Pull the cursor parameter out of a `next` link, discarding the rest.
fn extract_cursor(link: &str) -> Result<String> {
    let url =
        Url::parse(link).map_err(|e| Error::Unexpected(format!("invalid next link {link:?}: {e}")))?;
    url.query_pairs()
        .find(|(name, _)| name == CURSOR_PARAM)
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| {
            Error::Unexpected(format!(
                "next link {link:?} is missing the {CURSOR_PARAM} parameter"
            ))
        })
}
