// animelistsync/src/utils/pager.rs
//! Cursor pagination shared by the Notion query endpoint and the
//! MyAnimeList list endpoint.

use futures::{Stream, TryStreamExt, stream};
use std::future::Future;

/// One page of results plus the cursor of the page after it.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        // Some APIs send "" instead of null on the last page.
        let next_cursor = next_cursor.filter(|c| !c.is_empty());
        Self { items, next_cursor }
    }
}

/// Lazily walks a cursor-paginated source, yielding one page of items at a time.
///
/// `fetch` is called with `None` first, then with each page's `next_cursor`.
/// The stream ends right after a page without a next cursor; an empty page with
/// a cursor does not stop it. The first error ends the stream.
pub fn paginate<T, E, F, Fut>(fetch: F) -> impl Stream<Item = Result<Vec<T>, E>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    // `None` means the previous page was the last one.
    let start: Option<Option<String>> = Some(None);
    stream::try_unfold((fetch, start), |(mut fetch, state)| async move {
        let Some(cursor) = state else {
            return Ok(None);
        };
        let page = fetch(cursor).await?;
        let next = page.next_cursor.map(Some);
        Ok(Some((page.items, (fetch, next))))
    })
}

/// Fetches every page and concatenates the items in server order.
pub async fn fetch_all<T, E, F, Fut>(fetch: F) -> Result<Vec<T>, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    paginate(fetch).try_concat().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves canned pages keyed by the requested cursor and records each request.
    struct MockSource {
        pages: HashMap<Option<String>, Page<char>>,
        calls: RefCell<Vec<Option<String>>>,
    }

    impl MockSource {
        fn new(pages: Vec<(Option<&str>, Vec<char>, Option<&str>)>) -> Self {
            let pages = pages
                .into_iter()
                .map(|(cursor, items, next)| {
                    (
                        cursor.map(str::to_string),
                        Page::new(items, next.map(str::to_string)),
                    )
                })
                .collect();
            Self {
                pages,
                calls: RefCell::new(Vec::new()),
            }
        }

        async fn fetch(&self, cursor: Option<String>) -> Result<Page<char>, String> {
            self.calls.borrow_mut().push(cursor.clone());
            self.pages
                .get(&cursor)
                .cloned()
                .ok_or_else(|| format!("unknown cursor {:?}", cursor))
        }
    }

    #[tokio::test]
    async fn test_fetch_all_stops_on_null_cursor() -> anyhow::Result<()> {
        let source = MockSource::new(vec![
            (None, vec!['a', 'b'], Some("c1")),
            (Some("c1"), vec!['c'], None),
            (Some("c2"), vec![], None),
        ]);

        let items = fetch_all(|cursor| source.fetch(cursor))
            .await
            .map_err(anyhow::Error::msg)?;

        assert_eq!(items, vec!['a', 'b', 'c']);
        assert_eq!(
            *source.calls.borrow(),
            vec![None, Some("c1".to_string())]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_page_with_cursor_keeps_going() -> anyhow::Result<()> {
        let source = MockSource::new(vec![
            (None, vec!['a'], Some("c1")),
            (Some("c1"), vec![], Some("c2")),
            (Some("c2"), vec!['b'], None),
        ]);

        let items = fetch_all(|cursor| source.fetch(cursor))
            .await
            .map_err(anyhow::Error::msg)?;

        assert_eq!(items, vec!['a', 'b']);
        assert_eq!(source.calls.borrow().len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_string_cursor_ends_traversal() -> anyhow::Result<()> {
        let source = MockSource::new(vec![(None, vec!['x'], Some(""))]);

        let items = fetch_all(|cursor| source.fetch(cursor))
            .await
            .map_err(anyhow::Error::msg)?;

        assert_eq!(items, vec!['x']);
        assert_eq!(source.calls.borrow().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_error_aborts_without_partial_result() {
        // "c1" leads to a cursor the source does not know.
        let source = MockSource::new(vec![
            (None, vec!['a'], Some("c1")),
            (Some("c1"), vec!['b'], Some("missing")),
        ]);

        let result = fetch_all(|cursor| source.fetch(cursor)).await;

        assert!(result.is_err());
        assert_eq!(source.calls.borrow().len(), 3);
    }

    #[tokio::test]
    async fn test_paginate_is_lazy_and_restartable() -> anyhow::Result<()> {
        let source = MockSource::new(vec![
            (None, vec!['a'], Some("c1")),
            (Some("c1"), vec!['b'], None),
        ]);

        let first_page = {
            let pages = paginate(|cursor| source.fetch(cursor));
            futures::pin_mut!(pages);
            pages.next().await.transpose().map_err(anyhow::Error::msg)?
        };
        assert_eq!(first_page, Some(vec!['a']));
        assert_eq!(source.calls.borrow().len(), 1);

        let again = fetch_all(|cursor| source.fetch(cursor))
            .await
            .map_err(anyhow::Error::msg)?;
        assert_eq!(again, vec!['a', 'b']);
        assert_eq!(source.calls.borrow().len(), 3);
        Ok(())
    }
}
