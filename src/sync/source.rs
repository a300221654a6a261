// animelistsync/src/sync/source.rs
//! The two collaborators the sync talks to. The orchestrator only sees these
//! traits; the Notion and MyAnimeList clients implement them.

use super::types::{LocalRecordRef, RemoteItem};
use crate::errors::Result;
use crate::utils::pager::Page;

/// The remote list being mirrored.
pub trait ListSource {
    /// A short name for log lines and errors.
    fn name(&self) -> &'static str;

    async fn fetch_page(&self, cursor: Option<String>) -> Result<Page<RemoteItem>>;
}

/// The database the list is mirrored into.
pub trait RowStore {
    fn name(&self) -> &'static str;

    /// One page of existing rows, reduced to their MAL id and page id.
    async fn query_rows(&self, cursor: Option<String>) -> Result<Page<LocalRecordRef>>;

    /// Creates a row and returns its id.
    async fn create_row(&self, item: &RemoteItem) -> Result<String>;

    async fn update_row(&self, page_id: &str, item: &RemoteItem) -> Result<()>;
}
