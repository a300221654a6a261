// animelistsync/src/notion/mod.rs
pub(crate) mod client;
pub(crate) mod models;
pub(crate) mod properties;
pub(crate) mod schema;

pub use client::NotionClient;

use tracing::debug;

use crate::errors::Result;
use crate::sync::source::RowStore;
use crate::sync::types::{LocalRecordRef, RemoteItem};
use crate::utils::pager::Page;
use properties::{mal_id_from_properties, to_properties};

/// The Notion database rows are synced into.
#[derive(Debug, Clone)]
pub struct NotionDatabase {
    client: NotionClient,
    database_id: String,
}

impl NotionDatabase {
    pub fn new(client: NotionClient, database_id: impl Into<String>) -> Self {
        Self {
            client,
            database_id: database_id.into(),
        }
    }
}

impl RowStore for NotionDatabase {
    fn name(&self) -> &'static str {
        "notion"
    }

    async fn query_rows(&self, cursor: Option<String>) -> Result<Page<LocalRecordRef>> {
        let response = self
            .client
            .query_database(&self.database_id, cursor.as_deref())
            .await?;

        let refs = response
            .results
            .into_iter()
            .filter_map(|page| match mal_id_from_properties(&page.properties) {
                Some(mal_id) => Some(LocalRecordRef {
                    mal_id,
                    page_id: page.id,
                }),
                None => {
                    debug!("Skipping row {} without a MAL ID", page.id);
                    None
                }
            })
            .collect();

        let next_cursor = if response.has_more {
            response.next_cursor
        } else {
            None
        };
        Ok(Page::new(refs, next_cursor))
    }

    async fn create_row(&self, item: &RemoteItem) -> Result<String> {
        let page = self
            .client
            .create_page(&self.database_id, to_properties(item))
            .await?;
        Ok(page.id)
    }

    async fn update_row(&self, page_id: &str, item: &RemoteItem) -> Result<()> {
        self.client.update_page(page_id, to_properties(item)).await?;
        Ok(())
    }
}
