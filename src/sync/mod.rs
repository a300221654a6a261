// animelistsync/src/sync/mod.rs
pub(crate) mod batch;
pub(crate) mod logic;
pub(crate) mod reconcile;
pub(crate) mod source;
pub(crate) mod types;

use anyhow::{Context, Result};
use crate::config::AppConfig;
use crate::myanimelist::MalClient;
use crate::notion::{NotionClient, NotionDatabase};

pub use logic::SyncSummary;

/// Public entry point for the sync process.
/// Sets up the Notion database, then mirrors the MyAnimeList list into it.
pub async fn run_sync_flow(
    app_config: &AppConfig,
    confirm: impl FnOnce(&str) -> crate::errors::Result<bool>,
) -> Result<SyncSummary> {
    let sync_config = &app_config.sync;
    let secrets = &app_config.secrets;

    let notion = NotionClient::new(&sync_config.notion_api_url, secrets.notion_token.clone())
        .context("Failed to build the Notion client")?;
    let database_id = logic::ensure_database(&notion, sync_config, &app_config.config_path, confirm)
        .await
        .context("Failed to prepare the Notion database")?;

    let store = NotionDatabase::new(notion, database_id);
    let source = MalClient::new(
        &sync_config.myanimelist_api_url,
        secrets.mal_client_id.clone(),
        &sync_config.myanimelist_username,
    )
    .context("Failed to build the MyAnimeList client")?;

    logic::perform_sync_orchestration(&source, &store, sync_config.batch_size)
        .await
        .context("Sync failed")
}
