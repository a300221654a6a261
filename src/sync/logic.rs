// animelistsync/src/sync/logic.rs
use std::path::Path;
use tracing::{debug, info, warn};

use super::batch::{WriteFailure, run_batches};
use super::reconcile::{IdentifierMap, reconcile};
use super::source::{ListSource, RowStore};
use super::types::SyncOperation;
use crate::config::{SyncConfig, persist_database_id};
use crate::errors::{AppError, Result};
use crate::notion::NotionClient;
use crate::notion::schema::verify_schema;
use crate::utils::pager::fetch_all;

/// What a finished run did.
#[derive(Debug, Default)]
pub struct SyncSummary {
    pub fetched: usize,
    pub existing_rows: usize,
    pub created: usize,
    pub updated: usize,
    pub failures: Vec<WriteFailure>,
}

/// Makes sure the target database exists and returns its id.
///
/// 1. Retrieves the root page.
/// 2. With a configured database id, retrieves that database and checks its schema.
/// 3. Without one, asks `confirm` and creates the database under the root page,
///    writes the new id back to `config_path`, then checks the created schema.
pub async fn ensure_database(
    client: &NotionClient,
    config: &SyncConfig,
    config_path: &Path,
    confirm: impl FnOnce(&str) -> Result<bool>,
) -> Result<String> {
    let root = client.retrieve_page(&config.root_page_id).await.map_err(|e| {
        AppError::Setup(format!(
            "Root page {} is not reachable: {}",
            config.root_page_id, e
        ))
    })?;
    info!("📄 Root page found: {}", root.url);

    if let Some(database_id) = &config.database_id {
        let database = client.retrieve_database(database_id).await.map_err(|e| {
            AppError::Setup(format!("Database {} is not reachable: {}", database_id, e))
        })?;
        verify_schema(&database.properties)?;
        info!("🗂️ Using database '{}' ({})", database.plain_title(), database.id);
        return Ok(database.id);
    }

    let question = format!(
        "No database_id configured. Create database '{}' under the root page?",
        config.database_title
    );
    if !confirm(&question)? {
        return Err(AppError::Setup(
            "No database to sync into and creation was declined".to_string(),
        ));
    }

    let database = client
        .create_database(&config.root_page_id, &config.database_title, &config.database_schema)
        .await
        .map_err(|e| AppError::Setup(format!("Failed to create database: {}", e)))?;
    info!("✅ Created database {} at {}", database.id, database.url);

    match persist_database_id(config_path, &database.id) {
        Ok(()) => info!("Saved database_id to {}", config_path.display()),
        Err(e) => warn!(
            "⚠️ Could not save database_id {} to {}: {:#}. Add it by hand before the next run.",
            database.id,
            config_path.display(),
            e
        ),
    }
    verify_schema(&database.properties)?;
    Ok(database.id)
}

/// Mirrors the list from `source` into `store`.
///
/// 1. Pages through the existing rows.
/// 2. Builds the id map from them.
/// 3. Pages through the remote list.
/// 4. Splits the list into creates and updates.
/// 5. Writes the creates, then the updates, `batch_size` at a time.
///
/// Any failure in steps 1-3 aborts before anything is written. Write failures
/// are collected in the summary.
pub async fn perform_sync_orchestration<L, S>(
    source: &L,
    store: &S,
    batch_size: usize,
) -> Result<SyncSummary>
where
    L: ListSource,
    S: RowStore,
{
    let rows = fetch_all(|cursor| store.query_rows(cursor))
        .await
        .map_err(|e| AppError::fetch(store.name(), e))?;
    info!("📥 {} anime fetched from {}.", rows.len(), store.name());

    let identifier_map = IdentifierMap::from_refs(rows);

    let animelist = fetch_all(|cursor| source.fetch_page(cursor))
        .await
        .map_err(|e| AppError::fetch(source.name(), e))?;
    info!("📥 Fetched {} anime from {}.", animelist.len(), source.name());

    let mut summary = SyncSummary {
        fetched: animelist.len(),
        existing_rows: identifier_map.len(),
        ..Default::default()
    };

    let reconciliation = reconcile(animelist, &identifier_map);

    info!("➕ {} new anime to add to {}.", reconciliation.creates.len(), store.name());
    let created = run_batches(reconciliation.creates, batch_size, |op| apply(store, op)).await;
    summary.created = created.succeeded;
    summary.failures.extend(created.failures);

    info!("🔄 {} anime to update in {}.", reconciliation.updates.len(), store.name());
    let updated = run_batches(reconciliation.updates, batch_size, |op| apply(store, op)).await;
    summary.updated = updated.succeeded;
    summary.failures.extend(updated.failures);

    if summary.failures.is_empty() {
        info!("✅ {} synced with {}.", store.name(), source.name());
    } else {
        warn!(
            "⚠️ {} synced with {} with {} failed writes.",
            store.name(),
            source.name(),
            summary.failures.len()
        );
    }
    Ok(summary)
}

async fn apply<S: RowStore>(store: &S, op: SyncOperation) -> Result<()> {
    let mal_id = op.item().id;
    match &op {
        SyncOperation::Create(item) => {
            let page_id = store.create_row(item).await?;
            debug!("Created page {} for MAL {}", page_id, mal_id);
        }
        SyncOperation::Update { page_id, item } => {
            store.update_row(page_id, item).await?;
            debug!("Updated page {} for MAL {}", page_id, mal_id);
        }
    }
    Ok(())
}
