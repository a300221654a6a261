// animelistsync/src/sync/reconcile.rs
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::warn;

use super::types::{LocalRecordRef, RemoteItem, SyncOperation};

/// MyAnimeList id -> Notion page id, built once per run from the database rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentifierMap {
    pages: HashMap<u64, String>,
}

impl IdentifierMap {
    /// Builds the map from the rows found in the database. When two rows share
    /// a MAL id the first one is kept.
    pub fn from_refs(refs: impl IntoIterator<Item = LocalRecordRef>) -> Self {
        let mut pages = HashMap::new();
        for LocalRecordRef { mal_id, page_id } in refs {
            match pages.entry(mal_id) {
                Entry::Vacant(slot) => {
                    slot.insert(page_id);
                }
                Entry::Occupied(existing) => {
                    warn!(
                        "⚠️ MAL id {} is present on more than one row ({} and {}); using {}",
                        mal_id,
                        existing.get(),
                        page_id,
                        existing.get()
                    );
                }
            }
        }
        Self { pages }
    }

    pub fn page_id(&self, mal_id: u64) -> Option<&str> {
        self.pages.get(&mal_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Reconciliation {
    pub creates: Vec<SyncOperation>,
    pub updates: Vec<SyncOperation>,
}

/// Splits the fetched list into rows to create and rows to update.
///
/// Order is kept within each list. Rows whose MAL id no longer appears in the
/// list are left alone; nothing is ever deleted.
pub fn reconcile(items: Vec<RemoteItem>, map: &IdentifierMap) -> Reconciliation {
    let mut result = Reconciliation::default();
    for item in items {
        match map.page_id(item.id) {
            Some(page_id) => result.updates.push(SyncOperation::Update {
                page_id: page_id.to_string(),
                item,
            }),
            None => result.creates.push(SyncOperation::Create(item)),
        }
    }
    result
}
