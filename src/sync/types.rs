// animelistsync/src/sync/types.rs
use std::fmt;

/// One anime from the remote list, as fetched for this run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RemoteItem {
    pub id: u64,
    pub title: String,
    /// User score, 0 when unscored.
    pub score: u8,
    pub url: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// 0 when the episode count is not known yet.
    pub num_episodes: u32,
    pub num_episodes_watched: u32,
    pub media_type: String,
    pub status: String,
    pub is_rewatching: bool,
    pub genres: Vec<String>,
}

/// A row already present in the Notion database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRecordRef {
    pub mal_id: u64,
    pub page_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncOperation {
    Create(RemoteItem),
    Update { page_id: String, item: RemoteItem },
}

impl SyncOperation {
    pub fn item(&self) -> &RemoteItem {
        match self {
            SyncOperation::Create(item) => item,
            SyncOperation::Update { item, .. } => item,
        }
    }
}

impl fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOperation::Create(item) => {
                write!(f, "create '{}' (MAL {})", item.title, item.id)
            }
            SyncOperation::Update { page_id, item } => {
                write!(f, "update '{}' (MAL {}, page {})", item.title, item.id, page_id)
            }
        }
    }
}
