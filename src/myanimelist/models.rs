// animelistsync/src/myanimelist/models.rs
use serde::Deserialize;

use crate::sync::types::RemoteItem;

const ANIME_PAGE_URL: &str = "https://myanimelist.net/anime";

#[derive(Debug, Clone, Deserialize)]
pub struct AnimeListResponse {
    #[serde(default)]
    pub data: Vec<AnimeListEntry>,
    #[serde(default)]
    pub paging: Paging,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paging {
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimeListEntry {
    pub node: AnimeNode,
    #[serde(default)]
    pub list_status: ListStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimeNode {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub num_episodes: u32,
    #[serde(default)]
    pub media_type: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub score: u8,
    #[serde(default)]
    pub num_episodes_watched: u32,
    #[serde(default)]
    pub is_rewatching: bool,
}

impl From<AnimeListEntry> for RemoteItem {
    fn from(entry: AnimeListEntry) -> Self {
        let AnimeListEntry { node, list_status } = entry;
        RemoteItem {
            url: format!("{}/{}", ANIME_PAGE_URL, node.id),
            id: node.id,
            title: node.title,
            score: list_status.score,
            start_date: node.start_date,
            end_date: node.end_date,
            num_episodes: node.num_episodes,
            num_episodes_watched: list_status.num_episodes_watched,
            media_type: node.media_type,
            status: list_status.status,
            is_rewatching: list_status.is_rewatching,
            genres: node.genres.into_iter().map(|g| g.name).collect(),
        }
    }
}
