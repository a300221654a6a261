// animelistsync/src/notion/properties.rs
//! Mapping between a fetched anime and the property payload of a Notion row.

use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::sync::types::RemoteItem;

pub const NAME: &str = "Name";
pub const MAL_ID: &str = "MAL ID";
pub const SCORE: &str = "Score";
pub const LINK: &str = "Link";
pub const START_DATE: &str = "Start Date";
pub const END_DATE: &str = "End Date";
pub const EPISODES: &str = "Episodes";
pub const EPISODES_WATCHED: &str = "Episodes Watched";
pub const TYPE: &str = "Type";
pub const STATUS: &str = "Status";
pub const REWATCHING: &str = "Rewatching";
pub const GENRES: &str = "Genres";

/// Every property written to a row, with its Notion property type.
pub const MAPPED_PROPERTIES: &[(&str, &str)] = &[
    (NAME, "title"),
    (MAL_ID, "number"),
    (SCORE, "number"),
    (LINK, "url"),
    (START_DATE, "date"),
    (END_DATE, "date"),
    (EPISODES, "number"),
    (EPISODES_WATCHED, "number"),
    (TYPE, "select"),
    (STATUS, "select"),
    (REWATCHING, "checkbox"),
    (GENRES, "multi_select"),
];

const MAX_TEXT_LEN: usize = 2000;
const MAX_OPTION_LEN: usize = 100;

/// Builds the `properties` object for a create or update call.
pub fn to_properties(item: &RemoteItem) -> Value {
    json!({
        NAME: { "title": [{ "text": { "content": truncate(&item.title, MAX_TEXT_LEN) } }] },
        MAL_ID: { "number": item.id },
        SCORE: { "number": non_zero(u32::from(item.score)) },
        LINK: { "url": item.url },
        START_DATE: date_property(item.start_date.as_deref()),
        END_DATE: date_property(item.end_date.as_deref()),
        EPISODES: { "number": non_zero(item.num_episodes) },
        EPISODES_WATCHED: { "number": item.num_episodes_watched },
        TYPE: select_property(&item.media_type),
        STATUS: select_property(&item.status),
        REWATCHING: { "checkbox": item.is_rewatching },
        GENRES: { "multi_select": multi_select_options(&item.genres) },
    })
}

/// Reads the MyAnimeList id back out of a row's properties.
pub fn mal_id_from_properties(properties: &Value) -> Option<u64> {
    let number = properties.get(MAL_ID)?.get("number")?;
    if let Some(id) = number.as_u64() {
        return Some(id);
    }
    // Notion hands numbers back as floats.
    let id = number.as_f64()?;
    (id >= 0.0 && id.fract() == 0.0 && id <= u64::MAX as f64).then_some(id as u64)
}

/// Turns the full, month-only or year-only dates MyAnimeList returns into an
/// ISO date. Anything else yields `None`.
pub fn normalize_date(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01-01", raw), "%Y-%m-%d"))
        .ok()?;
    Some(date.format("%Y-%m-%d").to_string())
}

fn date_property(raw: Option<&str>) -> Value {
    match normalize_date(raw) {
        Some(start) => json!({ "date": { "start": start } }),
        None => json!({ "date": null }),
    }
}

fn select_property(name: &str) -> Value {
    match option_name(name) {
        Some(name) => json!({ "select": { "name": name } }),
        None => json!({ "select": null }),
    }
}

fn multi_select_options(names: &[String]) -> Vec<Value> {
    let mut seen: Vec<String> = Vec::with_capacity(names.len());
    for name in names.iter().filter_map(|n| option_name(n)) {
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen.into_iter().map(|name| json!({ "name": name })).collect()
}

/// Notion rejects option names containing commas or longer than 100 chars.
fn option_name(raw: &str) -> Option<String> {
    let cleaned = raw.replace(',', " ");
    let cleaned = truncate(cleaned.trim(), MAX_OPTION_LEN);
    (!cleaned.is_empty()).then_some(cleaned)
}

fn non_zero(n: u32) -> Option<u32> {
    (n != 0).then_some(n)
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
