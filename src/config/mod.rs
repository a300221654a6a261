// animelistsync/src/config/mod.rs
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use uuid::Uuid;
use walkdir::WalkDir;

use crate::myanimelist;
use crate::notion;
use crate::notion::schema::{default_database_schema, verify_schema};

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_DATABASE_TITLE: &str = "Anime List";
pub const NOTION_TOKEN_VAR: &str = "NOTION_TOKEN";
pub const MAL_CLIENT_ID_VAR: &str = "MAL_CLIENT_ID";

static NOTION_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{12}")
        .expect("static regex is valid")
});

// Structs for deserializing the config document
#[derive(Debug, Clone, Deserialize)]
pub struct RawJsonConfig {
    pub root_page_id: Option<String>,
    pub database_id: Option<String>,
    pub database_title: Option<String>,
    pub batch_size: Option<usize>,
    pub myanimelist_username: Option<String>,
    pub database_properties: Option<Value>,
    pub notion_api_url: Option<String>,
    pub myanimelist_api_url: Option<String>,
}

// Application's internal configuration structs
#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    pub root_page_id: String,
    /// `None` when the document leaves it empty; the database gets created.
    pub database_id: Option<String>,
    pub database_title: String,
    pub batch_size: usize,
    pub myanimelist_username: String,
    pub database_schema: Value,
    pub notion_api_url: String,
    pub myanimelist_api_url: String,
}

#[derive(Clone)]
pub struct Secrets {
    pub notion_token: String,
    pub mal_client_id: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("notion_token", &"<redacted>")
            .field("mal_client_id", &"<redacted>")
            .finish()
    }
}

impl Secrets {
    /// Reads the API credentials from the environment (and `.env`, loaded by main).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .with_context(|| format!("{} must be set in the environment or .env", key))
        };
        Ok(Secrets {
            notion_token: required(NOTION_TOKEN_VAR)?,
            mal_client_id: required(MAL_CLIENT_ID_VAR)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub config_path: PathBuf,
    pub sync: SyncConfig,
    pub secrets: Secrets,
}

impl AppConfig {
    pub fn load_from_json(config_path: &Path, secrets: Secrets) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;
        let raw_json_config: RawJsonConfig = serde_json::from_str(&config_content)
            .with_context(|| {
                format!(
                    "Failed to parse JSON from config file at {}",
                    config_path.display()
                )
            })?;
        let sync = load_sync_config_from_json(&raw_json_config)
            .with_context(|| format!("Invalid sync configuration in {}", config_path.display()))?;

        Ok(AppConfig {
            config_path: config_path.to_path_buf(),
            sync,
            secrets,
        })
    }
}

pub fn load_sync_config_from_json(raw_config: &RawJsonConfig) -> Result<SyncConfig> {
    let root_page_id = raw_config
        .root_page_id
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .context("root_page_id must be set in the config document")?;
    let root_page_id =
        normalize_notion_id(root_page_id).context("root_page_id is not a Notion id")?;

    let database_id = match raw_config.database_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => {
            Some(normalize_notion_id(id).context("database_id is not a Notion id")?)
        }
        _ => None,
    };

    let myanimelist_username = raw_config
        .myanimelist_username
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .context("myanimelist_username must be set in the config document")?
        .to_string();

    let batch_size = raw_config.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
    if batch_size == 0 {
        anyhow::bail!("batch_size must be at least 1");
    }

    let database_schema = match &raw_config.database_properties {
        Some(Value::Object(props)) if !props.is_empty() => {
            verify_schema(props).context("database_properties lacks the synced properties")?;
            Value::Object(props.clone())
        }
        Some(Value::Object(_)) | None | Some(Value::Null) => default_database_schema(),
        Some(_) => {
            anyhow::bail!("database_properties must be an object of Notion property schemas")
        }
    };

    Ok(SyncConfig {
        root_page_id,
        database_id,
        database_title: raw_config
            .database_title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_TITLE.to_string()),
        batch_size,
        myanimelist_username,
        database_schema,
        notion_api_url: raw_config
            .notion_api_url
            .clone()
            .unwrap_or_else(|| notion::client::DEFAULT_API_URL.to_string()),
        myanimelist_api_url: raw_config
            .myanimelist_api_url
            .clone()
            .unwrap_or_else(|| myanimelist::DEFAULT_API_URL.to_string()),
    })
}

/// Accepts a hyphenated id, a bare 32-char id or a Notion URL and returns the
/// hyphenated UUID form.
pub fn normalize_notion_id(raw: &str) -> Result<String> {
    // Database URLs carry the view id in `?v=`, which also looks like an id.
    let without_query = raw.split(['?', '#']).next().unwrap_or(raw);
    let candidate = NOTION_ID
        .find_iter(without_query)
        .last()
        .with_context(|| format!("'{}' does not contain a Notion id", raw))?;
    let id = Uuid::parse_str(candidate.as_str())
        .with_context(|| format!("'{}' is not a valid Notion id", candidate.as_str()))?;
    Ok(id.hyphenated().to_string())
}

/// Stores a newly created database id in the config document so the next run
/// reuses the database. Other keys are kept as they are.
pub fn persist_database_id(config_path: &Path, database_id: &str) -> Result<()> {
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;
    let mut document: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON from {}", config_path.display()))?;
    let object = document
        .as_object_mut()
        .with_context(|| format!("{} does not hold a JSON object", config_path.display()))?;
    object.insert("database_id".to_string(), Value::String(database_id.to_string()));

    let updated = serde_json::to_string_pretty(&document)?;
    fs::write(config_path, updated + "\n")
        .with_context(|| format!("Failed to write config file at {}", config_path.display()))?;
    Ok(())
}

/// Lists the `*.json` documents directly inside `dir`, sorted by name.
pub fn discover_config_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let is_json = entry.path().extension().is_some_and(|ext| ext == "json");
        if entry.file_type().is_file() && is_json {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}
