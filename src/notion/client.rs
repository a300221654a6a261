// animelistsync/src/notion/client.rs
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use super::models::{DatabaseObject, PageObject, QueryResponse};
use crate::errors::Result;
use crate::utils::http::{build_client, read_json};

pub const DEFAULT_API_URL: &str = "https://api.notion.com/v1";
pub const NOTION_VERSION: &str = "2022-06-28";
/// Largest page size the query endpoint accepts.
const QUERY_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl NotionClient {
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)?.as_str().trim_end_matches('/').to_string();
        Ok(Self {
            http: build_client()?,
            base_url,
            token: token.into(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        debug!("Notion {} {}", method, url);
        self.http
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        read_json(response).await
    }

    pub async fn retrieve_page(&self, page_id: &str) -> Result<PageObject> {
        self.send(self.request(Method::GET, &format!("pages/{}", page_id)))
            .await
    }

    pub async fn retrieve_database(&self, database_id: &str) -> Result<DatabaseObject> {
        self.send(self.request(Method::GET, &format!("databases/{}", database_id)))
            .await
    }

    /// Creates a full-page database under `parent_page_id`.
    pub async fn create_database(
        &self,
        parent_page_id: &str,
        title: &str,
        properties: &Value,
    ) -> Result<DatabaseObject> {
        let body = json!({
            "parent": { "type": "page_id", "page_id": parent_page_id },
            "title": [{ "type": "text", "text": { "content": title } }],
            "properties": properties,
        });
        self.send(self.request(Method::POST, "databases").json(&body))
            .await
    }

    pub async fn query_database(
        &self,
        database_id: &str,
        start_cursor: Option<&str>,
    ) -> Result<QueryResponse> {
        let mut body = json!({ "page_size": QUERY_PAGE_SIZE });
        if let Some(cursor) = start_cursor {
            body["start_cursor"] = json!(cursor);
        }
        self.send(
            self.request(Method::POST, &format!("databases/{}/query", database_id))
                .json(&body),
        )
        .await
    }

    pub async fn create_page(&self, database_id: &str, properties: Value) -> Result<PageObject> {
        let body = json!({
            "parent": { "database_id": database_id },
            "properties": properties,
        });
        self.send(self.request(Method::POST, "pages").json(&body))
            .await
    }

    pub async fn update_page(&self, page_id: &str, properties: Value) -> Result<PageObject> {
        let body = json!({ "properties": properties });
        self.send(
            self.request(Method::PATCH, &format!("pages/{}", page_id))
                .json(&body),
        )
        .await
    }
}
