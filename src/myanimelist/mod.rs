// animelistsync/src/myanimelist/mod.rs
pub(crate) mod models;

use tracing::debug;
use url::Url;

use crate::errors::{AppError, Result};
use crate::sync::source::ListSource;
use crate::sync::types::RemoteItem;
use crate::utils::http::{build_client, read_json};
use crate::utils::pager::Page;
use models::AnimeListResponse;

pub const DEFAULT_API_URL: &str = "https://api.myanimelist.net/v2";
const LIST_FIELDS: &str = "list_status,num_episodes,media_type,start_date,end_date,genres";
/// Largest page the list endpoint serves.
const LIST_PAGE_SIZE: &str = "100";

/// Reads one user's anime list from the MyAnimeList v2 API.
#[derive(Debug, Clone)]
pub struct MalClient {
    http: reqwest::Client,
    first_page: Url,
    client_id: String,
}

impl MalClient {
    pub fn new(base_url: &str, client_id: impl Into<String>, username: &str) -> Result<Self> {
        let mut first_page = Url::parse(base_url)?;
        first_page
            .path_segments_mut()
            .map_err(|_| AppError::InvalidInput(format!("{} cannot be a base URL", base_url)))?
            .pop_if_empty()
            .extend(["users", username, "animelist"]);
        first_page
            .query_pairs_mut()
            .append_pair("fields", LIST_FIELDS)
            .append_pair("limit", LIST_PAGE_SIZE)
            .append_pair("nsfw", "true");

        Ok(Self {
            http: build_client()?,
            first_page,
            client_id: client_id.into(),
        })
    }

    /// Fetches the page at `cursor`, which is the `paging.next` URL of the
    /// previous page, or the first page when `None`.
    pub async fn fetch_animelist_page(&self, cursor: Option<&str>) -> Result<Page<RemoteItem>> {
        let url = match cursor {
            Some(next) => Url::parse(next)?,
            None => self.first_page.clone(),
        };
        debug!("MyAnimeList GET {}", url);

        let response = self
            .http
            .get(url)
            .header("X-MAL-CLIENT-ID", &self.client_id)
            .send()
            .await?;
        let body: AnimeListResponse = read_json(response).await?;

        let items = body.data.into_iter().map(RemoteItem::from).collect();
        Ok(Page::new(items, body.paging.next))
    }
}

impl ListSource for MalClient {
    fn name(&self) -> &'static str {
        "myanimelist"
    }

    async fn fetch_page(&self, cursor: Option<String>) -> Result<Page<RemoteItem>> {
        self.fetch_animelist_page(cursor.as_deref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::pager::fetch_all;
    use mockito::{Matcher, Server};

    fn entry(id: u64) -> String {
        format!(
            r#"{{ "node": {{ "id": {}, "title": "anime {}" }}, "list_status": {{ "score": 7 }} }}"#,
            id, id
        )
    }

    #[test]
    fn test_first_page_url() -> anyhow::Result<()> {
        let client = MalClient::new("https://api.myanimelist.net/v2", "cid", "some user")?;
        let url = client.first_page.as_str();
        assert!(url.starts_with("https://api.myanimelist.net/v2/users/some%20user/animelist?"));
        assert!(url.contains("limit=100"));
        assert!(url.contains("nsfw=true"));
        Ok(())
    }

    #[tokio::test]
    async fn test_follows_paging_next_until_absent() -> anyhow::Result<()> {
        let mut server = Server::new_async().await;
        let next = format!("{}/users/someone/animelist?offset=100&limit=100", server.url());

        let first = server
            .mock("GET", "/users/someone/animelist")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "100".into()),
                Matcher::UrlEncoded("fields".into(), LIST_FIELDS.into()),
            ]))
            .match_header("x-mal-client-id", "cid")
            .with_status(200)
            .with_body(format!(
                r#"{{ "data": [{}, {}], "paging": {{ "next": "{}" }} }}"#,
                entry(1),
                entry(2),
                next
            ))
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/users/someone/animelist")
            .match_query(Matcher::UrlEncoded("offset".into(), "100".into()))
            .with_status(200)
            .with_body(format!(r#"{{ "data": [{}], "paging": {{}} }}"#, entry(3)))
            .expect(1)
            .create_async()
            .await;

        let client = MalClient::new(&server.url(), "cid", "someone")?;
        let items = fetch_all(|cursor| client.fetch_page(cursor)).await?;

        first.assert_async().await;
        second.assert_async().await;
        let ids: Vec<u64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(items[0].url, "https://myanimelist.net/anime/1");
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_user_is_an_api_error() -> anyhow::Result<()> {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/users/nobody/animelist")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{ "error": "not_found", "message": "" }"#)
            .create_async()
            .await;

        let client = MalClient::new(&server.url(), "cid", "nobody")?;
        match client.fetch_page(None).await {
            Err(AppError::Api { status, code, .. }) => {
                assert_eq!(status, 404);
                assert_eq!(code, "not_found");
            }
            other => panic!("expected an API error, got {:?}", other),
        }
        Ok(())
    }
}
