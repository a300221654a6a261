// animelistsync/src/utils/http.rs
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use crate::errors::{AppError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared reqwest client settings for both APIs.
pub fn build_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Decodes a JSON body, turning non-2xx responses into `AppError::Api`.
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let url = response.url().clone();
    let body = response.bytes().await?;

    if !status.is_success() {
        return Err(api_error(status.as_u16(), &body));
    }

    serde_json::from_slice(&body).map_err(|e| {
        AppError::Decode(format!("{} returned a body that could not be decoded: {}", url, e))
    })
}

/// Notion answers `{code, message}`, MyAnimeList `{error, message}`.
fn api_error(status: u16, body: &[u8]) -> AppError {
    let parsed: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    let field = |key: &str| parsed.get(key).and_then(Value::as_str).map(str::to_string);

    let code = field("code")
        .or_else(|| field("error"))
        .unwrap_or_else(|| "unknown".to_string());
    let message = field("message")
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());

    AppError::Api {
        status,
        code,
        message,
    }
}
