// animelistsync/src/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Fatal problem before any data is read: config, root page, database.
    #[error("Setup error: {0}")]
    Setup(String),

    #[error("Failed to fetch a page from {source_name}: {source}")]
    Fetch {
        source_name: &'static str,
        #[source]
        source: Box<AppError>,
    },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    pub fn fetch(source_name: &'static str, source: AppError) -> Self {
        AppError::Fetch {
            source_name,
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_names_source() {
        let err = AppError::fetch(
            "notion",
            AppError::Api {
                status: 500,
                code: "internal_server_error".to_string(),
                message: "boom".to_string(),
            },
        );
        let text = err.to_string();
        assert!(text.contains("notion"));
        assert!(text.contains("boom"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
