//! Source page retrieval from URLs, files, and stdin.
//!
//! A run fetches exactly one page. URL fetches are a single GET with no
//! retry: transport failures, timeouts and non-2xx responses all abort.

use std::fs;
use std::path::PathBuf;

#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::Client;
#[cfg(feature = "fetch")]
use url::Url;

use crate::{Result, TexEntryError};

/// HTTP client configuration for fetching the source page.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: "Mozilla/5.0 (compatible; texentry/1.0)".to_string() }
    }
}

/// Fetches HTML content from a URL.
///
/// Performs one HTTP GET and returns the response body as text. Redirects
/// are followed; any final status outside 2xx is reported as
/// [`TexEntryError::HttpStatus`].
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = Url::parse(url).map_err(|e| TexEntryError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(TexEntryError::InvalidUrl(format!(
            "unsupported scheme '{}' (expected http or https)",
            parsed_url.scheme()
        )));
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(TexEntryError::HttpError)?;

    tracing::debug!(url = %parsed_url, "fetching source page");

    let response = client
        .get(parsed_url.clone())
        .header("User-Agent", &config.user_agent)
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                TexEntryError::Timeout { timeout: config.timeout }
            } else {
                TexEntryError::HttpError(e)
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(TexEntryError::HttpStatus { status: status.as_u16(), url: parsed_url.to_string() });
    }

    let content = response.text().await?;
    tracing::debug!(bytes = content.len(), "fetched source page");

    Ok(content)
}

/// Reads HTML content from a local file.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(TexEntryError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(TexEntryError::from)
    }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(TexEntryError::from)?;

    Ok(buffer)
}
