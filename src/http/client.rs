//! HTTP client for the release API and asset downloads.

use anyhow::{Context, Result};
use log::debug;
use reqwest::{
    Client, Response,
    header::{AUTHORIZATION, HeaderMap, HeaderValue, LINK},
};
use serde::de::DeserializeOwned;
use std::io::Write;

use super::status::{classify_status, classify_transport};

const USER_AGENT: &str = "hvm-cli";

/// One page of a paginated JSON listing.
#[derive(Debug)]
pub struct Page<T> {
    pub items: T,
    /// Absolute URL of the following page, from the `Link` header.
    pub next: Option<String>,
}

/// Thin wrapper over `reqwest::Client` that turns HTTP failures into
/// `HvmError::Network`.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client that sends `Authorization: Bearer <token>` when a token is given.
    pub fn with_token(token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .context("GitHub token contains invalid characters")?;
            auth_value.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth_value);
            debug!("Using GitHub token for authentication: {}", mask_token(token));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::new(client))
    }

    /// Performs a GET request and deserializes the JSON response.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET JSON from {}...", url);
        let response = self.send(url).await?;
        let result = response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))?;
        Ok(result)
    }

    /// Performs a GET request for one page of a listing and reports the next page URL.
    #[tracing::instrument(skip(self))]
    pub async fn get_json_page<T: DeserializeOwned>(&self, url: &str) -> Result<Page<T>> {
        debug!("GET JSON page from {}...", url);
        let response = self.send(url).await?;
        let next = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(next_link);
        let items = response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))?;
        Ok(Page { items, next })
    }

    /// Streams the response body of `url` into the writer returned by `create_writer`.
    ///
    /// The writer is only created after a successful status, so a failed
    /// request leaves nothing behind.
    #[tracing::instrument(skip(self, create_writer))]
    pub async fn download_file<W, F>(&self, url: &str, create_writer: F) -> Result<u64>
    where
        W: Write,
        F: FnOnce() -> Result<W>,
    {
        debug!("Downloading file from {}...", url);
        let mut response = self.send(url).await?;

        let mut writer = create_writer()?;
        let mut downloaded_bytes: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| classify_transport(&e, url))?
        {
            writer
                .write_all(&chunk)
                .context("Failed to write chunk to file")?;
            downloaded_bytes += chunk.len() as u64;
        }
        writer.flush().context("Failed to flush downloaded file")?;

        debug!(
            "Downloaded {:.2} MB",
            downloaded_bytes as f64 / (1024.0 * 1024.0)
        );

        Ok(downloaded_bytes)
    }

    async fn send(&self, url: &str) -> Result<Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_transport(&e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status, url).into());
        }
        Ok(response)
    }
}

/// Extracts the `rel="next"` target from a `Link` header value.
pub(crate) fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let mut segments = part.split(';');
        let target = segments.next()?.trim();
        let is_next = segments.any(|param| {
            let param = param.trim();
            param == r#"rel="next""# || param == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}

fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "*********".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HvmError;
    use mockito::Matcher;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        name: String,
    }

    #[tokio::test]
    async fn test_get_json_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/item")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "hugo"}"#)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let item: Item = client
            .get_json(&format!("{}/item", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(item.name, "hugo");
    }

    #[tokio::test]
    async fn test_get_json_not_found_is_network_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/item")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let err = client
            .get_json::<Item>(&format!("{}/item", server.url()))
            .await
            .unwrap_err();

        // Exactly one request: failures are not retried
        mock.assert_async().await;
        assert!(matches!(
            HvmError::from_anyhow(&err),
            Some(HvmError::Network(_))
        ));
    }

    #[tokio::test]
    async fn test_get_json_page_reads_next_link() {
        let mut server = mockito::Server::new_async().await;
        let next = format!("{}/items?page=2", server.url());
        let _m = server
            .mock("GET", "/items")
            .with_status(200)
            .with_header("link", &format!(r#"<{}>; rel="next", <{}>; rel="last""#, next, next))
            .with_body(r#"[{"name": "a"}]"#)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let page: Page<Vec<Item>> = client
            .get_json_page(&format!("{}/items", server.url()))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.next, Some(next));
    }

    #[tokio::test]
    async fn test_download_file_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/hugo.tar.gz")
            .with_status(200)
            .with_body("archive bytes")
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let mut sink = Vec::new();
        let bytes = client
            .download_file(&format!("{}/hugo.tar.gz", server.url()), || Ok(&mut sink))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(bytes, 13);
        assert_eq!(sink, b"archive bytes");
    }

    #[tokio::test]
    async fn test_download_file_error_status_never_creates_writer() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/hugo.tar.gz")
            .with_status(500)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let result = client
            .download_file(&format!("{}/hugo.tar.gz", server.url()), || -> Result<Vec<u8>> {
                panic!("writer must not be created for a failed response")
            })
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_with_token_sends_bearer_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_header("authorization", "Bearer test_token")
            .create_async()
            .await;

        let client = HttpClient::with_token(Some("test_token")).unwrap();
        let _ = client.send(&server.url()).await;

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_without_token_sends_no_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_header("authorization", Matcher::Missing)
            .create_async()
            .await;

        let client = HttpClient::with_token(None).unwrap();
        let _ = client.send(&server.url()).await;

        mock.assert_async().await;
    }

    #[test]
    fn test_next_link_parsing() {
        let header = r#"<https://api.github.com/repositories/1/tags?per_page=100&page=2>; rel="next", <https://api.github.com/repositories/1/tags?per_page=100&page=9>; rel="last""#;
        assert_eq!(
            next_link(header).as_deref(),
            Some("https://api.github.com/repositories/1/tags?per_page=100&page=2")
        );

        let last_page = r#"<https://x/tags?page=1>; rel="first", <https://x/tags?page=8>; rel="prev""#;
        assert_eq!(next_link(last_page), None);
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("short"), "*********");
        assert_eq!(mask_token("ghp_abcdefghijklmnop"), "ghp_*********mnop");
        assert_eq!(mask_token("aéé_0123456789abcdef"), "aéé_*********cdef");
        assert_eq!(mask_token("éééééééééééé"), "*********");
    }
}
