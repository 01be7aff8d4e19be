//! CSRF token retrieval over HTTP.

use std::sync::Arc;

use url::Url;

use super::extract::{extract_csrf_token, SecurityToken};
use crate::error_handling::TokenError;

/// Fetches the blink site's home page and scrapes its CSRF token.
pub struct TokenFetcher {
    client: Arc<reqwest::Client>,
    page_url: Url,
}

impl TokenFetcher {
    pub fn new(client: Arc<reqwest::Client>, page_url: Url) -> Self {
        TokenFetcher { client, page_url }
    }

    pub fn page_url(&self) -> &Url {
        &self.page_url
    }

    /// Performs a GET on the token page and extracts the token.
    ///
    /// # Errors
    ///
    /// - `TokenError::Request` if the page could not be fetched or read
    /// - `TokenError::Status` if the page answered with a non-success status
    /// - `TokenError::NotFound` if the markup has no usable `csrf-token` meta tag
    pub async fn fetch(&self) -> Result<SecurityToken, TokenError> {
        log::debug!("Fetching CSRF token from {}", self.page_url);
        let response = self.client.get(self.page_url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TokenError::Status(status));
        }

        let body = response.text().await?;
        extract_csrf_token(&body).ok_or(TokenError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httptest::{matchers::*, responders::*, Expectation, Server};

    fn fetcher_for(server: &Server) -> TokenFetcher {
        let client = Arc::new(
            reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(5))
                .build()
                .expect("Failed to create HTTP client"),
        );
        let page_url = Url::parse(&server.url_str("/")).expect("server URL parses");
        TokenFetcher::new(client, page_url)
    }

    #[tokio::test]
    async fn test_fetch_returns_token() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/")).respond_with(
                status_code(200)
                    .body(r#"<html><head><meta name="csrf-token" content="abc123"></head></html>"#),
            ),
        );

        let token = fetcher_for(&server).fetch().await.expect("token");
        assert_eq!(token.as_str(), "abc123");
    }

    #[tokio::test]
    async fn test_fetch_without_meta_tag_is_not_found() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/"))
                .respond_with(status_code(200).body("<html><title>Blink</title></html>")),
        );

        let result = fetcher_for(&server).fetch().await;
        assert!(matches!(result, Err(TokenError::NotFound)));
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/"))
                .respond_with(status_code(503)),
        );

        let result = fetcher_for(&server).fetch().await;
        match result {
            Err(TokenError::Status(status)) => assert_eq!(status.as_u16(), 503),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let client = Arc::new(reqwest::Client::new());
        let fetcher = TokenFetcher::new(client, Url::parse("http://127.0.0.1:9/").unwrap());
        assert!(matches!(
            fetcher.fetch().await,
            Err(TokenError::Request(_))
        ));
    }
}
