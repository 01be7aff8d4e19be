//! Best-effort request counter reporting to ThingSpeak.
//!
//! Each report is a single GET that carries the cumulative request count in
//! `field1`. The response is never inspected beyond a debug log line and a
//! failure never reaches the caller.

use std::sync::Arc;

use tokio::task::JoinHandle;
use url::Url;

/// Sends the request counter to a ThingSpeak channel.
pub struct TelemetryReporter {
    client: Arc<reqwest::Client>,
    endpoint: Url,
    api_key: String,
}

impl TelemetryReporter {
    pub fn new(client: Arc<reqwest::Client>, endpoint: Url, api_key: impl Into<String>) -> Self {
        TelemetryReporter {
            client,
            endpoint,
            api_key: api_key.into(),
        }
    }

    /// Builds the update URL for `count`: `<endpoint>?api_key=<key>&field1=<count>`.
    ///
    /// The same count always produces the same URL.
    pub fn update_url(&self, count: u64) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("field1", &count.to_string());
        url
    }

    /// Reports `count` on a background task.
    ///
    /// Returns immediately; the handle only exists so callers can wait for
    /// outstanding reports at shutdown. The task itself never fails.
    pub fn report(&self, count: u64) -> JoinHandle<()> {
        let client = Arc::clone(&self.client);
        let url = self.update_url(count);
        tokio::spawn(async move {
            match client.get(url).send().await {
                Ok(response) if response.status().is_success() => {
                    log::debug!("Reported {} requests to telemetry", count);
                }
                Ok(response) => {
                    log::debug!(
                        "Telemetry update for {} requests answered HTTP {} (ignored)",
                        count,
                        response.status()
                    );
                }
                Err(e) => {
                    // The URL carries the API key, so it is kept out of the log line
                    log::debug!(
                        "Telemetry update for {} requests failed (ignored): {}",
                        count,
                        e.without_url()
                    );
                }
            }
        })
    }
}
