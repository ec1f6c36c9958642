use crate::core::error::QuoteError;
use crate::core::quote::QuoteResponse;
use crate::core::store::QuoteHook;
use anyhow::Result;
use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_millis(200);

/// Fetches a quote response from any URL serving the provider's JSON shape.
///
/// The same fetcher serves both roles: pointed at the external provider
/// (with the store attached as a hook) inside the service, and pointed at
/// the service itself by the reporter.
pub struct QuoteFetcher {
    client: reqwest::Client,
    timeout: Duration,
    hook: Option<Arc<dyn QuoteHook>>,
}

impl QuoteFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("cotacao/0.1")
            .build()?;
        Ok(QuoteFetcher {
            client,
            timeout: DEFAULT_FETCH_TIMEOUT,
            hook: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs `hook` on every successfully decoded response before it is
    /// handed back to the caller.
    pub fn with_hook(mut self, hook: Arc<dyn QuoteHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// One attempt, no retry. The deadline covers connect, headers and the
    /// full body; on expiry the request is dropped along with its connection.
    #[instrument(name = "QuoteFetch", skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<QuoteResponse, QuoteError> {
        let body = tokio::time::timeout(self.timeout, self.request(url))
            .await
            .map_err(|_| QuoteError::timeout("quote fetch", self.timeout))??;

        let response = QuoteResponse::decode(&body)?;
        debug!(pairs = response.len(), "Decoded quote response");

        if let Some(hook) = &self.hook {
            hook.on_decoded(&response).await;
        }
        Ok(response)
    }

    async fn request(&self, url: &str) -> Result<Vec<u8>, QuoteError> {
        debug!("Requesting quotes from {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        debug!(%status, "Received quote response");
        if !status.is_success() {
            return Err(QuoteError::Transport(format!(
                "provider responded with HTTP {status}"
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok(body.to_vec())
    }

    fn transport_error(&self, err: reqwest::Error) -> QuoteError {
        if err.is_timeout() {
            return QuoteError::timeout("quote fetch", self.timeout);
        }
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        QuoteError::Transport(message)
    }
}
