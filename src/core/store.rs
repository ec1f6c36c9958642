//! Best-effort persistence of decoded quotes

use crate::core::error::QuoteError;
use crate::core::quote::{QuoteResponse, RateQuote};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(10);

/// A persisted row: numeric prices plus the time of observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredQuote {
    pub pair: String,
    pub bid: Decimal,
    pub ask: Decimal,
    pub observed_at: DateTime<Utc>,
}

impl From<&RateQuote> for StoredQuote {
    fn from(quote: &RateQuote) -> Self {
        StoredQuote {
            pair: quote.pair().to_string(),
            bid: quote.bid,
            ask: quote.ask,
            observed_at: quote.observed_at().unwrap_or_else(Utc::now),
        }
    }
}

/// Storage backend. Write-only from the pipeline's point of view; any
/// concurrency control is the backend's own business.
#[async_trait]
pub trait RateStorage: Send + Sync {
    async fn insert(&self, row: StoredQuote) -> Result<(), QuoteError>;
}

/// Runs after a provider response decoded successfully.
#[async_trait]
pub trait QuoteHook: Send + Sync {
    async fn on_decoded(&self, response: &QuoteResponse);
}

/// Wraps a storage handle with a hard per-write deadline.
#[derive(Clone)]
pub struct QuoteStore {
    storage: Arc<dyn RateStorage>,
    timeout: Duration,
}

impl QuoteStore {
    pub fn new(storage: Arc<dyn RateStorage>) -> Self {
        Self::with_timeout(storage, DEFAULT_STORE_TIMEOUT)
    }

    pub fn with_timeout(storage: Arc<dyn RateStorage>, timeout: Duration) -> Self {
        QuoteStore { storage, timeout }
    }

    pub async fn save(&self, quote: &RateQuote) -> Result<(), QuoteError> {
        let row = StoredQuote::from(quote);
        match tokio::time::timeout(self.timeout, self.storage.insert(row)).await {
            Ok(result) => result,
            Err(_) => Err(QuoteError::timeout("quote store write", self.timeout)),
        }
    }

    /// Saves every quote in iteration order, one attempt each. Failures are
    /// collected and returned; none of them stops the remaining writes.
    pub async fn save_all(&self, response: &QuoteResponse) -> Vec<QuoteError> {
        let mut failures = Vec::new();
        for quote in response.iter() {
            match self.save(quote).await {
                Ok(()) => debug!(pair = quote.pair(), "Saved quote"),
                Err(e) if e.is_timeout() => {
                    warn!(pair = quote.pair(), error = %e, "Quote write abandoned at deadline");
                    failures.push(e);
                }
                Err(e) => {
                    warn!(pair = quote.pair(), error = %e, "Failed to save quote");
                    failures.push(e);
                }
            }
        }
        failures
    }
}

#[async_trait]
impl QuoteHook for QuoteStore {
    async fn on_decoded(&self, response: &QuoteResponse) {
        if response.is_empty() {
            return;
        }
        let failures = self.save_all(response).await;
        if !failures.is_empty() {
            warn!(
                failed = failures.len(),
                total = response.len(),
                "Some quotes were not persisted"
            );
        }
    }
}
