use crate::core::error::QuoteError;
use crate::core::store::{RateStorage, StoredQuote};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory storage backend. Rows live as long as the process.
///
/// An optional artificial delay makes it usable as a slow backend when
/// exercising the store deadline.
#[derive(Default)]
pub struct MemoryStorage {
    rows: Mutex<Vec<StoredQuote>>,
    delay: Option<Duration>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        MemoryStorage {
            rows: Mutex::new(Vec::new()),
            delay: Some(delay),
        }
    }

    pub async fn rows(&self) -> Vec<StoredQuote> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl RateStorage for MemoryStorage {
    async fn insert(&self, row: StoredQuote) -> Result<(), QuoteError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        debug!(pair = %row.pair, "Memory INSERT");
        self.rows.lock().await.push(row);
        Ok(())
    }
}
