use crate::core::error::QuoteError;
use crate::core::store::{RateStorage, StoredQuote};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

pub const RATES_PARTITION: &str = "exchange_rates";

/// Durable storage in a fjall partition. Each insert is a new row keyed by
/// pair, observation time and a write sequence, so repeated observations of
/// the same pair never overwrite each other.
pub struct FjallStorage {
    keyspace: Keyspace,
    rates: PartitionHandle,
    sequence: AtomicU64,
}

impl FjallStorage {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)?;

        let keyspace = fjall::Config::new(path.join("db")).open()?;
        let rates = keyspace.open_partition(RATES_PARTITION, PartitionCreateOptions::default())?;
        debug!(path = %path.display(), "Opened rate storage");

        Ok(Self {
            keyspace,
            rates,
            sequence: AtomicU64::new(0),
        })
    }

    fn row_key(&self, row: &StoredQuote) -> String {
        let written_at = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!(
            "{}/{:012}/{:020}-{:06}",
            row.pair,
            row.observed_at.timestamp(),
            written_at,
            seq
        )
    }

    /// Row with the greatest key: the newest observation of the last pair.
    pub fn latest(&self) -> Result<Option<StoredQuote>> {
        match self.rates.last_key_value()? {
            Some((_, value)) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    /// All stored rows in key order (pair, then observation time).
    #[cfg(test)]
    pub(crate) fn rows(&self) -> Result<Vec<StoredQuote>> {
        self.rates
            .iter()
            .map(|item| -> Result<StoredQuote> {
                let (_, value) = item?;
                Ok(serde_json::from_slice(&value)?)
            })
            .collect()
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.rates.len()?)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.rates.is_empty()?)
    }
}

#[async_trait]
impl RateStorage for FjallStorage {
    async fn insert(&self, row: StoredQuote) -> Result<(), QuoteError> {
        let key = self.row_key(&row);
        let value = serde_json::to_vec(&row)
            .map_err(|e| QuoteError::StorageWrite(e.to_string()))?;

        let rates = self.rates.clone();
        let insert_key = key.clone().into_bytes();
        tokio::task::spawn_blocking(move || rates.insert(insert_key, value))
            .await
            .map_err(|e| QuoteError::StorageWrite(e.to_string()))?
            .map_err(|e| QuoteError::StorageWrite(e.to_string()))?;

        debug!(key = %key, "Fjall INSERT");
        Ok(())
    }
}

impl Drop for FjallStorage {
    fn drop(&mut self) {
        if let Err(e) = self.keyspace.persist(fjall::PersistMode::SyncAll) {
            debug!("Failed to flush rate storage: {}", e);
        }
    }
}
