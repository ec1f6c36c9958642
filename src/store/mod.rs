pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use crate::core::store::RateStorage;
use anyhow::{Context, Result};
use disk::FjallStorage;
use std::sync::Arc;
use tracing::info;

/// Opens the process-wide storage handle. Called once at service start; the
/// handle is then injected wherever quotes are persisted.
pub fn open_storage(config: &AppConfig) -> Result<Arc<dyn RateStorage>> {
    let path = config.default_data_path()?;
    let storage = FjallStorage::open(&path)
        .with_context(|| format!("Failed to open rate storage at {}", path.display()))?;
    if storage.is_empty()? {
        info!(path = %path.display(), "Rate storage ready, no quotes stored yet");
    } else {
        let latest = storage.latest()?;
        info!(
            path = %path.display(),
            rows = storage.len()?,
            latest = ?latest,
            "Rate storage ready"
        );
    }
    Ok(Arc::new(storage))
}
