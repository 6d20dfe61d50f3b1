use anyhow::Context;
use funnel_sdk::{FileStorage, HttpGateway, LocalStore, OfflineGateway, Tracker};

use crate::config::Config;

const APP_NAME: &str = "funnel";

/// Local fallback store for client commands: the configured file, or the
/// platform data directory. Without either, the tracker runs with no local store.
pub fn local_store(config: &Config) -> anyhow::Result<LocalStore> {
    if let Some(path) = &config.data_file {
        let storage = FileStorage::open(path)
            .with_context(|| format!("Failed to open local store {}", path.display()))?;
        return Ok(LocalStore::new(storage));
    }

    match FileStorage::new(APP_NAME) {
        Some(storage) => {
            tracing::debug!("Using local store at {}", storage.path().display());
            Ok(LocalStore::new(storage))
        }
        None => {
            tracing::warn!("No data directory available, local fallback disabled");
            Ok(LocalStore::unavailable())
        }
    }
}

pub fn build_tracker(config: &Config) -> anyhow::Result<Tracker> {
    let local = local_store(config)?;
    if config.offline {
        return Ok(Tracker::new(OfflineGateway, local));
    }

    let gateway = HttpGateway::new(&config.api_base)
        .with_context(|| format!("Invalid API endpoint: {}", config.api_base))?;
    Ok(Tracker::new(gateway, local))
}
