//! Funnel SDK: record purchases and leads against the funnel API, falling back
//! to a client-local store whenever the API cannot be reached.
//!
//! ```no_run
//! use funnel_sdk::{HttpGateway, LocalStore, MemoryStorage, Tracker};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = HttpGateway::new("http://localhost:3000/api/purchases")?;
//! let tracker = Tracker::new(gateway, LocalStore::new(MemoryStorage::new()));
//! let snapshot = tracker.analytics().await;
//! println!("conversion: {}%", snapshot.conversion_rate);
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod error;
pub mod export;
pub mod gateway;
pub mod ids;
pub mod local;
pub mod models;
pub mod storage;
pub mod tracker;

pub use analytics::AnalyticsSnapshot;
pub use error::{GatewayError, GatewayErrorCode, GatewayResult, StoreError, StoreResult};
pub use gateway::{Gateway, HttpGateway, OfflineGateway};
pub use local::{LocalStore, Namespace};
pub use models::*;
pub use storage::{FileStorage, MemoryStorage, StorageAdapter};
pub use tracker::Tracker;
