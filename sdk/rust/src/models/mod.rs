mod lead;
mod purchase;
mod wire;

pub use lead::*;
pub use purchase::*;
pub use wire::*;

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

use crate::local::Namespace;

/// A funnel record kept in both the remote store and the local mirror.
///
/// `id` and `timestamp` are assigned once at creation and never change.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Local store namespace holding this record kind
    const NAMESPACE: Namespace;

    fn id(&self) -> &str;

    fn timestamp(&self) -> DateTime<Utc>;
}
