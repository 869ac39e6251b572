//! Site availability model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Site setting record
///
/// Singleton row backing the maintenance toggle. The live flag served to
/// the request layer is an in-memory handle loaded from this row at
/// startup; the row keeps the choice durable across restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSetting {
    /// Unique identifier
    pub id: i32,

    /// Whether the site accepts requests
    pub is_active: bool,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}
