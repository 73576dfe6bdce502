use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One allowlist row. `address` always holds canonical AddressSpec text;
/// `id`, `created_by` and `created_at` are immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AllowlistEntry {
    pub id: i64,
    pub address: String,
    pub description: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEntryRequest {
    pub address: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Full replace of `address` and `description`. Other fields stay put.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEntryRequest {
    pub address: String,
    #[serde(default)]
    pub description: Option<String>,
}
