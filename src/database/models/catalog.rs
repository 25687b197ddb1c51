use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row shape shared by the tenant-owned lookup tables (positions,
/// categories, branches, ...).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LookupRow {
    pub id: i64,
    pub academia_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
