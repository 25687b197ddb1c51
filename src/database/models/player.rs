use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Player {
    pub id: i64,
    pub academia_id: i64,
    pub name: String,
    pub rut: Option<String>,
    /// Links the player to a guardian account (8-digit rut) for the portal.
    pub guardian_rut: Option<String>,
    pub position_id: Option<i64>,
    pub category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
