use axum::extract::Extension;
use axum::Json;
use serde::Deserialize;

use crate::auth::EffectiveTenant;
use crate::database::manager::DatabaseManager;
use crate::database::models::LookupRow;
use crate::database::ownership::OwnedTable;
use crate::middleware::response::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct LookupPayload {
    pub name: String,
}

/// GET /api/catalog/positions
pub async fn positions_list(
    Extension(tenant): Extension<EffectiveTenant>,
) -> ApiResult<Vec<LookupRow>> {
    list_lookup(OwnedTable::Positions, tenant).await
}

/// POST /api/catalog/positions
pub async fn positions_create(
    Extension(tenant): Extension<EffectiveTenant>,
    Json(payload): Json<LookupPayload>,
) -> ApiResult<LookupRow> {
    create_lookup(OwnedTable::Positions, tenant, payload).await
}

/// GET /api/catalog/categories
pub async fn categories_list(
    Extension(tenant): Extension<EffectiveTenant>,
) -> ApiResult<Vec<LookupRow>> {
    list_lookup(OwnedTable::Categories, tenant).await
}

/// POST /api/catalog/categories
pub async fn categories_create(
    Extension(tenant): Extension<EffectiveTenant>,
    Json(payload): Json<LookupPayload>,
) -> ApiResult<LookupRow> {
    create_lookup(OwnedTable::Categories, tenant, payload).await
}

/// Rows always come back filtered by the effective academy; the table name
/// is taken from the `OwnedTable` enum, never from the request.
async fn list_lookup(table: OwnedTable, tenant: EffectiveTenant) -> ApiResult<Vec<LookupRow>> {
    let pool = DatabaseManager::pool().await?;

    let sql = format!(
        "SELECT id, academia_id, name, created_at FROM {} WHERE academia_id = $1 ORDER BY name",
        table.table()
    );

    let rows = sqlx::query_as::<_, LookupRow>(&sql)
        .bind(tenant.0)
        .fetch_all(&pool)
        .await?;

    Ok(ApiResponse::success(rows))
}

/// New rows are created under the effective academy unconditionally; the
/// payload carries no academy field to override.
async fn create_lookup(
    table: OwnedTable,
    tenant: EffectiveTenant,
    payload: LookupPayload,
) -> ApiResult<LookupRow> {
    let pool = DatabaseManager::pool().await?;

    let sql = format!(
        "INSERT INTO {} (academia_id, name) VALUES ($1, $2) RETURNING id, academia_id, name, created_at",
        table.table()
    );

    let row = sqlx::query_as::<_, LookupRow>(&sql)
        .bind(tenant.0)
        .bind(&payload.name)
        .fetch_one(&pool)
        .await?;

    Ok(ApiResponse::created(row))
}
