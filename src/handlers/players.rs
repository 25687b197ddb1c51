use axum::extract::{Extension, Path};
use axum::Json;
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::EffectiveTenant;
use crate::database::manager::DatabaseManager;
use crate::database::models::Player;
use crate::database::ownership::{self, OwnedTable};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct PlayerPayload {
    pub name: String,
    pub rut: Option<String>,
    pub guardian_rut: Option<String>,
    pub position_id: Option<i64>,
    pub category_id: Option<i64>,
}

/// GET /api/players - list players for the effective academy.
pub async fn list(Extension(tenant): Extension<EffectiveTenant>) -> ApiResult<Vec<Player>> {
    let pool = DatabaseManager::pool().await?;

    let players =
        sqlx::query_as::<_, Player>("SELECT * FROM players WHERE academia_id = $1 ORDER BY name")
            .bind(tenant.0)
            .fetch_all(&pool)
            .await?;

    Ok(ApiResponse::success(players))
}

/// GET /api/players/:id - rows under another academy read as missing.
pub async fn get(
    Extension(tenant): Extension<EffectiveTenant>,
    Path(id): Path<i64>,
) -> ApiResult<Player> {
    let pool = DatabaseManager::pool().await?;

    let player =
        sqlx::query_as::<_, Player>("SELECT * FROM players WHERE id = $1 AND academia_id = $2")
            .bind(id)
            .bind(tenant.0)
            .fetch_optional(&pool)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("players id {} not found", id)))?;

    Ok(ApiResponse::success(player))
}

/// POST /api/players - create under the effective academy. Lookup
/// references are confirmed to belong to the same academy before the
/// insert runs.
pub async fn create(
    Extension(tenant): Extension<EffectiveTenant>,
    Json(payload): Json<PlayerPayload>,
) -> ApiResult<Player> {
    let pool = DatabaseManager::pool().await?;

    validate_references(&pool, &payload, tenant).await?;

    let player = sqlx::query_as::<_, Player>(
        r#"
        INSERT INTO players (academia_id, name, rut, guardian_rut, position_id, category_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(tenant.0)
    .bind(&payload.name)
    .bind(&payload.rut)
    .bind(&payload.guardian_rut)
    .bind(payload.position_id)
    .bind(payload.category_id)
    .fetch_one(&pool)
    .await?;

    Ok(ApiResponse::created(player))
}

/// PUT /api/players/:id - full update, same reference validation as create.
pub async fn update(
    Extension(tenant): Extension<EffectiveTenant>,
    Path(id): Path<i64>,
    Json(payload): Json<PlayerPayload>,
) -> ApiResult<Player> {
    let pool = DatabaseManager::pool().await?;

    validate_references(&pool, &payload, tenant).await?;

    let player = sqlx::query_as::<_, Player>(
        r#"
        UPDATE players
        SET name = $1, rut = $2, guardian_rut = $3, position_id = $4, category_id = $5,
            updated_at = now()
        WHERE id = $6 AND academia_id = $7
        RETURNING *
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.rut)
    .bind(&payload.guardian_rut)
    .bind(payload.position_id)
    .bind(payload.category_id)
    .bind(id)
    .bind(tenant.0)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found(format!("players id {} not found", id)))?;

    Ok(ApiResponse::success(player))
}

/// DELETE /api/players/:id
pub async fn delete(
    Extension(tenant): Extension<EffectiveTenant>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    let pool = DatabaseManager::pool().await?;

    let result = sqlx::query("DELETE FROM players WHERE id = $1 AND academia_id = $2")
        .bind(id)
        .bind(tenant.0)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found(format!("players id {} not found", id)));
    }

    Ok(ApiResponse::<()>::no_content())
}

/// Every foreign key into a tenant-owned lookup table goes through the
/// ownership validator before the write is attempted.
async fn validate_references(
    pool: &PgPool,
    payload: &PlayerPayload,
    tenant: EffectiveTenant,
) -> Result<(), ApiError> {
    if let Some(position_id) = payload.position_id {
        ownership::assert_owned(pool, OwnedTable::Positions, position_id, tenant).await?;
    }
    if let Some(category_id) = payload.category_id {
        ownership::assert_owned(pool, OwnedTable::Categories, category_id, tenant).await?;
    }
    Ok(())
}
