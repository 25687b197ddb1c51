use axum::extract::Extension;

use crate::auth::AuthContext;
use crate::database::manager::DatabaseManager;
use crate::database::models::{Payment, Player};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};

/// GET /api/portal/players - players linked to the guardian's own rut.
/// Guardian routes never resolve an academy id; the only scope is the
/// caller's identity.
pub async fn players(Extension(context): Extension<AuthContext>) -> ApiResult<Vec<Player>> {
    let guardian = guardian_of(&context)?;
    let pool = DatabaseManager::pool().await?;

    let players =
        sqlx::query_as::<_, Player>("SELECT * FROM players WHERE guardian_rut = $1 ORDER BY name")
            .bind(&guardian.rut)
            .fetch_all(&pool)
            .await?;

    Ok(ApiResponse::success(players))
}

/// GET /api/portal/payments - payments for the guardian's own players.
pub async fn payments(Extension(context): Extension<AuthContext>) -> ApiResult<Vec<Payment>> {
    let guardian = guardian_of(&context)?;
    let pool = DatabaseManager::pool().await?;

    let payments = sqlx::query_as::<_, Payment>(
        r#"
        SELECT p.* FROM payments p
        JOIN players pl ON pl.id = p.player_id
        WHERE pl.guardian_rut = $1
        ORDER BY p.created_at DESC
        "#,
    )
    .bind(&guardian.rut)
    .fetch_all(&pool)
    .await?;

    Ok(ApiResponse::success(payments))
}

// The guardian policy runs before these handlers; this is the typed
// accessor, not a second authorization check.
fn guardian_of(context: &AuthContext) -> Result<&crate::auth::GuardianPrincipal, ApiError> {
    context
        .guardian()
        .ok_or_else(|| ApiError::forbidden("Guardian account required"))
}
