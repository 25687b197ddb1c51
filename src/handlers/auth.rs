use axum::extract::Extension;
use serde_json::{json, Value};

use crate::auth::AuthContext;
use crate::middleware::response::{ApiResponse, ApiResult};

/// GET /api/auth/whoami - echo the resolved principal for the current
/// token. Any authenticated principal may call this; there is no tenant
/// scope to resolve.
pub async fn whoami(Extension(context): Extension<AuthContext>) -> ApiResult<Value> {
    let data = match &context {
        AuthContext::Staff(staff) => json!({
            "kind": "staff",
            "user_id": staff.user_id,
            "role_id": staff.role_id,
            "role": staff.role().map(|r| r.name()),
            "academia_id": staff.tenant_id,
            "display_name": staff.display_name,
        }),
        AuthContext::Guardian(guardian) => json!({
            "kind": "guardian",
            "rut": guardian.rut,
            "guardian_id": guardian.guardian_id,
        }),
    };

    Ok(ApiResponse::success(data))
}
