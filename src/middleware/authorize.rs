use axum::{extract::Request, middleware::Next, response::Response};

use crate::auth::{AuthContext, AuthorizationPolicy, TENANT_HEADER};
use crate::error::ApiError;

/// Shared executor for route policies. Runs strictly after
/// `bearer_auth_middleware`; the chain is fail-fast, so the first failing
/// check sends the response and the handler never executes.
///
/// When the policy is tenant-scoped the resolved `EffectiveTenant` is
/// inserted into the request extensions for the handler and the ownership
/// validator to read.
pub async fn enforce(
    policy: AuthorizationPolicy,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let context = request
        .extensions()
        .get::<AuthContext>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    policy.check_principal(&context)?;

    let header = request
        .headers()
        .get(TENANT_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    if let Some(tenant) = policy.resolve_tenant(&context, header.as_deref())? {
        request.extensions_mut().insert(tenant);
    }

    Ok(next.run(request).await)
}
