use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};

use crate::auth::{principal, AuthError, TokenVerifier};
use crate::error::ApiError;

/// Bearer authentication middleware: extracts the token, verifies it and
/// normalizes the claims into an `AuthContext` injected into the request
/// extensions. Every protected route runs this before any guard.
pub async fn bearer_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)?;

    let verifier = TokenVerifier::from_config()?;
    let claims = verifier.verify(&token)?;
    let context = principal::resolve(&claims)?;

    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`.
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let auth_header = headers.get("authorization").ok_or(AuthError::MissingToken)?;

    let auth_str = auth_header.to_str().map_err(|_| AuthError::MissingToken)?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AuthError::MissingToken),
    }
}
