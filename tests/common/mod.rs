#![allow(dead_code)]

use axum::body::Body;
use axum::extract::Extension;
use axum::http::{Request, StatusCode};
use axum::{middleware as axum_middleware, routing::get, Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use academia_api::auth::{
    AuthContext, AuthorizationPolicy, EffectiveTenant, Role, TokenVerifier, TENANT_HEADER,
};
use academia_api::middleware::auth::bearer_auth_middleware;
use academia_api::middleware::authorize;

pub const ADMIN_AND_SUPER: &[Role] = &[Role::OrgAdmin, Role::SuperAdmin];

/// Router running the real middleware chain with handlers that echo the
/// request-scoped extensions instead of touching the database. The staff
/// route allows roles {1, 3} and is tenant-scoped, matching the shape of
/// the production resource routers.
pub fn echo_app() -> Router {
    let admin_scoped = AuthorizationPolicy::staff(ADMIN_AND_SUPER).tenant_scoped();
    let guardian = AuthorizationPolicy::guardian();

    let staff = Router::new()
        .route("/echo/tenant", get(echo_tenant))
        .route_layer(axum_middleware::from_fn(move |request, next| {
            authorize::enforce(admin_scoped, request, next)
        }));

    let portal = Router::new()
        .route("/echo/guardian", get(echo_guardian))
        .route_layer(axum_middleware::from_fn(move |request, next| {
            authorize::enforce(guardian, request, next)
        }));

    staff
        .merge(portal)
        .layer(axum_middleware::from_fn(bearer_auth_middleware))
}

async fn echo_tenant(Extension(tenant): Extension<EffectiveTenant>) -> Json<Value> {
    Json(json!({ "ok": true, "data": { "academia_id": tenant.0 } }))
}

async fn echo_guardian(Extension(context): Extension<AuthContext>) -> Json<Value> {
    let rut = context.guardian().map(|g| g.rut.clone());
    Json(json!({ "ok": true, "data": { "rut": rut } }))
}

fn config_verifier() -> TokenVerifier {
    TokenVerifier::from_config().expect("verifier from config")
}

/// Sign claims with the same configuration the server verifies against.
pub fn mint_token(claims: Value) -> String {
    config_verifier()
        .sign(claims, chrono::Duration::hours(1))
        .expect("sign token")
}

/// Expired well past the default 60s validation leeway.
pub fn mint_expired_token(claims: Value) -> String {
    config_verifier()
        .sign(claims, chrono::Duration::hours(-2))
        .expect("sign token")
}

pub fn get_request(path: &str, token: Option<&str>, tenant_header: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path).method("GET");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    if let Some(tenant) = tenant_header {
        builder = builder.header(TENANT_HEADER, tenant);
    }
    builder.body(Body::empty()).expect("request")
}

pub fn post_request(
    path: &str,
    token: Option<&str>,
    tenant_header: Option<&str>,
    body: &Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(path)
        .method("POST")
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    if let Some(tenant) = tenant_header {
        builder = builder.header(TENANT_HEADER, tenant);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}
