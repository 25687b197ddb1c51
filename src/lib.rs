use axum::{middleware as axum_middleware, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;

use auth::{AuthorizationPolicy, Role};
use middleware::auth::bearer_auth_middleware;
use middleware::authorize;

/// Role sets referenced by route policies. Policy values below are the
/// single place route-level authorization is expressed; handlers never
/// check roles themselves.
const STAFF_ANY: &[Role] = &[Role::OrgAdmin, Role::Staff, Role::SuperAdmin];
const ADMIN_ONLY: &[Role] = &[Role::OrgAdmin, Role::SuperAdmin];

pub fn app() -> Router {
    let protected = Router::new()
        .merge(auth_routes())
        .merge(players_routes())
        .merge(catalog_routes())
        .merge(portal_routes())
        // Runs before every route policy: verify token, resolve principal
        .layer(axum_middleware::from_fn(bearer_auth_middleware));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(protected)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router {
    use handlers::auth;

    // Any authenticated principal; no tenant scope
    Router::new().route("/api/auth/whoami", get(auth::whoami))
}

fn players_routes() -> Router {
    use handlers::players;

    let policy = AuthorizationPolicy::staff(STAFF_ANY).tenant_scoped();

    Router::new()
        .route("/api/players", get(players::list).post(players::create))
        .route(
            "/api/players/:id",
            get(players::get)
                .put(players::update)
                .delete(players::delete),
        )
        .route_layer(axum_middleware::from_fn(move |request, next| {
            authorize::enforce(policy, request, next)
        }))
}

fn catalog_routes() -> Router {
    use handlers::catalog;

    let read_policy = AuthorizationPolicy::staff(STAFF_ANY).tenant_scoped();
    let write_policy = AuthorizationPolicy::staff(ADMIN_ONLY).tenant_scoped();

    let reads = Router::new()
        .route("/api/catalog/positions", get(catalog::positions_list))
        .route("/api/catalog/categories", get(catalog::categories_list))
        .route_layer(axum_middleware::from_fn(move |request, next| {
            authorize::enforce(read_policy, request, next)
        }));

    let writes = Router::new()
        .route(
            "/api/catalog/positions",
            axum::routing::post(catalog::positions_create),
        )
        .route(
            "/api/catalog/categories",
            axum::routing::post(catalog::categories_create),
        )
        .route_layer(axum_middleware::from_fn(move |request, next| {
            authorize::enforce(write_policy, request, next)
        }));

    reads.merge(writes)
}

fn portal_routes() -> Router {
    use handlers::portal;

    let policy = AuthorizationPolicy::guardian();

    Router::new()
        .route("/api/portal/players", get(portal::players))
        .route("/api/portal/payments", get(portal::payments))
        .route_layer(axum_middleware::from_fn(move |request, next| {
            authorize::enforce(policy, request, next)
        }))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "ok": true,
        "data": {
            "name": "Academia API",
            "version": version,
            "description": "Academy management backend (Rust/Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/api/auth/whoami (protected)",
                "players": "/api/players[/:id] (staff, tenant-scoped)",
                "catalog": "/api/catalog/positions, /api/catalog/categories (staff, tenant-scoped)",
                "portal": "/api/portal/players, /api/portal/payments (guardian)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "ok": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "ok": false,
                "message": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
