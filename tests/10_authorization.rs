mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

// The echo app runs the production middleware chain (bearer auth, then the
// route policy) in front of handlers that just echo the request-scoped
// extensions, so these tests cover the full authorization path without a
// database.

#[tokio::test]
async fn missing_token_is_unauthorized() -> Result<()> {
    let (status, body) =
        common::send(common::echo_app(), common::get_request("/echo/tenant", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["ok"], false);
    assert!(body["message"].is_string());
    Ok(())
}

#[tokio::test]
async fn garbled_token_is_unauthorized() -> Result<()> {
    let (status, _) = common::send(
        common::echo_app(),
        common::get_request("/echo/tenant", Some("not.a.token"), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn expired_token_is_unauthorized() -> Result<()> {
    let token = common::mint_expired_token(json!({ "rol_id": 1, "academia_id": 5 }));
    let (status, _) = common::send(
        common::echo_app(),
        common::get_request("/echo/tenant", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn bound_role_scopes_to_its_token_academy() -> Result<()> {
    // Scenario: role 1, academy 5, route allows {1, 3}, no override header
    let token = common::mint_token(json!({ "rol_id": 1, "academia_id": 5, "nombre": "Ana" }));
    let (status, body) = common::send(
        common::echo_app(),
        common::get_request("/echo/tenant", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["academia_id"], 5);
    Ok(())
}

#[tokio::test]
async fn selection_header_has_no_effect_on_bound_roles() -> Result<()> {
    let token = common::mint_token(json!({ "rol_id": 1, "academia_id": 5 }));
    let (status, body) = common::send(
        common::echo_app(),
        common::get_request("/echo/tenant", Some(&token), Some("9")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["academia_id"], 5);
    Ok(())
}

#[tokio::test]
async fn bound_role_without_academy_claim_is_forbidden() -> Result<()> {
    let token = common::mint_token(json!({ "rol_id": 1 }));
    let (status, body) = common::send(
        common::echo_app(),
        common::get_request("/echo/tenant", Some(&token), Some("9")),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["ok"], false);
    Ok(())
}

#[tokio::test]
async fn super_admin_without_selection_header_is_forbidden() -> Result<()> {
    // Scenario: role 3 (cross-academy), no override header
    let token = common::mint_token(json!({ "rol_id": 3, "nombre": "Root" }));
    let (status, body) = common::send(
        common::echo_app(),
        common::get_request("/echo/tenant", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["message"]
        .as_str()
        .unwrap_or_default()
        .contains("x-academia-id"));
    Ok(())
}

#[tokio::test]
async fn super_admin_selects_an_academy_per_request() -> Result<()> {
    let token = common::mint_token(json!({ "rol_id": 3 }));
    let (status, body) = common::send(
        common::echo_app(),
        common::get_request("/echo/tenant", Some(&token), Some("7")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["academia_id"], 7);
    Ok(())
}

#[tokio::test]
async fn super_admin_selection_is_never_reused_across_requests() -> Result<()> {
    let token = common::mint_token(json!({ "rol_id": 3 }));

    let (status, body) = common::send(
        common::echo_app(),
        common::get_request("/echo/tenant", Some(&token), Some("7")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["academia_id"], 7);

    // Same principal, new request with a different selection
    let (status, body) = common::send(
        common::echo_app(),
        common::get_request("/echo/tenant", Some(&token), Some("8")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["academia_id"], 8);

    // And a third without any selection fails outright
    let (status, _) = common::send(
        common::echo_app(),
        common::get_request("/echo/tenant", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn invalid_selection_header_values_are_forbidden() -> Result<()> {
    let token = common::mint_token(json!({ "rol_id": 3 }));

    for header in ["abc", "0", "-3", ""] {
        let (status, _) = common::send(
            common::echo_app(),
            common::get_request("/echo/tenant", Some(&token), Some(header)),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "header: {header:?}");
    }
    Ok(())
}

#[tokio::test]
async fn role_outside_allowed_set_is_forbidden() -> Result<()> {
    // Route allows {1, 3}; role 2 must be denied
    let token = common::mint_token(json!({ "rol_id": 2, "academia_id": 5 }));
    let (status, _) = common::send(
        common::echo_app(),
        common::get_request("/echo/tenant", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn missing_role_claim_is_forbidden_not_unauthorized() -> Result<()> {
    // Resolution tolerates the absent role; the guard rejects it
    let token = common::mint_token(json!({ "academia_id": 5 }));
    let (status, _) = common::send(
        common::echo_app(),
        common::get_request("/echo/tenant", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn guardian_on_staff_route_is_forbidden() -> Result<()> {
    // Scenario: valid guardian token hitting a staff-only route
    let token = common::mint_token(json!({ "type": "apoderado", "rut": "12345678" }));
    let (status, _) = common::send(
        common::echo_app(),
        common::get_request("/echo/tenant", Some(&token), Some("5")),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn staff_on_guardian_route_is_forbidden() -> Result<()> {
    let token = common::mint_token(json!({ "rol_id": 1, "academia_id": 5 }));
    let (status, _) = common::send(
        common::echo_app(),
        common::get_request("/echo/guardian", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn guardian_reaches_guardian_route() -> Result<()> {
    let token = common::mint_token(json!({ "type": "apoderado", "rut": "12345678" }));
    let (status, body) = common::send(
        common::echo_app(),
        common::get_request("/echo/guardian", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rut"], "12345678");
    Ok(())
}

#[tokio::test]
async fn malformed_guardian_rut_is_unauthorized() -> Result<()> {
    let token = common::mint_token(json!({ "type": "apoderado", "rut": "1234567" }));
    let (status, _) = common::send(
        common::echo_app(),
        common::get_request("/echo/guardian", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn nested_and_aliased_claims_resolve_through_the_chain() -> Result<()> {
    let token = common::mint_token(json!({
        "user": { "roleId": "1", "academyId": 5, "name": "Nested" }
    }));
    let (status, body) = common::send(
        common::echo_app(),
        common::get_request("/echo/tenant", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["academia_id"], 5);
    Ok(())
}

// The production router enforces the same chain; these two cover wiring
// without needing a database (both fail before any handler runs).

#[tokio::test]
async fn production_router_rejects_guardian_on_players() -> Result<()> {
    let token = common::mint_token(json!({ "type": "apoderado", "rut": "12345678" }));
    let (status, _) = common::send(
        academia_api::app(),
        common::get_request("/api/players", Some(&token), Some("5")),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn production_router_whoami_echoes_principal() -> Result<()> {
    let token = common::mint_token(json!({ "rol_id": 2, "academia_id": 4, "nombre": "Berta" }));
    let (status, body) = common::send(
        academia_api::app(),
        common::get_request("/api/auth/whoami", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["kind"], "staff");
    assert_eq!(body["data"]["role"], "staff");
    assert_eq!(body["data"]["academia_id"], 4);
    assert_eq!(body["data"]["display_name"], "Berta");
    Ok(())
}
