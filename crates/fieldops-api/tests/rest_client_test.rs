#![allow(clippy::unwrap_used)]
// Integration tests for `RestClient` using wiremock.

use serde_json::json;
use url::Url;
use uuid::Uuid;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fieldops_api::{Error, RestClient, SelectQuery};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, RestClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = RestClient::with_client(
        reqwest::Client::new(),
        base_url,
        "anon-key".to_string().into(),
    );
    (server, client)
}

#[derive(serde::Deserialize, Debug)]
struct SiteRow {
    id: Uuid,
    name: String,
    status: String,
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success_stores_token() {
    let (server, client) = setup().await;
    let user_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", "anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "jwt-token",
            "token_type": "bearer",
            "expires_in": 3600,
            "user": { "id": user_id, "email": "tech@example.com" }
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "test-password".to_string().into();
    let session = client.login_password("tech@example.com", &secret).await.unwrap();

    assert_eq!(session.user_id, user_id);
    assert_eq!(session.email, "tech@example.com");
    assert_eq!(session.expires_in, 3600);
    assert!(client.has_session());
}

#[tokio::test]
async fn test_login_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong-password".to_string().into();
    let result = client.login_password("tech@example.com", &secret).await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert!(
                message.contains("Invalid login credentials"),
                "expected credential message, got: {message}"
            );
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
    assert!(!client.has_session());
}

#[tokio::test]
async fn test_bearer_uses_access_token_after_login() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "jwt-token",
            "expires_in": 3600,
            "user": { "id": Uuid::new_v4(), "email": "tech@example.com" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/sites"))
        .and(header("apikey", "anon-key"))
        .and(header("Authorization", "Bearer jwt-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "test-password".to_string().into();
    client.login_password("tech@example.com", &secret).await.unwrap();

    let rows: Vec<SiteRow> = client.select("sites", &SelectQuery::new()).await.unwrap();
    assert!(rows.is_empty());
}

// ── Table operation tests ───────────────────────────────────────────

#[tokio::test]
async fn test_select_with_filters() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/sites"))
        .and(query_param("select", "*"))
        .and(query_param("status", "eq.active"))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": id,
            "name": "BTS-Alger-Centre",
            "status": "active"
        }])))
        .mount(&server)
        .await;

    let query = SelectQuery::new().eq("status", "active").order_desc("created_at");
    let rows: Vec<SiteRow> = client.select("sites", &query).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, id);
    assert_eq!(rows[0].name, "BTS-Alger-Centre");
    assert_eq!(rows[0].status, "active");
}

#[tokio::test]
async fn test_select_single_by_id() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/sites"))
        .and(query_param("id", format!("eq.{id}")))
        .and(header("Accept", "application/vnd.pgrst.object+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "name": "BTS-Oran-Est",
            "status": "maintenance"
        })))
        .mount(&server)
        .await;

    let row: SiteRow = client.select_single("sites", &id, "*").await.unwrap();
    assert_eq!(row.status, "maintenance");
}

#[tokio::test]
async fn test_insert_returns_representation() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/sites"))
        .and(header("Prefer", "return=representation"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": id,
            "name": "BTS-Constantine",
            "status": "active"
        })))
        .mount(&server)
        .await;

    let row: SiteRow = client
        .insert("sites", &json!({ "name": "BTS-Constantine", "status": "active" }))
        .await
        .unwrap();
    assert_eq!(row.id, id);
}

#[tokio::test]
async fn test_update_by_id() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/sites"))
        .and(query_param("id", format!("eq.{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "name": "BTS-Constantine",
            "status": "fault"
        })))
        .mount(&server)
        .await;

    let row: SiteRow = client
        .update_by_id("sites", &id, &json!({ "status": "fault" }))
        .await
        .unwrap();
    assert_eq!(row.status, "fault");
}

#[tokio::test]
async fn test_delete_by_id() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/sites"))
        .and(query_param("id", format!("eq.{id}")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.delete_by_id("sites", &id).await.unwrap();
}

#[tokio::test]
async fn test_count_from_content_range() {
    let (server, client) = setup().await;

    Mock::given(method("HEAD"))
        .and(path("/rest/v1/sites"))
        .and(header("Prefer", "count=exact"))
        .respond_with(ResponseTemplate::new(200).insert_header("Content-Range", "*/17"))
        .mount(&server)
        .await;

    let total = client.count("sites").await.unwrap();
    assert_eq!(total, 17);
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_maps_to_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result: Result<Vec<SiteRow>, _> = client.select("sites", &SelectQuery::new()).await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert!(
                message.contains("session expired"),
                "expected session message, got: {message}"
            );
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_envelope_maps_to_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/sites"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint \"sites_code_key\"",
            "hint": null,
            "details": null
        })))
        .mount(&server)
        .await;

    let result: Result<SiteRow, _> = client.insert("sites", &json!({ "code": "ALG-001" })).await;

    match result {
        Err(Error::Api { status, ref code, ref message }) => {
            assert_eq!(status, 409);
            assert_eq!(code.as_deref(), Some("23505"));
            assert!(message.contains("duplicate key"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}
