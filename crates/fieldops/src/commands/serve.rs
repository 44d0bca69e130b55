//! HTTP resource server: a small read/write surface over the controller.
//!
//! Routes mirror the backend's site resources:
//!
//! - `GET    /api/health`     -- liveness plus the backend row count
//! - `GET    /api/sites`      -- current site snapshot
//! - `GET    /api/sites/:id`  -- one site with its equipment embedded
//! - `PATCH  /api/sites/:id`  -- partial site update
//! - `DELETE /api/sites/:id`  -- delete a site

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use fieldops_core::{
    Command as CoreCommand, CommandResult, Controller, CoreError, UpdateSiteRequest,
};

use crate::cli::{GlobalOpts, ServeArgs};
use crate::error::CliError;

type ApiResponse = (StatusCode, Json<Value>);

pub async fn handle(
    controller: &Controller,
    args: ServeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let app = router(controller.clone());
    let listener = tokio::net::TcpListener::bind(&args.bind).await?;

    let addr = listener.local_addr()?;
    info!(%addr, "resource server listening");
    if !global.quiet {
        eprintln!("Listening on http://{addr}");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn router(controller: Controller) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/sites", get(list_sites))
        .route(
            "/api/sites/:id",
            get(get_site).patch(update_site).delete(delete_site),
        )
        .with_state(controller)
}

// ── Handlers ────────────────────────────────────────────────────────

async fn health(State(ctrl): State<Controller>) -> ApiResponse {
    match ctrl.count_sites().await {
        Ok(rows) => (StatusCode::OK, Json(json!({ "ok": true, "rows": rows }))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "ok": false, "error": e.to_string() })),
        ),
    }
}

async fn list_sites(State(ctrl): State<Controller>) -> ApiResponse {
    match serde_json::to_value(ctrl.store().sites_snapshot()) {
        Ok(sites) => (StatusCode::OK, Json(sites)),
        Err(e) => internal_error(&e.to_string()),
    }
}

async fn get_site(State(ctrl): State<Controller>, Path(id): Path<String>) -> ApiResponse {
    let Ok(id) = id.parse::<Uuid>() else {
        return site_not_found();
    };
    match ctrl.site_with_equipment(&id).await {
        Ok(row) => (StatusCode::OK, Json(row)),
        Err(CoreError::NotFound { .. }) => site_not_found(),
        Err(e) => internal_error(&e.to_string()),
    }
}

async fn update_site(
    State(ctrl): State<Controller>,
    Path(id): Path<String>,
    body: String,
) -> ApiResponse {
    let Ok(id) = id.parse::<Uuid>() else {
        return bad_request("invalid site id");
    };
    let update: UpdateSiteRequest = match serde_json::from_str(&body) {
        Ok(update) => update,
        Err(e) => return bad_request(&e.to_string()),
    };

    match ctrl.execute(CoreCommand::UpdateSite { id, update }).await {
        Ok(CommandResult::Site(site)) => match serde_json::to_value(site) {
            Ok(value) => (StatusCode::OK, Json(value)),
            Err(e) => internal_error(&e.to_string()),
        },
        Ok(_) => internal_error("unexpected command result"),
        Err(CoreError::NotFound { .. }) => site_not_found(),
        Err(e) => bad_request(&e.to_string()),
    }
}

async fn delete_site(State(ctrl): State<Controller>, Path(id): Path<String>) -> ApiResponse {
    let Ok(id) = id.parse::<Uuid>() else {
        return bad_request("invalid site id");
    };
    match ctrl.execute(CoreCommand::DeleteSite { id }).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "ok": true }))),
        Err(CoreError::NotFound { .. }) => site_not_found(),
        Err(e) => bad_request(&e.to_string()),
    }
}

// ── Response helpers ────────────────────────────────────────────────

fn site_not_found() -> ApiResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Site not found" })),
    )
}

fn bad_request(message: &str) -> ApiResponse {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn internal_error(message: &str) -> ApiResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::time::Duration;

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;
    use url::Url;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use fieldops_core::{AuthCredentials, BackendConfig, TlsVerification};

    async fn connected_controller(server: &MockServer) -> Controller {
        for table in ["sites", "equipment", "interventions", "alerts", "profiles"] {
            Mock::given(method("GET"))
                .and(path(format!("/rest/v1/{table}")))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
                .mount(server)
                .await;
        }

        let controller = Controller::new(BackendConfig {
            url: Url::parse(&server.uri()).unwrap(),
            anon_key: "anon-key".to_string().into(),
            auth: AuthCredentials::Anonymous,
            tls: TlsVerification::SystemDefaults,
            timeout: Duration::from_secs(5),
            refresh_interval_secs: 0,
        });
        controller.connect().await.unwrap();
        controller
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_backend_row_count() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/rest/v1/sites"))
            .respond_with(ResponseTemplate::new(200).insert_header("Content-Range", "*/3"))
            .mount(&server)
            .await;
        let app = router(connected_controller(&server).await);

        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body, json!({ "ok": true, "rows": 3 }));
    }

    #[tokio::test]
    async fn get_site_embeds_equipment() {
        let server = MockServer::start().await;
        let site_id = Uuid::new_v4();
        Mock::given(method("GET"))
            .and(path("/rest/v1/sites"))
            .and(query_param("id", format!("eq.{site_id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": site_id,
                "name": "BTS-Alger-Centre",
                "code": "ALG-001",
                "type": "4G",
                "status": "active",
                "equipment": []
            })))
            .mount(&server)
            .await;
        let app = router(connected_controller(&server).await);

        let response = app
            .oneshot(
                Request::get(format!("/api/sites/{site_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["code"], "ALG-001");
        assert!(body["equipment"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_site_returns_404_error_body() {
        let server = MockServer::start().await;
        let site_id = Uuid::new_v4();
        Mock::given(method("GET"))
            .and(path("/rest/v1/sites"))
            .and(query_param("id", format!("eq.{site_id}")))
            .respond_with(ResponseTemplate::new(406).set_body_json(json!({
                "message": "JSON object requested, multiple (or no) rows returned"
            })))
            .mount(&server)
            .await;
        let app = router(connected_controller(&server).await);

        let response = app
            .oneshot(
                Request::get(format!("/api/sites/{site_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body, json!({ "error": "Site not found" }));
    }

    #[tokio::test]
    async fn delete_site_returns_ok_true() {
        let server = MockServer::start().await;
        let site_id = Uuid::new_v4();
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/sites"))
            .and(query_param("id", format!("eq.{site_id}")))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        let app = router(connected_controller(&server).await);

        let response = app
            .oneshot(
                Request::delete(format!("/api/sites/{site_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn patch_with_invalid_body_is_400() {
        let server = MockServer::start().await;
        let app = router(connected_controller(&server).await);

        let response = app
            .oneshot(
                Request::patch(format!("/api/sites/{}", Uuid::new_v4()))
                    .header("content-type", "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].is_string());
    }
}
