//! HttpApi against a local stub of the recommendation service.

use std::collections::HashMap;
use std::time::Duration;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use serde_json::{json, Value};

use cba_core::api::{ApiOperation, IndicatorApi, UploadFile};
use cba_core::models::{Level, Priority, ProjectProfile};
use cba_core::route::ResultsParams;
use cba_core::views::results;
use cba_indicators::client::HttpApi;

async fn chat_handler(Json(body): Json<Value>) -> Response {
    let message = body["message"].as_str().unwrap_or_default();
    if message == "fail" {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "agent down"})))
            .into_response();
    }
    let session = body["session_id"].as_str().unwrap_or("srv-1");
    let location = body["profile"]["location"].as_str().unwrap_or("none");
    Json(json!({
        "response": format!("echo: {} (location {})", message, location),
        "session_id": session,
        "has_recommendations": false
    }))
    .into_response()
}

async fn upload_handler(headers: HeaderMap, body: String) -> Response {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if content_type != "application/octet-stream" {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "expected raw body"})))
            .into_response();
    }
    let decoded = match base64::engine::general_purpose::STANDARD.decode(body.trim()) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => {
            return (StatusCode::BAD_REQUEST, Json(json!({"error": "not base64"})))
                .into_response()
        }
    };
    Json(json!({
        "found": {"location": decoded},
        "missing": ["Primary Commodity", "Budget Range"],
        "s3_uri": "s3://stub/uploads/plan.pdf"
    }))
    .into_response()
}

async fn recommendations_handler(Query(q): Query<HashMap<String, String>>) -> Response {
    match q.get("session_id").map(String::as_str) {
        Some("S") => Json(json!({
            "session_id": "S",
            "indicators": [
                {
                    "id": 89,
                    "name": "Soil Organic Carbon",
                    "component": "abiotic",
                    "class": "Soil Carbon",
                    "cost": "Low",
                    "methods": [{"id": 4, "name": "Walkley-Black Method"}]
                },
                {"id": 501, "name": "Pollinator Visits", "component": "Biotic"}
            ]
        }))
        .into_response(),
        Some("slow") => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({"indicators": [], "message": "worth the wait"})).into_response()
        }
        Some("nulls") => Json(json!({
            "indicators": [
                {
                    "id": 5,
                    "name": "Hedgerow Length",
                    "component": "Biotic",
                    "class": null,
                    "cost": null,
                    "ease": "N/A",
                    "priority": null,
                    "methods": [{"id": 1, "name": "Transect Walk", "accuracy": null}]
                },
                {"id": 6, "name": "Farm Income", "component": "Socioeconomic", "cost": "Low"}
            ]
        }))
        .into_response(),
        Some("a b&c") => Json(json!({"indicators": [], "message": "decoded ok"})).into_response(),
        Some("gone") => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Session not found"})),
        )
            .into_response(),
        Some("html") => (StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>").into_response(),
        _ => Json(json!({"indicators": [], "message": "No recommendations yet"})).into_response(),
    }
}

async fn spawn_stub() -> String {
    let app = Router::new()
        .route("/chat", post(chat_handler))
        .route("/upload", post(upload_handler))
        .route("/recommendations", get(recommendations_handler));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base: &str) -> HttpApi {
    HttpApi::new(base).unwrap()
}

#[tokio::test]
async fn chat_sends_json_and_decodes_reply() {
    let base = spawn_stub().await;
    let api = client(&base);
    let profile = ProjectProfile {
        location: Some("Kenya".into()),
        ..Default::default()
    };

    let reply = api.chat("hello", None, Some(&profile)).await.unwrap();
    assert_eq!(reply.session_id, "srv-1");
    assert_eq!(reply.response, "echo: hello (location Kenya)");
    assert_eq!(reply.has_recommendations, Some(false));

    let reply = api.chat("again", Some("abc"), None).await.unwrap();
    assert_eq!(reply.session_id, "abc");
}

#[tokio::test]
async fn chat_error_uses_error_field() {
    let base = spawn_stub().await;
    let err = client(&base).chat("fail", None, None).await.unwrap_err();
    assert_eq!(err.operation(), ApiOperation::Chat);
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.message(), "agent down");
}

#[tokio::test]
async fn upload_sends_base64_raw_body() {
    let base = spawn_stub().await;
    let file = UploadFile::new("plan.pdf", "application/pdf", b"Kenya".to_vec());
    let resp = client(&base).upload_file(&file).await.unwrap();
    assert_eq!(resp.found.location.as_deref(), Some("Kenya"));
    assert_eq!(resp.missing, vec!["Primary Commodity", "Budget Range"]);
    assert_eq!(resp.s3_uri.as_deref(), Some("s3://stub/uploads/plan.pdf"));
}

#[tokio::test]
async fn upload_is_binary_safe() {
    let base = spawn_stub().await;
    let bytes: Vec<u8> = vec![0x00, 0xff, 0x10, b'\n', b'K'];
    let file = UploadFile::new("sheet.xlsx", "application/vnd.ms-excel", bytes.clone());
    let resp = client(&base).upload_file(&file).await.unwrap();
    let expected = String::from_utf8_lossy(&bytes).into_owned();
    assert_eq!(resp.found.location.as_deref(), Some(expected.as_str()));
}

#[tokio::test]
async fn recommendations_fill_documented_defaults() {
    let base = spawn_stub().await;
    let resp = client(&base).get_recommendations("S").await.unwrap();
    assert_eq!(resp.indicators.len(), 2);

    let soil = &resp.indicators[0];
    assert_eq!(soil.cost, Level::Low);
    assert_eq!(soil.accuracy, Level::Medium);
    assert_eq!(soil.priority, Priority::Primary);
    assert_eq!(soil.methods[0].ease, Level::Medium);

    let bare = &resp.indicators[1];
    assert!(bare.methods.is_empty());
    assert_eq!(bare.ease, Level::Medium);
}

#[tokio::test]
async fn null_and_unknown_attributes_take_placeholders() {
    let base = spawn_stub().await;
    let resp = client(&base).get_recommendations("nulls").await.unwrap();
    assert_eq!(resp.indicators.len(), 2);

    let hedgerow = &resp.indicators[0];
    assert_eq!(hedgerow.class, "");
    assert_eq!(hedgerow.cost, Level::Medium);
    assert_eq!(hedgerow.ease, Level::Medium);
    assert_eq!(hedgerow.priority, Priority::Primary);
    assert_eq!(hedgerow.methods[0].accuracy, Level::Medium);
    assert_eq!(resp.indicators[1].cost, Level::Low);

    let page = results::load(
        &ResultsParams {
            session_id: Some("nulls".into()),
            ..Default::default()
        },
        &client(&base),
    )
    .await;
    assert!(!page.using_fallback());
    assert_eq!(page.error(), None);
    let ids: Vec<i64> = page.indicators().iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![5, 6]);
}

#[tokio::test]
async fn slow_replies_are_not_cut_off() {
    let base = spawn_stub().await;
    let resp = client(&base).get_recommendations("slow").await.unwrap();
    assert_eq!(resp.message.as_deref(), Some("worth the wait"));
}

#[tokio::test]
async fn session_id_is_query_encoded() {
    let base = spawn_stub().await;
    let resp = client(&base).get_recommendations("a b&c").await.unwrap();
    assert_eq!(resp.message.as_deref(), Some("decoded ok"));
}

#[tokio::test]
async fn recommendation_errors() {
    let base = spawn_stub().await;
    let api = client(&base);

    let err = api.get_recommendations("gone").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.message(), "Session not found");

    let err = api.get_recommendations("html").await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.message(), "Failed to fetch recommendations");
}

#[tokio::test]
async fn unreachable_service_is_an_api_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr))
        .get_recommendations("S")
        .await
        .unwrap_err();
    assert_eq!(err.operation(), ApiOperation::Recommendations);
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn results_page_over_http() {
    let base = spawn_stub().await;
    let api = client(&base);

    let live = results::load(
        &ResultsParams {
            session_id: Some("S".into()),
            ..Default::default()
        },
        &api,
    )
    .await;
    assert!(!live.using_fallback());
    assert_eq!(live.indicators().len(), 2);

    let failed = results::load(
        &ResultsParams {
            session_id: Some("gone".into()),
            ..Default::default()
        },
        &api,
    )
    .await;
    assert!(failed.using_fallback());
    assert_eq!(failed.error(), Some("Session not found"));
    assert_eq!(failed.indicators().len(), 4);
}
