//! Route tests against the bundled demo catalog.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use findings_api::{create_app, AppState};
use findings_core::Catalog;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app() -> Router {
    let store = Catalog::demo().unwrap().into_store().unwrap();
    create_app(AppState::new(store).unwrap())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn new_session(app: &Router) -> String {
    let (status, body) = send(app, "POST", "/v1/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_counts() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["counts"]["risks"], 7);
    assert_eq!(body["counts"]["documents"], 7);
}

#[tokio::test]
async fn overview_is_derived_from_catalog() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/v1/overview", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["risksBySeverity"]["critical"], 2);
    assert_eq!(body["risksBySeverity"]["low"], 0);
    assert_eq!(body["compliance"]["rulesChecked"], 6);
    assert_eq!(body["totalOpenRisks"], 7);
}

#[tokio::test]
async fn documents_search_newest_first() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/v1/documents?q=POLICY", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<u64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 6]);
    assert_eq!(body[1]["complianceState"], "processing");

    let (_, all) = send(&app, "GET", "/v1/documents", None).await;
    assert_eq!(all.as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn risks_are_listed_most_severe_first() {
    let app = test_app();
    let (_, body) = send(&app, "GET", "/v1/risks", None).await;
    let risks = body.as_array().unwrap();
    assert_eq!(risks.len(), 7);
    assert_eq!(risks[0]["severity"], "critical");
    assert_eq!(risks[6]["severity"], "medium");

    let (status, err) = send(&app, "GET", "/v1/risks/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"]["kind"], "not_found");
    assert_eq!(err["error"]["code"], 404);
}

#[tokio::test]
async fn tab_switch_keeps_modal_open() {
    let app = test_app();
    let sid = new_session(&app).await;

    let (status, _) = send(&app, "POST", &format!("/v1/sessions/{sid}/risk"), Some(json!({ "id": 2 }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/v1/sessions/{sid}/tab"),
        Some(json!({ "tab": "documents" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["navigation"]["activeTab"], "documents");
    assert_eq!(body["navigation"]["modalOpen"], true);
    assert_eq!(body["navigation"]["selectedRiskId"], 2);
    assert_eq!(body["selectedRisk"]["id"], 2);

    let (_, closed) = send(&app, "DELETE", &format!("/v1/sessions/{sid}/risk"), None).await;
    assert_eq!(closed["navigation"]["modalOpen"], false);
    assert_eq!(closed["navigation"]["selectedRiskId"], Value::Null);
}

#[tokio::test]
async fn rejected_selection_leaves_session_untouched() {
    let app = test_app();
    let sid = new_session(&app).await;

    let (status, err) = send(&app, "POST", &format!("/v1/sessions/{sid}/risk"), Some(json!({ "id": 1234 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"]["kind"], "not_found");

    let (status, err) = send(&app, "POST", &format!("/v1/sessions/{sid}/tab"), Some(json!({ "tab": "reports" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"]["kind"], "invalid_enum");

    let (_, body) = send(&app, "GET", &format!("/v1/sessions/{sid}"), None).await;
    assert_eq!(body["navigation"]["activeTab"], "overview");
    assert_eq!(body["navigation"]["modalOpen"], false);
}

#[tokio::test]
async fn sessions_do_not_share_navigation() {
    let app = test_app();
    let a = new_session(&app).await;
    let b = new_session(&app).await;

    send(&app, "POST", &format!("/v1/sessions/{a}/risk"), Some(json!({ "id": 4 }))).await;
    let (_, body) = send(&app, "GET", &format!("/v1/sessions/{b}"), None).await;
    assert_eq!(body["navigation"]["selectedRiskId"], Value::Null);
}

#[tokio::test]
async fn unknown_session_is_404() {
    let app = test_app();
    let (status, err) = send(
        &app,
        "GET",
        "/v1/sessions/00000000-0000-0000-0000-000000000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"]["kind"], "session_not_found");
}

#[tokio::test]
async fn hover_and_search_are_recorded() {
    let app = test_app();
    let sid = new_session(&app).await;

    let (status, body) = send(&app, "POST", &format!("/v1/sessions/{sid}/hover"), Some(json!({ "id": 3 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["navigation"]["hoveredIssueId"], 3);

    let (_, body) = send(&app, "POST", &format!("/v1/sessions/{sid}/hover"), Some(json!({ "id": null }))).await;
    assert_eq!(body["navigation"]["hoveredIssueId"], Value::Null);

    let (status, body) = send(&app, "POST", &format!("/v1/sessions/{sid}/search"), Some(json!({ "query": "docx" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["documents"].as_array().unwrap().len(), 2);

    let (_, session) = send(&app, "GET", &format!("/v1/sessions/{sid}"), None).await;
    assert_eq!(session["navigation"]["documentSearchQuery"], "docx");
}

#[tokio::test]
async fn expand_toggles() {
    let app = test_app();
    let sid = new_session(&app).await;
    let uri = format!("/v1/sessions/{sid}/expand");

    let (_, body) = send(&app, "POST", &uri, Some(json!({ "id": 1 }))).await;
    assert_eq!(body["expanded"], true);
    let (_, body) = send(&app, "POST", &uri, Some(json!({ "id": 1 }))).await;
    assert_eq!(body["expanded"], false);
}

#[tokio::test]
async fn report_collects_selected_and_explicit_risks() {
    let app = test_app();
    let sid = new_session(&app).await;
    let report = format!("/v1/sessions/{sid}/report");

    let (status, err) = send(&app, "POST", &report, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"]["kind"], "invariant_violation");

    send(&app, "POST", &format!("/v1/sessions/{sid}/risk"), Some(json!({ "id": 3 }))).await;
    let (status, body) = send(&app, "POST", &report, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 3);
    assert_eq!(body["added"], true);

    let (_, body) = send(&app, "POST", &report, Some(json!({ "id": 1 }))).await;
    assert_eq!(body["count"], 2);

    let (status, exported) = send(&app, "GET", &report, None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<u64> = exported["risks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(exported["severityBreakdown"]["critical"], 1);
}

#[tokio::test]
async fn rejected_catalog_keeps_snapshot() {
    let app = test_app();
    let dupes = json!({
        "risks": [
            { "id": 1, "title": "a", "severity": "low", "priority": "low" },
            { "id": 1, "title": "b", "severity": "high", "priority": "low" }
        ]
    });
    let (status, err) = send(&app, "POST", "/v1/catalog", Some(dupes)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["error"]["kind"], "duplicate_id");

    let (_, health) = send(&app, "GET", "/v1/health", None).await;
    assert_eq!(health["counts"]["risks"], 7);

    let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let text = resp.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(text.to_vec()).unwrap();
    assert!(text.contains("findings_catalog_rejections_total 1"));
}

#[tokio::test]
async fn reload_clears_stale_selection() {
    let app = test_app();
    let sid = new_session(&app).await;
    send(&app, "POST", &format!("/v1/sessions/{sid}/risk"), Some(json!({ "id": 5 }))).await;

    let catalog = json!({
        "risks": [{ "id": 1, "title": "only", "severity": "low", "priority": "low" }]
    });
    let (status, body) = send(&app, "POST", "/v1/catalog", Some(catalog)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["loaded"]["risks"], 1);

    let (_, session) = send(&app, "GET", &format!("/v1/sessions/{sid}"), None).await;
    assert_eq!(session["navigation"]["modalOpen"], false);
    assert_eq!(session["selectedRisk"], Value::Null);
}

#[tokio::test]
async fn delete_document_then_missing() {
    let app = test_app();
    let (status, body) = send(&app, "DELETE", "/v1/documents/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);

    let (status, err) = send(&app, "DELETE", "/v1/documents/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"]["kind"], "not_found");

    let (_, overview) = send(&app, "GET", "/v1/overview", None).await;
    assert_eq!(overview["documentsEvaluated"], 6);
}

#[tokio::test]
async fn malformed_catalog_is_counted_and_enveloped() {
    let app = test_app();
    let (status, err) = send(&app, "POST", "/v1/catalog", Some(json!({ "risks": [{ "id": 1 }] }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"]["kind"], "parse");
    assert_eq!(err["error"]["code"], 422);

    let (_, health) = send(&app, "GET", "/v1/health", None).await;
    assert_eq!(health["counts"]["risks"], 7);

    let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let text = resp.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(text.to_vec()).unwrap();
    assert!(text.contains("findings_catalog_rejections_total 1"));
    assert!(text.contains("findings_catalog_loads_total 0"));
}

#[tokio::test]
async fn bad_body_and_path_use_error_envelope() {
    let app = test_app();
    let sid = new_session(&app).await;

    let (status, err) = send(&app, "POST", &format!("/v1/sessions/{sid}/risk"), Some(json!({ "id": "two" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"]["kind"], "parse");

    let (status, err) = send(&app, "DELETE", "/v1/documents/abc", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"]["kind"], "parse");

    let (status, err) = send(&app, "GET", "/v1/sessions/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"]["kind"], "parse");
}
