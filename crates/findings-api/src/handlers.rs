//! API Handlers
use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use findings_core::{
    aggregate, document_compliance_state, filter, Catalog, CatalogRecord, ComplianceIssue,
    ComplianceState, Document, DocumentId, FindingsError, IssueId, NavigationSnapshot, Overview,
    Report, Risk, RiskId, Tab,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::{AppState, Session};

type ApiResult<T> = Result<Json<T>, ApiError>;

/// A document row as the documents table renders it
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    #[serde(flatten)]
    pub document: Document,
    pub compliance_state: ComplianceState,
}

impl From<&Document> for DocumentView {
    fn from(doc: &Document) -> Self {
        Self {
            document: doc.clone(),
            compliance_state: document_compliance_state(doc),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub navigation: NavigationSnapshot,
    pub report_risk_ids: Vec<RiskId>,
    /// Risk open in the detail modal
    pub selected_risk: Option<Risk>,
}

impl SessionView {
    fn build(id: Uuid, session: &Session, store: &findings_core::FindingStore) -> Self {
        Self {
            id,
            navigation: session.navigation.snapshot(),
            report_risk_ids: session.report.risk_ids().to_vec(),
            selected_risk: session.navigation.selected_risk(store).cloned(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TabRequest {
    pub tab: String,
}

#[derive(Debug, Deserialize)]
pub struct RiskRequest {
    pub id: RiskId,
}

#[derive(Debug, Deserialize)]
pub struct HoverRequest {
    pub id: Option<IssueId>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportRequest {
    pub id: Option<RiskId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    pub documents: Vec<DocumentView>,
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let counts = state
        .read_store(|store| {
            json!({
                "documents": store.document_count(),
                "issues": store.issue_count(),
                "risks": store.risk_count(),
            })
        })
        .await;
    Json(json!({
        "status": "ok",
        "version": findings_core::FINDINGS_VERSION,
        "counts": counts,
    }))
}

pub async fn overview(State(state): State<AppState>) -> Json<Overview> {
    Json(state.read_store(aggregate::overview).await)
}

/// Newest upload first, narrowed by `?q=` when present
pub async fn list_documents(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Vec<DocumentView>> {
    let Query(params) = params?;
    let query = params.q.unwrap_or_default();
    let rows: Vec<DocumentView> = state
        .read_store(|store| {
            let matches = filter::search(store.list_documents(), &query);
            aggregate::sort_documents_by_upload(matches)
                .into_iter()
                .map(DocumentView::from)
                .collect()
        })
        .await;
    Ok(Json(rows))
}

pub async fn delete_document(
    State(state): State<AppState>,
    id: Result<Path<DocumentId>, PathRejection>,
) -> ApiResult<DocumentView> {
    let Path(id) = id?;
    let removed = state
        .write_store(|store| Ok(store.remove_document(id)?))
        .await?;
    Ok(Json(DocumentView::from(&removed)))
}

pub async fn list_issues(State(state): State<AppState>) -> Json<Vec<ComplianceIssue>> {
    let issues: Vec<ComplianceIssue> =
        state.read_store(|store| store.list_issues().cloned().collect()).await;
    Json(issues)
}

/// Most severe first
pub async fn list_risks(State(state): State<AppState>) -> Json<Vec<Risk>> {
    let risks: Vec<Risk> = state
        .read_store(|store| {
            aggregate::sort_risks_by_severity(store.list_risks())
                .into_iter()
                .cloned()
                .collect()
        })
        .await;
    Json(risks)
}

pub async fn get_risk(
    State(state): State<AppState>,
    id: Result<Path<RiskId>, PathRejection>,
) -> ApiResult<Risk> {
    let Path(id) = id?;
    let risk = state
        .read_store(|store| store.get_risk(id).cloned())
        .await?;
    Ok(Json(risk))
}

/// Replace the snapshot. A rejected catalog leaves the current one in place.
pub async fn load_catalog(
    State(state): State<AppState>,
    body: Result<Json<CatalogRecord>, JsonRejection>,
) -> ApiResult<Value> {
    let result = match body {
        Ok(Json(record)) => {
            state
                .write_store(|store| {
                    let catalog = Catalog::from_records(record)?;
                    catalog.load_into(store)?;
                    Ok(json!({
                        "documents": store.document_count(),
                        "issues": store.issue_count(),
                        "risks": store.risk_count(),
                    }))
                })
                .await
        }
        Err(rejection) => Err(ApiError::from(rejection)),
    };

    match result {
        Ok(counts) => {
            state.metrics().catalog_loads.inc();
            Ok(Json(json!({ "loaded": counts })))
        }
        Err(err) => {
            state.metrics().catalog_rejections.inc();
            Err(err)
        }
    }
}

pub async fn create_session(State(state): State<AppState>) -> impl IntoResponse {
    let (id, session) = state.create_session().await;
    let view = state
        .read_store(|store| SessionView::build(id, &session, store))
        .await;
    (StatusCode::CREATED, Json(view))
}

pub async fn get_session(
    State(state): State<AppState>,
    sid: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<SessionView> {
    let Path(sid) = sid?;
    let view = state
        .with_session(sid, |store, session| Ok(SessionView::build(sid, session, store)))
        .await?;
    Ok(Json(view))
}

pub async fn delete_session(
    State(state): State<AppState>,
    sid: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(sid) = sid?;
    state.delete_session(sid).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn switch_tab(
    State(state): State<AppState>,
    sid: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<TabRequest>, JsonRejection>,
) -> ApiResult<SessionView> {
    let Path(sid) = sid?;
    let Json(body) = body?;
    let tab: Tab = body.tab.parse()?;
    let view = state
        .with_session(sid, |store, session| {
            session.navigation.switch_tab(tab);
            Ok(SessionView::build(sid, session, store))
        })
        .await?;
    Ok(Json(view))
}

pub async fn select_risk(
    State(state): State<AppState>,
    sid: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<RiskRequest>, JsonRejection>,
) -> ApiResult<SessionView> {
    let Path(sid) = sid?;
    let Json(body) = body?;
    let view = state
        .with_session(sid, |store, session| {
            session.navigation.select_risk(store, body.id)?;
            Ok(SessionView::build(sid, session, store))
        })
        .await?;
    state.metrics().risk_selections.inc();
    Ok(Json(view))
}

pub async fn close_modal(
    State(state): State<AppState>,
    sid: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<SessionView> {
    let Path(sid) = sid?;
    let view = state
        .with_session(sid, |store, session| {
            session.navigation.close_modal();
            Ok(SessionView::build(sid, session, store))
        })
        .await?;
    Ok(Json(view))
}

pub async fn set_hovered(
    State(state): State<AppState>,
    sid: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<HoverRequest>, JsonRejection>,
) -> ApiResult<SessionView> {
    let Path(sid) = sid?;
    let Json(body) = body?;
    let view = state
        .with_session(sid, |store, session| {
            session.navigation.set_hovered(store, body.id)?;
            Ok(SessionView::build(sid, session, store))
        })
        .await?;
    Ok(Json(view))
}

/// Toggle the expanded risk card; returns whether it is now expanded
pub async fn toggle_expanded(
    State(state): State<AppState>,
    sid: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<RiskRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Path(sid) = sid?;
    let Json(body) = body?;
    let expanded = state
        .with_session(sid, |store, session| {
            Ok(session.navigation.toggle_expanded(store, body.id)?)
        })
        .await?;
    Ok(Json(json!({ "id": body.id, "expanded": expanded })))
}

pub async fn search(
    State(state): State<AppState>,
    sid: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResult<SearchResponse> {
    let Path(sid) = sid?;
    let Json(body) = body?;
    let response = state
        .with_session(sid, |store, session| {
            session.navigation.set_search_query(body.query.as_str());
            let matches = filter::search(store.list_documents(), session.navigation.search_query());
            Ok(SearchResponse {
                query: session.navigation.search_query().to_string(),
                documents: aggregate::sort_documents_by_upload(matches)
                    .into_iter()
                    .map(DocumentView::from)
                    .collect(),
            })
        })
        .await?;
    Ok(Json(response))
}

/// Add a risk to the session's report. Without a body id, the risk open in
/// the detail modal is used.
pub async fn add_to_report(
    State(state): State<AppState>,
    sid: Result<Path<Uuid>, PathRejection>,
    body: Bytes,
) -> ApiResult<Value> {
    let Path(sid) = sid?;
    let requested = if body.iter().all(u8::is_ascii_whitespace) {
        ReportRequest::default()
    } else {
        serde_json::from_slice::<ReportRequest>(&body).map_err(FindingsError::from)?
    }
    .id;
    let (id, added, len) = state
        .with_session(sid, |store, session| {
            let id = requested
                .or_else(|| session.navigation.selected_risk_id())
                .ok_or_else(|| {
                    FindingsError::InvariantViolation(
                        "no risk selected to add to the report".to_string(),
                    )
                })?;
            let added = session.report.add(store, id)?;
            Ok((id, added, session.report.len()))
        })
        .await?;
    Ok(Json(json!({ "id": id, "added": added, "count": len })))
}

pub async fn export_report(
    State(state): State<AppState>,
    sid: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Report> {
    let Path(sid) = sid?;
    let report = state
        .with_session(sid, |store, session| Ok(session.report.export(store)))
        .await?;
    Ok(Json(report))
}

pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = state.metrics().encode()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
