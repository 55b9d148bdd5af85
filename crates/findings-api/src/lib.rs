//! Findings API /v1: REST surface over the findings store
//!
//! One shared [`FindingStore`](findings_core::FindingStore) and any number of
//! navigation sessions, each with its own tab, risk modal and report draft.
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod state;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use config::ApiConfig;
pub use error::ApiError;
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handlers::health))
        .route("/v1/overview", get(handlers::overview))
        .route("/v1/documents", get(handlers::list_documents))
        .route("/v1/documents/{id}", delete(handlers::delete_document))
        .route("/v1/issues", get(handlers::list_issues))
        .route("/v1/risks", get(handlers::list_risks))
        .route("/v1/risks/{id}", get(handlers::get_risk))
        .route("/v1/catalog", post(handlers::load_catalog))
        .route("/v1/sessions", post(handlers::create_session))
        .route(
            "/v1/sessions/{sid}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/v1/sessions/{sid}/tab", post(handlers::switch_tab))
        .route(
            "/v1/sessions/{sid}/risk",
            post(handlers::select_risk).delete(handlers::close_modal),
        )
        .route("/v1/sessions/{sid}/hover", post(handlers::set_hovered))
        .route("/v1/sessions/{sid}/expand", post(handlers::toggle_expanded))
        .route("/v1/sessions/{sid}/search", post(handlers::search))
        .route(
            "/v1/sessions/{sid}/report",
            post(handlers::add_to_report).get(handlers::export_report),
        )
        .route("/metrics", get(handlers::metrics))
        .layer(axum::middleware::from_fn(middleware::request_logging))
        .layer(middleware::cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: ApiConfig) -> anyhow::Result<()> {
    let store = config.initial_store()?;
    let state = AppState::new(store)?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    tracing::info!("Findings API listening on {}", config.addr);
    axum::serve(listener, app).await?;
    Ok(())
}
