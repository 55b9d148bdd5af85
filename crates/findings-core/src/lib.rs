//! Findings Core: aggregation and navigation for the compliance dashboard
//!
//! The crate holds an already-classified set of findings (documents,
//! compliance issues, risks) and derives everything the dashboard shows
//! from it.
//!
//! # Architecture
//!
//! ```text
//! Catalog (JSON) → FindingStore ─┬─→ Aggregator ──┐
//!                                └─→ FilterEngine ─┴─→ NavigationState → presentation
//! ```
//!
//! # Example
//!
//! ```
//! use findings_core::{Dashboard, Severity, Tab, severity_breakdown};
//!
//! let mut dash = Dashboard::demo().unwrap();
//!
//! let breakdown = severity_breakdown(dash.store().list_risks());
//! assert_eq!(breakdown.get(Severity::Critical), 2);
//!
//! dash.select_risk(2).unwrap();
//! dash.switch_tab(Tab::Documents);
//! assert!(dash.navigation().is_modal_open());
//! ```

pub mod aggregate;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod model;
pub mod navigation;
pub mod report;
pub mod store;
pub mod taxonomy;

pub use error::{FindingsError, Result};

pub use taxonomy::{
    color_token, display_label, rank, Classification, ColorToken, ComplianceState,
    DocumentStatus, IssueStatus, Priority, Severity, Tab,
};

pub use model::{
    ComplianceIssue, Document, DocumentId, Finding, IssueId, Risk, RiskId, ScanOutcome,
};

pub use store::FindingStore;

pub use aggregate::{
    compliance_summary, document_compliance_state, issue_summary, overview, priority_breakdown,
    severity_breakdown, sort_documents_by_upload, sort_risks_by_severity, total_open_risks,
    Breakdown, ComplianceSummary, IssueSummary, Overview,
};

pub use filter::{
    search, DocumentFilter, DocumentPredicate, Filter, IssueFilter, IssuePredicate, Predicate,
    RiskFilter, RiskPredicate,
};

pub use navigation::{NavigationSnapshot, NavigationState, RiskDetail};

pub use report::{Report, ReportDraft};

pub use ingest::{Catalog, CatalogRecord, DocumentRecord, IssueRecord, RiskRecord};

pub use dashboard::Dashboard;

/// Crate version
pub const FINDINGS_VERSION: &str = env!("CARGO_PKG_VERSION");
