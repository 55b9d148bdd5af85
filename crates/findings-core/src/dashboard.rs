//! Single-operator dashboard session
//!
//! Bundles one store with its navigation state and report draft so the
//! presentation layer has a single object to drive.

use crate::aggregate::{self, Overview};
use crate::error::{FindingsError, Result};
use crate::filter::{self, RiskFilter};
use crate::ingest::Catalog;
use crate::model::{ComplianceIssue, Document, DocumentId, IssueId, Risk, RiskId};
use crate::navigation::NavigationState;
use crate::report::{Report, ReportDraft};
use crate::store::FindingStore;
use crate::taxonomy::Tab;

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    store: FindingStore,
    nav: NavigationState,
    report: ReportDraft,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session on an already loaded store
    pub fn with_store(store: FindingStore) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }

    /// Start a session on the bundled demo catalog
    pub fn demo() -> Result<Self> {
        Ok(Self::with_store(Catalog::demo()?.into_store()?))
    }

    pub fn store(&self) -> &FindingStore {
        &self.store
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.nav
    }

    pub fn report_draft(&self) -> &ReportDraft {
        &self.report
    }

    /// Replace the dataset. On failure nothing changes; on success
    /// navigation and the report draft drop references to vanished risks.
    pub fn load(
        &mut self,
        documents: Vec<Document>,
        issues: Vec<ComplianceIssue>,
        risks: Vec<Risk>,
    ) -> Result<()> {
        self.store.load(documents, issues, risks)?;
        self.nav.reconcile(&self.store);
        self.report.reconcile(&self.store);
        Ok(())
    }

    pub fn load_catalog(&mut self, catalog: Catalog) -> Result<()> {
        self.load(catalog.documents, catalog.issues, catalog.risks)
    }

    pub fn remove_document(&mut self, id: DocumentId) -> Result<Document> {
        self.store.remove_document(id)
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.nav.switch_tab(tab);
    }

    pub fn select_risk(&mut self, id: RiskId) -> Result<&Risk> {
        self.nav.select_risk(&self.store, id)?;
        self.store.get_risk(id)
    }

    pub fn close_modal(&mut self) {
        self.nav.close_modal();
    }

    pub fn set_hovered(&mut self, id: Option<IssueId>) -> Result<()> {
        self.nav.set_hovered(&self.store, id)
    }

    pub fn toggle_expanded(&mut self, id: RiskId) -> Result<bool> {
        self.nav.toggle_expanded(&self.store, id)
    }

    /// Record the search query and return the matching documents, newest first
    pub fn search(&mut self, query: &str) -> Vec<&Document> {
        self.nav.set_search_query(query);
        self.visible_documents()
    }

    /// Documents table: current query applied, newest upload first
    pub fn visible_documents(&self) -> Vec<&Document> {
        let matches = filter::search(self.store.list_documents(), self.nav.search_query());
        aggregate::sort_documents_by_upload(matches)
    }

    /// Risk table: filter applied, most severe first
    pub fn visible_risks(&self, risk_filter: &RiskFilter) -> Vec<&Risk> {
        aggregate::sort_risks_by_severity(risk_filter.apply(self.store.list_risks()))
    }

    pub fn selected_risk(&self) -> Option<&Risk> {
        self.nav.selected_risk(&self.store)
    }

    /// Add a risk to the report, defaulting to the one open in the modal
    pub fn add_to_report(&mut self, id: Option<RiskId>) -> Result<bool> {
        let id = id.or_else(|| self.nav.selected_risk_id()).ok_or_else(|| {
            FindingsError::InvariantViolation("no risk selected to add to the report".to_string())
        })?;
        self.report.add(&self.store, id)
    }

    pub fn export_report(&self) -> Report {
        self.report.export(&self.store)
    }

    pub fn overview(&self) -> Overview {
        aggregate::overview(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{Priority, Severity};

    #[test]
    fn test_demo_session() {
        let mut dash = Dashboard::demo().unwrap();
        assert_eq!(dash.navigation().active_tab(), Tab::Overview);

        let risk = dash.select_risk(2).unwrap();
        assert_eq!(risk.title, "Missing Authentication Controls");

        dash.switch_tab(Tab::Documents);
        assert_eq!(dash.selected_risk().map(|r| r.id), Some(2));
    }

    #[test]
    fn test_search_orders_newest_first_and_remembers_query() {
        let mut dash = Dashboard::demo().unwrap();
        let ids: Vec<u64> = dash.search("pdf").iter().map(|d| d.id()).collect();
        assert_eq!(ids, vec![1, 3, 4, 5, 7]);
        assert_eq!(dash.navigation().search_query(), "pdf");

        let all: Vec<u64> = dash.search("").iter().map(|d| d.id()).collect();
        assert_eq!(all, vec![2, 1, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_reload_closes_modal_on_vanished_risk() {
        let mut dash = Dashboard::demo().unwrap();
        dash.select_risk(5).unwrap();
        dash.add_to_report(None).unwrap();

        dash.load(vec![], vec![], vec![Risk::new(1, "only", Severity::Low, Priority::Low)])
            .unwrap();
        assert!(!dash.navigation().is_modal_open());
        assert!(dash.report_draft().is_empty());
    }

    #[test]
    fn test_add_to_report_without_selection_fails() {
        let mut dash = Dashboard::demo().unwrap();
        assert!(dash.add_to_report(None).is_err());
        assert!(dash.add_to_report(Some(1)).unwrap());
        assert_eq!(dash.export_report().risks.len(), 1);
    }

    #[test]
    fn test_visible_risks_sorted_and_filtered() {
        let dash = Dashboard::demo().unwrap();
        let all: Vec<u64> = dash.visible_risks(&RiskFilter::new()).iter().map(|r| r.id).collect();
        assert_eq!(all, vec![1, 2, 3, 4, 5, 6, 7]);

        let high_priority = RiskFilter::new().by_priority(Priority::High);
        let ids: Vec<u64> = dash.visible_risks(&high_priority).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 4]);
    }
}
