//! Report drafting
//!
//! Risks picked with "Add to Report" accumulate in a [`ReportDraft`];
//! `export` turns the draft into a [`Report`] against the current snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::aggregate::{compliance_summary, severity_breakdown, sort_risks_by_severity, Breakdown, ComplianceSummary};
use crate::error::{FindingsError, Result};
use crate::model::{Risk, RiskId};
use crate::store::FindingStore;
use crate::taxonomy::Severity;

/// Risk ids queued for the next report, in the order they were added
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportDraft {
    risk_ids: Vec<RiskId>,
}

/// An exported report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub compliance: ComplianceSummary,
    pub severity_breakdown: Breakdown<Severity>,
    /// Most severe first
    pub risks: Vec<Risk>,
}

impl ReportDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn risk_ids(&self) -> &[RiskId] {
        &self.risk_ids
    }

    pub fn len(&self) -> usize {
        self.risk_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.risk_ids.is_empty()
    }

    pub fn contains(&self, id: RiskId) -> bool {
        self.risk_ids.contains(&id)
    }

    /// Queue a risk. Returns false if it was already queued.
    pub fn add(&mut self, store: &FindingStore, id: RiskId) -> Result<bool> {
        if !store.contains_risk(id) {
            return Err(FindingsError::NotFound { kind: "risk", id });
        }
        if self.contains(id) {
            return Ok(false);
        }
        debug!(risk = id, "added risk to report");
        self.risk_ids.push(id);
        Ok(true)
    }

    /// Returns false if the risk was not queued.
    pub fn remove(&mut self, id: RiskId) -> bool {
        let before = self.risk_ids.len();
        self.risk_ids.retain(|r| *r != id);
        before != self.risk_ids.len()
    }

    pub fn clear(&mut self) {
        self.risk_ids.clear();
    }

    /// Forget risks that are no longer loaded
    pub fn reconcile(&mut self, store: &FindingStore) -> bool {
        let before = self.risk_ids.len();
        self.risk_ids.retain(|id| store.contains_risk(*id));
        before != self.risk_ids.len()
    }

    /// Build the report. Queued ids missing from `store` are skipped.
    pub fn export(&self, store: &FindingStore) -> Report {
        self.export_at(store, Utc::now())
    }

    pub fn export_at(&self, store: &FindingStore, generated_at: DateTime<Utc>) -> Report {
        let queued: Vec<&Risk> = self
            .risk_ids
            .iter()
            .filter_map(|id| store.get_risk(*id).ok())
            .collect();

        Report {
            generated_at,
            compliance: compliance_summary(store.list_issues()),
            severity_breakdown: severity_breakdown(queued.iter().copied()),
            risks: sort_risks_by_severity(queued).into_iter().cloned().collect(),
        }
    }
}
