//! Aggregator: counts, breakdowns and summary totals
//!
//! Every total shown on the dashboard is derived here from the itemized
//! findings. Nothing is taken from pre-computed figures in the input.

use std::collections::HashMap;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::model::{ComplianceIssue, Document, Risk, ScanOutcome};
use crate::store::FindingStore;
use crate::taxonomy::{Classification, ComplianceState, IssueStatus, Priority, Severity};

/// Count per category value, covering every value of the category.
///
/// Entries follow `T::ALL` order; values absent from the data count 0 so
/// charts keep a fixed set of bars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakdown<T: Classification> {
    entries: Vec<(T, usize)>,
}

impl<T: Classification> Breakdown<T> {
    /// Tally `values` into a breakdown
    pub fn tally(values: impl IntoIterator<Item = T>) -> Self {
        let mut counts: HashMap<T, usize> = HashMap::new();
        for value in values {
            *counts.entry(value).or_insert(0) += 1;
        }
        let entries = T::ALL
            .iter()
            .map(|v| (*v, counts.get(v).copied().unwrap_or(0)))
            .collect();
        Self { entries }
    }

    pub fn get(&self, value: T) -> usize {
        self.entries
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    /// Sum of all entries
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (T, usize)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Classification> Serialize for Breakdown<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (value, count) in &self.entries {
            map.serialize_entry(value.code(), count)?;
        }
        map.end()
    }
}

/// Count of risks per severity level
pub fn severity_breakdown<'a>(risks: impl IntoIterator<Item = &'a Risk>) -> Breakdown<Severity> {
    Breakdown::tally(risks.into_iter().map(|r| r.severity))
}

/// Count of risks per priority
pub fn priority_breakdown<'a>(risks: impl IntoIterator<Item = &'a Risk>) -> Breakdown<Priority> {
    Breakdown::tally(risks.into_iter().map(|r| r.priority))
}

/// Every loaded risk is open; there is no resolved state.
pub fn total_open_risks<'a>(risks: impl IntoIterator<Item = &'a Risk>) -> usize {
    risks.into_iter().count()
}

/// Total issue count with the per-status split
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSummary {
    pub total: usize,
    pub by_status: Breakdown<IssueStatus>,
}

pub fn issue_summary<'a>(issues: impl IntoIterator<Item = &'a ComplianceIssue>) -> IssueSummary {
    let by_status = Breakdown::tally(issues.into_iter().map(|i| i.status));
    IssueSummary {
        total: by_status.total(),
        by_status,
    }
}

/// The rules-checked / passed / warnings / failures tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceSummary {
    pub rules_checked: usize,
    pub passed: usize,
    pub warnings: usize,
    pub failures: usize,
}

impl ComplianceSummary {
    /// Worst outcome across all checks; `Success` when nothing was checked
    pub fn overall(&self) -> IssueStatus {
        if self.failures > 0 {
            IssueStatus::Error
        } else if self.warnings > 0 {
            IssueStatus::Warning
        } else {
            IssueStatus::Success
        }
    }

    /// Share of checks that passed, 0.0 when nothing was checked
    pub fn pass_rate(&self) -> f64 {
        if self.rules_checked == 0 {
            0.0
        } else {
            self.passed as f64 / self.rules_checked as f64
        }
    }
}

impl From<&IssueSummary> for ComplianceSummary {
    fn from(summary: &IssueSummary) -> Self {
        Self {
            rules_checked: summary.total,
            passed: summary.by_status.get(IssueStatus::Success),
            warnings: summary.by_status.get(IssueStatus::Warning),
            failures: summary.by_status.get(IssueStatus::Error),
        }
    }
}

pub fn compliance_summary<'a>(issues: impl IntoIterator<Item = &'a ComplianceIssue>) -> ComplianceSummary {
    ComplianceSummary::from(&issue_summary(issues))
}

/// Compliance state of one document, from its status and issue count
pub fn document_compliance_state(doc: &Document) -> ComplianceState {
    match doc.scan() {
        ScanOutcome::Processing => ComplianceState::Processing,
        ScanOutcome::Failed => ComplianceState::Failed,
        ScanOutcome::Processed { issue_count: 0 } => ComplianceState::Compliant,
        ScanOutcome::Processed { .. } => ComplianceState::Flagged,
    }
}

pub fn document_state_breakdown<'a>(
    documents: impl IntoIterator<Item = &'a Document>,
) -> Breakdown<ComplianceState> {
    Breakdown::tally(documents.into_iter().map(document_compliance_state))
}

/// Distinct regulation codes in first-seen order, issues before risks
pub fn regulations<'a>(
    issues: impl IntoIterator<Item = &'a ComplianceIssue>,
    risks: impl IntoIterator<Item = &'a Risk>,
) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let codes = issues
        .into_iter()
        .map(|i| i.regulation.as_str())
        .chain(risks.into_iter().map(|r| r.regulation.as_str()));
    for code in codes {
        if !code.is_empty() && !seen.iter().any(|s| s == code) {
            seen.push(code.to_string());
        }
    }
    seen
}

/// Risks ordered most severe first. Ties keep their input order.
pub fn sort_risks_by_severity<'a>(risks: impl IntoIterator<Item = &'a Risk>) -> Vec<&'a Risk> {
    let mut sorted: Vec<&Risk> = risks.into_iter().collect();
    sorted.sort_by_key(|r| r.severity.rank());
    sorted
}

/// Documents ordered newest upload first. Ties keep their input order.
pub fn sort_documents_by_upload<'a>(documents: impl IntoIterator<Item = &'a Document>) -> Vec<&'a Document> {
    let mut sorted: Vec<&Document> = documents.into_iter().collect();
    sorted.sort_by(|a, b| b.upload_timestamp().cmp(&a.upload_timestamp()));
    sorted
}

/// Everything the overview tab shows, in one snapshot
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub documents_evaluated: usize,
    pub compliance_status: IssueStatus,
    pub compliance: ComplianceSummary,
    pub issues: IssueSummary,
    pub risks_by_severity: Breakdown<Severity>,
    pub risks_by_priority: Breakdown<Priority>,
    pub document_states: Breakdown<ComplianceState>,
    pub total_open_risks: usize,
    pub key_regulations: Vec<String>,
}

pub fn overview(store: &FindingStore) -> Overview {
    let issues = issue_summary(store.list_issues());
    let compliance = ComplianceSummary::from(&issues);
    Overview {
        documents_evaluated: store.document_count(),
        compliance_status: compliance.overall(),
        compliance,
        issues,
        risks_by_severity: severity_breakdown(store.list_risks()),
        risks_by_priority: priority_breakdown(store.list_risks()),
        document_states: document_state_breakdown(store.list_documents()),
        total_open_risks: total_open_risks(store.list_risks()),
        key_regulations: regulations(store.list_issues(), store.list_risks()),
    }
}
