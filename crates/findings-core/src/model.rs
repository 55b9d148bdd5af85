//! Finding model: Document, ComplianceIssue, Risk
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{FindingsError, Result};
use crate::taxonomy::{Classification, DocumentStatus, IssueStatus, Priority, Severity};

pub type DocumentId = u64;
pub type IssueId = u64;
pub type RiskId = u64;

/// Anything the store keys by id.
pub trait Finding {
    /// Collection name, used in errors and logs
    const KIND: &'static str;

    fn id(&self) -> u64;
}

/// Where a document's compliance scan stands. Only a finished scan carries
/// an issue count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ScanOutcome {
    Processing,
    Failed,
    Processed {
        #[serde(rename = "issueCount")]
        issue_count: u32,
    },
}

impl ScanOutcome {
    pub fn status(&self) -> DocumentStatus {
        match self {
            ScanOutcome::Processing => DocumentStatus::Processing,
            ScanOutcome::Failed => DocumentStatus::Failed,
            ScanOutcome::Processed { .. } => DocumentStatus::Processed,
        }
    }

    pub fn issue_count(&self) -> Option<u32> {
        match self {
            ScanOutcome::Processed { issue_count } => Some(*issue_count),
            _ => None,
        }
    }
}

/// An uploaded document and its scan outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    id: DocumentId,
    name: String,
    upload_timestamp: DateTime<Utc>,
    size_bytes: u64,
    #[serde(flatten)]
    scan: ScanOutcome,
}

impl Document {
    pub fn new(
        id: DocumentId,
        name: impl Into<String>,
        upload_timestamp: DateTime<Utc>,
        size_bytes: u64,
        status: DocumentStatus,
        issue_count: Option<u32>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FindingsError::InvariantViolation(format!(
                "document {} has an empty name",
                id
            )));
        }
        let scan = match (status, issue_count) {
            (DocumentStatus::Processed, Some(issue_count)) => ScanOutcome::Processed { issue_count },
            (DocumentStatus::Processing, None) => ScanOutcome::Processing,
            (DocumentStatus::Failed, None) => ScanOutcome::Failed,
            (DocumentStatus::Processed, None) => {
                return Err(FindingsError::InvariantViolation(format!(
                    "document {} is processed but has no issue count",
                    id
                )));
            }
            (DocumentStatus::Processing | DocumentStatus::Failed, Some(_)) => {
                return Err(FindingsError::InvariantViolation(format!(
                    "document {} has an issue count while {}",
                    id,
                    status.code()
                )));
            }
        };

        Ok(Self {
            id,
            name,
            upload_timestamp,
            size_bytes,
            scan,
        })
    }

    /// A document whose scan completed with `issue_count` findings
    pub fn processed(
        id: DocumentId,
        name: impl Into<String>,
        upload_timestamp: DateTime<Utc>,
        size_bytes: u64,
        issue_count: u32,
    ) -> Result<Self> {
        Self::new(id, name, upload_timestamp, size_bytes, DocumentStatus::Processed, Some(issue_count))
    }

    /// A document still being scanned
    pub fn processing(
        id: DocumentId,
        name: impl Into<String>,
        upload_timestamp: DateTime<Utc>,
        size_bytes: u64,
    ) -> Result<Self> {
        Self::new(id, name, upload_timestamp, size_bytes, DocumentStatus::Processing, None)
    }

    /// A document whose scan failed
    pub fn failed(
        id: DocumentId,
        name: impl Into<String>,
        upload_timestamp: DateTime<Utc>,
        size_bytes: u64,
    ) -> Result<Self> {
        Self::new(id, name, upload_timestamp, size_bytes, DocumentStatus::Failed, None)
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn upload_timestamp(&self) -> DateTime<Utc> {
        self.upload_timestamp
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn scan(&self) -> ScanOutcome {
        self.scan
    }

    pub fn status(&self) -> DocumentStatus {
        self.scan.status()
    }

    /// Present exactly when the scan finished
    pub fn issue_count(&self) -> Option<u32> {
        self.scan.issue_count()
    }
}

impl Finding for Document {
    const KIND: &'static str = "document";

    fn id(&self) -> u64 {
        self.id
    }
}

/// Result of checking one regulatory requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceIssue {
    pub id: IssueId,
    pub title: String,
    pub status: IssueStatus,
    pub description: String,
    pub ai_suggestion: String,
    pub regulation: String,
    pub section: String,
}

impl ComplianceIssue {
    pub fn new(id: IssueId, title: impl Into<String>, status: IssueStatus) -> Self {
        Self {
            id,
            title: title.into(),
            status,
            description: String::new(),
            ai_suggestion: String::new(),
            regulation: String::new(),
            section: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.ai_suggestion = suggestion.into();
        self
    }

    /// Set the regulation code and the section it cites
    pub fn with_regulation(mut self, regulation: impl Into<String>, section: impl Into<String>) -> Self {
        self.regulation = regulation.into();
        self.section = section.into();
        self
    }

    /// "GDPR Article 13"
    pub fn citation(&self) -> String {
        cite(&self.regulation, &self.section)
    }
}

impl Finding for ComplianceIssue {
    const KIND: &'static str = "issue";

    fn id(&self) -> u64 {
        self.id
    }
}

/// An identified risk with its mitigation advice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub id: RiskId,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub priority: Priority,
    pub regulation: String,
    pub section: String,
    pub impact: String,
    pub mitigation_suggestion: String,
}

impl Risk {
    pub fn new(id: RiskId, title: impl Into<String>, severity: Severity, priority: Priority) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            severity,
            priority,
            regulation: String::new(),
            section: String::new(),
            impact: String::new(),
            mitigation_suggestion: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_regulation(mut self, regulation: impl Into<String>, section: impl Into<String>) -> Self {
        self.regulation = regulation.into();
        self.section = section.into();
        self
    }

    pub fn with_impact(mut self, impact: impl Into<String>) -> Self {
        self.impact = impact.into();
        self
    }

    pub fn with_mitigation(mut self, suggestion: impl Into<String>) -> Self {
        self.mitigation_suggestion = suggestion.into();
        self
    }

    pub fn citation(&self) -> String {
        cite(&self.regulation, &self.section)
    }
}

impl Finding for Risk {
    const KIND: &'static str = "risk";

    fn id(&self) -> u64 {
        self.id
    }
}

fn cite(regulation: &str, section: &str) -> String {
    match (regulation.is_empty(), section.is_empty()) {
        (false, false) => format!("{} {}", regulation, section),
        (false, true) => regulation.to_string(),
        (true, _) => section.to_string(),
    }
}
