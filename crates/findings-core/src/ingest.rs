//! Ingestion boundary: JSON records to typed findings
//!
//! External producers hand over complete snapshots as JSON. Enum fields
//! arrive as strings and are checked here, so an unknown value fails with
//! `InvalidEnum` instead of being defaulted.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FindingsError, Result};
use crate::model::{ComplianceIssue, Document, Risk};
use crate::store::FindingStore;

static DEMO_CATALOG: &str = include_str!("../fixtures/catalog.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: u64,
    pub name: String,
    pub upload_timestamp: String,
    pub size_bytes: u64,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecord {
    pub id: u64,
    pub title: String,
    pub status: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ai_suggestion: String,
    #[serde(default)]
    pub regulation: String,
    #[serde(default)]
    pub section: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRecord {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub severity: String,
    pub priority: String,
    #[serde(default)]
    pub regulation: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub impact: String,
    #[serde(default)]
    pub mitigation_suggestion: String,
}

/// A full snapshot as delivered by the ingestion collaborator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
    #[serde(default)]
    pub issues: Vec<IssueRecord>,
    #[serde(default)]
    pub risks: Vec<RiskRecord>,
}

impl TryFrom<DocumentRecord> for Document {
    type Error = FindingsError;

    fn try_from(record: DocumentRecord) -> Result<Self> {
        let uploaded = parse_timestamp(&record.upload_timestamp).ok_or_else(|| {
            FindingsError::InvariantViolation(format!(
                "document {} has an unreadable upload timestamp {:?}",
                record.id, record.upload_timestamp
            ))
        })?;
        Document::new(
            record.id,
            record.name,
            uploaded,
            record.size_bytes,
            record.status.parse()?,
            record.issue_count,
        )
    }
}

impl TryFrom<IssueRecord> for ComplianceIssue {
    type Error = FindingsError;

    fn try_from(record: IssueRecord) -> Result<Self> {
        Ok(ComplianceIssue::new(record.id, record.title, record.status.parse()?)
            .with_description(record.description)
            .with_suggestion(record.ai_suggestion)
            .with_regulation(record.regulation, record.section))
    }
}

impl TryFrom<RiskRecord> for Risk {
    type Error = FindingsError;

    fn try_from(record: RiskRecord) -> Result<Self> {
        Ok(Risk::new(
            record.id,
            record.title,
            record.severity.parse()?,
            record.priority.parse()?,
        )
        .with_description(record.description)
        .with_regulation(record.regulation, record.section)
        .with_impact(record.impact)
        .with_mitigation(record.mitigation_suggestion))
    }
}

/// RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS` taken as UTC
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// A validated, typed snapshot ready to load into a [`FindingStore`]
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub documents: Vec<Document>,
    pub issues: Vec<ComplianceIssue>,
    pub risks: Vec<Risk>,
}

impl Catalog {
    /// Convert records into typed findings. Stops at the first bad record.
    pub fn from_records(record: CatalogRecord) -> Result<Self> {
        Ok(Self {
            documents: convert_all(record.documents)?,
            issues: convert_all(record.issues)?,
            risks: convert_all(record.risks)?,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let record: CatalogRecord = serde_json::from_str(json)?;
        Self::from_records(record)
    }

    /// The bundled demo catalog
    pub fn demo() -> Result<Self> {
        Self::from_json(DEMO_CATALOG)
    }

    /// Replace `store`'s contents with this catalog
    pub fn load_into(self, store: &mut FindingStore) -> Result<()> {
        store.load(self.documents, self.issues, self.risks)
    }

    pub fn into_store(self) -> Result<FindingStore> {
        FindingStore::with_findings(self.documents, self.issues, self.risks)
    }
}

fn convert_all<R, T>(records: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = FindingsError>,
{
    records.into_iter().map(T::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{DocumentStatus, Severity};
    use chrono::TimeZone;

    #[test]
    fn test_demo_catalog_loads() {
        let catalog = Catalog::demo().unwrap();
        assert_eq!(catalog.documents.len(), 7);
        assert_eq!(catalog.issues.len(), 6);
        assert_eq!(catalog.risks.len(), 7);
        assert!(catalog.into_store().is_ok());
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        let json = r#"{ "documents": [{
            "id": 1, "name": "a.pdf", "uploadTimestamp": "2023-10-12T14:30:00",
            "sizeBytes": 100, "status": "processed", "issueCount": 0
        }] }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(
            catalog.documents[0].upload_timestamp(),
            Utc.with_ymd_and_hms(2023, 10, 12, 14, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_naive_timestamp_with_fractional_seconds() {
        let json = r#"{ "documents": [{
            "id": 1, "name": "a.pdf", "uploadTimestamp": "2023-10-12T14:30:00.500",
            "sizeBytes": 100, "status": "processing"
        }] }"#;
        let catalog = Catalog::from_json(json).unwrap();
        let expected = Utc.with_ymd_and_hms(2023, 10, 12, 14, 30, 0).unwrap()
            + chrono::Duration::milliseconds(500);
        assert_eq!(catalog.documents[0].upload_timestamp(), expected);
    }

    #[test]
    fn test_rfc3339_timestamp_is_normalized() {
        let json = r#"{ "documents": [{
            "id": 1, "name": "a.pdf", "uploadTimestamp": "2023-10-12T16:30:00+02:00",
            "sizeBytes": 100, "status": "processing"
        }] }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.documents[0].status(), DocumentStatus::Processing);
        assert_eq!(
            catalog.documents[0].upload_timestamp(),
            Utc.with_ymd_and_hms(2023, 10, 12, 14, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_unknown_severity_is_invalid_enum() {
        let json = r#"{ "risks": [{
            "id": 1, "title": "x", "severity": "catastrophic", "priority": "high"
        }] }"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert_eq!(
            err,
            FindingsError::InvalidEnum { kind: "severity", value: "catastrophic".to_string() }
        );
    }

    #[test]
    fn test_issue_count_on_failed_document_is_rejected() {
        let json = r#"{ "documents": [{
            "id": 7, "name": "infra.pdf", "uploadTimestamp": "2023-10-07T10:05:00",
            "sizeBytes": 100, "status": "failed", "issueCount": 2
        }] }"#;
        assert_eq!(Catalog::from_json(json).unwrap_err().kind(), "invariant_violation");
    }

    #[test]
    fn test_bad_timestamp_and_bad_json() {
        let json = r#"{ "documents": [{
            "id": 1, "name": "a.pdf", "uploadTimestamp": "last tuesday",
            "sizeBytes": 1, "status": "processing"
        }] }"#;
        assert_eq!(Catalog::from_json(json).unwrap_err().kind(), "invariant_violation");
        assert_eq!(Catalog::from_json("[").unwrap_err().kind(), "parse");
    }

    #[test]
    fn test_risk_record_fields_carry_over() {
        let json = r#"{ "risks": [{
            "id": 4, "title": "Insecure Password Storage", "severity": "high", "priority": "high",
            "regulation": "NIST", "section": "800-63B", "impact": "cracking",
            "mitigationSuggestion": "Argon2id"
        }] }"#;
        let risk = &Catalog::from_json(json).unwrap().risks[0];
        assert_eq!(risk.severity, Severity::High);
        assert_eq!(risk.citation(), "NIST 800-63B");
        assert_eq!(risk.mitigation_suggestion, "Argon2id");
    }
}
