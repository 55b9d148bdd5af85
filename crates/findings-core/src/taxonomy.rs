//! Classification taxonomy
//!
//! Severity, priority and status enumerations together with the lookup
//! tables the presentation layer reads: display labels, sort ranks and
//! color tokens. Every table is a `match`, so adding a variant without
//! updating a table fails to compile.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::FindingsError;

/// A closed set of category values with wire codes and display labels.
pub trait Classification: Copy + Eq + std::hash::Hash + 'static {
    /// Name of the category, used in error messages
    const KIND: &'static str;
    /// Every value, in display order
    const ALL: &'static [Self];

    /// Lowercase code used in external data
    fn code(&self) -> &'static str;

    /// Human-readable label
    fn label(&self) -> &'static str;
}

/// Parse an external code into a taxonomy value.
///
/// Matching ignores ASCII case and surrounding whitespace; anything else is
/// rejected with `InvalidEnum` rather than defaulted.
pub fn parse_code<T: Classification>(raw: &str) -> Result<T, FindingsError> {
    let needle = raw.trim();
    T::ALL
        .iter()
        .copied()
        .find(|v| v.code().eq_ignore_ascii_case(needle))
        .ok_or_else(|| FindingsError::InvalidEnum {
            kind: T::KIND,
            value: raw.to_string(),
        })
}

/// Display label for any taxonomy value.
pub fn display_label<T: Classification>(value: T) -> &'static str {
    value.label()
}

/// Opaque color token consumed by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorToken {
    Danger,
    Warning,
    Info,
    Success,
}

/// Values that map onto a color token.
pub trait Colored {
    fn color_token(&self) -> ColorToken;
}

/// Color token for a severity, status, priority or compliance state.
pub fn color_token<T: Colored>(value: &T) -> ColorToken {
    value.color_token()
}

// ============================================================================
// SEVERITY
// ============================================================================

/// Criticality of a risk. `Critical > High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low = 0,
    Medium = 1,
    High = 2,
    Critical = 3,
}

impl Severity {
    /// Sort rank: critical=0 ... low=3. Lower rank sorts first.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
        }
    }
}

/// Sort rank of a severity (critical=0 ... low=3).
pub fn rank(severity: Severity) -> u8 {
    severity.rank()
}

impl Classification for Severity {
    const KIND: &'static str = "severity";
    const ALL: &'static [Self] = &[
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    fn code(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

impl Colored for Severity {
    fn color_token(&self) -> ColorToken {
        match self {
            Severity::Critical => ColorToken::Danger,
            Severity::High => ColorToken::Warning,
            Severity::Medium => ColorToken::Info,
            Severity::Low => ColorToken::Success,
        }
    }
}

// ============================================================================
// PRIORITY
// ============================================================================

/// Urgency of a risk, independent of its severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low = 0,
    Medium = 1,
    High = 2,
}

impl Classification for Priority {
    const KIND: &'static str = "priority";
    const ALL: &'static [Self] = &[Priority::High, Priority::Medium, Priority::Low];

    fn code(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl Colored for Priority {
    fn color_token(&self) -> ColorToken {
        match self {
            Priority::High => ColorToken::Danger,
            Priority::Medium => ColorToken::Warning,
            Priority::Low => ColorToken::Info,
        }
    }
}

// ============================================================================
// STATUSES
// ============================================================================

/// Outcome of a compliance check: pass, attention, fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    Success,
    Warning,
    Error,
}

impl Classification for IssueStatus {
    const KIND: &'static str = "issue status";
    const ALL: &'static [Self] = &[IssueStatus::Success, IssueStatus::Warning, IssueStatus::Error];

    fn code(&self) -> &'static str {
        match self {
            IssueStatus::Success => "success",
            IssueStatus::Warning => "warning",
            IssueStatus::Error => "error",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            IssueStatus::Success => "Passed",
            IssueStatus::Warning => "Needs Attention",
            IssueStatus::Error => "Failed",
        }
    }
}

impl Colored for IssueStatus {
    fn color_token(&self) -> ColorToken {
        match self {
            IssueStatus::Success => ColorToken::Success,
            IssueStatus::Warning => ColorToken::Warning,
            IssueStatus::Error => ColorToken::Danger,
        }
    }
}

/// Scan status of an uploaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Processing,
    Failed,
    Processed,
}

impl Classification for DocumentStatus {
    const KIND: &'static str = "document status";
    const ALL: &'static [Self] = &[
        DocumentStatus::Processing,
        DocumentStatus::Failed,
        DocumentStatus::Processed,
    ];

    fn code(&self) -> &'static str {
        match self {
            DocumentStatus::Processing => "processing",
            DocumentStatus::Failed => "failed",
            DocumentStatus::Processed => "processed",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            DocumentStatus::Processing => "Processing",
            DocumentStatus::Failed => "Failed",
            DocumentStatus::Processed => "Processed",
        }
    }
}

/// Derived compliance state of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceState {
    Compliant,
    Flagged,
    Processing,
    Failed,
}

impl Classification for ComplianceState {
    const KIND: &'static str = "compliance state";
    const ALL: &'static [Self] = &[
        ComplianceState::Compliant,
        ComplianceState::Flagged,
        ComplianceState::Processing,
        ComplianceState::Failed,
    ];

    fn code(&self) -> &'static str {
        match self {
            ComplianceState::Compliant => "compliant",
            ComplianceState::Flagged => "flagged",
            ComplianceState::Processing => "processing",
            ComplianceState::Failed => "failed",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ComplianceState::Compliant => "Compliant",
            ComplianceState::Flagged => "Issues Found",
            ComplianceState::Processing => "Processing",
            ComplianceState::Failed => "Failed",
        }
    }
}

impl Colored for ComplianceState {
    fn color_token(&self) -> ColorToken {
        match self {
            ComplianceState::Compliant => ColorToken::Success,
            ComplianceState::Flagged => ColorToken::Warning,
            ComplianceState::Processing => ColorToken::Info,
            ComplianceState::Failed => ColorToken::Danger,
        }
    }
}

// ============================================================================
// TABS
// ============================================================================

/// Top-level dashboard tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Overview,
    Compliance,
    Documents,
    Risk,
    Settings,
}

impl Classification for Tab {
    const KIND: &'static str = "tab";
    const ALL: &'static [Self] = &[
        Tab::Overview,
        Tab::Compliance,
        Tab::Documents,
        Tab::Risk,
        Tab::Settings,
    ];

    fn code(&self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Compliance => "compliance",
            Tab::Documents => "documents",
            Tab::Risk => "risk",
            Tab::Settings => "settings",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Tab::Overview => "Dashboard",
            Tab::Compliance => "Compliance",
            Tab::Documents => "Documents",
            Tab::Risk => "Risk Analysis",
            Tab::Settings => "Settings",
        }
    }
}

// ============================================================================
// PARSING & DISPLAY
// ============================================================================

impl FromStr for Severity {
    type Err = FindingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_code(s)
    }
}

impl FromStr for Priority {
    type Err = FindingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_code(s)
    }
}

impl FromStr for IssueStatus {
    type Err = FindingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_code(s)
    }
}

impl FromStr for DocumentStatus {
    type Err = FindingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_code(s)
    }
}

impl FromStr for Tab {
    type Err = FindingsError;

    // "dashboard" is the overview tab's name in older links
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("dashboard") {
            return Ok(Tab::Overview);
        }
        parse_code(s)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::fmt::Display for ComplianceState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
