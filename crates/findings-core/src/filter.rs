//! FilterEngine: text search and predicate filters
//!
//! Filters borrow from the store and return views; they never mutate it.
//! Predicates inside a [`Filter`] are combined with AND, so adding one can
//! only shrink the result.

use crate::aggregate::document_compliance_state;
use crate::model::{ComplianceIssue, Document, Risk};
use crate::taxonomy::{ComplianceState, DocumentStatus, IssueStatus, Priority, Severity};

/// Case-insensitive substring search on document names.
///
/// The query is matched as typed, whitespace included. Only the empty query
/// returns every document in input order.
pub fn search<'a>(documents: impl IntoIterator<Item = &'a Document>, query: &str) -> Vec<&'a Document> {
    if query.is_empty() {
        return documents.into_iter().collect();
    }
    let needle = query.to_lowercase();
    documents
        .into_iter()
        .filter(|d| d.name().to_lowercase().contains(&needle))
        .collect()
}

/// A single test against an item
pub trait Predicate<T> {
    fn matches(&self, item: &T) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentPredicate {
    Status(DocumentStatus),
    State(ComplianceState),
    NameContains(String),
}

impl Predicate<Document> for DocumentPredicate {
    fn matches(&self, doc: &Document) -> bool {
        match self {
            DocumentPredicate::Status(status) => doc.status() == *status,
            DocumentPredicate::State(state) => document_compliance_state(doc) == *state,
            DocumentPredicate::NameContains(text) => {
                doc.name().to_lowercase().contains(&text.to_lowercase())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskPredicate {
    Severity(Severity),
    /// At least this severe
    MinSeverity(Severity),
    Priority(Priority),
    Regulation(String),
}

impl Predicate<Risk> for RiskPredicate {
    fn matches(&self, risk: &Risk) -> bool {
        match self {
            RiskPredicate::Severity(severity) => risk.severity == *severity,
            RiskPredicate::MinSeverity(min) => risk.severity >= *min,
            RiskPredicate::Priority(priority) => risk.priority == *priority,
            RiskPredicate::Regulation(code) => risk.regulation.eq_ignore_ascii_case(code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuePredicate {
    Status(IssueStatus),
    Regulation(String),
}

impl Predicate<ComplianceIssue> for IssuePredicate {
    fn matches(&self, issue: &ComplianceIssue) -> bool {
        match self {
            IssuePredicate::Status(status) => issue.status == *status,
            IssuePredicate::Regulation(code) => issue.regulation.eq_ignore_ascii_case(code),
        }
    }
}

/// AND-combination of predicates. An empty filter matches everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter<P> {
    predicates: Vec<P>,
}

pub type DocumentFilter = Filter<DocumentPredicate>;
pub type RiskFilter = Filter<RiskPredicate>;
pub type IssueFilter = Filter<IssuePredicate>;

impl<P> Default for Filter<P> {
    fn default() -> Self {
        Self { predicates: Vec::new() }
    }
}

impl<P> Filter<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate
    pub fn and(mut self, predicate: P) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[P] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches<T>(&self, item: &T) -> bool
    where
        P: Predicate<T>,
    {
        self.predicates.iter().all(|p| p.matches(item))
    }

    /// Items that pass every predicate, in input order
    pub fn apply<'a, T>(&self, items: impl IntoIterator<Item = &'a T>) -> Vec<&'a T>
    where
        P: Predicate<T>,
        T: 'a,
    {
        items.into_iter().filter(|item| self.matches(*item)).collect()
    }
}

impl Filter<DocumentPredicate> {
    pub fn by_status(self, status: DocumentStatus) -> Self {
        self.and(DocumentPredicate::Status(status))
    }

    pub fn by_state(self, state: ComplianceState) -> Self {
        self.and(DocumentPredicate::State(state))
    }

    pub fn name_contains(self, text: impl Into<String>) -> Self {
        self.and(DocumentPredicate::NameContains(text.into()))
    }
}

impl Filter<RiskPredicate> {
    pub fn by_severity(self, severity: Severity) -> Self {
        self.and(RiskPredicate::Severity(severity))
    }

    pub fn at_least(self, severity: Severity) -> Self {
        self.and(RiskPredicate::MinSeverity(severity))
    }

    pub fn by_priority(self, priority: Priority) -> Self {
        self.and(RiskPredicate::Priority(priority))
    }

    pub fn by_regulation(self, code: impl Into<String>) -> Self {
        self.and(RiskPredicate::Regulation(code.into()))
    }
}

impl Filter<IssuePredicate> {
    pub fn by_status(self, status: IssueStatus) -> Self {
        self.and(IssuePredicate::Status(status))
    }

    pub fn by_regulation(self, code: impl Into<String>) -> Self {
        self.and(IssuePredicate::Regulation(code.into()))
    }
}
