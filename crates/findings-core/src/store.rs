//! FindingStore: the current snapshot of documents, issues and risks
//!
//! Each collection keeps insertion order and a unique-id index. The whole
//! dataset is replaced by `load`; the only partial mutation is
//! `remove_document`.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::error::{FindingsError, Result};
use crate::model::{ComplianceIssue, Document, DocumentId, Finding, IssueId, Risk, RiskId};

/// Insertion-ordered collection with an id index
#[derive(Debug, Clone)]
struct Collection<T> {
    items: Vec<T>,
    index: HashMap<u64, usize>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Finding> Collection<T> {
    fn build(items: Vec<T>) -> Result<Self> {
        let mut index = HashMap::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            if index.insert(item.id(), pos).is_some() {
                return Err(FindingsError::DuplicateId {
                    kind: T::KIND,
                    id: item.id(),
                });
            }
        }
        Ok(Self { items, index })
    }

    fn get(&self, id: u64) -> Result<&T> {
        self.index
            .get(&id)
            .map(|&pos| &self.items[pos])
            .ok_or(FindingsError::NotFound { kind: T::KIND, id })
    }

    fn contains(&self, id: u64) -> bool {
        self.index.contains_key(&id)
    }

    fn remove(&mut self, id: u64) -> Result<T> {
        let pos = self
            .index
            .remove(&id)
            .ok_or(FindingsError::NotFound { kind: T::KIND, id })?;
        let removed = self.items.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Ok(removed)
    }
}

/// In-memory snapshot of every finding
#[derive(Debug, Clone, Default)]
pub struct FindingStore {
    documents: Collection<Document>,
    issues: Collection<ComplianceIssue>,
    risks: Collection<Risk>,
}

impl FindingStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a full dataset
    pub fn with_findings(
        documents: Vec<Document>,
        issues: Vec<ComplianceIssue>,
        risks: Vec<Risk>,
    ) -> Result<Self> {
        let mut store = Self::new();
        store.load(documents, issues, risks)?;
        Ok(store)
    }

    /// Replace the whole dataset.
    ///
    /// All three collections are indexed before anything is swapped in, so a
    /// duplicate id anywhere leaves the previous snapshot untouched.
    pub fn load(
        &mut self,
        documents: Vec<Document>,
        issues: Vec<ComplianceIssue>,
        risks: Vec<Risk>,
    ) -> Result<()> {
        let staged = Collection::build(documents).and_then(|documents| {
            Ok((documents, Collection::build(issues)?, Collection::build(risks)?))
        });

        let (documents, issues, risks) = match staged {
            Ok(staged) => staged,
            Err(err) => {
                warn!(error = %err, "rejected finding snapshot");
                return Err(err);
            }
        };

        info!(
            documents = documents.items.len(),
            issues = issues.items.len(),
            risks = risks.items.len(),
            "loaded finding snapshot"
        );

        self.documents = documents;
        self.issues = issues;
        self.risks = risks;
        Ok(())
    }

    pub fn get_document(&self, id: DocumentId) -> Result<&Document> {
        self.documents.get(id)
    }

    pub fn get_issue(&self, id: IssueId) -> Result<&ComplianceIssue> {
        self.issues.get(id)
    }

    pub fn get_risk(&self, id: RiskId) -> Result<&Risk> {
        self.risks.get(id)
    }

    pub fn contains_issue(&self, id: IssueId) -> bool {
        self.issues.contains(id)
    }

    pub fn contains_risk(&self, id: RiskId) -> bool {
        self.risks.contains(id)
    }

    /// Documents in insertion order. The iterator can be cloned to restart.
    pub fn list_documents(&self) -> std::slice::Iter<'_, Document> {
        self.documents.items.iter()
    }

    /// Issues in insertion order
    pub fn list_issues(&self) -> std::slice::Iter<'_, ComplianceIssue> {
        self.issues.items.iter()
    }

    /// Risks in insertion order
    pub fn list_risks(&self) -> std::slice::Iter<'_, Risk> {
        self.risks.items.iter()
    }

    pub fn document_count(&self) -> usize {
        self.documents.items.len()
    }

    pub fn issue_count(&self) -> usize {
        self.issues.items.len()
    }

    pub fn risk_count(&self) -> usize {
        self.risks.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.items.is_empty() && self.issues.items.is_empty() && self.risks.items.is_empty()
    }

    /// Delete a document. Issues and risks are independent and stay.
    pub fn remove_document(&mut self, id: DocumentId) -> Result<Document> {
        let removed = self.documents.remove(id)?;
        info!(document = id, name = removed.name(), "removed document");
        Ok(removed)
    }
}
