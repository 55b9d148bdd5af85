//! Navigation state machine
//!
//! Tracks what the operator is looking at: the active tab, the risk detail
//! modal, the hovered compliance issue, the expanded risk card and the
//! document search query. The tab and the risk modal are independent slices;
//! switching tabs never closes the modal.
//!
//! ```text
//!             select_risk(id)
//!   Closed ───────────────────▶ Open { id }
//!     ▲                            │
//!     └──────── close_modal ───────┘
//! ```

use serde::Serialize;
use tracing::debug;

use crate::error::{FindingsError, Result};
use crate::model::{IssueId, Risk, RiskId};
use crate::store::FindingStore;
use crate::taxonomy::Tab;

/// Risk detail sub-state. A selection exists exactly when the modal is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RiskDetail {
    #[default]
    Closed,
    Open { risk_id: RiskId },
}

/// Per-session interaction state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    active_tab: Tab,
    detail: RiskDetail,
    hovered_issue: Option<IssueId>,
    expanded_risk: Option<RiskId>,
    search_query: String,
}

/// Serializable view of [`NavigationState`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationSnapshot {
    pub active_tab: Tab,
    pub selected_risk_id: Option<RiskId>,
    pub modal_open: bool,
    pub hovered_issue_id: Option<IssueId>,
    pub expanded_risk_id: Option<RiskId>,
    pub document_search_query: String,
}

impl NavigationState {
    /// Overview tab, modal closed, nothing selected
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn detail(&self) -> RiskDetail {
        self.detail
    }

    pub fn selected_risk_id(&self) -> Option<RiskId> {
        match self.detail {
            RiskDetail::Open { risk_id } => Some(risk_id),
            RiskDetail::Closed => None,
        }
    }

    pub fn is_modal_open(&self) -> bool {
        matches!(self.detail, RiskDetail::Open { .. })
    }

    pub fn hovered_issue_id(&self) -> Option<IssueId> {
        self.hovered_issue
    }

    pub fn expanded_risk_id(&self) -> Option<RiskId> {
        self.expanded_risk
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// The risk shown in the modal, if any
    pub fn selected_risk<'s>(&self, store: &'s FindingStore) -> Option<&'s Risk> {
        self.selected_risk_id().and_then(|id| store.get_risk(id).ok())
    }

    /// Always succeeds and leaves the risk modal as it was.
    pub fn switch_tab(&mut self, tab: Tab) {
        debug!(from = ?self.active_tab, to = ?tab, "switch tab");
        self.active_tab = tab;
    }

    /// Open the detail modal on `id`.
    ///
    /// Fails with `NotFound` when the risk is not in the store; the state is
    /// left untouched in that case.
    pub fn select_risk(&mut self, store: &FindingStore, id: RiskId) -> Result<()> {
        if !store.contains_risk(id) {
            return Err(FindingsError::NotFound { kind: "risk", id });
        }
        debug!(risk = id, "open risk detail");
        self.detail = RiskDetail::Open { risk_id: id };
        Ok(())
    }

    /// Close the modal and clear the selection. No-op when already closed.
    pub fn close_modal(&mut self) {
        if let RiskDetail::Open { risk_id } = self.detail {
            debug!(risk = risk_id, "close risk detail");
        }
        self.detail = RiskDetail::Closed;
    }

    /// Set or clear the hovered compliance issue
    pub fn set_hovered(&mut self, store: &FindingStore, id: Option<IssueId>) -> Result<()> {
        if let Some(id) = id {
            if !store.contains_issue(id) {
                return Err(FindingsError::NotFound { kind: "issue", id });
            }
        }
        self.hovered_issue = id;
        Ok(())
    }

    /// Expand a risk card in place, or collapse it if it is already expanded.
    ///
    /// Returns whether the card is expanded afterwards.
    pub fn toggle_expanded(&mut self, store: &FindingStore, id: RiskId) -> Result<bool> {
        if !store.contains_risk(id) {
            return Err(FindingsError::NotFound { kind: "risk", id });
        }
        if self.expanded_risk == Some(id) {
            self.expanded_risk = None;
            Ok(false)
        } else {
            self.expanded_risk = Some(id);
            Ok(true)
        }
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Drop references to findings that are no longer in `store`.
    ///
    /// Returns true if anything was cleared.
    pub fn reconcile(&mut self, store: &FindingStore) -> bool {
        let mut changed = false;

        if let Some(id) = self.selected_risk_id() {
            if !store.contains_risk(id) {
                debug!(risk = id, "selected risk no longer loaded, closing detail");
                self.detail = RiskDetail::Closed;
                changed = true;
            }
        }
        if let Some(id) = self.hovered_issue {
            if !store.contains_issue(id) {
                self.hovered_issue = None;
                changed = true;
            }
        }
        if let Some(id) = self.expanded_risk {
            if !store.contains_risk(id) {
                self.expanded_risk = None;
                changed = true;
            }
        }

        changed
    }

    pub fn snapshot(&self) -> NavigationSnapshot {
        NavigationSnapshot {
            active_tab: self.active_tab,
            selected_risk_id: self.selected_risk_id(),
            modal_open: self.is_modal_open(),
            hovered_issue_id: self.hovered_issue,
            expanded_risk_id: self.expanded_risk,
            document_search_query: self.search_query.clone(),
        }
    }
}
