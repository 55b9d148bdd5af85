//! Shared application state: one finding store, many navigation sessions
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use findings_core::{FindingStore, NavigationState, ReportDraft};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ApiError;
use crate::metrics::Metrics;

/// One operator's view over the shared store
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub navigation: NavigationState,
    pub report: ReportDraft,
    pub created_at: DateTime<Utc>,
}

impl Session {
    fn new() -> Self {
        Self {
            created_at: Utc::now(),
            ..Self::default()
        }
    }
}

struct Inner {
    store: RwLock<FindingStore>,
    sessions: RwLock<HashMap<Uuid, Session>>,
    metrics: Metrics,
}

/// Cheap to clone; handed to every handler.
///
/// Lock order is always store, then sessions.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl AppState {
    pub fn new(store: FindingStore) -> Result<Self, ApiError> {
        Ok(Self {
            inner: Arc::new(Inner {
                store: RwLock::new(store),
                sessions: RwLock::new(HashMap::new()),
                metrics: Metrics::new()?,
            }),
        })
    }

    pub fn metrics(&self) -> &Metrics {
        &self.inner.metrics
    }

    /// Run `f` against a read view of the store
    pub async fn read_store<R>(&self, f: impl FnOnce(&FindingStore) -> R) -> R {
        let store = self.inner.store.read().await;
        f(&*store)
    }

    /// Mutate the store, then drop stale references from every session.
    ///
    /// The session map is reconciled while the store write guard is still
    /// held so no reader sees a session pointing at a removed risk.
    pub async fn write_store<R>(
        &self,
        f: impl FnOnce(&mut FindingStore) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let mut store = self.inner.store.write().await;
        let out = f(&mut *store)?;

        let mut sessions = self.inner.sessions.write().await;
        let mut touched = 0usize;
        for session in sessions.values_mut() {
            let nav = session.navigation.reconcile(&store);
            let report = session.report.reconcile(&store);
            if nav || report {
                touched += 1;
            }
        }
        if touched > 0 {
            tracing::info!(sessions = touched, "reconciled sessions after store change");
        }
        Ok(out)
    }

    pub async fn create_session(&self) -> (Uuid, Session) {
        let id = Uuid::new_v4();
        let session = Session::new();
        let mut sessions = self.inner.sessions.write().await;
        sessions.insert(id, session.clone());
        self.inner.metrics.active_sessions.set(sessions.len() as i64);
        tracing::info!(session = %id, "session created");
        (id, session)
    }

    pub async fn delete_session(&self, id: Uuid) -> Result<(), ApiError> {
        let mut sessions = self.inner.sessions.write().await;
        sessions.remove(&id).ok_or(ApiError::SessionNotFound(id))?;
        self.inner.metrics.active_sessions.set(sessions.len() as i64);
        tracing::info!(session = %id, "session closed");
        Ok(())
    }

    /// Run `f` against one session with a read view of the store.
    ///
    /// `f` sees a consistent store for the whole transition, so a selection
    /// cannot race a reload.
    pub async fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&FindingStore, &mut Session) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let store = self.inner.store.read().await;
        let mut sessions = self.inner.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound(id))?;
        f(&*store, session)
    }
}
