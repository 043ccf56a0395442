//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the per-candidate sessions.

use crate::adapters::TokenGate;
use crate::config::Config;
use chrono::{DateTime, Duration, Utc};
use recruitment_core::layout::SheetLayout;
use recruitment_core::ports::{FileStore, TabularStore};
use recruitment_core::{CandidateRecord, CandidateRegistry, DocumentUploader};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: CandidateRegistry,
    pub uploader: DocumentUploader,
    pub token_gate: Arc<TokenGate>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Wires the core services to whichever backend the stores come from.
    pub fn new(
        config: Arc<Config>,
        tabular: Arc<dyn TabularStore>,
        files: Arc<dyn FileStore>,
        token_gate: Arc<TokenGate>,
    ) -> Self {
        let registry = CandidateRegistry::new(tabular, SheetLayout::new(config.sheet_name.clone()));
        let uploader = DocumentUploader::new(files, config.drive_folder_id.clone());
        Self {
            config,
            registry,
            uploader,
            token_gate,
            sessions: Arc::new(SessionStore::default()),
        }
    }
}

//=========================================================================================
// CandidateSession (One Per Logged-In Browser)
//=========================================================================================

/// How long a session and its cookie stay valid.
pub const SESSION_TTL_SECS: i64 = 60 * 60 * 24;

/// The logged-in candidate. Created on login success, removed on logout or
/// once it is older than the session TTL.
#[derive(Debug, Clone)]
pub struct CandidateSession {
    pub id: String,
    pub record: CandidateRecord,
    pub created_at: DateTime<Utc>,
    /// Held for the whole document submission, so one session cannot run two at once.
    pub submission: Arc<Mutex<()>>,
}

/// All live candidate sessions, keyed by the session cookie value.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, CandidateSession>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::seconds(SESSION_TTL_SECS))
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn is_live(&self, session: &CandidateSession, now: DateTime<Utc>) -> bool {
        now - session.created_at < self.ttl
    }

    pub async fn create(&self, record: CandidateRecord) -> CandidateSession {
        let session = CandidateSession {
            id: Uuid::new_v4().to_string(),
            record,
            created_at: Utc::now(),
            submission: Arc::new(Mutex::new(())),
        };
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        session
    }

    /// Drops every expired session and returns their ids.
    pub async fn prune_expired(&self) -> Vec<String> {
        let now = Utc::now();
        let mut expired = Vec::new();
        self.sessions.write().await.retain(|id, s| {
            let live = self.is_live(s, now);
            if !live {
                expired.push(id.clone());
            }
            live
        });
        expired
    }

    pub async fn get(&self, id: &str) -> Option<CandidateSession> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(id) {
                Some(session) if self.is_live(session, now) => return Some(session.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        self.sessions.write().await.remove(id);
        None
    }

    /// Replaces the cached record after a successful write. Returns `false` if
    /// the session ended in the meantime.
    pub async fn update_record(&self, id: &str, record: CandidateRecord) -> bool {
        match self.sessions.write().await.get_mut(id) {
            Some(session) => {
                session.record = record;
                true
            }
            None => false,
        }
    }

    pub async fn remove(&self, id: &str) -> Option<CandidateSession> {
        self.sessions.write().await.remove(id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recruitment_core::CandidateStatus;

    fn record() -> CandidateRecord {
        CandidateRecord {
            row_index: 2,
            phone: "081234567890".to_string(),
            birth_date: "01/01/1990".to_string(),
            name: "John Doe".to_string(),
            nik: String::new(),
            village: "Desa Contoh".to_string(),
            test_schedule: String::new(),
            test_location: String::new(),
            ktp_url: String::new(),
            selfie_url: String::new(),
            status: CandidateStatus::Pending,
            obfuscated_id: String::new(),
        }
    }

    #[tokio::test]
    async fn session_lifecycle() {
        let store = SessionStore::default();
        let session = store.create(record()).await;
        assert_eq!(store.get(&session.id).await.unwrap().record.name, "John Doe");

        let mut updated = record();
        updated.nik = "1234567890123456".to_string();
        assert!(store.update_record(&session.id, updated).await);
        assert_eq!(store.get(&session.id).await.unwrap().record.nik, "1234567890123456");

        assert!(store.remove(&session.id).await.is_some());
        assert!(store.get(&session.id).await.is_none());
        assert!(!store.update_record(&session.id, record()).await);
        assert_eq!(store.len().await, 0);
    }

    async fn backdate(store: &SessionStore, id: &str, by: Duration) {
        if let Some(session) = store.sessions.write().await.get_mut(id) {
            session.created_at -= by;
        }
    }

    #[tokio::test]
    async fn expired_session_is_dropped_on_lookup() {
        let store = SessionStore::default();
        let session = store.create(record()).await;
        backdate(&store, &session.id, Duration::seconds(SESSION_TTL_SECS + 1)).await;

        assert!(store.get(&session.id).await.is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn abandoned_sessions_are_pruned_on_login() {
        let store = SessionStore::new(Duration::hours(1));
        let mut ids = Vec::new();
        for _ in 0..50 {
            ids.push(store.create(record()).await.id);
        }
        for id in &ids {
            backdate(&store, id, Duration::hours(2)).await;
        }

        let fresh = store.create(record()).await;
        let mut pruned = store.prune_expired().await;
        pruned.sort();
        ids.sort();
        assert_eq!(pruned, ids);
        assert_eq!(store.len().await, 1);
        assert!(store.get(&fresh.id).await.is_some());
    }
}
