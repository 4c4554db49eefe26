//! SessionRegistry: concurrent token → identity map via DashMap.

use std::sync::Arc;

use dashmap::DashMap;

use formsync_core::errors::{FormSyncError, FormSyncResult};
use formsync_core::models::UserIdentity;
use formsync_core::traits::IdentityResolver;

/// In-process session store. Tokens are opaque; the authentication step
/// that issues them lives outside the engine.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<String, UserIdentity>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for an authenticated user and return its token.
    pub fn open_session(&self, identity: UserIdentity) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        self.sessions.insert(token.clone(), identity);
        token
    }

    /// Bind a caller-chosen token.
    pub fn insert(&self, token: impl Into<String>, identity: UserIdentity) {
        self.sessions.insert(token.into(), identity);
    }

    pub fn revoke(&self, token: &str) -> Option<UserIdentity> {
        self.sessions.remove(token).map(|(_, v)| v)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl IdentityResolver for SessionRegistry {
    fn resolve(&self, session_token: &str) -> FormSyncResult<UserIdentity> {
        self.sessions
            .get(session_token)
            .map(|entry| *entry.value())
            .ok_or_else(|| FormSyncError::Unauthenticated {
                reason: "unknown or expired session".to_string(),
            })
    }
}
