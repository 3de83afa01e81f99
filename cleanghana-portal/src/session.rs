//! Session registry
//!
//! Sessions live for the process only: a session is the pairing of the
//! bootstrap identity with an explicitly chosen role, created at login
//! and deleted at logout. Nothing here is persisted.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use cleanghana_core::Role;

use crate::identity::Identity;

/// Unique session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

/// An active role session
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub identity: Identity,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// In-memory session registry
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a session for the given role
    pub fn login(&self, identity: Identity, role: Role) -> Session {
        let session = Session {
            id: SessionId(Uuid::new_v4().to_string()),
            identity,
            role,
            created_at: Utc::now(),
        };
        self.sessions
            .write()
            .unwrap()
            .insert(session.id.clone(), session.clone());
        session
    }

    pub fn get(&self, session_id: &SessionId) -> Option<Session> {
        self.sessions.read().unwrap().get(session_id).cloned()
    }

    /// Delete a session, returning it if it existed
    pub fn logout(&self, session_id: &SessionId) -> Option<Session> {
        self.sessions.write().unwrap().remove(session_id)
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let registry = SessionRegistry::new();

        let session = registry.login(Identity("anon-1".to_string()), Role::Authority);
        assert_eq!(registry.get(&session.id).unwrap().role, Role::Authority);

        let removed = registry.logout(&session.id).unwrap();
        assert_eq!(removed.id, session.id);
        assert!(registry.get(&session.id).is_none());
        assert!(registry.logout(&session.id).is_none());
    }
}
