//! Who is logged in, shared by every view and the API client.
//!
//! A single [`SessionProvider`] is built at startup and handed to each
//! consumer. [`store::SessionStore`] persists it between runs.

pub mod keyring;
pub mod store;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::user::User;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed session file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Keyring(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Default)]
pub struct SessionProvider {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(session))),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn current(&self) -> Option<Session> {
        self.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.read().as_ref().map(|s| s.user.clone())
    }

    /// Only token presence counts; expiry is discovered by the API.
    pub fn is_authenticated(&self) -> bool {
        self.read().as_ref().is_some_and(|s| !s.token.is_empty())
    }

    pub fn set(&self, session: Session) {
        *self.write() = Some(session);
    }

    pub fn clear(&self) {
        *self.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::user::Role;

    fn session(id: i64, role: Role) -> Session {
        Session {
            token: format!("token-{id}"),
            user: User {
                id,
                name: format!("user{id}"),
                email: format!("user{id}@example.com"),
                role,
                contact: None,
                position: None,
                admission_date: None,
            },
        }
    }

    #[test]
    fn clones_share_state() {
        let provider = SessionProvider::new();
        let view = provider.clone();
        assert!(!view.is_authenticated());

        provider.set(session(7, Role::Admin));
        assert_eq!(view.token().as_deref(), Some("token-7"));
        assert_eq!(view.user().map(|u| u.id), Some(7));

        view.clear();
        assert!(provider.current().is_none());
    }

    #[test]
    fn empty_token_is_not_a_login() {
        let mut s = session(1, Role::Convidado);
        s.token.clear();
        assert!(!SessionProvider::with_session(s).is_authenticated());
    }
}
