use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{Session, SessionError, keyring};
use crate::config::{ConsoleConfig, TokenStorage};
use crate::core::user::User;

/// On-disk form of a session. The token is left out when it lives in the
/// keyring.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    user: User,
}

pub struct SessionStore {
    path: PathBuf,
    storage: TokenStorage,
    server: String,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>, storage: TokenStorage, server: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            storage,
            server: server.into(),
        }
    }

    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self::new(config.session_path(), config.token_storage, &config.api_base_url)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The saved session, or `None` when nobody is logged in.
    pub async fn load(&self) -> Result<Option<Session>, SessionError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredSession = serde_json::from_str(&content)?;

        let token = match self.storage {
            TokenStorage::File => stored.token,
            TokenStorage::Keyring => keyring::load_token(&self.server).await?,
        };

        Ok(token
            .filter(|t| !t.is_empty())
            .map(|token| Session {
                token,
                user: stored.user,
            }))
    }

    pub async fn save(&self, session: &Session) -> Result<(), SessionError> {
        let token = match self.storage {
            TokenStorage::File => Some(session.token.clone()),
            TokenStorage::Keyring => {
                keyring::store_token(&self.server, &session.token).await?;
                None
            }
        };
        let stored = StoredSession {
            token,
            user: session.user.clone(),
        };

        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_string_pretty(&stored)?).await?;
        log::info!("Saved session for {}", session.user.email);
        Ok(())
    }

    /// Forget the token and the profile.
    pub async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        if self.storage == TokenStorage::Keyring {
            keyring::delete_token(&self.server).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::user::Role;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("gestao-test-{}-{}", std::process::id(), name))
            .join("session.json")
    }

    fn sample() -> Session {
        Session {
            token: "abc".into(),
            user: User {
                id: 3,
                name: "Rita".into(),
                email: "rita@example.com".into(),
                role: Role::Colaborador,
                contact: None,
                position: None,
                admission_date: None,
            },
        }
    }

    #[tokio::test]
    async fn file_store_roundtrip_and_clear() {
        let path = temp_path("roundtrip");
        let store = SessionStore::new(&path, TokenStorage::File, "http://api");
        assert!(store.load().await.unwrap().is_none());

        store.save(&sample()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(sample()));

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
        // clearing twice is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn profile_without_token_is_logged_out() {
        let path = temp_path("no-token");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, r#"{"user":{"id":1,"name":"x"}}"#).await.unwrap();
        let store = SessionStore::new(&path, TokenStorage::File, "http://api");
        assert!(store.load().await.unwrap().is_none());
        store.clear().await.unwrap();
    }
}
