use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{ApiClient, Result};
use crate::core::user::{User, UserDraft};
use crate::session::Session;

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

impl From<LoginResponse> for Session {
    fn from(resp: LoginResponse) -> Self {
        Session {
            token: resp.access_token,
            user: resp.user,
        }
    }
}

impl ApiClient {
    /// Exchange credentials for a token. The caller decides where the
    /// session goes; this does not touch the shared provider.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        log::info!("Logging in as {}", email);
        self.send_json(Method::POST, "/auth/login", &Credentials { email, password })
            .await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.get_json("/auth/users/list").await
    }

    pub async fn create_user(&self, draft: &UserDraft) -> Result<()> {
        self.execute(Method::POST, "/auth/users", Some(draft)).await
    }

    pub async fn update_user(&self, id: i64, draft: &UserDraft) -> Result<()> {
        self.execute(Method::PATCH, &format!("/auth/users/{}", id), Some(draft))
            .await
    }

    pub async fn delete_user(&self, id: i64) -> Result<()> {
        self.delete(&format!("/auth/users/{}", id)).await
    }
}
