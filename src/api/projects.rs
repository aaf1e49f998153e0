use reqwest::Method;

use super::{ApiClient, Result};
use crate::core::project::{Project, ProjectDraft};

impl ApiClient {
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.get_json("/projects/list").await
    }

    /// A single project including its tasks.
    pub async fn get_project(&self, id: i64) -> Result<Project> {
        self.get_json(&format!("/projects/{}", id)).await
    }

    pub async fn create_project(&self, draft: &ProjectDraft) -> Result<()> {
        self.execute(Method::POST, "/projects/create", Some(draft)).await
    }

    pub async fn update_project(&self, id: i64, draft: &ProjectDraft) -> Result<()> {
        self.execute(Method::PATCH, &format!("/projects/{}", id), Some(draft))
            .await
    }

    pub async fn delete_project(&self, id: i64) -> Result<()> {
        self.delete(&format!("/projects/{}", id)).await
    }
}
