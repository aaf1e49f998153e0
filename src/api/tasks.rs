use reqwest::Method;
use serde_json::json;

use super::{ApiClient, Result};
use crate::core::status::TaskStatus;
use crate::core::task::{Task, TaskPayload};

impl ApiClient {
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.get_json("/tasks/list").await
    }

    pub async fn create_task(&self, payload: &TaskPayload) -> Result<()> {
        self.execute(Method::POST, "/tasks/create", Some(payload)).await
    }

    pub async fn update_task(&self, id: i64, payload: &TaskPayload) -> Result<()> {
        self.execute(Method::PATCH, &format!("/tasks/{}", id), Some(payload))
            .await
    }

    pub async fn assign_task(&self, id: i64, user_id: i64) -> Result<()> {
        let body = json!({ "assigned_to_user_id": user_id });
        self.execute(Method::PATCH, &format!("/tasks/{}", id), Some(&body))
            .await
    }

    pub async fn complete_task(&self, id: i64) -> Result<()> {
        let body = json!({ "status": TaskStatus::Concluida });
        self.execute(Method::PATCH, &format!("/tasks/{}", id), Some(&body))
            .await
    }

    pub async fn delete_task(&self, id: i64) -> Result<()> {
        self.delete(&format!("/tasks/{}", id)).await
    }
}
