use reqwest::Method;
use reqwest::multipart::{Form, Part};

use super::{ApiClient, Result};
use crate::core::call::{Call, CallDraft, CallEdit, CallPage, CallQuery, FollowUp, FollowUpDraft, FollowUpEdit};

fn follow_up_form(draft: &FollowUpDraft) -> Form {
    let form = Form::new()
        .text("description", draft.description.clone())
        .text("type", draft.kind.as_str());
    match &draft.file {
        Some(upload) => form.part(
            "files",
            Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone()),
        ),
        None => form,
    }
}

impl ApiClient {
    pub async fn list_calls(&self, query: &CallQuery) -> Result<CallPage> {
        self.get_json_query("/calls", &query.to_pairs()).await
    }

    pub async fn get_call(&self, id: i64) -> Result<Call> {
        self.get_json(&format!("/calls/{}", id)).await
    }

    pub async fn create_call(&self, draft: &CallDraft) -> Result<()> {
        self.execute(Method::POST, "/calls", Some(draft)).await
    }

    pub async fn update_call(&self, id: i64, draft: &CallDraft) -> Result<()> {
        self.execute(Method::PATCH, &format!("/calls/{}", id), Some(draft))
            .await
    }

    /// Edit from the details screen; the server's updated call is returned.
    pub async fn edit_call(&self, id: i64, edit: &CallEdit) -> Result<Call> {
        self.send_json(Method::PATCH, &format!("/calls/{}", id), edit)
            .await
    }

    pub async fn delete_call(&self, id: i64) -> Result<()> {
        self.delete(&format!("/calls/{}", id)).await
    }

    pub async fn list_follow_ups(&self, call_id: i64) -> Result<Vec<FollowUp>> {
        self.get_json(&format!("/calls/{}/follow_ups", call_id)).await
    }

    /// Multipart upload: description, type and at most one file.
    pub async fn add_follow_up(&self, call_id: i64, draft: &FollowUpDraft) -> Result<()> {
        self.send_multipart(&format!("/calls/{}/follow_ups", call_id), follow_up_form(draft))
            .await
    }

    pub async fn update_follow_up(&self, call_id: i64, id: i64, edit: &FollowUpEdit) -> Result<()> {
        self.execute(
            Method::PATCH,
            &format!("/calls/{}/follow_ups/{}", call_id, id),
            Some(edit),
        )
        .await
    }

    pub async fn delete_follow_up(&self, call_id: i64, id: i64) -> Result<()> {
        self.delete(&format!("/calls/{}/follow_ups/{}", call_id, id))
            .await
    }
}
