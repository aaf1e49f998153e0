use reqwest::Method;

use super::{ApiClient, Result};
use crate::core::access::{AccessField, AccessPayload, DeleteCard, RenameCard, ReorderCards};
use crate::core::client::{Client, ClientDraft};

impl ApiClient {
    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        self.get_json("/clients/list").await
    }

    pub async fn get_client(&self, id: i64) -> Result<Client> {
        self.get_json(&format!("/clients/{}", id)).await
    }

    pub async fn create_client(&self, draft: &ClientDraft) -> Result<()> {
        self.execute(Method::POST, "/clients/", Some(draft)).await
    }

    pub async fn update_client(&self, id: i64, draft: &ClientDraft) -> Result<()> {
        self.execute(Method::PATCH, &format!("/clients/{}", id), Some(draft))
            .await
    }

    pub async fn delete_client(&self, id: i64) -> Result<()> {
        self.delete(&format!("/clients/{}", id)).await
    }

    pub async fn list_accesses(&self, client_id: i64) -> Result<Vec<AccessField>> {
        self.get_json(&format!("/clients/{}/accesses", client_id)).await
    }

    pub async fn create_access(&self, client_id: i64, payload: &AccessPayload) -> Result<()> {
        self.execute(
            Method::POST,
            &format!("/clients/{}/accesses", client_id),
            Some(payload),
        )
        .await
    }

    pub async fn update_access(&self, client_id: i64, id: i64, payload: &AccessPayload) -> Result<()> {
        self.execute(
            Method::PATCH,
            &format!("/clients/{}/accesses/{}", client_id, id),
            Some(payload),
        )
        .await
    }

    pub async fn delete_access(&self, client_id: i64, id: i64) -> Result<()> {
        self.delete(&format!("/clients/{}/accesses/{}", client_id, id))
            .await
    }

    /// Renames every row of the card.
    pub async fn rename_card(&self, client_id: i64, rename: &RenameCard) -> Result<()> {
        self.execute(
            Method::PATCH,
            &format!("/clients/{}/cards/rename", client_id),
            Some(rename),
        )
        .await
    }

    /// Deletes every row of the card. The name travels in the DELETE body.
    pub async fn delete_card(&self, client_id: i64, card_name: &str) -> Result<()> {
        let body = DeleteCard {
            card_name: card_name.to_string(),
        };
        self.execute(
            Method::DELETE,
            &format!("/clients/{}/cards/delete", client_id),
            Some(&body),
        )
        .await
    }

    pub async fn reorder_cards(&self, client_id: i64, order: &ReorderCards) -> Result<()> {
        self.execute(
            Method::PATCH,
            &format!("/clients/{}/cards/reorder", client_id),
            Some(order),
        )
        .await
    }
}
