use std::collections::HashMap;

use super::layout::Route;
use super::{Notice, Outcome, done, failed, load_failed, rejected};
use crate::api::ApiClient;
use crate::core::access::{
    AccessField, AccessPayload, Card, RenameCard, ReorderCards, build_cards, filter_cards, reorder_cards,
};
use crate::core::client::{Client, ClientDraft};
use crate::core::paging::Paginator;
use crate::core::validation::require;
use crate::fl;

pub const CARDS_PER_PAGE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(i64),
}

/// Multi-value field editor. Always holds at least one value.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEditor {
    pub mode: EditorMode,
    pub card_name: String,
    pub field_name: String,
    pub values: Vec<String>,
}

impl FieldEditor {
    fn create(card_name: &str) -> Self {
        Self {
            mode: EditorMode::Create,
            card_name: card_name.to_string(),
            field_name: String::new(),
            values: vec![String::new()],
        }
    }

    fn edit(field: &AccessField) -> Self {
        Self {
            mode: EditorMode::Edit(field.id),
            card_name: field.card_name.clone().unwrap_or_default(),
            field_name: field.field_name.clone(),
            values: field.field_value.edit_values(),
        }
    }

    pub fn add_value(&mut self) {
        self.values.push(String::new());
    }

    pub fn remove_value(&mut self, index: usize) {
        if self.values.len() > 1 && index < self.values.len() {
            self.values.remove(index);
        }
    }

    pub fn set_value(&mut self, index: usize, value: &str) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value.to_string();
        }
    }
}

/// New-card dialog: card name plus its first field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCard {
    pub card_name: String,
    pub field_name: String,
    pub field_value: String,
}

#[derive(Debug, Clone)]
pub struct ClientDetailView {
    api: ApiClient,
    pub client_id: i64,
    pub client: Option<Client>,
    pub cards: Vec<Card>,
    pub search: String,
    pub paginator: Paginator,
    expanded: HashMap<String, bool>,
    pub client_form: ClientDraft,
    pub new_card: NewCard,
    pub editor: Option<FieldEditor>,
}

impl ClientDetailView {
    pub fn new(api: ApiClient, client_id: i64) -> Self {
        Self {
            api,
            client_id,
            client: None,
            cards: Vec::new(),
            search: String::new(),
            paginator: Paginator::new(CARDS_PER_PAGE),
            expanded: HashMap::new(),
            client_form: ClientDraft::default(),
            new_card: NewCard::default(),
            editor: None,
        }
    }

    pub async fn load(&mut self) -> Vec<Notice> {
        let (client, accesses) = futures::join!(
            self.api.get_client(self.client_id),
            self.api.list_accesses(self.client_id)
        );
        let mut notices = Vec::new();
        match client {
            Ok(c) => self.client = Some(c),
            Err(e) => notices.push(load_failed("client", &e, fl!("client-load-failed"))),
        }
        match accesses {
            Ok(rows) => self.set_rows(&rows),
            Err(e) => notices.push(load_failed("accesses", &e, fl!("accesses-load-failed"))),
        }
        notices
    }

    async fn reload_accesses(&mut self) {
        match self.api.list_accesses(self.client_id).await {
            Ok(rows) => self.set_rows(&rows),
            Err(e) => log::error!("Reloading accesses of client {} failed: {}", self.client_id, e),
        }
    }

    fn set_rows(&mut self, rows: &[AccessField]) {
        self.cards = build_cards(rows);
        self.paginator.clamp(self.filtered().len());
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
        self.paginator.clamp(self.filtered().len());
    }

    pub fn filtered(&self) -> Vec<&Card> {
        filter_cards(&self.cards, self.search.trim())
    }

    pub fn page(&self) -> Vec<&Card> {
        let cards = self.filtered();
        self.paginator.slice(&cards).to_vec()
    }

    pub fn total_pages(&self) -> usize {
        self.paginator.total_pages(self.filtered().len())
    }

    pub fn is_expanded(&self, card: &str) -> bool {
        self.expanded.get(card).copied().unwrap_or(false)
    }

    pub fn toggle(&mut self, card: &str) {
        let open = self.is_expanded(card);
        self.expanded.insert(card.to_string(), !open);
    }

    fn set_all(&mut self, open: bool) {
        let names: Vec<String> = self.filtered().iter().map(|c| c.name.clone()).collect();
        for name in names {
            self.expanded.insert(name, open);
        }
    }

    pub fn expand_all(&mut self) {
        self.set_all(true);
    }

    pub fn collapse_all(&mut self) {
        self.set_all(false);
    }

    /// Drag of the shown card at `from` to `to`. The new order is applied
    /// locally right away; a failed save only produces a notice.
    pub async fn move_card(&mut self, from: usize, to: usize) -> Option<Outcome> {
        let visible: Vec<String> = self.page().iter().map(|c| c.name.clone()).collect();
        let names: Vec<&str> = visible.iter().map(String::as_str).collect();
        let merged = reorder_cards(&self.cards, &names, from, to)?;
        self.cards = merged;
        let order = ReorderCards::from_cards(&self.cards);
        Some(match self.api.reorder_cards(self.client_id, &order).await {
            Ok(()) => done(fl!("cards-reordered")),
            Err(e) => failed("reorder cards", &e, fl!("cards-reorder-failed")),
        })
    }

    pub fn open_new_card(&mut self) {
        self.new_card = NewCard::default();
    }

    pub async fn create_card(&mut self) -> Outcome {
        let payload = match AccessPayload::new_card(
            &self.new_card.card_name,
            &self.new_card.field_name,
            &self.new_card.field_value,
        ) {
            Ok(p) => p,
            Err(e) => return rejected(e),
        };
        if let Err(e) = self.api.create_access(self.client_id, &payload).await {
            return failed("create card", &e, fl!("cards-save-failed"));
        }
        self.new_card = NewCard::default();
        self.reload_accesses().await;
        done(fl!("cards-created"))
    }

    pub fn open_create_field(&mut self, card: &str) {
        self.editor = Some(FieldEditor::create(card));
    }

    pub fn open_edit_field(&mut self, field_id: i64) -> bool {
        let field = self
            .cards
            .iter()
            .flat_map(|c| &c.fields)
            .find(|f| f.id == field_id);
        match field {
            Some(f) => {
                self.editor = Some(FieldEditor::edit(f));
                true
            }
            None => false,
        }
    }

    /// Save the open field editor. Values always go out as a list.
    pub async fn save_field(&mut self) -> Option<Outcome> {
        let editor = self.editor.clone()?;
        if let Err(e) = require(&editor.card_name, "card_name").and(require(&editor.field_name, "field_name")) {
            return Some(rejected(e));
        }
        let payload = AccessPayload::multi(&editor.card_name, &editor.field_name, editor.values);
        let result = match editor.mode {
            EditorMode::Create => self.api.create_access(self.client_id, &payload).await,
            EditorMode::Edit(id) => self.api.update_access(self.client_id, id, &payload).await,
        };
        if let Err(e) = result {
            return Some(failed("save field", &e, fl!("fields-save-failed")));
        }
        self.editor = None;
        self.reload_accesses().await;
        Some(done(fl!("fields-saved")))
    }

    pub async fn delete_field(&mut self, field_id: i64) -> Outcome {
        if let Err(e) = self.api.delete_access(self.client_id, field_id).await {
            return failed("delete field", &e, fl!("fields-delete-failed"));
        }
        self.reload_accesses().await;
        done(fl!("fields-deleted"))
    }

    pub async fn rename_card(&mut self, old: &str, new: &str) -> Outcome {
        let rename = match RenameCard::new(old, new.trim()) {
            Ok(r) => r,
            Err(e) => return rejected(e),
        };
        if let Err(e) = self.api.rename_card(self.client_id, &rename).await {
            return failed("rename card", &e, fl!("cards-save-failed"));
        }
        if let Some(open) = self.expanded.remove(old) {
            self.expanded.insert(rename.new_card_name.clone(), open);
        }
        self.reload_accesses().await;
        done(fl!("cards-renamed"))
    }

    pub async fn delete_card(&mut self, name: &str) -> Outcome {
        if let Err(e) = self.api.delete_card(self.client_id, name).await {
            return failed("delete card", &e, fl!("cards-delete-failed"));
        }
        self.expanded.remove(name);
        self.reload_accesses().await;
        done(fl!("cards-deleted"))
    }

    pub fn open_edit_client(&mut self) {
        if let Some(c) = &self.client {
            self.client_form = ClientDraft::from_client(c);
        }
    }

    pub async fn save_client(&mut self) -> Outcome {
        if let Err(e) = self.client_form.validate() {
            return rejected(e);
        }
        if let Err(e) = self.api.update_client(self.client_id, &self.client_form).await {
            return failed("update client", &e, fl!("clients-save-failed"));
        }
        match self.api.get_client(self.client_id).await {
            Ok(c) => self.client = Some(c),
            Err(e) => log::error!("Reloading client {} failed: {}", self.client_id, e),
        }
        done(fl!("clients-updated"))
    }

    /// Delete the client; on success the console returns to the client list.
    pub async fn delete_client(&mut self) -> (Outcome, Option<Route>) {
        if let Err(e) = self.api.delete_client(self.client_id).await {
            return (failed("delete client", &e, fl!("clients-delete-failed")), None);
        }
        log::info!("Deleted client {}", self.client_id);
        self.client = None;
        (done(fl!("clients-deleted")), Some(Route::Clients))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionProvider;

    fn rows() -> Vec<AccessField> {
        serde_json::from_str(
            r#"[
            {"id":1,"card_name":"Servidor","card_order":0,"field_name":"IP","field_value":"10.0.0.1"},
            {"id":2,"card_name":"Email","card_order":1,"field_name":"Contas","field_value":"[\"a@x\",\"b@x\"]"},
            {"id":3,"card_name":"Wi-Fi","card_order":2,"field_name":"Senha","field_value":"abc"},
            {"id":4,"card_name":"Roteador","card_order":3,"field_name":"IP","field_value":"10.0.0.254"},
            {"id":5,"card_name":"VPN","card_order":4,"field_name":"Host","field_value":"vpn.x"},
            {"id":6,"card_name":"ERP","card_order":5,"field_name":"URL","field_value":"erp.x"},
            {"id":7,"card_name":"Servidor","card_order":0,"field_name":"Usuário","field_value":"root"}
        ]"#,
        )
        .unwrap()
    }

    fn view() -> ClientDetailView {
        let mut v = ClientDetailView::new(ApiClient::new("http://localhost:9", SessionProvider::new()).unwrap(), 3);
        v.set_rows(&rows());
        v
    }

    #[test]
    fn cards_paginate_by_five() {
        let mut v = view();
        assert_eq!(v.cards.len(), 6);
        assert_eq!(v.total_pages(), 2);
        v.paginator.set_page(2);
        assert_eq!(v.page().len(), 1);
        // narrowing the search drops back to the first page
        v.set_search("or");
        assert_eq!(v.paginator.page, 1);
        let names: Vec<&str> = v.filtered().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Servidor", "Roteador"]);
    }

    #[test]
    fn expand_all_covers_filtered_cards() {
        let mut v = view();
        v.set_search("e");
        v.expand_all();
        assert!(v.is_expanded("Servidor"));
        assert!(!v.is_expanded("Wi-Fi"));
        v.toggle("Servidor");
        assert!(!v.is_expanded("Servidor"));
        v.collapse_all();
        assert!(!v.is_expanded("Email"));
    }

    #[test]
    fn field_editor_keeps_one_value() {
        let mut v = view();
        assert!(v.open_edit_field(2));
        let editor = v.editor.as_mut().unwrap();
        assert_eq!(editor.values, vec!["a@x", "b@x"]);
        editor.remove_value(0);
        editor.remove_value(0);
        assert_eq!(editor.values, vec!["b@x"]);
        editor.add_value();
        editor.set_value(1, "c@x");
        assert_eq!(editor.values, vec!["b@x", "c@x"]);
        assert_eq!(editor.mode, EditorMode::Edit(2));
    }

    #[tokio::test]
    async fn noop_move_sends_nothing() {
        let mut v = view();
        assert!(v.move_card(1, 1).await.is_none());
        assert!(v.move_card(0, 9).await.is_none());
    }

    #[tokio::test]
    async fn card_forms_validate_locally() {
        let mut v = view();
        v.new_card.card_name = "Novo".into();
        assert!(v.create_card().await.is_rejected());
        assert!(v.rename_card("Servidor", "  ").await.is_rejected());
        v.open_create_field("Servidor");
        assert!(v.save_field().await.unwrap().is_rejected());
    }
}
