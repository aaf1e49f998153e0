use super::layout::Route;
use super::{Notice, Outcome, done, failed, load_failed, rejected};
use crate::api::ApiClient;
use crate::core::client::{Client, ClientDraft};
use crate::fl;

#[derive(Debug, Clone)]
pub struct ClientsView {
    api: ApiClient,
    pub clients: Vec<Client>,
    pub search: String,
    pub form: ClientDraft,
}

impl ClientsView {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            clients: Vec::new(),
            search: String::new(),
            form: ClientDraft::default(),
        }
    }

    pub async fn load(&mut self) -> Vec<Notice> {
        match self.api.list_clients().await {
            Ok(list) => {
                self.clients = list;
                Vec::new()
            }
            Err(e) => vec![load_failed("clients", &e, fl!("clients-load-failed"))],
        }
    }

    /// Search on name, contact e-mail and owner.
    pub fn filtered(&self) -> Vec<&Client> {
        let term = self.search.trim();
        self.clients
            .iter()
            .filter(|c| term.is_empty() || c.matches(term))
            .collect()
    }

    pub fn open(&self, client_id: i64) -> Route {
        Route::Client(client_id)
    }

    pub fn open_form(&mut self) {
        self.form = ClientDraft::default();
    }

    /// Typing into the document field keeps the CPF/CNPJ mask applied.
    pub fn type_document(&mut self, input: &str) {
        self.form.set_document(input);
    }

    pub fn type_phone(&mut self, input: &str) {
        self.form.set_phone(input);
    }

    pub async fn create(&mut self) -> Outcome {
        if let Err(e) = self.form.validate() {
            return rejected(e);
        }
        if let Err(e) = self.api.create_client(&self.form).await {
            return failed("create client", &e, fl!("clients-create-failed"));
        }
        log::info!("Created client {}", self.form.name);
        self.form = ClientDraft::default();
        if let Err(e) = self.api.list_clients().await.map(|list| self.clients = list) {
            log::error!("Reloading clients failed: {}", e);
        }
        done(fl!("clients-created"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionProvider;

    fn view() -> ClientsView {
        let mut v = ClientsView::new(ApiClient::new("http://localhost:9", SessionProvider::new()).unwrap());
        v.clients = serde_json::from_str(
            r#"[
            {"id":1,"name":"Padaria Sol","contactEmail":"contato@sol.com","ownerName":"Rui"},
            {"id":2,"name":"Oficina","contactEmail":"oficina@x.com","ownerName":"Marta Sol"},
            {"id":3,"name":"Mercado","contactEmail":null}
        ]"#,
        )
        .unwrap();
        v
    }

    #[test]
    fn search_covers_owner_and_email() {
        let mut v = view();
        v.search = "SOL".into();
        let ids: Vec<i64> = v.filtered().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);
        v.search = "  ".into();
        assert_eq!(v.filtered().len(), 3);
    }

    #[test]
    fn typing_applies_masks() {
        let mut v = view();
        v.type_document("12345678000195");
        v.type_phone("11987654321");
        assert_eq!(v.form.cnpj, "12.345.678/0001-95");
        assert_eq!(v.form.contact_phone, "(11) 98765-4321");
        assert_eq!(v.open(3), Route::Client(3));
    }

    #[tokio::test]
    async fn nameless_client_is_rejected() {
        let mut v = view();
        v.open_form();
        assert!(v.create().await.is_rejected());
    }
}
