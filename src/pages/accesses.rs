use futures::future::join_all;

use super::Notice;
use super::load_failed;
use crate::api::ApiClient;
use crate::core::access::AccessField;
use crate::core::client::Client;
use crate::core::paging::Paginator;
use crate::fl;

pub const ACCESSES_PER_PAGE: usize = 5;

/// One access field with the client it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessRow {
    pub client_id: i64,
    pub client_name: String,
    pub field: AccessField,
}

impl AccessRow {
    pub fn value(&self) -> String {
        self.field.field_value.lines().join(", ")
    }
}

/// Read-only overview of every client's access records.
#[derive(Debug, Clone)]
pub struct AccessesView {
    api: ApiClient,
    pub rows: Vec<AccessRow>,
    pub search: String,
    pub paginator: Paginator,
}

impl AccessesView {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            rows: Vec::new(),
            search: String::new(),
            paginator: Paginator::new(ACCESSES_PER_PAGE),
        }
    }

    /// Fetch the clients, then every client's accesses concurrently. A
    /// client whose accesses fail to load is skipped with one notice.
    pub async fn load(&mut self) -> Vec<Notice> {
        let clients = match self.api.list_clients().await {
            Ok(list) => list,
            Err(e) => return vec![load_failed("clients", &e, fl!("clients-load-failed"))],
        };
        let results = join_all(clients.iter().map(|c| self.api.list_accesses(c.id))).await;

        let mut notices = Vec::new();
        let mut rows = Vec::new();
        for (client, result) in clients.iter().zip(results) {
            match result {
                Ok(fields) => rows.extend(rows_for(client, fields)),
                Err(e) => notices.push(load_failed(
                    "accesses",
                    &e,
                    fl!("accesses-client-failed", client = client.name.as_str()),
                )),
            }
        }
        self.rows = rows;
        self.paginator.clamp(self.filtered().len());
        notices
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
        self.paginator.set_page(1);
    }

    /// Search on client, card and field names.
    pub fn filtered(&self) -> Vec<&AccessRow> {
        let term = self.search.trim().to_lowercase();
        self.rows
            .iter()
            .filter(|r| {
                term.is_empty()
                    || [r.client_name.as_str(), r.field.card(), r.field.field_name.as_str()]
                        .iter()
                        .any(|s| s.to_lowercase().contains(&term))
            })
            .collect()
    }

    pub fn page(&self) -> Vec<&AccessRow> {
        let rows = self.filtered();
        self.paginator.slice(&rows).to_vec()
    }

    pub fn total_pages(&self) -> usize {
        self.paginator.total_pages(self.filtered().len())
    }
}

fn rows_for(client: &Client, fields: Vec<AccessField>) -> impl Iterator<Item = AccessRow> + '_ {
    fields.into_iter().map(move |field| AccessRow {
        client_id: client.id,
        client_name: client.name.clone(),
        field,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionProvider;

    #[test]
    fn search_spans_client_and_card() {
        let mut v = AccessesView::new(ApiClient::new("http://localhost:9", SessionProvider::new()).unwrap());
        let client: Client = serde_json::from_str(r#"{"id":2,"name":"Padaria"}"#).unwrap();
        let fields: Vec<AccessField> = serde_json::from_str(
            r#"[
            {"id":1,"card_name":"Servidor","field_name":"IP","field_value":"10.0.0.1"},
            {"id":2,"card_name":null,"field_name":"Contas","field_value":["a","b"]}
        ]"#,
        )
        .unwrap();
        v.rows = rows_for(&client, fields).collect();
        assert_eq!(v.rows[1].value(), "a, b");

        v.set_search("padaria");
        assert_eq!(v.filtered().len(), 2);
        v.set_search("sem tít");
        assert_eq!(v.filtered().len(), 1);
        assert_eq!(v.total_pages(), 1);
    }
}
