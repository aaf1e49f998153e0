use super::layout::Route;
use super::{Notice, Outcome, Severity, current_user, done, failed, forbidden, load_failed, rejected};
use crate::api::ApiClient;
use crate::core::call::{Call, CallDraft, CallOrder, CallQuery};
use crate::core::client::Client;
use crate::core::permissions::{Action, Section, allows};
use crate::core::status::{CallStatus, Priority};
use crate::core::user::User;
use crate::fl;

/// Paginated call list. Filtering and paging happen on the server; every
/// filter change starts again from page 1.
#[derive(Debug, Clone)]
pub struct CallsView {
    api: ApiClient,
    pub calls: Vec<Call>,
    pub query: CallQuery,
    pub pages: u32,
    pub clients: Vec<Client>,
    pub users: Vec<User>,
    pub form: CallDraft,
    pub editing: Option<i64>,
}

impl CallsView {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            calls: Vec::new(),
            query: CallQuery::default(),
            pages: 1,
            clients: Vec::new(),
            users: Vec::new(),
            form: CallDraft::default(),
            editing: None,
        }
    }

    pub async fn load(&mut self) -> Vec<Notice> {
        let (calls, clients, users) = futures::join!(
            self.api.list_calls(&self.query),
            self.api.list_clients(),
            self.api.list_users()
        );
        let mut notices = Vec::new();
        match calls {
            Ok(page) => {
                self.query.page = page.page;
                self.pages = page.pages;
                self.calls = page.items;
            }
            Err(e) => notices.push(load_failed("calls", &e, fl!("calls-load-failed"))),
        }
        match clients {
            Ok(list) => self.clients = list,
            Err(e) => notices.push(load_failed("clients", &e, fl!("clients-load-failed"))),
        }
        match users {
            Ok(list) => self.users = list,
            Err(e) => notices.push(load_failed("users", &e, fl!("users-load-failed"))),
        }
        notices
    }

    /// Fetch the current page with the current filters.
    pub async fn fetch(&mut self) -> Option<Notice> {
        match self.api.list_calls(&self.query).await {
            Ok(page) => {
                self.query.page = page.page;
                self.pages = page.pages;
                self.calls = page.items;
                None
            }
            Err(e) => Some(load_failed("calls", &e, fl!("calls-load-failed"))),
        }
    }

    pub fn set_search(&mut self, term: &str) {
        self.query.search = term.to_string();
        self.query.page = 1;
    }

    pub fn set_status(&mut self, status: Option<CallStatus>) {
        self.query.status = status;
        self.query.page = 1;
    }

    pub fn set_priority(&mut self, priority: Option<Priority>) {
        self.query.priority = priority;
        self.query.page = 1;
    }

    pub fn set_order(&mut self, order: Option<CallOrder>) {
        self.query.order = order;
        self.query.page = 1;
    }

    pub fn reset_filters(&mut self) {
        self.query = CallQuery::default();
    }

    pub fn set_page(&mut self, page: u32) {
        self.query.page = page.clamp(1, self.pages.max(1));
    }

    pub fn open(&self, call_id: i64) -> Route {
        Route::Call(call_id)
    }

    pub fn can_create(&self) -> bool {
        self.api
            .session()
            .user()
            .is_some_and(|u| allows(&u.role, Section::Calls, Action::Create))
    }

    /// Edit and delete are offered to staff who opened the call.
    pub fn can_modify(&self, call: &Call) -> bool {
        self.api
            .session()
            .user()
            .is_some_and(|u| allows(&u.role, Section::Calls, Action::Edit) && call.is_opened_by(u.id))
    }

    pub fn open_create(&mut self) -> Result<(), Outcome> {
        if !self.can_create() {
            return Err(forbidden());
        }
        self.form = CallDraft::default();
        self.editing = None;
        Ok(())
    }

    pub fn open_edit(&mut self, call_id: i64) -> Result<(), Outcome> {
        let call = self
            .calls
            .iter()
            .find(|c| c.id == call_id)
            .filter(|c| self.can_modify(c))
            .ok_or_else(forbidden)?;
        self.form = CallDraft::from_call(call);
        self.editing = Some(call_id);
        Ok(())
    }

    pub async fn save(&mut self) -> Outcome {
        let user = match current_user(self.api.session()) {
            Ok(u) => u,
            Err(out) => return out,
        };
        let permitted = match self.editing {
            Some(_) => allows(&user.role, Section::Calls, Action::Edit),
            None => allows(&user.role, Section::Calls, Action::Create),
        };
        if !permitted {
            return forbidden();
        }
        if let Err(e) = self.form.validate() {
            return rejected(e);
        }
        let outcome = match self.editing {
            Some(id) => match self.api.update_call(id, &self.form).await {
                Ok(()) => done(fl!("calls-updated")),
                Err(e) => return failed("update call", &e, fl!("calls-save-failed")),
            },
            None => match self.api.create_call(&self.form).await {
                Ok(()) => done(fl!("calls-created")),
                Err(e) => return failed("create call", &e, fl!("calls-save-failed")),
            },
        };
        self.form = CallDraft::default();
        self.editing = None;
        if let Some(n) = self.fetch().await {
            log::warn!("Call list not refreshed: {}", n.message);
        }
        outcome
    }

    pub async fn delete(&mut self, call_id: i64) -> Outcome {
        match self.calls.iter().find(|c| c.id == call_id) {
            Some(call) if self.can_modify(call) => {}
            _ => return forbidden(),
        }
        if let Err(e) = self.api.delete_call(call_id).await {
            return failed("delete call", &e, fl!("calls-delete-failed"));
        }
        if let Some(n) = self.fetch().await {
            log::warn!("Call list not refreshed: {}", n.message);
        }
        Outcome::Done(Notice::new(Severity::Info, fl!("calls-deleted")))
    }
}
