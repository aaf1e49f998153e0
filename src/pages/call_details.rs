use super::{Notice, Outcome, current_user, done, failed, forbidden, load_failed, rejected};
use crate::api::ApiClient;
use crate::core::call::{Call, CallEdit, FollowUp, FollowUpDraft, FollowUpEdit, FollowUpKind, Upload};
use crate::core::permissions::{Action, Section, allows};
use crate::core::user::User;
use crate::core::validation::require;
use crate::fl;

/// Attachment as shown in the thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentLink {
    pub file_name: String,
    pub url: String,
    /// Rendered inline as a thumbnail instead of a download link.
    pub is_image: bool,
}

#[derive(Debug, Clone)]
pub struct CallDetailsView {
    api: ApiClient,
    pub call_id: i64,
    pub call: Option<Call>,
    pub follow_ups: Vec<FollowUp>,
    pub users: Vec<User>,
    pub draft: FollowUpDraft,
    /// Follow-up being edited in place, with its working copy.
    pub editing: Option<(i64, FollowUpEdit)>,
    /// Working copy of the call while its edit form is open.
    pub call_edit: Option<CallEdit>,
}

impl CallDetailsView {
    pub fn new(api: ApiClient, call_id: i64) -> Self {
        Self {
            api,
            call_id,
            call: None,
            follow_ups: Vec::new(),
            users: Vec::new(),
            draft: FollowUpDraft::default(),
            editing: None,
            call_edit: None,
        }
    }

    pub async fn load(&mut self) -> Vec<Notice> {
        let (call, follow_ups, users) = futures::join!(
            self.api.get_call(self.call_id),
            self.api.list_follow_ups(self.call_id),
            self.api.list_users()
        );
        let mut notices = Vec::new();
        match call {
            Ok(c) => self.call = Some(c),
            Err(e) => notices.push(load_failed("call", &e, fl!("call-load-failed"))),
        }
        match follow_ups {
            Ok(list) => self.follow_ups = list,
            Err(e) => notices.push(load_failed("follow-ups", &e, fl!("follow-ups-load-failed"))),
        }
        match users {
            Ok(list) => self.users = list,
            Err(e) => notices.push(load_failed("users", &e, fl!("users-load-failed"))),
        }
        notices
    }

    /// Re-read both the call and its thread after a follow-up change.
    async fn refresh(&mut self) {
        let (call, follow_ups) = futures::join!(
            self.api.get_call(self.call_id),
            self.api.list_follow_ups(self.call_id)
        );
        match call {
            Ok(c) => self.call = Some(c),
            Err(e) => log::error!("Reloading call {} failed: {}", self.call_id, e),
        }
        match follow_ups {
            Ok(list) => self.follow_ups = list,
            Err(e) => log::error!("Reloading follow-ups of call {} failed: {}", self.call_id, e),
        }
    }

    pub fn attachments(&self, follow_up: &FollowUp) -> Vec<AttachmentLink> {
        follow_up
            .attachments
            .iter()
            .map(|a| AttachmentLink {
                file_name: a.file_name.clone(),
                url: a.url(self.api.base_url()),
                is_image: a.is_image(),
            })
            .collect()
    }

    fn staff(&self) -> Result<User, Outcome> {
        let user = current_user(self.api.session())?;
        if allows(&user.role, Section::FollowUps, Action::Create) {
            Ok(user)
        } else {
            Err(forbidden())
        }
    }

    pub fn attach(&mut self, file_name: &str, bytes: Vec<u8>) {
        self.draft.file = Some(Upload {
            file_name: file_name.to_string(),
            bytes,
        });
    }

    /// Post the new follow-up with its optional file, then reset the form.
    pub async fn add_follow_up(&mut self) -> Outcome {
        if let Err(out) = self.staff() {
            return out;
        }
        if let Err(e) = self.draft.validate() {
            return rejected(e);
        }
        if let Err(e) = self.api.add_follow_up(self.call_id, &self.draft).await {
            return failed("add follow-up", &e, fl!("follow-ups-save-failed"));
        }
        self.draft = FollowUpDraft::default();
        self.refresh().await;
        done(fl!("follow-ups-added"))
    }

    pub fn start_edit(&mut self, follow_up_id: i64) -> bool {
        let Some(fu) = self.follow_ups.iter().find(|f| f.id == follow_up_id) else {
            return false;
        };
        self.editing = Some((
            follow_up_id,
            FollowUpEdit {
                description: fu.description.clone(),
                kind: fu.kind,
            },
        ));
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub async fn save_edit(&mut self) -> Option<Outcome> {
        let (id, edit) = self.editing.clone()?;
        if let Err(out) = self.staff() {
            return Some(out);
        }
        if let Err(e) = edit.validate() {
            return Some(rejected(e));
        }
        if let Err(e) = self.api.update_follow_up(self.call_id, id, &edit).await {
            return Some(failed("update follow-up", &e, fl!("follow-ups-save-failed")));
        }
        self.editing = None;
        self.refresh().await;
        Some(done(fl!("follow-ups-updated")))
    }

    pub async fn delete_follow_up(&mut self, follow_up_id: i64) -> Outcome {
        if let Err(out) = self.staff() {
            return out;
        }
        if let Err(e) = self.api.delete_follow_up(self.call_id, follow_up_id).await {
            return failed("delete follow-up", &e, fl!("follow-ups-delete-failed"));
        }
        self.refresh().await;
        done(fl!("follow-ups-deleted"))
    }

    pub fn open_call_edit(&mut self) {
        self.call_edit = self.call.as_ref().map(CallEdit::from_call);
    }

    pub fn cancel_call_edit(&mut self) {
        self.call_edit = None;
    }

    /// Save the call edit. The screen shows what the server sends back.
    pub async fn save_call(&mut self) -> Option<Outcome> {
        let edit = self.call_edit.clone()?;
        if let Err(out) = self.staff() {
            return Some(out);
        }
        if let Err(e) = require(&edit.title, "title") {
            return Some(rejected(e));
        }
        match self.api.edit_call(self.call_id, &edit).await {
            Ok(call) => {
                self.call = Some(call);
                self.call_edit = None;
                Some(done(fl!("calls-updated")))
            }
            Err(e) => Some(failed("edit call", &e, fl!("calls-save-failed"))),
        }
    }

    pub fn solutions(&self) -> impl Iterator<Item = &FollowUp> {
        self.follow_ups.iter().filter(|f| f.kind == FollowUpKind::Solucao)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::user::Role;
    use crate::session::{Session, SessionProvider};

    fn view(role: Role) -> CallDetailsView {
        let session = SessionProvider::with_session(Session {
            token: "t".into(),
            user: User {
                id: 1,
                name: "u".into(),
                email: String::new(),
                role,
                contact: None,
                position: None,
                admission_date: None,
            },
        });
        let mut v = CallDetailsView::new(ApiClient::new("http://api.local/", session).unwrap(), 8);
        v.follow_ups = serde_json::from_str(
            r#"[
            {"id":1,"description":"Verificando","type":"comentario",
             "attachments":[{"file_name":"Print.PNG","file_url":"abc.png"},{"file_name":"log.txt","file_url":"def.txt"}]},
            {"id":2,"description":"Trocado o cabo","type":"solucao"}
        ]"#,
        )
        .unwrap();
        v
    }

    #[test]
    fn attachment_links() {
        let v = view(Role::Admin);
        let links = v.attachments(&v.follow_ups[0]);
        assert_eq!(links[0].url, "http://api.local/calls/uploads/abc.png");
        assert!(links[0].is_image);
        assert!(!links[1].is_image);
        assert_eq!(v.solutions().count(), 1);
    }

    #[test]
    fn edit_copies_follow_up() {
        let mut v = view(Role::Colaborador);
        assert!(v.start_edit(2));
        let (id, edit) = v.editing.clone().unwrap();
        assert_eq!(id, 2);
        assert_eq!(edit.kind, FollowUpKind::Solucao);
        v.cancel_edit();
        assert!(v.editing.is_none());
        assert!(!v.start_edit(99));
    }

    #[tokio::test]
    async fn blank_follow_up_sends_nothing() {
        let mut v = view(Role::Colaborador);
        v.draft.description = "  ".into();
        assert!(v.add_follow_up().await.is_rejected());
        let mut guest = view(Role::Convidado);
        guest.draft.description = "ok".into();
        assert!(guest.add_follow_up().await.is_rejected());
        assert!(guest.delete_follow_up(1).await.is_rejected());
    }
}
