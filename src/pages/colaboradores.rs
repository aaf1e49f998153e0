use super::{Notice, Outcome, current_user, done, failed, forbidden, load_failed, rejected};
use crate::api::ApiClient;
use crate::core::permissions::{Action, Section, allows};
use crate::core::user::{User, UserDraft};
use crate::core::validation::{ValidationError, require};
use crate::fl;

/// Collaborator list. Everybody who reaches it may look; only admins change it.
#[derive(Debug, Clone)]
pub struct ColaboradoresView {
    api: ApiClient,
    pub users: Vec<User>,
    pub form: UserDraft,
    pub editing: Option<i64>,
}

impl ColaboradoresView {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            users: Vec::new(),
            form: UserDraft::new(),
            editing: None,
        }
    }

    pub async fn load(&mut self) -> Vec<Notice> {
        match self.api.list_users().await {
            Ok(list) => {
                self.users = list;
                Vec::new()
            }
            Err(e) => vec![load_failed("users", &e, fl!("users-load-failed"))],
        }
    }

    pub fn can_manage(&self) -> bool {
        self.api
            .session()
            .user()
            .is_some_and(|u| allows(&u.role, Section::Users, Action::Edit))
    }

    pub fn open_create(&mut self) -> Result<(), Outcome> {
        if !self.can_manage() {
            return Err(forbidden());
        }
        self.form = UserDraft::new();
        self.editing = None;
        Ok(())
    }

    pub fn open_edit(&mut self, user_id: i64) -> Result<(), Outcome> {
        if !self.can_manage() {
            return Err(forbidden());
        }
        let user = self
            .users
            .iter()
            .find(|u| u.id == user_id)
            .ok_or_else(forbidden)?;
        self.form = UserDraft::from_user(user);
        self.editing = Some(user_id);
        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.form.name, "name")?;
        require(&self.form.email, "email")?;
        if self.editing.is_none() && self.form.password.is_none() {
            return Err(ValidationError::Missing("password"));
        }
        Ok(())
    }

    /// Create, or update the user being edited. An edit without a new
    /// password leaves the stored one alone.
    pub async fn save(&mut self) -> Outcome {
        let me = match current_user(self.api.session()) {
            Ok(u) => u,
            Err(out) => return out,
        };
        if !allows(&me.role, Section::Users, Action::Edit) {
            return forbidden();
        }
        if let Err(e) = self.validate() {
            return rejected(e);
        }
        let outcome = match self.editing {
            Some(id) => match self.api.update_user(id, &self.form).await {
                Ok(()) => done(fl!("users-updated")),
                Err(e) => return failed("update user", &e, fl!("users-save-failed")),
            },
            None => match self.api.create_user(&self.form).await {
                Ok(()) => done(fl!("users-created")),
                Err(e) => return failed("create user", &e, fl!("users-save-failed")),
            },
        };
        self.form = UserDraft::new();
        self.editing = None;
        self.load().await;
        outcome
    }

    pub async fn delete(&mut self, user_id: i64) -> Outcome {
        if !self.can_manage() {
            return forbidden();
        }
        if let Err(e) = self.api.delete_user(user_id).await {
            return failed("delete user", &e, fl!("users-delete-failed"));
        }
        log::info!("Deleted user {}", user_id);
        self.load().await;
        done(fl!("users-deleted"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::user::Role;
    use crate::session::{Session, SessionProvider};

    fn view(role: Role) -> ColaboradoresView {
        let session = SessionProvider::with_session(Session {
            token: "t".into(),
            user: User {
                id: 1,
                name: "Admin".into(),
                email: "a@x.com".into(),
                role,
                contact: None,
                position: None,
                admission_date: None,
            },
        });
        let mut v = ColaboradoresView::new(ApiClient::new("http://localhost:9", session).unwrap());
        v.users = serde_json::from_str(r#"[{"id":4,"name":"Bia","email":"b@x.com","role":"colaborador"}]"#)
            .unwrap();
        v
    }

    #[test]
    fn create_requires_password_edit_does_not() {
        let mut v = view(Role::Admin);
        v.open_create().unwrap();
        v.form.name = "Novo".into();
        v.form.email = "n@x.com".into();
        assert_eq!(v.validate(), Err(ValidationError::Missing("password")));
        v.form.set_password("s3nha");
        assert!(v.validate().is_ok());

        v.open_edit(4).unwrap();
        assert_eq!(v.form.password, None);
        assert!(v.validate().is_ok());
    }

    #[tokio::test]
    async fn non_admin_cannot_change_users() {
        let mut v = view(Role::Colaborador);
        assert!(v.open_create().is_err());
        assert!(v.open_edit(4).is_err());
        assert!(v.save().await.is_rejected());
        assert!(v.delete(4).await.is_rejected());
    }
}
