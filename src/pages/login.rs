use super::layout::Route;
use super::{Notice, Outcome, done, failed, rejected};
use crate::api::ApiClient;
use crate::core::validation::{ValidationError, require};
use crate::fl;
use crate::session::Session;
use crate::session::store::SessionStore;

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.email, "email")?;
        require(&self.password, "password")
    }
}

/// Log in, persist the session and make it current. On success the
/// console continues at [`Route::HOME`].
pub async fn submit(api: &ApiClient, store: &SessionStore, form: &LoginForm) -> (Outcome, Route) {
    if let Err(e) = form.validate() {
        return (rejected(e), Route::Login);
    }

    let session: Session = match api.login(form.email.trim(), &form.password).await {
        Ok(resp) => resp.into(),
        Err(e) => {
            return (
                failed("login", &e, fl!("login-invalid-credentials")),
                Route::Login,
            );
        }
    };

    if let Err(e) = store.save(&session).await {
        log::error!("Failed to persist session: {}", e);
    }
    let name = session.user.name.clone();
    api.session().set(session);
    (done(fl!("login-welcome", name = name)), Route::HOME)
}

/// Restore a saved session at startup.
pub async fn restore(api: &ApiClient, store: &SessionStore) -> Option<Notice> {
    match store.load().await {
        Ok(Some(session)) => {
            log::info!("Restored session for {}", session.user.email);
            api.session().set(session);
            None
        }
        Ok(None) => None,
        Err(e) => {
            log::warn!("Ignoring stored session: {}", e);
            Some(Notice::new(super::Severity::Warning, fl!("login-session-unreadable")))
        }
    }
}
