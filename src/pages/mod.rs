//! One view model per console screen.
//!
//! A view owns the collections it fetched plus its filter, pagination and
//! form state. Mutations validate locally, call the API and re-fetch; the
//! result of each comes back as an [`Outcome`] carrying a localized notice.

pub mod accesses;
pub mod appointments;
pub mod call_details;
pub mod calls;
pub mod client_detail;
pub mod clients;
pub mod colaboradores;
pub mod layout;
pub mod login;
pub mod project_detail;
pub mod projects;
pub mod tasks;

use chrono::NaiveDateTime;

use crate::api::ApiError;
use crate::core::dates;
use crate::core::user::User;
use crate::core::validation::ValidationError;
use crate::fl;
use crate::session::SessionProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }
}

/// Result of a user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The API accepted the change.
    Done(Notice),
    /// Blocked locally; no request was sent.
    Rejected(Notice),
    /// The request failed.
    Failed(Notice),
}

impl Outcome {
    pub fn notice(&self) -> &Notice {
        match self {
            Self::Done(n) | Self::Rejected(n) | Self::Failed(n) => n,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

pub(crate) fn done(message: String) -> Outcome {
    Outcome::Done(Notice::success(message))
}

pub(crate) fn rejected(err: ValidationError) -> Outcome {
    Outcome::Rejected(Notice::new(Severity::Warning, validation_message(&err)))
}

pub(crate) fn forbidden() -> Outcome {
    rejected(ValidationError::Forbidden)
}

/// Log the failure and turn it into the notice the user sees.
pub(crate) fn failed(what: &str, err: &ApiError, message: String) -> Outcome {
    log::error!("{} failed: {}", what, err);
    Outcome::Failed(Notice::error(message))
}

/// Notice for a failed load; each collection reports on its own.
pub(crate) fn load_failed(what: &str, err: &ApiError, message: String) -> Notice {
    log::error!("Loading {} failed: {}", what, err);
    Notice::error(message)
}

pub fn validation_message(err: &ValidationError) -> String {
    match err {
        ValidationError::Missing(field) => fl!("notice-missing-field", field = field_label(field)),
        ValidationError::EndBeforeStart => fl!("notice-end-before-start"),
        ValidationError::Overlap { user, start, end } => fl!(
            "notice-overlap",
            user = user.as_str(),
            start = start.format("%d/%m %H:%M").to_string(),
            end = end.format("%H:%M").to_string()
        ),
        ValidationError::Forbidden => fl!("notice-forbidden"),
    }
}

fn field_label(field: &str) -> String {
    match field {
        "title" => fl!("field-title"),
        "name" => fl!("field-name"),
        "email" => fl!("field-email"),
        "password" => fl!("field-password"),
        "date" => fl!("field-date"),
        "start_time" => fl!("field-start-time"),
        "end_time" => fl!("field-end-time"),
        "description" => fl!("field-description"),
        "card_name" | "old_card_name" => fl!("field-card-name"),
        "new_card_name" => fl!("field-new-card-name"),
        "field_name" => fl!("field-field-name"),
        "responsible_user_id" => fl!("field-responsible"),
        "assigned_to_user_id" => fl!("field-assignee"),
        "target_date" => fl!("field-target-date"),
        "source_date" => fl!("field-source-date"),
        "source_start" => fl!("field-source-start"),
        "source_end" => fl!("field-source-end"),
        other => other.to_string(),
    }
}

/// The logged-in user, or the notice to show when there is none.
pub(crate) fn current_user(session: &SessionProvider) -> Result<User, Outcome> {
    session
        .user()
        .ok_or_else(|| Outcome::Rejected(Notice::new(Severity::Warning, fl!("notice-login-required"))))
}

pub(crate) fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Cut `text` to `max` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

pub fn format_timestamp(dt: Option<NaiveDateTime>) -> String {
    dt.map(|dt| dt.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_day(d: Option<chrono::NaiveDate>) -> String {
    d.map(|d| dates::format_date(&d))
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate("ação rápida", 4), "ação...");
        assert_eq!(truncate("curto", 100), "curto");
    }

    #[test]
    fn outcome_accessors() {
        let out = rejected(ValidationError::EndBeforeStart);
        assert!(out.is_rejected());
        assert_eq!(out.notice().severity, Severity::Warning);
        assert!(!out.notice().message.is_empty());
    }
}
