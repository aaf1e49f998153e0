use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::dates;
use super::project::ProjectRef;
use super::status::{Priority, TaskStatus, display_status};
use super::user::{Role, User, UserRef};
use super::validation::{ValidationError, check_order, require};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default, with = "dates::opt_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "dates::opt_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub assigned_to: Option<UserRef>,
    #[serde(default)]
    pub project: Option<ProjectRef>,
}

/// What clicking a task card offers the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    /// Unassigned: take it.
    Assume,
    /// Assigned to me: mark it done.
    Complete,
}

impl Task {
    pub fn display_status(&self, now: NaiveDateTime) -> TaskStatus {
        display_status(self.due_date, &self.status, now)
    }

    pub fn is_done(&self) -> bool {
        self.status.as_str().to_lowercase().contains("conclu")
    }

    pub fn is_assigned_to(&self, user_id: i64) -> bool {
        self.assigned_to.as_ref().is_some_and(|u| u.id == user_id)
    }

    pub fn click_action(&self, user_id: i64) -> Option<TaskAction> {
        if self.is_done() {
            return None;
        }
        match &self.assigned_to {
            None => Some(TaskAction::Assume),
            Some(u) if u.id == user_id => Some(TaskAction::Complete),
            Some(_) => None,
        }
    }
}

/// Create/edit form for a task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub project_id: Option<i64>,
    pub assigned_to_user_id: Option<i64>,
}

/// Body of `POST /tasks/create` and `PATCH /tasks/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskPayload {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none", with = "dates::opt_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none", with = "dates::opt_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_user_id: Option<i64>,
}

impl TaskDraft {
    /// Prefill an edit form. A task shown as overdue comes back as "Em Andamento".
    pub fn from_task(task: &Task, now: NaiveDateTime) -> Self {
        let status = match task.display_status(now) {
            TaskStatus::EmAtraso => TaskStatus::EmAndamento,
            other => other,
        };
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: Some(status),
            priority: task.priority.clone(),
            start_date: task.start_date,
            due_date: task.due_date,
            project_id: task.project.as_ref().map(|p| p.id),
            assigned_to_user_id: task.assigned_to.as_ref().map(|u| u.id),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.title, "title")?;
        check_order(self.start_date, self.due_date)
    }

    /// Payload for an edit, with the create defaults for empty status/priority.
    pub fn payload(&self) -> Result<TaskPayload, ValidationError> {
        self.validate()?;
        Ok(TaskPayload {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status.clone().unwrap_or_default(),
            priority: self.priority.clone().unwrap_or(Priority::Baixa),
            start_date: self.start_date,
            due_date: self.due_date,
            project_id: self.project_id,
            assigned_to_user_id: self.assigned_to_user_id,
        })
    }

    /// Payload for a create by `author`. Only admin and colaborador may
    /// create; a colaborador's task is always assigned to themselves.
    pub fn create_payload(&self, author: &User) -> Result<TaskPayload, ValidationError> {
        let mut payload = self.payload()?;
        match author.role {
            Role::Admin => {}
            Role::Colaborador => payload.assigned_to_user_id = Some(author.id),
            _ => return Err(ValidationError::Forbidden),
        }
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, role: Role) -> User {
        User {
            id,
            name: format!("user{id}"),
            email: String::new(),
            role,
            contact: None,
            position: None,
            admission_date: None,
        }
    }

    fn task(json: &str) -> Task {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn colaborador_create_forces_self_assignment() {
        let draft = TaskDraft {
            title: "Backup".into(),
            assigned_to_user_id: Some(99),
            ..TaskDraft::default()
        };
        let payload = draft.create_payload(&user(5, Role::Colaborador)).unwrap();
        assert_eq!(payload.assigned_to_user_id, Some(5));
        assert_eq!(payload.status, TaskStatus::Pendente);
        assert_eq!(payload.priority, Priority::Baixa);

        let admin = draft.create_payload(&user(1, Role::Admin)).unwrap();
        assert_eq!(admin.assigned_to_user_id, Some(99));
    }

    #[test]
    fn guest_cannot_create() {
        let draft = TaskDraft {
            title: "x".into(),
            ..TaskDraft::default()
        };
        assert_eq!(
            draft.create_payload(&user(3, Role::Convidado)),
            Err(ValidationError::Forbidden)
        );
    }

    #[test]
    fn due_before_start_is_rejected() {
        let draft = TaskDraft {
            title: "x".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 5),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 4),
            ..TaskDraft::default()
        };
        assert_eq!(draft.validate(), Err(ValidationError::EndBeforeStart));
        let same_day = TaskDraft {
            due_date: draft.start_date,
            ..draft
        };
        assert!(same_day.validate().is_ok());
    }

    #[test]
    fn payload_skips_empty_optionals() {
        let draft = TaskDraft {
            title: "x".into(),
            ..TaskDraft::default()
        };
        let json = serde_json::to_value(draft.payload().unwrap()).unwrap();
        assert!(json.get("due_date").is_none());
        assert!(json.get("project_id").is_none());
        assert_eq!(json["status"], "Pendente");
    }

    #[test]
    fn click_offers_assume_or_complete() {
        let open = task(r#"{"id":1,"title":"a","status":"Pendente"}"#);
        assert_eq!(open.click_action(5), Some(TaskAction::Assume));
        let mine = task(r#"{"id":2,"title":"b","status":"Em Andamento","assigned_to":{"id":5,"name":"Ana"}}"#);
        assert_eq!(mine.click_action(5), Some(TaskAction::Complete));
        assert_eq!(mine.click_action(6), None);
        let done = task(r#"{"id":3,"title":"c","status":"Concluída"}"#);
        assert_eq!(done.click_action(5), None);
    }

    #[test]
    fn overdue_edit_prefills_in_progress() {
        let t = task(r#"{"id":1,"title":"a","status":"Pendente","due_date":"2024-01-01"}"#);
        let now = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(t.display_status(now), TaskStatus::EmAtraso);
        assert_eq!(TaskDraft::from_task(&t, now).status, Some(TaskStatus::EmAndamento));
        // stored status is untouched
        assert_eq!(t.status, TaskStatus::Pendente);
    }
}
