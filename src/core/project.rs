use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::client::ClientRef;
use super::dates;
use super::status::{ProjectStatus, display_status};
use super::task::Task;
use super::user::{Role, User, UserRef};
use super::validation::{ValidationError, require};

/// A project as returned by `/projects/list` and `/projects/{id}`.
/// The list endpoint leaves `tasks` out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default = "default_status")]
    pub status: ProjectStatus,
    #[serde(default, with = "dates::opt_date")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub responsible: Option<UserRef>,
    #[serde(default)]
    pub associated_users: Vec<UserRef>,
    #[serde(default)]
    pub client: Option<ClientRef>,
    #[serde(default)]
    pub creator: Option<UserRef>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

fn default_status() -> ProjectStatus {
    ProjectStatus::Pendente
}

/// Parent project as nested in a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

impl Project {
    pub fn display_status(&self, now: NaiveDateTime) -> ProjectStatus {
        display_status(self.deadline, &self.status, now)
    }

    /// Responsible or associated.
    pub fn involves(&self, user_id: i64) -> bool {
        self.responsible.as_ref().is_some_and(|u| u.id == user_id)
            || self.associated_users.iter().any(|u| u.id == user_id)
    }

    pub fn is_creator(&self, user_id: i64) -> bool {
        self.creator.as_ref().is_some_and(|u| u.id == user_id)
    }

    /// Admin or the creator may edit or delete the project.
    pub fn can_manage(&self, user: &User) -> bool {
        user.role.is_admin() || self.is_creator(user.id)
    }

    /// Admin, the project creator, or the task's assignee may edit or delete
    /// a task inside this project.
    pub fn can_manage_task(&self, task: &Task, user: &User) -> bool {
        self.can_manage(user) || task.is_assigned_to(user.id)
    }

    /// Whether `user` gets to see this project in the list.
    pub fn visible_to(&self, user: &User) -> bool {
        match user.role {
            Role::Convidado => self.involves(user.id),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<i64>,
    pub responsible_user_id: Option<i64>,
    pub associated_user_ids: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(with = "dates::opt_date")]
    pub deadline: Option<NaiveDate>,
    pub description: String,
    pub progress: u8,
}

impl ProjectDraft {
    pub fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            client_id: project.client.as_ref().map(|c| c.id),
            responsible_user_id: project.responsible.as_ref().map(|u| u.id),
            associated_user_ids: project.associated_users.iter().map(|u| u.id).collect(),
            status: Some(project.status.clone()),
            deadline: project.deadline,
            description: project.description.clone().unwrap_or_default(),
            progress: project.progress.unwrap_or(0),
        }
    }

    /// Add an associated user once.
    pub fn associate(&mut self, user_id: i64) {
        if !self.associated_user_ids.contains(&user_id) {
            self.associated_user_ids.push(user_id);
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.name, "name")?;
        if self.responsible_user_id.is_none() {
            return Err(ValidationError::Missing("responsible_user_id"));
        }
        Ok(())
    }

    /// A new project always starts at zero progress.
    pub fn for_create(&self) -> Result<Self, ValidationError> {
        self.validate()?;
        Ok(Self {
            progress: 0,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(json: &str) -> Project {
        serde_json::from_str(json).unwrap()
    }

    fn guest(id: i64) -> User {
        User {
            id,
            name: "g".into(),
            email: String::new(),
            role: Role::Convidado,
            contact: None,
            position: None,
            admission_date: None,
        }
    }

    #[test]
    fn guest_sees_only_involved_projects() {
        let p = project(
            r#"{"id":1,"name":"ERP","status":"Pendente","responsible":{"id":2,"name":"A"},
                "associated_users":[{"id":3,"name":"B"}]}"#,
        );
        assert!(p.visible_to(&guest(2)));
        assert!(p.visible_to(&guest(3)));
        assert!(!p.visible_to(&guest(4)));
    }

    #[test]
    fn creator_manages_project_and_assignee_manages_task() {
        let p = project(
            r#"{"id":1,"name":"ERP","creator":{"id":9,"name":"C"},
                "tasks":[{"id":5,"title":"t","status":"Pendente","assigned_to":{"id":4,"name":"D"}}]}"#,
        );
        let mut creator = guest(9);
        creator.role = Role::Colaborador;
        let mut assignee = guest(4);
        assignee.role = Role::Colaborador;
        assert!(p.can_manage(&creator));
        assert!(!p.can_manage(&assignee));
        assert!(p.can_manage_task(&p.tasks[0], &assignee));
    }

    #[test]
    fn create_requires_name_and_responsible_and_zeroes_progress() {
        let mut draft = ProjectDraft {
            name: "Site".into(),
            progress: 40,
            ..ProjectDraft::default()
        };
        assert_eq!(
            draft.for_create(),
            Err(ValidationError::Missing("responsible_user_id"))
        );
        draft.responsible_user_id = Some(2);
        draft.associate(3);
        draft.associate(3);
        let ready = draft.for_create().unwrap();
        assert_eq!(ready.progress, 0);
        assert_eq!(ready.associated_user_ids, vec![3]);
    }

    #[test]
    fn overdue_project_display() {
        let p = project(r#"{"id":1,"name":"x","status":"Em Andamento","deadline":"2024-01-01"}"#);
        let now = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 1).unwrap();
        assert_eq!(p.display_status(now), ProjectStatus::EmAtraso);
    }
}
