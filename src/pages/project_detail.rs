use super::{Notice, Outcome, current_user, done, failed, forbidden, load_failed, rejected};
use crate::api::ApiClient;
use crate::core::permissions::{Action, Section, allows};
use crate::core::project::{Project, ProjectDraft};
use crate::core::task::{Task, TaskDraft};
use crate::core::user::User;
use crate::fl;

#[derive(Debug, Clone)]
pub struct ProjectDetailView {
    api: ApiClient,
    pub project_id: i64,
    pub project: Option<Project>,
    pub users: Vec<User>,
    pub project_form: ProjectDraft,
    pub task_form: TaskDraft,
}

impl ProjectDetailView {
    pub fn new(api: ApiClient, project_id: i64) -> Self {
        Self {
            api,
            project_id,
            project: None,
            users: Vec::new(),
            project_form: ProjectDraft::default(),
            task_form: TaskDraft::default(),
        }
    }

    pub async fn load(&mut self) -> Vec<Notice> {
        let (project, users) = futures::join!(
            self.api.get_project(self.project_id),
            self.api.list_users()
        );
        let mut notices = Vec::new();
        match project {
            Ok(p) => self.project = Some(p),
            Err(e) => notices.push(load_failed("project", &e, fl!("project-load-failed"))),
        }
        match users {
            Ok(list) => self.users = list,
            Err(e) => notices.push(load_failed("users", &e, fl!("users-load-failed"))),
        }
        notices
    }

    async fn reload(&mut self) {
        match self.api.get_project(self.project_id).await {
            Ok(p) => self.project = Some(p),
            Err(e) => log::error!("Reloading project {} failed: {}", self.project_id, e),
        }
    }

    /// Admin or the project's creator; guests never.
    pub fn can_manage_project(&self, user: &User) -> bool {
        allows(&user.role, Section::Projects, Action::Edit)
            && self.project.as_ref().is_some_and(|p| p.can_manage(user))
    }

    /// Admin, project creator or the task's assignee; guests never.
    pub fn can_manage_task(&self, task: &Task, user: &User) -> bool {
        allows(&user.role, Section::Projects, Action::Edit)
            && self.project.as_ref().is_some_and(|p| p.can_manage_task(task, user))
    }

    fn task(&self, task_id: i64) -> Option<&Task> {
        self.project.as_ref()?.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn edit_project(&mut self) {
        if let Some(p) = &self.project {
            self.project_form = ProjectDraft::from_project(p);
        }
    }

    pub async fn save_project(&mut self) -> Outcome {
        let user = match current_user(self.api.session()) {
            Ok(u) => u,
            Err(out) => return out,
        };
        if !self.can_manage_project(&user) {
            return forbidden();
        }
        if let Err(e) = self.project_form.validate() {
            return rejected(e);
        }
        if let Err(e) = self.api.update_project(self.project_id, &self.project_form).await {
            return failed("update project", &e, fl!("project-update-failed"));
        }
        self.reload().await;
        done(fl!("project-updated"))
    }

    pub async fn delete_project(&mut self) -> Outcome {
        let user = match current_user(self.api.session()) {
            Ok(u) => u,
            Err(out) => return out,
        };
        if !self.can_manage_project(&user) {
            return forbidden();
        }
        if let Err(e) = self.api.delete_project(self.project_id).await {
            return failed("delete project", &e, fl!("project-delete-failed"));
        }
        log::info!("Deleted project {}", self.project_id);
        self.project = None;
        done(fl!("project-deleted"))
    }

    /// New task inside this project. The project id is always this one.
    pub async fn create_task(&mut self) -> Outcome {
        let user = match current_user(self.api.session()) {
            Ok(u) => u,
            Err(out) => return out,
        };
        let mut draft = self.task_form.clone();
        draft.project_id = Some(self.project_id);
        let payload = match draft.create_payload(&user) {
            Ok(p) => p,
            Err(e) => return rejected(e),
        };
        if let Err(e) = self.api.create_task(&payload).await {
            return failed("create task", &e, fl!("tasks-create-failed"));
        }
        self.task_form = TaskDraft::default();
        self.reload().await;
        done(fl!("tasks-created"))
    }

    pub fn edit_task(&mut self, task_id: i64) -> bool {
        let Some(task) = self.task(task_id) else {
            return false;
        };
        self.task_form = TaskDraft::from_task(task, super::now());
        true
    }

    pub async fn save_task(&mut self, task_id: i64) -> Outcome {
        let user = match current_user(self.api.session()) {
            Ok(u) => u,
            Err(out) => return out,
        };
        match self.task(task_id) {
            Some(task) if self.can_manage_task(task, &user) => {}
            _ => return forbidden(),
        }
        let mut draft = self.task_form.clone();
        draft.project_id = Some(self.project_id);
        let payload = match draft.payload() {
            Ok(p) => p,
            Err(e) => return rejected(e),
        };
        if let Err(e) = self.api.update_task(task_id, &payload).await {
            return failed("update task", &e, fl!("tasks-update-failed"));
        }
        self.reload().await;
        done(fl!("tasks-updated"))
    }

    pub async fn delete_task(&mut self, task_id: i64) -> Outcome {
        let user = match current_user(self.api.session()) {
            Ok(u) => u,
            Err(out) => return out,
        };
        match self.task(task_id) {
            Some(task) if self.can_manage_task(task, &user) => {}
            _ => return forbidden(),
        }
        if let Err(e) = self.api.delete_task(task_id).await {
            return failed("delete task", &e, fl!("tasks-delete-failed"));
        }
        self.reload().await;
        done(fl!("tasks-deleted"))
    }

    pub async fn complete_task(&mut self, task_id: i64) -> Outcome {
        let user = match current_user(self.api.session()) {
            Ok(u) => u,
            Err(out) => return out,
        };
        match self.task(task_id) {
            Some(task) if self.can_manage_task(task, &user) => {}
            _ => return forbidden(),
        }
        if let Err(e) = self.api.complete_task(task_id).await {
            return failed("complete task", &e, fl!("tasks-update-failed"));
        }
        self.reload().await;
        done(fl!("tasks-completed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::user::Role;
    use crate::session::{Session, SessionProvider};

    fn user(id: i64, role: Role) -> User {
        User {
            id,
            name: "u".into(),
            email: String::new(),
            role,
            contact: None,
            position: None,
            admission_date: None,
        }
    }

    fn view_with_project(viewer: User) -> ProjectDetailView {
        let session = SessionProvider::with_session(Session {
            token: "t".into(),
            user: viewer,
        });
        let mut v = ProjectDetailView::new(ApiClient::new("http://localhost:9", session).unwrap(), 1);
        v.project = Some(
            serde_json::from_str(
                r#"{"id":1,"name":"ERP","creator":{"id":2,"name":"C"},
                    "tasks":[{"id":10,"title":"t","status":"Pendente","assigned_to":{"id":3,"name":"D"}},
                             {"id":11,"title":"u","status":"Pendente"}]}"#,
            )
            .unwrap(),
        );
        v
    }

    #[test]
    fn task_permissions_follow_creator_and_assignee() {
        let v = view_with_project(user(3, Role::Colaborador));
        let tasks = &v.project.as_ref().unwrap().tasks;
        let me = user(3, Role::Colaborador);
        assert!(v.can_manage_task(&tasks[0], &me));
        assert!(!v.can_manage_task(&tasks[1], &me));
        assert!(!v.can_manage_project(&me));
        assert!(v.can_manage_project(&user(2, Role::Colaborador)));
        assert!(v.can_manage_task(&tasks[1], &user(9, Role::Admin)));
        // a guest assignee still gets nothing
        assert!(!v.can_manage_task(&tasks[0], &user(3, Role::Convidado)));
    }

    #[tokio::test]
    async fn forbidden_edit_sends_nothing() {
        let mut v = view_with_project(user(4, Role::Colaborador));
        assert!(v.delete_task(11).await.is_rejected());
        assert!(v.delete_project().await.is_rejected());
        assert!(v.save_task(99).await.is_rejected());
    }
}
