use chrono::NaiveDateTime;

use super::{Notice, Outcome, current_user, done, failed, forbidden, load_failed, rejected, truncate};
use crate::api::ApiClient;
use crate::core::paging::Paginator;
use crate::core::permissions::{Action, Section, allows};
use crate::core::project::Project;
use crate::core::status::{Priority, TaskStatus};
use crate::core::task::{Task, TaskAction, TaskDraft};
use crate::core::user::{Role, User};
use crate::fl;

pub const TASKS_PER_PAGE: usize = 6;
pub const DESCRIPTION_PREVIEW: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSort {
    #[default]
    None,
    DueDate,
    Priority,
}

#[derive(Debug, Clone, Copy)]
pub struct TaskCard<'a> {
    pub task: &'a Task,
    pub status: &'a TaskStatus,
}

impl TaskCard<'_> {
    pub fn preview(&self) -> String {
        truncate(self.task.description.as_deref().unwrap_or(""), DESCRIPTION_PREVIEW)
    }
}

/// Tasks board.
#[derive(Debug, Clone)]
pub struct TasksView {
    api: ApiClient,
    pub tasks: Vec<Task>,
    display: Vec<TaskStatus>,
    pub projects: Vec<Project>,
    pub users: Vec<User>,
    pub search: String,
    pub status_filter: Option<TaskStatus>,
    pub priority_filter: Option<Priority>,
    pub sort: TaskSort,
    pub paginator: Paginator,
    pub form: TaskDraft,
    pub editing: Option<i64>,
}

/// Staff see every task; anyone else sees open and own tasks.
fn visible(task: &Task, user: &User) -> bool {
    match user.role {
        Role::Admin | Role::Colaborador => true,
        _ => task.assigned_to.is_none() || task.is_assigned_to(user.id),
    }
}

impl TasksView {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            display: Vec::new(),
            projects: Vec::new(),
            users: Vec::new(),
            search: String::new(),
            status_filter: None,
            priority_filter: None,
            sort: TaskSort::None,
            paginator: Paginator::new(TASKS_PER_PAGE),
            form: TaskDraft::default(),
            editing: None,
        }
    }

    pub async fn load(&mut self) -> Vec<Notice> {
        let (tasks, projects, users) = futures::join!(
            self.api.list_tasks(),
            self.api.list_projects(),
            self.api.list_users()
        );
        let mut notices = Vec::new();
        match tasks {
            Ok(list) => self.set_tasks(list, super::now()),
            Err(e) => notices.push(load_failed("tasks", &e, fl!("tasks-load-failed"))),
        }
        match projects {
            Ok(list) => self.projects = list,
            Err(e) => notices.push(load_failed("projects", &e, fl!("projects-load-failed"))),
        }
        match users {
            Ok(list) => self.users = list,
            Err(e) => notices.push(load_failed("users", &e, fl!("users-load-failed"))),
        }
        notices
    }

    async fn reload(&mut self) {
        match self.api.list_tasks().await {
            Ok(list) => self.set_tasks(list, super::now()),
            Err(e) => log::error!("Reloading tasks failed: {}", e),
        }
    }

    fn set_tasks(&mut self, list: Vec<Task>, now: NaiveDateTime) {
        let user = self.api.session().user();
        self.tasks = list
            .into_iter()
            .filter(|t| user.as_ref().is_some_and(|u| visible(t, u)))
            .collect();
        self.display = self.tasks.iter().map(|t| t.display_status(now)).collect();
        self.paginator.clamp(self.filtered().len());
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
        self.paginator.set_page(1);
    }

    pub fn set_status_filter(&mut self, status: Option<TaskStatus>) {
        self.status_filter = status;
        self.paginator.set_page(1);
    }

    pub fn set_priority_filter(&mut self, priority: Option<Priority>) {
        self.priority_filter = priority;
        self.paginator.set_page(1);
    }

    pub fn filtered(&self) -> Vec<TaskCard<'_>> {
        let term = self.search.trim().to_lowercase();
        let mut cards: Vec<TaskCard<'_>> = self
            .tasks
            .iter()
            .zip(&self.display)
            .filter(|(t, _)| term.is_empty() || t.title.to_lowercase().contains(&term))
            .filter(|(_, s)| self.status_filter.as_ref().is_none_or(|f| f == *s))
            .filter(|(t, _)| {
                self.priority_filter
                    .as_ref()
                    .is_none_or(|p| t.priority.as_ref() == Some(p))
            })
            .map(|(task, status)| TaskCard { task, status })
            .collect();
        match self.sort {
            TaskSort::None => {}
            TaskSort::DueDate => {
                cards.sort_by_key(|c| (c.task.due_date.is_none(), c.task.due_date));
            }
            TaskSort::Priority => {
                cards.sort_by_key(|c| c.task.priority.as_ref().map_or(99, Priority::rank));
            }
        }
        cards
    }

    pub fn page(&self) -> Vec<TaskCard<'_>> {
        let cards = self.filtered();
        self.paginator.slice(&cards).to_vec()
    }

    pub fn total_pages(&self) -> usize {
        self.paginator.total_pages(self.filtered().len())
    }

    fn role(&self) -> Option<Role> {
        self.api.session().user().map(|u| u.role)
    }

    pub fn can_create(&self) -> bool {
        self.role()
            .is_some_and(|r| allows(&r, Section::Tasks, Action::Create))
    }

    pub fn can_edit(&self) -> bool {
        self.role().is_some_and(|r| allows(&r, Section::Tasks, Action::Edit))
    }

    fn task(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// What a click on the card offers; `None` when nothing applies.
    pub fn click_action(&self, task_id: i64) -> Option<TaskAction> {
        let user = self.api.session().user()?;
        self.task(task_id)?.click_action(user.id)
    }

    pub async fn click(&mut self, task_id: i64) -> Option<Outcome> {
        let user = self.api.session().user()?;
        let action = self.click_action(task_id)?;
        let result = match action {
            TaskAction::Assume => self.api.assign_task(task_id, user.id).await,
            TaskAction::Complete => self.api.complete_task(task_id).await,
        };
        if let Err(e) = result {
            return Some(failed("task click", &e, fl!("tasks-update-failed")));
        }
        self.reload().await;
        Some(match action {
            TaskAction::Assume => done(fl!("tasks-assumed")),
            TaskAction::Complete => done(fl!("tasks-completed")),
        })
    }

    pub fn open_edit(&mut self, task_id: i64) -> Result<(), Outcome> {
        if !self.can_edit() {
            return Err(forbidden());
        }
        let task = self.task(task_id).ok_or_else(forbidden)?;
        self.form = TaskDraft::from_task(task, super::now());
        self.editing = Some(task_id);
        Ok(())
    }

    pub fn open_create(&mut self) -> Result<(), Outcome> {
        if !self.can_create() {
            return Err(forbidden());
        }
        self.form = TaskDraft::default();
        self.editing = None;
        Ok(())
    }

    /// Create or update, depending on which form is open.
    pub async fn save(&mut self) -> Outcome {
        let user = match current_user(self.api.session()) {
            Ok(u) => u,
            Err(out) => return out,
        };
        let outcome = match self.editing {
            Some(id) => {
                if !allows(&user.role, Section::Tasks, Action::Edit) {
                    return forbidden();
                }
                let payload = match self.form.payload() {
                    Ok(p) => p,
                    Err(e) => return rejected(e),
                };
                match self.api.update_task(id, &payload).await {
                    Ok(()) => done(fl!("tasks-updated")),
                    Err(e) => return failed("update task", &e, fl!("tasks-update-failed")),
                }
            }
            None => {
                let payload = match self.form.create_payload(&user) {
                    Ok(p) => p,
                    Err(e) => return rejected(e),
                };
                match self.api.create_task(&payload).await {
                    Ok(()) => done(fl!("tasks-created")),
                    Err(e) => return failed("create task", &e, fl!("tasks-create-failed")),
                }
            }
        };
        self.form = TaskDraft::default();
        self.editing = None;
        self.reload().await;
        outcome
    }

    pub async fn delete(&mut self, task_id: i64) -> Outcome {
        if !self.can_edit() {
            return forbidden();
        }
        if let Err(e) = self.api.delete_task(task_id).await {
            return failed("delete task", &e, fl!("tasks-delete-failed"));
        }
        self.reload().await;
        done(fl!("tasks-deleted"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Session, SessionProvider};
    use chrono::NaiveDate;

    fn view(role: Role, id: i64) -> TasksView {
        let session = SessionProvider::with_session(Session {
            token: "t".into(),
            user: User {
                id,
                name: "u".into(),
                email: String::new(),
                role,
                contact: None,
                position: None,
                admission_date: None,
            },
        });
        TasksView::new(ApiClient::new("http://localhost:9", session).unwrap())
    }

    fn tasks() -> Vec<Task> {
        serde_json::from_str(
            r#"[
            {"id":1,"title":"Backup","status":"Pendente","priority":"Baixa","due_date":"2024-01-10"},
            {"id":2,"title":"Deploy","status":"Em Andamento","priority":"Alta","assigned_to":{"id":7,"name":"Ana"}},
            {"id":3,"title":"Backup rede","status":"Concluída","priority":"Média","due_date":"2024-01-05","assigned_to":{"id":8,"name":"Bia"}}
        ]"#,
        )
        .unwrap()
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap().and_hms_opt(8, 0, 0).unwrap()
    }

    #[test]
    fn guest_sees_open_and_own_tasks() {
        let mut v = view(Role::Convidado, 7);
        v.set_tasks(tasks(), now());
        let ids: Vec<i64> = v.tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);

        let mut staff = view(Role::Colaborador, 9);
        staff.set_tasks(tasks(), now());
        assert_eq!(staff.tasks.len(), 3);
    }

    #[test]
    fn filters_and_sorts() {
        let mut v = view(Role::Admin, 1);
        v.set_tasks(tasks(), now());
        v.set_status_filter(Some(TaskStatus::EmAtraso));
        assert_eq!(v.filtered().len(), 1);
        v.set_status_filter(None);

        v.sort = TaskSort::Priority;
        let ids: Vec<i64> = v.filtered().iter().map(|c| c.task.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);

        v.sort = TaskSort::DueDate;
        let ids: Vec<i64> = v.filtered().iter().map(|c| c.task.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        v.set_search("backup");
        v.set_priority_filter(Some(Priority::Media));
        let ids: Vec<i64> = v.filtered().iter().map(|c| c.task.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn preview_is_truncated() {
        let mut v = view(Role::Admin, 1);
        let mut list = tasks();
        list[0].description = Some("x".repeat(150));
        v.set_tasks(list, now());
        let preview = v.filtered()[0].preview();
        assert_eq!(preview.chars().count(), DESCRIPTION_PREVIEW + 3);
    }

    #[test]
    fn only_admin_edits() {
        let mut v = view(Role::Colaborador, 7);
        v.set_tasks(tasks(), now());
        assert!(v.can_create());
        assert!(v.open_edit(2).is_err());
        assert_eq!(v.click_action(1), Some(TaskAction::Assume));
        assert_eq!(v.click_action(2), Some(TaskAction::Complete));
        assert_eq!(v.click_action(3), None);
    }

    #[tokio::test]
    async fn guest_create_is_rejected() {
        let mut v = view(Role::Convidado, 7);
        assert!(v.open_create().is_err());
        v.form.title = "x".into();
        assert!(v.save().await.is_rejected());
        assert!(v.delete(1).await.is_rejected());
    }
}
