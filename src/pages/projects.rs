use chrono::NaiveDateTime;

use super::{Notice, Outcome, current_user, done, failed, forbidden, load_failed, rejected};
use crate::api::ApiClient;
use crate::core::client::Client;
use crate::core::paging::Paginator;
use crate::core::permissions::{Action, Section, allows};
use crate::core::project::{Project, ProjectDraft};
use crate::core::status::ProjectStatus;
use crate::core::user::User;
use crate::fl;

pub const PROJECTS_PER_PAGE: usize = 6;

/// A project as listed, with the status to display.
#[derive(Debug, Clone, Copy)]
pub struct ProjectRow<'a> {
    pub project: &'a Project,
    pub status: &'a ProjectStatus,
}

#[derive(Debug, Clone)]
pub struct ProjectsView {
    api: ApiClient,
    /// Projects the current user may see; statuses as stored.
    pub projects: Vec<Project>,
    display: Vec<ProjectStatus>,
    pub clients: Vec<Client>,
    pub users: Vec<User>,
    pub search: String,
    pub status_filter: Option<ProjectStatus>,
    pub sort_by_deadline: bool,
    pub paginator: Paginator,
    pub form: ProjectDraft,
}

impl ProjectsView {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            projects: Vec::new(),
            display: Vec::new(),
            clients: Vec::new(),
            users: Vec::new(),
            search: String::new(),
            status_filter: None,
            sort_by_deadline: false,
            paginator: Paginator::new(PROJECTS_PER_PAGE),
            form: ProjectDraft::default(),
        }
    }

    pub async fn load(&mut self) -> Vec<Notice> {
        let (projects, clients, users) = futures::join!(
            self.api.list_projects(),
            self.api.list_clients(),
            self.api.list_users()
        );
        let mut notices = Vec::new();
        match projects {
            Ok(list) => self.set_projects(list, super::now()),
            Err(e) => notices.push(load_failed("projects", &e, fl!("projects-load-failed"))),
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

    /// Keep what the current user may see and compute display statuses once.
    fn set_projects(&mut self, list: Vec<Project>, now: NaiveDateTime) {
        let user = self.api.session().user();
        self.projects = list
            .into_iter()
            .filter(|p| user.as_ref().is_none_or(|u| p.visible_to(u)))
            .collect();
        self.display = self.projects.iter().map(|p| p.display_status(now)).collect();
        self.paginator.clamp(self.filtered().len());
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
        self.paginator.set_page(1);
    }

    pub fn set_status_filter(&mut self, status: Option<ProjectStatus>) {
        self.status_filter = status;
        self.paginator.set_page(1);
    }

    /// Search by name, filter on the displayed status, optionally sort by
    /// deadline with undated projects last.
    pub fn filtered(&self) -> Vec<ProjectRow<'_>> {
        let term = self.search.trim().to_lowercase();
        let mut rows: Vec<ProjectRow<'_>> = self
            .projects
            .iter()
            .zip(&self.display)
            .filter(|(p, _)| term.is_empty() || p.name.to_lowercase().contains(&term))
            .filter(|(_, s)| self.status_filter.as_ref().is_none_or(|f| f == *s))
            .map(|(project, status)| ProjectRow { project, status })
            .collect();
        if self.sort_by_deadline {
            rows.sort_by_key(|r| (r.project.deadline.is_none(), r.project.deadline));
        }
        rows
    }

    pub fn page(&self) -> Vec<ProjectRow<'_>> {
        let rows = self.filtered();
        self.paginator.slice(&rows).to_vec()
    }

    pub fn total_pages(&self) -> usize {
        self.paginator.total_pages(self.filtered().len())
    }

    pub fn can_create(&self) -> bool {
        self.api
            .session()
            .user()
            .is_some_and(|u| allows(&u.role, Section::Projects, Action::Create))
    }

    pub fn open_form(&mut self) -> Result<(), Outcome> {
        if !self.can_create() {
            return Err(forbidden());
        }
        self.form = ProjectDraft::default();
        Ok(())
    }

    pub async fn create(&mut self) -> Outcome {
        let user = match current_user(self.api.session()) {
            Ok(u) => u,
            Err(out) => return out,
        };
        if !allows(&user.role, Section::Projects, Action::Create) {
            return forbidden();
        }
        let draft = match self.form.for_create() {
            Ok(d) => d,
            Err(e) => return rejected(e),
        };
        if let Err(e) = self.api.create_project(&draft).await {
            return failed("create project", &e, fl!("projects-create-failed"));
        }
        log::info!("Created project {}", draft.name);
        self.form = ProjectDraft::default();
        self.reload().await;
        done(fl!("projects-created"))
    }

    async fn reload(&mut self) {
        match self.api.list_projects().await {
            Ok(list) => self.set_projects(list, super::now()),
            Err(e) => log::error!("Reloading projects failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::user::Role;
    use crate::session::{Session, SessionProvider};
    use chrono::NaiveDate;

    fn view(role: Role, id: i64) -> ProjectsView {
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
        ProjectsView::new(ApiClient::new("http://localhost:9", session).unwrap())
    }

    fn projects() -> Vec<Project> {
        serde_json::from_str(
            r#"[
            {"id":1,"name":"Site","status":"Pendente","deadline":"2024-01-01","responsible":{"id":5,"name":"A"}},
            {"id":2,"name":"ERP","status":"Em Andamento","deadline":null,"associated_users":[{"id":6,"name":"B"}]},
            {"id":3,"name":"Rede","status":"Concluído","deadline":"2023-06-01","responsible":{"id":6,"name":"B"}}
        ]"#,
        )
        .unwrap()
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn guest_list_is_narrowed() {
        let mut v = view(Role::Convidado, 6);
        v.set_projects(projects(), now());
        let ids: Vec<i64> = v.projects.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert!(!v.can_create());
    }

    #[test]
    fn status_filter_uses_display_status() {
        let mut v = view(Role::Admin, 1);
        v.set_projects(projects(), now());
        v.set_status_filter(Some(ProjectStatus::EmAtraso));
        let rows = v.filtered();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].project.id, 1);
        // stored status untouched
        assert_eq!(rows[0].project.status, ProjectStatus::Pendente);
    }

    #[test]
    fn deadline_sort_puts_undated_last() {
        let mut v = view(Role::Admin, 1);
        v.set_projects(projects(), now());
        v.sort_by_deadline = true;
        let ids: Vec<i64> = v.filtered().iter().map(|r| r.project.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        v.set_search("er");
        assert_eq!(v.filtered().len(), 1);
    }

    #[tokio::test]
    async fn create_without_responsible_is_rejected_locally() {
        let mut v = view(Role::Colaborador, 1);
        v.form.name = "Novo".into();
        assert!(v.create().await.is_rejected());
        let mut guest = view(Role::Convidado, 2);
        assert!(guest.open_form().is_err());
    }
}
