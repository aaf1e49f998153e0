use crate::core::user::Role;
use crate::fl;
use crate::session::SessionProvider;
use crate::session::store::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Calendar,
    Projects,
    Project(i64),
    Tasks,
    Clients,
    Client(i64),
    Users,
    Calls,
    Call(i64),
    Accesses,
}

impl Route {
    /// The landing page after login and for `/`.
    pub const HOME: Route = Route::Calls;

    pub fn parse(path: &str) -> Option<Self> {
        let parts: Vec<&str> = path.trim_matches('/').split('/').collect();
        let id = |s: &str| s.parse::<i64>().ok();
        match parts.as_slice() {
            [""] => Some(Self::HOME),
            ["login"] => Some(Self::Login),
            ["appointments"] => Some(Self::Calendar),
            ["projects"] => Some(Self::Projects),
            ["projects", p] => id(p).map(Self::Project),
            ["tasks"] => Some(Self::Tasks),
            ["clients"] => Some(Self::Clients),
            ["clients", c] => id(c).map(Self::Client),
            ["colaboradores"] => Some(Self::Users),
            ["calls"] => Some(Self::Calls),
            ["calls", c] => id(c).map(Self::Call),
            ["accesses"] => Some(Self::Accesses),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".into(),
            Self::Calendar => "/appointments".into(),
            Self::Projects => "/projects".into(),
            Self::Project(id) => format!("/projects/{}", id),
            Self::Tasks => "/tasks".into(),
            Self::Clients => "/clients".into(),
            Self::Client(id) => format!("/clients/{}", id),
            Self::Users => "/colaboradores".into(),
            Self::Calls => "/calls".into(),
            Self::Call(id) => format!("/calls/{}", id),
            Self::Accesses => "/accesses".into(),
        }
    }

    /// Menu entry a route belongs to; detail pages sit under their list.
    pub fn section(&self) -> Route {
        match self {
            Self::Project(_) => Self::Projects,
            Self::Client(_) => Self::Clients,
            Self::Call(_) => Self::Calls,
            other => *other,
        }
    }
}

/// Where a request for `route` actually lands. Everything but the login
/// screen needs a token; whether it is still valid is the API's call.
pub fn guard(route: Route, session: &SessionProvider) -> Route {
    if route != Route::Login && !session.is_authenticated() {
        Route::Login
    } else {
        route
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub route: Route,
    pub label: String,
}

/// Menu entries for `role`.
pub fn navigation(role: &Role) -> Vec<NavItem> {
    let mut routes = vec![Route::Calendar, Route::Projects, Route::Tasks, Route::Calls];
    match role {
        Role::Admin => routes.extend([Route::Clients, Route::Accesses, Route::Users]),
        Role::Colaborador => routes.extend([Route::Clients, Route::Users]),
        _ => {}
    }
    routes
        .into_iter()
        .map(|route| NavItem {
            label: nav_label(route),
            route,
        })
        .collect()
}

fn nav_label(route: Route) -> String {
    match route {
        Route::Calendar => fl!("nav-calendar"),
        Route::Projects | Route::Project(_) => fl!("nav-projects"),
        Route::Tasks => fl!("nav-tasks"),
        Route::Clients | Route::Client(_) => fl!("nav-clients"),
        Route::Users => fl!("nav-users"),
        Route::Calls | Route::Call(_) => fl!("nav-calls"),
        Route::Accesses => fl!("nav-accesses"),
        Route::Login => fl!("nav-login"),
    }
}

/// Name shown in the header.
pub fn display_name(session: &SessionProvider) -> String {
    session
        .user()
        .map(|u| u.name)
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| fl!("user-fallback-name"))
}

/// Forget the session everywhere. A store failure is logged; the in-memory
/// session is cleared regardless.
pub async fn logout(session: &SessionProvider, store: &SessionStore) -> Route {
    session.clear();
    if let Err(e) = store.clear().await {
        log::error!("Failed to clear stored session: {}", e);
    }
    log::info!("Logged out");
    Route::Login
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::user::User;
    use crate::session::Session;

    fn logged_in(role: Role, name: &str) -> SessionProvider {
        SessionProvider::with_session(Session {
            token: "t".into(),
            user: User {
                id: 1,
                name: name.into(),
                email: String::new(),
                role,
                contact: None,
                position: None,
                admission_date: None,
            },
        })
    }

    #[test]
    fn routes_parse_and_print() {
        assert_eq!(Route::parse("/"), Some(Route::Calls));
        assert_eq!(Route::parse("/calls/12"), Some(Route::Call(12)));
        assert_eq!(Route::parse("clients/3/"), Some(Route::Client(3)));
        assert_eq!(Route::parse("/projects/abc"), None);
        assert_eq!(Route::Project(4).path(), "/projects/4");
        assert_eq!(Route::parse(&Route::Users.path()), Some(Route::Users));
    }

    #[test]
    fn detail_pages_highlight_their_list() {
        assert_eq!(Route::Client(4).section(), Route::Clients);
        assert_eq!(Route::Call(9).section(), Route::Calls);
        assert_eq!(Route::Tasks.section(), Route::Tasks);
    }

    #[test]
    fn guard_requires_token() {
        let anon = SessionProvider::new();
        assert_eq!(guard(Route::Tasks, &anon), Route::Login);
        assert_eq!(guard(Route::Login, &anon), Route::Login);
        assert_eq!(guard(Route::Tasks, &logged_in(Role::Convidado, "x")), Route::Tasks);
    }

    #[test]
    fn guest_menu_has_no_admin_sections() {
        let routes: Vec<Route> = navigation(&Role::Convidado).into_iter().map(|n| n.route).collect();
        assert_eq!(routes, vec![Route::Calendar, Route::Projects, Route::Tasks, Route::Calls]);
        assert!(navigation(&Role::Admin).iter().any(|n| n.route == Route::Users));
    }

    #[test]
    fn header_name_falls_back() {
        assert_eq!(display_name(&logged_in(Role::Admin, "Rita")), "Rita");
        assert!(!display_name(&SessionProvider::new()).is_empty());
    }
}
