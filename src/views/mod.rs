//! Widgets for each console screen.
//!
//! Every screen module has a `view` that renders its view model and an
//! `update` that turns a screen message into an [`Effect`]. Requests run on
//! a clone of the view model; the clone comes back inside [`Finished`] and
//! replaces the shown screen if the user is still on it.

pub mod accesses;
pub mod calendar;
pub mod call_details;
pub mod calls;
pub mod client_detail;
pub mod clients;
pub mod login;
pub mod project_detail;
pub mod projects;
pub mod tasks;
pub mod users;

use std::collections::HashMap;
use std::future::Future;

use chrono::{NaiveDate, NaiveTime};
use futures::future::BoxFuture;

use gestao::api::ApiClient;
use gestao::core::{appointment, dates};
use gestao::fl;
use gestao::pages::accesses::AccessesView;
use gestao::pages::appointments::AppointmentsView;
use gestao::pages::call_details::CallDetailsView;
use gestao::pages::calls::CallsView;
use gestao::pages::client_detail::ClientDetailView;
use gestao::pages::clients::ClientsView;
use gestao::pages::colaboradores::ColaboradoresView;
use gestao::pages::layout::Route;
use gestao::pages::login::LoginForm;
use gestao::pages::project_detail::ProjectDetailView;
use gestao::pages::projects::ProjectsView;
use gestao::pages::tasks::TasksView;
use gestao::core::validation::ValidationError;
use gestao::pages::{Notice, Outcome, Severity, validation_message};

/// The screen on display together with its view model.
#[derive(Debug, Clone)]
pub enum Screen {
    Login(LoginForm),
    Projects(ProjectsView),
    Project(ProjectDetailView),
    Tasks(TasksView),
    Calendar(AppointmentsView),
    Clients(ClientsView),
    Client(ClientDetailView),
    Users(ColaboradoresView),
    Calls(CallsView),
    Call(CallDetailsView),
    Accesses(AccessesView),
}

impl Screen {
    /// Fresh, not yet loaded view model for `route`.
    pub fn open(route: Route, api: &ApiClient, today: NaiveDate) -> Self {
        let api = api.clone();
        match route {
            Route::Login => Self::Login(LoginForm::default()),
            Route::Projects => Self::Projects(ProjectsView::new(api)),
            Route::Project(id) => Self::Project(ProjectDetailView::new(api, id)),
            Route::Tasks => Self::Tasks(TasksView::new(api)),
            Route::Calendar => Self::Calendar(AppointmentsView::new(api, today)),
            Route::Clients => Self::Clients(ClientsView::new(api)),
            Route::Client(id) => Self::Client(ClientDetailView::new(api, id)),
            Route::Users => Self::Users(ColaboradoresView::new(api)),
            Route::Calls => Self::Calls(CallsView::new(api)),
            Route::Call(id) => Self::Call(CallDetailsView::new(api, id)),
            Route::Accesses => Self::Accesses(AccessesView::new(api)),
        }
    }

    pub fn route(&self) -> Route {
        match self {
            Self::Login(_) => Route::Login,
            Self::Projects(_) => Route::Projects,
            Self::Project(v) => Route::Project(v.project_id),
            Self::Tasks(_) => Route::Tasks,
            Self::Calendar(_) => Route::Calendar,
            Self::Clients(_) => Route::Clients,
            Self::Client(v) => Route::Client(v.client_id),
            Self::Users(_) => Route::Users,
            Self::Calls(_) => Route::Calls,
            Self::Call(v) => Route::Call(v.call_id),
            Self::Accesses(_) => Route::Accesses,
        }
    }

    pub async fn load(mut self) -> Finished {
        let notices = match &mut self {
            Self::Login(_) => Vec::new(),
            Self::Projects(v) => v.load().await,
            Self::Project(v) => v.load().await,
            Self::Tasks(v) => v.load().await,
            Self::Calendar(v) => v.load().await,
            Self::Clients(v) => v.load().await,
            Self::Client(v) => v.load().await,
            Self::Users(v) => v.load().await,
            Self::Calls(v) => v.load().await,
            Self::Call(v) => v.load().await,
            Self::Accesses(v) => v.load().await,
        };
        Finished::loaded(self, notices)
    }
}

/// What a request sends back to the shell.
#[derive(Debug, Clone, Default)]
pub struct Finished {
    pub screen: Option<Screen>,
    pub notices: Vec<Notice>,
    pub goto: Option<Route>,
    /// Close the context drawer; set when a form was accepted.
    pub close: bool,
}

impl Finished {
    pub fn loaded(screen: Screen, notices: Vec<Notice>) -> Self {
        Self {
            screen: Some(screen),
            notices,
            ..Self::default()
        }
    }

    pub fn outcome(screen: Screen, outcome: Outcome) -> Self {
        Self {
            screen: Some(screen),
            close: outcome.is_done(),
            notices: vec![outcome.notice().clone()],
            goto: None,
        }
    }

    /// Same as [`Finished::outcome`] for operations that may do nothing.
    pub fn maybe(screen: Screen, outcome: Option<Outcome>) -> Self {
        match outcome {
            Some(out) => Self::outcome(screen, out),
            None => Self::loaded(screen, Vec::new()),
        }
    }
}

/// Context drawer contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drawer {
    NewProject,
    EditProject,
    NewTask,
    EditTask(i64),
    Appointment,
    Reschedule(i64),
    CopyAppointment(i64),
    CopyDay,
    CopyRange,
    NewClient,
    EditClient,
    NewCard,
    RenameCard(String),
    FieldEditor,
    User,
    Call,
    CallEdit,
    FollowUpEdit,
}

impl Drawer {
    pub fn title(&self) -> String {
        match self {
            Self::NewProject => fl!("drawer-new-project"),
            Self::EditProject => fl!("drawer-edit-project"),
            Self::NewTask => fl!("drawer-new-task"),
            Self::EditTask(_) => fl!("drawer-edit-task"),
            Self::Appointment => fl!("drawer-appointment"),
            Self::Reschedule(_) => fl!("drawer-reschedule"),
            Self::CopyAppointment(_) => fl!("drawer-copy-appointment"),
            Self::CopyDay => fl!("drawer-copy-day"),
            Self::CopyRange => fl!("drawer-copy-range"),
            Self::NewClient => fl!("drawer-new-client"),
            Self::EditClient => fl!("drawer-edit-client"),
            Self::NewCard => fl!("drawer-new-card"),
            Self::RenameCard(_) => fl!("drawer-rename-card"),
            Self::FieldEditor => fl!("drawer-field"),
            Self::User => fl!("drawer-user"),
            Self::Call => fl!("drawer-call"),
            Self::CallEdit => fl!("drawer-call-edit"),
            Self::FollowUpEdit => fl!("drawer-follow-up"),
        }
    }
}

/// Free-text inputs whose typed form differs from the draft value: dates,
/// times and file paths. They are parsed when the form is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    Date,
    Start,
    End,
    StartDate,
    DueDate,
    Deadline,
    Target,
    SourceEnd,
    CardName,
    Attachment,
}

#[derive(Debug, Clone, Default)]
pub struct Inputs {
    values: HashMap<InputField, String>,
}

impl Inputs {
    pub fn get(&self, field: InputField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: InputField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn date(&self, field: InputField) -> Option<NaiveDate> {
        let raw = self.get(field).trim();
        if raw.is_empty() {
            return None;
        }
        dates::parse_date(raw)
    }

    pub fn time(&self, field: InputField) -> Option<NaiveTime> {
        appointment::parse_time(self.get(field))
    }

    pub fn set_date(&mut self, field: InputField, date: Option<NaiveDate>) {
        self.set(field, date.map(|d| dates::format_date(&d)).unwrap_or_default());
    }

    pub fn set_time(&mut self, field: InputField, time: Option<NaiveTime>) {
        self.set(field, time.map(|t| t.format("%H:%M").to_string()).unwrap_or_default());
    }
}

/// What a screen update asks of the shell.
pub enum Effect {
    None,
    Notify(Notice),
    Open(Drawer),
    Close,
    Navigate(Route),
    Run(BoxFuture<'static, Finished>),
}

pub fn run<F>(task: F) -> Effect
where
    F: Future<Output = Finished> + Send + 'static,
{
    Effect::Run(Box::pin(task))
}

/// A form that was refused before anything was sent.
pub fn refused(outcome: Outcome) -> Effect {
    Effect::Notify(outcome.notice().clone())
}

/// Refusal for a typed date or time that is empty or unreadable.
pub fn missing(field: &'static str) -> Effect {
    let message = validation_message(&ValidationError::Missing(field));
    Effect::Notify(Notice::new(Severity::Warning, message))
}
