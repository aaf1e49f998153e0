use std::sync::Arc;

use cosmic::app::{Core, Task as CosmicTask, context_drawer};
use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, icon, nav_bar, row, scrollable, text};
use cosmic::{Application, Element, executor};

use gestao::api::ApiClient;
use gestao::config::ConsoleConfig;
use gestao::fl;
use gestao::pages::Notice;
use gestao::pages::layout::{self, Route};
use gestao::pages::login;
use gestao::session::store::SessionStore;

use crate::components::notices::notice_bar;
use crate::message::Message;
use crate::views::{
    Drawer, Effect, Finished, Inputs, Screen, accesses, calendar, call_details, calls, client_detail, clients,
    login as login_view, project_detail, projects, tasks, users,
};

/// Oldest notices are dropped past this many.
const MAX_NOTICES: usize = 4;

pub struct Flags {
    pub config: ConsoleConfig,
    pub api: ApiClient,
    pub store: Arc<SessionStore>,
}

pub struct Gestao {
    core: Core,
    nav_model: nav_bar::Model,
    api: ApiClient,
    store: Arc<SessionStore>,
    browser_command: String,
    screen: Screen,
    drawer: Option<Drawer>,
    inputs: Inputs,
    notices: Vec<Notice>,
    /// Delete waiting for the user to confirm it.
    confirm: Option<Message>,
}

fn finished(f: Finished) -> cosmic::Action<Message> {
    cosmic::Action::App(Message::Finished(Box::new(f)))
}

impl Application for Gestao {
    type Executor = executor::Default;
    type Flags = Flags;
    type Message = Message;

    const APP_ID: &'static str = "dev.gestao.console";

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    fn init(core: Core, flags: Self::Flags) -> (Self, CosmicTask<Self::Message>) {
        let app = Self {
            core,
            nav_model: nav_bar::Model::default(),
            api: flags.api,
            store: flags.store,
            browser_command: flags.config.browser_command,
            screen: Screen::Login(Default::default()),
            drawer: None,
            inputs: Inputs::default(),
            notices: Vec::new(),
            confirm: None,
        };

        let (api, store) = (app.api.clone(), Arc::clone(&app.store));
        let task = CosmicTask::perform(
            async move { login::restore(&api, &store).await },
            |notice| cosmic::Action::App(Message::SessionRestored(notice)),
        );
        (app, task)
    }

    fn nav_model(&self) -> Option<&nav_bar::Model> {
        match self.screen {
            Screen::Login(_) => None,
            _ => Some(&self.nav_model),
        }
    }

    fn on_nav_select(&mut self, id: nav_bar::Id) -> CosmicTask<Message> {
        match self.nav_model.data::<Route>(id).copied() {
            Some(route) => self.navigate(route),
            None => CosmicTask::none(),
        }
    }

    fn header_end(&self) -> Vec<Element<'_, Message>> {
        if !self.api.session().is_authenticated() {
            return Vec::new();
        }
        vec![
            row()
                .spacing(8)
                .align_y(Alignment::Center)
                .push(text::body(layout::display_name(self.api.session())))
                .push(button::icon(icon::from_name("system-log-out-symbolic")).on_press(Message::Logout))
                .into(),
        ]
    }

    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Message>> {
        let drawer = self.drawer.as_ref()?;
        let inputs = &self.inputs;
        let content = match (&self.screen, drawer) {
            (Screen::Projects(v), Drawer::NewProject) => Some(projects::drawer(v, inputs)),
            (Screen::Project(v), d) => project_detail::drawer(v, d, inputs),
            (Screen::Tasks(v), Drawer::NewTask | Drawer::EditTask(_)) => Some(tasks::drawer(v, inputs)),
            (Screen::Calendar(v), d) => calendar::drawer(v, d, inputs),
            (Screen::Clients(v), Drawer::NewClient) => Some(clients::drawer(v)),
            (Screen::Client(v), d) => client_detail::drawer(v, d, inputs),
            (Screen::Users(v), Drawer::User) => Some(users::drawer(v)),
            (Screen::Calls(v), Drawer::Call) => Some(calls::drawer(v)),
            (Screen::Call(v), d) => call_details::drawer(v, d),
            _ => None,
        }?;
        Some(
            context_drawer::context_drawer(
                container(scrollable(container(content).padding(16))).width(Length::Fill),
                Message::CloseDrawer,
            )
            .title(drawer.title()),
        )
    }

    fn on_escape(&mut self) -> CosmicTask<Message> {
        if self.confirm.take().is_none() {
            self.close_drawer();
        }
        CosmicTask::none()
    }

    fn view(&self) -> Element<'_, Message> {
        let mut page = column().spacing(8);

        if self.confirm.is_some() {
            page = page.push(
                container(
                    row()
                        .spacing(8)
                        .align_y(Alignment::Center)
                        .push(text::body(fl!("confirm-delete")).width(Length::Fill))
                        .push(button::destructive(fl!("action-delete")).on_press(Message::Confirm))
                        .push(button::standard(fl!("action-cancel")).on_press(Message::CancelConfirm)),
                )
                .padding([8, 16]),
            );
        }
        if let Some(bar) = notice_bar(&self.notices) {
            page = page.push(container(bar).padding([0, 16]));
        }

        page.push(self.screen_view()).into()
    }

    fn update(&mut self, message: Message) -> CosmicTask<Message> {
        let effect = match message {
            Message::Navigate(route) => return self.navigate(route),
            Message::SessionRestored(notice) => {
                self.push_notices(notice);
                return self.navigate(Route::HOME);
            }
            Message::Finished(f) => return self.finish(*f),
            Message::Logout => {
                let session = self.api.session().clone();
                let store = Arc::clone(&self.store);
                return CosmicTask::perform(
                    async move { layout::logout(&session, &store).await },
                    |route| cosmic::Action::App(Message::Navigate(route)),
                );
            }
            Message::CloseDrawer => {
                self.close_drawer();
                Effect::None
            }
            Message::DismissNotice(i) => {
                if i < self.notices.len() {
                    self.notices.remove(i);
                }
                Effect::None
            }
            Message::Input(field, value) => {
                self.inputs.set(field, value);
                Effect::None
            }
            Message::AskConfirm(pending) => {
                self.confirm = Some(*pending);
                Effect::None
            }
            Message::Confirm => match self.confirm.take() {
                Some(pending) => return self.update(pending),
                None => Effect::None,
            },
            Message::CancelConfirm => {
                self.confirm = None;
                Effect::None
            }
            Message::OpenUrl(url) => {
                if let Err(e) = std::process::Command::new(&self.browser_command).arg(&url).spawn() {
                    log::error!("Failed to open {}: {}", url, e);
                }
                Effect::None
            }
            screen_message => self.screen_update(screen_message),
        };
        self.apply(effect)
    }
}

impl Gestao {
    fn screen_view(&self) -> Element<'_, Message> {
        let user = self.api.session().user();
        match &self.screen {
            Screen::Login(form) => login_view::view(form),
            Screen::Projects(v) => projects::view(v),
            Screen::Project(v) => project_detail::view(v, user.as_ref()),
            Screen::Tasks(v) => tasks::view(v),
            Screen::Calendar(v) => calendar::view(v),
            Screen::Clients(v) => clients::view(v),
            Screen::Client(v) => client_detail::view(v),
            Screen::Users(v) => users::view(v),
            Screen::Calls(v) => calls::view(v),
            Screen::Call(v) => call_details::view(v, user.as_ref(), &self.inputs),
            Screen::Accesses(v) => accesses::view(v),
        }
    }

    /// Hand a screen message to the screen it belongs to. Messages left over
    /// from a screen that is gone are dropped.
    fn screen_update(&mut self, message: Message) -> Effect {
        let inputs = &mut self.inputs;
        match (&mut self.screen, message) {
            (Screen::Login(form), Message::Login(m)) => login_view::update(form, m, &self.api, &self.store),
            (Screen::Projects(v), Message::Projects(m)) => projects::update(v, m, inputs),
            (Screen::Project(v), Message::Project(m)) => project_detail::update(v, m, inputs),
            (Screen::Tasks(v), Message::Tasks(m)) => tasks::update(v, m, inputs),
            (Screen::Calendar(v), Message::Calendar(m)) => calendar::update(v, m, inputs),
            (Screen::Clients(v), Message::Clients(m)) => clients::update(v, m),
            (Screen::Client(v), Message::Client(m)) => client_detail::update(v, m, inputs),
            (Screen::Users(v), Message::Users(m)) => users::update(v, m),
            (Screen::Calls(v), Message::Calls(m)) => calls::update(v, m),
            (Screen::Call(v), Message::Call(m)) => call_details::update(v, m, inputs),
            (Screen::Accesses(v), Message::Accesses(m)) => accesses::update(v, m),
            (_, stale) => {
                log::debug!("Dropping message for another screen: {:?}", stale);
                Effect::None
            }
        }
    }

    fn apply(&mut self, effect: Effect) -> CosmicTask<Message> {
        match effect {
            Effect::None => {}
            Effect::Notify(notice) => self.push_notices([notice]),
            Effect::Open(drawer) => {
                self.drawer = Some(drawer);
                self.core.window.show_context = true;
            }
            Effect::Close => self.close_drawer(),
            Effect::Navigate(route) => return self.navigate(route),
            Effect::Run(task) => return CosmicTask::perform(task, finished),
        }
        CosmicTask::none()
    }

    /// A request came back. Its screen replaces the shown one only while
    /// the user is still on that route.
    fn finish(&mut self, f: Finished) -> CosmicTask<Message> {
        if let Some(screen) = f.screen {
            if screen.route() == self.screen.route() {
                self.screen = screen;
            }
        }
        self.push_notices(f.notices);
        if f.close {
            self.close_drawer();
        }
        match f.goto {
            Some(route) => self.navigate(route),
            None => CosmicTask::none(),
        }
    }

    fn navigate(&mut self, route: Route) -> CosmicTask<Message> {
        let route = layout::guard(route, self.api.session());
        log::debug!("Opening {}", route.path());
        self.close_drawer();
        self.confirm = None;
        self.rebuild_nav(route);

        let today = chrono::Local::now().date_naive();
        self.screen = Screen::open(route, &self.api, today);
        CosmicTask::perform(self.screen.clone().load(), finished)
    }

    /// Menu for the logged-in role, with the section of `route` active.
    fn rebuild_nav(&mut self, route: Route) {
        let mut model = nav_bar::Model::default();
        if let Some(user) = self.api.session().user() {
            for item in layout::navigation(&user.role) {
                model
                    .insert()
                    .text(item.label)
                    .icon(icon::from_name(nav_icon(item.route)).icon())
                    .data(item.route);
            }
        }
        let section = route.section();
        let active = model.iter().find(|&id| model.data::<Route>(id) == Some(&section));
        if let Some(id) = active {
            model.activate(id);
        }
        self.nav_model = model;
    }

    fn close_drawer(&mut self) {
        self.drawer = None;
        self.core.window.show_context = false;
        self.inputs.clear();
        if let Screen::Call(v) = &mut self.screen {
            call_details::drawer_closed(v);
        }
    }

    fn push_notices(&mut self, notices: impl IntoIterator<Item = Notice>) {
        self.notices.extend(notices);
        let excess = self.notices.len().saturating_sub(MAX_NOTICES);
        self.notices.drain(..excess);
    }
}

fn nav_icon(route: Route) -> &'static str {
    match route {
        Route::Calendar => "x-office-calendar-symbolic",
        Route::Projects | Route::Project(_) => "folder-symbolic",
        Route::Tasks => "view-list-symbolic",
        Route::Clients | Route::Client(_) => "contact-new-symbolic",
        Route::Users => "system-users-symbolic",
        Route::Calls | Route::Call(_) => "help-browser-symbolic",
        Route::Accesses => "dialog-password-symbolic",
        Route::Login => "system-lock-screen-symbolic",
    }
}
