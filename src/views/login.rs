use std::sync::Arc;

use cosmic::Element;
use cosmic::iced::Length;
use cosmic::widget::{button, column, container, text, text_input};

use gestao::api::ApiClient;
use gestao::fl;
use gestao::pages::login::{self, LoginForm};
use gestao::session::store::SessionStore;

use super::{Effect, Finished, run};
use crate::components::form::labelled;
use crate::message::{LoginMsg, Message};

pub fn view<'a>(form: &'a LoginForm) -> Element<'a, Message> {
    let content = column()
        .spacing(16)
        .max_width(360.0)
        .push(text::title3(fl!("login-title")))
        .push(labelled(
            fl!("field-email"),
            text_input::text_input("nome@empresa.com", form.email.as_str())
                .on_input(|v| Message::Login(LoginMsg::Email(v)))
                .width(Length::Fill),
        ))
        .push(labelled(
            fl!("field-password"),
            text_input::secure_input("", form.password.as_str(), None, true)
                .on_input(|v| Message::Login(LoginMsg::Password(v)))
                .on_submit(|_| Message::Login(LoginMsg::Submit))
                .width(Length::Fill),
        ))
        .push(
            button::suggested(fl!("login-submit"))
                .on_press(Message::Login(LoginMsg::Submit))
                .width(Length::Fill),
        );

    container(content)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .padding(24)
        .into()
}

pub fn update(form: &mut LoginForm, msg: LoginMsg, api: &ApiClient, store: &Arc<SessionStore>) -> Effect {
    match msg {
        LoginMsg::Email(v) => form.email = v,
        LoginMsg::Password(v) => form.password = v,
        LoginMsg::Submit => {
            let (api, store, form) = (api.clone(), Arc::clone(store), form.clone());
            return run(async move {
                let (outcome, route) = login::submit(&api, &store, &form).await;
                Finished {
                    screen: None,
                    notices: vec![outcome.notice().clone()],
                    goto: outcome.is_done().then_some(route),
                    close: false,
                }
            });
        }
    }
    Effect::None
}
