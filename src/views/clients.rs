use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::theme;
use cosmic::widget::{button, column, container, row, scrollable, text, text_input};

use gestao::core::client::ClientDraft;
use gestao::fl;
use gestao::pages::clients::ClientsView;

use super::{Drawer, Effect, Finished, Screen, run};
use crate::components::form::{heading, submit_row, text_field};
use crate::message::{ClientField, ClientsMsg, Message};

pub fn view<'a>(v: &'a ClientsView) -> Element<'a, Message> {
    let actions = vec![
        button::suggested(fl!("clients-new"))
            .on_press(Message::Clients(ClientsMsg::New))
            .into(),
    ];

    let mut content = column()
        .spacing(12)
        .push(heading(fl!("nav-clients"), actions))
        .push(
            text_input::search_input(fl!("action-search"), v.search.as_str())
                .on_input(|s| Message::Clients(ClientsMsg::Search(s)))
                .width(Length::Fill),
        );

    let clients = v.filtered();
    if clients.is_empty() {
        content = content.push(text::body(fl!("clients-empty")));
    }
    for c in clients {
        let line = row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(text::body(c.name.clone()).width(Length::Fill))
            .push(text::caption(c.cnpj.clone().unwrap_or_default()).width(Length::Fixed(150.0)))
            .push(text::caption(c.owner_name.clone().unwrap_or_default()).width(Length::Fixed(140.0)))
            .push(text::caption(c.contact_email.clone().unwrap_or_default()));
        content = content.push(
            button::custom(line)
                .class(theme::Button::Text)
                .on_press(Message::Clients(ClientsMsg::Open(c.id)))
                .width(Length::Fill),
        );
    }

    container(scrollable(content.padding(16)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

pub fn drawer<'a>(v: &'a ClientsView) -> Element<'a, Message> {
    client_form(
        &v.form,
        |f| Message::Clients(ClientsMsg::Form(f)),
        Message::Clients(ClientsMsg::Create),
    )
}

/// Client form for creating and for editing on the detail page.
pub fn client_form<'a>(draft: &'a ClientDraft, on_field: fn(ClientField) -> Message, save: Message) -> Element<'a, Message> {
    column()
        .spacing(12)
        .push(text_field(fl!("field-name"), draft.name.as_str(), move |s| on_field(ClientField::Name(s))))
        .push(text_field(fl!("field-document"), draft.cnpj.as_str(), move |s| {
            on_field(ClientField::Document(s))
        }))
        .push(text_field(fl!("field-segment"), draft.segment.as_str(), move |s| {
            on_field(ClientField::Segment(s))
        }))
        .push(text_field(fl!("field-email"), draft.contact_email.as_str(), move |s| {
            on_field(ClientField::Email(s))
        }))
        .push(text_field(fl!("field-phone"), draft.contact_phone.as_str(), move |s| {
            on_field(ClientField::Phone(s))
        }))
        .push(text_field(fl!("field-owner"), draft.owner_name.as_str(), move |s| {
            on_field(ClientField::Owner(s))
        }))
        .push(submit_row(save))
        .into()
}

/// Document and phone keep their masks while typing.
pub fn apply_field(draft: &mut ClientDraft, field: ClientField) {
    match field {
        ClientField::Name(s) => draft.name = s,
        ClientField::Document(s) => draft.set_document(&s),
        ClientField::Segment(s) => draft.segment = s,
        ClientField::Email(s) => draft.contact_email = s,
        ClientField::Phone(s) => draft.set_phone(&s),
        ClientField::Owner(s) => draft.owner_name = s,
    }
}

pub fn update(v: &mut ClientsView, msg: ClientsMsg) -> Effect {
    match msg {
        ClientsMsg::Search(s) => v.search = s,
        ClientsMsg::Open(id) => return Effect::Navigate(v.open(id)),
        ClientsMsg::New => {
            v.open_form();
            return Effect::Open(Drawer::NewClient);
        }
        ClientsMsg::Form(ClientField::Document(s)) => v.type_document(&s),
        ClientsMsg::Form(ClientField::Phone(s)) => v.type_phone(&s),
        ClientsMsg::Form(field) => apply_field(&mut v.form, field),
        ClientsMsg::Create => {
            let mut v = v.clone();
            return run(async move {
                let out = v.create().await;
                Finished::outcome(Screen::Clients(v), out)
            });
        }
    }
    Effect::None
}
