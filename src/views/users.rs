use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, row, scrollable, text, text_input};

use gestao::core::user::{Role, UserDraft};
use gestao::fl;
use gestao::pages::colaboradores::ColaboradoresView;

use super::{Drawer, Effect, Finished, Screen, refused, run};
use crate::components::form::{choices, heading, icon_button, labelled, submit_row, text_field};
use crate::message::{Message, UserField, UsersMsg};

const ROLES: [Role; 3] = [Role::Admin, Role::Colaborador, Role::Convidado];

pub fn role_label(role: &Role) -> String {
    match role {
        Role::Admin => fl!("role-admin"),
        Role::Colaborador => fl!("role-colaborador"),
        Role::Convidado => fl!("role-convidado"),
        Role::Other(raw) => raw.clone(),
    }
}

pub fn view<'a>(v: &'a ColaboradoresView) -> Element<'a, Message> {
    let manage = v.can_manage();
    let mut actions = Vec::new();
    if manage {
        actions.push(
            button::suggested(fl!("users-new"))
                .on_press(Message::Users(UsersMsg::New))
                .into(),
        );
    }

    let mut content = column().spacing(8).push(heading(fl!("nav-users"), actions));
    for user in &v.users {
        let mut line = row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(text::body(user.name.clone()).width(Length::Fill))
            .push(text::caption(user.email.clone()).width(Length::Fixed(200.0)))
            .push(text::caption(role_label(&user.role)).width(Length::Fixed(100.0)))
            .push(text::caption(user.position.clone().unwrap_or_default()).width(Length::Fixed(120.0)));
        if manage {
            line = line
                .push(icon_button("document-edit-symbolic", Message::Users(UsersMsg::Edit(user.id))))
                .push(icon_button(
                    "edit-delete-symbolic",
                    Message::Users(UsersMsg::Delete(user.id)).confirmed(),
                ));
        }
        content = content.push(line);
    }

    container(scrollable(content.padding(16)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

pub fn drawer<'a>(v: &'a ColaboradoresView) -> Element<'a, Message> {
    let form = &v.form;
    let password_hint = if v.editing.is_some() {
        fl!("users-password-keep")
    } else {
        String::new()
    };
    column()
        .spacing(12)
        .push(text_field(fl!("field-name"), form.name.as_str(), |s| {
            Message::Users(UsersMsg::Form(UserField::Name(s)))
        }))
        .push(text_field(fl!("field-email"), form.email.as_str(), |s| {
            Message::Users(UsersMsg::Form(UserField::Email(s)))
        }))
        .push(labelled(
            fl!("field-password"),
            text_input::secure_input(password_hint, form.password.as_deref().unwrap_or(""), None, true)
                .on_input(|s| Message::Users(UsersMsg::Form(UserField::Password(s))))
                .width(Length::Fill),
        ))
        .push(labelled(
            fl!("field-role"),
            choices(&ROLES, Some(&form.role), role_label, |r| {
                Message::Users(UsersMsg::Form(UserField::Role(r)))
            }),
        ))
        .push(text_field(fl!("field-contact"), form.contact.as_str(), |s| {
            Message::Users(UsersMsg::Form(UserField::Contact(s)))
        }))
        .push(text_field(fl!("field-position"), form.position.as_str(), |s| {
            Message::Users(UsersMsg::Form(UserField::Position(s)))
        }))
        .push(text_field(fl!("field-admission"), form.admission_date.as_str(), |s| {
            Message::Users(UsersMsg::Form(UserField::Admission(s)))
        }))
        .push(submit_row(Message::Users(UsersMsg::Save)))
        .into()
}

/// An empty password box means "no password", never an empty one.
fn apply_field(draft: &mut UserDraft, field: UserField) {
    match field {
        UserField::Name(s) => draft.name = s,
        UserField::Email(s) => draft.email = s,
        UserField::Password(s) => draft.set_password(s),
        UserField::Role(r) => draft.role = r,
        UserField::Contact(s) => draft.contact = s,
        UserField::Position(s) => draft.position = s,
        UserField::Admission(s) => draft.admission_date = s,
    }
}

pub fn update(v: &mut ColaboradoresView, msg: UsersMsg) -> Effect {
    match msg {
        UsersMsg::New => {
            return match v.open_create() {
                Ok(()) => Effect::Open(Drawer::User),
                Err(out) => refused(out),
            };
        }
        UsersMsg::Edit(id) => {
            return match v.open_edit(id) {
                Ok(()) => Effect::Open(Drawer::User),
                Err(out) => refused(out),
            };
        }
        UsersMsg::Form(field) => apply_field(&mut v.form, field),
        UsersMsg::Save => {
            let mut v = v.clone();
            return run(async move {
                let out = v.save().await;
                Finished::outcome(Screen::Users(v), out)
            });
        }
        UsersMsg::Delete(id) => {
            let mut v = v.clone();
            return run(async move {
                let out = v.delete(id).await;
                Finished::outcome(Screen::Users(v), out)
            });
        }
    }
    Effect::None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleared_password_is_dropped() {
        let mut draft = UserDraft::new();
        apply_field(&mut draft, UserField::Password("segredo".into()));
        assert_eq!(draft.password.as_deref(), Some("segredo"));
        apply_field(&mut draft, UserField::Password(String::new()));
        assert_eq!(draft.password, None);
    }

    #[test]
    fn unknown_roles_show_as_sent() {
        assert_eq!(role_label(&Role::Other("auditor".into())), "auditor");
    }
}
