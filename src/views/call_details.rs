use std::path::Path;

use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, icon, row, scrollable, text, text_input};

use gestao::core::call::{CallEdit, FollowUp, FollowUpKind};
use gestao::core::permissions::{Action, Section, allows};
use gestao::core::user::User;
use gestao::fl;
use gestao::pages::call_details::CallDetailsView;
use gestao::pages::{Notice, format_timestamp};

use super::calls::{CallFields, call_form};
use super::{Drawer, Effect, Finished, InputField, Inputs, Screen, run};
use crate::components::form::{choices, heading, hinted_field, icon_button, labelled, submit_row, text_field};
use crate::message::{CallDetailsMsg, CallField, Message};

const KINDS: [FollowUpKind; 2] = [FollowUpKind::Comentario, FollowUpKind::Solucao];

fn msg(m: CallDetailsMsg) -> Message {
    Message::Call(m)
}

fn kind_label(kind: &FollowUpKind) -> String {
    match kind {
        FollowUpKind::Comentario => fl!("follow-up-comment"),
        FollowUpKind::Solucao => fl!("follow-up-solution"),
    }
}

/// File name sent with an upload read from `path`.
fn attachment_name(path: &str) -> Option<String> {
    Path::new(path.trim())
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
}

fn detail_line<'a>(label: String, value: String) -> Element<'a, Message> {
    row()
        .spacing(8)
        .push(text::caption(label).width(Length::Fixed(120.0)))
        .push(text::body(value))
        .into()
}

fn follow_up_view<'a>(v: &'a CallDetailsView, fu: &'a FollowUp, staff: bool) -> Element<'a, Message> {
    let mut header = row().spacing(8).align_y(Alignment::Center);
    if fu.kind == FollowUpKind::Solucao {
        header = header.push(icon::from_name("emblem-ok-symbolic").size(16).icon());
    }
    header = header
        .push(text::body(fu.user.as_ref().map(|u| u.name.clone()).unwrap_or_default()).width(Length::Fill))
        .push(text::caption(kind_label(&fu.kind)))
        .push(text::caption(format_timestamp(fu.created_at)));
    if staff {
        header = header
            .push(icon_button("document-edit-symbolic", msg(CallDetailsMsg::StartEdit(fu.id))))
            .push(icon_button(
                "edit-delete-symbolic",
                msg(CallDetailsMsg::Delete(fu.id)).confirmed(),
            ));
    }

    let mut body = column()
        .spacing(4)
        .push(header)
        .push(text::body(fu.description.clone()));
    for link in v.attachments(fu) {
        let kind = if link.is_image {
            "image-x-generic-symbolic"
        } else {
            "mail-attachment-symbolic"
        };
        body = body.push(
            row()
                .spacing(4)
                .align_y(Alignment::Center)
                .push(icon::from_name(kind).size(16).icon())
                .push(button::text(link.file_name).on_press(Message::OpenUrl(link.url))),
        );
    }

    container(body)
        .padding(8)
        .width(Length::Fill)
        .class(cosmic::theme::Container::Card)
        .into()
}

pub fn view<'a>(v: &'a CallDetailsView, user: Option<&User>, inputs: &'a Inputs) -> Element<'a, Message> {
    let Some(call) = &v.call else {
        return container(text::body(fl!("call-load-failed"))).padding(16).into();
    };
    let staff = user.is_some_and(|u| allows(&u.role, Section::FollowUps, Action::Create));

    let mut actions = Vec::new();
    if staff {
        actions.push(icon_button("document-edit-symbolic", msg(CallDetailsMsg::EditCall)));
    }

    let mut content = column()
        .spacing(8)
        .push(heading(call.title.clone(), actions))
        .push(detail_line(fl!("field-status"), call.status.to_string()))
        .push(detail_line(
            fl!("field-priority"),
            call.priority.as_ref().map(|p| p.to_string()).unwrap_or_default(),
        ))
        .push(detail_line(
            fl!("field-client"),
            call.client.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
        ))
        .push(detail_line(
            fl!("field-assignee"),
            call.assigned_to.as_ref().map(|u| u.name.clone()).unwrap_or_default(),
        ))
        .push(detail_line(
            fl!("field-opened-by"),
            call.opened_by.as_ref().map(|u| u.name.clone()).unwrap_or_default(),
        ))
        .push(detail_line(fl!("field-created-at"), format_timestamp(call.created_at)))
        .push(text::body(call.description.clone().unwrap_or_default()));

    let solved = v.solutions().count();
    content = content.push(heading(fl!("follow-ups-title", solutions = solved), Vec::new()));
    if v.follow_ups.is_empty() {
        content = content.push(text::body(fl!("follow-ups-empty")));
    }
    for fu in &v.follow_ups {
        content = content.push(follow_up_view(v, fu, staff));
    }

    if staff {
        content = content
            .push(text::title4(fl!("follow-ups-new")))
            .push(
                text_input::text_input(fl!("field-description"), v.draft.description.as_str())
                    .on_input(|s| msg(CallDetailsMsg::Description(s)))
                    .width(Length::Fill),
            )
            .push(choices(&KINDS, Some(&v.draft.kind), kind_label, |k| msg(CallDetailsMsg::Kind(k))))
            .push(hinted_field(
                fl!("field-attachment"),
                fl!("hint-path"),
                inputs.get(InputField::Attachment),
                |s| Message::Input(InputField::Attachment, s),
            ))
            .push(button::suggested(fl!("follow-ups-add")).on_press(msg(CallDetailsMsg::AddFollowUp)));
    }

    container(scrollable(content.padding(16)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn edit_fields(edit: &CallEdit) -> CallFields<'_> {
    CallFields {
        title: &edit.title,
        description: &edit.description,
        status: &edit.status,
        priority: &edit.priority,
        clients: None,
        assignee: edit.assigned_to_user_id,
    }
}

pub fn drawer<'a>(v: &'a CallDetailsView, drawer: &Drawer) -> Option<Element<'a, Message>> {
    match drawer {
        Drawer::CallEdit => {
            let edit = v.call_edit.as_ref()?;
            Some(call_form(
                edit_fields(edit),
                &v.users,
                |f| msg(CallDetailsMsg::CallForm(f)),
                msg(CallDetailsMsg::SaveCall),
            ))
        }
        Drawer::FollowUpEdit => {
            let (_, edit) = v.editing.as_ref()?;
            Some(
                column()
                    .spacing(12)
                    .push(text_field(fl!("field-description"), edit.description.as_str(), |s| {
                        msg(CallDetailsMsg::EditDescription(s))
                    }))
                    .push(labelled(
                        fl!("field-kind"),
                        choices(&KINDS, Some(&edit.kind), kind_label, |k| msg(CallDetailsMsg::EditKind(k))),
                    ))
                    .push(submit_row(msg(CallDetailsMsg::SaveEdit)))
                    .into(),
            )
        }
        _ => None,
    }
}

/// Drop working copies when their drawer closes without saving.
pub fn drawer_closed(v: &mut CallDetailsView) {
    v.cancel_edit();
    v.cancel_call_edit();
}

fn apply_call_field(edit: &mut CallEdit, field: CallField) {
    match field {
        CallField::Title(s) => edit.title = s,
        CallField::Description(s) => edit.description = s,
        CallField::Priority(p) => edit.priority = p,
        CallField::Status(s) => edit.status = s,
        CallField::Assignee(id) => edit.assigned_to_user_id = id,
        CallField::Client(_) => {}
    }
}

pub fn update(v: &mut CallDetailsView, m: CallDetailsMsg, inputs: &mut Inputs) -> Effect {
    match m {
        CallDetailsMsg::Description(s) => v.draft.description = s,
        CallDetailsMsg::Kind(k) => v.draft.kind = k,
        CallDetailsMsg::AddFollowUp => {
            let path = inputs.get(InputField::Attachment).trim().to_string();
            inputs.set(InputField::Attachment, "");
            let mut v = v.clone();
            return run(async move {
                if let Some(name) = attachment_name(&path).filter(|_| !path.is_empty()) {
                    match tokio::fs::read(&path).await {
                        Ok(bytes) => v.attach(&name, bytes),
                        Err(e) => {
                            log::error!("Reading attachment {} failed: {}", path, e);
                            let notice = Notice::error(fl!("follow-ups-attachment-unreadable", path = path.as_str()));
                            return Finished::loaded(Screen::Call(v), vec![notice]);
                        }
                    }
                }
                let out = v.add_follow_up().await;
                Finished::outcome(Screen::Call(v), out)
            });
        }
        CallDetailsMsg::StartEdit(id) => {
            if v.start_edit(id) {
                return Effect::Open(Drawer::FollowUpEdit);
            }
        }
        CallDetailsMsg::EditDescription(s) => {
            if let Some((_, edit)) = v.editing.as_mut() {
                edit.description = s;
            }
        }
        CallDetailsMsg::EditKind(k) => {
            if let Some((_, edit)) = v.editing.as_mut() {
                edit.kind = k;
            }
        }
        CallDetailsMsg::SaveEdit => {
            let mut v = v.clone();
            return run(async move {
                let out = v.save_edit().await;
                Finished::maybe(Screen::Call(v), out)
            });
        }
        CallDetailsMsg::Delete(id) => {
            let mut v = v.clone();
            return run(async move {
                let out = v.delete_follow_up(id).await;
                Finished::outcome(Screen::Call(v), out)
            });
        }
        CallDetailsMsg::EditCall => {
            v.open_call_edit();
            if v.call_edit.is_some() {
                return Effect::Open(Drawer::CallEdit);
            }
        }
        CallDetailsMsg::CallForm(field) => {
            if let Some(edit) = v.call_edit.as_mut() {
                apply_call_field(edit, field);
            }
        }
        CallDetailsMsg::SaveCall => {
            let mut v = v.clone();
            return run(async move {
                let out = v.save_call().await;
                Finished::maybe(Screen::Call(v), out)
            });
        }
    }
    Effect::None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uploads_are_named_after_the_file() {
        assert_eq!(attachment_name(" /tmp/relatorio.pdf "), Some("relatorio.pdf".to_string()));
        assert_eq!(attachment_name("foto.png"), Some("foto.png".to_string()));
        assert_eq!(attachment_name(""), None);
    }
}
