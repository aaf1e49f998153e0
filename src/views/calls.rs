use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::theme;
use cosmic::widget::{button, column, container, row, scrollable, text, text_input};

use gestao::core::call::{CallDraft, CallOrder};
use gestao::core::client::Client;
use gestao::core::status::{CallStatus, Priority};
use gestao::core::user::User;
use gestao::fl;
use gestao::pages::calls::CallsView;
use gestao::pages::format_timestamp;

use super::{Drawer, Effect, Finished, Screen, refused, run};
use crate::components::form::{
    choices, filter_choices, heading, icon_button, id_dropdown, labelled, pager, submit_row, text_field,
};
use crate::message::{CallField, CallsMsg, Message};

const ORDERS: [CallOrder; 3] = [CallOrder::PriorityDesc, CallOrder::CreatedDesc, CallOrder::ClientAsc];

fn order_label(order: &CallOrder) -> String {
    match order {
        CallOrder::PriorityDesc => fl!("calls-order-priority"),
        CallOrder::CreatedDesc => fl!("calls-order-created"),
        CallOrder::ClientAsc => fl!("calls-order-client"),
    }
}

pub fn view<'a>(v: &'a CallsView) -> Element<'a, Message> {
    let mut actions = vec![
        button::standard(fl!("calls-reset-filters"))
            .on_press(Message::Calls(CallsMsg::Reset))
            .into(),
    ];
    if v.can_create() {
        actions.push(
            button::suggested(fl!("calls-new"))
                .on_press(Message::Calls(CallsMsg::New))
                .into(),
        );
    }

    let search = row()
        .spacing(8)
        .push(
            text_input::search_input(fl!("action-search"), v.query.search.as_str())
                .on_input(|s| Message::Calls(CallsMsg::Search(s)))
                .on_submit(|_| Message::Calls(CallsMsg::SubmitSearch))
                .width(Length::Fill),
        )
        .push(button::standard(fl!("action-search")).on_press(Message::Calls(CallsMsg::SubmitSearch)));

    let mut content = column()
        .spacing(12)
        .push(heading(fl!("nav-calls"), actions))
        .push(search)
        .push(filter_choices(
            fl!("filter-all"),
            CallStatus::ALL,
            v.query.status.as_ref(),
            |s| s.to_string(),
            |s| Message::Calls(CallsMsg::Status(s)),
        ))
        .push(filter_choices(
            fl!("filter-all"),
            Priority::ALL,
            v.query.priority.as_ref(),
            |p| p.to_string(),
            |p| Message::Calls(CallsMsg::Priority(p)),
        ))
        .push(filter_choices(
            fl!("calls-order-default"),
            &ORDERS,
            v.query.order.as_ref(),
            order_label,
            |o| Message::Calls(CallsMsg::Order(o)),
        ));

    if v.calls.is_empty() {
        content = content.push(text::body(fl!("calls-empty")));
    }
    for call in &v.calls {
        let line = row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(text::body(call.title.clone()).width(Length::Fill))
            .push(
                text::caption(call.client.as_ref().map(|c| c.name.clone()).unwrap_or_default())
                    .width(Length::Fixed(140.0)),
            )
            .push(text::caption(call.status.to_string()).width(Length::Fixed(100.0)))
            .push(
                text::caption(call.priority.as_ref().map(|p| p.to_string()).unwrap_or_default())
                    .width(Length::Fixed(60.0)),
            )
            .push(
                text::caption(call.assigned_to.as_ref().map(|u| u.name.clone()).unwrap_or_default())
                    .width(Length::Fixed(120.0)),
            )
            .push(text::caption(format_timestamp(call.created_at)));
        let mut entry = row().spacing(4).align_y(Alignment::Center).push(
            button::custom(line)
                .class(theme::Button::Text)
                .on_press(Message::Calls(CallsMsg::Open(call.id)))
                .width(Length::Fill),
        );
        if v.can_modify(call) {
            entry = entry
                .push(icon_button("document-edit-symbolic", Message::Calls(CallsMsg::Edit(call.id))))
                .push(icon_button(
                    "edit-delete-symbolic",
                    Message::Calls(CallsMsg::Delete(call.id)).confirmed(),
                ));
        }
        content = content.push(entry);
    }

    content = content.push(pager(v.query.page as usize, v.pages as usize, |p| {
        Message::Calls(CallsMsg::Page(p as u32))
    }));

    container(scrollable(content.padding(16)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Values shown by [`call_form`]; the call list and the details screen keep
/// them in different drafts.
pub struct CallFields<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub status: &'a CallStatus,
    pub priority: &'a Priority,
    /// Client picker; absent where the client cannot change.
    pub clients: Option<(&'a [Client], Option<i64>)>,
    pub assignee: Option<i64>,
}

pub fn call_form<'a>(
    fields: CallFields<'a>,
    users: &[User],
    on_field: fn(CallField) -> Message,
    save: Message,
) -> Element<'a, Message> {
    let user_options = users.iter().map(|u| (u.id, u.name.clone())).collect();
    let mut form = column()
        .spacing(12)
        .push(text_field(fl!("field-title"), fields.title, move |s| on_field(CallField::Title(s))))
        .push(text_field(fl!("field-description"), fields.description, move |s| {
            on_field(CallField::Description(s))
        }))
        .push(labelled(
            fl!("field-status"),
            choices(CallStatus::ALL, Some(fields.status), |s| s.to_string(), move |s| {
                on_field(CallField::Status(s))
            }),
        ))
        .push(labelled(
            fl!("field-priority"),
            choices(Priority::ALL, Some(fields.priority), |p| p.to_string(), move |p| {
                on_field(CallField::Priority(p))
            }),
        ));

    if let Some((clients, selected)) = fields.clients {
        let options = clients.iter().map(|c| (c.id, c.name.clone())).collect();
        form = form.push(labelled(
            fl!("field-client"),
            id_dropdown(fl!("option-none"), options, selected, move |id| on_field(CallField::Client(id))),
        ));
    }

    form.push(labelled(
        fl!("field-assignee"),
        id_dropdown(fl!("option-none"), user_options, fields.assignee, move |id| {
            on_field(CallField::Assignee(id))
        }),
    ))
    .push(submit_row(save))
    .into()
}

pub fn drawer<'a>(v: &'a CallsView) -> Element<'a, Message> {
    let form = &v.form;
    call_form(
        CallFields {
            title: &form.title,
            description: &form.description,
            status: &form.status,
            priority: &form.priority,
            clients: Some((v.clients.as_slice(), form.client_id)),
            assignee: form.assigned_to_user_id,
        },
        &v.users,
        |f| Message::Calls(CallsMsg::Form(f)),
        Message::Calls(CallsMsg::Save),
    )
}

fn apply_field(draft: &mut CallDraft, field: CallField) {
    match field {
        CallField::Title(s) => draft.title = s,
        CallField::Description(s) => draft.description = s,
        CallField::Priority(p) => draft.priority = p,
        CallField::Status(s) => draft.status = s,
        CallField::Client(id) => draft.client_id = id,
        CallField::Assignee(id) => draft.assigned_to_user_id = id,
    }
}

/// Re-query the server after a filter or page change.
fn refetch(v: &CallsView) -> Effect {
    let mut v = v.clone();
    run(async move {
        let notice = v.fetch().await;
        Finished::loaded(Screen::Calls(v), notice.into_iter().collect())
    })
}

pub fn update(v: &mut CallsView, msg: CallsMsg) -> Effect {
    match msg {
        CallsMsg::Search(s) => v.query.search = s,
        CallsMsg::SubmitSearch => {
            let term = v.query.search.clone();
            v.set_search(&term);
            return refetch(v);
        }
        CallsMsg::Status(s) => {
            v.set_status(s);
            return refetch(v);
        }
        CallsMsg::Priority(p) => {
            v.set_priority(p);
            return refetch(v);
        }
        CallsMsg::Order(o) => {
            v.set_order(o);
            return refetch(v);
        }
        CallsMsg::Reset => {
            v.reset_filters();
            return refetch(v);
        }
        CallsMsg::Page(p) => {
            v.set_page(p);
            return refetch(v);
        }
        CallsMsg::Open(id) => return Effect::Navigate(v.open(id)),
        CallsMsg::New => {
            return match v.open_create() {
                Ok(()) => Effect::Open(Drawer::Call),
                Err(out) => refused(out),
            };
        }
        CallsMsg::Edit(id) => {
            return match v.open_edit(id) {
                Ok(()) => Effect::Open(Drawer::Call),
                Err(out) => refused(out),
            };
        }
        CallsMsg::Form(field) => apply_field(&mut v.form, field),
        CallsMsg::Save => {
            let mut v = v.clone();
            return run(async move {
                let out = v.save().await;
                Finished::outcome(Screen::Calls(v), out)
            });
        }
        CallsMsg::Delete(id) => {
            let mut v = v.clone();
            return run(async move {
                let out = v.delete(id).await;
                Finished::outcome(Screen::Calls(v), out)
            });
        }
    }
    Effect::None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_fields_reach_the_draft() {
        let mut draft = CallDraft::default();
        apply_field(&mut draft, CallField::Title("Impressora".into()));
        apply_field(&mut draft, CallField::Status(CallStatus::EmAndamento));
        apply_field(&mut draft, CallField::Assignee(Some(4)));
        assert_eq!(draft.title, "Impressora");
        assert_eq!(draft.status, CallStatus::EmAndamento);
        assert_eq!(draft.assigned_to_user_id, Some(4));
        assert!(draft.validate().is_ok());
    }
}
