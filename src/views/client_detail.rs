use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::theme;
use cosmic::widget::{button, column, container, icon, row, scrollable, text, text_input};

use gestao::core::access::{Card, split_label};
use gestao::fl;
use gestao::pages::client_detail::{ClientDetailView, EditorMode};

use super::{Drawer, Effect, Finished, InputField, Inputs, Screen, clients, run};
use crate::components::form::{heading, hinted_field, icon_button, pager, submit_row, text_field};
use crate::message::{ClientDetailMsg, Message};

fn msg(m: ClientDetailMsg) -> Message {
    Message::Client(m)
}

/// Positions a card at `index` can move to among `len` shown cards.
fn move_targets(index: usize, len: usize) -> (Option<usize>, Option<usize>) {
    let up = index.checked_sub(1);
    let down = (index + 1 < len).then_some(index + 1);
    (up, down)
}

fn card_view<'a>(v: &'a ClientDetailView, card: &'a Card, index: usize, shown: usize) -> Element<'a, Message> {
    let open = v.is_expanded(&card.name);
    let chevron = if open { "pan-down-symbolic" } else { "pan-end-symbolic" };
    let (up, down) = move_targets(index, shown);

    let mut up_btn = button::icon(icon::from_name("go-up-symbolic"));
    if let Some(to) = up {
        up_btn = up_btn.on_press(msg(ClientDetailMsg::MoveCard(index, to)));
    }
    let mut down_btn = button::icon(icon::from_name("go-down-symbolic"));
    if let Some(to) = down {
        down_btn = down_btn.on_press(msg(ClientDetailMsg::MoveCard(index, to)));
    }

    let title = row()
        .spacing(8)
        .align_y(Alignment::Center)
        .push(icon::from_name(chevron).size(16).icon())
        .push(text::title4(card.name.clone()))
        .push(text::caption(fl!("cards-field-count", count = card.fields.len())));

    let header = row()
        .spacing(4)
        .align_y(Alignment::Center)
        .push(
            button::custom(title)
                .class(theme::Button::Text)
                .on_press(msg(ClientDetailMsg::Toggle(card.name.clone())))
                .width(Length::Fill),
        )
        .push(up_btn)
        .push(down_btn)
        .push(icon_button("list-add-symbolic", msg(ClientDetailMsg::AddField(card.name.clone()))))
        .push(icon_button("document-edit-symbolic", msg(ClientDetailMsg::OpenRename(card.name.clone()))))
        .push(icon_button(
            "edit-delete-symbolic",
            msg(ClientDetailMsg::DeleteCard(card.name.clone())).confirmed(),
        ));

    let mut body = column().spacing(6).push(header);
    if open {
        for field in &card.fields {
            let mut values = column().spacing(2);
            for line in field.field_value.lines() {
                let entry = match split_label(&line) {
                    (Some(label), value) => row()
                        .spacing(6)
                        .push(text::caption(label.to_string()))
                        .push(text::body(value.to_string())),
                    (None, value) => row().push(text::body(value.to_string())),
                };
                values = values.push(entry);
            }
            body = body.push(
                row()
                    .spacing(8)
                    .align_y(Alignment::Center)
                    .push(text::caption(field.field_name.clone()).width(Length::Fixed(140.0)))
                    .push(values.width(Length::Fill))
                    .push(icon_button("document-edit-symbolic", msg(ClientDetailMsg::EditField(field.id))))
                    .push(icon_button(
                        "edit-delete-symbolic",
                        msg(ClientDetailMsg::DeleteField(field.id)).confirmed(),
                    )),
            );
        }
    }

    container(body)
        .padding(8)
        .width(Length::Fill)
        .class(theme::Container::Card)
        .into()
}

pub fn view<'a>(v: &'a ClientDetailView) -> Element<'a, Message> {
    let Some(client) = &v.client else {
        return container(text::body(fl!("client-load-failed"))).padding(16).into();
    };

    let actions = vec![
        icon_button("document-edit-symbolic", msg(ClientDetailMsg::EditClient)),
        icon_button("edit-delete-symbolic", msg(ClientDetailMsg::DeleteClient).confirmed()),
    ];

    let info = [
        client.cnpj.as_deref(),
        client.segment.as_deref(),
        client.contact_email.as_deref(),
        client.contact_phone.as_deref(),
        client.owner_name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join("  |  ");

    let toolbar = row()
        .spacing(8)
        .align_y(Alignment::Center)
        .push(
            text_input::search_input(fl!("action-search"), v.search.as_str())
                .on_input(|s| msg(ClientDetailMsg::Search(s)))
                .width(Length::Fill),
        )
        .push(button::standard(fl!("cards-expand-all")).on_press(msg(ClientDetailMsg::ExpandAll)))
        .push(button::standard(fl!("cards-collapse-all")).on_press(msg(ClientDetailMsg::CollapseAll)))
        .push(button::suggested(fl!("cards-new")).on_press(msg(ClientDetailMsg::NewCard)));

    let mut content = column()
        .spacing(12)
        .push(heading(client.name.clone(), actions))
        .push(text::caption(info))
        .push(toolbar);

    let cards = v.page();
    if cards.is_empty() {
        content = content.push(text::body(fl!("cards-empty")));
    }
    let shown = cards.len();
    for (index, card) in cards.into_iter().enumerate() {
        content = content.push(card_view(v, card, index, shown));
    }

    content = content.push(pager(v.paginator.page, v.total_pages(), |p| msg(ClientDetailMsg::Page(p))));

    container(scrollable(content.padding(16)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn field_editor<'a>(v: &'a ClientDetailView) -> Option<Element<'a, Message>> {
    let editor = v.editor.as_ref()?;
    let mut form = column()
        .spacing(12)
        .push(text_field(fl!("field-card-name"), editor.card_name.as_str(), |s| {
            msg(ClientDetailMsg::EditorCard(s))
        }))
        .push(text_field(fl!("field-field-name"), editor.field_name.as_str(), |s| {
            msg(ClientDetailMsg::EditorField(s))
        }))
        .push(text::caption(fl!("field-values")));

    for (i, value) in editor.values.iter().enumerate() {
        let mut line = row().spacing(4).align_y(Alignment::Center).push(
            text_input::text_input("", value.as_str())
                .on_input(move |s| msg(ClientDetailMsg::EditorValue(i, s)))
                .width(Length::Fill),
        );
        if editor.values.len() > 1 {
            line = line.push(icon_button("list-remove-symbolic", msg(ClientDetailMsg::RemoveValue(i))));
        }
        form = form.push(line);
    }

    let save_label = match editor.mode {
        EditorMode::Create => fl!("fields-add"),
        EditorMode::Edit(_) => fl!("action-save"),
    };
    Some(
        form.push(button::standard(fl!("fields-add-value")).on_press(msg(ClientDetailMsg::AddValue)))
            .push(
                row()
                    .spacing(8)
                    .push(button::suggested(save_label).on_press(msg(ClientDetailMsg::SaveField)))
                    .push(button::standard(fl!("action-cancel")).on_press(Message::CloseDrawer)),
            )
            .into(),
    )
}

pub fn drawer<'a>(v: &'a ClientDetailView, drawer: &Drawer, inputs: &'a Inputs) -> Option<Element<'a, Message>> {
    match drawer {
        Drawer::EditClient => Some(clients::client_form(
            &v.client_form,
            |f| msg(ClientDetailMsg::Form(f)),
            msg(ClientDetailMsg::SaveClient),
        )),
        Drawer::NewCard => Some(
            column()
                .spacing(12)
                .push(text_field(fl!("field-card-name"), v.new_card.card_name.as_str(), |s| {
                    msg(ClientDetailMsg::NewCardName(s))
                }))
                .push(text_field(fl!("field-field-name"), v.new_card.field_name.as_str(), |s| {
                    msg(ClientDetailMsg::NewFieldName(s))
                }))
                .push(text_field(fl!("field-value"), v.new_card.field_value.as_str(), |s| {
                    msg(ClientDetailMsg::NewFieldValue(s))
                }))
                .push(submit_row(msg(ClientDetailMsg::CreateCard)))
                .into(),
        ),
        Drawer::RenameCard(old) => Some(
            column()
                .spacing(12)
                .push(hinted_field(
                    fl!("field-new-card-name"),
                    old.clone(),
                    inputs.get(InputField::CardName),
                    |s| Message::Input(InputField::CardName, s),
                ))
                .push(submit_row(msg(ClientDetailMsg::Rename(old.clone()))))
                .into(),
        ),
        Drawer::FieldEditor => field_editor(v),
        _ => None,
    }
}

pub fn update(v: &mut ClientDetailView, m: ClientDetailMsg, inputs: &mut Inputs) -> Effect {
    match m {
        ClientDetailMsg::Search(s) => v.set_search(&s),
        ClientDetailMsg::Page(p) => v.paginator.set_page(p),
        ClientDetailMsg::Toggle(name) => v.toggle(&name),
        ClientDetailMsg::ExpandAll => v.expand_all(),
        ClientDetailMsg::CollapseAll => v.collapse_all(),
        ClientDetailMsg::MoveCard(from, to) => {
            let mut v = v.clone();
            return run(async move {
                let out = v.move_card(from, to).await;
                Finished::maybe(Screen::Client(v), out)
            });
        }
        ClientDetailMsg::NewCard => {
            v.open_new_card();
            return Effect::Open(Drawer::NewCard);
        }
        ClientDetailMsg::NewCardName(s) => v.new_card.card_name = s,
        ClientDetailMsg::NewFieldName(s) => v.new_card.field_name = s,
        ClientDetailMsg::NewFieldValue(s) => v.new_card.field_value = s,
        ClientDetailMsg::CreateCard => {
            let mut v = v.clone();
            return run(async move {
                let out = v.create_card().await;
                Finished::outcome(Screen::Client(v), out)
            });
        }
        ClientDetailMsg::OpenRename(name) => {
            inputs.clear();
            inputs.set(InputField::CardName, name.clone());
            return Effect::Open(Drawer::RenameCard(name));
        }
        ClientDetailMsg::Rename(old) => {
            let new = inputs.get(InputField::CardName).to_string();
            let mut v = v.clone();
            return run(async move {
                let out = v.rename_card(&old, &new).await;
                Finished::outcome(Screen::Client(v), out)
            });
        }
        ClientDetailMsg::DeleteCard(name) => {
            let mut v = v.clone();
            return run(async move {
                let out = v.delete_card(&name).await;
                Finished::outcome(Screen::Client(v), out)
            });
        }
        ClientDetailMsg::AddField(card) => {
            v.open_create_field(&card);
            return Effect::Open(Drawer::FieldEditor);
        }
        ClientDetailMsg::EditField(id) => {
            if v.open_edit_field(id) {
                return Effect::Open(Drawer::FieldEditor);
            }
        }
        ClientDetailMsg::EditorCard(s) => {
            if let Some(e) = v.editor.as_mut() {
                e.card_name = s;
            }
        }
        ClientDetailMsg::EditorField(s) => {
            if let Some(e) = v.editor.as_mut() {
                e.field_name = s;
            }
        }
        ClientDetailMsg::EditorValue(i, s) => {
            if let Some(e) = v.editor.as_mut() {
                e.set_value(i, &s);
            }
        }
        ClientDetailMsg::AddValue => {
            if let Some(e) = v.editor.as_mut() {
                e.add_value();
            }
        }
        ClientDetailMsg::RemoveValue(i) => {
            if let Some(e) = v.editor.as_mut() {
                e.remove_value(i);
            }
        }
        ClientDetailMsg::SaveField => {
            let mut v = v.clone();
            return run(async move {
                let out = v.save_field().await;
                Finished::maybe(Screen::Client(v), out)
            });
        }
        ClientDetailMsg::DeleteField(id) => {
            let mut v = v.clone();
            return run(async move {
                let out = v.delete_field(id).await;
                Finished::outcome(Screen::Client(v), out)
            });
        }
        ClientDetailMsg::EditClient => {
            v.open_edit_client();
            return Effect::Open(Drawer::EditClient);
        }
        ClientDetailMsg::Form(field) => clients::apply_field(&mut v.client_form, field),
        ClientDetailMsg::SaveClient => {
            let mut v = v.clone();
            return run(async move {
                let out = v.save_client().await;
                Finished::outcome(Screen::Client(v), out)
            });
        }
        ClientDetailMsg::DeleteClient => {
            let mut v = v.clone();
            return run(async move {
                let (out, goto) = v.delete_client().await;
                Finished {
                    goto,
                    ..Finished::outcome(Screen::Client(v), out)
                }
            });
        }
    }
    Effect::None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_cards_only_move_inwards() {
        assert_eq!(move_targets(0, 3), (None, Some(1)));
        assert_eq!(move_targets(1, 3), (Some(0), Some(2)));
        assert_eq!(move_targets(2, 3), (Some(1), None));
        assert_eq!(move_targets(0, 1), (None, None));
    }
}
