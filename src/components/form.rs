use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, dropdown, flex_row, icon, row, text, text_input};

use crate::message::Message;

/// Caption above an input.
pub fn labelled<'a>(label: String, input: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    column().spacing(4).push(text::caption(label)).push(input).into()
}

pub fn text_field<'a>(
    label: String,
    value: &'a str,
    on_input: impl Fn(String) -> Message + 'a,
) -> Element<'a, Message> {
    labelled(
        label,
        text_input::text_input("", value)
            .on_input(on_input)
            .width(Length::Fill),
    )
}

/// Text field with a format hint such as `AAAA-MM-DD`.
pub fn hinted_field<'a>(
    label: String,
    hint: String,
    value: &'a str,
    on_input: impl Fn(String) -> Message + 'a,
) -> Element<'a, Message> {
    labelled(
        label,
        text_input::text_input(hint, value)
            .on_input(on_input)
            .width(Length::Fill),
    )
}

pub fn toggle_button<'a>(label: String, active: bool, message: Message) -> Element<'a, Message> {
    let btn = if active {
        button::suggested(label)
    } else {
        button::standard(label)
    };
    btn.on_press(message).into()
}

/// One button per option; the current one is highlighted.
pub fn choices<'a, T: Clone + PartialEq>(
    options: &[T],
    current: Option<&T>,
    label: impl Fn(&T) -> String,
    on_pick: impl Fn(T) -> Message,
) -> Element<'a, Message> {
    let buttons: Vec<Element<'a, Message>> = options
        .iter()
        .map(|opt| toggle_button(label(opt), current == Some(opt), on_pick(opt.clone())))
        .collect();
    flex_row(buttons).row_spacing(4).column_spacing(4).into()
}

/// Like [`choices`] with a leading "all" button that clears the filter.
pub fn filter_choices<'a, T: Clone + PartialEq>(
    all_label: String,
    options: &[T],
    current: Option<&T>,
    label: impl Fn(&T) -> String,
    on_pick: impl Fn(Option<T>) -> Message,
) -> Element<'a, Message> {
    let mut buttons = vec![toggle_button(all_label, current.is_none(), on_pick(None))];
    for opt in options {
        buttons.push(toggle_button(label(opt), current == Some(opt), on_pick(Some(opt.clone()))));
    }
    flex_row(buttons).row_spacing(4).column_spacing(4).into()
}

/// Dropdown over records picked by id, with a leading "none" entry.
pub fn id_dropdown<'a, F>(
    none_label: String,
    options: Vec<(i64, String)>,
    selected: Option<i64>,
    on_select: F,
) -> Element<'a, Message>
where
    F: Fn(Option<i64>) -> Message + Send + Sync + 'static,
{
    let mut ids: Vec<Option<i64>> = vec![None];
    let mut labels: Vec<String> = vec![none_label];
    for (id, label) in options {
        ids.push(Some(id));
        labels.push(label);
    }
    let index = ids.iter().position(|id| *id == selected);
    dropdown(labels, index, move |idx| on_select(ids.get(idx).copied().flatten()))
        .width(Length::Fill)
        .into()
}

/// `< page / total >`; the arrows stop at either end.
pub fn pager<'a>(page: usize, total: usize, on_page: impl Fn(usize) -> Message) -> Element<'a, Message> {
    let total = total.max(1);
    let mut prev = button::icon(icon::from_name("go-previous-symbolic"));
    if page > 1 {
        prev = prev.on_press(on_page(page - 1));
    }
    let mut next = button::icon(icon::from_name("go-next-symbolic"));
    if page < total {
        next = next.on_press(on_page(page + 1));
    }
    row()
        .spacing(8)
        .align_y(Alignment::Center)
        .push(prev)
        .push(text::caption(format!("{} / {}", page.min(total), total)))
        .push(next)
        .into()
}

/// Title on the left, actions on the right.
pub fn heading<'a>(title: String, actions: Vec<Element<'a, Message>>) -> Element<'a, Message> {
    let mut r = row()
        .spacing(8)
        .align_y(Alignment::Center)
        .push(text::title4(title).width(Length::Fill));
    for action in actions {
        r = r.push(action);
    }
    r.into()
}

pub fn icon_button<'a>(name: &'static str, message: Message) -> Element<'a, Message> {
    button::icon(icon::from_name(name)).on_press(message).into()
}

/// Save and cancel at the bottom of a drawer form.
pub fn submit_row<'a>(save: Message) -> Element<'a, Message> {
    row()
        .spacing(8)
        .push(button::suggested(gestao::fl!("action-save")).on_press(save))
        .push(button::standard(gestao::fl!("action-cancel")).on_press(Message::CloseDrawer))
        .into()
}
