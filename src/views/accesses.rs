use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::theme;
use cosmic::widget::{button, column, container, row, scrollable, text, text_input};

use gestao::fl;
use gestao::pages::accesses::AccessesView;
use gestao::pages::layout::Route;

use super::Effect;
use crate::components::form::{heading, pager};
use crate::message::{AccessesMsg, Message};

pub fn view<'a>(v: &'a AccessesView) -> Element<'a, Message> {
    let mut content = column()
        .spacing(12)
        .push(heading(fl!("nav-accesses"), Vec::new()))
        .push(
            text_input::search_input(fl!("action-search"), v.search.as_str())
                .on_input(|s| Message::Accesses(AccessesMsg::Search(s)))
                .width(Length::Fill),
        );

    let rows = v.page();
    if rows.is_empty() {
        content = content.push(text::body(fl!("accesses-empty")));
    }
    for r in rows {
        let line = row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(text::body(r.client_name.clone()).width(Length::Fixed(160.0)))
            .push(text::caption(r.field.card().to_string()).width(Length::Fixed(140.0)))
            .push(text::caption(r.field.field_name.clone()).width(Length::Fixed(140.0)))
            .push(text::body(r.value()).width(Length::Fill));
        content = content.push(
            button::custom(line)
                .class(theme::Button::Text)
                .on_press(Message::Accesses(AccessesMsg::OpenClient(r.client_id)))
                .width(Length::Fill),
        );
    }

    content = content.push(pager(v.paginator.page, v.total_pages(), |p| {
        Message::Accesses(AccessesMsg::Page(p))
    }));

    container(scrollable(content.padding(16)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

pub fn update(v: &mut AccessesView, msg: AccessesMsg) -> Effect {
    match msg {
        AccessesMsg::Search(s) => v.set_search(&s),
        AccessesMsg::Page(p) => v.paginator.set_page(p),
        AccessesMsg::OpenClient(id) => return Effect::Navigate(Route::Client(id)),
    }
    Effect::None
}
