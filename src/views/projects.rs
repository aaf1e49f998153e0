use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, flex_row, row, scrollable, text, text_input};
use cosmic::theme;

use gestao::core::client::Client;
use gestao::core::project::ProjectDraft;
use gestao::core::status::ProjectStatus;
use gestao::core::user::User;
use gestao::fl;
use gestao::pages::format_day;
use gestao::pages::layout::Route;
use gestao::pages::projects::ProjectsView;

use super::{Drawer, Effect, Finished, InputField, Inputs, Screen, refused, run};
use crate::components::form::{
    choices, filter_choices, heading, hinted_field, id_dropdown, labelled, pager, submit_row, text_field,
    toggle_button,
};
use crate::message::{Message, ProjectField, ProjectsMsg};

/// Statuses offered in forms; overdue is derived, never chosen.
const FORM_STATUSES: [ProjectStatus; 3] = [ProjectStatus::Pendente, ProjectStatus::EmAndamento, ProjectStatus::Concluido];

pub fn view<'a>(v: &'a ProjectsView) -> Element<'a, Message> {
    let mut actions = vec![
        toggle_button(
            fl!("projects-sort-deadline"),
            v.sort_by_deadline,
            Message::Projects(ProjectsMsg::ToggleDeadlineSort),
        ),
    ];
    if v.can_create() {
        actions.push(
            button::suggested(fl!("projects-new"))
                .on_press(Message::Projects(ProjectsMsg::New))
                .into(),
        );
    }

    let mut content = column()
        .spacing(12)
        .push(heading(fl!("nav-projects"), actions))
        .push(
            text_input::search_input(fl!("action-search"), v.search.as_str())
                .on_input(|s| Message::Projects(ProjectsMsg::Search(s)))
                .width(Length::Fill),
        )
        .push(filter_choices(
            fl!("filter-all"),
            ProjectStatus::ALL,
            v.status_filter.as_ref(),
            |s| s.to_string(),
            |s| Message::Projects(ProjectsMsg::StatusFilter(s)),
        ));

    let rows = v.page();
    if rows.is_empty() {
        content = content.push(text::body(fl!("projects-empty")));
    }
    for entry in rows {
        let p = entry.project;
        let responsible = p.responsible.as_ref().map(|u| u.name.clone()).unwrap_or_default();
        let line = row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(text::body(p.name.clone()).width(Length::Fill))
            .push(text::caption(responsible).width(Length::Fixed(140.0)))
            .push(text::caption(entry.status.to_string()).width(Length::Fixed(110.0)))
            .push(text::caption(format_day(p.deadline)).width(Length::Fixed(90.0)))
            .push(text::caption(format!("{}%", p.progress.unwrap_or(0))));
        content = content.push(
            button::custom(line)
                .class(theme::Button::Text)
                .on_press(Message::Projects(ProjectsMsg::Open(p.id)))
                .width(Length::Fill),
        );
    }

    content = content.push(pager(v.paginator.page, v.total_pages(), |p| {
        Message::Projects(ProjectsMsg::Page(p))
    }));

    container(scrollable(content.padding(16)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

pub fn drawer<'a>(v: &'a ProjectsView, inputs: &'a Inputs) -> Element<'a, Message> {
    project_form(
        &v.form,
        Some(v.clients.as_slice()),
        &v.users,
        inputs,
        |f| Message::Projects(ProjectsMsg::Form(f)),
        Message::Projects(ProjectsMsg::Create),
        false,
    )
}

/// Project form shared by the list (create) and the detail page (edit).
/// Without `clients` the client stays as it is.
pub fn project_form<'a>(
    draft: &'a ProjectDraft,
    clients: Option<&[Client]>,
    users: &[User],
    inputs: &'a Inputs,
    on_field: fn(ProjectField) -> Message,
    save: Message,
    with_progress: bool,
) -> Element<'a, Message> {
    let user_options: Vec<(i64, String)> = users.iter().map(|u| (u.id, u.name.clone())).collect();

    let associated: Vec<Element<'a, Message>> = users
        .iter()
        .map(|u| {
            toggle_button(
                u.name.clone(),
                draft.associated_user_ids.contains(&u.id),
                on_field(ProjectField::ToggleAssociated(u.id)),
            )
        })
        .collect();

    let mut form = column()
        .spacing(12)
        .push(text_field(fl!("field-name"), draft.name.as_str(), move |v| {
            on_field(ProjectField::Name(v))
        }))
        .push(labelled(
            fl!("field-responsible"),
            id_dropdown(fl!("option-none"), user_options, draft.responsible_user_id, move |id| {
                on_field(ProjectField::Responsible(id))
            }),
        ))
        .push(labelled(
            fl!("field-associated"),
            flex_row(associated).row_spacing(4).column_spacing(4),
        ))
        .push(labelled(
            fl!("field-status"),
            choices(&FORM_STATUSES, draft.status.as_ref(), |s| s.to_string(), move |s| {
                on_field(ProjectField::Status(s))
            }),
        ))
        .push(hinted_field(
            fl!("field-deadline"),
            fl!("hint-date"),
            inputs.get(InputField::Deadline),
            |v| Message::Input(InputField::Deadline, v),
        ))
        .push(text_field(fl!("field-description"), draft.description.as_str(), move |v| {
            on_field(ProjectField::Description(v))
        }));

    if let Some(clients) = clients {
        let options = clients.iter().map(|c| (c.id, c.name.clone())).collect();
        form = form.push(labelled(
            fl!("field-client"),
            id_dropdown(fl!("option-none"), options, draft.client_id, move |id| {
                on_field(ProjectField::Client(id))
            }),
        ));
    }

    if with_progress {
        form = form.push(labelled(
            fl!("field-progress"),
            text_input::text_input("0", draft.progress.to_string())
                .on_input(move |v| on_field(ProjectField::Progress(v)))
                .width(Length::Fixed(80.0)),
        ));
    }

    form.push(submit_row(save)).into()
}

pub fn apply_field(draft: &mut ProjectDraft, field: ProjectField) {
    match field {
        ProjectField::Name(v) => draft.name = v,
        ProjectField::Client(id) => draft.client_id = id,
        ProjectField::Responsible(id) => draft.responsible_user_id = id,
        ProjectField::ToggleAssociated(id) => {
            if draft.associated_user_ids.contains(&id) {
                draft.associated_user_ids.retain(|u| *u != id);
            } else {
                draft.associate(id);
            }
        }
        ProjectField::Status(s) => draft.status = Some(s),
        ProjectField::Description(v) => draft.description = v,
        ProjectField::Progress(v) => {
            let digits = v.trim();
            if digits.is_empty() {
                draft.progress = 0;
            } else if let Ok(p) = digits.parse::<u32>() {
                draft.progress = p.min(100) as u8;
            }
        }
    }
}

pub fn update(v: &mut ProjectsView, msg: ProjectsMsg, inputs: &mut Inputs) -> Effect {
    match msg {
        ProjectsMsg::Search(s) => v.set_search(&s),
        ProjectsMsg::StatusFilter(s) => v.set_status_filter(s),
        ProjectsMsg::ToggleDeadlineSort => v.sort_by_deadline = !v.sort_by_deadline,
        ProjectsMsg::Page(p) => v.paginator.set_page(p),
        ProjectsMsg::Open(id) => return Effect::Navigate(Route::Project(id)),
        ProjectsMsg::New => {
            return match v.open_form() {
                Ok(()) => {
                    inputs.clear();
                    Effect::Open(Drawer::NewProject)
                }
                Err(out) => refused(out),
            };
        }
        ProjectsMsg::Form(field) => apply_field(&mut v.form, field),
        ProjectsMsg::Create => {
            v.form.deadline = inputs.date(InputField::Deadline);
            let mut v = v.clone();
            return run(async move {
                let out = v.create().await;
                Finished::outcome(Screen::Projects(v), out)
            });
        }
    }
    Effect::None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn associated_users_toggle() {
        let mut draft = ProjectDraft::default();
        apply_field(&mut draft, ProjectField::ToggleAssociated(3));
        apply_field(&mut draft, ProjectField::ToggleAssociated(5));
        apply_field(&mut draft, ProjectField::ToggleAssociated(3));
        assert_eq!(draft.associated_user_ids, vec![5]);
    }

    #[test]
    fn progress_input_is_clamped() {
        let mut draft = ProjectDraft::default();
        apply_field(&mut draft, ProjectField::Progress("250".into()));
        assert_eq!(draft.progress, 100);
        apply_field(&mut draft, ProjectField::Progress("4x".into()));
        assert_eq!(draft.progress, 100);
        apply_field(&mut draft, ProjectField::Progress(String::new()));
        assert_eq!(draft.progress, 0);
    }
}
