use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, row, scrollable, text, text_input};

use gestao::core::project::Project;
use gestao::core::status::{Priority, TaskStatus};
use gestao::core::task::{TaskAction, TaskDraft};
use gestao::core::user::User;
use gestao::fl;
use gestao::pages::format_day;
use gestao::pages::tasks::{TaskSort, TasksView};

use super::{Drawer, Effect, Finished, InputField, Inputs, Screen, refused, run};
use crate::components::form::{
    choices, filter_choices, heading, hinted_field, icon_button, id_dropdown, labelled, pager, submit_row,
    text_field,
};
use crate::message::{Message, TaskField, TasksMsg};

const FORM_STATUSES: [TaskStatus; 3] = [TaskStatus::Pendente, TaskStatus::EmAndamento, TaskStatus::Concluida];
const SORTS: [TaskSort; 3] = [TaskSort::None, TaskSort::DueDate, TaskSort::Priority];

fn sort_label(sort: &TaskSort) -> String {
    match sort {
        TaskSort::None => fl!("tasks-sort-none"),
        TaskSort::DueDate => fl!("tasks-sort-due"),
        TaskSort::Priority => fl!("tasks-sort-priority"),
    }
}

fn action_label(action: TaskAction) -> String {
    match action {
        TaskAction::Assume => fl!("tasks-assume"),
        TaskAction::Complete => fl!("tasks-complete"),
    }
}

pub fn view<'a>(v: &'a TasksView) -> Element<'a, Message> {
    let mut actions = Vec::new();
    if v.can_create() {
        actions.push(
            button::suggested(fl!("tasks-new"))
                .on_press(Message::Tasks(TasksMsg::New))
                .into(),
        );
    }

    let mut content = column()
        .spacing(12)
        .push(heading(fl!("nav-tasks"), actions))
        .push(
            text_input::search_input(fl!("action-search"), v.search.as_str())
                .on_input(|s| Message::Tasks(TasksMsg::Search(s)))
                .width(Length::Fill),
        )
        .push(filter_choices(
            fl!("filter-all"),
            TaskStatus::ALL,
            v.status_filter.as_ref(),
            |s| s.to_string(),
            |s| Message::Tasks(TasksMsg::StatusFilter(s)),
        ))
        .push(filter_choices(
            fl!("filter-all"),
            Priority::ALL,
            v.priority_filter.as_ref(),
            |p| p.to_string(),
            |p| Message::Tasks(TasksMsg::PriorityFilter(p)),
        ))
        .push(choices(&SORTS, Some(&v.sort), sort_label, |s| Message::Tasks(TasksMsg::Sort(s))));

    let cards = v.page();
    if cards.is_empty() {
        content = content.push(text::body(fl!("tasks-empty")));
    }
    for card in cards {
        let task = card.task;
        let assignee = task
            .assigned_to
            .as_ref()
            .map(|u| u.name.clone())
            .unwrap_or_else(|| fl!("tasks-unassigned"));
        let project = task.project.as_ref().map(|p| p.name.clone()).unwrap_or_default();
        let priority = task.priority.as_ref().map(|p| p.to_string()).unwrap_or_default();

        let mut header = row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(text::title4(task.title.clone()).width(Length::Fill))
            .push(text::caption(card.status.to_string()))
            .push(text::caption(priority));
        if let Some(action) = v.click_action(task.id) {
            header = header.push(
                button::standard(action_label(action)).on_press(Message::Tasks(TasksMsg::Click(task.id))),
            );
        }
        if v.can_edit() {
            header = header
                .push(icon_button("document-edit-symbolic", Message::Tasks(TasksMsg::Edit(task.id))))
                .push(icon_button(
                    "edit-delete-symbolic",
                    Message::Tasks(TasksMsg::Delete(task.id)).confirmed(),
                ));
        }

        let meta = row()
            .spacing(12)
            .push(text::caption(assignee))
            .push(text::caption(project))
            .push(text::caption(format_day(task.due_date)));

        content = content.push(
            container(
                column()
                    .spacing(4)
                    .push(header)
                    .push(meta)
                    .push(text::body(card.preview())),
            )
            .padding(8)
            .width(Length::Fill)
            .class(cosmic::theme::Container::Card),
        );
    }

    content = content.push(pager(v.paginator.page, v.total_pages(), |p| Message::Tasks(TasksMsg::Page(p))));

    container(scrollable(content.padding(16)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

pub fn drawer<'a>(v: &'a TasksView, inputs: &'a Inputs) -> Element<'a, Message> {
    task_form(
        &v.form,
        Some(v.projects.as_slice()),
        &v.users,
        inputs,
        |f| Message::Tasks(TasksMsg::Form(f)),
        Message::Tasks(TasksMsg::Save),
    )
}

/// Task form for the board and for a project's task list. Without
/// `projects` the project is fixed by the caller.
pub fn task_form<'a>(
    draft: &'a TaskDraft,
    projects: Option<&[Project]>,
    users: &[User],
    inputs: &'a Inputs,
    on_field: fn(TaskField) -> Message,
    save: Message,
) -> Element<'a, Message> {
    let user_options = users.iter().map(|u| (u.id, u.name.clone())).collect();

    let mut form = column()
        .spacing(12)
        .push(text_field(fl!("field-title"), draft.title.as_str(), move |v| {
            on_field(TaskField::Title(v))
        }))
        .push(text_field(fl!("field-description"), draft.description.as_str(), move |v| {
            on_field(TaskField::Description(v))
        }))
        .push(labelled(
            fl!("field-status"),
            choices(&FORM_STATUSES, draft.status.as_ref(), |s| s.to_string(), move |s| {
                on_field(TaskField::Status(s))
            }),
        ))
        .push(labelled(
            fl!("field-priority"),
            choices(Priority::ALL, draft.priority.as_ref(), |p| p.to_string(), move |p| {
                on_field(TaskField::Priority(p))
            }),
        ))
        .push(hinted_field(
            fl!("field-start-date"),
            fl!("hint-date"),
            inputs.get(InputField::StartDate),
            |v| Message::Input(InputField::StartDate, v),
        ))
        .push(hinted_field(
            fl!("field-due-date"),
            fl!("hint-date"),
            inputs.get(InputField::DueDate),
            |v| Message::Input(InputField::DueDate, v),
        ));

    if let Some(projects) = projects {
        let options = projects.iter().map(|p| (p.id, p.name.clone())).collect();
        form = form.push(labelled(
            fl!("field-project"),
            id_dropdown(fl!("option-none"), options, draft.project_id, move |id| {
                on_field(TaskField::Project(id))
            }),
        ));
    }

    form.push(labelled(
        fl!("field-assignee"),
        id_dropdown(fl!("option-none"), user_options, draft.assigned_to_user_id, move |id| {
            on_field(TaskField::Assignee(id))
        }),
    ))
    .push(submit_row(save))
    .into()
}

pub fn apply_field(draft: &mut TaskDraft, field: TaskField) {
    match field {
        TaskField::Title(v) => draft.title = v,
        TaskField::Description(v) => draft.description = v,
        TaskField::Status(s) => draft.status = Some(s),
        TaskField::Priority(p) => draft.priority = Some(p),
        TaskField::Project(id) => draft.project_id = id,
        TaskField::Assignee(id) => draft.assigned_to_user_id = id,
    }
}

/// Fill the date inputs from a draft that is about to be edited.
pub fn prefill(inputs: &mut Inputs, draft: &TaskDraft) {
    inputs.clear();
    inputs.set_date(InputField::StartDate, draft.start_date);
    inputs.set_date(InputField::DueDate, draft.due_date);
}

/// Copy the typed dates into the draft before it is sent.
pub fn take_dates(inputs: &Inputs, draft: &mut TaskDraft) {
    draft.start_date = inputs.date(InputField::StartDate);
    draft.due_date = inputs.date(InputField::DueDate);
}

pub fn update(v: &mut TasksView, msg: TasksMsg, inputs: &mut Inputs) -> Effect {
    match msg {
        TasksMsg::Search(s) => v.set_search(&s),
        TasksMsg::StatusFilter(s) => v.set_status_filter(s),
        TasksMsg::PriorityFilter(p) => v.set_priority_filter(p),
        TasksMsg::Sort(s) => v.sort = s,
        TasksMsg::Page(p) => v.paginator.set_page(p),
        TasksMsg::Click(id) => {
            let mut v = v.clone();
            return run(async move {
                let out = v.click(id).await;
                Finished::maybe(Screen::Tasks(v), out)
            });
        }
        TasksMsg::New => {
            return match v.open_create() {
                Ok(()) => {
                    inputs.clear();
                    Effect::Open(Drawer::NewTask)
                }
                Err(out) => refused(out),
            };
        }
        TasksMsg::Edit(id) => {
            return match v.open_edit(id) {
                Ok(()) => {
                    prefill(inputs, &v.form);
                    Effect::Open(Drawer::EditTask(id))
                }
                Err(out) => refused(out),
            };
        }
        TasksMsg::Form(field) => apply_field(&mut v.form, field),
        TasksMsg::Save => {
            take_dates(inputs, &mut v.form);
            let mut v = v.clone();
            return run(async move {
                let out = v.save().await;
                Finished::outcome(Screen::Tasks(v), out)
            });
        }
        TasksMsg::Delete(id) => {
            let mut v = v.clone();
            return run(async move {
                let out = v.delete(id).await;
                Finished::outcome(Screen::Tasks(v), out)
            });
        }
    }
    Effect::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn typed_dates_reach_the_draft() {
        let mut draft = TaskDraft {
            due_date: NaiveDate::from_ymd_opt(2024, 5, 2),
            ..TaskDraft::default()
        };
        let mut inputs = Inputs::default();
        prefill(&mut inputs, &draft);
        assert_eq!(inputs.get(InputField::DueDate), "2024-05-02");
        assert_eq!(inputs.get(InputField::StartDate), "");

        inputs.set(InputField::StartDate, "2024-05-01");
        inputs.set(InputField::DueDate, "amanhã");
        take_dates(&inputs, &mut draft);
        assert_eq!(draft.start_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(draft.due_date, None);
    }
}
