use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, row, scrollable, text};

use gestao::core::permissions::{Action, Section, allows};
use gestao::core::user::User;
use gestao::fl;
use gestao::pages::format_day;
use gestao::pages::layout::Route;
use gestao::pages::project_detail::ProjectDetailView;

use super::{Drawer, Effect, Finished, InputField, Inputs, Screen, run, tasks};
use crate::components::form::{heading, icon_button};
use crate::message::{Message, ProjectDetailMsg};
use crate::views::projects::{apply_field, project_form};

fn detail_line<'a>(label: String, value: String) -> Element<'a, Message> {
    row()
        .spacing(8)
        .push(text::caption(label).width(Length::Fixed(120.0)))
        .push(text::body(value))
        .into()
}

pub fn view<'a>(v: &'a ProjectDetailView, user: Option<&User>) -> Element<'a, Message> {
    let Some(project) = &v.project else {
        return container(text::body(fl!("project-load-failed"))).padding(16).into();
    };
    let now = chrono::Local::now().naive_local();

    let mut actions = Vec::new();
    if user.is_some_and(|u| v.can_manage_project(u)) {
        actions.push(icon_button("document-edit-symbolic", Message::Project(ProjectDetailMsg::Edit)));
        actions.push(icon_button(
            "edit-delete-symbolic",
            Message::Project(ProjectDetailMsg::Delete).confirmed(),
        ));
    }

    let associated: Vec<String> = project.associated_users.iter().map(|u| u.name.clone()).collect();
    let mut content = column()
        .spacing(8)
        .push(heading(project.name.clone(), actions))
        .push(detail_line(fl!("field-status"), project.display_status(now).to_string()))
        .push(detail_line(fl!("field-deadline"), format_day(project.deadline)))
        .push(detail_line(fl!("field-progress"), format!("{}%", project.progress.unwrap_or(0))))
        .push(detail_line(
            fl!("field-client"),
            project.client.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
        ))
        .push(detail_line(
            fl!("field-responsible"),
            project.responsible.as_ref().map(|u| u.name.clone()).unwrap_or_default(),
        ))
        .push(detail_line(fl!("field-associated"), associated.join(", ")))
        .push(text::body(project.description.clone().unwrap_or_default()));

    let mut task_actions = Vec::new();
    if user.is_some_and(|u| allows(&u.role, Section::Tasks, Action::Create)) {
        task_actions.push(
            button::suggested(fl!("tasks-new"))
                .on_press(Message::Project(ProjectDetailMsg::NewTask))
                .into(),
        );
    }
    content = content.push(heading(fl!("nav-tasks"), task_actions));

    if project.tasks.is_empty() {
        content = content.push(text::body(fl!("tasks-empty")));
    }
    for task in &project.tasks {
        let mut line = row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(text::body(task.title.clone()).width(Length::Fill))
            .push(text::caption(
                task.assigned_to.as_ref().map(|u| u.name.clone()).unwrap_or_default(),
            ))
            .push(text::caption(task.display_status(now).to_string()).width(Length::Fixed(110.0)))
            .push(text::caption(format_day(task.due_date)).width(Length::Fixed(90.0)));
        if user.is_some_and(|u| v.can_manage_task(task, u)) {
            if !task.is_done() {
                line = line.push(icon_button(
                    "object-select-symbolic",
                    Message::Project(ProjectDetailMsg::CompleteTask(task.id)),
                ));
            }
            line = line
                .push(icon_button(
                    "document-edit-symbolic",
                    Message::Project(ProjectDetailMsg::EditTask(task.id)),
                ))
                .push(icon_button(
                    "edit-delete-symbolic",
                    Message::Project(ProjectDetailMsg::DeleteTask(task.id)).confirmed(),
                ));
        }
        content = content.push(line);
    }

    container(scrollable(content.padding(16)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

pub fn drawer<'a>(v: &'a ProjectDetailView, drawer: &Drawer, inputs: &'a Inputs) -> Option<Element<'a, Message>> {
    let task_id = match drawer {
        Drawer::EditProject => {
            return Some(project_form(
                &v.project_form,
                None,
                &v.users,
                inputs,
                |f| Message::Project(ProjectDetailMsg::Form(f)),
                Message::Project(ProjectDetailMsg::Save),
                true,
            ));
        }
        Drawer::NewTask => None,
        Drawer::EditTask(id) => Some(*id),
        _ => return None,
    };
    Some(tasks::task_form(
        &v.task_form,
        None,
        &v.users,
        inputs,
        |f| Message::Project(ProjectDetailMsg::TaskForm(f)),
        Message::Project(ProjectDetailMsg::SaveTask(task_id)),
    ))
}

pub fn update(v: &mut ProjectDetailView, msg: ProjectDetailMsg, inputs: &mut Inputs) -> Effect {
    match msg {
        ProjectDetailMsg::Edit => {
            v.edit_project();
            inputs.clear();
            inputs.set_date(InputField::Deadline, v.project_form.deadline);
            return Effect::Open(Drawer::EditProject);
        }
        ProjectDetailMsg::Form(field) => apply_field(&mut v.project_form, field),
        ProjectDetailMsg::Save => {
            v.project_form.deadline = inputs.date(InputField::Deadline);
            let mut v = v.clone();
            return run(async move {
                let out = v.save_project().await;
                Finished::outcome(Screen::Project(v), out)
            });
        }
        ProjectDetailMsg::Delete => {
            let mut v = v.clone();
            return run(async move {
                let out = v.delete_project().await;
                let goto = out.is_done().then_some(Route::Projects);
                Finished {
                    goto,
                    ..Finished::outcome(Screen::Project(v), out)
                }
            });
        }
        ProjectDetailMsg::NewTask => {
            v.task_form = Default::default();
            inputs.clear();
            return Effect::Open(Drawer::NewTask);
        }
        ProjectDetailMsg::EditTask(id) => {
            if v.edit_task(id) {
                tasks::prefill(inputs, &v.task_form);
                return Effect::Open(Drawer::EditTask(id));
            }
        }
        ProjectDetailMsg::TaskForm(field) => tasks::apply_field(&mut v.task_form, field),
        ProjectDetailMsg::SaveTask(task_id) => {
            tasks::take_dates(inputs, &mut v.task_form);
            let mut v = v.clone();
            return run(async move {
                let out = match task_id {
                    Some(id) => v.save_task(id).await,
                    None => v.create_task().await,
                };
                Finished::outcome(Screen::Project(v), out)
            });
        }
        ProjectDetailMsg::DeleteTask(id) => {
            let mut v = v.clone();
            return run(async move {
                let out = v.delete_task(id).await;
                Finished::outcome(Screen::Project(v), out)
            });
        }
        ProjectDetailMsg::CompleteTask(id) => {
            let mut v = v.clone();
            return run(async move {
                let out = v.complete_task(id).await;
                Finished::outcome(Screen::Project(v), out)
            });
        }
    }
    Effect::None
}
