use chrono::{NaiveDate, NaiveDateTime};
use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, row, scrollable, text};

use gestao::core::appointment::Appointment;
use gestao::fl;
use gestao::pages::appointments::{AppointmentsView, CalendarMode};
use gestao::pages::format_day;

use super::{Drawer, Effect, Finished, InputField, Inputs, Screen, missing, refused, run};
use crate::components::form::{
    choices, heading, hinted_field, icon_button, id_dropdown, labelled, submit_row, text_field,
};
use crate::components::month_calendar::month_calendar;
use crate::message::{AppointmentField, CalendarMsg, Message};

const MODES: [CalendarMode; 4] = [CalendarMode::Month, CalendarMode::Week, CalendarMode::Day, CalendarMode::Agenda];

fn mode_label(mode: &CalendarMode) -> String {
    match mode {
        CalendarMode::Month => fl!("calendar-month"),
        CalendarMode::Week => fl!("calendar-week"),
        CalendarMode::Day => fl!("calendar-day"),
        CalendarMode::Agenda => fl!("calendar-agenda"),
    }
}

fn period_label(v: &AppointmentsView) -> String {
    if v.calendar.mode == CalendarMode::Month {
        return v.calendar.focus.format("%m/%Y").to_string();
    }
    let (first, last) = v.calendar.range();
    if first == last {
        format_day(Some(first))
    } else {
        format!("{} - {}", format_day(Some(first)), format_day(Some(last)))
    }
}

/// The day new appointments and copies default to.
fn working_day(v: &AppointmentsView) -> NaiveDate {
    v.calendar.selected_day.unwrap_or(v.calendar.focus)
}

fn appointment_row<'a>(ap: &Appointment, editable: bool) -> Element<'a, Message> {
    let mut details = column()
        .spacing(2)
        .push(text::body(ap.title.clone()))
        .push(text::caption(ap.assignee_name().to_string()));
    if let Some(local) = ap.local.as_deref().filter(|l| !l.is_empty()) {
        details = details.push(text::caption(local.to_string()));
    }

    let mut line = row()
        .spacing(8)
        .align_y(Alignment::Center)
        .push(
            text::caption(format!("{} {}-{}", ap.start.format("%d/%m"), ap.start.format("%H:%M"), ap.end.format("%H:%M")))
                .width(Length::Fixed(110.0)),
        )
        .push(details.width(Length::Fill));
    if editable {
        line = line
            .push(icon_button("document-edit-symbolic", Message::Calendar(CalendarMsg::Edit(ap.id))))
            .push(icon_button(
                "appointment-soon-symbolic",
                Message::Calendar(CalendarMsg::OpenReschedule(ap.id)),
            ))
            .push(icon_button("edit-copy-symbolic", Message::Calendar(CalendarMsg::OpenCopy(ap.id))))
            .push(icon_button(
                "edit-delete-symbolic",
                Message::Calendar(CalendarMsg::Delete(ap.id)).confirmed(),
            ));
    }
    container(line)
        .padding(8)
        .width(Length::Fill)
        .class(cosmic::theme::Container::Card)
        .into()
}

pub fn view<'a>(v: &'a AppointmentsView) -> Element<'a, Message> {
    let today = chrono::Local::now().date_naive();
    let editable = v.can_edit();

    let mut actions = Vec::new();
    if editable {
        actions.push(
            button::standard(fl!("calendar-copy-day"))
                .on_press(Message::Calendar(CalendarMsg::OpenCopyDay))
                .into(),
        );
        actions.push(
            button::standard(fl!("calendar-copy-range"))
                .on_press(Message::Calendar(CalendarMsg::OpenCopyRange))
                .into(),
        );
        actions.push(
            button::suggested(fl!("calendar-new"))
                .on_press(Message::Calendar(CalendarMsg::New(working_day(v))))
                .into(),
        );
    }

    let controls = row()
        .spacing(8)
        .align_y(Alignment::Center)
        .push(icon_button("go-previous-symbolic", Message::Calendar(CalendarMsg::Prev)))
        .push(button::standard(fl!("calendar-today")).on_press(Message::Calendar(CalendarMsg::Today)))
        .push(icon_button("go-next-symbolic", Message::Calendar(CalendarMsg::Next)))
        .push(text::title4(period_label(v)).width(Length::Fill))
        .push(choices(&MODES, Some(&v.calendar.mode), mode_label, |m| {
            Message::Calendar(CalendarMsg::Mode(m))
        }));

    let users = v.users.iter().map(|u| (u.id, u.name.clone())).collect();
    let mut content = column()
        .spacing(12)
        .push(heading(fl!("nav-calendar"), actions))
        .push(controls)
        .push(labelled(
            fl!("field-assignee"),
            id_dropdown(fl!("filter-all"), users, v.user_filter, |id| {
                Message::Calendar(CalendarMsg::UserFilter(id))
            }),
        ));

    let listed = if v.calendar.mode == CalendarMode::Month {
        content = content.push(month_calendar(v, today));
        match v.calendar.selected_day {
            Some(day) => {
                content = content.push(text::title4(format_day(Some(day))));
                v.day(day)
            }
            None => Vec::new(),
        }
    } else {
        v.in_period()
    };

    if listed.is_empty() {
        content = content.push(text::body(fl!("calendar-empty")));
    }
    for ap in listed {
        content = content.push(appointment_row(ap, editable));
    }

    container(scrollable(content.padding(16)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn date_field<'a>(label: String, field: InputField, inputs: &'a Inputs) -> Element<'a, Message> {
    hinted_field(label, fl!("hint-date"), inputs.get(field), move |s| Message::Input(field, s))
}

fn time_field<'a>(label: String, field: InputField, inputs: &'a Inputs) -> Element<'a, Message> {
    hinted_field(label, fl!("hint-time"), inputs.get(field), move |s| Message::Input(field, s))
}

fn appointment_form<'a>(v: &'a AppointmentsView, inputs: &'a Inputs) -> Element<'a, Message> {
    let form = &v.form;
    let users = v.users.iter().map(|u| (u.id, u.name.clone())).collect();
    let clients = v.clients.iter().map(|c| (c.id, c.name.clone())).collect();
    let projects = v.projects.iter().map(|p| (p.id, p.name.clone())).collect();
    let field = |f| Message::Calendar(CalendarMsg::Form(f));

    column()
        .spacing(12)
        .push(text_field(fl!("field-title"), form.title.as_str(), move |s| field(AppointmentField::Title(s))))
        .push(text_field(fl!("field-description"), form.description.as_str(), move |s| {
            field(AppointmentField::Description(s))
        }))
        .push(text_field(fl!("field-local"), form.local.as_str(), move |s| field(AppointmentField::Local(s))))
        .push(date_field(fl!("field-date"), InputField::Date, inputs))
        .push(time_field(fl!("field-start-time"), InputField::Start, inputs))
        .push(time_field(fl!("field-end-time"), InputField::End, inputs))
        .push(labelled(
            fl!("field-assignee"),
            id_dropdown(fl!("option-none"), users, form.user_id, |id| {
                Message::Calendar(CalendarMsg::Form(AppointmentField::User(id)))
            }),
        ))
        .push(labelled(
            fl!("field-client"),
            id_dropdown(fl!("option-none"), clients, form.client_id, |id| {
                Message::Calendar(CalendarMsg::Form(AppointmentField::Client(id)))
            }),
        ))
        .push(labelled(
            fl!("field-project"),
            id_dropdown(fl!("option-none"), projects, form.project_id, |id| {
                Message::Calendar(CalendarMsg::Form(AppointmentField::Project(id)))
            }),
        ))
        .push(submit_row(Message::Calendar(CalendarMsg::Save)))
        .into()
}

pub fn drawer<'a>(v: &'a AppointmentsView, drawer: &Drawer, inputs: &'a Inputs) -> Option<Element<'a, Message>> {
    let form: Element<'a, Message> = match drawer {
        Drawer::Appointment => appointment_form(v, inputs),
        Drawer::Reschedule(id) => column()
            .spacing(12)
            .push(date_field(fl!("field-date"), InputField::Date, inputs))
            .push(time_field(fl!("field-start-time"), InputField::Start, inputs))
            .push(time_field(fl!("field-end-time"), InputField::End, inputs))
            .push(submit_row(Message::Calendar(CalendarMsg::Reschedule(*id))))
            .into(),
        Drawer::CopyAppointment(id) => column()
            .spacing(12)
            .push(date_field(fl!("field-target-date"), InputField::Target, inputs))
            .push(submit_row(Message::Calendar(CalendarMsg::Copy(*id))))
            .into(),
        Drawer::CopyDay => column()
            .spacing(12)
            .push(date_field(fl!("field-source-date"), InputField::Date, inputs))
            .push(date_field(fl!("field-target-date"), InputField::Target, inputs))
            .push(submit_row(Message::Calendar(CalendarMsg::CopyDay)))
            .into(),
        Drawer::CopyRange => column()
            .spacing(12)
            .push(date_field(fl!("field-source-start"), InputField::Date, inputs))
            .push(date_field(fl!("field-source-end"), InputField::SourceEnd, inputs))
            .push(date_field(fl!("field-target-date"), InputField::Target, inputs))
            .push(submit_row(Message::Calendar(CalendarMsg::CopyRange)))
            .into(),
        _ => return None,
    };
    Some(form)
}

/// Start and end typed into the reschedule form.
fn typed_range(inputs: &Inputs) -> Result<(NaiveDateTime, NaiveDateTime), &'static str> {
    let date = inputs.date(InputField::Date).ok_or("date")?;
    let start = inputs.time(InputField::Start).ok_or("start_time")?;
    let end = inputs.time(InputField::End).ok_or("end_time")?;
    Ok((date.and_time(start), date.and_time(end)))
}

fn apply_field(v: &mut AppointmentsView, field: AppointmentField) {
    let form = &mut v.form;
    match field {
        AppointmentField::Title(s) => form.title = s,
        AppointmentField::Description(s) => form.description = s,
        AppointmentField::Local(s) => form.local = s,
        AppointmentField::User(id) => form.user_id = id,
        AppointmentField::Client(id) => form.client_id = id,
        AppointmentField::Project(id) => form.project_id = id,
    }
}

fn send<F, Fut>(v: &AppointmentsView, op: F) -> Effect
where
    F: FnOnce(AppointmentsView) -> Fut,
    Fut: std::future::Future<Output = Finished> + Send + 'static,
{
    run(op(v.clone()))
}

pub fn update(v: &mut AppointmentsView, msg: CalendarMsg, inputs: &mut Inputs) -> Effect {
    match msg {
        CalendarMsg::Mode(m) => v.calendar.mode = m,
        CalendarMsg::Prev => v.calendar.prev(),
        CalendarMsg::Next => v.calendar.next(),
        CalendarMsg::Today => {
            let today = chrono::Local::now().date_naive();
            v.calendar.focus = today;
            v.calendar.selected_day = Some(today);
        }
        CalendarMsg::SelectDay(day) => v.calendar.select_day(day),
        CalendarMsg::UserFilter(id) => v.user_filter = id,
        CalendarMsg::New(day) => {
            return match v.open_create(day) {
                Ok(()) => {
                    inputs.clear();
                    inputs.set_date(InputField::Date, Some(day));
                    Effect::Open(Drawer::Appointment)
                }
                Err(out) => refused(out),
            };
        }
        CalendarMsg::Edit(id) => {
            return match v.open_edit(id) {
                Ok(()) => {
                    inputs.clear();
                    inputs.set_date(InputField::Date, v.form.date);
                    inputs.set_time(InputField::Start, v.form.start_time);
                    inputs.set_time(InputField::End, v.form.end_time);
                    Effect::Open(Drawer::Appointment)
                }
                Err(out) => refused(out),
            };
        }
        CalendarMsg::Form(field) => apply_field(v, field),
        CalendarMsg::Save => {
            v.form.date = inputs.date(InputField::Date);
            v.form.start_time = inputs.time(InputField::Start);
            v.form.end_time = inputs.time(InputField::End);
            return send(v, |mut v| async move {
                let out = v.save().await;
                Finished::outcome(Screen::Calendar(v), out)
            });
        }
        CalendarMsg::Delete(id) => {
            return send(v, |mut v| async move {
                let out = v.delete(id).await;
                Finished::outcome(Screen::Calendar(v), out)
            });
        }
        CalendarMsg::OpenReschedule(id) => {
            let Some(ap) = v.appointments.iter().find(|ap| ap.id == id) else {
                return Effect::None;
            };
            inputs.clear();
            inputs.set_date(InputField::Date, Some(ap.start.date()));
            inputs.set_time(InputField::Start, Some(ap.start.time()));
            inputs.set_time(InputField::End, Some(ap.end.time()));
            return Effect::Open(Drawer::Reschedule(id));
        }
        CalendarMsg::Reschedule(id) => {
            let (start, end) = match typed_range(inputs) {
                Ok(range) => range,
                Err(field) => return missing(field),
            };
            return send(v, |mut v| async move {
                let out = v.move_to(id, start, end).await;
                Finished::outcome(Screen::Calendar(v), out)
            });
        }
        CalendarMsg::OpenCopy(id) => {
            inputs.clear();
            return Effect::Open(Drawer::CopyAppointment(id));
        }
        CalendarMsg::Copy(id) => {
            let Some(target) = inputs.date(InputField::Target) else {
                return missing("target_date");
            };
            return send(v, |mut v| async move {
                let out = v.copy_to(id, target).await;
                Finished::outcome(Screen::Calendar(v), out)
            });
        }
        CalendarMsg::OpenCopyDay => {
            inputs.clear();
            inputs.set_date(InputField::Date, Some(working_day(v)));
            return Effect::Open(Drawer::CopyDay);
        }
        CalendarMsg::CopyDay => {
            let Some(source) = inputs.date(InputField::Date) else {
                return missing("source_date");
            };
            let Some(target) = inputs.date(InputField::Target) else {
                return missing("target_date");
            };
            return send(v, |mut v| async move {
                let out = v.copy_day(source, target).await;
                Finished::outcome(Screen::Calendar(v), out)
            });
        }
        CalendarMsg::OpenCopyRange => {
            let (first, last) = v.calendar.range();
            inputs.clear();
            inputs.set_date(InputField::Date, Some(first));
            inputs.set_date(InputField::SourceEnd, Some(last));
            return Effect::Open(Drawer::CopyRange);
        }
        CalendarMsg::CopyRange => {
            let Some(source_start) = inputs.date(InputField::Date) else {
                return missing("source_start");
            };
            let Some(source_end) = inputs.date(InputField::SourceEnd) else {
                return missing("source_end");
            };
            let Some(target) = inputs.date(InputField::Target) else {
                return missing("target_date");
            };
            return send(v, |mut v| async move {
                let out = v.copy_range(source_start, source_end, target).await;
                Finished::outcome(Screen::Calendar(v), out)
            });
        }
    }
    Effect::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn reschedule_needs_every_bound() {
        let mut inputs = Inputs::default();
        assert_eq!(typed_range(&inputs), Err("date"));

        inputs.set(InputField::Date, "2024-06-10");
        inputs.set(InputField::Start, "14:00");
        assert_eq!(typed_range(&inputs), Err("end_time"));

        inputs.set(InputField::End, "15:30");
        let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert_eq!(
            typed_range(&inputs),
            Ok((
                day.and_time(NaiveTime::from_hms_opt(14, 0, 0).unwrap()),
                day.and_time(NaiveTime::from_hms_opt(15, 30, 0).unwrap()),
            ))
        );
    }
}
