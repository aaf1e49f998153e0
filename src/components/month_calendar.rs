use chrono::{Datelike, NaiveDate};
use cosmic::Element;
use cosmic::iced::Length;
use cosmic::widget::{button, column, container, row, text};

use gestao::fl;
use gestao::pages::appointments::AppointmentsView;

use crate::message::{CalendarMsg, Message};

/// Day number, with the number of appointments under it when there are any.
fn cell_label(date: NaiveDate, count: usize) -> String {
    if count == 0 {
        format!("{}\n ", date.day())
    } else {
        format!("{}\n• {}", date.day(), count)
    }
}

fn day_label<'a>(label: String) -> Element<'a, Message> {
    container(text::caption(label))
        .width(Length::FillPortion(1))
        .center_x(Length::FillPortion(1))
        .into()
}

/// Month grid of the calendar's focus month. Clicking a day selects it.
pub fn month_calendar<'a>(view: &AppointmentsView, today: NaiveDate) -> Element<'a, Message> {
    let focus = view.calendar.focus;

    let mut labels = row().spacing(0);
    for name in fl!("calendar-weekdays").split_whitespace() {
        labels = labels.push(day_label(name.to_string()));
    }

    let mut grid = column().spacing(2).push(labels);

    for week in view.calendar.month_grid() {
        let mut week_row = row().spacing(0);
        for date in week {
            let in_month = date.month() == focus.month() && date.year() == focus.year();
            let cell: Element<'a, Message> = if !in_month {
                container(text::body(" "))
                    .width(Length::FillPortion(1))
                    .center_x(Length::FillPortion(1))
                    .into()
            } else {
                let label = cell_label(date, view.day(date).len());
                let txt = if date == today {
                    text::body(label).font(cosmic::iced::Font {
                        weight: cosmic::iced::font::Weight::Bold,
                        ..Default::default()
                    })
                } else {
                    text::body(label)
                };
                let content = container(txt.center()).center_x(Length::Fill);
                let class = if view.calendar.selected_day == Some(date) {
                    cosmic::theme::Button::Suggested
                } else {
                    cosmic::theme::Button::Text
                };
                button::custom(content)
                    .class(class)
                    .on_press(Message::Calendar(CalendarMsg::SelectDay(date)))
                    .width(Length::FillPortion(1))
                    .into()
            };
            week_row = week_row.push(cell);
        }
        grid = grid.push(week_row);
    }

    container(grid).width(Length::Fill).padding(8).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_days_show_their_count() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert_eq!(cell_label(d, 0), "7\n ");
        assert_eq!(cell_label(d, 3), "7\n• 3");
    }
}
