use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};

use super::{Notice, Outcome, current_user, done, failed, forbidden, load_failed, rejected};
use crate::api::ApiClient;
use crate::core::appointment::{
    self, Appointment, AppointmentDraft, copy_one, plan_day_copy, plan_range_copy, reschedule,
};
use crate::core::client::Client;
use crate::core::permissions::{Action, Section, allows};
use crate::core::project::Project;
use crate::core::user::User;
use crate::fl;

/// Days covered by the agenda view.
pub const AGENDA_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarMode {
    #[default]
    Month,
    Week,
    Day,
    Agenda,
}

impl CalendarMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "month" => Some(Self::Month),
            "week" => Some(Self::Week),
            "day" => Some(Self::Day),
            "agenda" => Some(Self::Agenda),
            _ => None,
        }
    }
}

/// Which slice of time the calendar shows.
#[derive(Debug, Clone)]
pub struct CalendarState {
    pub mode: CalendarMode,
    /// Any day inside the displayed period.
    pub focus: NaiveDate,
    pub selected_day: Option<NaiveDate>,
}

fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_monday() as i64)
}

fn month_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = day.with_day(1).unwrap_or(day);
    let last = first
        .checked_add_months(Months::new(1))
        .map(|d| d - Duration::days(1))
        .unwrap_or(first);
    (first, last)
}

impl CalendarState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            mode: CalendarMode::Month,
            focus: today,
            selected_day: Some(today),
        }
    }

    pub fn prev(&mut self) {
        self.focus = match self.mode {
            CalendarMode::Month => self
                .focus
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.focus),
            CalendarMode::Week => self.focus - Duration::days(7),
            CalendarMode::Day => self.focus - Duration::days(1),
            CalendarMode::Agenda => self.focus - Duration::days(AGENDA_DAYS),
        };
        self.selected_day = None;
    }

    pub fn next(&mut self) {
        self.focus = match self.mode {
            CalendarMode::Month => self
                .focus
                .checked_add_months(Months::new(1))
                .unwrap_or(self.focus),
            CalendarMode::Week => self.focus + Duration::days(7),
            CalendarMode::Day => self.focus + Duration::days(1),
            CalendarMode::Agenda => self.focus + Duration::days(AGENDA_DAYS),
        };
        self.selected_day = None;
    }

    pub fn select_day(&mut self, date: NaiveDate) {
        if self.selected_day == Some(date) {
            self.selected_day = None;
        } else {
            self.selected_day = Some(date);
        }
    }

    /// First and last day (inclusive) of the displayed period.
    pub fn range(&self) -> (NaiveDate, NaiveDate) {
        match self.mode {
            CalendarMode::Month => month_bounds(self.focus),
            CalendarMode::Week => {
                let first = week_start(self.focus);
                (first, first + Duration::days(6))
            }
            CalendarMode::Day => (self.focus, self.focus),
            CalendarMode::Agenda => (self.focus, self.focus + Duration::days(AGENDA_DAYS - 1)),
        }
    }

    /// Month grid: whole weeks starting on Monday, covering the month.
    pub fn month_grid(&self) -> Vec<[NaiveDate; 7]> {
        let (first, last) = month_bounds(self.focus);
        let mut weeks = Vec::new();
        let mut start = week_start(first);
        while start <= last {
            let mut week = [start; 7];
            for (i, day) in week.iter_mut().enumerate() {
                *day = start + Duration::days(i as i64);
            }
            weeks.push(week);
            start += Duration::days(7);
        }
        weeks
    }
}

#[derive(Debug, Clone)]
pub struct AppointmentsView {
    api: ApiClient,
    pub appointments: Vec<Appointment>,
    pub users: Vec<User>,
    pub clients: Vec<Client>,
    pub projects: Vec<Project>,
    /// Narrow the calendar to one assignee. Ignored for guests.
    pub user_filter: Option<i64>,
    pub calendar: CalendarState,
    pub form: AppointmentDraft,
    pub editing: Option<i64>,
}

impl AppointmentsView {
    pub fn new(api: ApiClient, today: NaiveDate) -> Self {
        Self {
            api,
            appointments: Vec::new(),
            users: Vec::new(),
            clients: Vec::new(),
            projects: Vec::new(),
            user_filter: None,
            calendar: CalendarState::new(today),
            form: AppointmentDraft::default(),
            editing: None,
        }
    }

    pub async fn load(&mut self) -> Vec<Notice> {
        let (appointments, users, clients, projects) = futures::join!(
            self.api.list_appointments(),
            self.api.list_users(),
            self.api.list_clients(),
            self.api.list_projects()
        );
        let mut notices = Vec::new();
        match appointments {
            Ok(list) => self.appointments = list,
            Err(e) => notices.push(load_failed("appointments", &e, fl!("appointments-load-failed"))),
        }
        match users {
            Ok(list) => self.users = list,
            Err(e) => notices.push(load_failed("users", &e, fl!("users-load-failed"))),
        }
        match clients {
            Ok(list) => self.clients = list,
            Err(e) => notices.push(load_failed("clients", &e, fl!("clients-load-failed"))),
        }
        match projects {
            Ok(list) => self.projects = list,
            Err(e) => notices.push(load_failed("projects", &e, fl!("projects-load-failed"))),
        }
        notices
    }

    async fn reload(&mut self) {
        match self.api.list_appointments().await {
            Ok(list) => self.appointments = list,
            Err(e) => log::error!("Reloading appointments failed: {}", e),
        }
    }

    /// Appointments shown to the current user, after the assignee filter.
    pub fn visible(&self) -> Vec<&Appointment> {
        match self.api.session().user() {
            Some(user) => appointment::visible_to(&self.appointments, &user, self.user_filter),
            None => Vec::new(),
        }
    }

    /// Visible appointments inside the displayed period, earliest first.
    pub fn in_period(&self) -> Vec<&Appointment> {
        let (first, last) = self.calendar.range();
        let mut list: Vec<&Appointment> = self
            .visible()
            .into_iter()
            .filter(|ap| {
                let day = ap.start.date();
                day >= first && day <= last
            })
            .collect();
        list.sort_by_key(|ap| ap.start);
        list
    }

    pub fn day(&self, day: NaiveDate) -> Vec<&Appointment> {
        appointment::on_day(&self.visible(), day)
    }

    pub fn can_edit(&self) -> bool {
        self.api
            .session()
            .user()
            .is_some_and(|u| allows(&u.role, Section::Calendar, Action::Edit))
    }

    /// Staff only; every other role gets a notice and nothing is sent.
    fn editor(&self) -> Result<User, Outcome> {
        let user = current_user(self.api.session())?;
        if allows(&user.role, Section::Calendar, Action::Create) {
            Ok(user)
        } else {
            Err(forbidden())
        }
    }

    fn find(&self, id: i64) -> Option<&Appointment> {
        self.appointments.iter().find(|ap| ap.id == id)
    }

    /// Open the create form on a clicked slot.
    pub fn open_create(&mut self, day: NaiveDate) -> Result<(), Outcome> {
        self.editor()?;
        self.form = AppointmentDraft {
            date: Some(day),
            ..AppointmentDraft::default()
        };
        self.editing = None;
        Ok(())
    }

    pub fn open_edit(&mut self, id: i64) -> Result<(), Outcome> {
        self.editor()?;
        let ap = self.find(id).ok_or_else(forbidden)?;
        self.form = AppointmentDraft::from_appointment(ap);
        self.editing = Some(id);
        Ok(())
    }

    pub async fn save(&mut self) -> Outcome {
        if let Err(out) = self.editor() {
            return out;
        }
        let outcome = match self.editing {
            None => {
                let payload = match self.form.create_payload(&self.appointments) {
                    Ok(p) => p,
                    Err(e) => return rejected(e),
                };
                if let Err(e) = self.api.create_appointment(&payload).await {
                    return failed("create appointment", &e, fl!("appointments-save-failed"));
                }
                done(fl!("appointments-created"))
            }
            Some(id) => {
                let payload = match self.form.update_payload(id, &self.appointments) {
                    Ok(p) => p,
                    Err(e) => return rejected(e),
                };
                if let Err(e) = self.api.update_appointment(id, &payload).await {
                    return failed("update appointment", &e, fl!("appointments-save-failed"));
                }
                done(fl!("appointments-updated"))
            }
        };
        self.form = AppointmentDraft::default();
        self.editing = None;
        self.reload().await;
        outcome
    }

    pub async fn delete(&mut self, id: i64) -> Outcome {
        if let Err(out) = self.editor() {
            return out;
        }
        if let Err(e) = self.api.delete_appointment(id).await {
            return failed("delete appointment", &e, fl!("appointments-delete-failed"));
        }
        self.reload().await;
        done(fl!("appointments-deleted"))
    }

    /// Drag-move or resize to a new time range.
    pub async fn move_to(&mut self, id: i64, start: NaiveDateTime, end: NaiveDateTime) -> Outcome {
        if let Err(out) = self.editor() {
            return out;
        }
        let Some(ap) = self.find(id) else {
            return forbidden();
        };
        let range = match reschedule(&self.appointments, ap, start, end) {
            Ok(r) => r,
            Err(e) => return rejected(e),
        };
        if let Err(e) = self.api.reschedule_appointment(id, &range).await {
            return failed("reschedule appointment", &e, fl!("appointments-save-failed"));
        }
        self.reload().await;
        done(fl!("appointments-updated"))
    }

    pub async fn copy_to(&mut self, id: i64, target: NaiveDate) -> Outcome {
        if let Err(out) = self.editor() {
            return out;
        }
        let Some(ap) = self.find(id) else {
            return forbidden();
        };
        let payload = match copy_one(&self.appointments, ap, target) {
            Ok(p) => p,
            Err(e) => return rejected(e),
        };
        if let Err(e) = self.api.create_appointment(&payload).await {
            return failed("copy appointment", &e, fl!("appointments-copy-failed"));
        }
        self.reload().await;
        done(fl!("appointments-copied"))
    }

    pub async fn copy_day(&mut self, source: NaiveDate, target: NaiveDate) -> Outcome {
        if let Err(out) = self.editor() {
            return out;
        }
        let request = match plan_day_copy(&self.appointments, source, target) {
            Ok(r) => r,
            Err(e) => return rejected(e),
        };
        let reply = match self.api.copy_day(&request).await {
            Ok(r) => r,
            Err(e) => return failed("copy day", &e, fl!("appointments-copy-failed")),
        };
        log::info!("Copied {} to {}", source, target);
        self.reload().await;
        done(reply_message(reply.message))
    }

    pub async fn copy_range(
        &mut self,
        source_start: NaiveDate,
        source_end: NaiveDate,
        target_start: NaiveDate,
    ) -> Outcome {
        if let Err(out) = self.editor() {
            return out;
        }
        let request = match plan_range_copy(&self.appointments, source_start, source_end, target_start) {
            Ok(r) => r,
            Err(e) => return rejected(e),
        };
        let reply = match self.api.copy_range(&request).await {
            Ok(r) => r,
            Err(e) => return failed("copy range", &e, fl!("appointments-copy-failed")),
        };
        self.reload().await;
        done(reply_message(reply.message))
    }
}

fn reply_message(message: String) -> String {
    if message.trim().is_empty() {
        fl!("appointments-copied")
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::user::Role;
    use crate::session::{Session, SessionProvider};

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    fn view(role: Role, id: i64) -> AppointmentsView {
        let session = SessionProvider::with_session(Session {
            token: "t".into(),
            user: User {
                id,
                name: "u".into(),
                email: String::new(),
                role,
                contact: None,
                position: None,
                admission_date: None,
            },
        });
        let mut v = AppointmentsView::new(ApiClient::new("http://localhost:9", session).unwrap(), d(1, 17));
        v.appointments = serde_json::from_str(
            r#"[
            {"id":1,"title":"Standup","start":"2024-01-17 09:00:00","end":"2024-01-17 10:00:00","assigned_to":{"id":5,"name":"Ana"}},
            {"id":2,"title":"Visita","start":"2024-01-18 14:00:00","end":"2024-01-18 15:00:00","assigned_to":{"id":6,"name":"Bia"}},
            {"id":3,"title":"Review","start":"2024-02-02 09:00:00","end":"2024-02-02 09:30:00","assigned_to":{"id":5,"name":"Ana"}}
        ]"#,
        )
        .unwrap();
        v
    }

    #[test]
    fn month_grid_starts_on_monday() {
        let cal = CalendarState::new(d(1, 17));
        let grid = cal.month_grid();
        // January 2024 begins on a Monday
        assert_eq!(grid[0][0], d(1, 1));
        assert_eq!(grid.len(), 5);
        assert_eq!(cal.range(), (d(1, 1), d(1, 31)));
    }

    #[test]
    fn navigation_follows_mode() {
        let mut cal = CalendarState::new(d(1, 17));
        cal.mode = CalendarMode::Week;
        assert_eq!(cal.range(), (d(1, 15), d(1, 21)));
        cal.next();
        assert_eq!(cal.range().0, d(1, 22));
        cal.mode = CalendarMode::Agenda;
        assert_eq!(cal.range().1 - cal.range().0, Duration::days(AGENDA_DAYS - 1));
        cal.mode = CalendarMode::Month;
        cal.prev();
        assert_eq!(cal.range().0, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
    }

    #[test]
    fn guest_sees_only_own() {
        let mut v = view(Role::Convidado, 6);
        v.user_filter = Some(5);
        let ids: Vec<i64> = v.visible().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![2]);
        assert!(!v.can_edit());
    }

    #[test]
    fn period_narrows_to_displayed_month() {
        let v = view(Role::Admin, 1);
        let ids: Vec<i64> = v.in_period().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(v.day(d(1, 18)).len(), 1);
    }

    #[tokio::test]
    async fn overlapping_create_is_blocked() {
        let mut v = view(Role::Colaborador, 5);
        v.open_create(d(1, 17)).unwrap();
        v.form.title = "Outra".into();
        v.form.start_time = appointment::parse_time("09:30");
        v.form.end_time = appointment::parse_time("10:30");
        v.form.user_id = Some(5);
        assert!(v.save().await.is_rejected());
    }

    #[tokio::test]
    async fn guest_mutations_are_forbidden() {
        let mut v = view(Role::Convidado, 6);
        assert!(v.open_create(d(1, 20)).is_err());
        assert!(v.delete(2).await.is_rejected());
        assert!(v.copy_day(d(1, 18), d(1, 19)).await.is_rejected());
    }
}
