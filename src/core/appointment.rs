use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::client::ClientRef;
use super::dates;
use super::project::ProjectRef;
use super::user::{Role, User, UserRef};
use super::validation::{ValidationError, require};

/// Color given to appointments created from the console.
pub const DEFAULT_COLOR: &str = "#4caf50";

/// Calendar color for users without an assigned one.
pub const FALLBACK_USER_COLOR: &str = "#3174ad";

const USER_COLORS: [(i64, &str); 4] = [
    (1, "#f44336"),
    (2, "#2196f3"),
    (3, "#ff9800"),
    (4, "#9c27b0"),
];

pub fn user_color(user_id: Option<i64>) -> &'static str {
    user_id
        .and_then(|id| USER_COLORS.iter().find(|(uid, _)| *uid == id))
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_USER_COLOR)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub local: Option<String>,
    #[serde(with = "dates::datetime")]
    pub start: NaiveDateTime,
    #[serde(with = "dates::datetime")]
    pub end: NaiveDateTime,
    #[serde(default)]
    pub assigned_to: Option<UserRef>,
    #[serde(default)]
    pub client: Option<ClientRef>,
    #[serde(default)]
    pub project: Option<ProjectRef>,
    #[serde(default)]
    pub color: Option<String>,
}

impl Appointment {
    pub fn assignee_id(&self) -> Option<i64> {
        self.assigned_to.as_ref().map(|u| u.id)
    }

    pub fn assignee_name(&self) -> &str {
        self.assigned_to.as_ref().map(|u| u.name.as_str()).unwrap_or("-")
    }

    pub fn starts_on(&self, day: NaiveDate) -> bool {
        self.start.date() == day
    }

    pub fn calendar_color(&self) -> &'static str {
        user_color(self.assignee_id())
    }

    /// Same start time on `day`, same duration. An appointment that runs
    /// past midnight still ends on the following day.
    pub fn moved_to(&self, day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let start = day.and_time(self.start.time());
        (start, start + (self.end - self.start))
    }

    fn overlap_error(&self, start: NaiveDateTime, end: NaiveDateTime) -> ValidationError {
        ValidationError::Overlap {
            user: self.assignee_name().to_string(),
            start,
            end,
        }
    }
}

/// First appointment of `user_id`, other than `ignore_id`, whose range
/// intersects `[start, end)`. Back-to-back ranges don't intersect.
pub fn find_overlap(
    appointments: &[Appointment],
    user_id: i64,
    start: NaiveDateTime,
    end: NaiveDateTime,
    ignore_id: Option<i64>,
) -> Option<&Appointment> {
    appointments.iter().find(|ap| {
        ap.assignee_id() == Some(user_id)
            && Some(ap.id) != ignore_id
            && ap.start < end
            && ap.end > start
    })
}

pub fn has_overlap(
    appointments: &[Appointment],
    user_id: i64,
    start: NaiveDateTime,
    end: NaiveDateTime,
    ignore_id: Option<i64>,
) -> bool {
    find_overlap(appointments, user_id, start, end, ignore_id).is_some()
}

fn check_slot(
    appointments: &[Appointment],
    user_id: Option<i64>,
    start: NaiveDateTime,
    end: NaiveDateTime,
    ignore_id: Option<i64>,
) -> Result<(), ValidationError> {
    let Some(user_id) = user_id else {
        return Ok(());
    };
    match find_overlap(appointments, user_id, start, end, ignore_id) {
        Some(existing) => Err(existing.overlap_error(start, end)),
        None => Ok(()),
    }
}

/// Appointments the user gets to see. A guest only sees their own;
/// everybody else sees all of them, optionally narrowed to one assignee.
pub fn visible_to<'a>(
    appointments: &'a [Appointment],
    user: &User,
    user_filter: Option<i64>,
) -> Vec<&'a Appointment> {
    let only = match user.role {
        Role::Convidado => Some(user.id),
        _ => user_filter,
    };
    appointments
        .iter()
        .filter(|ap| only.is_none_or(|id| ap.assignee_id() == Some(id)))
        .collect()
}

/// Appointments starting on `day`, earliest first.
pub fn on_day<'a>(appointments: &[&'a Appointment], day: NaiveDate) -> Vec<&'a Appointment> {
    let mut list: Vec<&Appointment> = appointments
        .iter()
        .copied()
        .filter(|ap| ap.starts_on(day))
        .collect();
    list.sort_by_key(|ap| ap.start);
    list
}

/// Accepts `HH:MM` or `HH:MM:SS`.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

/// Create/edit form for an appointment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentDraft {
    pub title: String,
    pub description: String,
    pub local: String,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub user_id: Option<i64>,
    pub client_id: Option<i64>,
    pub project_id: Option<i64>,
}

/// Body of `POST /appointments` and `PATCH /appointments/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppointmentPayload {
    pub title: String,
    pub description: String,
    pub local: String,
    #[serde(with = "dates::datetime")]
    pub start: NaiveDateTime,
    #[serde(with = "dates::datetime")]
    pub end: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub assigned_to_user_id: Option<i64>,
    pub client_id: Option<i64>,
    pub project_id: Option<i64>,
}

/// Body of a drag-move or resize: only the time range changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reschedule {
    #[serde(with = "dates::datetime")]
    pub start: NaiveDateTime,
    #[serde(with = "dates::datetime")]
    pub end: NaiveDateTime,
}

impl AppointmentDraft {
    pub fn from_appointment(ap: &Appointment) -> Self {
        Self {
            title: ap.title.clone(),
            description: ap.description.clone().unwrap_or_default(),
            local: ap.local.clone().unwrap_or_default(),
            date: Some(ap.start.date()),
            start_time: Some(ap.start.time()),
            end_time: Some(ap.end.time()),
            user_id: ap.assignee_id(),
            client_id: ap.client.as_ref().map(|c| c.id),
            project_id: ap.project.as_ref().map(|p| p.id),
        }
    }

    /// Title, date and both times are required; end may equal start.
    pub fn bounds(&self) -> Result<(NaiveDateTime, NaiveDateTime), ValidationError> {
        require(&self.title, "title")?;
        let date = self.date.ok_or(ValidationError::Missing("date"))?;
        let start = self.start_time.ok_or(ValidationError::Missing("start_time"))?;
        let end = self.end_time.ok_or(ValidationError::Missing("end_time"))?;
        let (start, end) = (date.and_time(start), date.and_time(end));
        if end < start {
            return Err(ValidationError::EndBeforeStart);
        }
        Ok((start, end))
    }

    fn payload(&self, start: NaiveDateTime, end: NaiveDateTime, color: Option<String>) -> AppointmentPayload {
        AppointmentPayload {
            title: self.title.clone(),
            description: self.description.clone(),
            local: self.local.clone(),
            start,
            end,
            color,
            assigned_to_user_id: self.user_id,
            client_id: self.client_id,
            project_id: self.project_id,
        }
    }

    pub fn create_payload(&self, existing: &[Appointment]) -> Result<AppointmentPayload, ValidationError> {
        let (start, end) = self.bounds()?;
        check_slot(existing, self.user_id, start, end, None)?;
        Ok(self.payload(start, end, Some(DEFAULT_COLOR.to_string())))
    }

    /// Edit of appointment `id`; its own current slot is not a conflict.
    pub fn update_payload(&self, id: i64, existing: &[Appointment]) -> Result<AppointmentPayload, ValidationError> {
        let (start, end) = self.bounds()?;
        check_slot(existing, self.user_id, start, end, Some(id))?;
        Ok(self.payload(start, end, None))
    }
}

/// Drag-move or resize of `ap` to a new range.
pub fn reschedule(
    existing: &[Appointment],
    ap: &Appointment,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Reschedule, ValidationError> {
    if end < start {
        return Err(ValidationError::EndBeforeStart);
    }
    check_slot(existing, ap.assignee_id(), start, end, Some(ap.id))?;
    Ok(Reschedule { start, end })
}

/// Copy of a single appointment onto `target`, submitted as a plain create.
pub fn copy_one(
    existing: &[Appointment],
    ap: &Appointment,
    target: NaiveDate,
) -> Result<AppointmentPayload, ValidationError> {
    let (start, end) = ap.moved_to(target);
    check_slot(existing, ap.assignee_id(), start, end, None)?;
    Ok(AppointmentPayload {
        title: ap.title.clone(),
        description: ap.description.clone().unwrap_or_default(),
        local: ap.local.clone().unwrap_or_default(),
        start,
        end,
        color: Some(ap.color.clone().unwrap_or_else(|| DEFAULT_COLOR.to_string())),
        assigned_to_user_id: ap.assignee_id(),
        client_id: ap.client.as_ref().map(|c| c.id),
        project_id: ap.project.as_ref().map(|p| p.id),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyDayRequest {
    #[serde(with = "dates::date")]
    pub source_date: NaiveDate,
    #[serde(with = "dates::date")]
    pub target_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyRangeRequest {
    #[serde(with = "dates::date")]
    pub source_start: NaiveDate,
    #[serde(with = "dates::date")]
    pub source_end: NaiveDate,
    #[serde(with = "dates::date")]
    pub target_start: NaiveDate,
}

/// Checks every assigned appointment of `source` against its projection
/// onto `target`; the first conflict wins.
pub fn plan_day_copy(
    existing: &[Appointment],
    source: NaiveDate,
    target: NaiveDate,
) -> Result<CopyDayRequest, ValidationError> {
    for ap in existing.iter().filter(|ap| ap.starts_on(source)) {
        if ap.assignee_id().is_none() {
            continue;
        }
        let (start, end) = ap.moved_to(target);
        check_slot(existing, ap.assignee_id(), start, end, None)?;
    }
    Ok(CopyDayRequest {
        source_date: source,
        target_date: target,
    })
}

/// Range copy: everything starting within `[source_start, source_end]`
/// (whole days) shifts by `target_start - source_start` days.
pub fn plan_range_copy(
    existing: &[Appointment],
    source_start: NaiveDate,
    source_end: NaiveDate,
    target_start: NaiveDate,
) -> Result<CopyRangeRequest, ValidationError> {
    if source_end < source_start {
        return Err(ValidationError::EndBeforeStart);
    }
    let offset = Duration::days((target_start - source_start).num_days());
    for ap in existing {
        let day = ap.start.date();
        if day < source_start || day > source_end || ap.assignee_id().is_none() {
            continue;
        }
        check_slot(existing, ap.assignee_id(), ap.start + offset, ap.end + offset, None)?;
    }
    Ok(CopyRangeRequest {
        source_start,
        source_end,
        target_start,
    })
}

/// `{message}` reply of the copy endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CopyReply {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn appt(id: i64, user: Option<i64>, start: NaiveDateTime, end: NaiveDateTime) -> Appointment {
        Appointment {
            id,
            title: format!("ap{id}"),
            description: None,
            local: None,
            start,
            end,
            assigned_to: user.map(|id| UserRef {
                id,
                name: format!("user{id}"),
            }),
            client: None,
            project: None,
            color: None,
        }
    }

    fn draft(start: &str, end: &str) -> AppointmentDraft {
        AppointmentDraft {
            title: "Standup".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10),
            start_time: parse_time(start),
            end_time: parse_time(end),
            user_id: Some(7),
            ..AppointmentDraft::default()
        }
    }

    #[test]
    fn overlap_is_half_open() {
        let list = vec![appt(1, Some(7), at(10, 9, 0), at(10, 9, 30))];
        assert!(has_overlap(&list, 7, at(10, 9, 15), at(10, 9, 45), None));
        assert!(has_overlap(&list, 7, at(10, 8, 0), at(10, 10, 0), None));
        assert!(!has_overlap(&list, 7, at(10, 9, 30), at(10, 10, 0), None));
        assert!(!has_overlap(&list, 7, at(10, 8, 30), at(10, 9, 0), None));
        assert!(!has_overlap(&list, 8, at(10, 9, 0), at(10, 9, 30), None));
        assert!(!has_overlap(&list, 7, at(10, 9, 0), at(10, 9, 30), Some(1)));
    }

    #[test]
    fn unassigned_never_conflicts() {
        let list = vec![appt(1, None, at(10, 9, 0), at(10, 10, 0))];
        assert!(!has_overlap(&list, 7, at(10, 9, 0), at(10, 10, 0), None));
    }

    #[test]
    fn standup_scenario() {
        let first = draft("09:00", "09:30").create_payload(&[]).unwrap();
        assert_eq!(first.color.as_deref(), Some(DEFAULT_COLOR));
        let list = vec![appt(1, Some(7), first.start, first.end)];

        let clash = draft("09:15", "09:45").create_payload(&list);
        assert!(matches!(clash, Err(ValidationError::Overlap { .. })));

        let next = draft("09:30", "10:00").create_payload(&list).unwrap();
        assert_eq!(next.start, at(10, 9, 30));
        let json = serde_json::to_value(&next).unwrap();
        assert_eq!(json["start"], "2024-01-10 09:30:00");
        assert_eq!(json["assigned_to_user_id"], 7);
    }

    #[test]
    fn equal_times_accepted_reversed_rejected() {
        assert!(draft("09:00", "09:00").bounds().is_ok());
        assert_eq!(draft("10:00", "09:00").bounds(), Err(ValidationError::EndBeforeStart));
        let mut missing = draft("09:00", "10:00");
        missing.date = None;
        assert_eq!(missing.bounds(), Err(ValidationError::Missing("date")));
    }

    #[test]
    fn edit_ignores_own_slot() {
        let list = vec![appt(1, Some(7), at(10, 9, 0), at(10, 9, 30))];
        assert!(draft("09:00", "09:45").update_payload(1, &list).is_ok());
        assert!(draft("09:00", "09:45").update_payload(2, &list).is_err());
    }

    #[test]
    fn drag_checks_other_appointments() {
        let list = vec![
            appt(1, Some(7), at(10, 9, 0), at(10, 10, 0)),
            appt(2, Some(7), at(10, 11, 0), at(10, 12, 0)),
        ];
        assert!(reschedule(&list, &list[0], at(10, 9, 30), at(10, 10, 30)).is_ok());
        assert!(reschedule(&list, &list[0], at(10, 10, 30), at(10, 11, 30)).is_err());
    }

    #[test]
    fn day_copy_names_conflicting_user() {
        let list = vec![
            appt(1, Some(7), at(10, 9, 0), at(10, 10, 0)),
            appt(2, None, at(10, 9, 0), at(10, 10, 0)),
            appt(3, Some(7), at(11, 9, 30), at(11, 10, 30)),
        ];
        let source = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let err = plan_day_copy(&list, source, NaiveDate::from_ymd_opt(2024, 1, 11).unwrap()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Overlap {
                user: "user7".into(),
                start: at(11, 9, 0),
                end: at(11, 10, 0),
            }
        );
        let ok = plan_day_copy(&list, source, NaiveDate::from_ymd_opt(2024, 1, 12).unwrap()).unwrap();
        assert_eq!(serde_json::to_value(ok).unwrap()["target_date"], "2024-01-12");
    }

    #[test]
    fn range_copy_shifts_by_day_offset() {
        let list = vec![
            appt(1, Some(7), at(1, 9, 0), at(1, 10, 0)),
            appt(2, Some(7), at(2, 14, 0), at(2, 15, 0)),
            appt(3, Some(7), at(9, 14, 30), at(9, 15, 30)),
        ];
        let d = |n| NaiveDate::from_ymd_opt(2024, 1, n).unwrap();
        // appt 2 lands on the 9th at 14:00 and hits appt 3
        assert!(plan_range_copy(&list, d(1), d(2), d(8)).is_err());
        assert!(plan_range_copy(&list, d(1), d(1), d(8)).is_ok());
        assert_eq!(
            plan_range_copy(&list, d(2), d(1), d(8)),
            Err(ValidationError::EndBeforeStart)
        );
    }

    #[test]
    fn single_copy_keeps_color_and_links() {
        let mut ap = appt(1, Some(2), at(10, 9, 0), at(10, 10, 0));
        ap.color = Some("#123456".into());
        ap.client = Some(ClientRef { id: 4, name: "ACME".into() });
        let payload = copy_one(&[ap.clone()], &ap, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()).unwrap();
        assert_eq!(payload.start, at(15, 9, 0));
        assert_eq!(payload.color.as_deref(), Some("#123456"));
        assert_eq!(payload.client_id, Some(4));
        // copying onto the same day collides with itself
        assert!(copy_one(&[ap.clone()], &ap, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()).is_err());
    }

    #[test]
    fn copy_across_midnight_keeps_duration() {
        let night = appt(1, Some(7), at(10, 23, 0), at(11, 1, 0));
        let payload = copy_one(&[night.clone()], &night, NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()).unwrap();
        assert_eq!(payload.start, at(20, 23, 0));
        assert_eq!(payload.end, at(21, 1, 0));

        // the projected slot still conflicts with an early-morning booking
        let list = vec![night.clone(), appt(2, Some(7), at(21, 0, 30), at(21, 2, 0))];
        assert!(copy_one(&list, &night, NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()).is_err());
        let source = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert!(plan_day_copy(&list, source, NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()).is_err());
    }

    #[test]
    fn guest_sees_only_own_appointments() {
        let list = vec![
            appt(1, Some(7), at(10, 9, 0), at(10, 10, 0)),
            appt(2, Some(8), at(10, 9, 0), at(10, 10, 0)),
        ];
        let mut user = User {
            id: 8,
            name: "g".into(),
            email: String::new(),
            role: Role::Convidado,
            contact: None,
            position: None,
            admission_date: None,
        };
        let seen = visible_to(&list, &user, Some(7));
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].id, 2);

        user.role = Role::Admin;
        assert_eq!(visible_to(&list, &user, None).len(), 2);
        assert_eq!(visible_to(&list, &user, Some(7))[0].id, 1);
    }

    #[test]
    fn colors_by_user() {
        assert_eq!(user_color(Some(2)), "#2196f3");
        assert_eq!(user_color(Some(40)), FALLBACK_USER_COLOR);
        assert_eq!(user_color(None), FALLBACK_USER_COLOR);
    }
}
