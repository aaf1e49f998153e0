pub mod form;
pub mod month_calendar;
pub mod notices;
