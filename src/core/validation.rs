use chrono::NaiveDateTime;
use thiserror::Error;

/// Client-side rule violations. Any of these blocks a submission before a
/// request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("required field missing: {0}")]
    Missing(&'static str),

    #[error("end precedes start")]
    EndBeforeStart,

    #[error("{user} already has an appointment between {start} and {end}")]
    Overlap {
        user: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("action not allowed for this role")]
    Forbidden,
}

/// Reject only when `end` is strictly earlier than `start`; equal bounds pass.
pub fn check_order<T: PartialOrd>(start: Option<T>, end: Option<T>) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(s), Some(e)) if e < s => Err(ValidationError::EndBeforeStart),
        _ => Ok(()),
    }
}

pub fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Missing(field))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn end_before_start_rejected_equal_accepted() {
        let a = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(check_order(Some(a), Some(b)), Err(ValidationError::EndBeforeStart));
        assert_eq!(check_order(Some(a), Some(a)), Ok(()));
        assert_eq!(check_order(Some(b), Some(a)), Ok(()));
        assert_eq!(check_order(None, Some(b)), Ok(()));
    }

    #[test]
    fn blank_is_missing() {
        assert_eq!(require("  ", "title"), Err(ValidationError::Missing("title")));
        assert!(require("x", "title").is_ok());
    }
}
