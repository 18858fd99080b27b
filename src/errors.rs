use chrono::NaiveDate;
use thiserror::Error;

/// Error type for rejected entity construction or assignment.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("invalid project tag `{0}`: must start with '#' and contain no whitespace")]
    InvalidTag(String),
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("period end {end} is before period start {start}")]
    PeriodOrder { start: NaiveDate, end: NaiveDate },
    #[error("time entry `{title}` ends before it begins")]
    NegativeDuration { title: String },
    #[error("a project titled `{0}` already exists")]
    DuplicateProjectTitle(String),
    #[error("a project tagged `{0}` already exists")]
    DuplicateProjectTag(String),
}
