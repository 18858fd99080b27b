use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::errors::ValidationError;

/// A period-bounded collection of billable time entries for one project.
///
/// Items live in the store arena keyed by `timesheet_id`; totals and
/// emptiness are store queries over that collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Timesheet {
    pub id: Option<EntityId>,
    pub title: String,
    /// Creation date.
    pub date: NaiveDate,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub project_id: EntityId,
    pub rendered: bool,
    pub invoice_id: Option<EntityId>,
}

impl Timesheet {
    pub fn new(
        title: impl Into<String>,
        date: NaiveDate,
        period_start: NaiveDate,
        period_end: NaiveDate,
        project_id: EntityId,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            date,
            period_start,
            period_end,
            project_id,
            rendered: false,
            invoice_id: None,
        }
    }
}

/// One tracked interval of work, owned by at most one timesheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeTrackingItem {
    pub id: Option<EntityId>,
    pub timesheet_id: EntityId,
    pub begin: NaiveDateTime,
    pub end: NaiveDateTime,
    pub title: String,
    pub tag: String,
    pub description: Option<String>,
}

impl TimeTrackingItem {
    /// Creates an item, rejecting intervals that end before they begin.
    pub fn new(
        timesheet_id: EntityId,
        begin: NaiveDateTime,
        end: NaiveDateTime,
        title: impl Into<String>,
        tag: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if end < begin {
            return Err(ValidationError::NegativeDuration { title });
        }
        Ok(Self {
            id: None,
            timesheet_id,
            begin,
            end,
            title,
            tag: tag.into(),
            description,
        })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.begin
    }
}
