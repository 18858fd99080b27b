//! Normalizes heterogeneous time-tracking sources into a uniform table
//! of time entries.
//!
//! Fetching cloud data and authenticating belong to surrounding
//! collaborators; this module owns the normalization contract only.

use std::path::PathBuf;

use chrono::{Duration, NaiveDateTime};
use thiserror::Error;

/// Failure modes of calendar normalization, each naming its stage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("unsupported calendar source: {0}")]
    UnsupportedSource(&'static str),
    #[error("calendar normalization failed: event `{title}` ends before it begins")]
    NegativeEvent { title: String },
    #[error("cloud calendar authentication failed: {0}")]
    Auth(String),
}

/// A raw event as delivered by a calendar source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub begin: NaiveDateTime,
    pub end: NaiveDateTime,
    pub title: String,
}

impl CalendarEvent {
    pub fn new(begin: NaiveDateTime, end: NaiveDateTime, title: impl Into<String>) -> Self {
        Self {
            begin,
            end,
            title: title.into(),
        }
    }
}

/// A cloud calendar whose events have already been fetched by the
/// cloud collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloudCalendar {
    pub name: String,
    pub events: Vec<CalendarEvent>,
}

impl CloudCalendar {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events: Vec::new(),
        }
    }

    pub fn with_events(mut self, events: Vec<CalendarEvent>) -> Self {
        self.events = events;
        self
    }
}

/// A file-based calendar; ingestion is declared but not yet built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCalendar {
    pub name: String,
    pub path: PathBuf,
}

/// Any concrete calendar variant the adapter understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Calendar {
    Cloud(CloudCalendar),
    File(FileCalendar),
}

impl Calendar {
    pub fn name(&self) -> &str {
        match self {
            Calendar::Cloud(calendar) => &calendar.name,
            Calendar::File(calendar) => &calendar.name,
        }
    }

    /// Produces the uniform interval table for this source.
    ///
    /// Cloud events carry their title verbatim as the tag. File-based
    /// sources report a typed unsupported-source failure instead of
    /// silently returning an empty table.
    pub fn to_time_entries(&self) -> Result<Vec<TimeEntry>, CalendarError> {
        match self {
            Calendar::Cloud(calendar) => calendar
                .events
                .iter()
                .map(|event| {
                    if event.end < event.begin {
                        return Err(CalendarError::NegativeEvent {
                            title: event.title.clone(),
                        });
                    }
                    Ok(TimeEntry {
                        begin: event.begin,
                        end: event.end,
                        title: event.title.clone(),
                        tag: event.title.clone(),
                        duration: event.end - event.begin,
                    })
                })
                .collect(),
            Calendar::File(_) => Err(CalendarError::UnsupportedSource("file calendar ingestion")),
        }
    }
}

/// One normalized row of the time-tracking table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntry {
    pub begin: NaiveDateTime,
    pub end: NaiveDateTime,
    pub title: String,
    pub tag: String,
    pub duration: Duration,
}

/// Holder for the normalized table, owned by the calling flow.
///
/// Replaces any process-global cache: callers create it, pass it along,
/// and clear it explicitly.
#[derive(Debug, Default)]
pub struct TimeEntryCache {
    entries: Option<Vec<TimeEntry>>,
}

impl TimeEntryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, entries: Vec<TimeEntry>) {
        self.entries = Some(entries);
    }

    pub fn get(&self) -> Option<&[TimeEntry]> {
        self.entries.as_deref()
    }

    pub fn clear(&mut self) {
        self.entries = None;
    }
}
