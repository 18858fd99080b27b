//! Aggregates raw calendar intervals into billable timesheet hours.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{Duration, NaiveDate, NaiveTime};

use super::{ServiceError, ServiceResult};
use crate::calendar::{Calendar, TimeEntry};
use crate::domain::{EntityId, TimeTrackingItem, Timesheet};
use crate::store::{Store, StoreError};

/// A billing period at year, month, or day granularity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    start: NaiveDate,
    end: NaiveDate,
    label: String,
}

impl Period {
    /// Parses `YYYY`, `YYYY-MM`, or `YYYY-MM-DD`.
    pub fn parse(raw: &str) -> ServiceResult<Self> {
        let raw = raw.trim();
        let invalid = || ServiceError::InvalidPeriod(raw.to_string());
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(Self {
                start: date,
                end: date,
                label: date.format("%Y-%m-%d").to_string(),
            });
        }
        let parts: Vec<&str> = raw.split('-').collect();
        match parts.as_slice() {
            [year, month] => {
                let year: i32 = year.parse().map_err(|_| invalid())?;
                let month: u32 = month.parse().map_err(|_| invalid())?;
                let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
                let end = month_end(year, month).ok_or_else(invalid)?;
                Ok(Self {
                    start,
                    end,
                    label: format!("{:04}-{:02}", year, month),
                })
            }
            [year] => {
                let year: i32 = year.parse().map_err(|_| invalid())?;
                let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
                let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(invalid)?;
                Ok(Self {
                    start,
                    end,
                    label: format!("{:04}", year),
                })
            }
            _ => Err(invalid()),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).map(|first| first - Duration::days(1))
}

/// One materialized line of a timesheet table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimesheetRow {
    pub date: NaiveDate,
    pub hours: i64,
    pub comment: String,
}

/// Builds timesheets from calendar data and exports them.
pub struct TimesheetService;

impl TimesheetService {
    /// Aggregates the calendar into a persisted timesheet for the
    /// project: rows matching the period and the client/tag title are
    /// grouped by calendar date and summed into whole hours.
    ///
    /// An empty filter result saves an empty timesheet, not an error.
    pub fn generate(
        store: &mut Store,
        calendar: &Calendar,
        project_id: EntityId,
        period: &Period,
        client: &str,
        comment: Option<&str>,
        today: NaiveDate,
    ) -> ServiceResult<EntityId> {
        let tag = store
            .project(project_id)
            .ok_or(StoreError::NotFound {
                kind: "project",
                id: project_id,
            })?
            .tag
            .clone();
        let entries = calendar.to_time_entries()?;
        let per_day = aggregate(&entries, period, client);

        let timesheet = Timesheet::new(
            format!("{} {}", client, period),
            today,
            period.start(),
            period.end(),
            project_id,
        );
        let sheet_id = store.save_timesheet(timesheet)?;
        for (date, total) in per_day {
            let hours = whole_hours(total);
            let begin = date.and_time(NaiveTime::MIN);
            let end = begin + Duration::hours(hours);
            let item = TimeTrackingItem::new(
                sheet_id,
                begin,
                end,
                client,
                tag.clone(),
                comment.map(String::from),
            )?;
            store.save_time_tracking_item(item);
        }
        Ok(sheet_id)
    }

    /// The timesheet's table, rows sorted by date ascending.
    pub fn rows(store: &Store, timesheet_id: EntityId) -> ServiceResult<Vec<TimesheetRow>> {
        if store.timesheet(timesheet_id).is_none() {
            return Err(StoreError::NotFound {
                kind: "timesheet",
                id: timesheet_id,
            }
            .into());
        }
        let mut items = store.timesheet_items(timesheet_id);
        items.sort_by_key(|item| item.begin);
        Ok(items
            .into_iter()
            .map(|item| TimesheetRow {
                date: item.begin.date(),
                hours: whole_hours(item.duration()),
                comment: item.description.clone().unwrap_or_default(),
            })
            .collect())
    }

    pub fn total_hours(store: &Store, timesheet_id: EntityId) -> ServiceResult<i64> {
        Ok(Self::rows(store, timesheet_id)?
            .iter()
            .map(|row| row.hours)
            .sum())
    }

    /// Writes the timesheet table as a spreadsheet file: header, rows
    /// sorted by date (`YYYY/MM/DD`), then a synthetic `Total` row.
    pub fn export(store: &Store, timesheet_id: EntityId, path: &Path) -> ServiceResult<()> {
        let rows = Self::rows(store, timesheet_id)?;
        let total: i64 = rows.iter().map(|row| row.hours).sum();
        let mut out = String::from("date,hours,comment\n");
        for row in &rows {
            out.push_str(&format!(
                "{},{},{}\n",
                row.date.format("%Y/%m/%d"),
                row.hours,
                csv_field(&row.comment)
            ));
        }
        out.push_str(&format!("Total,{},\n", total));
        let mut file = File::create(path)?;
        file.write_all(out.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

fn aggregate(
    entries: &[TimeEntry],
    period: &Period,
    client: &str,
) -> BTreeMap<NaiveDate, Duration> {
    let mut per_day = BTreeMap::new();
    for entry in entries {
        if !period.contains(entry.begin.date()) || entry.title != client {
            continue;
        }
        let slot = per_day
            .entry(entry.begin.date())
            .or_insert_with(Duration::zero);
        *slot = *slot + entry.duration;
    }
    per_day
}

// Whole hours only: days x 24 plus the hour component. Minutes below
// the hour are dropped.
fn whole_hours(total: Duration) -> i64 {
    let days = total.num_days();
    let hour_component = (total - Duration::days(days)).num_hours();
    days * 24 + hour_component
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
