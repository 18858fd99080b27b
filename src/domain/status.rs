use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Contract, Project};

/// Lifecycle state derived from dates and the completed flag.
///
/// `None` from the derivation functions is the caller's default bucket
/// (an "All" filter); every other state is exactly one of these.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Status {
    Active,
    Upcoming,
    Completed,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Active => "Active",
            Status::Upcoming => "Upcoming",
            Status::Completed => "Completed",
        }
    }
}

pub fn is_upcoming(start_date: NaiveDate, today: NaiveDate) -> bool {
    start_date > today
}

/// A contract is active until the day before its end date (exclusive).
pub fn contract_is_active(contract: &Contract, today: NaiveDate) -> bool {
    !contract.is_completed
        && !is_upcoming(contract.start_date, today)
        && contract.end_date.map_or(true, |end| end > today)
}

/// A project is still active on its end date (inclusive), unlike a
/// contract.
pub fn project_is_active(project: &Project, today: NaiveDate) -> bool {
    !project.is_completed
        && !is_upcoming(project.start_date, today)
        && project.end_date >= today
}

/// Active takes precedence over Upcoming, which takes precedence over
/// the completed flag.
pub fn contract_status(contract: &Contract, today: NaiveDate) -> Option<Status> {
    if contract_is_active(contract, today) {
        Some(Status::Active)
    } else if is_upcoming(contract.start_date, today) {
        Some(Status::Upcoming)
    } else if contract.is_completed {
        Some(Status::Completed)
    } else {
        None
    }
}

pub fn project_status(project: &Project, today: NaiveDate) -> Option<Status> {
    if project_is_active(project, today) {
        Some(Status::Active)
    } else if is_upcoming(project.start_date, today) {
        Some(Status::Upcoming)
    } else if project.is_completed {
        Some(Status::Completed)
    } else {
        None
    }
}

/// Renders a derived status, falling back to the caller's filter label.
pub fn status_label(status: Option<Status>, default: &str) -> &str {
    match status {
        Some(status) => status.label(),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn contract(start: NaiveDate, end: Option<NaiveDate>, completed: bool) -> Contract {
        let mut contract = Contract::new(
            "Ducts",
            1,
            start,
            start,
            Decimal::new(9000, 2),
            "EUR",
        );
        contract.end_date = end;
        contract.is_completed = completed;
        contract
    }

    fn project(start: NaiveDate, end: NaiveDate, completed: bool) -> Project {
        let mut project = Project::new("Ducts", "#ducts", "", start, end, 1).unwrap();
        project.is_completed = completed;
        project
    }

    #[test]
    fn start_today_is_not_upcoming() {
        let today = day(2024, 3, 1);
        assert!(!is_upcoming(today, today));
        assert!(is_upcoming(day(2024, 3, 2), today));
    }

    #[test]
    fn contract_end_today_is_inactive_but_project_end_today_is_active() {
        let today = day(2024, 6, 30);
        let start = day(2024, 1, 1);

        let contract = contract(start, Some(today), false);
        assert!(!contract_is_active(&contract, today));
        assert_eq!(contract_status(&contract, today), None);

        let project = project(start, today, false);
        assert!(project_is_active(&project, today));
        assert_eq!(project_status(&project, today), Some(Status::Active));
    }

    #[test]
    fn open_ended_contract_is_active_once_started() {
        let today = day(2024, 3, 1);
        let contract = contract(day(2024, 1, 1), None, false);
        assert_eq!(contract_status(&contract, today), Some(Status::Active));
    }

    #[test]
    fn upcoming_wins_over_completed_flag() {
        let today = day(2024, 3, 1);
        let contract = contract(day(2024, 4, 1), None, true);
        assert_eq!(contract_status(&contract, today), Some(Status::Upcoming));
    }

    #[test]
    fn completed_flag_applies_once_dates_no_longer_qualify() {
        let today = day(2024, 7, 15);
        let flagged = contract(day(2024, 1, 1), Some(day(2024, 6, 30)), true);
        assert_eq!(contract_status(&flagged, today), Some(Status::Completed));

        let ended_not_flagged = contract(day(2024, 1, 1), Some(day(2024, 6, 30)), false);
        assert_eq!(contract_status(&ended_not_flagged, today), None);
    }

    #[test]
    fn status_label_falls_back_to_caller_default() {
        assert_eq!(status_label(Some(Status::Active), "All"), "Active");
        assert_eq!(status_label(None, "All"), "All");
    }
}
