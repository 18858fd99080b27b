use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Abstract unit a contract is billed in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
}

impl TimeUnit {
    /// Converts the unit to its exact duration.
    pub fn to_duration(self) -> Duration {
        match self {
            TimeUnit::Minute => Duration::minutes(1),
            TimeUnit::Hour => Duration::hours(1),
            TimeUnit::Day => Duration::days(1),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
        }
    }
}

/// Invoicing frequency configured on a contract.
///
/// An opaque label: no recurrence duration is defined for cycles here,
/// scheduling belongs to the surrounding collaborators.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Cycle {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Cycle {
    pub fn label(self) -> &'static str {
        match self {
            Cycle::Weekly => "Weekly",
            Cycle::Monthly => "Monthly",
            Cycle::Quarterly => "Quarterly",
            Cycle::Yearly => "Yearly",
        }
    }
}
