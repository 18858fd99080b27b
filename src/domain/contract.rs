use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Cycle, EntityId, TimeUnit};

const DEFAULT_UNITS_PER_WORKDAY: u32 = 8;
const DEFAULT_TERM_OF_PAYMENT_DAYS: u32 = 31;

/// A contract defines the business conditions of a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contract {
    pub id: Option<EntityId>,
    pub title: String,
    pub client_id: EntityId,
    pub signature_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Rate per unit, kept at two decimal places.
    pub rate: Decimal,
    /// ISO currency code, e.g. "EUR".
    pub currency: String,
    pub vat_rate: Decimal,
    pub unit: TimeUnit,
    pub units_per_workday: u32,
    /// Total units contracted, if a volume was agreed.
    pub volume: Option<u32>,
    /// Payment term in days; due dates are undefined without it.
    pub term_of_payment: Option<u32>,
    pub billing_cycle: Cycle,
    pub is_completed: bool,
}

impl Contract {
    pub fn new(
        title: impl Into<String>,
        client_id: EntityId,
        signature_date: NaiveDate,
        start_date: NaiveDate,
        rate: Decimal,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            client_id,
            signature_date,
            start_date,
            end_date: None,
            rate: rate.round_dp(2),
            currency: currency.into(),
            vat_rate: Self::default_vat_rate(),
            unit: TimeUnit::Hour,
            units_per_workday: DEFAULT_UNITS_PER_WORKDAY,
            volume: None,
            term_of_payment: Some(DEFAULT_TERM_OF_PAYMENT_DAYS),
            billing_cycle: Cycle::Monthly,
            is_completed: false,
        }
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_vat_rate(mut self, vat_rate: Decimal) -> Self {
        self.vat_rate = vat_rate;
        self
    }

    pub fn with_unit(mut self, unit: TimeUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_units_per_workday(mut self, units: u32) -> Self {
        self.units_per_workday = units;
        self
    }

    pub fn with_volume(mut self, volume: u32) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_term_of_payment(mut self, days: Option<u32>) -> Self {
        self.term_of_payment = days;
        self
    }

    pub fn with_billing_cycle(mut self, cycle: Cycle) -> Self {
        self.billing_cycle = cycle;
        self
    }

    /// Contracted volume expressed as a concrete time span.
    pub fn volume_as_time(&self) -> Option<Duration> {
        self.volume
            .map(|units| self.unit.to_duration() * units as i32)
    }

    pub fn default_vat_rate() -> Decimal {
        Decimal::new(19, 2)
    }
}
