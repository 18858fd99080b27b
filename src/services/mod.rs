//! Computation engines that turn tracked time into timesheets and
//! VAT-correct invoices.

pub mod invoice_service;
pub mod timesheet_service;

pub use invoice_service::{InvoiceService, InvoiceTotals};
pub use timesheet_service::{Period, TimesheetRow, TimesheetService};

use crate::calendar::CalendarError;
use crate::errors::ValidationError;
use crate::store::StoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid period `{0}`: expected YYYY, YYYY-MM or YYYY-MM-DD")]
    InvalidPeriod(String),
    #[error("{entity} has no {field} configured")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },
    #[error("{0}")]
    Invalid(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
