//! Billing domain models and derived-value helpers.

pub mod address;
pub mod client;
pub mod contact;
pub mod contract;
pub mod invoice;
pub mod project;
pub mod status;
pub mod time_unit;
pub mod timesheet;

pub use address::Address;
pub use client::Client;
pub use contact::Contact;
pub use contract::Contract;
pub use invoice::{invoice_sum, invoice_total, invoice_vat_total, Invoice, InvoiceItem};
pub use project::Project;
pub use status::{
    contract_is_active, contract_status, is_upcoming, project_is_active, project_status,
    status_label, Status,
};
pub use time_unit::{Cycle, TimeUnit};
pub use timesheet::{TimeTrackingItem, Timesheet};

/// Store-assigned numeric identifier shared by all entities.
pub type EntityId = u64;
