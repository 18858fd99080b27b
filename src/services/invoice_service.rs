//! Derives invoice numbers, totals, due dates, and project progress.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use super::{ServiceError, ServiceResult};
use crate::calendar::TimeEntry;
use crate::domain::{
    invoice_sum, invoice_vat_total, Contract, EntityId, Invoice, InvoiceItem, Project,
};
use crate::store::{Store, StoreError};

/// Exact decimal totals of one invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub sum: Decimal,
    pub vat_total: Decimal,
    pub total: Decimal,
}

pub struct InvoiceService;

impl InvoiceService {
    /// Invoice number for an issue date and a per-day sequence counter.
    ///
    /// The caller owns the counter: reusing a value for two invoices
    /// issued on the same day produces colliding numbers.
    pub fn generate_number(date: NaiveDate, counter: u32) -> String {
        format!("{}-{:02}", date.format("%Y-%m-%d"), counter)
    }

    /// Materializes an invoice for the project from the given
    /// timesheets: one line item per timesheet, priced and taxed from
    /// the project's contract, and attaches each timesheet.
    pub fn generate(
        store: &mut Store,
        project_id: EntityId,
        timesheet_ids: &[EntityId],
        date: NaiveDate,
        counter: u32,
    ) -> ServiceResult<EntityId> {
        let project = store
            .project(project_id)
            .cloned()
            .ok_or(StoreError::NotFound {
                kind: "project",
                id: project_id,
            })?;
        let contract = store
            .contract(project.contract_id)
            .cloned()
            .ok_or(StoreError::NotFound {
                kind: "contract",
                id: project.contract_id,
            })?;
        for &sheet_id in timesheet_ids {
            let sheet = store.timesheet(sheet_id).ok_or(StoreError::NotFound {
                kind: "timesheet",
                id: sheet_id,
            })?;
            if sheet.invoice_id.is_some() {
                return Err(ServiceError::Invalid(format!(
                    "timesheet {} is already attached to an invoice",
                    sheet_id
                )));
            }
        }

        let number = Self::generate_number(date, counter);
        let invoice = Invoice::new(number, date, project.contract_id, project_id);
        let invoice_id = store.save_invoice(invoice);
        for &sheet_id in timesheet_ids {
            let sheet = store.timesheet(sheet_id).cloned().ok_or(StoreError::NotFound {
                kind: "timesheet",
                id: sheet_id,
            })?;
            let hours = store.timesheet_total(sheet_id).num_hours();
            let item = InvoiceItem::new(
                invoice_id,
                sheet.period_start,
                sheet.period_end,
                Decimal::from(hours),
                contract.unit.label(),
                contract.rate,
                sheet.title.clone(),
                contract.vat_rate,
            );
            store.save_invoice_item(item);
            store.attach_timesheet(sheet_id, invoice_id)?;
        }
        Ok(invoice_id)
    }

    /// Net, VAT, and gross totals as exact decimal sums over the
    /// invoice's items.
    pub fn totals(store: &Store, invoice_id: EntityId) -> ServiceResult<InvoiceTotals> {
        if store.invoice(invoice_id).is_none() {
            return Err(StoreError::NotFound {
                kind: "invoice",
                id: invoice_id,
            }
            .into());
        }
        let items = store.invoice_items_of(invoice_id);
        let sum = invoice_sum(items.iter().copied());
        let vat_total = invoice_vat_total(items.iter().copied());
        Ok(InvoiceTotals {
            sum,
            vat_total,
            total: sum + vat_total,
        })
    }

    /// Due date from the contract's payment term; undefined (not
    /// defaulted) when no term is set.
    pub fn due_date(invoice: &Invoice, contract: &Contract) -> Option<NaiveDate> {
        contract
            .term_of_payment
            .map(|days| invoice.date + Duration::days(days as i64))
    }

    /// Document prefix consumed by the rendering collaborator.
    pub fn prefix(invoice: &Invoice, client_name: &str) -> String {
        format!("{}-{}", invoice.number, slugify(client_name))
    }

    pub fn file_name(invoice: &Invoice, client_name: &str) -> String {
        format!("{}.pdf", Self::prefix(invoice, client_name))
    }

    /// Fraction of the contracted volume already tracked for the
    /// project's tag. Zero matching rows mean zero progress; a missing
    /// volume is a configuration error, not an arithmetic fault.
    pub fn progress(
        project: &Project,
        contract: &Contract,
        entries: &[TimeEntry],
    ) -> ServiceResult<f64> {
        let volume = contract.volume.ok_or(ServiceError::MissingField {
            entity: "contract",
            field: "volume",
        })?;
        if volume == 0 {
            return Err(ServiceError::Invalid(
                "contract volume must be positive".into(),
            ));
        }
        let total = entries
            .iter()
            .filter(|entry| entry.tag == project.tag)
            .fold(Duration::zero(), |acc, entry| acc + entry.duration);
        let budget = Duration::hours(volume as i64);
        Ok(total.num_seconds() as f64 / budget.num_seconds() as f64)
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::new();
    let mut last_dash = false;
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !slug.is_empty() && !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}
