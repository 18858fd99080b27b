use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EntityId;

/// An issued (or issuable) invoice for one project under one contract.
///
/// Timesheets attach through their `invoice_id`, line items through
/// `InvoiceItem::invoice_id`; totals are computed over the items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Invoice {
    pub id: Option<EntityId>,
    pub number: String,
    /// Issue date.
    pub date: NaiveDate,
    pub contract_id: EntityId,
    pub project_id: EntityId,
    pub sent: bool,
    pub paid: bool,
    pub cancelled: bool,
    pub rendered: bool,
}

impl Invoice {
    pub fn new(
        number: impl Into<String>,
        date: NaiveDate,
        contract_id: EntityId,
        project_id: EntityId,
    ) -> Self {
        Self {
            id: None,
            number: number.into(),
            date,
            contract_id,
            project_id,
            sent: false,
            paid: false,
            cancelled: false,
            rendered: false,
        }
    }
}

/// One billable line contributing to an invoice's total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvoiceItem {
    pub id: Option<EntityId>,
    pub invoice_id: EntityId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    pub description: String,
    /// VAT rate carried by the item itself; callers populate it from the
    /// contract at creation.
    pub vat_rate: Decimal,
}

impl InvoiceItem {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        invoice_id: EntityId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        quantity: Decimal,
        unit: impl Into<String>,
        unit_price: Decimal,
        description: impl Into<String>,
        vat_rate: Decimal,
    ) -> Self {
        Self {
            id: None,
            invoice_id,
            start_date,
            end_date,
            quantity,
            unit: unit.into(),
            unit_price,
            description: description.into(),
            vat_rate,
        }
    }

    pub fn subtotal(&self) -> Decimal {
        self.quantity * self.unit_price
    }

    pub fn vat(&self) -> Decimal {
        self.subtotal() * self.vat_rate
    }
}

/// Net sum of the given items.
pub fn invoice_sum<'a>(items: impl IntoIterator<Item = &'a InvoiceItem>) -> Decimal {
    items
        .into_iter()
        .map(InvoiceItem::subtotal)
        .fold(Decimal::ZERO, |acc, value| acc + value)
}

/// VAT sum of the given items.
pub fn invoice_vat_total<'a>(items: impl IntoIterator<Item = &'a InvoiceItem>) -> Decimal {
    items
        .into_iter()
        .map(|item| item.vat())
        .fold(Decimal::ZERO, |acc, value| acc + value)
}

/// Gross total: net sum plus VAT, as exact decimal arithmetic.
pub fn invoice_total<'a>(items: impl IntoIterator<Item = &'a InvoiceItem> + Clone) -> Decimal {
    invoice_sum(items.clone()) + invoice_vat_total(items)
}
