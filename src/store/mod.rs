//! In-memory arena of billing entities keyed by numeric identifier.
//!
//! Relationships are explicit foreign-key fields; reverse collections
//! are derived by id-ordered scans instead of a live object graph.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    Client, Contact, Contract, EntityId, Invoice, InvoiceItem, Project, TimeTrackingItem,
    Timesheet,
};
use crate::errors::ValidationError;

const CURRENT_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: EntityId },
}

/// The freelancer's whole book of business, persisted as one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub name: String,
    next_id: EntityId,
    #[serde(default)]
    pub clients: BTreeMap<EntityId, Client>,
    #[serde(default)]
    pub contacts: BTreeMap<EntityId, Contact>,
    #[serde(default)]
    pub contracts: BTreeMap<EntityId, Contract>,
    #[serde(default)]
    pub projects: BTreeMap<EntityId, Project>,
    #[serde(default)]
    pub timesheets: BTreeMap<EntityId, Timesheet>,
    #[serde(default)]
    pub time_tracking_items: BTreeMap<EntityId, TimeTrackingItem>,
    #[serde(default)]
    pub invoices: BTreeMap<EntityId, Invoice>,
    #[serde(default)]
    pub invoice_items: BTreeMap<EntityId, InvoiceItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Store::schema_version_default")]
    pub schema_version: u8,
}

impl Store {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            next_id: 1,
            clients: BTreeMap::new(),
            contacts: BTreeMap::new(),
            contracts: BTreeMap::new(),
            projects: BTreeMap::new(),
            timesheets: BTreeMap::new(),
            time_tracking_items: BTreeMap::new(),
            invoices: BTreeMap::new(),
            invoice_items: BTreeMap::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    /// Empties every arena; the identifier sequence keeps counting.
    pub fn clear(&mut self) {
        self.clients.clear();
        self.contacts.clear();
        self.contracts.clear();
        self.projects.clear();
        self.timesheets.clear();
        self.time_tracking_items.clear();
        self.invoices.clear();
        self.invoice_items.clear();
        self.touch();
    }

    // --- saves: assign an id on first persist, replace afterwards ---

    pub fn save_client(&mut self, mut client: Client) -> EntityId {
        let id = client.id.unwrap_or_else(|| self.allocate_id());
        client.id = Some(id);
        self.clients.insert(id, client);
        self.touch();
        id
    }

    pub fn save_contact(&mut self, mut contact: Contact) -> EntityId {
        let id = contact.id.unwrap_or_else(|| self.allocate_id());
        contact.id = Some(id);
        self.contacts.insert(id, contact);
        self.touch();
        id
    }

    /// Persists a contract; an end date before the start date is
    /// rejected here, at the persistence boundary.
    pub fn save_contract(&mut self, mut contract: Contract) -> Result<EntityId, ValidationError> {
        if let Some(end) = contract.end_date {
            if end < contract.start_date {
                return Err(ValidationError::EndBeforeStart {
                    start: contract.start_date,
                    end,
                });
            }
        }
        let id = contract.id.unwrap_or_else(|| self.allocate_id());
        contract.id = Some(id);
        self.contracts.insert(id, contract);
        self.touch();
        Ok(id)
    }

    /// Persists a project; titles and tags are unique across projects.
    pub fn save_project(&mut self, mut project: Project) -> Result<EntityId, ValidationError> {
        for (other_id, other) in &self.projects {
            if project.id == Some(*other_id) {
                continue;
            }
            if other.title == project.title {
                return Err(ValidationError::DuplicateProjectTitle(project.title.clone()));
            }
            if other.tag == project.tag {
                return Err(ValidationError::DuplicateProjectTag(project.tag.clone()));
            }
        }
        let id = project.id.unwrap_or_else(|| self.allocate_id());
        project.id = Some(id);
        self.projects.insert(id, project);
        self.touch();
        Ok(id)
    }

    pub fn save_timesheet(&mut self, mut timesheet: Timesheet) -> Result<EntityId, ValidationError> {
        if timesheet.period_end < timesheet.period_start {
            return Err(ValidationError::PeriodOrder {
                start: timesheet.period_start,
                end: timesheet.period_end,
            });
        }
        let id = timesheet.id.unwrap_or_else(|| self.allocate_id());
        timesheet.id = Some(id);
        self.timesheets.insert(id, timesheet);
        self.touch();
        Ok(id)
    }

    pub fn save_time_tracking_item(&mut self, mut item: TimeTrackingItem) -> EntityId {
        let id = item.id.unwrap_or_else(|| self.allocate_id());
        item.id = Some(id);
        self.time_tracking_items.insert(id, item);
        self.touch();
        id
    }

    pub fn save_invoice(&mut self, mut invoice: Invoice) -> EntityId {
        let id = invoice.id.unwrap_or_else(|| self.allocate_id());
        invoice.id = Some(id);
        self.invoices.insert(id, invoice);
        self.touch();
        id
    }

    pub fn save_invoice_item(&mut self, mut item: InvoiceItem) -> EntityId {
        let id = item.id.unwrap_or_else(|| self.allocate_id());
        item.id = Some(id);
        self.invoice_items.insert(id, item);
        self.touch();
        id
    }

    // --- lookups ---

    pub fn client(&self, id: EntityId) -> Option<&Client> {
        self.clients.get(&id)
    }

    pub fn contact(&self, id: EntityId) -> Option<&Contact> {
        self.contacts.get(&id)
    }

    pub fn contract(&self, id: EntityId) -> Option<&Contract> {
        self.contracts.get(&id)
    }

    pub fn project(&self, id: EntityId) -> Option<&Project> {
        self.projects.get(&id)
    }

    pub fn timesheet(&self, id: EntityId) -> Option<&Timesheet> {
        self.timesheets.get(&id)
    }

    pub fn time_tracking_item(&self, id: EntityId) -> Option<&TimeTrackingItem> {
        self.time_tracking_items.get(&id)
    }

    pub fn invoice(&self, id: EntityId) -> Option<&Invoice> {
        self.invoices.get(&id)
    }

    pub fn invoice_item(&self, id: EntityId) -> Option<&InvoiceItem> {
        self.invoice_items.get(&id)
    }

    // --- derived collections and values ---

    /// The client's invoicing contact, if one is assigned and present.
    pub fn invoicing_contact(&self, client_id: EntityId) -> Option<&Contact> {
        self.client(client_id)
            .and_then(|client| client.invoicing_contact_id)
            .and_then(|contact_id| self.contact(contact_id))
    }

    /// The client a project bills against, reached through its contract.
    pub fn project_client(&self, project_id: EntityId) -> Option<&Client> {
        self.project(project_id)
            .and_then(|project| self.contract(project.contract_id))
            .and_then(|contract| self.client(contract.client_id))
    }

    pub fn timesheet_items(&self, timesheet_id: EntityId) -> Vec<&TimeTrackingItem> {
        self.time_tracking_items
            .values()
            .filter(|item| item.timesheet_id == timesheet_id)
            .collect()
    }

    pub fn invoice_items_of(&self, invoice_id: EntityId) -> Vec<&InvoiceItem> {
        self.invoice_items
            .values()
            .filter(|item| item.invoice_id == invoice_id)
            .collect()
    }

    pub fn invoice_timesheets(&self, invoice_id: EntityId) -> Vec<&Timesheet> {
        self.timesheets
            .values()
            .filter(|sheet| sheet.invoice_id == Some(invoice_id))
            .collect()
    }

    pub fn project_timesheets(&self, project_id: EntityId) -> Vec<&Timesheet> {
        self.timesheets
            .values()
            .filter(|sheet| sheet.project_id == project_id)
            .collect()
    }

    pub fn project_invoices(&self, project_id: EntityId) -> Vec<&Invoice> {
        self.invoices
            .values()
            .filter(|invoice| invoice.project_id == project_id)
            .collect()
    }

    /// Sum of the timesheet's item durations; zero when it has none.
    pub fn timesheet_total(&self, timesheet_id: EntityId) -> Duration {
        self.timesheet_items(timesheet_id)
            .iter()
            .fold(Duration::zero(), |acc, item| acc + item.duration())
    }

    pub fn timesheet_is_empty(&self, timesheet_id: EntityId) -> bool {
        self.timesheet_items(timesheet_id).is_empty()
    }

    // --- flag mutations (rendering / send / pay lifecycle) ---

    pub fn attach_timesheet(
        &mut self,
        timesheet_id: EntityId,
        invoice_id: EntityId,
    ) -> Result<(), StoreError> {
        if !self.invoices.contains_key(&invoice_id) {
            return Err(StoreError::NotFound {
                kind: "invoice",
                id: invoice_id,
            });
        }
        let sheet = self
            .timesheets
            .get_mut(&timesheet_id)
            .ok_or(StoreError::NotFound {
                kind: "timesheet",
                id: timesheet_id,
            })?;
        sheet.invoice_id = Some(invoice_id);
        self.touch();
        Ok(())
    }

    pub fn mark_timesheet_rendered(&mut self, id: EntityId) -> Result<(), StoreError> {
        let sheet = self.timesheets.get_mut(&id).ok_or(StoreError::NotFound {
            kind: "timesheet",
            id,
        })?;
        sheet.rendered = true;
        self.touch();
        Ok(())
    }

    pub fn mark_invoice_rendered(&mut self, id: EntityId) -> Result<(), StoreError> {
        self.update_invoice(id, |invoice| invoice.rendered = true)
    }

    pub fn mark_invoice_sent(&mut self, id: EntityId) -> Result<(), StoreError> {
        self.update_invoice(id, |invoice| invoice.sent = true)
    }

    pub fn mark_invoice_paid(&mut self, id: EntityId) -> Result<(), StoreError> {
        self.update_invoice(id, |invoice| invoice.paid = true)
    }

    pub fn mark_invoice_cancelled(&mut self, id: EntityId) -> Result<(), StoreError> {
        self.update_invoice(id, |invoice| invoice.cancelled = true)
    }

    fn update_invoice<F>(&mut self, id: EntityId, mutator: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Invoice),
    {
        let invoice = self.invoices.get_mut(&id).ok_or(StoreError::NotFound {
            kind: "invoice",
            id,
        })?;
        mutator(invoice);
        self.touch();
        Ok(())
    }

    // --- deletes; parents are verified before any child is removed ---

    pub fn delete_client(&mut self, id: EntityId) -> Result<Client, StoreError> {
        let client = self
            .clients
            .remove(&id)
            .ok_or(StoreError::NotFound { kind: "client", id })?;
        self.touch();
        Ok(client)
    }

    pub fn delete_contact(&mut self, id: EntityId) -> Result<Contact, StoreError> {
        let contact = self
            .contacts
            .remove(&id)
            .ok_or(StoreError::NotFound { kind: "contact", id })?;
        self.touch();
        Ok(contact)
    }

    pub fn delete_contract(&mut self, id: EntityId) -> Result<Contract, StoreError> {
        let contract = self.contracts.remove(&id).ok_or(StoreError::NotFound {
            kind: "contract",
            id,
        })?;
        self.touch();
        Ok(contract)
    }

    pub fn delete_project(&mut self, id: EntityId) -> Result<Project, StoreError> {
        let project = self.projects.remove(&id).ok_or(StoreError::NotFound {
            kind: "project",
            id,
        })?;
        self.touch();
        Ok(project)
    }

    /// Deletes a timesheet and its time-tracking items.
    pub fn delete_timesheet(&mut self, id: EntityId) -> Result<Timesheet, StoreError> {
        if !self.timesheets.contains_key(&id) {
            return Err(StoreError::NotFound {
                kind: "timesheet",
                id,
            });
        }
        let item_ids: Vec<EntityId> = self
            .time_tracking_items
            .iter()
            .filter(|(_, item)| item.timesheet_id == id)
            .map(|(item_id, _)| *item_id)
            .collect();
        for item_id in item_ids {
            self.time_tracking_items.remove(&item_id);
        }
        let sheet = self.timesheets.remove(&id).ok_or(StoreError::NotFound {
            kind: "timesheet",
            id,
        })?;
        self.touch();
        Ok(sheet)
    }

    /// Deletes an invoice, its attached timesheets (with their items),
    /// and its line items.
    pub fn delete_invoice(&mut self, id: EntityId) -> Result<Invoice, StoreError> {
        if !self.invoices.contains_key(&id) {
            return Err(StoreError::NotFound { kind: "invoice", id });
        }
        let sheet_ids: Vec<EntityId> = self
            .timesheets
            .iter()
            .filter(|(_, sheet)| sheet.invoice_id == Some(id))
            .map(|(sheet_id, _)| *sheet_id)
            .collect();
        for sheet_id in sheet_ids {
            self.delete_timesheet(sheet_id)?;
        }
        let item_ids: Vec<EntityId> = self
            .invoice_items
            .iter()
            .filter(|(_, item)| item.invoice_id == id)
            .map(|(item_id, _)| *item_id)
            .collect();
        for item_id in item_ids {
            self.invoice_items.remove(&item_id);
        }
        let invoice = self
            .invoices
            .remove(&id)
            .ok_or(StoreError::NotFound { kind: "invoice", id })?;
        self.touch();
        Ok(invoice)
    }

    /// Reports dangling foreign keys without mutating anything.
    pub fn integrity_warnings(&self) -> Vec<String> {
        let client_ids: HashSet<_> = self.clients.keys().copied().collect();
        let contact_ids: HashSet<_> = self.contacts.keys().copied().collect();
        let contract_ids: HashSet<_> = self.contracts.keys().copied().collect();
        let project_ids: HashSet<_> = self.projects.keys().copied().collect();
        let timesheet_ids: HashSet<_> = self.timesheets.keys().copied().collect();
        let invoice_ids: HashSet<_> = self.invoices.keys().copied().collect();
        let mut warnings = Vec::new();

        for (id, client) in &self.clients {
            if let Some(contact_id) = client.invoicing_contact_id {
                if !contact_ids.contains(&contact_id) {
                    warnings.push(format!(
                        "client {} references missing invoicing contact {}",
                        id, contact_id
                    ));
                }
            }
        }
        for (id, contract) in &self.contracts {
            if !client_ids.contains(&contract.client_id) {
                warnings.push(format!(
                    "contract {} references unknown client {}",
                    id, contract.client_id
                ));
            }
        }
        for (id, project) in &self.projects {
            if !contract_ids.contains(&project.contract_id) {
                warnings.push(format!(
                    "project {} references unknown contract {}",
                    id, project.contract_id
                ));
            }
        }
        for (id, sheet) in &self.timesheets {
            if !project_ids.contains(&sheet.project_id) {
                warnings.push(format!(
                    "timesheet {} references unknown project {}",
                    id, sheet.project_id
                ));
            }
            if let Some(invoice_id) = sheet.invoice_id {
                if !invoice_ids.contains(&invoice_id) {
                    warnings.push(format!(
                        "timesheet {} references missing invoice {}",
                        id, invoice_id
                    ));
                }
            }
        }
        for (id, item) in &self.time_tracking_items {
            if !timesheet_ids.contains(&item.timesheet_id) {
                warnings.push(format!(
                    "time tracking item {} references unknown timesheet {}",
                    id, item.timesheet_id
                ));
            }
        }
        for (id, invoice) in &self.invoices {
            if !contract_ids.contains(&invoice.contract_id) {
                warnings.push(format!(
                    "invoice {} references unknown contract {}",
                    id, invoice.contract_id
                ));
            }
            if !project_ids.contains(&invoice.project_id) {
                warnings.push(format!(
                    "invoice {} references unknown project {}",
                    id, invoice.project_id
                ));
            }
        }
        for (id, item) in &self.invoice_items {
            if !invoice_ids.contains(&item.invoice_id) {
                warnings.push(format!(
                    "invoice item {} references unknown invoice {}",
                    id, item.invoice_id
                ));
            }
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store_with_contract() -> (Store, EntityId, EntityId) {
        let mut store = Store::new("freelance");
        let client_id = store.save_client(Client::new("Central Services"));
        let contract = Contract::new(
            "Ducts",
            client_id,
            day(2024, 1, 15),
            day(2024, 2, 1),
            Decimal::new(9000, 2),
            "EUR",
        );
        let contract_id = store.save_contract(contract).unwrap();
        (store, client_id, contract_id)
    }

    #[test]
    fn first_save_assigns_monotonic_ids() {
        let mut store = Store::new("freelance");
        let first = store.save_client(Client::new("A"));
        let second = store.save_client(Client::new("B"));
        assert!(second > first);
        assert_eq!(store.client(first).unwrap().id, Some(first));
    }

    #[test]
    fn resave_replaces_instead_of_duplicating() {
        let mut store = Store::new("freelance");
        let id = store.save_client(Client::new("Central Services"));
        let mut client = store.client(id).unwrap().clone();
        client.name = "Central Services GmbH".into();
        let resaved = store.save_client(client);
        assert_eq!(resaved, id);
        assert_eq!(store.clients.len(), 1);
        assert_eq!(store.client(id).unwrap().name, "Central Services GmbH");
    }

    #[test]
    fn contract_end_before_start_is_rejected_at_save() {
        let mut store = Store::new("freelance");
        let client_id = store.save_client(Client::new("Central Services"));
        let contract = Contract::new(
            "Ducts",
            client_id,
            day(2024, 1, 15),
            day(2024, 2, 1),
            Decimal::new(9000, 2),
            "EUR",
        )
        .with_end_date(day(2024, 1, 31));
        let err = store.save_contract(contract).unwrap_err();
        assert!(matches!(err, ValidationError::EndBeforeStart { .. }));
    }

    #[test]
    fn project_titles_and_tags_are_unique() {
        let (mut store, _, contract_id) = store_with_contract();
        let project = Project::new(
            "Ducts",
            "#ducts",
            "",
            day(2024, 2, 1),
            day(2024, 6, 30),
            contract_id,
        )
        .unwrap();
        store.save_project(project).unwrap();

        let same_title = Project::new(
            "Ducts",
            "#other",
            "",
            day(2024, 2, 1),
            day(2024, 6, 30),
            contract_id,
        )
        .unwrap();
        assert!(matches!(
            store.save_project(same_title),
            Err(ValidationError::DuplicateProjectTitle(_))
        ));

        let same_tag = Project::new(
            "Pipes",
            "#ducts",
            "",
            day(2024, 2, 1),
            day(2024, 6, 30),
            contract_id,
        )
        .unwrap();
        assert!(matches!(
            store.save_project(same_tag),
            Err(ValidationError::DuplicateProjectTag(_))
        ));
    }

    #[test]
    fn invoicing_contact_resolves_through_client() {
        let mut store = Store::new("freelance");
        let contact = Contact::new(
            Some("Sam".into()),
            Some("Lowry".into()),
            None,
            Some("sam@centralservices.com".into()),
        )
        .unwrap();
        let contact_id = store.save_contact(contact);
        let client_id = store.save_client(Client::new("Central Services").with_invoicing_contact(contact_id));
        assert_eq!(store.invoicing_contact(client_id).unwrap().name(), "Sam Lowry");

        let unbilled = store.save_client(Client::new("Shangri La Towers"));
        assert!(store.invoicing_contact(unbilled).is_none());
    }

    #[test]
    fn clear_empties_every_arena_but_keeps_counting_ids() {
        let (mut store, client_id, _) = store_with_contract();
        store.clear();
        assert!(store.clients.is_empty());
        assert!(store.contracts.is_empty());
        let next = store.save_client(Client::new("Shangri La Towers"));
        assert!(next > client_id);
    }

    #[test]
    fn deleting_missing_entities_reports_not_found() {
        let mut store = Store::new("freelance");
        assert_eq!(
            store.delete_invoice(77),
            Err(StoreError::NotFound { kind: "invoice", id: 77 })
        );
        assert_eq!(
            store.delete_timesheet(78),
            Err(StoreError::NotFound { kind: "timesheet", id: 78 })
        );
    }

    #[test]
    fn integrity_warnings_name_dangling_references() {
        let (mut store, _, contract_id) = store_with_contract();
        let project = Project::new(
            "Ducts",
            "#ducts",
            "",
            day(2024, 2, 1),
            day(2024, 6, 30),
            contract_id,
        )
        .unwrap();
        let project_id = store.save_project(project).unwrap();
        store.delete_contract(contract_id).unwrap();

        let warnings = store.integrity_warnings();
        assert!(warnings
            .iter()
            .any(|warning| warning.contains(&format!("project {}", project_id))));
    }
}
