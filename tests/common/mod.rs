use billing_core::calendar::{Calendar, CalendarEvent, CloudCalendar};
use billing_core::domain::{Client, Contact, Contract, EntityId, Project};
use billing_core::store::Store;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, minute, 0).unwrap()
}

/// A store with one billable client, a signed contract, and a tagged
/// project, as most flows start from.
pub fn billable_fixture() -> (Store, EntityId, EntityId, EntityId) {
    let mut store = Store::new("freelance");
    let contact = Contact::new(
        Some("Sam".into()),
        Some("Lowry".into()),
        Some("Central Services".into()),
        Some("sam@centralservices.com".into()),
    )
    .expect("valid contact");
    let contact_id = store.save_contact(contact);
    let client_id =
        store.save_client(Client::new("Central Services").with_invoicing_contact(contact_id));
    let contract = Contract::new(
        "Duct maintenance 2024",
        client_id,
        day(2024, 1, 15),
        day(2024, 2, 1),
        Decimal::new(9050, 2),
        "EUR",
    )
    .with_volume(160);
    let contract_id = store.save_contract(contract).expect("valid contract");
    let project = Project::new(
        "Ducts",
        "#ducts",
        "Duct maintenance for Central Services",
        day(2024, 2, 1),
        day(2024, 6, 30),
        contract_id,
    )
    .expect("valid project");
    let project_id = store.save_project(project).expect("unique project");
    (store, client_id, contract_id, project_id)
}

pub fn march_calendar() -> Calendar {
    let events = vec![
        CalendarEvent::new(
            at(day(2024, 3, 4), 9, 0),
            at(day(2024, 3, 4), 12, 0),
            "Central Services",
        ),
        CalendarEvent::new(
            at(day(2024, 3, 4), 13, 0),
            at(day(2024, 3, 4), 16, 0),
            "Central Services",
        ),
        CalendarEvent::new(
            at(day(2024, 3, 5), 9, 0),
            at(day(2024, 3, 5), 13, 0),
            "Central Services",
        ),
        // different client, same period
        CalendarEvent::new(
            at(day(2024, 3, 5), 14, 0),
            at(day(2024, 3, 5), 16, 0),
            "Shangri La Towers",
        ),
        // same client, outside the period
        CalendarEvent::new(
            at(day(2024, 4, 2), 9, 0),
            at(day(2024, 4, 2), 12, 0),
            "Central Services",
        ),
    ];
    Calendar::Cloud(CloudCalendar::new("tracking").with_events(events))
}
