mod common;

use billing_core::domain::{Invoice, InvoiceItem, TimeTrackingItem, Timesheet};
use billing_core::store::StoreError;
use common::{at, billable_fixture, day};
use rust_decimal::Decimal;

#[test]
fn deleting_an_invoice_cascades_to_timesheets_and_items() {
    let (mut store, _, contract_id, project_id) = billable_fixture();

    let invoice_id = store.save_invoice(Invoice::new(
        "2024-04-01-01",
        day(2024, 4, 1),
        contract_id,
        project_id,
    ));

    let mut sheet_ids = Vec::new();
    let mut tracking_ids = Vec::new();
    for month in [2u32, 3u32] {
        let sheet = Timesheet::new(
            format!("Central Services 2024-{:02}", month),
            day(2024, 4, 1),
            day(2024, month, 1),
            day(2024, month, 28),
            project_id,
        );
        let sheet_id = store.save_timesheet(sheet).expect("valid period");
        store
            .attach_timesheet(sheet_id, invoice_id)
            .expect("attach timesheet");
        let item = TimeTrackingItem::new(
            sheet_id,
            at(day(2024, month, 4), 9, 0),
            at(day(2024, month, 4), 12, 0),
            "Central Services",
            "#ducts",
            None,
        )
        .expect("forward interval");
        tracking_ids.push(store.save_time_tracking_item(item));
        sheet_ids.push(sheet_id);
    }

    let mut item_ids = Vec::new();
    for n in 0..3 {
        let item = InvoiceItem::new(
            invoice_id,
            day(2024, 2, 1),
            day(2024, 3, 28),
            Decimal::from(n + 1),
            "hour",
            Decimal::new(9050, 2),
            format!("line {}", n + 1),
            Decimal::new(19, 2),
        );
        item_ids.push(store.save_invoice_item(item));
    }

    store.delete_invoice(invoice_id).expect("cascading delete");

    assert!(store.invoice(invoice_id).is_none());
    for sheet_id in &sheet_ids {
        assert!(store.timesheet(*sheet_id).is_none());
    }
    for item_id in &item_ids {
        assert!(store.invoice_item(*item_id).is_none());
    }
    for tracking_id in &tracking_ids {
        assert!(store.time_tracking_item(*tracking_id).is_none());
    }
    assert!(store.integrity_warnings().is_empty());
}

#[test]
fn deleting_a_timesheet_removes_only_its_items() {
    let (mut store, _, _, project_id) = billable_fixture();

    let keep = store
        .save_timesheet(Timesheet::new(
            "Central Services 2024-02",
            day(2024, 3, 1),
            day(2024, 2, 1),
            day(2024, 2, 29),
            project_id,
        ))
        .unwrap();
    let removed = store
        .save_timesheet(Timesheet::new(
            "Central Services 2024-03",
            day(2024, 4, 1),
            day(2024, 3, 1),
            day(2024, 3, 31),
            project_id,
        ))
        .unwrap();

    let kept_item = store.save_time_tracking_item(
        TimeTrackingItem::new(
            keep,
            at(day(2024, 2, 5), 9, 0),
            at(day(2024, 2, 5), 11, 0),
            "Central Services",
            "#ducts",
            None,
        )
        .unwrap(),
    );
    let dropped_item = store.save_time_tracking_item(
        TimeTrackingItem::new(
            removed,
            at(day(2024, 3, 5), 9, 0),
            at(day(2024, 3, 5), 11, 0),
            "Central Services",
            "#ducts",
            None,
        )
        .unwrap(),
    );

    store.delete_timesheet(removed).expect("delete timesheet");
    assert!(store.time_tracking_item(dropped_item).is_none());
    assert!(store.time_tracking_item(kept_item).is_some());
    assert!(store.timesheet(keep).is_some());
}

#[test]
fn failed_parent_delete_leaves_the_graph_intact() {
    let (mut store, _, _, project_id) = billable_fixture();
    let sheet_id = store
        .save_timesheet(Timesheet::new(
            "Central Services 2024-03",
            day(2024, 4, 1),
            day(2024, 3, 1),
            day(2024, 3, 31),
            project_id,
        ))
        .unwrap();

    let missing = sheet_id + 100;
    assert_eq!(
        store.delete_invoice(missing),
        Err(StoreError::NotFound {
            kind: "invoice",
            id: missing
        })
    );
    assert!(store.timesheet(sheet_id).is_some());
}
