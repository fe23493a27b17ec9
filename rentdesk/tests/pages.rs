//! Page forms driven without a window.

use std::rc::Rc;

use chrono::NaiveDate;
use deskform::{Capture, Form, FormDriver, SelectOption, SubmitOutcome};
use rentdesk::pages::{client, inventory, rental};
use rentdesk::window::Banner;
use rentdesk_data::model::{Client, Embedded, TypeName};
use serde_json::json;

fn inventory_lookups() -> inventory::Lookups {
    inventory::Lookups {
        types: vec![SelectOption::new(1, "Drill"), SelectOption::new(2, "Scaffold")],
        statuses: vec![SelectOption::new(1, "Available")],
    }
}

fn rental_lookups() -> rental::Lookups {
    rental::Lookups {
        clients: vec![SelectOption::new(7, "Ana Ruiz"), SelectOption::new(8, "Luis Mora")],
        equipment: vec![SelectOption::new(3, "Bosch GSB 13")],
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

#[test]
fn test_inventory_requires_type() {
    let submitted = Capture::new();
    let mut form: Form = inventory::form(inventory_lookups(), submitted.submit_handler()).unwrap();

    let outcome = FormDriver::new()
        .with_value("reference", "X")
        .run(&mut form)
        .unwrap();

    assert!(matches!(outcome, SubmitOutcome::Rejected { ref errors } if errors.contains("type")));
    assert_eq!(submitted.count(), 0);
    assert!(form.render().field("status").is_none());
}

#[test]
fn test_inventory_row_leaves_out_hidden_status() {
    let submitted = Capture::new();
    let mut form: Form = inventory::form(inventory_lookups(), submitted.submit_handler()).unwrap();

    let outcome = FormDriver::new()
        .with_value("type", "1")
        .with_value("reference", "X")
        .run(&mut form)
        .unwrap();
    assert_eq!(outcome, SubmitOutcome::Submitted);

    let payload = submitted.last().unwrap();
    let names: Vec<_> = payload.names().map(|n| n.as_str()).collect();
    assert_eq!(names, vec!["type", "status", "reference"]);

    let row = inventory::row(&payload).unwrap();
    assert_eq!(serde_json::Value::Object(row), json!({"type": 1, "reference": "X"}));
}

#[test]
fn test_client_form_checks_email_and_phone() {
    let submitted = Capture::new();
    let mut form: Form =
        client::form(vec![SelectOption::new(1, "Persona")], None, submitted.submit_handler())
            .unwrap();

    FormDriver::new()
        .with_value("name", "Ana")
        .with_value("last_name", "Ruiz")
        .with_value("email", "ana-at-example")
        .with_value("phone", "12")
        .with_value("client_type", "1")
        .run(&mut form)
        .unwrap();

    assert_eq!(submitted.count(), 0);
    assert_eq!(form.error("email"), Some("Enter a valid email"));
    assert_eq!(form.error("phone"), Some("Enter a valid phone number"));

    // Errors follow edits after the first attempt.
    form.set_value("email", "ana@example.com").unwrap();
    assert_eq!(form.error("email"), None);
    assert_eq!(form.error("phone"), Some("Enter a valid phone number"));

    form.set_value("phone", "+52 55 1234 5678").unwrap();
    assert!(form.submit().is_submitted());

    let row = client::row(&submitted.last().unwrap()).unwrap();
    assert_eq!(row["client_type"], 1);
    assert_eq!(row["isForeign"], false);
}

fn client_types() -> Vec<SelectOption> {
    vec![SelectOption::new(1, "Persona"), SelectOption::new(2, "Empresa")]
}

#[test]
fn test_client_edit_prefills_values() {
    let existing = Client {
        id: 4,
        name: "Luis".to_string(),
        last_name: "Mora".to_string(),
        email: None,
        phone: Some("555 0101".to_string()),
        is_foreign: true,
        strikes: 0,
        client_type: Some(Embedded::One(TypeName {
            id: Some(2),
            type_name: "Empresa".to_string(),
        })),
        deleted_at: None,
    };
    let submitted = Capture::new();
    let mut form: Form =
        client::form(client_types(), Some(&existing), submitted.submit_handler()).unwrap();

    assert_eq!(form.value("name"), Some("Luis"));
    assert_eq!(form.value("email"), Some(""));
    assert_eq!(form.value("isForeign"), Some("true"));
    assert_eq!(form.value("client_type"), Some("2"));

    // Saving without touching anything goes through.
    assert!(form.submit().is_submitted());
    let row = client::row(&submitted.last().unwrap()).unwrap();
    assert_eq!(row["client_type"], 2);
    assert_eq!(row["isForeign"], true);
}

#[test]
fn test_new_client_is_local_unless_checked() {
    let submitted = Capture::new();
    let mut form: Form = client::form(client_types(), None, submitted.submit_handler()).unwrap();

    FormDriver::new()
        .with_value("name", "Ana")
        .with_value("last_name", "Ruiz")
        .with_value("client_type", "1")
        .run(&mut form)
        .unwrap();

    let row = client::row(&submitted.last().unwrap()).unwrap();
    assert_eq!(row["isForeign"], false);
}

#[test]
fn test_blank_client_email_is_stored_as_null() {
    let payload = [
        ("name", "Ana"),
        ("last_name", "Ruiz"),
        ("email", ""),
        ("phone", ""),
        ("isForeign", "false"),
        ("client_type", "1"),
    ]
    .into_iter()
    .collect();

    let row = client::row(&payload).unwrap();
    assert!(row["email"].is_null());
    assert!(row["phone"].is_null());
    assert_eq!(row["isForeign"], false);
}

#[test]
fn test_rental_rejects_past_return_date() {
    let submitted = Capture::new();
    let mut form: Form = rental::form(
        rental_lookups(),
        None,
        today(),
        Banner::default(),
        submitted.submit_handler(),
    )
    .unwrap();

    FormDriver::new()
        .with_value("client_id", "7")
        .with_value("equipment_id", "3")
        .with_value("end_date", "2026-10-01")
        .run(&mut form)
        .unwrap();
    assert_eq!(submitted.count(), 0);
    assert_eq!(form.error("end_date"), Some("The return date cannot be in the past"));

    form.set_value("end_date", "2026-10-19").unwrap();
    assert!(form.submit().is_submitted());

    let row = rental::row(&submitted.last().unwrap(), true).unwrap();
    assert_eq!(row["client_id"], 7);
    assert_eq!(row["end_date"], "2026-10-19");
    assert_eq!(row["status"], "ACTIVO");
}

#[test]
fn test_rental_banner_tracks_selected_client() {
    let banner = Banner::default();
    let mut form: Form =
        rental::form(rental_lookups(), None, today(), Rc::clone(&banner), |_| {}).unwrap();
    assert_eq!(*banner.borrow(), None);

    form.set_value("client_id", "8").unwrap();
    assert_eq!(banner.borrow().as_deref(), Some("Renting to Luis Mora"));

    form.set_value("client_id", "").unwrap();
    assert_eq!(*banner.borrow(), None);
}

#[test]
fn test_rental_edit_uses_stored_row() {
    let stored = json!({
        "id": 12,
        "client_id": 7,
        "equipment_id": 3,
        "end_date": "2026-12-24T00:00:00+00:00",
        "client_name": "Ana Ruiz"
    });
    let banner = Banner::default();
    let form: Form = rental::form(
        rental_lookups(),
        stored.as_object(),
        today(),
        Rc::clone(&banner),
        |_| {},
    )
    .unwrap();

    assert_eq!(form.value("client_id"), Some("7"));
    assert_eq!(form.value("end_date"), Some("2026-12-24"));
    assert_eq!(banner.borrow().as_deref(), Some("Renting to Ana Ruiz"));
}

#[test]
fn test_rental_edit_keeps_options_gone_from_lookups() {
    let stored = json!({
        "id": 13,
        "client_id": 99,
        "equipment_id": 40,
        "end_date": "2026-12-24",
        "client_name": "Marta Gil"
    });
    let banner = Banner::default();
    let submitted = Capture::new();
    let mut form: Form = rental::form(
        rental_lookups(),
        stored.as_object(),
        today(),
        Rc::clone(&banner),
        submitted.submit_handler(),
    )
    .unwrap();

    assert_eq!(form.value("client_id"), Some("99"));
    assert_eq!(form.value("equipment_id"), Some("40"));
    assert_eq!(banner.borrow().as_deref(), Some("Renting to Marta Gil"));

    let equipment = form.field("equipment_id").unwrap();
    let labels: Vec<_> = equipment
        .kind()
        .options()
        .unwrap()
        .iter()
        .map(|o| o.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Bosch GSB 13", "Equipment #40"]);

    assert!(form.submit().is_submitted());
}
