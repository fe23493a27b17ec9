//! Rent equipment to a client, or edit an existing rental.

use std::rc::Rc;

use chrono::{Local, NaiveDate};
use deskform::{
    DATE_FORMAT, FieldDescriptor, FieldName, Form, FormBuilder, FormItem, FormValues, Rule,
    Schema, SelectOption, TextInput, ValidationErrors, Validator,
};
use deskform_egui::EguiElement;
use rentdesk_data::Repositories;
use rentdesk_data::repositories::{ACTIVE_STATUS, format_date};
use serde_json::{Map, Value};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::bridge::SubmitBridge;
use crate::pages::{defaults_from_row, field_text};
use crate::window::{self, Banner};

pub const FIELD_NAMES: [&str; 3] = ["client_id", "equipment_id", "end_date"];

#[derive(Debug, Clone, Default)]
pub struct Lookups {
    pub clients: Vec<SelectOption>,
    pub equipment: Vec<SelectOption>,
}

impl Lookups {
    pub async fn load(repos: &Repositories) -> rentdesk_data::Result<Self> {
        let (clients, equipment) = tokio::try_join!(repos.clients.list(), repos.equipment.list())?;
        Ok(Self {
            clients: clients
                .into_iter()
                .map(|c| SelectOption::new(c.id, format!("{} {}", c.name, c.last_name)))
                .collect(),
            equipment: equipment
                .into_iter()
                .map(|e| SelectOption::new(e.id, e.reference))
                .collect(),
        })
    }
}

pub fn fields(lookups: Lookups) -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::select("client_id", "Client", lookups.clients)
            .required()
            .with_placeholder("Select a client"),
        FieldDescriptor::select("equipment_id", "Equipment", lookups.equipment)
            .required()
            .with_placeholder("Select the equipment"),
        FieldDescriptor::input("end_date", "Return date", TextInput::Date).required(),
    ]
}

/// Field rules plus a return date that must not lie before `today`.
pub struct RentalValidator {
    schema: Schema,
    today: NaiveDate,
}

impl RentalValidator {
    pub fn new(today: NaiveDate) -> Self {
        let schema = Schema::new()
            .field("client_id", Rule::integer().required("Select a client"))
            .field("equipment_id", Rule::integer().required("Select the equipment"))
            .field("end_date", Rule::date().required("Pick the return date"));
        Self { schema, today }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl Validator for RentalValidator {
    fn validate(&self, values: &FormValues) -> ValidationErrors {
        let mut errors = self.schema.validate(values);
        if !errors.contains("end_date") {
            let end = values
                .get("end_date")
                .and_then(|raw| NaiveDate::parse_from_str(raw, DATE_FORMAT).ok());
            if end.is_some_and(|end| end < self.today) {
                errors.add("end_date", "The return date cannot be in the past");
            }
        }
        errors
    }

    fn referenced_fields(&self) -> Vec<FieldName> {
        self.schema.referenced_fields()
    }
}

/// Label of the client currently selected in `values`.
fn selected_client(options: &[SelectOption], values: &FormValues) -> Option<String> {
    let id = values.get("client_id").filter(|id| !id.is_empty())?;
    options
        .iter()
        .find(|option| option.value == id)
        .map(|option| format!("Renting to {}", option.label))
}

/// Make sure the id stored in `row[column]` is selectable even when the
/// lookup no longer lists it (a struck-out client, retired equipment).
fn keep_stored_option(
    options: &mut Vec<SelectOption>,
    row: &Map<String, Value>,
    column: &str,
    label_column: &str,
    fallback: &str,
) {
    let Some(id) = row.get(column).and_then(field_text) else {
        return;
    };
    if id.is_empty() || options.iter().any(|option| option.value == id) {
        return;
    }
    let label = row
        .get(label_column)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{fallback} #{id}"));
    debug!(%column, %id, "stored option missing from lookup, keeping it");
    options.push(SelectOption::new(id, label));
}

/// Build the rental form. `banner` follows the selected client.
pub fn form<E>(
    mut lookups: Lookups,
    editing: Option<&Map<String, Value>>,
    today: NaiveDate,
    banner: Banner,
    on_submit: impl FnMut(FormValues) + 'static,
) -> anyhow::Result<Form<E>> {
    if let Some(row) = editing {
        keep_stored_option(&mut lookups.clients, row, "client_id", "client_name", "Client");
        keep_stored_option(
            &mut lookups.equipment,
            row,
            "equipment_id",
            "equipment_reference",
            "Equipment",
        );
    }
    let clients: Rc<[SelectOption]> = lookups.clients.clone().into();
    let items = fields(lookups).into_iter().map(FormItem::Field).collect();

    let mut builder = FormBuilder::new(items, RentalValidator::new(today), on_submit);
    if let Some(row) = editing {
        let mut defaults = defaults_from_row(row, &FIELD_NAMES);
        if let Some(end) = defaults.get_mut("end_date") {
            *end = format_date(end);
        }
        *banner.borrow_mut() = selected_client(&clients, &defaults);
        builder = builder.default_values(defaults).submit_label("Save changes");
    } else {
        builder = builder.submit_label("Register rental");
    }

    let form = builder
        .on_values_change(move |values| {
            *banner.borrow_mut() = selected_client(&clients, values);
        })
        .build()?;
    Ok(form)
}

/// The rental row for a submitted payload. New rentals start active.
pub fn row(payload: &FormValues, creating: bool) -> anyhow::Result<Map<String, Value>> {
    let mut row = RentalValidator::new(Local::now().date_naive())
        .schema()
        .cast(payload)?;
    if creating {
        row.insert("status".to_string(), Value::String(ACTIVE_STATUS.to_string()));
    }
    Ok(row)
}

pub async fn save(
    repos: Repositories,
    id: Option<i64>,
    payload: FormValues,
) -> anyhow::Result<String> {
    let row = row(&payload, id.is_none())?;
    let rental = match id {
        Some(id) => repos.rentals.update(id, &row).await?,
        None => repos.rentals.create(&row).await?,
    };
    Ok(format!("Rental #{} saved", rental.id))
}

pub fn open(
    runtime: &Runtime,
    repos: Repositories,
    id: Option<i64>,
) -> anyhow::Result<Option<String>> {
    let (lookups, editing) = runtime.block_on(async {
        let lookups = Lookups::load(&repos).await?;
        let editing = match id {
            Some(id) => Some(repos.rentals.for_edit(id).await?),
            None => None,
        };
        Ok::<_, rentdesk_data::DataError>((lookups, editing))
    })?;

    let banner = Banner::default();
    let bridge = SubmitBridge::new(runtime.handle().clone());
    let form: Form<EguiElement> = form(
        lookups,
        editing.as_ref(),
        Local::now().date_naive(),
        Rc::clone(&banner),
        bridge.submit_handler(),
    )?;
    let title = match id {
        Some(id) => format!("Edit rental #{id}"),
        None => "New rental".to_string(),
    };

    window::run(
        form,
        &title,
        bridge,
        move |payload| save(repos.clone(), id, payload),
        Some(banner),
    )
}
