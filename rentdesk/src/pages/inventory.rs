//! Add an item to the inventory.

use deskform::{
    FieldDescriptor, Form, FormBuilder, FormError, FormItem, FormValues, LayoutDirection, Rule,
    Schema, SchemaError, SelectOption,
};
use deskform_egui::EguiElement;
use rentdesk_data::Repositories;
use serde_json::{Map, Value};
use tokio::runtime::Runtime;

use crate::bridge::SubmitBridge;
use crate::pages::strip_nulls;
use crate::window;

pub const TITLE: &str = "Add equipment";

/// Select options the page needs from the backend.
#[derive(Debug, Clone, Default)]
pub struct Lookups {
    pub types: Vec<SelectOption>,
    pub statuses: Vec<SelectOption>,
}

impl Lookups {
    pub async fn load(repos: &Repositories) -> rentdesk_data::Result<Self> {
        let (types, statuses) =
            tokio::try_join!(repos.equipment.types(), repos.equipment.statuses())?;
        Ok(Self { types, statuses })
    }
}

/// Type and reference are required; the status select is kept hidden and
/// new items get the backend's default status.
pub fn fields(lookups: Lookups) -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::select("type", "Equipment or tool type", lookups.types).required(),
        FieldDescriptor::select("status", "Equipment or tool status", lookups.statuses)
            .required()
            .hidden(),
        FieldDescriptor::textarea(
            "reference",
            "Reference or description of the equipment's condition",
        )
        .required(),
    ]
}

pub fn schema() -> Schema {
    Schema::new()
        .field("type", Rule::integer().required("Select the equipment type"))
        .field("status", Rule::integer())
        .field(
            "reference",
            Rule::string()
                .required("Describe the item")
                .max_len(500, "Keep the reference under 500 characters"),
        )
}

pub fn form<E>(
    lookups: Lookups,
    on_submit: impl FnMut(FormValues) + 'static,
) -> Result<Form<E>, FormError> {
    let items = fields(lookups).into_iter().map(FormItem::Field).collect();
    FormBuilder::new(items, schema(), on_submit)
        .layout_direction(LayoutDirection::Column)
        .submit_label(TITLE)
        .build()
}

/// The equipment row for a submitted payload.
pub fn row(payload: &FormValues) -> Result<Map<String, Value>, SchemaError> {
    Ok(strip_nulls(schema().cast(payload)?))
}

pub async fn save(repos: Repositories, payload: FormValues) -> anyhow::Result<String> {
    let row = row(&payload)?;
    let created = repos.equipment.create(&row).await?;
    Ok(format!("Equipment #{} added", created.id))
}

pub fn open(runtime: &Runtime, repos: Repositories) -> anyhow::Result<Option<String>> {
    let lookups = runtime.block_on(Lookups::load(&repos))?;
    let bridge = SubmitBridge::new(runtime.handle().clone());
    let form: Form<EguiElement> = form(lookups, bridge.submit_handler())?;

    window::run(
        form,
        TITLE,
        bridge,
        move |payload| save(repos.clone(), payload),
        None,
    )
}
