//! Register a client or edit an existing one.

use deskform::{
    FieldDescriptor, Form, FormBuilder, FormItem, FormValues, Rule, Schema, SchemaError,
    SelectOption, TextInput,
};
use deskform_egui::EguiElement;
use rentdesk_data::Repositories;
use rentdesk_data::model::Client;
use serde_json::{Map, Value};
use tokio::runtime::Runtime;

use crate::bridge::SubmitBridge;
use crate::window;

const PHONE_PATTERN: &str = r"\+?[0-9 ()-]{7,20}";

pub fn fields(client_types: Vec<SelectOption>) -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::text("name", "First name(s)").required(),
        FieldDescriptor::text("last_name", "Last name(s)").required(),
        FieldDescriptor::input("email", "Email", TextInput::Email)
            .with_placeholder("client@example.com"),
        FieldDescriptor::input("phone", "Phone", TextInput::Tel),
        FieldDescriptor::checkbox("isForeign", "Foreign resident"),
        FieldDescriptor::select("client_type", "Client type", client_types).required(),
    ]
}

pub fn schema() -> Result<Schema, SchemaError> {
    Ok(Schema::new()
        .field("name", Rule::string().required("Enter the client's first name"))
        .field("last_name", Rule::string().required("Enter the client's last name"))
        .field("email", Rule::string().email("Enter a valid email"))
        .field(
            "phone",
            Rule::string().matches(PHONE_PATTERN, "Enter a valid phone number")?,
        )
        .field("isForeign", Rule::boolean())
        .field("client_type", Rule::integer().required("Select the client type")))
}

/// Form values for editing `client`.
pub fn defaults(client: &Client) -> FormValues {
    let mut values = FormValues::new();
    values.insert("name", client.name.clone());
    values.insert("last_name", client.last_name.clone());
    values.insert("email", client.email.clone().unwrap_or_default());
    values.insert("phone", client.phone.clone().unwrap_or_default());
    values.insert("isForeign", client.is_foreign.to_string());
    if let Some(type_id) = client.client_type_id() {
        values.insert("client_type", type_id.to_string());
    }
    values
}

pub fn form<E>(
    client_types: Vec<SelectOption>,
    editing: Option<&Client>,
    on_submit: impl FnMut(FormValues) + 'static,
) -> anyhow::Result<Form<E>> {
    let items = fields(client_types).into_iter().map(FormItem::Field).collect();
    let mut builder = FormBuilder::new(items, schema()?, on_submit);
    builder = match editing {
        Some(client) => builder
            .default_values(defaults(client))
            .submit_label("Save changes"),
        None => builder.submit_label("Register client"),
    };
    Ok(builder.build()?)
}

/// The client row for a submitted payload. Blank optional text is stored
/// as null.
pub fn row(payload: &FormValues) -> anyhow::Result<Map<String, Value>> {
    let mut row = schema()?.cast(payload)?;
    for column in ["email", "phone"] {
        if row.get(column).and_then(Value::as_str) == Some("") {
            row.insert(column.to_string(), Value::Null);
        }
    }
    Ok(row)
}

pub async fn save(
    repos: Repositories,
    id: Option<i64>,
    payload: FormValues,
) -> anyhow::Result<String> {
    let row = row(&payload)?;
    let client = match id {
        Some(id) => repos.clients.update(id, &row).await?,
        None => repos.clients.create(&row).await?,
    };
    Ok(format!("Client {} saved", client.full_name()))
}

pub fn open(
    runtime: &Runtime,
    repos: Repositories,
    id: Option<i64>,
) -> anyhow::Result<Option<String>> {
    let (client_types, editing) = runtime.block_on(async {
        let types = repos.clients.types().await?;
        let editing = match id {
            Some(id) => Some(repos.clients.get_by_id(id).await?),
            None => None,
        };
        Ok::<_, rentdesk_data::DataError>((types, editing))
    })?;

    let bridge = SubmitBridge::new(runtime.handle().clone());
    let form: Form<EguiElement> = form(client_types, editing.as_ref(), bridge.submit_handler())?;
    let title = match &editing {
        Some(client) => format!("Edit client {}", client.full_name()),
        None => "New client".to_string(),
    };

    window::run(
        form,
        &title,
        bridge,
        move |payload| save(repos.clone(), id, payload),
        None,
    )
}
