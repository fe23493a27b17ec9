//! Row types for the rental desk's tables and views.

use deskform::SelectOption;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An embedded relation that the REST layer returns either as one object or
/// as an array, depending on the foreign key's cardinality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Embedded<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Embedded<T> {
    pub fn first(&self) -> Option<&T> {
        match self {
            Embedded::One(item) => Some(item),
            Embedded::Many(items) => items.first(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeName {
    /// Present when the embed selects it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub type_name: String,
}

/// Full client row, as returned by `ClientRepository::get_by_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(rename = "isForeign", default)]
    pub is_foreign: bool,
    #[serde(default)]
    pub strikes: u32,
    #[serde(default)]
    pub client_type: Option<Embedded<TypeName>>,
    #[serde(default)]
    pub deleted_at: Option<String>,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }

    /// Id of the embedded client type, when the row was read with it.
    pub fn client_type_id(&self) -> Option<i64> {
        self.client_type.as_ref()?.first()?.id
    }
}

/// Client row as shown in the client list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSummary {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_foreign: bool,
    pub client_type: Option<String>,
}

impl ClientSummary {
    /// "Si" or "No", the way the desk displays the foreign flag.
    pub fn foreign_label(&self) -> &'static str {
        if self.is_foreign { "Si" } else { "No" }
    }
}

impl From<Client> for ClientSummary {
    fn from(client: Client) -> Self {
        let client_type = client
            .client_type
            .as_ref()
            .and_then(Embedded::first)
            .map(|t| t.type_name.clone());
        Self {
            id: client.id,
            name: client.name,
            last_name: client.last_name,
            phone: client.phone,
            email: client.email,
            is_foreign: client.is_foreign,
            client_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientType {
    pub id: i64,
    pub type_name: String,
}

impl From<ClientType> for SelectOption {
    fn from(t: ClientType) -> Self {
        SelectOption::new(t.id, t.type_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: i64,
    #[serde(rename = "type")]
    pub equipment_type: i64,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub deleted_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentType {
    pub id: i64,
    pub type_name: String,
}

impl From<EquipmentType> for SelectOption {
    fn from(t: EquipmentType) -> Self {
        SelectOption::new(t.id, t.type_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentStatus {
    pub id: i64,
    pub status_name: String,
}

impl From<EquipmentStatus> for SelectOption {
    fn from(s: EquipmentStatus) -> Self {
        SelectOption::new(s.id, s.status_name)
    }
}

/// A row of the `rentals` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rental {
    pub id: i64,
    #[serde(default)]
    pub client_id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub deleted_at: Option<String>,
}

/// A row of the rentals listing view. Its columns are defined by the view,
/// so everything but the id is kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalListing {
    pub id: i64,
    #[serde(flatten)]
    pub columns: Map<String, Value>,
}

/// A rental with its client, renter and rented items resolved to display
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalDetail {
    pub id: i64,
    pub client_id: Option<i64>,
    /// Client's first and last name.
    pub client: String,
    pub user_id: String,
    /// End date as `YYYY-MM-DD`.
    pub end_date: String,
    /// Name of the staff user who registered the rental.
    pub renter: String,
    /// One `"<type>: <reference>"` line per rented item.
    pub items: Vec<String>,
}

/// Contract row; `files` holds storage paths of its attachments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    #[serde(default)]
    pub rental_id: Option<i64>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub deleted_at: Option<String>,
}

/// Bill row; `files` holds storage paths of its attachments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: String,
    #[serde(default)]
    pub rental_id: Option<i64>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub deleted_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub table_name: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Profile fields stored on an auth user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
}

/// A staff account managed by the backend's auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Option<UserMetadata>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl AuthUser {
    /// "name lastname" from the user's metadata, if it has any.
    pub fn display_name(&self) -> Option<String> {
        let meta = self.user_metadata.as_ref()?;
        match (&meta.name, &meta.lastname) {
            (Some(name), Some(last)) => Some(format!("{name} {last}")),
            (Some(name), None) => Some(name.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        }
    }
}

/// An object in the storage bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObject {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}
