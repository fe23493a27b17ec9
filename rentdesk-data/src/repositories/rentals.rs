use std::fmt::Display;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use deskform::DATE_FORMAT;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::client::BackendClient;
use crate::error::{DataError, Result};
use crate::model::{AuthUser, Embedded, Rental, RentalDetail, RentalListing, TypeName};
use crate::query::Query;
use crate::repositories::{DELETED_AT, Entity, TableRepository, now_rfc3339};

/// View joining rentals with their client and equipment for listings.
pub const LISTING_VIEW: &str = "all_rentals";
/// View exposing a rental's editable columns.
pub const EDIT_VIEW: &str = "rental_to_edit";
/// Status given to rentals whose end date is still ahead.
pub const ACTIVE_STATUS: &str = "ACTIVO";

const DETAIL_COLUMNS: &str = "id,clients!rentals_client_id_fkey(name,last_name,id),user_id,end_date,equipment(type(type_name),reference)";

#[derive(Debug, Deserialize)]
struct ClientRef {
    id: i64,
    name: String,
    last_name: String,
}

#[derive(Debug, Deserialize)]
struct RentedItem {
    #[serde(rename = "type", default)]
    kind: Option<Embedded<TypeName>>,
    #[serde(default)]
    reference: String,
}

impl RentedItem {
    fn describe(&self) -> String {
        let kind = self
            .kind
            .as_ref()
            .and_then(Embedded::first)
            .map(|t| t.type_name.as_str())
            .unwrap_or("?");
        format!("{kind}: {}", self.reference)
    }
}

/// A rental row with its relations embedded, before the renter lookup.
#[derive(Debug, Deserialize)]
struct RentalRelations {
    id: i64,
    #[serde(default)]
    clients: Option<ClientRef>,
    user_id: String,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    equipment: Vec<RentedItem>,
}

impl RentalRelations {
    fn into_detail(self, renter: &AuthUser) -> RentalDetail {
        let renter_name = renter.display_name().unwrap_or_else(|| {
            warn!(user_id = %renter.id, "renter has no name metadata");
            renter.email.clone().unwrap_or_else(|| renter.id.clone())
        });
        RentalDetail {
            id: self.id,
            client_id: self.clients.as_ref().map(|c| c.id),
            client: self
                .clients
                .as_ref()
                .map(|c| format!("{} {}", c.name, c.last_name))
                .unwrap_or_default(),
            user_id: self.user_id,
            end_date: self.end_date.as_deref().map(format_date).unwrap_or_default(),
            renter: renter_name,
            items: self.equipment.iter().map(RentedItem::describe).collect(),
        }
    }
}

/// Render a stored date or timestamp as `YYYY-MM-DD`. Unparseable input is
/// returned unchanged.
pub fn format_date(raw: &str) -> String {
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, DATE_FORMAT));
    match date {
        Ok(date) => date.format(DATE_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Rentals, their history, and the renter enrichment for detail views.
#[derive(Debug, Clone)]
pub struct RentalRepository {
    table: TableRepository<Rental>,
}

impl RentalRepository {
    pub fn new(client: BackendClient) -> Self {
        Self {
            table: TableRepository::new(client),
        }
    }

    fn client(&self) -> &BackendClient {
        self.table.client()
    }

    /// Active rentals from the listing view.
    pub async fn list(&self) -> Result<Vec<RentalListing>> {
        let query = Query::table(LISTING_VIEW).select("*").is_null(DELETED_AT);
        self.client().select(&query).await
    }

    /// Soft-deleted rentals from the listing view.
    pub async fn history(&self) -> Result<Vec<RentalListing>> {
        let query = Query::table(LISTING_VIEW).select("*").not_null(DELETED_AT);
        self.client().select(&query).await
    }

    /// One rental with its client, items and the renting staff member's name.
    ///
    /// Renter lookups for all matched rows run concurrently and are joined
    /// before returning; any failed lookup fails the call.
    pub async fn get_by_id(&self, id: impl Display) -> Result<RentalDetail> {
        let id = id.to_string();
        let query = Query::table(Rental::TABLE)
            .select(DETAIL_COLUMNS)
            .is_null(DELETED_AT)
            .eq("id", &id);
        let rows: Vec<RentalRelations> = self.client().select(&query).await?;

        let client = self.client();
        let details = try_join_all(rows.into_iter().map(|row| async move {
            let renter = client.user_by_id(&row.user_id).await?;
            Ok::<_, DataError>(row.into_detail(&renter))
        }))
        .await?;

        details.into_iter().next().ok_or(DataError::NotFound {
            table: Rental::TABLE,
            id,
        })
    }

    /// The rental's editable columns, as the edit form expects them.
    pub async fn for_edit(&self, id: impl Display) -> Result<Map<String, Value>> {
        let id = id.to_string();
        let query = Query::table(EDIT_VIEW).select("*").eq("id", &id);
        let rows: Vec<Map<String, Value>> = self.client().select(&query).await?;
        rows.into_iter().next().ok_or(DataError::NotFound {
            table: EDIT_VIEW,
            id,
        })
    }

    pub async fn create<B: Serialize + ?Sized>(&self, row: &B) -> Result<Rental> {
        self.table.create(row).await
    }

    /// Patch the rental, then mark every live rental whose end date is still
    /// ahead as active.
    pub async fn update<B: Serialize + ?Sized>(&self, id: impl Display, patch: &B) -> Result<Rental> {
        let rental = self.table.update(id, patch).await?;

        let still_running = Query::table(Rental::TABLE)
            .gt("end_date", now_rfc3339())
            .is_null(DELETED_AT);
        let reactivated: Vec<Value> = self
            .client()
            .update(&still_running, &json!({ "status": ACTIVE_STATUS }))
            .await?;
        debug!(count = reactivated.len(), "rentals marked active");

        Ok(rental)
    }

    pub async fn soft_delete(&self, id: impl Display) -> Result<()> {
        self.table.soft_delete(id).await
    }
}
