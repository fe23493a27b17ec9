//! Generic repository over one table with soft delete.

use std::fmt::Display;
use std::marker::PhantomData;

use chrono::{SecondsFormat, Utc};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;
use tracing::{debug, error};

use crate::client::BackendClient;
use crate::error::{DataError, Result};
use crate::model::{Bill, Client, Contract, Equipment, Rental};
use crate::query::{Filter, Query};

/// Column marking a row as deleted.
pub const DELETED_AT: &str = "deleted_at";

/// A row type stored in a table.
pub trait Entity: DeserializeOwned + Send + 'static {
    const TABLE: &'static str;
    /// Columns fetched by `list` and `get_by_id`.
    const COLUMNS: &'static str = "*";
}

impl Entity for Client {
    const TABLE: &'static str = "clients";
    const COLUMNS: &'static str = "*,client_type(id,type_name)";
}

impl Entity for Equipment {
    const TABLE: &'static str = "equipment";
}

impl Entity for Rental {
    const TABLE: &'static str = "rentals";
}

impl Entity for Contract {
    const TABLE: &'static str = "contracts";
}

impl Entity for Bill {
    const TABLE: &'static str = "bills";
}

/// Current time in the format stored in `deleted_at`.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// CRUD over `T::TABLE`. Reads and soft deletes only see rows that are not
/// deleted and pass the extra policy filters.
#[derive(Debug, Clone)]
pub struct TableRepository<T> {
    client: BackendClient,
    policy: Vec<Filter>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> TableRepository<T> {
    pub fn new(client: BackendClient) -> Self {
        Self {
            client,
            policy: Vec::new(),
            _entity: PhantomData,
        }
    }

    /// Add a filter every read and soft delete must satisfy.
    pub fn with_policy(mut self, filter: Filter) -> Self {
        self.policy.push(filter);
        self
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    /// Live rows that pass the policy, with `T::COLUMNS` selected.
    pub fn visible(&self) -> Query {
        Query::table(T::TABLE)
            .select(T::COLUMNS)
            .is_null(DELETED_AT)
            .filters(self.policy.iter().cloned())
    }

    pub async fn list(&self) -> Result<Vec<T>> {
        self.client
            .select(&self.visible())
            .await
            .inspect_err(|e| error!(table = T::TABLE, error = %e, "list failed"))
    }

    pub async fn get_by_id(&self, id: impl Display) -> Result<T> {
        let id = id.to_string();
        let rows: Vec<T> = self
            .client
            .select(&self.visible().eq("id", &id))
            .await
            .inspect_err(|e| error!(table = T::TABLE, %id, error = %e, "get failed"))?;
        rows.into_iter().next().ok_or(DataError::NotFound {
            table: T::TABLE,
            id,
        })
    }

    pub async fn create<B: Serialize + ?Sized>(&self, row: &B) -> Result<T> {
        let rows: Vec<T> = self
            .client
            .insert(&Query::table(T::TABLE).select(T::COLUMNS), row)
            .await
            .inspect_err(|e| error!(table = T::TABLE, error = %e, "create failed"))?;
        debug!(table = T::TABLE, "row created");
        rows.into_iter().next().ok_or_else(|| DataError::Status {
            status: 201,
            message: format!("insert into '{}' returned no row", T::TABLE),
        })
    }

    /// Patch the row with `id`. Fails with `NotFound` when no row matched.
    pub async fn update<B: Serialize + ?Sized>(&self, id: impl Display, patch: &B) -> Result<T> {
        let id = id.to_string();
        let query = Query::table(T::TABLE).select(T::COLUMNS).eq("id", &id);
        let rows: Vec<T> = self
            .client
            .update(&query, patch)
            .await
            .inspect_err(|e| error!(table = T::TABLE, %id, error = %e, "update failed"))?;
        rows.into_iter().next().ok_or(DataError::NotFound {
            table: T::TABLE,
            id,
        })
    }

    /// Mark the row deleted. Rows hidden by the policy are left alone and
    /// reported as `NotFound`.
    pub async fn soft_delete(&self, id: impl Display) -> Result<()> {
        let id = id.to_string();
        let query = Query::table(T::TABLE)
            .eq("id", &id)
            .is_null(DELETED_AT)
            .filters(self.policy.iter().cloned());
        let rows: Vec<serde_json::Value> = self
            .client
            .update(&query, &json!({ "deleted_at": now_rfc3339() }))
            .await
            .inspect_err(|e| error!(table = T::TABLE, %id, error = %e, "soft delete failed"))?;
        if rows.is_empty() {
            return Err(DataError::NotFound {
                table: T::TABLE,
                id,
            });
        }
        debug!(table = T::TABLE, %id, "row soft-deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deleted_at_is_rfc3339_utc() {
        let stamp = now_rfc3339();
        assert!(stamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
    }
}
