use std::fmt::Display;

use deskform::SelectOption;
use serde::Serialize;
use tracing::error;

use crate::client::BackendClient;
use crate::error::Result;
use crate::model::{Client, ClientSummary, ClientType};
use crate::query::{Filter, Query};
use crate::repositories::TableRepository;

pub const CLIENT_TYPES_TABLE: &str = "client_type";

const SUMMARY_COLUMNS: &str = "id,name,last_name,email,phone,isForeign,client_type(type_name)";

/// Clients of the rental desk.
///
/// Clients with more than `max_strikes` strikes are hidden from every
/// listing and cannot be deleted.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    table: TableRepository<Client>,
}

impl ClientRepository {
    pub fn new(client: BackendClient, max_strikes: u32) -> Self {
        Self {
            table: TableRepository::new(client).with_policy(Filter::lte("strikes", max_strikes)),
        }
    }

    /// Summaries of every visible client.
    pub async fn list(&self) -> Result<Vec<ClientSummary>> {
        let query = self.table.visible().select(SUMMARY_COLUMNS);
        self.summaries(query).await
    }

    /// Summaries of visible clients that are not foreign.
    pub async fn list_local(&self) -> Result<Vec<ClientSummary>> {
        let query = self
            .table
            .visible()
            .select(SUMMARY_COLUMNS)
            .is("isForeign", false);
        self.summaries(query).await
    }

    async fn summaries(&self, query: Query) -> Result<Vec<ClientSummary>> {
        let rows: Vec<Client> = self
            .table
            .client()
            .select(&query)
            .await
            .inspect_err(|e| error!(error = %e, "listing clients failed"))?;
        Ok(rows.into_iter().map(ClientSummary::from).collect())
    }

    /// Client types as select options (`id` -> `type_name`).
    pub async fn types(&self) -> Result<Vec<SelectOption>> {
        let query = Query::table(CLIENT_TYPES_TABLE)
            .select("id,type_name")
            .order("id", true);
        let rows: Vec<ClientType> = self.table.client().select(&query).await?;
        Ok(rows.into_iter().map(SelectOption::from).collect())
    }

    pub async fn get_by_id(&self, id: impl Display) -> Result<Client> {
        self.table.get_by_id(id).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, row: &B) -> Result<Client> {
        self.table.create(row).await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: impl Display, patch: &B) -> Result<Client> {
        self.table.update(id, patch).await
    }

    pub async fn soft_delete(&self, id: impl Display) -> Result<()> {
        self.table.soft_delete(id).await
    }
}
