use std::fmt::Display;

use deskform::SelectOption;
use serde::Serialize;

use crate::client::BackendClient;
use crate::error::Result;
use crate::model::{Equipment, EquipmentStatus, EquipmentType};
use crate::query::Query;
use crate::repositories::TableRepository;

pub const TYPES_TABLE: &str = "equipment_type";
pub const STATUS_TABLE: &str = "equipment_status";

/// Inventory items and the lookups the inventory form selects from.
#[derive(Debug, Clone)]
pub struct EquipmentRepository {
    table: TableRepository<Equipment>,
}

impl EquipmentRepository {
    pub fn new(client: BackendClient) -> Self {
        Self {
            table: TableRepository::new(client),
        }
    }

    pub async fn list(&self) -> Result<Vec<Equipment>> {
        self.table.list().await
    }

    pub async fn get_by_id(&self, id: impl Display) -> Result<Equipment> {
        self.table.get_by_id(id).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, row: &B) -> Result<Equipment> {
        self.table.create(row).await
    }

    pub async fn update<B: Serialize + ?Sized>(
        &self,
        id: impl Display,
        patch: &B,
    ) -> Result<Equipment> {
        self.table.update(id, patch).await
    }

    pub async fn soft_delete(&self, id: impl Display) -> Result<()> {
        self.table.soft_delete(id).await
    }

    /// Equipment types as select options (`id` -> `type_name`).
    pub async fn types(&self) -> Result<Vec<SelectOption>> {
        let query = Query::table(TYPES_TABLE).select("id,type_name").order("id", true);
        let rows: Vec<EquipmentType> = self.table.client().select(&query).await?;
        Ok(rows.into_iter().map(SelectOption::from).collect())
    }

    /// Equipment statuses as select options (`id` -> `status_name`).
    pub async fn statuses(&self) -> Result<Vec<SelectOption>> {
        let query = Query::table(STATUS_TABLE)
            .select("id,status_name")
            .order("id", true);
        let rows: Vec<EquipmentStatus> = self.table.client().select(&query).await?;
        Ok(rows.into_iter().map(SelectOption::from).collect())
    }
}
