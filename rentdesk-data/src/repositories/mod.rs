//! One repository per business entity. All of them share a `BackendClient`
//! and return `DataError` instead of swallowing failures.

mod attachments;
mod audit_log;
mod clients;
mod equipment;
mod rentals;
mod table;
mod users;

pub use attachments::{
    AttachmentRepository, BillRepository, ContractRepository, FILES_COLUMN, Upload, object_path,
};
pub use audit_log::{AUDIT_TABLE, AuditLogRepository};
pub use clients::{CLIENT_TYPES_TABLE, ClientRepository};
pub use equipment::{EquipmentRepository, STATUS_TABLE, TYPES_TABLE};
pub use rentals::{ACTIVE_STATUS, EDIT_VIEW, LISTING_VIEW, RentalRepository, format_date};
pub use table::{DELETED_AT, Entity, TableRepository, now_rfc3339};
pub use users::UserRepository;

use crate::client::BackendClient;
use crate::config::BackendConfig;

/// Every repository, built from one configuration.
#[derive(Debug, Clone)]
pub struct Repositories {
    pub clients: ClientRepository,
    pub equipment: EquipmentRepository,
    pub rentals: RentalRepository,
    pub contracts: ContractRepository,
    pub bills: BillRepository,
    pub users: UserRepository,
    pub audit_log: AuditLogRepository,
}

impl Repositories {
    pub fn new(client: BackendClient, config: &BackendConfig) -> Self {
        Self {
            clients: ClientRepository::new(client.clone(), config.max_strikes),
            equipment: EquipmentRepository::new(client.clone()),
            rentals: RentalRepository::new(client.clone()),
            contracts: ContractRepository::new(client.clone()),
            bills: BillRepository::new(client.clone()),
            users: UserRepository::new(client.clone()),
            audit_log: AuditLogRepository::new(client),
        }
    }

    /// Build the client and all repositories from `config`.
    pub fn connect(config: &BackendConfig) -> crate::Result<Self> {
        let client = BackendClient::new(config)?;
        Ok(Self::new(client, config))
    }
}
