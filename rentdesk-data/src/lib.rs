//! # rentdesk-data
//!
//! Data access for the rental desk: a client for the backend's REST rows,
//! object storage and auth admin endpoints, and one repository per business
//! entity on top of it.
//!
//! Every operation returns a `Result`; failures are logged with `tracing` and
//! handed to the caller as `DataError`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rentdesk_data::{BackendConfig, Repositories};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = BackendConfig::from_env()?;
//! let repos = Repositories::connect(&config)?;
//!
//! for client in repos.clients.list().await? {
//!     println!("{} {} ({})", client.name, client.last_name, client.foreign_label());
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
pub mod model;
mod query;
pub mod repositories;

pub use client::BackendClient;
pub use config::{BackendConfig, ENV_API_KEY, ENV_BUCKET, ENV_MAX_STRIKES, ENV_URL};
pub use error::{ConfigError, DataError, Result};
pub use query::{Filter, Query};
pub use repositories::{
    AuditLogRepository, BillRepository, ClientRepository, ContractRepository, EquipmentRepository,
    RentalRepository, Repositories, Upload, UserRepository,
};
