use tracing::error;

use crate::client::BackendClient;
use crate::error::Result;
use crate::model::AuthUser;

/// Staff accounts, read through the auth admin API.
#[derive(Debug, Clone)]
pub struct UserRepository {
    client: BackendClient,
}

impl UserRepository {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<AuthUser>> {
        self.client
            .list_users()
            .await
            .inspect_err(|e| error!(error = %e, "listing users failed"))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<AuthUser> {
        self.client
            .user_by_id(id)
            .await
            .inspect_err(|e| error!(%id, error = %e, "user lookup failed"))
    }
}
