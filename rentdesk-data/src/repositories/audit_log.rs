use crate::client::BackendClient;
use crate::error::Result;
use crate::model::AuditEntry;
use crate::query::Query;

pub const AUDIT_TABLE: &str = "audit_log";

/// Read-only access to the audit trail.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    client: BackendClient,
}

impl AuditLogRepository {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// The `limit` most recent entries, newest first.
    pub async fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>> {
        let query = Query::table(AUDIT_TABLE)
            .select("*")
            .order("created_at", false)
            .limit(limit);
        self.client.select(&query).await
    }
}
