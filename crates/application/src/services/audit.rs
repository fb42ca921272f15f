//! Read-only audit trail.

use std::sync::Arc;

use quay_domain::{ApiRequest, AuditLog, AuditLogFilter, Page, PageRequest};

use super::fetch_page;
use crate::client::ApiClient;
use crate::endpoints::{self, AUDIT_LOGS};
use crate::error::ApiResult;

/// Audit log endpoints.
#[derive(Debug, Clone)]
pub struct AuditLogService {
    client: Arc<ApiClient>,
}

impl AuditLogService {
    /// Creates the service over a shared client.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Lists audit entries, newest first as ordered by the server.
    ///
    /// # Errors
    /// Propagates request and decode failures.
    pub async fn list(&self, filter: &AuditLogFilter, page: PageRequest) -> ApiResult<Page<AuditLog>> {
        fetch_page(&self.client, AUDIT_LOGS, filter, page).await
    }

    /// Fetches one entry.
    ///
    /// # Errors
    /// Fails on an unknown id.
    pub async fn get(&self, id: &str) -> ApiResult<AuditLog> {
        self.client
            .execute(ApiRequest::get(endpoints::item(AUDIT_LOGS, id)?))
            .await
    }
}
