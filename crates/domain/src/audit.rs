//! Audit log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::request::{QueryParams, ToQuery};

/// One audited action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    /// Server-assigned identifier.
    pub id: String,
    /// Acting user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Acting user's display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Verb, e.g. `CREATE`, `LOGIN`, `BLACKLIST`.
    pub action: String,
    /// Entity kind, e.g. `container`.
    pub entity: String,
    /// Entity identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    /// Free-form details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Client address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
}

/// Filter for the audit log list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLogFilter {
    /// Acting user.
    pub user_id: Option<String>,
    /// Verb.
    pub action: Option<String>,
    /// Entity kind.
    pub entity: Option<String>,
    /// Inclusive lower bound.
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound.
    pub to: Option<DateTime<Utc>>,
}

impl ToQuery for AuditLogFilter {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.push_opt("userId", self.user_id.as_deref());
        query.push_opt("action", self.action.as_deref());
        query.push_opt("entity", self.entity.as_deref());
        query.push_opt("from", self.from.map(|d| d.to_rfc3339()));
        query.push_opt("to", self.to.map(|d| d.to_rfc3339()));
        query
    }
}
