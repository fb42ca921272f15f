//! Gate-in and gate-out operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::macros::wire_enum;
use crate::request::{QueryParams, ToQuery};

wire_enum! {
    /// Direction of a gate movement.
    pub enum GateOperationType as "gate operation type" {
        /// Container enters the terminal.
        GateIn => "GATE_IN",
        /// Container leaves the terminal.
        GateOut => "GATE_OUT",
    }
}

wire_enum! {
    /// Processing status of a gate operation.
    pub enum GateStatus as "gate status" {
        /// Truck at the gate, inspection running.
        Pending => "PENDING",
        /// Movement recorded.
        Completed => "COMPLETED",
        /// Movement aborted.
        Cancelled => "CANCELLED",
    }
}

/// A recorded gate movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateOperation {
    /// Server-assigned identifier.
    pub id: String,
    /// Direction.
    pub operation_type: GateOperationType,
    /// Container moved.
    pub container_number: String,
    /// Truck registration.
    pub vehicle_number: String,
    /// Driver name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    /// Seal number checked at the gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seal_number: Option<String>,
    /// Processing status.
    pub status: GateStatus,
    /// When the movement was recorded.
    pub timestamp: DateTime<Utc>,
    /// Operator remarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Payload for recording a gate movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateOperationInput {
    /// Container moved.
    pub container_number: String,
    /// Truck registration.
    pub vehicle_number: String,
    /// Driver name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    /// Seal number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seal_number: Option<String>,
    /// Target yard block (gate-in only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yard_block: Option<String>,
    /// Remarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Filter for the gate-operation list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateOperationFilter {
    /// Direction.
    pub operation_type: Option<GateOperationType>,
    /// Status.
    pub status: Option<GateStatus>,
    /// Substring of container or vehicle number.
    pub search: Option<String>,
    /// Inclusive lower bound on the timestamp.
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on the timestamp.
    pub to: Option<DateTime<Utc>>,
}

impl GateOperationFilter {
    /// Client-side match, mirroring the server filter.
    #[must_use]
    pub fn matches(&self, op: &GateOperation) -> bool {
        self.operation_type.is_none_or(|t| op.operation_type == t)
            && self.status.is_none_or(|s| op.status == s)
            && self.from.is_none_or(|from| op.timestamp >= from)
            && self.to.is_none_or(|to| op.timestamp < to)
            && self.search.as_deref().is_none_or(|needle| {
                let needle = needle.trim().to_uppercase();
                op.container_number.to_uppercase().contains(&needle)
                    || op.vehicle_number.to_uppercase().contains(&needle)
            })
    }
}

impl ToQuery for GateOperationFilter {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.push_opt("type", self.operation_type);
        query.push_opt("status", self.status);
        query.push_opt("search", self.search.as_deref());
        query.push_opt("from", self.from.map(|d| d.to_rfc3339()));
        query.push_opt("to", self.to.map(|d| d.to_rfc3339()));
        query
    }
}
