//! Dashboard summaries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::container::{Container, ContainerStatus};
use crate::gate::{GateOperation, GateOperationType, GateStatus};
use crate::yard::{YardBlock, utilization};

/// Headline numbers shown on the role dashboards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Containers currently in the yard.
    #[serde(default)]
    pub containers_in_yard: u64,
    /// Completed gate-ins.
    #[serde(default)]
    pub gate_ins: u64,
    /// Completed gate-outs.
    #[serde(default)]
    pub gate_outs: u64,
    /// Gate operations still pending.
    #[serde(default)]
    pub pending_operations: u64,
    /// Yard utilisation across all blocks, percent.
    #[serde(default)]
    pub yard_utilization: f64,
    /// Registered users (admin only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_users: Option<u64>,
    /// Blacklisted vehicles (admin only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blacklisted_vehicles: Option<u64>,
    /// Container counts per status.
    #[serde(default)]
    pub containers_by_status: BTreeMap<ContainerStatus, u64>,
}

impl DashboardStats {
    /// Computes the stats from already-loaded lists.
    ///
    /// Only gate operations at or after `since` are counted, so operator
    /// dashboards can show "today".
    #[must_use]
    pub fn compute(
        containers: &[Container],
        operations: &[GateOperation],
        blocks: &[YardBlock],
        since: Option<DateTime<Utc>>,
    ) -> Self {
        let mut containers_by_status = BTreeMap::new();
        for container in containers {
            *containers_by_status.entry(container.status).or_insert(0) += 1;
        }

        let recent = operations
            .iter()
            .filter(|op| since.is_none_or(|since| op.timestamp >= since));
        let (mut gate_ins, mut gate_outs, mut pending_operations) = (0, 0, 0);
        for op in recent {
            match (op.status, op.operation_type) {
                (GateStatus::Completed, GateOperationType::GateIn) => gate_ins += 1,
                (GateStatus::Completed, GateOperationType::GateOut) => gate_outs += 1,
                (GateStatus::Pending, _) => pending_operations += 1,
                (GateStatus::Cancelled, _) => {}
            }
        }

        let (occupied, capacity) = blocks.iter().fold((0u32, 0u32), |(o, c), b| {
            (o.saturating_add(b.occupied), c.saturating_add(b.capacity))
        });

        Self {
            containers_in_yard: containers_by_status
                .get(&ContainerStatus::InYard)
                .copied()
                .unwrap_or(0),
            gate_ins,
            gate_outs,
            pending_operations,
            yard_utilization: utilization(occupied, capacity),
            total_users: None,
            blacklisted_vehicles: None,
            containers_by_status,
        }
    }
}
