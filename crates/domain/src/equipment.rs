//! Terminal handling equipment.

use serde::{Deserialize, Serialize};

use crate::macros::wire_enum;

wire_enum! {
    /// Kind of handling equipment.
    pub enum EquipmentType as "equipment type" {
        /// Quay or gantry crane.
        Crane => "CRANE",
        /// Reach stacker.
        ReachStacker => "REACH_STACKER",
        /// Forklift.
        Forklift => "FORKLIFT",
        /// Straddle carrier.
        StraddleCarrier => "STRADDLE_CARRIER",
        /// Terminal tractor.
        TerminalTractor => "TERMINAL_TRACTOR",
    }
}

wire_enum! {
    /// Operational status of a piece of equipment.
    pub enum EquipmentStatus as "equipment status" {
        /// Ready for assignment.
        Available => "AVAILABLE",
        /// Assigned to a move.
        InUse => "IN_USE",
        /// Scheduled maintenance.
        Maintenance => "MAINTENANCE",
        /// Broken down.
        OutOfService => "OUT_OF_SERVICE",
    }
}

/// A piece of handling equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    /// Server-assigned identifier.
    pub id: String,
    /// Fleet name, e.g. `RS-04`.
    pub name: String,
    /// Kind.
    pub equipment_type: EquipmentType,
    /// Operational status.
    pub status: EquipmentStatus,
    /// Where it is parked or working.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Payload for creating or updating equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentInput {
    /// Fleet name.
    pub name: String,
    /// Kind.
    pub equipment_type: EquipmentType,
    /// Operational status.
    pub status: EquipmentStatus,
    /// Location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Body of the status PATCH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentStatusUpdate {
    /// New status.
    pub status: EquipmentStatus,
}
