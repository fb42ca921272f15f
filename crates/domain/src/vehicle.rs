//! Vehicle registry with blacklisting.

use serde::{Deserialize, Serialize};

use crate::macros::wire_enum;
use crate::request::{QueryParams, ToQuery};

wire_enum! {
    /// Kind of road vehicle.
    pub enum VehicleType as "vehicle type" {
        /// Prime mover.
        Truck => "TRUCK",
        /// Trailer.
        Trailer => "TRAILER",
        /// Container chassis.
        Chassis => "CHASSIS",
    }
}

/// A registered vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    /// Server-assigned identifier.
    pub id: String,
    /// Registration plate.
    pub vehicle_number: String,
    /// Kind.
    pub vehicle_type: VehicleType,
    /// Haulier or owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    /// Usual driver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    /// Contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Whether the vehicle is refused at the gate.
    #[serde(default)]
    pub blacklisted: bool,
    /// Why it was blacklisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blacklist_reason: Option<String>,
}

/// Payload for creating or updating a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInput {
    /// Registration plate.
    pub vehicle_number: String,
    /// Kind.
    pub vehicle_type: VehicleType,
    /// Owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    /// Driver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    /// Phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Body of the blacklist PATCH.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlacklistUpdate {
    /// New flag value.
    pub blacklisted: bool,
    /// Reason, required by the UI when blacklisting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl BlacklistUpdate {
    /// Builds the update that flips the vehicle's current flag.
    #[must_use]
    pub fn toggle(vehicle: &Vehicle, reason: Option<String>) -> Self {
        let blacklisted = !vehicle.blacklisted;
        Self {
            blacklisted,
            reason: if blacklisted { reason } else { None },
        }
    }
}

/// Filter for the vehicle list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleFilter {
    /// Substring of the registration or owner.
    pub search: Option<String>,
    /// Kind.
    pub vehicle_type: Option<VehicleType>,
    /// Only blacklisted (true) or only cleared (false).
    pub blacklisted: Option<bool>,
}

impl VehicleFilter {
    /// Client-side match, mirroring the server filter.
    #[must_use]
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        self.vehicle_type.is_none_or(|t| vehicle.vehicle_type == t)
            && self.blacklisted.is_none_or(|b| vehicle.blacklisted == b)
            && self.search.as_deref().is_none_or(|needle| {
                let needle = needle.trim().to_lowercase();
                vehicle.vehicle_number.to_lowercase().contains(&needle)
                    || vehicle
                        .owner_name
                        .as_deref()
                        .is_some_and(|o| o.to_lowercase().contains(&needle))
            })
    }
}

impl ToQuery for VehicleFilter {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.push_opt("search", self.search.as_deref());
        query.push_opt("type", self.vehicle_type);
        query.push_opt("blacklisted", self.blacklisted);
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vehicle(number: &str, blacklisted: bool) -> Vehicle {
        Vehicle {
            id: "v1".to_string(),
            vehicle_number: number.to_string(),
            vehicle_type: VehicleType::Truck,
            owner_name: Some("Harbour Haulage".to_string()),
            driver_name: None,
            phone: None,
            blacklisted,
            blacklist_reason: None,
        }
    }

    #[test]
    fn toggle_blacklists_with_reason() {
        let update = BlacklistUpdate::toggle(&vehicle("KA01", false), Some("Overweight".into()));
        assert_eq!(
            update,
            BlacklistUpdate {
                blacklisted: true,
                reason: Some("Overweight".to_string())
            }
        );
    }

    #[test]
    fn toggle_clears_reason_when_lifting() {
        let update = BlacklistUpdate::toggle(&vehicle("KA01", true), Some("ignored".into()));
        assert!(!update.blacklisted);
        assert_eq!(update.reason, None);
    }

    #[test]
    fn filter_by_owner_and_flag() {
        let filter = VehicleFilter {
            search: Some("harbour".to_string()),
            blacklisted: Some(true),
            ..VehicleFilter::default()
        };
        assert!(filter.matches(&vehicle("KA01", true)));
        assert!(!filter.matches(&vehicle("KA01", false)));
    }
}
