//! Containers tracked in the terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::macros::wire_enum;
use crate::request::{QueryParams, ToQuery};

wire_enum! {
    /// Nominal container length.
    pub enum ContainerSize as "container size" {
        /// 20-foot equivalent unit.
        Twenty => "20FT",
        /// 40-foot container.
        Forty => "40FT",
        /// 45-foot high-cube.
        FortyFive => "45FT",
    }
}

wire_enum! {
    /// Construction type of a container.
    pub enum ContainerType as "container type" {
        /// General-purpose dry box.
        Dry => "DRY",
        /// Refrigerated.
        Reefer => "REEFER",
        /// Open top.
        OpenTop => "OPEN_TOP",
        /// Flat rack.
        FlatRack => "FLAT_RACK",
        /// Liquid tank.
        Tank => "TANK",
    }
}

wire_enum! {
    /// Where a container is in its terminal lifecycle.
    pub enum ContainerStatus as "container status" {
        /// Stacked in a yard block.
        InYard => "IN_YARD",
        /// Left the terminal through the gate.
        GatedOut => "GATED_OUT",
        /// Moving between the gate and the yard.
        InTransit => "IN_TRANSIT",
        /// Held by customs or the line.
        OnHold => "ON_HOLD",
        /// Flagged as damaged at inspection.
        Damaged => "DAMAGED",
    }
}

/// A container record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    /// Server-assigned identifier.
    pub id: String,
    /// ISO 6346 number, e.g. `MSCU1234567`.
    pub container_number: String,
    /// Length.
    pub size: ContainerSize,
    /// Construction type.
    pub container_type: ContainerType,
    /// Lifecycle status.
    pub status: ContainerStatus,
    /// Owning shipping line (name or code).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_line: Option<String>,
    /// Yard block the container sits in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yard_block: Option<String>,
    /// Bay/row/tier position inside the block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Customer the container belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// Gross weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<u32>,
    /// Gate-in time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_date: Option<DateTime<Utc>>,
    /// Gate-out time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<DateTime<Utc>>,
    /// Free-form remarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Container {
    /// Whole days the container has spent in the terminal.
    ///
    /// Counts up to the departure date when gated out, otherwise up to `now`.
    /// Returns `None` without an arrival date; never negative.
    #[must_use]
    pub fn dwell_days(&self, now: DateTime<Utc>) -> Option<i64> {
        let arrival = self.arrival_date?;
        let end = self.departure_date.unwrap_or(now);
        Some((end - arrival).num_days().max(0))
    }
}

/// Payload for creating or updating a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerInput {
    /// ISO 6346 number.
    pub container_number: String,
    /// Length.
    pub size: ContainerSize,
    /// Construction type.
    pub container_type: ContainerType,
    /// Lifecycle status.
    pub status: ContainerStatus,
    /// Owning shipping line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_line: Option<String>,
    /// Target yard block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yard_block: Option<String>,
    /// Position inside the block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// Gross weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<u32>,
    /// Remarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Filter for the container list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerFilter {
    /// Substring of the container number.
    pub search: Option<String>,
    /// Lifecycle status.
    pub status: Option<ContainerStatus>,
    /// Construction type.
    pub container_type: Option<ContainerType>,
    /// Shipping line.
    pub shipping_line: Option<String>,
    /// Yard block.
    pub yard_block: Option<String>,
    /// Customer.
    pub customer_id: Option<String>,
}

impl ContainerFilter {
    /// Client-side match, mirroring the server filter.
    #[must_use]
    pub fn matches(&self, container: &Container) -> bool {
        let eq_opt = |want: Option<&String>, have: Option<&String>| {
            want.is_none_or(|w| have.is_some_and(|h| h.eq_ignore_ascii_case(w)))
        };

        self.status.is_none_or(|s| container.status == s)
            && self
                .container_type
                .is_none_or(|t| container.container_type == t)
            && eq_opt(self.shipping_line.as_ref(), container.shipping_line.as_ref())
            && eq_opt(self.yard_block.as_ref(), container.yard_block.as_ref())
            && eq_opt(self.customer_id.as_ref(), container.customer_id.as_ref())
            && self.search.as_deref().is_none_or(|needle| {
                container
                    .container_number
                    .to_uppercase()
                    .contains(&needle.trim().to_uppercase())
            })
    }
}

impl ToQuery for ContainerFilter {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.push_opt("search", self.search.as_deref());
        query.push_opt("status", self.status);
        query.push_opt("type", self.container_type);
        query.push_opt("shippingLine", self.shipping_line.as_deref());
        query.push_opt("yardBlock", self.yard_block.as_deref());
        query.push_opt("customerId", self.customer_id.as_deref());
        query
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn container(number: &str, status: ContainerStatus) -> Container {
        Container {
            id: number.to_lowercase(),
            container_number: number.to_string(),
            size: ContainerSize::Forty,
            container_type: ContainerType::Dry,
            status,
            shipping_line: Some("MSC".to_string()),
            yard_block: Some("A1".to_string()),
            position: None,
            customer_id: None,
            weight_kg: None,
            arrival_date: None,
            departure_date: None,
            notes: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::fixtures::container;
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    #[test]
    fn dwell_counts_until_now_while_in_yard() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let mut c = container("MSCU1234567", ContainerStatus::InYard);
        c.arrival_date = Some(now - Duration::days(5) - Duration::hours(3));
        assert_eq!(c.dwell_days(now), Some(5));
    }

    #[test]
    fn dwell_stops_at_departure() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let mut c = container("MSCU1234567", ContainerStatus::GatedOut);
        c.arrival_date = Some(now - Duration::days(20));
        c.departure_date = Some(now - Duration::days(18));
        assert_eq!(c.dwell_days(now), Some(2));
    }

    #[test]
    fn dwell_is_never_negative_and_needs_arrival() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let mut c = container("MSCU1234567", ContainerStatus::InTransit);
        assert_eq!(c.dwell_days(now), None);
        c.arrival_date = Some(now + Duration::days(1));
        assert_eq!(c.dwell_days(now), Some(0));
    }

    #[test]
    fn status_parses_wire_and_cli_spellings() {
        assert_eq!("IN_YARD".parse(), Ok(ContainerStatus::InYard));
        assert_eq!("on-hold".parse(), Ok(ContainerStatus::OnHold));
        assert!("lost".parse::<ContainerStatus>().is_err());
    }

    #[test]
    fn serializes_wire_names() {
        let c = container("MSCU1234567", ContainerStatus::InYard);
        let value = serde_json::to_value(&c).unwrap();
        assert_eq!(value["status"], "IN_YARD");
        assert_eq!(value["size"], "40FT");
        assert_eq!(value["containerNumber"], "MSCU1234567");
    }

    #[test]
    fn filter_combines_criteria() {
        let filter = ContainerFilter {
            search: Some("mscu".to_string()),
            status: Some(ContainerStatus::InYard),
            yard_block: Some("a1".to_string()),
            ..ContainerFilter::default()
        };
        assert!(filter.matches(&container("MSCU1234567", ContainerStatus::InYard)));
        assert!(!filter.matches(&container("MSCU1234567", ContainerStatus::GatedOut)));
        assert!(!filter.matches(&container("TGHU7654321", ContainerStatus::InYard)));
    }

    #[test]
    fn filter_query_uses_api_names() {
        let filter = ContainerFilter {
            container_type: Some(ContainerType::Reefer),
            shipping_line: Some("MAEU".to_string()),
            ..ContainerFilter::default()
        };
        let query = filter.to_query();
        assert_eq!(query.get("type"), Some("REEFER"));
        assert_eq!(query.get("shippingLine"), Some("MAEU"));
        assert_eq!(query.len(), 2);
    }
}
