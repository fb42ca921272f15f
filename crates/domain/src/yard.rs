//! Yard blocks and their utilisation.

use serde::{Deserialize, Serialize};

/// A named storage area with a fixed container capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YardBlock {
    /// Server-assigned identifier.
    pub id: String,
    /// Block name, e.g. `A1`.
    pub name: String,
    /// Number of container slots.
    pub capacity: u32,
    /// Slots currently filled.
    #[serde(default)]
    pub occupied: u32,
    /// Area of the terminal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl YardBlock {
    /// Percentage of slots filled, clamped to `0..=100`.
    ///
    /// A block with zero capacity reports 0.
    #[must_use]
    pub fn utilization(&self) -> f64 {
        utilization(self.occupied, self.capacity)
    }

    /// Free slots, saturating at zero when over-filled.
    #[must_use]
    pub const fn available(&self) -> u32 {
        self.capacity.saturating_sub(self.occupied)
    }

    /// Returns true when no slot is free.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.occupied >= self.capacity
    }
}

/// Percentage of `occupied` over `capacity`, clamped to `0..=100`.
#[must_use]
pub fn utilization(occupied: u32, capacity: u32) -> f64 {
    if capacity == 0 {
        return 0.0;
    }
    (f64::from(occupied) / f64::from(capacity) * 100.0).clamp(0.0, 100.0)
}

/// Payload for creating or updating a yard block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YardBlockInput {
    /// Block name.
    pub name: String,
    /// Slot count.
    pub capacity: u32,
    /// Area.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(capacity: u32, occupied: u32) -> YardBlock {
        YardBlock {
            id: "b".to_string(),
            name: "A1".to_string(),
            capacity,
            occupied,
            location: None,
        }
    }

    #[test]
    fn utilization_is_a_percentage() {
        assert!((block(200, 50).utilization() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_capacity_reports_zero() {
        assert!(block(0, 3).utilization().abs() < f64::EPSILON);
    }

    #[test]
    fn overfilled_block_clamps() {
        let b = block(10, 12);
        assert!((b.utilization() - 100.0).abs() < f64::EPSILON);
        assert_eq!(b.available(), 0);
        assert!(b.is_full());
    }
}
