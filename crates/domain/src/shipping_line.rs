//! Shipping lines calling at the terminal.

use serde::{Deserialize, Serialize};

/// A shipping line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingLine {
    /// Server-assigned identifier.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Short code, e.g. `MSC`.
    pub code: String,
    /// Operations contact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    /// Whether the line is still served.
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

/// Payload for creating or updating a shipping line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingLineInput {
    /// Full name.
    pub name: String,
    /// Short code.
    pub code: String,
    /// Contact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    /// Active flag.
    pub active: bool,
}
