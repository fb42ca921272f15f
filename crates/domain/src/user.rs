//! Users and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DomainError, DomainResult};
use crate::request::{QueryParams, ToQuery};

/// Role of an authenticated user, deciding which dashboard they see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Terminal administrator: users, registries, audit logs.
    Admin,
    /// Gate and yard operator.
    Operator,
    /// Shipping customer tracking their own containers.
    Customer,
}

impl Role {
    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Operator => "operator",
            Self::Customer => "customer",
        }
    }

    /// Landing page for this role.
    #[must_use]
    pub const fn dashboard_path(self) -> &'static str {
        match self {
            Self::Admin => "/admin/dashboard",
            Self::Operator => "/operator/dashboard",
            Self::Customer => "/customer/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "operator" => Ok(Self::Operator),
            "customer" => Ok(Self::Customer),
            _ => Err(DomainError::UnknownRole(s.to_string())),
        }
    }
}

/// A terminal user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-assigned identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Login e-mail.
    pub email: String,
    /// Role.
    pub role: Role,
    /// Contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Company the user works for (customers).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// URL of the profile picture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    /// Whether an admin has blocked this account.
    #[serde(default)]
    pub blocked: bool,
    /// Account creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Returns a copy with the blocked flag flipped.
    #[must_use]
    pub fn toggled_blocked(&self) -> Self {
        Self {
            blocked: !self.blocked,
            ..self.clone()
        }
    }
}

/// Payload for creating or updating a user from the admin console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    /// Display name.
    pub name: String,
    /// Login e-mail.
    pub email: String,
    /// Role.
    pub role: Role,
    /// Contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Initial password (create only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Filter for the admin user list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Free-text search over name and e-mail.
    pub search: Option<String>,
    /// Restrict to one role.
    pub role: Option<Role>,
    /// Restrict to blocked or active accounts.
    pub blocked: Option<bool>,
}

impl UserFilter {
    /// Client-side match, mirroring the server filter.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        if let Some(role) = self.role
            && user.role != role
        {
            return false;
        }
        if let Some(blocked) = self.blocked
            && user.blocked != blocked
        {
            return false;
        }
        self.search.as_deref().is_none_or(|needle| {
            let needle = needle.to_lowercase();
            user.name.to_lowercase().contains(&needle)
                || user.email.to_lowercase().contains(&needle)
        })
    }
}

impl ToQuery for UserFilter {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.push_opt("search", self.search.as_deref());
        query.push_opt("role", self.role);
        query.push_opt("blocked", self.blocked);
        query
    }
}
