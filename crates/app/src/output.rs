//! Rendering results as text lines or JSON.

use chrono::{DateTime, Utc};
use quay_domain::{
    AuditLog, Container, DashboardStats, Equipment, GateOperation, GuardDecision, Page,
    ShippingLine, User, Vehicle, YardBlock,
};
use quay_infrastructure::to_json_pretty;
use serde::Serialize;

use crate::cli::OutputFormat;

/// One-line text form of a record.
pub trait Describe {
    /// Renders the record; `now` feeds derived values such as dwell time.
    fn describe(&self, now: DateTime<Utc>) -> String;
}

fn opt(value: Option<&String>) -> &str {
    value.map_or("-", String::as_str)
}

impl Describe for Container {
    fn describe(&self, now: DateTime<Utc>) -> String {
        let dwell = self
            .dwell_days(now)
            .map_or_else(|| "-".to_string(), |d| format!("{d}d"));
        format!(
            "{:<12} {:<6} {:<10} {:<10} line={} block={} dwell={}  [{}]",
            self.container_number,
            self.size,
            self.container_type,
            self.status,
            opt(self.shipping_line.as_ref()),
            opt(self.yard_block.as_ref()),
            dwell,
            self.id
        )
    }
}

impl Describe for GateOperation {
    fn describe(&self, _now: DateTime<Utc>) -> String {
        format!(
            "{} {:<8} {:<9} {:<12} vehicle={} driver={}  [{}]",
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.operation_type,
            self.status,
            self.container_number,
            self.vehicle_number,
            opt(self.driver_name.as_ref()),
            self.id
        )
    }
}

impl Describe for Vehicle {
    fn describe(&self, _now: DateTime<Utc>) -> String {
        let mut line = format!(
            "{:<10} {:<8} owner={}  [{}]",
            self.vehicle_number,
            self.vehicle_type,
            opt(self.owner_name.as_ref()),
            self.id
        );
        if self.blacklisted {
            line.push_str(&format!(" BLACKLISTED: {}", opt(self.blacklist_reason.as_ref())));
        }
        line
    }
}

impl Describe for Equipment {
    fn describe(&self, _now: DateTime<Utc>) -> String {
        format!(
            "{:<16} {:<16} {:<14} location={}  [{}]",
            self.name,
            self.equipment_type,
            self.status,
            opt(self.location.as_ref()),
            self.id
        )
    }
}

impl Describe for YardBlock {
    fn describe(&self, _now: DateTime<Utc>) -> String {
        format!(
            "{:<10} {:>4}/{:<4} {:>5.1}% free={}  [{}]",
            self.name,
            self.occupied,
            self.capacity,
            self.utilization(),
            self.available(),
            self.id
        )
    }
}

impl Describe for ShippingLine {
    fn describe(&self, _now: DateTime<Utc>) -> String {
        format!(
            "{:<6} {:<24} {}{}  [{}]",
            self.code,
            self.name,
            opt(self.contact_email.as_ref()),
            if self.active { "" } else { " (inactive)" },
            self.id
        )
    }
}

impl Describe for User {
    fn describe(&self, _now: DateTime<Utc>) -> String {
        format!(
            "{:<24} {:<28} {:<8}{}  [{}]",
            self.name,
            self.email,
            self.role,
            if self.blocked { " BLOCKED" } else { "" },
            self.id
        )
    }
}

impl Describe for AuditLog {
    fn describe(&self, _now: DateTime<Utc>) -> String {
        format!(
            "{} {:<10} {:<14} {} by {}  [{}]",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.action,
            self.entity,
            opt(self.entity_id.as_ref()),
            self.user_name.as_deref().or(self.user_id.as_deref()).unwrap_or("system"),
            self.id
        )
    }
}

impl Describe for DashboardStats {
    fn describe(&self, _now: DateTime<Utc>) -> String {
        let mut out = format!(
            "in yard: {}\ngate-ins: {}\ngate-outs: {}\npending: {}\nyard utilisation: {:.1}%",
            self.containers_in_yard,
            self.gate_ins,
            self.gate_outs,
            self.pending_operations,
            self.yard_utilization
        );
        if let Some(users) = self.total_users {
            out.push_str(&format!("\nusers: {users}"));
        }
        if let Some(blacklisted) = self.blacklisted_vehicles {
            out.push_str(&format!("\nblacklisted vehicles: {blacklisted}"));
        }
        for (status, count) in &self.containers_by_status {
            out.push_str(&format!("\n  {status}: {count}"));
        }
        out
    }
}

impl Describe for GuardDecision {
    fn describe(&self, _now: DateTime<Utc>) -> String {
        match self {
            Self::Allow { page, params } if params.is_empty() => format!("allow: {page}"),
            Self::Allow { page, params } => {
                let params: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
                format!("allow: {page} ({})", params.join(", "))
            }
            Self::RedirectToLogin { return_to } => format!("redirect: /login (return to {return_to})"),
            Self::Redirect(path) => format!("redirect: {path}"),
            Self::NotFound => "not found".to_string(),
        }
    }
}

/// Formats results for stdout.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    format: OutputFormat,
    now: DateTime<Utc>,
}

impl Printer {
    /// Creates a printer; `now` is read once per command.
    #[must_use]
    pub const fn new(format: OutputFormat, now: DateTime<Utc>) -> Self {
        Self { format, now }
    }

    /// Renders one record.
    ///
    /// # Errors
    /// Fails only if JSON serialization fails.
    pub fn one<T: Describe + Serialize>(&self, value: &T) -> anyhow::Result<String> {
        match self.format {
            OutputFormat::Text => Ok(value.describe(self.now)),
            OutputFormat::Json => Ok(to_json_pretty(value)?.trim_end().to_string()),
        }
    }

    /// Renders a list page with a footer.
    ///
    /// # Errors
    /// Fails only if JSON serialization fails.
    pub fn page<T: Describe + Serialize>(&self, page: &Page<T>) -> anyhow::Result<String> {
        match self.format {
            OutputFormat::Text => {
                let mut out = String::new();
                for item in &page.items {
                    out.push_str(&item.describe(self.now));
                    out.push('\n');
                }
                if page.items.is_empty() {
                    out.push_str("no results\n");
                }
                out.push_str(&format!(
                    "page {}/{} ({} total)",
                    page.page,
                    page.total_pages(),
                    page.total
                ));
                Ok(out)
            }
            OutputFormat::Json => Ok(to_json_pretty(page)?.trim_end().to_string()),
        }
    }

    /// Renders a plain acknowledgement.
    #[must_use]
    pub fn done(&self, message: &str) -> String {
        match self.format {
            OutputFormat::Text => message.to_string(),
            OutputFormat::Json => serde_json::json!({ "ok": true, "message": message }).to_string(),
        }
    }
}
