//! Declarative form validation.
//!
//! Each form is described by a [`Schema`]: an ordered list of fields with
//! the rules they must satisfy. Validation stops at the first failing rule
//! per field, so every field reports at most one message.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::auth::{ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, SignupRequest};
use crate::container::ContainerInput;
use crate::equipment::EquipmentInput;
use crate::gate::GateOperationInput;
use crate::profile::ChangePasswordRequest;
use crate::shipping_line::ShippingLineInput;
use crate::user::UserInput;
use crate::vehicle::VehicleInput;
use crate::yard::YardBlockInput;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|_| unreachable!())
});

/// ISO 6346: four-letter owner/category code and seven digits.
static CONTAINER_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{4}\d{7}$").unwrap_or_else(|_| unreachable!()));

static VEHICLE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9-]{4,15}$").unwrap_or_else(|_| unreachable!()));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 ]{7,15}$").unwrap_or_else(|_| unreachable!()));

static OTP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}$").unwrap_or_else(|_| unreachable!()));

static LINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2,5}$").unwrap_or_else(|_| unreachable!()));

/// Minimum password length accepted by the API.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A single validation rule.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Value must be present and not blank.
    Required,
    /// At least this many characters.
    MinLength(usize),
    /// At most this many characters.
    MaxLength(usize),
    /// Must look like an e-mail address.
    Email,
    /// Must match the pattern; the message is shown otherwise.
    Pattern(&'static LazyLock<Regex>, &'static str),
    /// Must parse as a number within the inclusive range.
    Range {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// Must equal the value of another field.
    Matches(&'static str, &'static str),
}

impl Rule {
    /// Checks one value. `None` means the rule passed.
    ///
    /// Rules other than `Required` and `Matches` accept empty values, so
    /// optional fields only get checked when filled in.
    fn check(&self, label: &str, value: &str, form: &dyn FormFields) -> Option<String> {
        let trimmed = value.trim();
        match self {
            Self::Required => trimmed.is_empty().then(|| format!("{label} is required")),
            Self::Matches(other, message) => {
                let other = form.field(other).unwrap_or_default();
                (value != other).then(|| (*message).to_string())
            }
            _ if trimmed.is_empty() => None,
            Self::MinLength(min) => (trimmed.chars().count() < *min)
                .then(|| format!("{label} must be at least {min} characters")),
            Self::MaxLength(max) => (trimmed.chars().count() > *max)
                .then(|| format!("{label} must be at most {max} characters")),
            Self::Email => (!EMAIL.is_match(trimmed)).then(|| "Invalid email address".to_string()),
            Self::Pattern(regex, message) => {
                (!regex.is_match(trimmed)).then(|| (*message).to_string())
            }
            Self::Range { min, max } => match trimmed.parse::<f64>() {
                Ok(n) if n >= *min && n <= *max => None,
                Ok(_) => Some(format!("{label} must be between {min} and {max}")),
                Err(_) => Some(format!("{label} must be a number")),
            },
        }
    }
}

/// Read access to a form's fields by name.
pub trait FormFields {
    /// Returns the current value of `name`, or `None` when unset.
    fn field(&self, name: &str) -> Option<String>;
}

/// Per-field validation failures, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    /// Records a message for a field, keeping the first one.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Message for one field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Returns true when no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterates `(field, message)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "validation failed: {joined}")
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Clone)]
struct FieldSpec {
    name: &'static str,
    label: &'static str,
    rules: Vec<Rule>,
}

/// An ordered set of field rules.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Adds a field with its display label and rules.
    #[must_use]
    pub fn field(
        mut self,
        name: &'static str,
        label: &'static str,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Self {
        self.fields.push(FieldSpec {
            name,
            label,
            rules: rules.into_iter().collect(),
        });
        self
    }

    /// Validates a form against the schema.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule's message for every invalid field.
    pub fn validate(&self, form: &dyn FormFields) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for spec in &self.fields {
            let value = form.field(spec.name).unwrap_or_default();
            if let Some(message) = spec
                .rules
                .iter()
                .find_map(|rule| rule.check(spec.label, &value, form))
            {
                errors.add(spec.name, message);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Forms with a fixed schema.
pub trait Validate: FormFields {
    /// The schema for this form.
    fn schema() -> Schema;

    /// Validates `self` against [`schema`](Self::schema).
    ///
    /// # Errors
    ///
    /// Returns per-field messages for invalid input.
    fn validate(&self) -> Result<(), ValidationErrors>
    where
        Self: Sized,
    {
        Self::schema().validate(self)
    }
}

fn password_rules() -> [Rule; 2] {
    [Rule::Required, Rule::MinLength(MIN_PASSWORD_LENGTH)]
}

fn opt(value: Option<&String>) -> Option<String> {
    value.cloned()
}

impl FormFields for LoginRequest {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "email" => Some(self.email.clone()),
            "password" => Some(self.password.clone()),
            _ => None,
        }
    }
}

impl Validate for LoginRequest {
    fn schema() -> Schema {
        Schema::new()
            .field("email", "Email", [Rule::Required, Rule::Email])
            .field("password", "Password", [Rule::Required])
    }
}

impl FormFields for SignupRequest {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "name" => Some(self.name.clone()),
            "email" => Some(self.email.clone()),
            "password" => Some(self.password.clone()),
            "confirmPassword" => Some(self.confirm_password.clone()),
            "phone" => opt(self.phone.as_ref()),
            "company" => opt(self.company.as_ref()),
            _ => None,
        }
    }
}

impl Validate for SignupRequest {
    fn schema() -> Schema {
        Schema::new()
            .field("name", "Name", [Rule::Required, Rule::MinLength(2), Rule::MaxLength(80)])
            .field("email", "Email", [Rule::Required, Rule::Email])
            .field("password", "Password", password_rules())
            .field(
                "confirmPassword",
                "Confirm password",
                [Rule::Required, Rule::Matches("password", "Passwords must match")],
            )
            .field("phone", "Phone", [Rule::Pattern(&PHONE, "Invalid phone number")])
            .field("company", "Company", [Rule::MaxLength(120)])
    }
}

impl FormFields for ResetPasswordRequest {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "token" => Some(self.token.clone()),
            "newPassword" => Some(self.new_password.clone()),
            "confirmPassword" => Some(self.confirm_password.clone()),
            _ => None,
        }
    }
}

impl Validate for ResetPasswordRequest {
    fn schema() -> Schema {
        Schema::new()
            .field("token", "Reset token", [Rule::Required])
            .field("newPassword", "New password", password_rules())
            .field(
                "confirmPassword",
                "Confirm password",
                [Rule::Required, Rule::Matches("newPassword", "Passwords must match")],
            )
    }
}

impl FormFields for ChangePasswordRequest {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "currentPassword" => Some(self.current_password.clone()),
            "newPassword" => Some(self.new_password.clone()),
            "confirmPassword" => Some(self.confirm_password.clone()),
            _ => None,
        }
    }
}

impl Validate for ChangePasswordRequest {
    fn schema() -> Schema {
        Schema::new()
            .field("currentPassword", "Current password", [Rule::Required])
            .field("newPassword", "New password", password_rules())
            .field(
                "confirmPassword",
                "Confirm password",
                [Rule::Required, Rule::Matches("newPassword", "Passwords must match")],
            )
    }
}

/// Schema for the OTP entry form.
#[must_use]
pub fn otp_schema() -> Schema {
    Schema::new()
        .field("email", "Email", [Rule::Required, Rule::Email])
        .field("otp", "OTP", [Rule::Required, Rule::Pattern(&OTP, "OTP must be 6 digits")])
}

impl FormFields for crate::auth::OtpRequest {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "email" => Some(self.email.clone()),
            "otp" => Some(self.otp.clone()),
            _ => None,
        }
    }
}

impl Validate for crate::auth::OtpRequest {
    fn schema() -> Schema {
        otp_schema()
    }
}

impl FormFields for ContainerInput {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "containerNumber" => Some(self.container_number.clone()),
            "weightKg" => self.weight_kg.map(|w| w.to_string()),
            "yardBlock" => opt(self.yard_block.as_ref()),
            "notes" => opt(self.notes.as_ref()),
            _ => None,
        }
    }
}

impl Validate for ContainerInput {
    fn schema() -> Schema {
        Schema::new()
            .field(
                "containerNumber",
                "Container number",
                [
                    Rule::Required,
                    Rule::Pattern(
                        &CONTAINER_NUMBER,
                        "Container number must be 4 letters followed by 7 digits",
                    ),
                ],
            )
            .field("weightKg", "Weight", [Rule::Range { min: 0.0, max: 60_000.0 }])
            .field("notes", "Notes", [Rule::MaxLength(500)])
    }
}

impl FormFields for GateOperationInput {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "containerNumber" => Some(self.container_number.clone()),
            "vehicleNumber" => Some(self.vehicle_number.clone()),
            "driverName" => opt(self.driver_name.as_ref()),
            "remarks" => opt(self.remarks.as_ref()),
            _ => None,
        }
    }
}

impl Validate for GateOperationInput {
    fn schema() -> Schema {
        Schema::new()
            .field(
                "containerNumber",
                "Container number",
                [
                    Rule::Required,
                    Rule::Pattern(
                        &CONTAINER_NUMBER,
                        "Container number must be 4 letters followed by 7 digits",
                    ),
                ],
            )
            .field(
                "vehicleNumber",
                "Vehicle number",
                [
                    Rule::Required,
                    Rule::Pattern(&VEHICLE_NUMBER, "Invalid vehicle number"),
                ],
            )
            .field("driverName", "Driver name", [Rule::MaxLength(80)])
            .field("remarks", "Remarks", [Rule::MaxLength(500)])
    }
}

impl FormFields for VehicleInput {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "vehicleNumber" => Some(self.vehicle_number.clone()),
            "ownerName" => opt(self.owner_name.as_ref()),
            "phone" => opt(self.phone.as_ref()),
            _ => None,
        }
    }
}

impl Validate for VehicleInput {
    fn schema() -> Schema {
        Schema::new()
            .field(
                "vehicleNumber",
                "Vehicle number",
                [
                    Rule::Required,
                    Rule::Pattern(&VEHICLE_NUMBER, "Invalid vehicle number"),
                ],
            )
            .field("ownerName", "Owner", [Rule::MaxLength(120)])
            .field("phone", "Phone", [Rule::Pattern(&PHONE, "Invalid phone number")])
    }
}

impl FormFields for YardBlockInput {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "name" => Some(self.name.clone()),
            "capacity" => Some(self.capacity.to_string()),
            _ => None,
        }
    }
}

impl Validate for YardBlockInput {
    fn schema() -> Schema {
        Schema::new()
            .field("name", "Block name", [Rule::Required, Rule::MaxLength(20)])
            .field(
                "capacity",
                "Capacity",
                [Rule::Required, Rule::Range { min: 1.0, max: 10_000.0 }],
            )
    }
}

impl FormFields for ShippingLineInput {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "name" => Some(self.name.clone()),
            "code" => Some(self.code.clone()),
            "contactEmail" => opt(self.contact_email.as_ref()),
            _ => None,
        }
    }
}

impl Validate for ShippingLineInput {
    fn schema() -> Schema {
        Schema::new()
            .field("name", "Name", [Rule::Required, Rule::MaxLength(120)])
            .field(
                "code",
                "Code",
                [
                    Rule::Required,
                    Rule::Pattern(&LINE_CODE, "Code must be 2-5 uppercase letters"),
                ],
            )
            .field("contactEmail", "Contact email", [Rule::Email])
    }
}

impl FormFields for UserInput {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "name" => Some(self.name.clone()),
            "email" => Some(self.email.clone()),
            "phone" => opt(self.phone.as_ref()),
            "password" => opt(self.password.as_ref()),
            _ => None,
        }
    }
}

impl Validate for UserInput {
    fn schema() -> Schema {
        Schema::new()
            .field("name", "Name", [Rule::Required, Rule::MinLength(2), Rule::MaxLength(80)])
            .field("email", "Email", [Rule::Required, Rule::Email])
            .field("phone", "Phone", [Rule::Pattern(&PHONE, "Invalid phone number")])
            .field("password", "Password", [Rule::MinLength(MIN_PASSWORD_LENGTH)])
    }
}

impl FormFields for ForgotPasswordRequest {
    fn field(&self, name: &str) -> Option<String> {
        (name == "email").then(|| self.email.clone())
    }
}

impl Validate for ForgotPasswordRequest {
    fn schema() -> Schema {
        Schema::new().field("email", "Email", [Rule::Required, Rule::Email])
    }
}

impl FormFields for EquipmentInput {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "name" => Some(self.name.clone()),
            "location" => opt(self.location.as_ref()),
            _ => None,
        }
    }
}

impl Validate for EquipmentInput {
    fn schema() -> Schema {
        Schema::new()
            .field("name", "Name", [Rule::Required, Rule::MaxLength(60)])
            .field("location", "Location", [Rule::MaxLength(60)])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::container::{ContainerSize, ContainerStatus, ContainerType};
    use crate::user::Role;
    use pretty_assertions::assert_eq;

    #[test]
    fn login_requires_both_fields() {
        let form = LoginRequest {
            email: String::new(),
            password: "  ".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));
    }

    #[test]
    fn login_rejects_malformed_email() {
        let form = LoginRequest {
            email: "ops@quay".to_string(),
            password: "secret".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some("Invalid email address"));
    }

    #[test]
    fn signup_checks_confirmation_and_length() {
        let form = SignupRequest {
            name: "Ana".to_string(),
            email: "ana@quay.io".to_string(),
            password: "short".to_string(),
            confirm_password: "shorter".to_string(),
            phone: None,
            company: None,
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(errors.get("confirmPassword"), Some("Passwords must match"));
    }

    #[test]
    fn optional_fields_only_checked_when_filled() {
        let mut form = SignupRequest {
            name: "Ana".to_string(),
            email: "ana@quay.io".to_string(),
            password: "longenough".to_string(),
            confirm_password: "longenough".to_string(),
            phone: None,
            company: None,
        };
        assert!(form.validate().is_ok());

        form.phone = Some("call me".to_string());
        assert_eq!(
            form.validate().unwrap_err().get("phone"),
            Some("Invalid phone number")
        );
    }

    #[test]
    fn container_number_follows_iso_6346() {
        let mut input = ContainerInput {
            container_number: "MSCU1234567".to_string(),
            size: ContainerSize::Twenty,
            container_type: ContainerType::Dry,
            status: ContainerStatus::InYard,
            shipping_line: None,
            yard_block: None,
            position: None,
            customer_id: None,
            weight_kg: Some(24_000),
            notes: None,
        };
        assert!(input.validate().is_ok());

        input.container_number = "MSC1234567".to_string();
        input.weight_kg = Some(90_000);
        let errors = input.validate().unwrap_err();
        assert!(errors.get("containerNumber").is_some());
        assert_eq!(errors.get("weightKg"), Some("Weight must be between 0 and 60000"));
    }

    #[test]
    fn yard_block_capacity_must_be_positive() {
        let input = YardBlockInput {
            name: "B2".to_string(),
            capacity: 0,
            location: None,
        };
        assert_eq!(
            input.validate().unwrap_err().get("capacity"),
            Some("Capacity must be between 1 and 10000")
        );
    }

    #[test]
    fn otp_must_be_six_digits() {
        let form = crate::auth::OtpRequest {
            email: "ana@quay.io".to_string(),
            otp: "12a456".to_string(),
        };
        assert_eq!(
            form.validate().unwrap_err().get("otp"),
            Some("OTP must be 6 digits")
        );
    }

    #[test]
    fn user_input_password_optional_on_update() {
        let input = UserInput {
            name: "Ravi".to_string(),
            email: "ravi@quay.io".to_string(),
            role: Role::Operator,
            phone: None,
            company: None,
            password: None,
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn display_lists_fields() {
        let mut errors = ValidationErrors::default();
        errors.add("email", "Email is required");
        errors.add("email", "ignored");
        assert_eq!(errors.to_string(), "validation failed: email: Email is required");
    }
}
