//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use quay_domain::{
    ChangePasswordRequest, ContainerFilter, ContainerInput, ContainerSize, ContainerStatus,
    ContainerType, EquipmentInput, EquipmentStatus, EquipmentType, GateOperationFilter,
    GateOperationInput, GateOperationType, GateStatus, PageRequest, ProfileUpdate, Role,
    ShippingLineInput, UserFilter, UserInput, VehicleFilter, VehicleInput, VehicleType,
    YardBlockInput,
};

/// Top-level arguments.
#[derive(Debug, Parser)]
#[command(name = "quay", version, about = "Container-terminal API client")]
#[command(
    after_help = "Environment:\n  QUAY_API_URL        API base URL\n  QUAY_TIMEOUT_SECS   Request timeout\n  QUAY_SESSION_FILE   Session file location\n  QUAY_LOG_FORMAT     `json` for structured logs\n  RUST_LOG            Log filter"
)]
pub struct Cli {
    /// Overrides `QUAY_API_URL`.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per record.
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Subcommands, one per service plus session helpers.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with e-mail and password.
    Login {
        /// Account e-mail.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long, env = "QUAY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Exchange an OAuth authorization code for a session.
    Oauth {
        /// Identity provider, e.g. `google`.
        #[arg(long)]
        provider: String,
        /// Authorization code from the callback.
        #[arg(long)]
        code: String,
        /// Redirect URI used in the authorization request.
        #[arg(long)]
        redirect_uri: String,
    },
    /// Start a self-service signup; an OTP is mailed.
    Signup(SignupArgs),
    /// Finish a signup with the mailed OTP.
    SignupComplete(OtpArgs),
    /// Verify an OTP without signing in.
    VerifyOtp(OtpArgs),
    /// Request a password-reset mail.
    ForgotPassword {
        /// Account e-mail.
        #[arg(long)]
        email: String,
    },
    /// Set a new password using a reset token.
    ResetPassword {
        /// Token from the reset mail.
        #[arg(long)]
        token: String,
        /// New password.
        #[arg(long, env = "QUAY_NEW_PASSWORD", hide_env_values = true)]
        password: String,
        /// Confirmation; defaults to `--password`.
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Force a token refresh.
    Refresh,
    /// Sign out and forget the stored session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Decide what the route guard does for a UI path.
    Route {
        /// Path such as `/operator/gate-in`.
        path: String,
    },
    /// Headline numbers.
    Dashboard {
        /// Compute from lists instead of the admin stats endpoint.
        #[arg(long)]
        local: bool,
    },
    /// Containers.
    #[command(subcommand)]
    Containers(ContainerCommand),
    /// Gate-in and gate-out operations.
    #[command(subcommand)]
    Gate(GateCommand),
    /// Vehicle registry.
    #[command(subcommand)]
    Vehicles(VehicleCommand),
    /// Equipment registry.
    #[command(subcommand)]
    Equipment(EquipmentCommand),
    /// Yard blocks.
    #[command(subcommand)]
    Yard(YardCommand),
    /// Shipping lines.
    #[command(subcommand)]
    Lines(ShippingLineCommand),
    /// Your own profile.
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// User administration.
    #[command(subcommand)]
    Users(UserCommand),
    /// Audit trail.
    #[command(subcommand)]
    Audit(AuditCommand),
}

/// Page selection shared by list commands.
#[derive(Debug, Clone, Copy, Args)]
pub struct PageArgs {
    /// Page number, starting at 1.
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Rows per page.
    #[arg(long, default_value_t = 20)]
    pub page_size: u32,
}

impl From<PageArgs> for PageRequest {
    fn from(args: PageArgs) -> Self {
        Self::new(args.page, args.page_size)
    }
}

/// Signup form.
#[derive(Debug, Args)]
pub struct SignupArgs {
    /// Full name.
    #[arg(long)]
    pub name: String,
    /// E-mail.
    #[arg(long)]
    pub email: String,
    /// Password.
    #[arg(long, env = "QUAY_PASSWORD", hide_env_values = true)]
    pub password: String,
    /// Confirmation; defaults to `--password`.
    #[arg(long)]
    pub confirm: Option<String>,
    /// Phone.
    #[arg(long)]
    pub phone: Option<String>,
    /// Company.
    #[arg(long)]
    pub company: Option<String>,
}

/// E-mail plus one-time code.
#[derive(Debug, Args)]
pub struct OtpArgs {
    /// E-mail.
    #[arg(long)]
    pub email: String,
    /// One-time code.
    #[arg(long)]
    pub otp: String,
}

/// Container subcommands.
#[derive(Debug, Subcommand)]
pub enum ContainerCommand {
    /// List containers.
    List {
        #[command(flatten)]
        filter: ContainerFilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one container.
    Get {
        /// Container id.
        id: String,
    },
    /// Look a container up by its number.
    Search {
        /// Container number.
        number: String,
    },
    /// Register a container.
    Create(ContainerArgs),
    /// Replace a container's fields.
    Update {
        /// Container id.
        id: String,
        #[command(flatten)]
        input: ContainerArgs,
    },
    /// Delete a container.
    Delete {
        /// Container id.
        id: String,
    },
}

/// Container list filters.
#[derive(Debug, Clone, Default, Args)]
pub struct ContainerFilterArgs {
    /// Free-text search on number, line or block.
    #[arg(long)]
    pub search: Option<String>,
    /// Status, e.g. `in-yard`.
    #[arg(long)]
    pub status: Option<ContainerStatus>,
    /// Type, e.g. `reefer`.
    #[arg(long = "type")]
    pub container_type: Option<ContainerType>,
    /// Shipping line.
    #[arg(long)]
    pub line: Option<String>,
    /// Yard block.
    #[arg(long)]
    pub block: Option<String>,
    /// Owning customer.
    #[arg(long)]
    pub customer: Option<String>,
}

impl From<ContainerFilterArgs> for ContainerFilter {
    fn from(args: ContainerFilterArgs) -> Self {
        Self {
            search: args.search,
            status: args.status,
            container_type: args.container_type,
            shipping_line: args.line,
            yard_block: args.block,
            customer_id: args.customer,
        }
    }
}

/// Container form.
#[derive(Debug, Args)]
pub struct ContainerArgs {
    /// ISO 6346 number.
    #[arg(long)]
    pub number: String,
    /// Size: 20ft, 40ft or 45ft.
    #[arg(long, default_value = "20FT")]
    pub size: ContainerSize,
    /// Type.
    #[arg(long = "type", default_value = "DRY")]
    pub container_type: ContainerType,
    /// Status.
    #[arg(long, default_value = "IN_YARD")]
    pub status: ContainerStatus,
    /// Shipping line.
    #[arg(long)]
    pub line: Option<String>,
    /// Yard block.
    #[arg(long)]
    pub block: Option<String>,
    /// Stack position.
    #[arg(long)]
    pub position: Option<String>,
    /// Owning customer.
    #[arg(long)]
    pub customer: Option<String>,
    /// Gross weight in kg.
    #[arg(long)]
    pub weight: Option<u32>,
    /// Notes.
    #[arg(long)]
    pub notes: Option<String>,
}

impl From<ContainerArgs> for ContainerInput {
    fn from(args: ContainerArgs) -> Self {
        Self {
            container_number: args.number,
            size: args.size,
            container_type: args.container_type,
            status: args.status,
            shipping_line: args.line,
            yard_block: args.block,
            position: args.position,
            customer_id: args.customer,
            weight_kg: args.weight,
            notes: args.notes,
        }
    }
}

/// Gate subcommands.
#[derive(Debug, Subcommand)]
pub enum GateCommand {
    /// List gate operations.
    List {
        /// `gate-in` or `gate-out`.
        #[arg(long = "type")]
        operation_type: Option<GateOperationType>,
        /// Status.
        #[arg(long)]
        status: Option<GateStatus>,
        /// Free-text search.
        #[arg(long)]
        search: Option<String>,
        /// Only operations since midnight UTC.
        #[arg(long)]
        today: bool,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one operation.
    Get {
        /// Operation id.
        id: String,
    },
    /// Record a container entering the terminal.
    In(GateArgs),
    /// Record a container leaving the terminal.
    Out(GateArgs),
    /// Correct a recorded operation.
    Update {
        /// Operation id.
        id: String,
        #[command(flatten)]
        input: GateArgs,
    },
    /// Cancel a pending operation.
    Cancel {
        /// Operation id.
        id: String,
    },
}

impl GateCommand {
    /// Filter for [`GateCommand::List`]; `since` is the start of today.
    #[must_use]
    pub fn filter(
        operation_type: Option<GateOperationType>,
        status: Option<GateStatus>,
        search: Option<String>,
        since: Option<chrono::DateTime<chrono::Utc>>,
    ) -> GateOperationFilter {
        GateOperationFilter {
            operation_type,
            status,
            search,
            from: since,
            to: None,
        }
    }
}

/// Gate form.
#[derive(Debug, Args)]
pub struct GateArgs {
    /// Container number.
    #[arg(long)]
    pub container: String,
    /// Truck registration.
    #[arg(long)]
    pub vehicle: String,
    /// Driver.
    #[arg(long)]
    pub driver: Option<String>,
    /// Seal number.
    #[arg(long)]
    pub seal: Option<String>,
    /// Target yard block.
    #[arg(long)]
    pub block: Option<String>,
    /// Remarks.
    #[arg(long)]
    pub remarks: Option<String>,
}

impl From<GateArgs> for GateOperationInput {
    fn from(args: GateArgs) -> Self {
        Self {
            container_number: args.container,
            vehicle_number: args.vehicle,
            driver_name: args.driver,
            seal_number: args.seal,
            yard_block: args.block,
            remarks: args.remarks,
        }
    }
}

/// Vehicle subcommands.
#[derive(Debug, Subcommand)]
pub enum VehicleCommand {
    /// List vehicles.
    List {
        /// Free-text search.
        #[arg(long)]
        search: Option<String>,
        /// Type.
        #[arg(long = "type")]
        vehicle_type: Option<VehicleType>,
        /// Only blacklisted (`true`) or only cleared (`false`).
        #[arg(long)]
        blacklisted: Option<bool>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one vehicle.
    Get {
        /// Vehicle id.
        id: String,
    },
    /// Register a vehicle.
    Create(VehicleArgs),
    /// Replace a vehicle's fields.
    Update {
        /// Vehicle id.
        id: String,
        #[command(flatten)]
        input: VehicleArgs,
    },
    /// Delete a vehicle.
    Delete {
        /// Vehicle id.
        id: String,
    },
    /// Bar a vehicle from the gate.
    Blacklist {
        /// Vehicle id.
        id: String,
        /// Reason shown to gate operators.
        #[arg(long)]
        reason: Option<String>,
    },
    /// Lift a blacklist entry.
    Clear {
        /// Vehicle id.
        id: String,
    },
}

impl VehicleCommand {
    /// Filter for [`VehicleCommand::List`].
    #[must_use]
    pub const fn filter(
        search: Option<String>,
        vehicle_type: Option<VehicleType>,
        blacklisted: Option<bool>,
    ) -> VehicleFilter {
        VehicleFilter {
            search,
            vehicle_type,
            blacklisted,
        }
    }
}

/// Vehicle form.
#[derive(Debug, Args)]
pub struct VehicleArgs {
    /// Registration number.
    #[arg(long)]
    pub number: String,
    /// Type.
    #[arg(long = "type", default_value = "TRUCK")]
    pub vehicle_type: VehicleType,
    /// Owner.
    #[arg(long)]
    pub owner: Option<String>,
    /// Regular driver.
    #[arg(long)]
    pub driver: Option<String>,
    /// Contact phone.
    #[arg(long)]
    pub phone: Option<String>,
}

impl From<VehicleArgs> for VehicleInput {
    fn from(args: VehicleArgs) -> Self {
        Self {
            vehicle_number: args.number,
            vehicle_type: args.vehicle_type,
            owner_name: args.owner,
            driver_name: args.driver,
            phone: args.phone,
        }
    }
}

/// Equipment subcommands.
#[derive(Debug, Subcommand)]
pub enum EquipmentCommand {
    /// List equipment.
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one item.
    Get {
        /// Equipment id.
        id: String,
    },
    /// Register equipment.
    Create(EquipmentArgs),
    /// Replace an item's fields.
    Update {
        /// Equipment id.
        id: String,
        #[command(flatten)]
        input: EquipmentArgs,
    },
    /// Delete an item.
    Delete {
        /// Equipment id.
        id: String,
    },
    /// Change only the status.
    Status {
        /// Equipment id.
        id: String,
        /// New status, e.g. `maintenance`.
        status: EquipmentStatus,
    },
}

/// Equipment form.
#[derive(Debug, Args)]
pub struct EquipmentArgs {
    /// Name or fleet number.
    #[arg(long)]
    pub name: String,
    /// Type.
    #[arg(long = "type")]
    pub equipment_type: EquipmentType,
    /// Status.
    #[arg(long, default_value = "AVAILABLE")]
    pub status: EquipmentStatus,
    /// Current location.
    #[arg(long)]
    pub location: Option<String>,
}

impl From<EquipmentArgs> for EquipmentInput {
    fn from(args: EquipmentArgs) -> Self {
        Self {
            name: args.name,
            equipment_type: args.equipment_type,
            status: args.status,
            location: args.location,
        }
    }
}

/// Yard subcommands.
#[derive(Debug, Subcommand)]
pub enum YardCommand {
    /// List yard blocks.
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one block.
    Get {
        /// Block id.
        id: String,
    },
    /// Create a block.
    Create(YardArgs),
    /// Replace a block's fields.
    Update {
        /// Block id.
        id: String,
        #[command(flatten)]
        input: YardArgs,
    },
    /// Delete a block.
    Delete {
        /// Block id.
        id: String,
    },
    /// List the containers stacked in a block.
    Containers {
        /// Block id.
        id: String,
        #[command(flatten)]
        filter: ContainerFilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
}

/// Yard block form.
#[derive(Debug, Args)]
pub struct YardArgs {
    /// Block name.
    #[arg(long)]
    pub name: String,
    /// Capacity in TEU slots.
    #[arg(long)]
    pub capacity: u32,
    /// Location description.
    #[arg(long)]
    pub location: Option<String>,
}

impl From<YardArgs> for YardBlockInput {
    fn from(args: YardArgs) -> Self {
        Self {
            name: args.name,
            capacity: args.capacity,
            location: args.location,
        }
    }
}

/// Shipping line subcommands.
#[derive(Debug, Subcommand)]
pub enum ShippingLineCommand {
    /// List shipping lines.
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one line.
    Get {
        /// Line id.
        id: String,
    },
    /// Register a line.
    Create(ShippingLineArgs),
    /// Replace a line's fields.
    Update {
        /// Line id.
        id: String,
        #[command(flatten)]
        input: ShippingLineArgs,
    },
    /// Delete a line.
    Delete {
        /// Line id.
        id: String,
    },
}

/// Shipping line form.
#[derive(Debug, Args)]
pub struct ShippingLineArgs {
    /// Full name.
    #[arg(long)]
    pub name: String,
    /// Short code, e.g. `MSC`.
    #[arg(long)]
    pub code: String,
    /// Contact e-mail.
    #[arg(long)]
    pub email: Option<String>,
    /// Mark the line inactive.
    #[arg(long)]
    pub inactive: bool,
}

impl From<ShippingLineArgs> for ShippingLineInput {
    fn from(args: ShippingLineArgs) -> Self {
        Self {
            name: args.name,
            code: args.code,
            contact_email: args.email,
            active: !args.inactive,
        }
    }
}

/// Profile subcommands.
#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show your profile.
    Show,
    /// Change name, phone or company.
    Update {
        /// Display name.
        #[arg(long)]
        name: Option<String>,
        /// Phone.
        #[arg(long)]
        phone: Option<String>,
        /// Company.
        #[arg(long)]
        company: Option<String>,
    },
    /// Change your password.
    Password {
        /// Current password.
        #[arg(long, env = "QUAY_PASSWORD", hide_env_values = true)]
        current: String,
        /// New password.
        #[arg(long, env = "QUAY_NEW_PASSWORD", hide_env_values = true)]
        new: String,
        /// Confirmation; defaults to `--new`.
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Upload a profile picture.
    Image {
        /// Image file.
        path: PathBuf,
    },
}

impl ProfileCommand {
    /// Profile fields for [`ProfileCommand::Update`].
    #[must_use]
    pub const fn update(
        name: Option<String>,
        phone: Option<String>,
        company: Option<String>,
    ) -> ProfileUpdate {
        ProfileUpdate {
            name,
            phone,
            company,
        }
    }

    /// Password change for [`ProfileCommand::Password`].
    #[must_use]
    pub fn password(current: String, new: String, confirm: Option<String>) -> ChangePasswordRequest {
        ChangePasswordRequest {
            current_password: current,
            confirm_password: confirm.unwrap_or_else(|| new.clone()),
            new_password: new,
        }
    }
}

/// User administration subcommands.
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List users.
    List {
        /// Free-text search on name or e-mail.
        #[arg(long)]
        search: Option<String>,
        /// Role.
        #[arg(long)]
        role: Option<Role>,
        /// Only blocked (`true`) or only active (`false`).
        #[arg(long)]
        blocked: Option<bool>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one user.
    Get {
        /// User id.
        id: String,
    },
    /// Create an account.
    Create(UserArgs),
    /// Replace an account's fields.
    Update {
        /// User id.
        id: String,
        #[command(flatten)]
        input: UserArgs,
    },
    /// Delete an account.
    Delete {
        /// User id.
        id: String,
    },
    /// Block an account from signing in.
    Block {
        /// User id.
        id: String,
    },
    /// Lift a block.
    Unblock {
        /// User id.
        id: String,
    },
}

impl UserCommand {
    /// Filter for [`UserCommand::List`].
    #[must_use]
    pub const fn filter(search: Option<String>, role: Option<Role>, blocked: Option<bool>) -> UserFilter {
        UserFilter {
            search,
            role,
            blocked,
        }
    }
}

/// User form.
#[derive(Debug, Args)]
pub struct UserArgs {
    /// Full name.
    #[arg(long)]
    pub name: String,
    /// E-mail.
    #[arg(long)]
    pub email: String,
    /// Role.
    #[arg(long, default_value = "operator")]
    pub role: Role,
    /// Phone.
    #[arg(long)]
    pub phone: Option<String>,
    /// Company.
    #[arg(long)]
    pub company: Option<String>,
    /// Initial password; required on create.
    #[arg(long)]
    pub password: Option<String>,
}

impl From<UserArgs> for UserInput {
    fn from(args: UserArgs) -> Self {
        Self {
            name: args.name,
            email: args.email,
            role: args.role,
            phone: args.phone,
            company: args.company,
            password: args.password,
        }
    }
}

/// Audit log subcommands.
#[derive(Debug, Subcommand)]
pub enum AuditCommand {
    /// List audit entries.
    List {
        /// Acting user id.
        #[arg(long)]
        user: Option<String>,
        /// Action, e.g. `LOGIN`.
        #[arg(long)]
        action: Option<String>,
        /// Entity kind, e.g. `container`.
        #[arg(long)]
        entity: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one entry.
    Get {
        /// Entry id.
        id: String,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_container_filters() {
        let cli = Cli::try_parse_from([
            "quay", "containers", "list", "--status", "in-yard", "--type", "reefer", "--page", "2",
        ])
        .unwrap();
        let Command::Containers(ContainerCommand::List { filter, page }) = cli.command else {
            panic!("wrong command");
        };
        let filter = ContainerFilter::from(filter);
        assert_eq!(filter.status, Some(ContainerStatus::InYard));
        assert_eq!(filter.container_type, Some(ContainerType::Reefer));
        assert_eq!(PageRequest::from(page), PageRequest::new(2, 20));
    }

    #[test]
    fn container_form_defaults() {
        let cli = Cli::try_parse_from(["quay", "containers", "create", "--number", "MSCU1234567"])
            .unwrap();
        let Command::Containers(ContainerCommand::Create(args)) = cli.command else {
            panic!("wrong command");
        };
        let input = ContainerInput::from(args);
        assert_eq!(input.size, ContainerSize::Twenty);
        assert_eq!(input.container_type, ContainerType::Dry);
        assert_eq!(input.status, ContainerStatus::InYard);
    }

    #[test]
    fn rejects_unknown_status() {
        let result = Cli::try_parse_from(["quay", "containers", "list", "--status", "lost"]);
        assert!(result.is_err());
    }

    #[test]
    fn json_output_is_global() {
        let cli = Cli::try_parse_from(["quay", "whoami", "--output", "json"]).unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
    }

    #[test]
    fn password_confirmation_defaults_to_new() {
        let request = ProfileCommand::password("old".into(), "n3w-Secret".into(), None);
        assert_eq!(request.confirm_password, "n3w-Secret");
    }
}
