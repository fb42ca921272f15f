//! Command execution: slice action, service call, rendered result.

use anyhow::{Context as _, anyhow};
use quay_application::{ApiError, ResourceSlice};
use quay_domain::{
    AuditLogFilter, ContainerFilter, DashboardStats, ForgotPasswordRequest, GateOperationFilter,
    Loadable, LoginRequest, OAuthExchangeRequest, OtpRequest, PageRequest, ResetPasswordRequest,
    SignupRequest,
};
use quay_infrastructure::read_upload;
use tracing::info;

use crate::cli::{
    AuditCommand, Command, ContainerCommand, EquipmentCommand, GateCommand, OutputFormat,
    ProfileCommand, ShippingLineCommand, UserCommand, VehicleCommand, YardCommand,
};
use crate::context::Quay;
use crate::output::Printer;

/// Rows fetched per list when the dashboard is computed locally.
const DASHBOARD_PAGE_SIZE: u32 = 1000;

/// Runs one command and returns what to print.
///
/// A failed refresh ends the local session before the error is returned.
///
/// # Errors
/// Returns the service error, or a rendering error.
pub async fn run(quay: &mut Quay, command: Command, format: OutputFormat) -> anyhow::Result<String> {
    let printer = Printer::new(format, quay.clock().now());
    let result = execute(quay, command, printer).await;
    if let Err(error) = &result
        && let Some(api) = error.downcast_ref::<ApiError>()
    {
        quay.session.observe(api);
    }
    result
}

async fn execute(quay: &mut Quay, command: Command, printer: Printer) -> anyhow::Result<String> {
    match command {
        Command::Login { email, password } => {
            let auth = quay.auth();
            let request = LoginRequest { email, password };
            quay.session.sign_in(auth.login(&request)).await?;
            signed_in(quay, printer)
        }
        Command::Oauth {
            provider,
            code,
            redirect_uri,
        } => {
            let auth = quay.auth();
            let request = OAuthExchangeRequest {
                provider,
                code,
                redirect_uri,
            };
            quay.session.sign_in(auth.exchange_oauth_code(&request)).await?;
            signed_in(quay, printer)
        }
        Command::Signup(args) => {
            let request = SignupRequest {
                confirm_password: args.confirm.unwrap_or_else(|| args.password.clone()),
                name: args.name,
                email: args.email,
                password: args.password,
                phone: args.phone,
                company: args.company,
            };
            quay.auth().signup_initiate(&request).await?;
            Ok(printer.done("verification code sent; finish with `quay signup-complete`"))
        }
        Command::SignupComplete(args) => {
            let auth = quay.auth();
            let request = OtpRequest {
                email: args.email,
                otp: args.otp,
            };
            quay.session.sign_in(auth.signup_complete(&request)).await?;
            signed_in(quay, printer)
        }
        Command::VerifyOtp(args) => {
            let request = OtpRequest {
                email: args.email,
                otp: args.otp,
            };
            quay.auth().verify_otp(&request).await?;
            Ok(printer.done("code verified"))
        }
        Command::ForgotPassword { email } => {
            quay.auth()
                .forgot_password(&ForgotPasswordRequest { email })
                .await?;
            Ok(printer.done("if the address is registered, a reset link is on its way"))
        }
        Command::ResetPassword {
            token,
            password,
            confirm,
        } => {
            let request = ResetPasswordRequest {
                token,
                confirm_password: confirm.unwrap_or_else(|| password.clone()),
                new_password: password,
            };
            quay.auth().reset_password(&request).await?;
            Ok(printer.done("password changed; sign in again"))
        }
        Command::Refresh => {
            quay.auth().refresh().await?;
            Ok(printer.done("access token refreshed"))
        }
        Command::Logout => {
            let auth = quay.auth();
            quay.session.sign_out(auth.logout()).await?;
            Ok(printer.done("signed out"))
        }
        Command::Whoami => match quay.session.user() {
            Some(user) => printer.one(user),
            None if quay.session.is_authenticated() => Ok(printer.done("signed in")),
            None => Ok(printer.done("not signed in")),
        },
        Command::Route { path } => {
            let decision = quay.session.guard(quay.router(), &path);
            printer.one(&decision)
        }
        Command::Dashboard { local } => dashboard(quay, local, printer).await,
        Command::Containers(command) => containers(quay, command, printer).await,
        Command::Gate(command) => gate(quay, command, printer).await,
        Command::Vehicles(command) => vehicles(quay, command, printer).await,
        Command::Equipment(command) => equipment(quay, command, printer).await,
        Command::Yard(command) => yard(quay, command, printer).await,
        Command::Lines(command) => shipping_lines(quay, command, printer).await,
        Command::Profile(command) => profile(quay, command, printer).await,
        Command::Users(command) => users(quay, command, printer).await,
        Command::Audit(command) => audit(quay, command, printer).await,
    }
}

fn signed_in(quay: &Quay, printer: Printer) -> anyhow::Result<String> {
    let user = quay.session.user().context("server returned no user")?;
    info!(user = %user.email, role = %user.role, "signed in");
    printer.one(user)
}

fn loaded<T>(state: &Loadable<T>) -> anyhow::Result<&T> {
    state.data().ok_or_else(|| anyhow!("nothing loaded"))
}

async fn dashboard(quay: &Quay, local: bool, printer: Printer) -> anyhow::Result<String> {
    if !local {
        let stats = quay.admin().dashboard_stats().await?;
        return printer.one(&stats);
    }

    let all = PageRequest::new(1, DASHBOARD_PAGE_SIZE);
    let since = Some(quay.clock().today());
    let gate_filter = GateOperationFilter {
        from: since,
        ..GateOperationFilter::default()
    };
    let container_filter = ContainerFilter::default();
    let (container_service, gate_service, yard_service) = (quay.containers(), quay.gate(), quay.yard());
    let (containers, operations, blocks) = tokio::try_join!(
        container_service.list(&container_filter, all),
        gate_service.list(&gate_filter, all),
        yard_service.list(all),
    )?;

    let stats = DashboardStats::compute(&containers.items, &operations.items, &blocks.items, since);
    printer.one(&stats)
}

async fn containers(quay: &Quay, command: ContainerCommand, printer: Printer) -> anyhow::Result<String> {
    let service = quay.containers();
    let mut slice = ResourceSlice::new();
    match command {
        ContainerCommand::List { filter, page } => {
            slice
                .load_list(service.list(&filter.into(), page.into()))
                .await?;
            printer.page(loaded(&slice.items)?)
        }
        ContainerCommand::Get { id } => {
            slice.load_one(service.get(&id)).await?;
            printer.one(loaded(&slice.selected)?)
        }
        ContainerCommand::Search { number } => {
            slice.load_one(service.search(&number)).await?;
            printer.one(loaded(&slice.selected)?)
        }
        ContainerCommand::Create(args) => {
            let container = slice.save(service.create(&args.into())).await?;
            info!(container = %container.container_number, "container registered");
            printer.one(&container)
        }
        ContainerCommand::Update { id, input } => {
            let container = slice.save(service.update(&id, &input.into())).await?;
            printer.one(&container)
        }
        ContainerCommand::Delete { id } => {
            slice.delete(&id, service.delete(&id)).await?;
            Ok(printer.done(&format!("container {id} deleted")))
        }
    }
}

async fn gate(quay: &Quay, command: GateCommand, printer: Printer) -> anyhow::Result<String> {
    let service = quay.gate();
    let mut slice = ResourceSlice::new();
    match command {
        GateCommand::List {
            operation_type,
            status,
            search,
            today,
            page,
        } => {
            let since = today.then(|| quay.clock().today());
            let filter = GateCommand::filter(operation_type, status, search, since);
            slice.load_list(service.list(&filter, page.into())).await?;
            printer.page(loaded(&slice.items)?)
        }
        GateCommand::Get { id } => {
            slice.load_one(service.get(&id)).await?;
            printer.one(loaded(&slice.selected)?)
        }
        GateCommand::In(args) => {
            let operation = slice.save(service.gate_in(&args.into())).await?;
            printer.one(&operation)
        }
        GateCommand::Out(args) => {
            let operation = slice.save(service.gate_out(&args.into())).await?;
            printer.one(&operation)
        }
        GateCommand::Update { id, input } => {
            let operation = slice.save(service.update(&id, &input.into())).await?;
            printer.one(&operation)
        }
        GateCommand::Cancel { id } => {
            let operation = slice.save(service.cancel(&id)).await?;
            printer.one(&operation)
        }
    }
}

async fn vehicles(quay: &Quay, command: VehicleCommand, printer: Printer) -> anyhow::Result<String> {
    let service = quay.vehicles();
    let mut slice = ResourceSlice::new();
    match command {
        VehicleCommand::List {
            search,
            vehicle_type,
            blacklisted,
            page,
        } => {
            let filter = VehicleCommand::filter(search, vehicle_type, blacklisted);
            slice.load_list(service.list(&filter, page.into())).await?;
            printer.page(loaded(&slice.items)?)
        }
        VehicleCommand::Get { id } => {
            slice.load_one(service.get(&id)).await?;
            printer.one(loaded(&slice.selected)?)
        }
        VehicleCommand::Create(args) => printer.one(&slice.save(service.create(&args.into())).await?),
        VehicleCommand::Update { id, input } => {
            printer.one(&slice.save(service.update(&id, &input.into())).await?)
        }
        VehicleCommand::Delete { id } => {
            slice.delete(&id, service.delete(&id)).await?;
            Ok(printer.done(&format!("vehicle {id} deleted")))
        }
        VehicleCommand::Blacklist { id, reason } => {
            let vehicle = slice.save(service.set_blacklisted(&id, true, reason)).await?;
            info!(vehicle = %vehicle.vehicle_number, "vehicle blacklisted");
            printer.one(&vehicle)
        }
        VehicleCommand::Clear { id } => {
            printer.one(&slice.save(service.set_blacklisted(&id, false, None)).await?)
        }
    }
}

async fn equipment(quay: &Quay, command: EquipmentCommand, printer: Printer) -> anyhow::Result<String> {
    let service = quay.equipment();
    let mut slice = ResourceSlice::new();
    match command {
        EquipmentCommand::List { page } => {
            slice.load_list(service.list(page.into())).await?;
            printer.page(loaded(&slice.items)?)
        }
        EquipmentCommand::Get { id } => {
            slice.load_one(service.get(&id)).await?;
            printer.one(loaded(&slice.selected)?)
        }
        EquipmentCommand::Create(args) => printer.one(&slice.save(service.create(&args.into())).await?),
        EquipmentCommand::Update { id, input } => {
            printer.one(&slice.save(service.update(&id, &input.into())).await?)
        }
        EquipmentCommand::Delete { id } => {
            slice.delete(&id, service.delete(&id)).await?;
            Ok(printer.done(&format!("equipment {id} deleted")))
        }
        EquipmentCommand::Status { id, status } => {
            printer.one(&slice.save(service.set_status(&id, status)).await?)
        }
    }
}

async fn yard(quay: &Quay, command: YardCommand, printer: Printer) -> anyhow::Result<String> {
    let service = quay.yard();
    let mut slice = ResourceSlice::new();
    match command {
        YardCommand::List { page } => {
            slice.load_list(service.list(page.into())).await?;
            printer.page(loaded(&slice.items)?)
        }
        YardCommand::Get { id } => {
            slice.load_one(service.get(&id)).await?;
            printer.one(loaded(&slice.selected)?)
        }
        YardCommand::Create(args) => printer.one(&slice.save(service.create(&args.into())).await?),
        YardCommand::Update { id, input } => {
            printer.one(&slice.save(service.update(&id, &input.into())).await?)
        }
        YardCommand::Delete { id } => {
            slice.delete(&id, service.delete(&id)).await?;
            Ok(printer.done(&format!("yard block {id} deleted")))
        }
        YardCommand::Containers { id, filter, page } => {
            let mut stacked = ResourceSlice::new();
            stacked
                .load_list(service.containers_in_block(&id, &filter.into(), page.into()))
                .await?;
            printer.page(loaded(&stacked.items)?)
        }
    }
}

async fn shipping_lines(
    quay: &Quay,
    command: ShippingLineCommand,
    printer: Printer,
) -> anyhow::Result<String> {
    let service = quay.shipping_lines();
    let mut slice = ResourceSlice::new();
    match command {
        ShippingLineCommand::List { page } => {
            slice.load_list(service.list(page.into())).await?;
            printer.page(loaded(&slice.items)?)
        }
        ShippingLineCommand::Get { id } => {
            slice.load_one(service.get(&id)).await?;
            printer.one(loaded(&slice.selected)?)
        }
        ShippingLineCommand::Create(args) => {
            printer.one(&slice.save(service.create(&args.into())).await?)
        }
        ShippingLineCommand::Update { id, input } => {
            printer.one(&slice.save(service.update(&id, &input.into())).await?)
        }
        ShippingLineCommand::Delete { id } => {
            slice.delete(&id, service.delete(&id)).await?;
            Ok(printer.done(&format!("shipping line {id} deleted")))
        }
    }
}

async fn profile(quay: &mut Quay, command: ProfileCommand, printer: Printer) -> anyhow::Result<String> {
    let service = quay.profile();
    let user = match command {
        ProfileCommand::Show => service.get().await?,
        ProfileCommand::Update {
            name,
            phone,
            company,
        } => service.update(&ProfileCommand::update(name, phone, company)).await?,
        ProfileCommand::Password {
            current,
            new,
            confirm,
        } => {
            service
                .change_password(&ProfileCommand::password(current, new, confirm))
                .await?;
            return Ok(printer.done("password changed"));
        }
        ProfileCommand::Image { path } => {
            let file = read_upload(&path).await?;
            service.upload_image(&file.file_name, file.mime, file.bytes).await?
        }
    };
    quay.session.session.user = Some(user.clone());
    printer.one(&user)
}

async fn users(quay: &Quay, command: UserCommand, printer: Printer) -> anyhow::Result<String> {
    let service = quay.admin();
    let mut slice = ResourceSlice::new();
    match command {
        UserCommand::List {
            search,
            role,
            blocked,
            page,
        } => {
            let filter = UserCommand::filter(search, role, blocked);
            slice.load_list(service.list_users(&filter, page.into())).await?;
            printer.page(loaded(&slice.items)?)
        }
        UserCommand::Get { id } => {
            slice.load_one(service.get_user(&id)).await?;
            printer.one(loaded(&slice.selected)?)
        }
        UserCommand::Create(args) => {
            let user = slice.save(service.create_user(&args.into())).await?;
            info!(user = %user.email, role = %user.role, "user created");
            printer.one(&user)
        }
        UserCommand::Update { id, input } => {
            printer.one(&slice.save(service.update_user(&id, &input.into())).await?)
        }
        UserCommand::Delete { id } => {
            slice.delete(&id, service.delete_user(&id)).await?;
            Ok(printer.done(&format!("user {id} deleted")))
        }
        UserCommand::Block { id } => printer.one(&slice.save(service.set_blocked(&id, true)).await?),
        UserCommand::Unblock { id } => {
            printer.one(&slice.save(service.set_blocked(&id, false)).await?)
        }
    }
}

async fn audit(quay: &Quay, command: AuditCommand, printer: Printer) -> anyhow::Result<String> {
    let service = quay.audit();
    let mut slice = ResourceSlice::new();
    match command {
        AuditCommand::List {
            user,
            action,
            entity,
            page,
        } => {
            let filter = AuditLogFilter {
                user_id: user,
                action,
                entity,
                from: None,
                to: None,
            };
            slice.load_list(service.list(&filter, page.into())).await?;
            printer.page(loaded(&slice.items)?)
        }
        AuditCommand::Get { id } => {
            slice.load_one(service.get(&id)).await?;
            printer.one(loaded(&slice.selected)?)
        }
    }
}
