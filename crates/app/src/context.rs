//! Wiring of ports, client, services and session state.

use std::sync::Arc;

use quay_application::{
    AdminService, ApiClient, ApiResult, AuditLogService, AuthService, Clock,
    ContainerService, CredentialStore, EquipmentService, GateOperationService, ProfileService,
    SessionSlice, ShippingLineService, Transport, VehicleService, YardService,
};
use quay_domain::Router;
use quay_infrastructure::{ClientConfig, FileCredentialStore, ReqwestTransport, SystemClock};
use tracing::debug;

/// Everything a command needs: the shared client, the clock, the route table
/// and the session restored from the credential store.
pub struct Quay {
    client: Arc<ApiClient>,
    clock: Arc<dyn Clock>,
    router: Router,
    /// Session state, updated by sign-in, sign-out and expired refreshes.
    pub session: SessionSlice,
}

impl Quay {
    /// Builds the production stack from `config`: reqwest transport, session
    /// file and system clock.
    ///
    /// # Errors
    /// Fails if the HTTP client cannot be built or the session file is
    /// unreadable.
    pub async fn connect(config: &ClientConfig) -> anyhow::Result<Self> {
        let transport = ReqwestTransport::new(config)?;
        let credentials = FileCredentialStore::new(config.session_path.clone());
        debug!(session_file = %config.session_path.display(), "using session file");
        Ok(Self::with_ports(Arc::new(transport), Arc::new(credentials), Arc::new(SystemClock)).await?)
    }

    /// Builds the stack over arbitrary ports.
    ///
    /// # Errors
    /// Fails if the stored session cannot be loaded.
    pub async fn with_ports(
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialStore>,
        clock: Arc<dyn Clock>,
    ) -> ApiResult<Self> {
        let client = Arc::new(ApiClient::new(transport, credentials));
        let session = client.restore().await?;
        Ok(Self {
            client,
            clock,
            router: Router::terminal(),
            session: SessionSlice::new(session),
        })
    }

    /// The shared client.
    #[must_use]
    pub const fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// The clock.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// The route table.
    #[must_use]
    pub const fn router(&self) -> &Router {
        &self.router
    }

    /// Authentication endpoints.
    #[must_use]
    pub fn auth(&self) -> AuthService {
        AuthService::new(Arc::clone(&self.client))
    }

    /// Containers.
    #[must_use]
    pub fn containers(&self) -> ContainerService {
        ContainerService::new(Arc::clone(&self.client))
    }

    /// Gate operations.
    #[must_use]
    pub fn gate(&self) -> GateOperationService {
        GateOperationService::new(Arc::clone(&self.client))
    }

    /// Vehicle registry.
    #[must_use]
    pub fn vehicles(&self) -> VehicleService {
        VehicleService::new(Arc::clone(&self.client))
    }

    /// Equipment registry.
    #[must_use]
    pub fn equipment(&self) -> EquipmentService {
        EquipmentService::new(Arc::clone(&self.client))
    }

    /// Yard blocks.
    #[must_use]
    pub fn yard(&self) -> YardService {
        YardService::new(Arc::clone(&self.client))
    }

    /// Shipping lines.
    #[must_use]
    pub fn shipping_lines(&self) -> ShippingLineService {
        ShippingLineService::new(Arc::clone(&self.client))
    }

    /// Own profile.
    #[must_use]
    pub fn profile(&self) -> ProfileService {
        ProfileService::new(Arc::clone(&self.client))
    }

    /// User administration and dashboard stats.
    #[must_use]
    pub fn admin(&self) -> AdminService {
        AdminService::new(Arc::clone(&self.client))
    }

    /// Audit trail.
    #[must_use]
    pub fn audit(&self) -> AuditLogService {
        AuditLogService::new(Arc::clone(&self.client))
    }
}
