//! Quay Application - Services and ports
//!
//! This crate sits between the domain model and the outside world:
//! - the authenticated request dispatcher with single-flight token refresh
//! - one service per REST resource
//! - the state slices the CLI renders from
//! - the ports (transport, credential store, clock) that infrastructure implements

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod ports;
pub mod services;
pub mod store;

#[cfg(test)]
mod testing;

pub use auth::{MemoryCredentialStore, RefreshCoordinator};
pub use client::{ApiClient, RequestContext, decode};
pub use error::{ApiError, ApiResult, fallback_message};
pub use ports::{Clock, CredentialStore, CredentialStoreError, Transport, TransportError, TransportFuture};
pub use services::{
    AdminService, AuditLogService, AuthService, ContainerService, EquipmentService,
    GateOperationService, ProfileService, ShippingLineService, VehicleService, YardService,
};
pub use store::{Identified, ResourceSlice, SessionSlice};
