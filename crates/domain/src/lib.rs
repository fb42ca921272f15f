//! Quay Domain - Core business types
//!
//! This crate defines the domain model for the container-terminal client:
//! entities exchanged with the REST API, filters, pagination, the load-state
//! machine, form validation schemas and the route guard.
//! All types here are pure Rust with no I/O dependencies.

mod macros;

pub mod audit;
pub mod auth;
pub mod container;
pub mod dashboard;
pub mod equipment;
pub mod error;
pub mod gate;
pub mod pagination;
pub mod profile;
pub mod request;
pub mod response;
pub mod route;
pub mod shipping_line;
pub mod state;
pub mod user;
pub mod validation;
pub mod vehicle;
pub mod yard;

pub use audit::{AuditLog, AuditLogFilter};
pub use auth::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, OAuthExchangeRequest, OtpRequest,
    RefreshRequest, RefreshResponse, ResetPasswordRequest, Session, SignupRequest,
    token_preview,
};
pub use container::{
    Container, ContainerFilter, ContainerInput, ContainerSize, ContainerStatus, ContainerType,
};
pub use dashboard::DashboardStats;
pub use equipment::{Equipment, EquipmentInput, EquipmentStatus, EquipmentStatusUpdate, EquipmentType};
pub use error::{DomainError, DomainResult};
pub use gate::{GateOperation, GateOperationFilter, GateOperationInput, GateOperationType, GateStatus};
pub use pagination::{ListResponse, Page, PageRequest, paginate};
pub use profile::{ChangePasswordRequest, ProfileUpdate};
pub use request::{ApiRequest, HttpMethod, MultipartPart, QueryParams, RequestBody, ToQuery};
pub use response::ApiResponse;
pub use route::{Access, GuardDecision, Route, Router};
pub use shipping_line::{ShippingLine, ShippingLineInput};
pub use state::Loadable;
pub use user::{Role, User, UserFilter, UserInput};
pub use validation::{FormFields, Rule, Schema, Validate, ValidationErrors};
pub use vehicle::{BlacklistUpdate, Vehicle, VehicleFilter, VehicleInput, VehicleType};
pub use yard::{YardBlock, YardBlockInput};
