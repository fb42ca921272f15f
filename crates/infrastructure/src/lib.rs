//! Quay Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer: an HTTP transport over reqwest,
//! a file-backed credential store, the system clock and environment
//! configuration.

pub mod adapters;
pub mod config;
pub mod http;
pub mod persistence;
pub mod serialization;

pub use adapters::{ReqwestTransport, SystemClock};
pub use config::{ClientConfig, ConfigError};
pub use http::{UploadError, UploadFile, read_upload};
pub use persistence::FileCredentialStore;
pub use serialization::{SerializationError, from_json_bytes, to_json_pretty};
