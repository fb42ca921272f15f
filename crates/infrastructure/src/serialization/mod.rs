//! JSON helpers shared by the credential file and CLI output.
//!
//! Output uses 2-space indentation and a trailing newline.

mod json;

pub use json::{SerializationError, from_json_bytes, to_json_pretty};
