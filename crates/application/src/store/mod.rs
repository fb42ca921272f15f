//! UI-facing state slices.
//!
//! A slice owns the [`Loadable`](quay_domain::Loadable) states for one
//! resource and runs service calls through them: the state goes to
//! `Loading` before the call and to `Success` or `Error` after it. Errors
//! are both recorded in the slice and returned to the caller.

mod identified;
mod resource;
mod session;

pub use identified::Identified;
pub use resource::ResourceSlice;
pub use session::SessionSlice;
