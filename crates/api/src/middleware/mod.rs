//! Response middleware.
//!
//! - [`error_detail::attach_error_detail`] -- Adds internal error detail to
//!   5xx bodies when running in development mode.

pub mod error_detail;
