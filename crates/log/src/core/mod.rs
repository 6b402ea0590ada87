//! Core components for the vlog logging system.
//!
//! ### [`error`] - Error handling
//! [`VlogError`] covers every failure a configurator can observe.
//!
//! ### [`result`] - Result types
//! [`VlogResult`] alias and the [`LogIoResultExt`] helper for file paths.

pub mod error;
pub mod result;

pub use error::{VlogError, VlogResult};
pub use result::LogIoResultExt;
