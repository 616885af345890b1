//! HMS Client - REST seam for the hospital backend
//!
//! - [`HospitalApi`]: the async trait every view-model depends on
//! - [`HttpApi`]: `reqwest` implementation with bearer auth and `detail` extraction
//! - [`ApiError`]: unreachable / rejected / undecodable, plus 401 as its own case
//!
//! Enable the `mock` feature for a `mockall`-generated `MockHospitalApi`.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod http;

pub use api::HospitalApi;
#[cfg(feature = "mock")]
pub use api::MockHospitalApi;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use error::ApiError;
pub use http::HttpApi;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
