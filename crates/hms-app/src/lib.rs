//! HMS App - session, routing and page view-models
//!
//! Everything a front end needs above the REST seam:
//! - [`SessionStore`] over a [`SessionStorage`] backend
//! - Role router ([`router::resolve`]) with per-role menus
//! - [`AppContext`]: the shared backend handle, session and location
//! - View-models: [`AppointmentBoard`], [`BookingWizard`], [`Dashboard`],
//!   [`DoctorDirectory`], [`PatientRoster`], profile editors
//!
//! # Example
//!
//! ```rust,no_run
//! use hms_app::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), AppError> {
//! let ctx = Arc::new(AppContext::open(AppConfig::load(None).unwrap_or_default())?);
//! if ctx.restore().is_authenticated() {
//!     let board = AppointmentBoard::new(ctx.clone());
//!     board.load().await?;
//!     println!("{} appointments", board.rows().len());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod appointments;
pub mod auth;
pub mod booking;
pub mod config;
pub mod context;
pub mod dashboard;
pub mod directory;
pub mod error;
pub mod notice;
pub mod profile;
pub mod roster;
pub mod router;
pub mod session;
pub mod storage;

// Re-exports for convenience
pub use appointments::{AppointmentBoard, LoadOutcome, MutationOutcome};
pub use auth::{LoginForm, RegistrationForm};
pub use booking::{BookingWizard, WizardStep};
pub use config::{AppConfig, BookingConfig, ConfigError};
pub use context::AppContext;
pub use dashboard::Dashboard;
pub use directory::DoctorDirectory;
pub use error::{AppError, AppResult};
pub use notice::Notice;
pub use profile::{DoctorProfileEditor, Draft, PatientProfileFields, PatientProfileView};
pub use roster::PatientRoster;
pub use router::{home, menu, resolve, resolve_path, Access, MenuItem, Resolution, Route};
pub use session::SessionStore;
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building a front end on HMS App
    pub use crate::{
        AppConfig, AppContext, AppError, AppointmentBoard, BookingWizard, Dashboard, LoginForm,
        Notice, Resolution, Route,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
