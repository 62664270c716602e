//! # hasnap-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Expose the two service calls as JSON endpoints
//!   (`/api/services/export_data`, `/api/services/import_data`)
//! - List and dismiss persistent notifications (`/api/notifications`)
//! - Serve the snapshot output directory under the download base
//!   (`/local/…` by default) so the link in the export notification resolves
//! - Map application errors into HTTP status codes
//!
//! ## Dependency rule
//! Depends on `hasnap-app` (for port traits and services) and `hasnap-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
mod test_support;
