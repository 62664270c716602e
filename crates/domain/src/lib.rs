//! # hasnap-domain
//!
//! Pure domain model for the hasnap registry snapshot tool.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions
//! - Define the **registry records** read from the host: devices, entities,
//!   areas, and config entries
//! - Define the **snapshot document** (floors → areas → devices → entities)
//!   and its lenient import counterpart
//! - Contain the projections and invariants that do not need IO
//!   (nameless-device rule, label namespace handling, floor prefix parsing)
//! - Define the **notifications** raised after an export or import
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod area;
pub mod config_entry;
pub mod device;
pub mod entity;
pub mod notification;
pub mod snapshot;
