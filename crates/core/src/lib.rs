//! `careflow-core` — shared primitives for the careflow workspace.
//!
//! This crate contains **pure** value types (no I/O, no policy).

pub mod error;
pub mod tenant;

pub use error::{CoreError, CoreResult};
pub use tenant::TenantLabel;
