//! REST client for the clinic practice-management backend.
//!
//! This crate owns the JSON wire shapes exchanged with the backend and the
//! [`ClinicApi`] seam the client core talks through. [`HttpClinicApi`] is the
//! production implementation; [`MockClinicApi`] backs tests and previews.

pub mod client;
pub mod mock;
pub mod types;

pub use client::*;
pub use mock::MockClinicApi;
pub use types::*;
