//! Middleware for the Terragrids auth service
//!
//! This module provides request tracing and the wallet authentication extractors.

pub mod auth;
mod tracing;

pub use auth::{AdminWallet, AuthenticatedWallet};
pub use tracing::request_tracing;
