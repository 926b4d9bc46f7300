//! API handlers for the Terragrids auth service

pub mod auth;
pub mod health;

pub use auth::*;
pub use health::*;

// Re-export extractors from middleware for handler use
pub use crate::middleware::auth::{AdminWallet, AuthenticatedWallet};
