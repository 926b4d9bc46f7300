//! Data models for the Terragrids auth service

pub mod auth;
pub use auth::*;
