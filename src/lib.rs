//! Terragrids Auth Library
//!
//! Wallet challenge/response authentication for the Terragrids API: challenge
//! issuance, single-use challenge storage, and bearer token verification.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
