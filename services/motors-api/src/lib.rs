//! HTTP boundary for the M-Motors credential & session backend
//!
//! Library half of the `m-motors-api` binary. Configuration, routing,
//! request authentication, and error mapping live here so the router can be
//! exercised directly in integration tests.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
