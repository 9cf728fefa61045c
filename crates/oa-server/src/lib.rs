//! Orchard Advisor HTTP API - library crate.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `oa-e2e-tests`) can build the router around their own
//! `AdvisorService`.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
