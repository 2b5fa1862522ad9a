//! Business logic and port definitions for Orbot.
//!
//! This crate defines the "ports" (the counter store and remote console
//! traits) that the infrastructure layer implements, plus the claim service
//! that orchestrates them. It depends only on `orbot-types` -- never on
//! `orbot-infra` or any IO crate.

pub mod claim;
pub mod console;
pub mod store;
