//! Shared domain types for Orbot.
//!
//! This crate contains the types used across the Orbot claim bot: runtime
//! configuration, chat-platform interaction payloads, and the error enums
//! for the store, console, and claim domains.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod error;
pub mod interaction;
