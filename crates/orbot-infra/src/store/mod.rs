//! Counter store implementations.

pub mod json;

pub use json::JsonCounterStore;
