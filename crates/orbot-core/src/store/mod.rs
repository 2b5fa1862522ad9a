//! Persistent counter store trait.
//!
//! Defines the interface for the key -> count mapping that backs claim
//! accounting. The file-backed implementation lives in orbot-infra.

use std::future::Future;

use orbot_types::error::StoreError;

/// Trait for a durably persisted key -> count mapping.
///
/// Keys are opaque strings, counts are signed integers defaulting to 0 for
/// keys never written. Mutations must not return until the full mapping has
/// been flushed to the backing medium, and they are serialized: a concurrent
/// reader sees either the prior durable state or the new one, never an
/// intermediate.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait CounterStore: Send + Sync {
    /// Current count for `key`, or 0 if never written.
    ///
    /// Read-only; never touches the backing medium.
    fn get(&self, key: &str) -> impl Future<Output = i64> + Send;

    /// Overwrite the count for `key`, then flush the full mapping.
    fn set(&self, key: &str, value: i64)
    -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Add `delta` to the count for `key` (absent keys count as 0), then
    /// flush the full mapping.
    ///
    /// Deltas may be negative and results may go negative; the store applies
    /// them without clamping. Clamping is the caller's policy.
    fn increment(
        &self,
        key: &str,
        delta: i64,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Snapshot of all entries, sorted by key. For operator tooling;
    /// read-only.
    fn entries(&self) -> impl Future<Output = Vec<(String, i64)>> + Send;
}
