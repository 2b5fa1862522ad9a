//! Orb claim service.
//!
//! Orchestrates the claim flow: run the grant command on the game server's
//! console, interpret the response, and record the claim in the counter
//! store only after the console call succeeds.

use std::sync::Arc;

use orbot_types::error::ClaimError;

use crate::console::RemoteConsole;
use crate::store::CounterStore;

/// Exact response the console returns when the target player is offline.
///
/// String-equality contract with the remote console; it exposes no
/// structured status code to match on instead.
const PLAYER_NOT_FOUND_RESPONSE: &str = "No player was found";

/// Console command that opens the origin selection screen for a player.
const GRANT_COMMAND: &str = "origin gui";

/// Service orchestrating claim accounting against the remote console.
///
/// Generic over the store and console ports -- orbot-core never depends on
/// orbot-infra. The store is shared (`Arc`) because operator tooling reads
/// it alongside the service.
pub struct ClaimService<S: CounterStore, C: RemoteConsole> {
    store: Arc<S>,
    console: C,
    max_claims: i64,
}

impl<S: CounterStore, C: RemoteConsole> ClaimService<S, C> {
    /// Create a new ClaimService.
    ///
    /// - `store`: persistent per-user claim counts
    /// - `console`: remote console the grant command is executed on
    /// - `max_claims`: ceiling applied by callers via [`can_claim`](Self::can_claim)
    pub fn new(store: Arc<S>, console: C, max_claims: i64) -> Self {
        Self {
            store,
            console,
            max_claims,
        }
    }

    /// The configured claim ceiling.
    pub fn max_claims(&self) -> i64 {
        self.max_claims
    }

    /// Claims the user has consumed so far.
    pub async fn used(&self, user_id: &str) -> i64 {
        self.store.get(user_id).await
    }

    /// Claims the user has left, floored at 0.
    ///
    /// Counts can exceed the ceiling (bypass roles skip the check), so the
    /// difference is clamped here rather than in the store.
    pub async fn remaining(&self, user_id: &str) -> i64 {
        (self.max_claims - self.store.get(user_id).await).max(0)
    }

    /// Whether the user is under the claim ceiling.
    pub async fn can_claim(&self, user_id: &str) -> bool {
        self.store.get(user_id).await < self.max_claims
    }

    /// Redeem a claim for `user_id` on behalf of player `username`.
    ///
    /// Executes the grant command and records the claim only when the
    /// console reports success. A response of exactly
    /// `"No player was found"` maps to [`ClaimError::PlayerNotFound`] and
    /// leaves the count untouched.
    ///
    /// This method does not check the ceiling; callers decide whether
    /// [`can_claim`](Self::can_claim) gates the attempt.
    pub async fn claim(&self, user_id: &str, username: &str) -> Result<(), ClaimError> {
        let response = self
            .console
            .exec(&format!("{GRANT_COMMAND} {username}"))
            .await?;

        if response == PLAYER_NOT_FOUND_RESPONSE {
            return Err(ClaimError::PlayerNotFound);
        }

        self.store.increment(user_id, 1).await?;
        tracing::info!(user_id, username, "claim recorded");
        Ok(())
    }
}
