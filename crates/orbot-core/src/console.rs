//! Remote console trait.
//!
//! The claim flow executes one command against the game server's remote
//! console and inspects the textual response. The RCON implementation lives
//! in orbot-infra.

use std::future::Future;

use orbot_types::error::ConsoleError;

/// Trait for a line-oriented remote console.
pub trait RemoteConsole: Send + Sync {
    /// Execute a single command and return the console's textual response.
    fn exec(&self, command: &str) -> impl Future<Output = Result<String, ConsoleError>> + Send;
}
