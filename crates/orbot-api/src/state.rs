//! Application state wiring the claim service together.
//!
//! AppState pins the generic claim service to the concrete infra
//! implementations (JSON-file store, RCON console) and carries the values
//! the webhook handlers need.

use std::path::Path;
use std::sync::Arc;

use secrecy::SecretString;

use orbot_core::claim::ClaimService;
use orbot_infra::rcon::RconConsole;
use orbot_infra::store::JsonCounterStore;
use orbot_types::config::OrbotConfig;

/// Claim service pinned to the infra implementations.
pub type ConcreteClaimService = ClaimService<JsonCounterStore, RconConsole>;

/// Shared state for the webhook server.
#[derive(Clone)]
pub struct AppState {
    pub claims: Arc<ConcreteClaimService>,
    pub webhook_secret: Arc<SecretString>,
    pub bypass_role: Option<String>,
}

impl AppState {
    /// Initialize the application state: open the counter store, wire the
    /// claim service.
    pub async fn init(
        data_dir: &Path,
        config: &OrbotConfig,
        rcon_password: SecretString,
        webhook_secret: SecretString,
    ) -> anyhow::Result<Self> {
        let store = Arc::new(JsonCounterStore::open(data_dir.join(&config.counter_file)).await?);
        let console = RconConsole::new(config.rcon_addr.clone(), rcon_password);
        let claims = Arc::new(ClaimService::new(store, console, config.max_claims));

        Ok(Self {
            claims,
            webhook_secret: Arc::new(webhook_secret),
            bypass_role: config.bypass_role.clone(),
        })
    }
}
