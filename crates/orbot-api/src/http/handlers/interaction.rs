//! Webhook interaction handler and command dispatch.
//!
//! The platform POSTs signed interaction payloads here. Claim outcomes are
//! answered in-band as interaction replies; only unverifiable or
//! unparseable deliveries get an HTTP error.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use secrecy::ExposeSecret;

use orbot_infra::webhook;
use orbot_types::error::ClaimError;
use orbot_types::interaction::{
    CommandInvocation, CommandOptionSpec, CommandSpec, Interaction, InteractionReply, Member,
};

use crate::http::error::AppError;
use crate::state::AppState;

/// Header carrying the hex HMAC-SHA256 signature of the raw body.
pub const SIGNATURE_HEADER: &str = "x-signature-256";

/// POST /webhook/interactions
pub async fn handle_interaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<InteractionReply>, AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;
    webhook::verify_signature(
        state.webhook_secret.expose_secret().as_bytes(),
        &body,
        signature,
    )
    .map_err(|_| AppError::Unauthorized)?;

    let interaction: Interaction = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("invalid interaction payload: {e}")))?;

    let reply = match interaction {
        Interaction::Ping => InteractionReply::Pong,
        Interaction::Command { command, member } => {
            dispatch_command(&state, &command, &member).await
        }
    };

    Ok(Json(reply))
}

async fn dispatch_command(
    state: &AppState,
    command: &CommandInvocation,
    member: &Member,
) -> InteractionReply {
    match command.name.as_str() {
        "orb" => orb(state, command, member).await,
        "remaining" => remaining(state, member).await,
        other => {
            tracing::warn!(command = other, "unknown command received");
            replies::unknown_command(other)
        }
    }
}

/// `/orb username:<name>` -- redeem a claim for the invoking member.
async fn orb(state: &AppState, command: &CommandInvocation, member: &Member) -> InteractionReply {
    let Some(username) = command.option("username") else {
        return InteractionReply::ephemeral("The `username` option is required.");
    };

    let bypass = state
        .bypass_role
        .as_deref()
        .is_some_and(|role| member.has_role(role));

    if !bypass && !state.claims.can_claim(&member.user_id).await {
        return replies::limit_reached(state.claims.max_claims());
    }

    match state.claims.claim(&member.user_id, username).await {
        Ok(()) => {
            let (used, max) = if bypass {
                ("∞".to_string(), "∞".to_string())
            } else {
                (
                    state.claims.used(&member.user_id).await.to_string(),
                    state.claims.max_claims().to_string(),
                )
            };
            replies::claim_succeeded(username, &used, &max)
        }
        Err(ClaimError::PlayerNotFound) => replies::player_not_found(username),
        Err(err) => {
            tracing::error!(
                user_id = %member.user_id,
                username,
                error = %err,
                "orb claim failed"
            );
            replies::claim_failed()
        }
    }
}

/// `/remaining` -- report the invoking member's claim budget.
async fn remaining(state: &AppState, member: &Member) -> InteractionReply {
    let used = state.claims.used(&member.user_id).await;
    let remaining = state.claims.remaining(&member.user_id).await;
    replies::remaining(remaining, used, state.claims.max_claims())
}

/// GET /api/v1/commands
pub async fn list_commands() -> Json<Vec<CommandSpec>> {
    Json(command_manifest())
}

/// The slash commands this bot answers, as registered with the platform.
pub fn command_manifest() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            name: "orb".to_string(),
            description: "Change your origin on the SMP. You must be logged in for this to work."
                .to_string(),
            options: vec![CommandOptionSpec {
                name: "username".to_string(),
                description: "Your Minecraft username.".to_string(),
                required: true,
            }],
        },
        CommandSpec {
            name: "remaining".to_string(),
            description: "Check how many orbs you have available to use.".to_string(),
            options: Vec::new(),
        },
    ]
}

/// Reply texts for every command outcome.
mod replies {
    use orbot_types::interaction::InteractionReply;

    pub fn limit_reached(max: i64) -> InteractionReply {
        InteractionReply::ephemeral(format!(
            "✖ You have reached your limit of orb claims. (Max: `{max}`)"
        ))
    }

    pub fn claim_succeeded(username: &str, used: &str, max: &str) -> InteractionReply {
        InteractionReply::message(format!(
            "✔ Successfully redeemed an orb for player: `{username}`. (`{used}/{max}`)"
        ))
    }

    pub fn player_not_found(username: &str) -> InteractionReply {
        InteractionReply::message(format!(
            "✖ Could not find player `{username}` on the server. \
             Make sure you are logged in before redeeming an orb."
        ))
    }

    pub fn claim_failed() -> InteractionReply {
        InteractionReply::message(
            "⚠ An error occurred while claiming the orb. Please try again or contact support.",
        )
    }

    pub fn remaining(remaining: i64, used: i64, max: i64) -> InteractionReply {
        InteractionReply::ephemeral(format!(
            "🟢 You have `{remaining}` orbs remaining. Used `{used}/{max}`"
        ))
    }

    pub fn unknown_command(name: &str) -> InteractionReply {
        InteractionReply::ephemeral(format!("Unknown command: `{name}`"))
    }
}

#[cfg(test)]
mod tests {
    use orbot_types::interaction::InteractionReply;

    use super::*;

    fn content_of(reply: &InteractionReply) -> (&str, bool) {
        match reply {
            InteractionReply::Message { content, ephemeral } => (content.as_str(), *ephemeral),
            InteractionReply::Pong => panic!("expected a message reply"),
        }
    }

    #[test]
    fn manifest_lists_both_commands() {
        let manifest = command_manifest();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest[0].name, "orb");
        assert!(manifest[0].options[0].required);
        assert_eq!(manifest[1].name, "remaining");
        assert!(manifest[1].options.is_empty());
    }

    #[test]
    fn limit_reply_is_ephemeral_and_names_the_ceiling() {
        let reply = replies::limit_reached(3);
        let (content, ephemeral) = content_of(&reply);
        assert!(ephemeral);
        assert!(content.contains("`3`"));
    }

    #[test]
    fn success_reply_shows_usage() {
        let reply = replies::claim_succeeded("Steve", "2", "3");
        let (content, ephemeral) = content_of(&reply);
        assert!(!ephemeral);
        assert!(content.contains("`Steve`"));
        assert!(content.contains("`2/3`"));
    }

    #[test]
    fn bypass_success_reply_shows_infinity() {
        let reply = replies::claim_succeeded("Steve", "∞", "∞");
        let (content, _) = content_of(&reply);
        assert!(content.contains("`∞/∞`"));
    }

    #[test]
    fn player_not_found_reply_names_the_player() {
        let reply = replies::player_not_found("Ghost");
        let (content, ephemeral) = content_of(&reply);
        assert!(!ephemeral);
        assert!(content.contains("`Ghost`"));
        // Distinguishable from the generic failure message.
        let failed = replies::claim_failed();
        let (generic, _) = content_of(&failed);
        assert_ne!(content, generic);
    }

    #[test]
    fn remaining_reply_is_ephemeral() {
        let reply = replies::remaining(1, 2, 3);
        let (content, ephemeral) = content_of(&reply);
        assert!(ephemeral);
        assert!(content.contains("`1`"));
        assert!(content.contains("`2/3`"));
    }
}
