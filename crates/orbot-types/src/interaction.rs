//! Chat-platform interaction payloads and replies.
//!
//! The platform delivers slash-command invocations to the webhook endpoint
//! as JSON, tagged by `kind`. Replies are returned in the response body.
//! The command manifest describes the commands the bot answers, mirroring
//! what gets registered with the platform.

use serde::{Deserialize, Serialize};

/// An inbound webhook delivery from the chat platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Interaction {
    /// Liveness probe from the platform; answered with a pong.
    Ping,

    /// A slash-command invocation by a guild member.
    Command {
        command: CommandInvocation,
        member: Member,
    },
}

/// A slash command with its user-supplied options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandInvocation {
    pub name: String,

    #[serde(default)]
    pub options: Vec<CommandOption>,
}

impl CommandInvocation {
    /// Look up an option value by name.
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.value.as_str())
    }
}

/// A single named option on a command invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOption {
    pub name: String,
    pub value: String,
}

/// The member who invoked a command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Platform account id. This is the counter key.
    pub user_id: String,

    /// Role ids the member holds.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Member {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Outbound reply to an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InteractionReply {
    /// Ack for a ping.
    Pong,

    /// A channel message, optionally visible only to the invoker.
    Message {
        content: String,
        #[serde(default)]
        ephemeral: bool,
    },
}

impl InteractionReply {
    /// A message visible to the whole channel.
    pub fn message(content: impl Into<String>) -> Self {
        Self::Message {
            content: content.into(),
            ephemeral: false,
        }
    }

    /// A message visible only to the invoking member.
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self::Message {
            content: content.into(),
            ephemeral: true,
        }
    }
}

/// An entry in the command manifest served at `/api/v1/commands`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandSpec {
    pub name: String,
    pub description: String,

    #[serde(default)]
    pub options: Vec<CommandOptionSpec>,
}

/// An option declaration in the command manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOptionSpec {
    pub name: String,
    pub description: String,
    pub required: bool,
}
