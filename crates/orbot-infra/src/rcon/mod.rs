//! Source RCON remote-console client.
//!
//! Length-prefixed little-endian packets over TCP, password auth, one
//! request/response round-trip per command. This is the protocol Minecraft
//! servers expose when `enable-rcon` is set in `server.properties`.

mod client;
mod packet;

pub use client::{RconClient, RconConsole};
