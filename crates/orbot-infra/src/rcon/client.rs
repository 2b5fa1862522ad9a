//! RCON connection handling and the `RemoteConsole` implementation.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tokio::net::TcpStream;
use tokio::time::timeout;

use orbot_core::console::RemoteConsole;
use orbot_types::error::ConsoleError;

use super::packet::{
    Packet, SERVERDATA_AUTH, SERVERDATA_AUTH_RESPONSE, SERVERDATA_EXECCOMMAND,
    SERVERDATA_RESPONSE_VALUE,
};

/// Time allowed for the connect and for each packet round-trip.
const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// An authenticated RCON connection.
#[derive(Debug)]
pub struct RconClient {
    stream: TcpStream,
    next_id: i32,
}

impl RconClient {
    /// Connect to `addr` and authenticate with `password`.
    pub async fn connect(addr: &str, password: &str) -> Result<Self, ConsoleError> {
        let stream = timeout(IO_TIMEOUT, TcpStream::connect(addr))
            .await
            .map_err(|_| ConsoleError::Timeout)?
            .map_err(|source| ConsoleError::Connect {
                addr: addr.to_string(),
                source,
            })?;

        let mut client = Self { stream, next_id: 0 };
        client.auth(password).await?;
        Ok(client)
    }

    async fn auth(&mut self, password: &str) -> Result<(), ConsoleError> {
        let id = self.next_id();
        Packet::new(id, SERVERDATA_AUTH, password)
            .write_to(&mut self.stream)
            .await?;

        // Some servers send an empty RESPONSE_VALUE ahead of the auth
        // response; skip until the auth response arrives.
        loop {
            let reply = self.read_reply().await?;
            if reply.kind != SERVERDATA_AUTH_RESPONSE {
                continue;
            }
            if reply.id == -1 {
                return Err(ConsoleError::AuthFailed);
            }
            if reply.id != id {
                return Err(ConsoleError::Malformed(format!(
                    "auth response for id {}, expected {id}",
                    reply.id
                )));
            }
            return Ok(());
        }
    }

    /// Execute one command and return the console's textual response.
    pub async fn execute(&mut self, command: &str) -> Result<String, ConsoleError> {
        let id = self.next_id();
        Packet::new(id, SERVERDATA_EXECCOMMAND, command)
            .write_to(&mut self.stream)
            .await?;

        let reply = self.read_reply().await?;
        if reply.kind != SERVERDATA_RESPONSE_VALUE {
            return Err(ConsoleError::Malformed(format!(
                "unexpected packet type {} in command response",
                reply.kind
            )));
        }
        if reply.id != id {
            return Err(ConsoleError::Malformed(format!(
                "command response for id {}, expected {id}",
                reply.id
            )));
        }
        Ok(reply.body)
    }

    async fn read_reply(&mut self) -> Result<Packet, ConsoleError> {
        timeout(IO_TIMEOUT, Packet::read_from(&mut self.stream))
            .await
            .map_err(|_| ConsoleError::Timeout)?
    }

    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// `RemoteConsole` implementation that opens a fresh authenticated
/// connection per command.
pub struct RconConsole {
    addr: String,
    password: SecretString,
}

impl RconConsole {
    /// Create a console client for the RCON listener at `addr`.
    pub fn new(addr: impl Into<String>, password: SecretString) -> Self {
        Self {
            addr: addr.into(),
            password,
        }
    }
}

impl RemoteConsole for RconConsole {
    async fn exec(&self, command: &str) -> Result<String, ConsoleError> {
        let mut client = RconClient::connect(&self.addr, self.password.expose_secret()).await?;
        let response = client.execute(command).await?;
        tracing::debug!(addr = %self.addr, command, "console command executed");
        Ok(response)
    }
}
