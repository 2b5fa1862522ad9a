//! RCON packet framing.
//!
//! Wire layout: i32 LE size (covering id + type + body + terminators),
//! i32 LE request id, i32 LE packet type, body bytes, two NUL bytes.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use orbot_types::error::ConsoleError;

/// Auth request carrying the password.
pub(crate) const SERVERDATA_AUTH: i32 = 3;
/// Command execution request. Auth responses reuse this discriminant.
pub(crate) const SERVERDATA_EXECCOMMAND: i32 = 2;
pub(crate) const SERVERDATA_AUTH_RESPONSE: i32 = 2;
/// Command output response.
pub(crate) const SERVERDATA_RESPONSE_VALUE: i32 = 0;

/// Bytes the size field covers besides the body: id + type + two NULs.
const OVERHEAD: usize = 10;

/// Largest body accepted on either direction before the packet is rejected.
const MAX_BODY: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Packet {
    pub id: i32,
    pub kind: i32,
    pub body: String,
}

impl Packet {
    pub fn new(id: i32, kind: i32, body: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            body: body.into(),
        }
    }

    /// Encode to the wire layout.
    pub fn encode(&self) -> Vec<u8> {
        let body = self.body.as_bytes();
        let size = (OVERHEAD + body.len()) as i32;

        let mut buf = Vec::with_capacity(4 + OVERHEAD + body.len());
        buf.extend_from_slice(&size.to_le_bytes());
        buf.extend_from_slice(&self.id.to_le_bytes());
        buf.extend_from_slice(&self.kind.to_le_bytes());
        buf.extend_from_slice(body);
        buf.extend_from_slice(&[0, 0]);
        buf
    }

    /// Write this packet to `w`.
    pub async fn write_to<W: AsyncWrite + Unpin>(&self, w: &mut W) -> Result<(), ConsoleError> {
        if self.body.len() > MAX_BODY {
            return Err(ConsoleError::Malformed(format!(
                "outbound body of {} bytes exceeds the {MAX_BODY} byte cap",
                self.body.len()
            )));
        }
        w.write_all(&self.encode()).await?;
        Ok(())
    }

    /// Read one packet from `r`.
    pub async fn read_from<R: AsyncRead + Unpin>(r: &mut R) -> Result<Self, ConsoleError> {
        let size = r.read_i32_le().await?;
        let size = usize::try_from(size)
            .ok()
            .filter(|s| (OVERHEAD..=OVERHEAD + MAX_BODY).contains(s))
            .ok_or_else(|| ConsoleError::Malformed(format!("packet size {size} out of range")))?;

        let id = r.read_i32_le().await?;
        let kind = r.read_i32_le().await?;

        let body_len = size - OVERHEAD;
        let mut body = vec![0u8; body_len + 2];
        r.read_exact(&mut body).await?;
        if body[body_len..] != [0, 0] {
            return Err(ConsoleError::Malformed(
                "missing NUL terminators".to_string(),
            ));
        }
        body.truncate(body_len);

        let body = String::from_utf8(body)
            .map_err(|_| ConsoleError::Malformed("body is not valid UTF-8".to_string()))?;

        Ok(Self { id, kind, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_matches_wire_layout() {
        let bytes = Packet::new(7, SERVERDATA_EXECCOMMAND, "list").encode();

        // size = 10 overhead + 4 body
        assert_eq!(&bytes[0..4], &14i32.to_le_bytes());
        assert_eq!(&bytes[4..8], &7i32.to_le_bytes());
        assert_eq!(&bytes[8..12], &2i32.to_le_bytes());
        assert_eq!(&bytes[12..16], b"list");
        assert_eq!(&bytes[16..], &[0, 0]);
    }

    #[tokio::test]
    async fn decodes_auth_failure_sentinel_id() {
        let bytes = Packet::new(-1, SERVERDATA_AUTH_RESPONSE, "").encode();

        let packet = Packet::read_from(&mut bytes.as_slice()).await.unwrap();
        assert_eq!(packet.id, -1);
        assert_eq!(packet.kind, SERVERDATA_AUTH_RESPONSE);
        assert!(packet.body.is_empty());
    }

    #[tokio::test]
    async fn decodes_response_body() {
        let bytes = Packet::new(3, SERVERDATA_RESPONSE_VALUE, "No player was found").encode();

        let packet = Packet::read_from(&mut bytes.as_slice()).await.unwrap();
        assert_eq!(packet.body, "No player was found");
    }

    #[tokio::test]
    async fn rejects_oversized_size_field() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(1_i32 << 20).to_le_bytes());
        bytes.extend_from_slice(&[0u8; 16]);

        let err = Packet::read_from(&mut bytes.as_slice()).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Malformed(_)));
    }

    #[tokio::test]
    async fn rejects_undersized_size_field() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&4i32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 16]);

        let err = Packet::read_from(&mut bytes.as_slice()).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Malformed(_)));
    }

    #[tokio::test]
    async fn rejects_missing_terminators() {
        let mut bytes = Packet::new(1, SERVERDATA_RESPONSE_VALUE, "ok").encode();
        let len = bytes.len();
        bytes[len - 1] = b'x';

        let err = Packet::read_from(&mut bytes.as_slice()).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Malformed(_)));
    }
}
