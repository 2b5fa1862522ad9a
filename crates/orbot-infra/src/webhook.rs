//! Webhook signature verification.
//!
//! The chat platform signs each delivery with HMAC-SHA256 over the raw
//! request body. The signature arrives hex-encoded in a header, with or
//! without a `sha256=` prefix. Verification is constant-time.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Errors from webhook signature handling.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// Signature missing, unparseable, or not matching the body.
    #[error("webhook signature verification failed")]
    VerificationFailed,

    /// The configured signing secret is unusable.
    #[error("invalid signing key: {0}")]
    InvalidKey(String),
}

/// Verify a hex-encoded HMAC-SHA256 `signature` over `body`.
///
/// Accepts GitHub-style `sha256=<hex>` signatures as well as plain hex.
pub fn verify_signature(secret: &[u8], body: &[u8], signature: &str) -> Result<(), SignatureError> {
    let hex_sig = signature.strip_prefix("sha256=").unwrap_or(signature);
    let expected = hex_decode(hex_sig).ok_or(SignatureError::VerificationFailed)?;

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| SignatureError::VerificationFailed)
}

/// Compute the hex HMAC-SHA256 signature for `body`.
///
/// Used by tests and by delivery tooling that signs payloads.
pub fn sign(secret: &[u8], body: &[u8]) -> Result<String, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
    mac.update(body);
    Ok(hex_encode(&mac.finalize().into_bytes()))
}

fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
