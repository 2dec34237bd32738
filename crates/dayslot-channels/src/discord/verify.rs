//! Request signature check for the interactions endpoint.
//!
//! Discord signs `timestamp ‖ body` with the application's Ed25519 key and
//! sends the hex signature in `X-Signature-Ed25519`.

use dayslot_core::error::{DaySlotError, Result};
use ed25519_dalek::{PUBLIC_KEY_LENGTH, Signature, Verifier, VerifyingKey};

pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    key: VerifyingKey,
}

impl SignatureVerifier {
    /// Parse the hex public key shown in the developer portal.
    pub fn from_hex(public_key: &str) -> Result<Self> {
        let bytes = hex::decode(public_key.trim())
            .map_err(|e| DaySlotError::Config(format!("discord.public_key is not hex: {e}")))?;
        let bytes: [u8; PUBLIC_KEY_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
            DaySlotError::Config(format!(
                "discord.public_key must be {PUBLIC_KEY_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        let key = VerifyingKey::from_bytes(&bytes)
            .map_err(|e| DaySlotError::Config(format!("Invalid discord.public_key: {e}")))?;
        Ok(Self { key })
    }

    pub fn from_key(key: VerifyingKey) -> Self {
        Self { key }
    }

    pub fn verify(&self, signature_hex: &str, timestamp: &str, body: &[u8]) -> Result<()> {
        let raw = hex::decode(signature_hex)
            .map_err(|_| DaySlotError::AuthFailed("signature is not hex".into()))?;
        let signature = Signature::from_slice(&raw)
            .map_err(|_| DaySlotError::AuthFailed("malformed signature".into()))?;

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);

        self.key
            .verify(&message, &signature)
            .map_err(|_| DaySlotError::AuthFailed("invalid request signature".into()))
    }
}
