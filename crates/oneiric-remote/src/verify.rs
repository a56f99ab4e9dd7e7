// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! Ed25519 signature verification over the manifest's canonical bytes
//! (§4.7 step 2). "Canonical" here means exactly the bytes fetched — the
//! publisher is responsible for producing a deterministic byte form; this
//! loader never re-serializes before verifying, since doing so would make
//! verification depend on this crate's `serde_json` field ordering matching
//! the publisher's instead of the transmitted bytes themselves.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use oneiric_core::OneiricError;

/// Verify `signature` over `envelope_bytes` against any of `trusted_keys`.
pub fn verify_signature(
    envelope_bytes: &[u8],
    signature_bytes: &[u8],
    trusted_keys: &[VerifyingKey],
) -> Result<(), OneiricError> {
    let signature_array: [u8; 64] = signature_bytes
        .try_into()
        .map_err(|_| OneiricError::SignatureInvalid(format!("signature must be 64 bytes, got {}", signature_bytes.len())))?;
    let signature = Signature::from_bytes(&signature_array);

    if trusted_keys.is_empty() {
        return Err(OneiricError::SignatureInvalid("no trusted public keys configured".to_string()));
    }

    for key in trusted_keys {
        if key.verify(envelope_bytes, &signature).is_ok() {
            return Ok(());
        }
    }
    Err(OneiricError::SignatureInvalid("signature did not verify against any trusted key".to_string()))
}

#[cfg(test)]
#[path = "verify_tests.rs"]
mod tests;
