// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! SHA-256 digests, used both for the manifest's own change-detection
//! (§4.7 step 3) and for verifying downloaded artifacts (§4.7 step 5).

use sha2::{Digest, Sha256};

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().iter().map(|byte| format!("{byte:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_input_produces_the_known_digest() {
        assert_eq!(sha256_hex(b""), "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
    }

    #[test]
    fn different_inputs_produce_different_digests() {
        assert_ne!(sha256_hex(b"a"), sha256_hex(b"b"));
    }
}
