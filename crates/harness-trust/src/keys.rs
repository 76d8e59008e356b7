// crates/harness-trust/src/keys.rs
// ============================================================================
// Module: Key Material
// Description: P-256 key pairs for JWS signing and DID key material.
// Purpose: Generate, export, and fingerprint participant signing keys.
// Dependencies: base64, p256, serde_json, sha2
// ============================================================================

//! ## Overview
//! Every participant owns one P-256 key pair fixed at construction time.
//! The private key is exported as PKCS#8 PEM for secret-store seeding, the
//! public key as a JWK for DID documents and participant manifests. The
//! default key id is the RFC 7638 JWK thumbprint, so key ids are stable
//! across serializations of the same key.

// ============================================================================
// SECTION: Imports
// ============================================================================

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use p256::ecdsa::SigningKey;
use p256::ecdsa::VerifyingKey;
use p256::pkcs8::EncodePrivateKey;
use p256::pkcs8::EncodePublicKey;
use p256::pkcs8::LineEnding;
use rand::rngs::OsRng;
use serde_json::Value;
use serde_json::json;
use sha2::Digest;
use sha2::Sha256;

use crate::error::TrustError;

// ============================================================================
// SECTION: Key Pair
// ============================================================================

/// Immutable P-256 key pair owned by one participant.
///
/// # Invariants
/// - Generated once at participant construction; never regenerated.
/// - The JWK and PEM exports describe the same key.
#[derive(Debug, Clone)]
pub struct KeyPair {
    /// ECDSA signing key.
    signing: SigningKey,
    /// Public counterpart of `signing`.
    verifying: VerifyingKey,
}

impl KeyPair {
    /// Generates a fresh P-256 key pair.
    #[must_use]
    pub fn generate() -> Self {
        let signing = SigningKey::random(&mut OsRng);
        let verifying = VerifyingKey::from(&signing);
        Self {
            signing,
            verifying,
        }
    }

    /// Returns the base64url coordinates `(x, y)` of the public key.
    #[must_use]
    pub fn public_coordinates(&self) -> (String, String) {
        let point = self.verifying.to_encoded_point(false);
        let x = point.x().map_or_else(String::new, |bytes| URL_SAFE_NO_PAD.encode(bytes));
        let y = point.y().map_or_else(String::new, |bytes| URL_SAFE_NO_PAD.encode(bytes));
        (x, y)
    }

    /// Returns the public key as a JWK document.
    #[must_use]
    pub fn public_jwk(&self) -> Value {
        let (x, y) = self.public_coordinates();
        json!({
            "kty": "EC",
            "crv": "P-256",
            "x": x,
            "y": y,
        })
    }

    /// Returns the RFC 7638 JWK thumbprint, used as the default key id.
    #[must_use]
    pub fn thumbprint(&self) -> String {
        let (x, y) = self.public_coordinates();
        // Required members in lexicographic order per RFC 7638.
        let canonical = format!("{{\"crv\":\"P-256\",\"kty\":\"EC\",\"x\":\"{x}\",\"y\":\"{y}\"}}");
        let digest = Sha256::digest(canonical.as_bytes());
        URL_SAFE_NO_PAD.encode(digest)
    }

    /// Exports the private key as PKCS#8 PEM for secret-store seeding.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Key`] when PKCS#8 encoding fails.
    pub fn private_key_pem(&self) -> Result<String, TrustError> {
        self.signing
            .to_pkcs8_pem(LineEnding::LF)
            .map(|pem| pem.to_string())
            .map_err(|err| TrustError::Key(err.to_string()))
    }

    /// Exports the public key as SPKI PEM.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Key`] when SPKI encoding fails.
    pub fn public_key_pem(&self) -> Result<String, TrustError> {
        self.verifying
            .to_public_key_pem(LineEnding::LF)
            .map_err(|err| TrustError::Key(err.to_string()))
    }

    /// Returns the signing key for JWS operations.
    #[must_use]
    pub const fn signing_key(&self) -> &SigningKey {
        &self.signing
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
