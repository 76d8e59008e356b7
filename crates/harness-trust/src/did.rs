// crates/harness-trust/src/did.rs
// ============================================================================
// Module: DID Derivation
// Description: Deterministic did:web derivation and DID documents.
// Purpose: Derive participant DIDs from the identity hub's DID endpoint.
// Dependencies: harness-core, serde_json, url
// ============================================================================

//! ## Overview
//! Participant DIDs use the web method, derived deterministically from the
//! identity hub's DID endpoint and the participant id:
//! `did:web:<host%3Aport>:<participant-id>`. The `host:port` authority is
//! URL-escaped because the colon is a did:web segment separator. The DID
//! document publishes the participant's public JWK and its credential
//! service entry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use harness_core::Endpoint;
use harness_core::ParticipantId;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Derivation
// ============================================================================

/// Derives the `did:web` identifier for a participant.
///
/// Deterministic over the DID endpoint's authority and the participant id;
/// the authority's `host:port` is percent-escaped.
#[must_use]
pub fn did_for(did_endpoint: &Endpoint, participant_id: &ParticipantId) -> String {
    let url = did_endpoint.url();
    let host = url.host_str().unwrap_or("localhost");
    let authority = url.port_or_known_default().map_or_else(
        || host.to_string(),
        |port| format!("{host}:{port}"),
    );
    let escaped = authority.replace(':', "%3A");
    format!("did:web:{escaped}:{participant_id}")
}

// ============================================================================
// SECTION: DID Document
// ============================================================================

/// Minimal DID document published into the identity hub.
///
/// # Invariants
/// - `verification_method` holds exactly the participant's public JWK.
/// - `service` entries use stable fragment ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidDocument {
    /// Document subject DID.
    pub id: String,
    /// Verification methods keyed by full key id.
    #[serde(rename = "verificationMethod")]
    pub verification_method: Vec<VerificationMethod>,
    /// Service entries (credential service and friends).
    pub service: Vec<DidService>,
}

/// Verification method entry carrying a public JWK.
///
/// # Invariants
/// - `id` is `<did>#<key-id>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationMethod {
    /// Full key id (`<did>#<key-id>`).
    pub id: String,
    /// Method type; always `JsonWebKey2020` here.
    #[serde(rename = "type")]
    pub method_type: String,
    /// Controller DID.
    pub controller: String,
    /// Public JWK.
    #[serde(rename = "publicKeyJwk")]
    pub public_key_jwk: Value,
}

/// Service entry in a DID document.
///
/// # Invariants
/// - `id` is a fragment (for example `#credential-service`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidService {
    /// Service fragment id.
    pub id: String,
    /// Service type.
    #[serde(rename = "type")]
    pub service_type: String,
    /// Resolvable service endpoint URL.
    #[serde(rename = "serviceEndpoint")]
    pub service_endpoint: String,
}

impl DidDocument {
    /// Returns the public JWK for a full key id, if published.
    #[must_use]
    pub fn key_for(&self, full_key_id: &str) -> Option<&Value> {
        self.verification_method
            .iter()
            .find(|method| method.id == full_key_id)
            .map(|method| &method.public_key_jwk)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
