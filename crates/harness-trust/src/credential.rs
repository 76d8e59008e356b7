// crates/harness-trust/src/credential.rs
// ============================================================================
// Module: Verifiable Credentials
// Description: Credential documents, signed containers, and verification.
// Purpose: Model issued credentials and their ES256 compact-JWT form.
// Dependencies: jsonwebtoken, serde_json, time, uuid
// ============================================================================

//! ## Overview
//! A verifiable credential is a claims document (type, subject claims,
//! issuer DID, issuance time) wrapped together with its signed compact-JWT
//! serialization. Every JWT carries issuer, subject (the holder DID), a
//! fresh random token id, not-before of now, and a five-minute expiry, and
//! must verify against the key the issuer published in its DID document.

// ============================================================================
// SECTION: Imports
// ============================================================================

use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::TrustError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Credential JWT lifetime in seconds.
pub const CREDENTIAL_TTL_SECS: u64 = 300;

/// JSON-LD contexts for issued credentials.
const CREDENTIAL_CONTEXTS: [&str; 3] = [
    "https://www.w3.org/2018/credentials/v1",
    "https://w3id.org/security/suites/jws-2020/v1",
    "https://w3id.org/vc/status-list/2021/v1",
];

// ============================================================================
// SECTION: Claims
// ============================================================================

/// Claims carried by a signed credential JWT.
///
/// # Invariants
/// - `jti` is fresh and random per signature.
/// - `nbf` equals `iat`; `exp` is `iat` + [`CREDENTIAL_TTL_SECS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcClaims {
    /// Issuer DID.
    pub iss: String,
    /// Subject: the holder DID.
    pub sub: String,
    /// Audience; empty for issued credentials.
    pub aud: String,
    /// Fresh random token id.
    pub jti: String,
    /// Issued-at, seconds since the epoch.
    pub iat: u64,
    /// Not-before, seconds since the epoch.
    pub nbf: u64,
    /// Expiry, seconds since the epoch.
    pub exp: u64,
    /// Embedded JSON-LD credential document.
    pub vc: Value,
}

// ============================================================================
// SECTION: Credential Documents
// ============================================================================

/// Builds the JSON-LD credential document for a type and subject.
#[must_use]
pub fn credential_document(issuer_did: &str, credential_type: &str, subject: Value) -> Value {
    let issuance = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"));
    json!({
        "@context": CREDENTIAL_CONTEXTS,
        "type": ["VerifiableCredential", credential_type],
        "credentialSubject": subject,
        "issuer": issuer_did,
        "issuanceDate": issuance,
    })
}

/// Builds the membership credential subject for a holder.
#[must_use]
pub fn membership_subject(holder_did: &str, holder_id: &str) -> Value {
    json!({
        "id": holder_did,
        "holderIdentifier": holder_id,
        "membership": "active",
    })
}

/// Builds a framework-agreement credential subject for a holder.
#[must_use]
pub fn framework_subject(holder_did: &str, holder_id: &str, credential_type: &str) -> Value {
    json!({
        "id": holder_did,
        "type": credential_type,
        "holderIdentifier": holder_id,
        "contractVersion": "1.0.0",
    })
}

// ============================================================================
// SECTION: Containers
// ============================================================================

/// Serialization format of a signed credential.
///
/// # Invariants
/// - Only the JWT form is issued by this harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CredentialFormat {
    /// Compact JWT serialization.
    VcJwt,
}

/// A signed credential: raw JWT plus its claims document.
///
/// # Invariants
/// - `raw` verifies against the issuer's published DID-document key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiableCredentialContainer {
    /// Compact JWT serialization.
    pub raw: String,
    /// Serialization format tag.
    pub format: CredentialFormat,
    /// JSON-LD credential document matching `raw`.
    pub credential: Value,
}

/// A stored credential associated to its participant and holder.
///
/// # Invariants
/// - `(participant_did, holder_id)` identifies the owning pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialResource {
    /// Issuer DID the credential is signed by.
    pub issuer_did: String,
    /// Participant (holder) DID.
    pub participant_did: String,
    /// Holder identifier used in subject claims.
    pub holder_id: String,
    /// Signed credential container.
    pub credential: VerifiableCredentialContainer,
}

// ============================================================================
// SECTION: Verification
// ============================================================================

/// Verifies a credential JWT against a published public JWK.
///
/// # Errors
///
/// Returns [`TrustError::Verification`] when the JWK is malformed or the
/// signature, expiry, or algorithm does not check out.
pub fn verify_credential_jwt(raw: &str, public_jwk: &Value) -> Result<VcClaims, TrustError> {
    let x = public_jwk["x"]
        .as_str()
        .ok_or_else(|| TrustError::Verification("jwk missing x coordinate".to_string()))?;
    let y = public_jwk["y"]
        .as_str()
        .ok_or_else(|| TrustError::Verification("jwk missing y coordinate".to_string()))?;
    let key = DecodingKey::from_ec_components(x, y)
        .map_err(|err| TrustError::Verification(err.to_string()))?;
    let mut validation = Validation::new(Algorithm::ES256);
    validation.validate_aud = false;
    jsonwebtoken::decode::<VcClaims>(raw, &key, &validation)
        .map(|data| data.claims)
        .map_err(|err| TrustError::Verification(err.to_string()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
