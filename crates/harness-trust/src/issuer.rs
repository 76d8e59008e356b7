// crates/harness-trust/src/issuer.rs
// ============================================================================
// Module: Dataspace Issuer
// Description: Trust-anchor credential issuance and ES256 JWS signing.
// Purpose: Issue the credential set every participant needs to join.
// Dependencies: jsonwebtoken, time, uuid
// ============================================================================

//! ## Overview
//! The dataspace issuer is the trust anchor: stateless except for its
//! signing key, it issues credentials for other participants and never
//! starts a control or data plane. Each issued credential is signed as an
//! ES256 compact JWT whose `kid` names the issuer's published key, so
//! holders can be validated against the issuer's DID document.

// ============================================================================
// SECTION: Imports
// ============================================================================

use jsonwebtoken::Algorithm;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::credential::CREDENTIAL_TTL_SECS;
use crate::credential::CredentialFormat;
use crate::credential::CredentialResource;
use crate::credential::VcClaims;
use crate::credential::VerifiableCredentialContainer;
use crate::credential::credential_document;
use crate::credential::framework_subject;
use crate::credential::membership_subject;
use crate::error::TrustError;
use crate::keys::KeyPair;

// ============================================================================
// SECTION: Credential Types
// ============================================================================

/// Membership credential type issued to every participant.
pub const MEMBERSHIP_CREDENTIAL: &str = "MembershipCredential";

/// Data-exchange governance framework credential type.
pub const GOVERNANCE_CREDENTIAL: &str = "DataExchangeGovernanceCredential";

// ============================================================================
// SECTION: Issuer
// ============================================================================

/// Trust-anchor issuer signing credentials for dataspace participants.
///
/// # Invariants
/// - Stateless except for the signing key; identity is fixed after
///   construction.
#[derive(Debug, Clone)]
pub struct CredentialIssuer {
    /// Issuer DID.
    did: String,
    /// Issuer signing key pair.
    keys: KeyPair,
}

impl CredentialIssuer {
    /// Creates an issuer for a DID with a fresh key pair.
    #[must_use]
    pub fn new(did: impl Into<String>) -> Self {
        Self::with_keys(did, KeyPair::generate())
    }

    /// Creates an issuer reusing existing key material.
    ///
    /// Used when the issuer is also modeled as a participant whose keys
    /// are already provisioned.
    #[must_use]
    pub fn with_keys(did: impl Into<String>, keys: KeyPair) -> Self {
        Self {
            did: did.into(),
            keys,
        }
    }

    /// Returns the issuer DID.
    #[must_use]
    pub fn did(&self) -> &str {
        &self.did
    }

    /// Returns the issuer key pair.
    #[must_use]
    pub const fn keys(&self) -> &KeyPair {
        &self.keys
    }

    /// Returns the full verification key id (`<did>#<key-id>`).
    #[must_use]
    pub fn verification_id(&self) -> String {
        format!("{}#{}", self.did, self.keys.thumbprint())
    }

    /// Issues a credential of an explicit type for a holder.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Signing`] when the JWT cannot be signed; this
    /// is fatal and aborts the bootstrap.
    pub fn issue_credential(
        &self,
        holder_did: &str,
        holder_id: &str,
        credential_type: &str,
        subject: Value,
    ) -> Result<CredentialResource, TrustError> {
        let document = credential_document(&self.did, credential_type, subject);
        let raw = self.sign_jwt(holder_did, document.clone())?;
        Ok(CredentialResource {
            issuer_did: self.did.clone(),
            participant_did: holder_did.to_string(),
            holder_id: holder_id.to_string(),
            credential: VerifiableCredentialContainer {
                raw,
                format: CredentialFormat::VcJwt,
                credential: document,
            },
        })
    }

    /// Issues the membership credential for a holder.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Signing`] when signing fails.
    pub fn issue_membership_credential(
        &self,
        holder_did: &str,
        holder_id: &str,
    ) -> Result<CredentialResource, TrustError> {
        self.issue_credential(
            holder_did,
            holder_id,
            MEMBERSHIP_CREDENTIAL,
            membership_subject(holder_did, holder_id),
        )
    }

    /// Issues a framework credential of the given type for a holder.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Signing`] when signing fails.
    pub fn issue_framework_credential(
        &self,
        holder_did: &str,
        holder_id: &str,
        credential_type: &str,
    ) -> Result<CredentialResource, TrustError> {
        self.issue_credential(
            holder_did,
            holder_id,
            credential_type,
            framework_subject(holder_did, holder_id, credential_type),
        )
    }

    /// Issues the full credential set a participant needs to join.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Signing`] when any signature fails; issuance
    /// is all-or-nothing.
    pub fn issue_credentials(
        &self,
        holder_did: &str,
        holder_id: &str,
    ) -> Result<Vec<CredentialResource>, TrustError> {
        Ok(vec![
            self.issue_membership_credential(holder_did, holder_id)?,
            self.issue_framework_credential(holder_did, holder_id, GOVERNANCE_CREDENTIAL)?,
        ])
    }

    /// Signs a credential document as an ES256 compact JWT.
    ///
    /// Claims: issuer, subject (= holder DID), empty audience, fresh random
    /// `jti`, not-before of now, expiry now + 300 s.
    fn sign_jwt(&self, subject_did: &str, document: Value) -> Result<String, TrustError> {
        let now = u64::try_from(OffsetDateTime::now_utc().unix_timestamp()).unwrap_or(0);
        let claims = VcClaims {
            iss: self.did.clone(),
            sub: subject_did.to_string(),
            aud: String::new(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            nbf: now,
            exp: now + CREDENTIAL_TTL_SECS,
            vc: document,
        };
        let mut header = Header::new(Algorithm::ES256);
        header.kid = Some(self.verification_id());
        let pem = self.keys.private_key_pem().map_err(|err| TrustError::Signing(err.to_string()))?;
        let key = EncodingKey::from_ec_pem(pem.as_bytes())
            .map_err(|err| TrustError::Signing(err.to_string()))?;
        jsonwebtoken::encode(&header, &claims, &key)
            .map_err(|err| TrustError::Signing(err.to_string()))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
