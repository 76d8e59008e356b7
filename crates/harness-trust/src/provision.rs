// crates/harness-trust/src/provision.rs
// ============================================================================
// Module: Participant Provisioning
// Description: Identity-surface traits and participant-context provisioning.
// Purpose: Publish keys, DID documents, credentials, and secrets for a
//          participant before it acts as consumer or provider.
// Dependencies: base64, harness-core, serde_json
// ============================================================================

//! ## Overview
//! Provisioning publishes a participant's public key and credential-service
//! entry into the identity hub, stores its private key under the agreed
//! alias, issues and stores its credential set, and seeds the OAuth client
//! secret for the STS flow. All of this must happen before the participant
//! is used as either consumer or provider; readiness retries are the
//! orchestrator's job, not this module's.

// ============================================================================
// SECTION: Imports
// ============================================================================

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use harness_core::Endpoint;
use harness_core::SecretStore;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::credential::CredentialResource;
use crate::did::DidDocument;
use crate::did::DidService;
use crate::did::VerificationMethod;
use crate::error::TrustError;
use crate::issuer::CredentialIssuer;
use crate::keys::KeyPair;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// OAuth client secret value seeded for every STS account.
pub const CLIENT_SECRET: &str = "clientSecret";

/// Credential service fragment id published in DID documents.
const CREDENTIAL_SERVICE_ID: &str = "#credential-service";

/// Credential service type published in DID documents.
const CREDENTIAL_SERVICE_TYPE: &str = "CredentialService";

// ============================================================================
// SECTION: Manifest Types
// ============================================================================

/// Key material descriptor inside a participant manifest.
///
/// # Invariants
/// - `key_id` is the full id (`<did>#<key-id>`).
/// - `public_key_jwk` matches the private key stored under
///   `private_key_alias`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDescriptor {
    /// Full verification key id.
    pub key_id: String,
    /// Public key as JWK.
    pub public_key_jwk: Value,
    /// Secret-store alias of the private key.
    pub private_key_alias: String,
}

/// Service endpoint entry inside a participant manifest.
///
/// # Invariants
/// - `endpoint` embeds the holder DID base64url-encoded into the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    /// Service fragment id.
    pub id: String,
    /// Service type.
    pub service_type: String,
    /// Resolvable endpoint URL.
    pub endpoint: String,
}

/// Participant context manifest provisioned into the identity hub.
///
/// # Invariants
/// - `participant_context_id` equals `did`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantManifest {
    /// Context identifier (the participant DID).
    pub participant_context_id: String,
    /// Participant DID.
    pub did: String,
    /// Key descriptor.
    pub key: KeyDescriptor,
    /// Credential-service endpoint.
    pub service: ServiceEndpoint,
    /// Whether the context is active on creation.
    pub active: bool,
}

/// STS account looked up during secret propagation.
///
/// # Invariants
/// - `secret_alias` matches the alias the participant's own configuration
///   references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StsAccount {
    /// Account id (the participant DID).
    pub did: String,
    /// Alias of the OAuth client secret.
    pub secret_alias: String,
}

// ============================================================================
// SECTION: Identity Surface
// ============================================================================

/// Participant-context surface of the identity hub.
pub trait ParticipantContextService: Send + Sync {
    /// Creates a participant context from a manifest.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Provisioning`] when the context is rejected.
    fn create_participant_context(&self, manifest: ParticipantManifest) -> Result<(), TrustError>;
}

/// Credential storage surface of the identity hub.
pub trait CredentialStore: Send + Sync {
    /// Stores an issued credential.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Provisioning`] when the credential is rejected.
    fn create(&self, resource: CredentialResource) -> Result<(), TrustError>;
}

/// STS account lookup surface of the identity hub.
pub trait StsAccountService: Send + Sync {
    /// Finds the STS account for a participant DID.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Provisioning`] when the lookup fails.
    fn find_by_id(&self, did: &str) -> Result<Option<StsAccount>, TrustError>;
}

/// DID document publication and resolution surface.
pub trait DidPublisher: Send + Sync {
    /// Publishes a DID document, replacing any previous version.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Provisioning`] when publication fails.
    fn publish(&self, document: DidDocument) -> Result<(), TrustError>;

    /// Resolves a published DID document.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Provisioning`] when resolution fails.
    fn resolve(&self, did: &str) -> Result<Option<DidDocument>, TrustError>;
}

/// Borrowed bundle of identity-hub collaborators used by provisioning.
///
/// # Invariants
/// - All handles point into the same identity-hub runtime.
#[derive(Clone, Copy)]
pub struct IdentityServices<'a> {
    /// Participant-context surface.
    pub contexts: &'a dyn ParticipantContextService,
    /// DID publication surface.
    pub dids: &'a dyn DidPublisher,
    /// Credential storage surface.
    pub credentials: &'a dyn CredentialStore,
    /// STS account lookup surface.
    pub accounts: &'a dyn StsAccountService,
    /// Identity-hub secret store.
    pub vault: &'a dyn SecretStore,
}

// ============================================================================
// SECTION: Provisioning
// ============================================================================

/// Identity inputs for provisioning one participant.
///
/// # Invariants
/// - `did` and `keys` are the participant's immutable identity.
#[derive(Clone, Copy)]
pub struct ParticipantProvisioning<'a> {
    /// Participant DID.
    pub did: &'a str,
    /// Holder identifier used in credential subjects.
    pub holder_id: &'a str,
    /// Participant key pair.
    pub keys: &'a KeyPair,
    /// Secret-store alias for the private key.
    pub private_key_alias: &'a str,
    /// Identity-hub credential-resolution endpoint.
    pub resolution_endpoint: &'a Endpoint,
}

/// Builds the credential-service endpoint for a holder DID.
///
/// The DID is base64url-encoded into the path so it survives as one
/// segment.
#[must_use]
pub fn credential_service_endpoint(resolution_endpoint: &Endpoint, did: &str) -> String {
    format!("{resolution_endpoint}/v1/participants/{}", URL_SAFE.encode(did.as_bytes()))
}

/// Publishes a participant context and its DID document, and stores the
/// private key under its alias.
///
/// Must run before the participant is used as consumer or provider.
///
/// # Errors
///
/// Returns [`TrustError`] when key export, context creation, publication,
/// or secret storage fails. All are fatal before scenarios start.
pub fn configure_participant_context(
    participant: &ParticipantProvisioning<'_>,
    services: &IdentityServices<'_>,
) -> Result<(), TrustError> {
    let full_key_id = format!("{}#{}", participant.did, participant.keys.thumbprint());
    let manifest = ParticipantManifest {
        participant_context_id: participant.did.to_string(),
        did: participant.did.to_string(),
        key: KeyDescriptor {
            key_id: full_key_id.clone(),
            public_key_jwk: participant.keys.public_jwk(),
            private_key_alias: participant.private_key_alias.to_string(),
        },
        service: ServiceEndpoint {
            id: CREDENTIAL_SERVICE_ID.to_string(),
            service_type: CREDENTIAL_SERVICE_TYPE.to_string(),
            endpoint: credential_service_endpoint(participant.resolution_endpoint, participant.did),
        },
        active: true,
    };
    services.contexts.create_participant_context(manifest.clone())?;
    services.dids.publish(DidDocument {
        id: participant.did.to_string(),
        verification_method: vec![VerificationMethod {
            id: full_key_id,
            method_type: "JsonWebKey2020".to_string(),
            controller: participant.did.to_string(),
            public_key_jwk: participant.keys.public_jwk(),
        }],
        service: vec![DidService {
            id: manifest.service.id,
            service_type: manifest.service.service_type,
            service_endpoint: manifest.service.endpoint,
        }],
    })?;
    let pem = participant.keys.private_key_pem()?;
    services
        .vault
        .store_secret(participant.private_key_alias, &pem)
        .map_err(|err| TrustError::Provisioning(err.to_string()))
}

/// Fully provisions one participant: context, credentials, and the STS
/// client secret.
///
/// # Errors
///
/// Returns [`TrustError`] when context provisioning, credential issuance,
/// or secret seeding fails. A signing failure aborts the bootstrap.
pub fn configure_participant(
    participant: &ParticipantProvisioning<'_>,
    issuer: &CredentialIssuer,
    services: &IdentityServices<'_>,
) -> Result<(), TrustError> {
    configure_participant_context(participant, services)?;

    for resource in issuer.issue_credentials(participant.did, participant.holder_id)? {
        services.credentials.create(resource)?;
    }

    if let Some(account) = services.accounts.find_by_id(participant.did)? {
        services
            .vault
            .store_secret(&account.secret_alias, CLIENT_SECRET)
            .map_err(|err| TrustError::Provisioning(err.to_string()))?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
