// crates/harness-trust/src/lib.rs
// ============================================================================
// Module: Harness Trust
// Description: DID, key, and verifiable-credential bootstrap for the harness.
// Purpose: Establish the federated web of trust before any transfer test.
// Dependencies: harness-core, jsonwebtoken, p256, serde_json
// ============================================================================

//! ## Overview
//! Trust bootstrap establishes a DID-based web of trust before any transfer
//! scenario runs: deterministic `did:web` derivation, ES256-signed
//! verifiable credentials issued by the dataspace issuer, participant
//! contexts provisioned into the identity hub, and client secrets
//! propagated into every secret store that needs them.
//!
//! Signing failures are fatal and abort the bootstrap. Provisioning against
//! a not-yet-ready identity hub is retried by the orchestrator's readiness
//! gate, never here.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod credential;
pub mod did;
pub mod error;
pub mod issuer;
pub mod keys;
pub mod memory;
pub mod provision;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use credential::CredentialFormat;
pub use credential::CredentialResource;
pub use credential::VcClaims;
pub use credential::VerifiableCredentialContainer;
pub use credential::verify_credential_jwt;
pub use did::DidDocument;
pub use did::did_for;
pub use error::TrustError;
pub use issuer::CredentialIssuer;
pub use issuer::GOVERNANCE_CREDENTIAL;
pub use issuer::MEMBERSHIP_CREDENTIAL;
pub use keys::KeyPair;
pub use memory::InMemoryCredentialStore;
pub use memory::InMemoryDidPublisher;
pub use memory::InMemoryParticipantContextService;
pub use memory::InMemoryStsAccountService;
pub use provision::CLIENT_SECRET;
pub use provision::CredentialStore;
pub use provision::DidPublisher;
pub use provision::IdentityServices;
pub use provision::KeyDescriptor;
pub use provision::ParticipantContextService;
pub use provision::ParticipantManifest;
pub use provision::ParticipantProvisioning;
pub use provision::ServiceEndpoint;
pub use provision::StsAccount;
pub use provision::StsAccountService;
pub use provision::configure_participant;
pub use provision::configure_participant_context;
pub use provision::credential_service_endpoint;
