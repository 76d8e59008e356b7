// crates/harness-trust/src/memory.rs
// ============================================================================
// Module: In-Memory Identity Services
// Description: In-memory implementations of the identity surface.
// Purpose: Back embedded identity-hub runtimes and trust unit tests.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Embedded identity-hub runtimes expose their internals as in-process
//! collaborators; these in-memory implementations provide that surface.
//! They are deliberately simple: deterministic maps behind mutexes, with
//! read accessors so tests can assert on provisioned state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::credential::CredentialResource;
use crate::did::DidDocument;
use crate::error::TrustError;
use crate::provision::CredentialStore;
use crate::provision::DidPublisher;
use crate::provision::ParticipantContextService;
use crate::provision::ParticipantManifest;
use crate::provision::StsAccount;
use crate::provision::StsAccountService;

// ============================================================================
// SECTION: Lock Helper
// ============================================================================

/// Maps a poisoned lock into a provisioning error.
fn poisoned() -> TrustError {
    TrustError::Provisioning("identity service lock poisoned".to_string())
}

// ============================================================================
// SECTION: Participant Contexts
// ============================================================================

/// In-memory participant-context service.
///
/// # Invariants
/// - One context per DID; re-provisioning replaces the manifest.
#[derive(Debug, Default)]
pub struct InMemoryParticipantContextService {
    /// Manifests keyed by DID.
    contexts: Mutex<BTreeMap<String, ParticipantManifest>>,
}

impl InMemoryParticipantContextService {
    /// Creates an empty service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the manifest provisioned for a DID, if any.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Provisioning`] when the lock is poisoned.
    pub fn manifest_for(&self, did: &str) -> Result<Option<ParticipantManifest>, TrustError> {
        Ok(self.contexts.lock().map_err(|_| poisoned())?.get(did).cloned())
    }
}

impl ParticipantContextService for InMemoryParticipantContextService {
    fn create_participant_context(&self, manifest: ParticipantManifest) -> Result<(), TrustError> {
        let mut guard = self.contexts.lock().map_err(|_| poisoned())?;
        guard.insert(manifest.did.clone(), manifest);
        Ok(())
    }
}

// ============================================================================
// SECTION: Credential Store
// ============================================================================

/// In-memory credential store.
///
/// # Invariants
/// - Stored order is issuance order.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    /// Stored credentials in issuance order.
    credentials: Mutex<Vec<CredentialResource>>,
}

impl InMemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all credentials held for a participant DID.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Provisioning`] when the lock is poisoned.
    pub fn credentials_for(&self, did: &str) -> Result<Vec<CredentialResource>, TrustError> {
        Ok(self
            .credentials
            .lock()
            .map_err(|_| poisoned())?
            .iter()
            .filter(|resource| resource.participant_did == did)
            .cloned()
            .collect())
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn create(&self, resource: CredentialResource) -> Result<(), TrustError> {
        self.credentials.lock().map_err(|_| poisoned())?.push(resource);
        Ok(())
    }
}

// ============================================================================
// SECTION: STS Accounts
// ============================================================================

/// In-memory STS account service.
///
/// # Invariants
/// - One account per DID.
#[derive(Debug, Default)]
pub struct InMemoryStsAccountService {
    /// Accounts keyed by DID.
    accounts: Mutex<BTreeMap<String, StsAccount>>,
}

impl InMemoryStsAccountService {
    /// Creates an empty service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the account for a participant DID.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Provisioning`] when the lock is poisoned.
    pub fn register(&self, did: &str, secret_alias: &str) -> Result<(), TrustError> {
        let mut guard = self.accounts.lock().map_err(|_| poisoned())?;
        guard.insert(
            did.to_string(),
            StsAccount {
                did: did.to_string(),
                secret_alias: secret_alias.to_string(),
            },
        );
        Ok(())
    }
}

impl StsAccountService for InMemoryStsAccountService {
    fn find_by_id(&self, did: &str) -> Result<Option<StsAccount>, TrustError> {
        Ok(self.accounts.lock().map_err(|_| poisoned())?.get(did).cloned())
    }
}

// ============================================================================
// SECTION: DID Publisher
// ============================================================================

/// In-memory DID document publisher and resolver.
///
/// # Invariants
/// - Publication replaces any previous document for the same DID.
#[derive(Debug, Default)]
pub struct InMemoryDidPublisher {
    /// Documents keyed by DID.
    documents: Mutex<BTreeMap<String, DidDocument>>,
}

impl InMemoryDidPublisher {
    /// Creates an empty publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DidPublisher for InMemoryDidPublisher {
    fn publish(&self, document: DidDocument) -> Result<(), TrustError> {
        let mut guard = self.documents.lock().map_err(|_| poisoned())?;
        guard.insert(document.id.clone(), document);
        Ok(())
    }

    fn resolve(&self, did: &str) -> Result<Option<DidDocument>, TrustError> {
        Ok(self.documents.lock().map_err(|_| poisoned())?.get(did).cloned())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
