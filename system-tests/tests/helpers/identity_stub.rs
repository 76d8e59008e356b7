// system-tests/tests/helpers/identity_stub.rs
// ============================================================================
// Module: Identity Hub Stub
// Description: Embedded identity-hub runtime for system-tests.
// Purpose: Expose the identity surface as in-process collaborators.
// Dependencies: harness-runtime, harness-trust
// ============================================================================

//! ## Overview
//! The identity hub backs the trust bootstrap: participant contexts, DID
//! publication, credential storage, STS accounts, and the hub's secret
//! store. The embedded launcher wires in-memory implementations into the
//! service registry, preferring capabilities a test registered as mocks
//! before startup.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use harness_core::InMemorySecretStore;
use harness_core::SecretStore;
use harness_runtime::RuntimeError;
use harness_runtime::RuntimeLauncher;
use harness_runtime::ServiceRegistry;
use harness_runtime::ShutdownHandle;
use harness_trust::CredentialStore;
use harness_trust::DidPublisher;
use harness_trust::InMemoryCredentialStore;
use harness_trust::InMemoryDidPublisher;
use harness_trust::InMemoryParticipantContextService;
use harness_trust::InMemoryStsAccountService;
use harness_trust::ParticipantContextService;
use harness_trust::StsAccountService;

// ============================================================================
// SECTION: Launcher
// ============================================================================

/// Embedded identity-hub launcher.
pub struct IdentityHubLauncher;

/// Registers `default` for capability `T` unless a mock is already wired.
fn register_default<T>(registry: &ServiceRegistry, default: Arc<T>) -> Result<(), RuntimeError>
where
    T: ?Sized + Send + Sync + 'static,
{
    if registry.get::<T>().is_err() {
        registry.register(default)?;
    }
    Ok(())
}

#[async_trait]
impl RuntimeLauncher for IdentityHubLauncher {
    async fn launch(
        &self,
        _settings: &harness_core::RuntimeSettings,
        registry: &ServiceRegistry,
    ) -> Result<ShutdownHandle, RuntimeError> {
        // Concrete types stay resolvable so fixtures can reach their
        // read accessors; trait views are what provisioning consumes.
        let contexts = Arc::new(InMemoryParticipantContextService::new());
        register_default::<InMemoryParticipantContextService>(registry, Arc::clone(&contexts))?;
        register_default::<dyn ParticipantContextService>(registry, contexts)?;

        let dids = Arc::new(InMemoryDidPublisher::new());
        register_default::<InMemoryDidPublisher>(registry, Arc::clone(&dids))?;
        register_default::<dyn DidPublisher>(registry, dids)?;

        let credentials = Arc::new(InMemoryCredentialStore::new());
        register_default::<InMemoryCredentialStore>(registry, Arc::clone(&credentials))?;
        register_default::<dyn CredentialStore>(registry, credentials)?;

        let accounts = Arc::new(InMemoryStsAccountService::new());
        register_default::<InMemoryStsAccountService>(registry, Arc::clone(&accounts))?;
        register_default::<dyn StsAccountService>(registry, accounts)?;

        register_default::<dyn SecretStore>(registry, Arc::new(InMemorySecretStore::new()))?;
        Ok(ShutdownHandle::noop())
    }
}
