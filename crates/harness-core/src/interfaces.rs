// crates/harness-core/src/interfaces.rs
// ============================================================================
// Module: Harness Interfaces
// Description: Backend-agnostic interfaces shared across harness crates.
// Purpose: Define the secret-store contract seeded before protocol calls.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Interface traits abstract over collaborators that live inside a backing
//! runtime. The secret store is seeded with signing keys and OAuth client
//! secrets before any protocol call is made; embedded runtimes expose a
//! direct handle, containerized runtimes are seeded through their
//! configuration surface instead.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;

use thiserror::Error;

// ============================================================================
// SECTION: Secret Store
// ============================================================================

/// Secret store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum SecretStoreError {
    /// The store rejected or failed the operation.
    #[error("secret store unavailable: {0}")]
    Unavailable(String),
}

/// Alias-addressed secret store inside a backing runtime.
pub trait SecretStore: Send + Sync {
    /// Stores a secret under an alias, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`SecretStoreError`] when the store cannot persist the value.
    fn store_secret(&self, alias: &str, value: &str) -> Result<(), SecretStoreError>;

    /// Resolves a secret by alias.
    ///
    /// # Errors
    ///
    /// Returns [`SecretStoreError`] when the store cannot be read.
    fn resolve_secret(&self, alias: &str) -> Result<Option<String>, SecretStoreError>;
}

// ============================================================================
// SECTION: In-Memory Secret Store
// ============================================================================

/// In-memory secret store used by embedded runtimes.
///
/// # Invariants
/// - Aliases are unique; a second store under the same alias replaces the
///   first.
#[derive(Debug, Default)]
pub struct InMemorySecretStore {
    /// Alias-to-value entries.
    entries: Mutex<BTreeMap<String, String>>,
}

impl InMemorySecretStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for InMemorySecretStore {
    fn store_secret(&self, alias: &str, value: &str) -> Result<(), SecretStoreError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| SecretStoreError::Unavailable("store lock poisoned".to_string()))?;
        guard.insert(alias.to_string(), value.to_string());
        Ok(())
    }

    fn resolve_secret(&self, alias: &str) -> Result<Option<String>, SecretStoreError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| SecretStoreError::Unavailable("store lock poisoned".to_string()))?;
        Ok(guard.get(alias).cloned())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
