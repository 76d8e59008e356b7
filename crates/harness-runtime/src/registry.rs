// crates/harness-runtime/src/registry.rs
// ============================================================================
// Module: Service Registry
// Description: Typed capability registry for runtime-internal collaborators.
// Purpose: Service lookup and mock substitution with readiness sealing.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Embedded runtimes expose internal collaborators (secret store, identity
//! services) through a typed registry so tests can seed and inspect state
//! directly. A test double may replace a capability only before the runtime
//! is marked ready; afterwards the registry is sealed and registration
//! fails with a stable error rather than leaving behavior undefined.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::any::TypeId;
use std::any::type_name;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use crate::error::RuntimeError;

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Typed registry of shared runtime collaborators.
///
/// # Invariants
/// - At most one service per capability type; later registrations replace
///   earlier ones until the registry is sealed.
/// - Sealing is one-way and happens when the owning runtime becomes ready.
#[derive(Default)]
pub struct ServiceRegistry {
    /// Capability entries keyed by `Arc<T>` type id.
    entries: Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
    /// Set once the owning runtime is ready; registration is rejected after.
    sealed: AtomicBool,
}

impl ServiceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the service for a capability.
    ///
    /// Mock substitution uses the same entry point: registering before the
    /// runtime starts replaces the default collaborator.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::RegistrationSealed`] once the owning runtime
    /// has been marked ready.
    pub fn register<T>(&self, service: Arc<T>) -> Result<(), RuntimeError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        if self.sealed.load(Ordering::SeqCst) {
            return Err(RuntimeError::RegistrationSealed {
                capability: type_name::<T>(),
            });
        }
        let mut guard = self.entries.lock().map_err(|_| RuntimeError::Startup {
            name: "service-registry".to_string(),
            reason: "registry lock poisoned".to_string(),
        })?;
        guard.insert(TypeId::of::<Arc<T>>(), Box::new(service));
        Ok(())
    }

    /// Looks up the service registered for a capability.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::ServiceMissing`] when no service of the
    /// requested capability is registered.
    pub fn get<T>(&self) -> Result<Arc<T>, RuntimeError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let guard = self.entries.lock().map_err(|_| RuntimeError::Startup {
            name: "service-registry".to_string(),
            reason: "registry lock poisoned".to_string(),
        })?;
        guard
            .get(&TypeId::of::<Arc<T>>())
            .and_then(|entry| entry.downcast_ref::<Arc<T>>())
            .cloned()
            .ok_or(RuntimeError::ServiceMissing {
                capability: type_name::<T>(),
            })
    }

    /// Seals the registry; called when the owning runtime becomes ready.
    pub fn seal(&self) {
        self.sealed.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once sealed.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry").field("sealed", &self.is_sealed()).finish()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
