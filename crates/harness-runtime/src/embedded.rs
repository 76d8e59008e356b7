// crates/harness-runtime/src/embedded.rs
// ============================================================================
// Module: Embedded Runtime
// Description: In-process runtime backend launched from dotted settings.
// Purpose: Fast single-host runs with direct service access.
// Dependencies: async-trait, harness-core, tokio
// ============================================================================

//! ## Overview
//! An embedded runtime lives in the harness process. A launcher consumes
//! the dotted-key serialization of the canonical settings, wires its
//! collaborators into the shared service registry, and returns only once
//! startup has completed — readiness is process-internal, no log scraping.
//! The returned shutdown handle makes stopping idempotent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use harness_core::RuntimeSettings;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::RuntimeError;
use crate::registry::ServiceRegistry;

// ============================================================================
// SECTION: Shutdown Handle
// ============================================================================

/// Idempotent shutdown hook returned by a launcher.
///
/// # Invariants
/// - `stop` may be called any number of times; only the first has effect.
#[derive(Debug)]
pub struct ShutdownHandle {
    /// Graceful-shutdown trigger, consumed on first stop.
    trigger: Option<oneshot::Sender<()>>,
    /// Serving task, awaited on first stop.
    join: Option<JoinHandle<()>>,
}

impl ShutdownHandle {
    /// Creates a handle from a shutdown trigger and a serving task.
    #[must_use]
    pub const fn new(trigger: oneshot::Sender<()>, join: JoinHandle<()>) -> Self {
        Self {
            trigger: Some(trigger),
            join: Some(join),
        }
    }

    /// Creates a handle for launchers with nothing to stop.
    #[must_use]
    pub const fn noop() -> Self {
        Self {
            trigger: None,
            join: None,
        }
    }

    /// Stops the runtime; subsequent calls are no-ops.
    pub async fn stop(&mut self) {
        if let Some(trigger) = self.trigger.take() {
            let _ = trigger.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.await;
        }
    }
}

// ============================================================================
// SECTION: Launcher
// ============================================================================

/// Launches a runtime inside the harness process.
#[async_trait]
pub trait RuntimeLauncher: Send + Sync {
    /// Launches the runtime from its settings, wiring collaborators into
    /// the registry, and returns once startup has completed.
    ///
    /// Registered mocks are visible in `registry`; launchers must prefer an
    /// already-registered capability over their default collaborator.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Startup`] when the runtime cannot start.
    async fn launch(
        &self,
        settings: &RuntimeSettings,
        registry: &ServiceRegistry,
    ) -> Result<ShutdownHandle, RuntimeError>;
}

// ============================================================================
// SECTION: Embedded Runtime
// ============================================================================

/// Handle over a started in-process runtime.
///
/// # Invariants
/// - Existence implies readiness: construction awaits launcher completion
///   and seals the registry.
#[derive(Debug)]
pub struct EmbeddedRuntime {
    /// Runtime name (unique per orchestrator).
    name: String,
    /// Shared collaborator registry, sealed at readiness.
    registry: Arc<ServiceRegistry>,
    /// Shutdown hook.
    shutdown: ShutdownHandle,
}

impl EmbeddedRuntime {
    /// Starts an embedded runtime and waits for internal readiness.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Startup`] when the launcher fails.
    pub async fn start(
        name: &str,
        settings: &RuntimeSettings,
        launcher: &dyn RuntimeLauncher,
        registry: Arc<ServiceRegistry>,
    ) -> Result<Self, RuntimeError> {
        let shutdown = launcher.launch(settings, &registry).await?;
        registry.seal();
        Ok(Self {
            name: name.to_string(),
            registry,
            shutdown,
        })
    }

    /// Returns the runtime name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up an internal collaborator; valid because the runtime is
    /// ready once the handle exists.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::ServiceMissing`] when the capability was
    /// never wired.
    pub fn service<T>(&self) -> Result<Arc<T>, RuntimeError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.registry.get::<T>()
    }

    /// Stops the runtime; idempotent.
    pub async fn stop(&mut self) {
        self.shutdown.stop().await;
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
