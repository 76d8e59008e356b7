// crates/harness-runtime/src/orchestrator.rs
// ============================================================================
// Module: Runtime Orchestrator
// Description: Ordered startup, readiness gating, and idempotent teardown.
// Purpose: Own every backing runtime for a test class.
// Dependencies: harness-core, tokio
// ============================================================================

//! ## Overview
//! Startup order is strict and caller-driven: the identity hub (and any
//! database provisioning) starts before control and data planes, which
//! start before trust bootstrap, which precedes any transfer scenario. The
//! orchestrator records start order and tears runtimes down in reverse,
//! stopping every runtime even when one stop fails. A provisioning call
//! against a not-yet-ready runtime is retried through [`readiness_gate`],
//! not by the provisioning code itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use harness_core::PollSpec;
use harness_core::RuntimeSettings;
use harness_core::poll_until_ok;

use crate::container::ContainerRuntime;
use crate::container::ContainerSpec;
use crate::embedded::EmbeddedRuntime;
use crate::embedded::RuntimeLauncher;
use crate::error::RuntimeError;
use crate::events::RuntimeEvent;
use crate::events::RuntimeEventObserver;
use crate::events::RuntimeKind;
use crate::registry::ServiceRegistry;

// ============================================================================
// SECTION: Runtime Handle
// ============================================================================

/// Uniform handle over either runtime backend.
///
/// # Invariants
/// - Owned exclusively by the orchestrator; tests hold only borrows.
pub enum RuntimeHandle {
    /// In-process runtime.
    Embedded(EmbeddedRuntime),
    /// Containerized runtime.
    Container(ContainerRuntime),
}

impl RuntimeHandle {
    /// Returns the runtime name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Embedded(runtime) => runtime.name(),
            Self::Container(runtime) => runtime.name(),
        }
    }

    /// Returns the backend kind.
    #[must_use]
    pub const fn kind(&self) -> RuntimeKind {
        match self {
            Self::Embedded(_) => RuntimeKind::Embedded,
            Self::Container(_) => RuntimeKind::Container,
        }
    }

    /// Looks up an internal collaborator on an embedded runtime.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::ServiceMissing`] for containerized runtimes
    /// (their internals are not reachable in-process) and for unwired
    /// capabilities.
    pub fn service<T>(&self) -> Result<Arc<T>, RuntimeError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        match self {
            Self::Embedded(runtime) => runtime.service::<T>(),
            Self::Container(_) => Err(RuntimeError::ServiceMissing {
                capability: std::any::type_name::<T>(),
            }),
        }
    }

    /// Stops the runtime; idempotent for both backends.
    async fn stop(&mut self) -> Result<(), RuntimeError> {
        match self {
            Self::Embedded(runtime) => {
                runtime.stop().await;
                Ok(())
            }
            Self::Container(runtime) => runtime.stop().await,
        }
    }
}

// ============================================================================
// SECTION: Orchestrator
// ============================================================================

/// Owner of every backing runtime for one test class.
///
/// # Invariants
/// - Start order is recorded; teardown runs in reverse order.
/// - Teardown is attempted for every runtime regardless of failures.
#[derive(Default)]
pub struct Orchestrator {
    /// Started runtimes in start order.
    runtimes: Vec<RuntimeHandle>,
    /// Optional lifecycle-event observer.
    observer: Option<RuntimeEventObserver>,
}

impl Orchestrator {
    /// Creates an orchestrator with no runtimes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a lifecycle-event observer.
    #[must_use]
    pub fn with_observer(mut self, observer: RuntimeEventObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Emits an event to the observer, when installed.
    fn emit(&self, event: &RuntimeEvent) {
        if let Some(observer) = &self.observer {
            observer(event);
        }
    }

    /// Starts an embedded runtime and appends it to the teardown list.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when the launcher fails; the suite must
    /// abort, no partial runtime state is usable.
    pub async fn start_embedded(
        &mut self,
        name: &str,
        settings: &RuntimeSettings,
        launcher: &dyn RuntimeLauncher,
        registry: Arc<ServiceRegistry>,
    ) -> Result<&RuntimeHandle, RuntimeError> {
        self.emit(&RuntimeEvent::Started {
            name: name.to_string(),
            kind: RuntimeKind::Embedded,
        });
        let runtime = EmbeddedRuntime::start(name, settings, launcher, registry).await?;
        self.emit(&RuntimeEvent::Ready {
            name: name.to_string(),
        });
        self.runtimes.push(RuntimeHandle::Embedded(runtime));
        self.runtimes.last().ok_or_else(|| missing_after_push(name))
    }

    /// Starts a containerized runtime and appends it to the teardown list.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when the container cannot start or never
    /// becomes ready.
    pub async fn start_container(
        &mut self,
        name: &str,
        spec: &ContainerSpec,
        settings: &RuntimeSettings,
    ) -> Result<&RuntimeHandle, RuntimeError> {
        self.emit(&RuntimeEvent::Started {
            name: name.to_string(),
            kind: RuntimeKind::Container,
        });
        let runtime = ContainerRuntime::start(name, spec, settings).await?;
        self.emit(&RuntimeEvent::Ready {
            name: name.to_string(),
        });
        self.runtimes.push(RuntimeHandle::Container(runtime));
        self.runtimes.last().ok_or_else(|| missing_after_push(name))
    }

    /// Returns the handle for a runtime name.
    #[must_use]
    pub fn runtime(&self, name: &str) -> Option<&RuntimeHandle> {
        self.runtimes.iter().find(|handle| handle.name() == name)
    }

    /// Stops every runtime in reverse start order.
    ///
    /// Every runtime is stopped even when earlier stops fail; the first
    /// failure is returned afterwards. Calling this twice is harmless.
    ///
    /// # Errors
    ///
    /// Returns the first [`RuntimeError`] observed during teardown.
    pub async fn stop_all(&mut self) -> Result<(), RuntimeError> {
        let mut first_failure = None;
        while let Some(mut handle) = self.runtimes.pop() {
            let name = handle.name().to_string();
            if let Err(err) = handle.stop().await {
                if first_failure.is_none() {
                    first_failure = Some(err);
                }
            }
            self.emit(&RuntimeEvent::Stopped {
                name,
            });
        }
        first_failure.map_or(Ok(()), Err)
    }
}

/// Error for the structurally impossible empty-list case after a push.
fn missing_after_push(name: &str) -> RuntimeError {
    RuntimeError::Startup {
        name: name.to_string(),
        reason: "runtime list empty immediately after push".to_string(),
    }
}

// ============================================================================
// SECTION: Readiness Gate
// ============================================================================

/// Retries a provisioning probe until the target runtime is ready.
///
/// Provisioning code never retries internally; this gate is the single
/// place a not-yet-ready surface is polled.
///
/// # Errors
///
/// Returns [`RuntimeError::ReadinessTimeout`] carrying the final probe
/// failure when the budget is exhausted.
pub async fn readiness_gate<T, E, F, Fut>(
    name: &str,
    spec: PollSpec,
    probe: F,
) -> Result<T, RuntimeError>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    poll_until_ok(spec, probe).await.map_err(|timeout| RuntimeError::ReadinessTimeout {
        name: name.to_string(),
        reason: timeout.to_string(),
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
