// crates/harness-runtime/src/container.rs
// ============================================================================
// Module: Container Runtime
// Description: Out-of-process runtime backend driven by testcontainers.
// Purpose: Run pinned released images against the same semantic settings.
// Dependencies: harness-core, testcontainers
// ============================================================================

//! ## Overview
//! Containerized runtimes receive the env-var serialization of the
//! canonical settings; every value crosses the process boundary as a
//! primitive string. Readiness is gated on a log-line pattern because the
//! harness cannot observe the remote process internally. Containers run
//! with host networking so the loopback endpoints baked into the settings
//! resolve on both sides.

// ============================================================================
// SECTION: Imports
// ============================================================================

use harness_core::RuntimeSettings;
use testcontainers::ContainerAsync;
use testcontainers::GenericImage;
use testcontainers::ImageExt;
use testcontainers::core::WaitFor;
use testcontainers::runners::AsyncRunner;

use crate::error::RuntimeError;

// ============================================================================
// SECTION: Container Specification
// ============================================================================

/// Image and readiness specification for one containerized runtime.
///
/// # Invariants
/// - `ready_log` must appear exactly when the runtime is usable; it is the
///   only readiness signal for this backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    /// Image name without tag.
    pub image: String,
    /// Image tag (a pinned release version).
    pub tag: String,
    /// Container name for diagnostics.
    pub container_name: String,
    /// Log line fragment that signals readiness.
    pub ready_log: String,
    /// Whether the readiness line is written to stderr.
    pub ready_on_stderr: bool,
}

impl ContainerSpec {
    /// Creates a specification with the default readiness marker.
    #[must_use]
    pub fn new(image: &str, tag: &str, container_name: &str) -> Self {
        Self {
            image: image.to_string(),
            tag: tag.to_string(),
            container_name: container_name.to_string(),
            ready_log: "Runtime ready".to_string(),
            ready_on_stderr: false,
        }
    }

    /// Returns the specification with an explicit readiness marker.
    #[must_use]
    pub fn with_ready_log(mut self, ready_log: &str) -> Self {
        self.ready_log = ready_log.to_string();
        self
    }

    /// Returns the specification watching stderr for the marker.
    #[must_use]
    pub const fn with_ready_on_stderr(mut self) -> Self {
        self.ready_on_stderr = true;
        self
    }
}

// ============================================================================
// SECTION: Container Runtime
// ============================================================================

/// Handle over a started containerized runtime.
///
/// # Invariants
/// - Existence implies readiness: start blocks on the readiness log line.
pub struct ContainerRuntime {
    /// Runtime name (unique per orchestrator).
    name: String,
    /// Started container; `None` once stopped.
    container: Option<ContainerAsync<GenericImage>>,
}

impl ContainerRuntime {
    /// Starts a containerized runtime and waits for its readiness log.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Container`] when the image cannot start or
    /// never logs readiness.
    pub async fn start(
        name: &str,
        spec: &ContainerSpec,
        settings: &RuntimeSettings,
    ) -> Result<Self, RuntimeError> {
        let wait = if spec.ready_on_stderr {
            WaitFor::message_on_stderr(spec.ready_log.clone())
        } else {
            WaitFor::message_on_stdout(spec.ready_log.clone())
        };
        let image = GenericImage::new(spec.image.clone(), spec.tag.clone()).with_wait_for(wait);
        let mut request = image
            .with_container_name(spec.container_name.clone())
            .with_network("host");
        for (key, value) in settings.env_map() {
            request = request.with_env_var(key, value);
        }
        let container =
            request.start().await.map_err(|err| RuntimeError::Container(err.to_string()))?;
        Ok(Self {
            name: name.to_string(),
            container: Some(container),
        })
    }

    /// Returns the runtime name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stops the container; idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Container`] when the first stop fails; later
    /// calls are no-ops.
    pub async fn stop(&mut self) -> Result<(), RuntimeError> {
        if let Some(container) = self.container.take() {
            container.stop().await.map_err(|err| RuntimeError::Container(err.to_string()))?;
        }
        Ok(())
    }
}
