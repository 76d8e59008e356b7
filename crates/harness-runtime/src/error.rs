// crates/harness-runtime/src/error.rs
// ============================================================================
// Module: Runtime Errors
// Description: Error kinds for runtime startup, lookup, and teardown.
// Purpose: Keep orchestration failures distinct and suite-fatal.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Orchestration failures abort the whole suite: a runtime that failed to
//! start or become ready leaves no partial state worth testing against.
//! Service lookup and mock-registration misuse are reported with stable
//! variants so fixtures can assert on them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Error Type
// ============================================================================

/// Runtime orchestration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The runtime failed to launch.
    #[error("runtime `{name}` failed to start: {reason}")]
    Startup {
        /// Runtime name.
        name: String,
        /// Failure detail.
        reason: String,
    },
    /// The runtime never signalled readiness within its budget.
    #[error("runtime `{name}` not ready: {reason}")]
    ReadinessTimeout {
        /// Runtime name.
        name: String,
        /// Timeout detail including attempts and elapsed time.
        reason: String,
    },
    /// A requested capability is not registered.
    #[error("no service registered for capability `{capability}`")]
    ServiceMissing {
        /// Capability type name.
        capability: &'static str,
    },
    /// A mock was registered after the runtime was marked ready.
    #[error("registration for `{capability}` rejected: registry sealed at readiness")]
    RegistrationSealed {
        /// Capability type name.
        capability: &'static str,
    },
    /// The containerized backend reported an error.
    #[error("container backend error: {0}")]
    Container(String),
}
