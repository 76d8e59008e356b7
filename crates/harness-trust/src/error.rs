// crates/harness-trust/src/error.rs
// ============================================================================
// Module: Trust Errors
// Description: Error kinds for key handling, signing, and provisioning.
// Purpose: Keep fatal bootstrap failures distinct from transient ones.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Signing failures are cryptographic and fatal: the bootstrap aborts.
//! Provisioning failures are fatal when they occur before any scenario has
//! started; readiness-related transients are retried by the orchestrator's
//! readiness gate before calls reach this crate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Error Type
// ============================================================================

/// Trust bootstrap errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - `Signing` and `Provisioning` abort the suite; they are never retried.
#[derive(Debug, Error)]
pub enum TrustError {
    /// Key material could not be generated or serialized.
    #[error("key handling failed: {0}")]
    Key(String),
    /// A credential could not be signed; fatal, aborts the bootstrap.
    #[error("credential signing failed: {0}")]
    Signing(String),
    /// A signed credential failed verification against the issuer key.
    #[error("credential verification failed: {0}")]
    Verification(String),
    /// Participant-context provisioning failed; fatal before scenarios.
    #[error("provisioning failed: {0}")]
    Provisioning(String),
}
