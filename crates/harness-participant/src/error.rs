// crates/harness-participant/src/error.rs
// ============================================================================
// Module: Participant Errors
// Description: Error kinds for construction, clients, and lifecycle polls.
// Purpose: Keep conflicts, transients, and timeouts programmatically
//          distinguishable.
// Dependencies: harness-core, thiserror
// ============================================================================

//! ## Overview
//! Three layers of failure: construction (a missing required field fails
//! fast with the field name), client calls (where a 409 is a first-class
//! outcome scenarios assert on, and a 404 is a legitimate transient during
//! polling), and lifecycle polls (where a timeout names the process, the
//! expected state, and the last observed state so failures reproduce
//! without re-running).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use harness_core::TransferProcessId;
use harness_core::TransferProcessState;
use thiserror::Error;

// ============================================================================
// SECTION: Construction Errors
// ============================================================================

/// Participant construction errors.
///
/// # Invariants
/// - `MissingField` names the exact field for fail-fast diagnostics.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required configuration field was not supplied.
    #[error("participant configuration missing required field `{0}`")]
    MissingField(&'static str),
    /// Endpoint allocation or parsing failed.
    #[error("participant endpoint error: {0}")]
    Endpoint(String),
    /// Key material could not be exported for configuration.
    #[error("participant key export failed: {0}")]
    Key(String),
}

// ============================================================================
// SECTION: Client Errors
// ============================================================================

/// Management and data-plane client errors.
///
/// # Invariants
/// - `Conflict` is an asserted outcome, not a failure to be tolerated.
/// - `NotFound` is legitimate while polling; a failure only after timeout.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure.
    #[error("http transport error: {0}")]
    Http(String),
    /// The remote system correctly rejected a disallowed operation.
    #[error("remote rejected the operation with a conflict: {body}")]
    Conflict {
        /// Response body describing the conflict.
        body: String,
    },
    /// An expected resource or EDR is absent at call time.
    #[error("{what} not found")]
    NotFound {
        /// Description of the missing resource.
        what: String,
    },
    /// The remote answered with an unexpected status.
    #[error("expected status {expected} but was {actual}: {body}")]
    UnexpectedStatus {
        /// Status the harness expected.
        expected: u16,
        /// Status the remote returned.
        actual: u16,
        /// Response body for diagnostics.
        body: String,
    },
    /// A response body could not be decoded.
    #[error("response decoding failed: {0}")]
    Decode(String),
    /// A required request parameter was never supplied.
    #[error("transfer request missing required parameter `{0}`")]
    MissingParameter(&'static str),
}

impl ClientError {
    /// Returns `true` for the conflict outcome scenarios assert on.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Returns `true` for the legitimate-transient not-found outcome.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ============================================================================
// SECTION: Lifecycle Errors
// ============================================================================

/// Transfer-lifecycle verification errors.
///
/// # Invariants
/// - `Timeout` carries identifier, expected state, last observed state, and
///   elapsed time.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A polled lifecycle postcondition never became true.
    #[error(
        "transfer `{process}` did not reach {expected} within {elapsed:?} \
         (last observed: {})",
        .last_observed.map_or("none", TransferProcessState::as_str)
    )]
    Timeout {
        /// Transfer process identifier.
        process: TransferProcessId,
        /// State the poll waited for.
        expected: TransferProcessState,
        /// Last state observed before the budget ran out.
        last_observed: Option<TransferProcessState>,
        /// Elapsed wall-clock time.
        elapsed: Duration,
    },
    /// An EDR-related postcondition never became true.
    #[error("edr postcondition for transfer `{process}` not reached: {reason}")]
    EdrTimeout {
        /// Transfer process identifier.
        process: TransferProcessId,
        /// Timeout detail including the last observed error.
        reason: String,
    },
    /// No counterparty-side process correlated to a local process in time.
    #[error("no counterparty process correlated to `{process}`: {reason}")]
    Correlation {
        /// Local transfer process identifier.
        process: TransferProcessId,
        /// Timeout detail.
        reason: String,
    },
    /// A conflict rejection was expected but did not occur.
    #[error("expected a conflict rejection for transfer `{process}`, got: {outcome}")]
    ConflictExpected {
        /// Transfer process identifier.
        process: TransferProcessId,
        /// What actually happened instead of the conflict.
        outcome: String,
    },
    /// An underlying client call failed outside a polling loop.
    #[error(transparent)]
    Client(#[from] ClientError),
}
