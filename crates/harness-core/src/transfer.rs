// crates/harness-core/src/transfer.rs
// ============================================================================
// Module: Transfer Process Model
// Description: Externally-owned transfer state and endpoint data references.
// Purpose: Model the observables the harness polls; never mutated locally.
// Dependencies: serde, url
// ============================================================================

//! ## Overview
//! A transfer process lives inside the runtimes under test. The harness
//! issues protocol requests and observes the resulting state transitions by
//! polling; it never drives the state machine itself. The endpoint data
//! reference (EDR) is a short-lived bearer token scoped to one transfer
//! process: it exists only while the process is `STARTED`, and any
//! transition away from `STARTED` eventually makes retrieval and use fail.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::identifiers::TransferProcessId;

// ============================================================================
// SECTION: Transfer Process State
// ============================================================================

/// Externally-driven transfer process states, observed via polling.
///
/// # Invariants
/// - Wire form is stable SCREAMING_SNAKE_CASE.
/// - The harness treats transitions as eventually observable, never atomic
///   with EDR availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferProcessState {
    /// Process created locally, nothing sent yet.
    Initial,
    /// Provider-side resource provisioning in progress.
    Provisioning,
    /// Provider-side resources provisioned.
    Provisioned,
    /// Transfer request being sent to the counterparty.
    Requesting,
    /// Transfer request acknowledged by the counterparty.
    Requested,
    /// Data flow is being established.
    Starting,
    /// Data flow established; an EDR exists for pull transfers.
    Started,
    /// Suspension requested.
    Suspending,
    /// Data flow suspended; the EDR is revoked.
    Suspended,
    /// Resumption requested.
    Resuming,
    /// Completion signalled.
    Completing,
    /// Transfer completed.
    Completed,
    /// Termination requested.
    Terminating,
    /// Transfer terminated; the EDR is revoked.
    Terminated,
    /// Provisioned resources being released.
    Deprovisioning,
    /// All resources released.
    Deprovisioned,
}

impl TransferProcessState {
    /// Returns the stable wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "INITIAL",
            Self::Provisioning => "PROVISIONING",
            Self::Provisioned => "PROVISIONED",
            Self::Requesting => "REQUESTING",
            Self::Requested => "REQUESTED",
            Self::Starting => "STARTING",
            Self::Started => "STARTED",
            Self::Suspending => "SUSPENDING",
            Self::Suspended => "SUSPENDED",
            Self::Resuming => "RESUMING",
            Self::Completing => "COMPLETING",
            Self::Completed => "COMPLETED",
            Self::Terminating => "TERMINATING",
            Self::Terminated => "TERMINATED",
            Self::Deprovisioning => "DEPROVISIONING",
            Self::Deprovisioned => "DEPROVISIONED",
        }
    }

    /// Parses the stable wire form.
    #[must_use]
    pub fn parse(wire: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(wire.to_string())).ok()
    }

    /// Returns `true` for states no further transition leaves.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Terminated | Self::Deprovisioned)
    }
}

impl fmt::Display for TransferProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Protocol Version and Transfer Type
// ============================================================================

/// Dataspace protocol version carried explicitly on every transfer request.
///
/// # Invariants
/// - Never inferred; scenario arguments select the version under test.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtocolVersion(String);

impl ProtocolVersion {
    /// Creates a protocol version tag.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    /// Returns the version tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transfer type carried explicitly on every transfer request.
///
/// # Invariants
/// - Never inferred; `HttpData-PULL` and `HttpData-PUSH` are the tested
///   values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferType(String);

impl TransferType {
    /// Pull-style HTTP data transfer.
    #[must_use]
    pub fn http_pull() -> Self {
        Self("HttpData-PULL".to_string())
    }

    /// Push-style HTTP data transfer.
    #[must_use]
    pub fn http_push() -> Self {
        Self("HttpData-PUSH".to_string())
    }

    /// Creates an explicit transfer type tag.
    #[must_use]
    pub fn new(transfer_type: impl Into<String>) -> Self {
        Self(transfer_type.into())
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// SECTION: Endpoint Data Reference
// ============================================================================

/// Short-lived bearer token scoped to one transfer process.
///
/// # Invariants
/// - Exists iff the owning process is `STARTED`.
/// - Becoming unusable after suspend/terminate/expiry is an eventually
///   observable postcondition, not an immediate one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDataReference {
    /// Transfer process the reference is scoped to.
    #[serde(rename = "transferProcessId")]
    pub transfer_process_id: TransferProcessId,
    /// Public data-plane endpoint to pull from.
    pub endpoint: Url,
    /// Bearer authorization token.
    pub authorization: String,
}

// ============================================================================
// SECTION: Tests
// ============================================================================
