// crates/harness-participant/src/request.rs
// ============================================================================
// Module: Transfer Request
// Description: Builder for protocol-level transfer requests.
// Purpose: Make protocol version and transfer type explicit, never inferred.
// Dependencies: harness-core, serde_json
// ============================================================================

//! ## Overview
//! A transfer request names its asset, counterparty, protocol version, and
//! transfer type explicitly. The builder collects optional callback
//! addresses and submits on `execute`, returning the consumer-local
//! transfer-process id. A missing transfer type fails fast rather than
//! being defaulted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use harness_core::AssetId;
use harness_core::ParticipantId;
use harness_core::ProtocolVersion;
use harness_core::TransferProcessId;
use harness_core::TransferType;
use serde_json::Value;
use serde_json::json;

use crate::client::ManagementClient;
use crate::error::ClientError;

// ============================================================================
// SECTION: Callback Address
// ============================================================================

/// Callback registration carried on a transfer request.
///
/// # Invariants
/// - `events` name the event kinds delivered to `uri`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackAddress {
    /// Callback endpoint URI.
    pub uri: String,
    /// Event kinds to deliver (for example `transfer.process.started`).
    pub events: Vec<String>,
    /// Whether delivery participates in the state transition.
    pub transactional: bool,
}

impl CallbackAddress {
    /// Returns the wire representation.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "@type": "CallbackAddress",
            "uri": self.uri,
            "events": self.events,
            "transactional": self.transactional,
        })
    }
}

// ============================================================================
// SECTION: Transfer Request
// ============================================================================

/// Builder for one transfer request against a counterparty.
///
/// # Invariants
/// - Protocol version is fixed at construction; transfer type must be set
///   before `execute`.
#[derive(Debug)]
pub struct TransferRequest<'a> {
    /// Client the request is submitted through.
    client: &'a ManagementClient,
    /// Asset to transfer.
    asset_id: AssetId,
    /// Counterparty participant id.
    counterparty_id: ParticipantId,
    /// Counterparty DSP endpoint.
    counterparty_address: String,
    /// Protocol version, explicit per request.
    protocol: ProtocolVersion,
    /// Transfer type, explicit per request.
    transfer_type: Option<TransferType>,
    /// Registered callback addresses.
    callbacks: Vec<CallbackAddress>,
}

impl<'a> TransferRequest<'a> {
    /// Creates a builder for an asset and counterparty.
    #[must_use]
    pub const fn new(
        client: &'a ManagementClient,
        asset_id: AssetId,
        counterparty_id: ParticipantId,
        counterparty_address: String,
        protocol: ProtocolVersion,
    ) -> Self {
        Self {
            client,
            asset_id,
            counterparty_id,
            counterparty_address,
            protocol,
            transfer_type: None,
            callbacks: Vec::new(),
        }
    }

    /// Sets the explicit transfer type.
    #[must_use]
    pub fn with_transfer_type(mut self, transfer_type: TransferType) -> Self {
        self.transfer_type = Some(transfer_type);
        self
    }

    /// Registers callback addresses for transfer events.
    #[must_use]
    pub fn with_callbacks(mut self, callbacks: Vec<CallbackAddress>) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Returns the wire representation of the request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingParameter`] when the transfer type was
    /// never set.
    pub fn to_json(&self) -> Result<Value, ClientError> {
        let transfer_type =
            self.transfer_type.as_ref().ok_or(ClientError::MissingParameter("transferType"))?;
        let callbacks: Vec<Value> =
            self.callbacks.iter().map(CallbackAddress::to_json).collect();
        Ok(json!({
            "@type": "TransferRequest",
            "assetId": self.asset_id,
            "counterPartyId": self.counterparty_id,
            "counterPartyAddress": self.counterparty_address,
            "protocol": self.protocol,
            "transferType": transfer_type,
            "callbackAddresses": callbacks,
        }))
    }

    /// Submits the request and returns the local transfer-process id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when required parameters are missing or the
    /// submission fails.
    pub async fn execute(self) -> Result<TransferProcessId, ClientError> {
        let request = self.to_json()?;
        self.client.request_transfer(&request).await
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
