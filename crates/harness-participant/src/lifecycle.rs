// crates/harness-participant/src/lifecycle.rs
// ============================================================================
// Module: Transfer Lifecycle Verifier
// Description: Polling verification of externally-driven transfer flows.
// Purpose: Drive request/suspend/resume/terminate flows and assert their
//          observables within bounded budgets.
// Dependencies: harness-core, serde_json
// ============================================================================

//! ## Overview
//! The lifecycle verifier sits on top of the management client: every
//! triggering action (request, suspend, resume, terminate) is followed by
//! bounded polling of the observable it should move. Lifecycle state and
//! EDR availability are polled independently — they become consistent
//! eventually, never atomically. A deprovision attempt against a `STARTED`
//! process must be rejected with a conflict, and that rejection is itself a
//! checked postcondition.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;

use harness_core::AssetId;
use harness_core::ContractDefinitionId;
use harness_core::EndpointDataReference;
use harness_core::PolicyDefinitionId;
use harness_core::ProtocolVersion;
use harness_core::TransferProcessId;
use harness_core::TransferProcessState;
use harness_core::poll_until;
use harness_core::poll_until_err;
use harness_core::poll_until_ok;
use serde_json::Value;
use serde_json::json;

use crate::error::ClientError;
use crate::error::LifecycleError;
use crate::participant::Participant;
use crate::policy::no_constraint_policy;
use crate::request::TransferRequest;

// ============================================================================
// SECTION: Resource Operations
// ============================================================================

impl Participant {
    /// Registers an asset, a permissive access policy, the supplied
    /// contract policy, and one contract definition binding them.
    ///
    /// Identifiers are random per call so concurrent scenarios cannot
    /// collide.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Conflict`] when an identifier collides and
    /// other [`ClientError`] variants for transport failures.
    pub async fn create_resource(
        &self,
        data_address: Value,
        contract_policy: Value,
    ) -> Result<AssetId, ClientError> {
        let asset_id = AssetId::random();
        let access_policy_id = PolicyDefinitionId::random();
        let contract_policy_id = PolicyDefinitionId::random();
        let definition_id = ContractDefinitionId::random();

        self.client()
            .create_asset(&json!({
                "@id": asset_id,
                "properties": { "name": "transfer-test" },
                "dataAddress": data_address,
            }))
            .await?;
        self.client()
            .create_policy_definition(&json!({
                "@id": access_policy_id,
                "policy": no_constraint_policy(),
            }))
            .await?;
        self.client()
            .create_policy_definition(&json!({
                "@id": contract_policy_id,
                "policy": contract_policy,
            }))
            .await?;
        self.client()
            .create_contract_definition(&json!({
                "@id": definition_id,
                "accessPolicyId": access_policy_id,
                "contractPolicyId": contract_policy_id,
                "assetsSelector": [{
                    "operandLeft": "id",
                    "operator": "=",
                    "operandRight": asset_id,
                }],
            }))
            .await?;
        Ok(asset_id)
    }

    /// Builds a transfer request for an asset held by a counterparty.
    ///
    /// Protocol version is explicit; the transfer type must be set on the
    /// returned builder.
    #[must_use]
    pub fn request_asset_from(
        &self,
        asset_id: &AssetId,
        provider: &Self,
        protocol: &ProtocolVersion,
    ) -> TransferRequest<'_> {
        TransferRequest::new(
            self.client(),
            asset_id.clone(),
            provider.id().clone(),
            provider.endpoints().protocol.to_string(),
            protocol.clone(),
        )
    }
}

// ============================================================================
// SECTION: State Verification
// ============================================================================

impl Participant {
    /// Polls until the observed state equals the target.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Timeout`] naming the process, the expected
    /// state, the last observed state, and the elapsed time.
    pub async fn await_transfer_state(
        &self,
        id: &TransferProcessId,
        expected: TransferProcessState,
    ) -> Result<(), LifecycleError> {
        let client = self.client();
        let observed = Mutex::new(None);
        let observed_ref = &observed;
        let outcome = poll_until(self.timeout(), move || async move {
            match client.transfer_state(id).await {
                Ok(state) => {
                    if let Ok(mut guard) = observed_ref.lock() {
                        *guard = Some(state);
                    }
                    (state == expected).then_some(())
                }
                Err(_) => None,
            }
        })
        .await;
        outcome.map_err(|timeout| LifecycleError::Timeout {
            process: id.clone(),
            expected,
            last_observed: observed.lock().ok().and_then(|guard| *guard),
            elapsed: timeout.elapsed,
        })
    }

    /// Polls until an active EDR is retrievable for the process.
    ///
    /// A `NotFound` along the way is a legitimate transient; only the final
    /// failure is reported.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::EdrTimeout`] when no EDR appears in time.
    pub async fn await_edr(
        &self,
        id: &TransferProcessId,
    ) -> Result<EndpointDataReference, LifecycleError> {
        let client = self.client();
        poll_until_ok(self.timeout(), move || async move { client.edr(id).await })
            .await
            .map_err(|timeout| LifecycleError::EdrTimeout {
                process: id.clone(),
                reason: timeout.to_string(),
            })
    }

    /// Polls until EDR retrieval fails for the process.
    ///
    /// Used after suspend, terminate, and contract expiry: revocation is an
    /// eventually-observable postcondition.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::EdrTimeout`] when retrieval keeps
    /// succeeding for the whole budget.
    pub async fn await_edr_unavailable(
        &self,
        id: &TransferProcessId,
    ) -> Result<(), LifecycleError> {
        let client = self.client();
        poll_until_err(self.timeout(), move || async move { client.edr(id).await })
            .await
            .map_err(|timeout| LifecycleError::EdrTimeout {
                process: id.clone(),
                reason: format!("edr still retrievable: {timeout}"),
            })
    }
}

// ============================================================================
// SECTION: Data Verification
// ============================================================================

impl Participant {
    /// Pulls data once through an EDR.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the token is rejected or transport
    /// fails.
    pub async fn pull_data(
        &self,
        edr: &EndpointDataReference,
        params: &BTreeMap<String, String>,
    ) -> Result<String, ClientError> {
        self.client().pull_data(edr, params).await
    }

    /// Polls until a pull through the EDR returns the expected body.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::EdrTimeout`] when the body never matches
    /// within the budget.
    pub async fn await_pull(
        &self,
        edr: &EndpointDataReference,
        params: &BTreeMap<String, String>,
        expected_body: &str,
    ) -> Result<(), LifecycleError> {
        let client = self.client();
        let outcome = poll_until(self.timeout(), move || async move {
            match client.pull_data(edr, params).await {
                Ok(body) if body == expected_body => Some(()),
                Ok(_) | Err(_) => None,
            }
        })
        .await;
        outcome.map_err(|timeout| LifecycleError::EdrTimeout {
            process: edr.transfer_process_id.clone(),
            reason: format!("pull never returned expected body: {timeout}"),
        })
    }

    /// Polls until pulls through the EDR fail.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::EdrTimeout`] when pulls keep succeeding
    /// for the whole budget.
    pub async fn await_pull_failure(
        &self,
        edr: &EndpointDataReference,
        params: &BTreeMap<String, String>,
    ) -> Result<(), LifecycleError> {
        let client = self.client();
        poll_until_err(self.timeout(), move || async move { client.pull_data(edr, params).await })
            .await
            .map_err(|timeout| LifecycleError::EdrTimeout {
                process: edr.transfer_process_id.clone(),
                reason: format!("pull still succeeding: {timeout}"),
            })
    }
}

// ============================================================================
// SECTION: State-Change Requests
// ============================================================================

impl Participant {
    /// Requests suspension of a transfer process.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request fails.
    pub async fn suspend_transfer(
        &self,
        id: &TransferProcessId,
        reason: &str,
    ) -> Result<(), ClientError> {
        self.client().suspend_transfer(id, reason).await
    }

    /// Requests resumption of a transfer process.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request fails.
    pub async fn resume_transfer(&self, id: &TransferProcessId) -> Result<(), ClientError> {
        self.client().resume_transfer(id).await
    }

    /// Requests termination of a transfer process.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request fails.
    pub async fn terminate_transfer(&self, id: &TransferProcessId) -> Result<(), ClientError> {
        self.client().terminate_transfer(id).await
    }

    /// Requests deprovisioning of a transfer process.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request fails, including the
    /// conflict rejection expected while `STARTED`.
    pub async fn deprovision_transfer(&self, id: &TransferProcessId) -> Result<(), ClientError> {
        self.client().deprovision_transfer(id).await
    }

    /// Asserts that deprovisioning is rejected with a conflict.
    ///
    /// The rejection is the postcondition; anything else — success or a
    /// different failure — is a verification error.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::ConflictExpected`] when the remote did not
    /// reject with a conflict.
    pub async fn expect_deprovision_conflict(
        &self,
        id: &TransferProcessId,
    ) -> Result<(), LifecycleError> {
        match self.deprovision_transfer(id).await {
            Err(err) if err.is_conflict() => Ok(()),
            Ok(()) => Err(LifecycleError::ConflictExpected {
                process: id.clone(),
                outcome: "deprovision succeeded".to_string(),
            }),
            Err(err) => Err(LifecycleError::ConflictExpected {
                process: id.clone(),
                outcome: err.to_string(),
            }),
        }
    }

    /// Finds the local process correlated to a counterparty's process id.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Correlation`] when no correlated process
    /// appears within the budget.
    pub async fn correlated_process(
        &self,
        counterparty_process: &TransferProcessId,
    ) -> Result<TransferProcessId, LifecycleError> {
        let client = self.client();
        let outcome = poll_until(self.timeout(), move || async move {
            let processes = client.transfer_processes().await.ok()?;
            processes.iter().find_map(|process| {
                let correlation = process["correlationId"].as_str()?;
                if correlation == counterparty_process.as_str() {
                    process["@id"].as_str().map(|id| TransferProcessId::new(id.to_string()))
                } else {
                    None
                }
            })
        })
        .await;
        outcome.map_err(|timeout| LifecycleError::Correlation {
            process: counterparty_process.clone(),
            reason: timeout.to_string(),
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
