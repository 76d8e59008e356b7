// crates/harness-participant/src/client.rs
// ============================================================================
// Module: Management Client
// Description: Authenticated client for a participant's management surface.
// Purpose: Issue protocol requests and read transfer observables over HTTP.
// Dependencies: harness-core, reqwest, serde_json
// ============================================================================

//! ## Overview
//! Every call goes through the participant's management endpoint with its
//! default headers (the shared API key). Status handling is uniform: a 409
//! surfaces as [`ClientError::Conflict`] so scenarios can assert on it, a
//! 404 surfaces as [`ClientError::NotFound`] because absence is legitimate
//! while polling, and anything else unexpected carries both status codes
//! and the response body.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::Duration;

use harness_core::Endpoint;
use harness_core::EndpointDataReference;
use harness_core::TransferProcessId;
use harness_core::TransferProcessState;
use serde_json::Value;
use serde_json::json;

use crate::error::ClientError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Request timeout for every management call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// SECTION: Client
// ============================================================================

/// Authenticated management-API client for one participant.
///
/// # Invariants
/// - Default endpoint headers are applied to every request.
#[derive(Debug, Clone)]
pub struct ManagementClient {
    /// Underlying HTTP client.
    http: reqwest::Client,
    /// Management endpoint with default headers.
    management: Endpoint,
}

impl ManagementClient {
    /// Creates a client bound to a management endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] when the HTTP client cannot be built.
    pub fn new(management: Endpoint) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ClientError::Http(err.to_string()))?;
        Ok(Self {
            http,
            management,
        })
    }

    /// Builds a request against a management path with default headers.
    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let url =
            self.management.resolve(path).map_err(|err| ClientError::Http(err.to_string()))?;
        let mut builder = self.http.request(method, url);
        for (name, value) in self.management.headers() {
            builder = builder.header(name, value);
        }
        Ok(builder)
    }

    /// Sends a request and enforces the expected status.
    ///
    /// Returns the response body on success; maps 409 to `Conflict` and
    /// 404 to `NotFound`.
    async fn send_expect(
        &self,
        builder: reqwest::RequestBuilder,
        expected: u16,
        context: &str,
    ) -> Result<String, ClientError> {
        let response = builder.send().await.map_err(|err| ClientError::Http(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        if status == expected {
            return Ok(body);
        }
        match status {
            409 => Err(ClientError::Conflict {
                body,
            }),
            404 => Err(ClientError::NotFound {
                what: context.to_string(),
            }),
            _ => Err(ClientError::UnexpectedStatus {
                expected,
                actual: status,
                body,
            }),
        }
    }

    /// Extracts the `@id` member of a creation response.
    fn extract_id(body: &str) -> Result<String, ClientError> {
        let value: Value =
            serde_json::from_str(body).map_err(|err| ClientError::Decode(err.to_string()))?;
        value["@id"]
            .as_str()
            .map(ToString::to_string)
            .ok_or_else(|| ClientError::Decode(format!("response has no `@id`: {body}")))
    }
}

// ============================================================================
// SECTION: Resource Operations
// ============================================================================

impl ManagementClient {
    /// Registers an asset; a colliding identifier yields `Conflict`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, identifier collision,
    /// or unexpected status.
    pub async fn create_asset(&self, asset: &Value) -> Result<(), ClientError> {
        let request = self.request(reqwest::Method::POST, "v3/assets")?.json(asset);
        self.send_expect(request, 200, "asset").await.map(|_| ())
    }

    /// Registers a policy definition.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, identifier collision,
    /// or unexpected status.
    pub async fn create_policy_definition(&self, definition: &Value) -> Result<(), ClientError> {
        let request = self.request(reqwest::Method::POST, "v3/policydefinitions")?.json(definition);
        self.send_expect(request, 200, "policy definition").await.map(|_| ())
    }

    /// Registers a contract definition binding an asset to its policies.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, identifier collision,
    /// or unexpected status.
    pub async fn create_contract_definition(&self, definition: &Value) -> Result<(), ClientError> {
        let request =
            self.request(reqwest::Method::POST, "v3/contractdefinitions")?.json(definition);
        self.send_expect(request, 200, "contract definition").await.map(|_| ())
    }
}

// ============================================================================
// SECTION: Transfer Operations
// ============================================================================

impl ManagementClient {
    /// Submits a transfer request and returns the local process id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or unexpected status.
    pub async fn request_transfer(
        &self,
        request: &Value,
    ) -> Result<TransferProcessId, ClientError> {
        let builder = self.request(reqwest::Method::POST, "v3/transferprocesses")?.json(request);
        let body = self.send_expect(builder, 200, "transfer request").await?;
        Self::extract_id(&body).map(TransferProcessId::new)
    }

    /// Reads the current state of a transfer process.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] for unknown processes and
    /// [`ClientError::Decode`] for unknown state tags.
    pub async fn transfer_state(
        &self,
        id: &TransferProcessId,
    ) -> Result<TransferProcessState, ClientError> {
        let builder =
            self.request(reqwest::Method::GET, &format!("v3/transferprocesses/{id}/state"))?;
        let body = self.send_expect(builder, 200, "transfer process").await?;
        let value: Value =
            serde_json::from_str(&body).map_err(|err| ClientError::Decode(err.to_string()))?;
        let state = value["state"]
            .as_str()
            .ok_or_else(|| ClientError::Decode(format!("state response malformed: {body}")))?;
        TransferProcessState::parse(state)
            .ok_or_else(|| ClientError::Decode(format!("unknown transfer state `{state}`")))
    }

    /// Lists the runtime's transfer processes.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or unexpected status.
    pub async fn transfer_processes(&self) -> Result<Vec<Value>, ClientError> {
        let builder = self.request(reqwest::Method::GET, "v3/transferprocesses")?;
        let body = self.send_expect(builder, 200, "transfer processes").await?;
        serde_json::from_str(&body).map_err(|err| ClientError::Decode(err.to_string()))
    }

    /// Retrieves the active EDR for a transfer process.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when no active EDR exists; callers
    /// treat this as a legitimate transient while polling.
    pub async fn edr(&self, id: &TransferProcessId) -> Result<EndpointDataReference, ClientError> {
        let builder = self.request(reqwest::Method::GET, &format!("v3/edrs/{id}/dataaddress"))?;
        let body = self.send_expect(builder, 200, "endpoint data reference").await?;
        serde_json::from_str(&body).map_err(|err| ClientError::Decode(err.to_string()))
    }

    /// Requests suspension of a transfer process.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or unexpected status.
    pub async fn suspend_transfer(
        &self,
        id: &TransferProcessId,
        reason: &str,
    ) -> Result<(), ClientError> {
        let builder = self
            .request(reqwest::Method::POST, &format!("v3/transferprocesses/{id}/suspend"))?
            .json(&json!({ "reason": reason }));
        self.send_expect(builder, 204, "transfer process").await.map(|_| ())
    }

    /// Requests resumption of a suspended transfer process.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or unexpected status.
    pub async fn resume_transfer(&self, id: &TransferProcessId) -> Result<(), ClientError> {
        let builder =
            self.request(reqwest::Method::POST, &format!("v3/transferprocesses/{id}/resume"))?;
        self.send_expect(builder, 204, "transfer process").await.map(|_| ())
    }

    /// Requests termination of a transfer process.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or unexpected status.
    pub async fn terminate_transfer(&self, id: &TransferProcessId) -> Result<(), ClientError> {
        let builder = self
            .request(reqwest::Method::POST, &format!("v3/transferprocesses/{id}/terminate"))?
            .json(&json!({ "reason": "terminated-by-test" }));
        self.send_expect(builder, 204, "transfer process").await.map(|_| ())
    }

    /// Requests deprovisioning of a transfer process.
    ///
    /// The remote must reject this with a conflict once the process has
    /// reached `STARTED`; that rejection is an asserted outcome.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Conflict`] for the expected rejection and
    /// other [`ClientError`] variants for genuine failures.
    pub async fn deprovision_transfer(&self, id: &TransferProcessId) -> Result<(), ClientError> {
        let builder = self
            .request(reqwest::Method::POST, &format!("v3/transferprocesses/{id}/deprovision"))?;
        self.send_expect(builder, 204, "transfer process").await.map(|_| ())
    }
}

// ============================================================================
// SECTION: Data Plane Operations
// ============================================================================

impl ManagementClient {
    /// Pulls data through an EDR, proxying query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the token is rejected or transport
    /// fails; an unusable EDR surfaces as a non-success status.
    pub async fn pull_data(
        &self,
        edr: &EndpointDataReference,
        params: &BTreeMap<String, String>,
    ) -> Result<String, ClientError> {
        let builder = self
            .http
            .get(edr.endpoint.clone())
            .header("Authorization", &edr.authorization)
            .query(params);
        self.send_expect(builder, 200, "pull source").await
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
