// crates/harness-participant/src/participant.rs
// ============================================================================
// Module: Participant
// Description: Immutable dataspace participant with backend-tagged config.
// Purpose: One participant type dispatched by backend kind, no subclassing.
// Dependencies: harness-core, harness-trust
// ============================================================================

//! ## Overview
//! A participant is constructed once from a fully-specified configuration
//! and is immutable afterwards: identity, DID, key pair, and endpoints are
//! fixed before any runtime starts. The backend kind is a tag, not a
//! subclass: `Local` resolves configuration in-process, `Remote` serializes
//! every value as a primitive string for an external container, and
//! `Issuer` is a trust anchor that never starts a control or data plane.
//!
//! Both backends emit the same canonical settings; only the serialization
//! differs (`flat_map` vs `env_map`), so embedded and containerized paths
//! cannot drift apart.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use harness_core::Endpoint;
use harness_core::ParticipantId;
use harness_core::PollSpec;
use harness_core::RuntimeSettings;
use harness_trust::KeyPair;
use harness_trust::ParticipantProvisioning;

use crate::client::ManagementClient;
use crate::error::ConfigError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Shared management-API key header value.
const API_KEY: &str = "password";

/// Management-API key header name.
const API_KEY_HEADER: &str = "x-api-key";

/// Named datasources provisioned per participant.
const DATASOURCES: [&str; 10] = [
    "asset",
    "contractdefinition",
    "contractnegotiation",
    "policy",
    "transferprocess",
    "policy-monitor",
    "edr",
    "dataplane",
    "accesstokendata",
    "dataplaneinstance",
];

// ============================================================================
// SECTION: Backend Kind
// ============================================================================

/// Backend kind of a participant; a tag, not a class hierarchy.
///
/// # Invariants
/// - Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantKind {
    /// Runs in the harness process from in-process configuration.
    Local,
    /// Runs as an external containerized process fed env-var strings.
    Remote,
    /// Trust anchor; issues credentials, never starts planes.
    Issuer,
}

// ============================================================================
// SECTION: Endpoints
// ============================================================================

/// Named endpoints of one participant.
///
/// # Invariants
/// - Ports are reserved for the lifetime of one test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantEndpoints {
    /// Authenticated management API.
    pub management: Endpoint,
    /// DSP protocol endpoint.
    pub protocol: Endpoint,
    /// Control-plane control API (token validation lives here).
    pub control: Endpoint,
    /// Version API.
    pub version: Endpoint,
    /// Public data-plane endpoint for pulls.
    pub public_data: Endpoint,
}

impl ParticipantEndpoints {
    /// Allocates the full endpoint set on fresh loopback ports.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Endpoint`] when port reservation fails.
    pub fn allocate() -> Result<Self, ConfigError> {
        let allocate = |path: &str| {
            Endpoint::loopback(path).map_err(|err| ConfigError::Endpoint(err.to_string()))
        };
        Ok(Self {
            management: allocate("/api/management")?.with_header(API_KEY_HEADER, API_KEY),
            protocol: allocate("/protocol")?,
            control: allocate("/control")?,
            version: allocate("/version")?,
            public_data: allocate("/public")?,
        })
    }
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Fully-specified participant configuration.
///
/// # Invariants
/// - `id`, `name`, and `did` are always required; `sts` and
///   `trusted_issuer` are required for every kind except `Issuer`.
#[derive(Debug, Clone)]
pub struct ParticipantConfig {
    /// Participant identifier.
    pub id: Option<ParticipantId>,
    /// Display name.
    pub name: Option<String>,
    /// Participant DID.
    pub did: Option<String>,
    /// Backend kind.
    pub kind: ParticipantKind,
    /// Security-token-service endpoint.
    pub sts: Option<Endpoint>,
    /// Trusted issuer DID.
    pub trusted_issuer: Option<String>,
    /// Explicit endpoints; allocated on loopback ports when absent.
    pub endpoints: Option<ParticipantEndpoints>,
    /// Poll budget for lifecycle assertions.
    pub timeout: PollSpec,
}

impl ParticipantConfig {
    /// Creates a configuration for a backend kind with defaults unset.
    #[must_use]
    pub const fn new(kind: ParticipantKind) -> Self {
        Self {
            id: None,
            name: None,
            did: None,
            kind,
            sts: None,
            trusted_issuer: None,
            endpoints: None,
            timeout: PollSpec::lifecycle(),
        }
    }
}

// ============================================================================
// SECTION: Participant
// ============================================================================

/// Immutable dataspace participant.
///
/// # Invariants
/// - Identity and key material never change after construction.
/// - Destroyed only when the owning test class tears down its runtimes.
#[derive(Debug)]
pub struct Participant {
    /// Participant identifier.
    id: ParticipantId,
    /// Display name.
    name: String,
    /// Participant DID.
    did: String,
    /// Backend kind tag.
    kind: ParticipantKind,
    /// Signing key pair.
    keys: KeyPair,
    /// STS endpoint; absent for issuers.
    sts: Option<Endpoint>,
    /// Trusted issuer DID; absent for issuers.
    trusted_issuer: Option<String>,
    /// Named endpoints.
    endpoints: ParticipantEndpoints,
    /// Default web context of the control plane.
    control_api: Endpoint,
    /// Default web context of the data plane.
    data_api: Endpoint,
    /// Management client bound to the management endpoint.
    client: ManagementClient,
    /// Poll budget for lifecycle assertions.
    timeout: PollSpec,
}

impl Participant {
    /// Builds a participant, validating required fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] naming the first missing
    /// required field, or [`ConfigError::Endpoint`] when allocation fails.
    pub fn build(config: ParticipantConfig) -> Result<Self, ConfigError> {
        let id = config.id.ok_or(ConfigError::MissingField("id"))?;
        let name = config.name.ok_or(ConfigError::MissingField("name"))?;
        let did = config.did.ok_or(ConfigError::MissingField("did"))?;
        let (sts, trusted_issuer) = match config.kind {
            ParticipantKind::Issuer => (config.sts, config.trusted_issuer),
            ParticipantKind::Local | ParticipantKind::Remote => (
                Some(config.sts.ok_or(ConfigError::MissingField("sts"))?),
                Some(config.trusted_issuer.ok_or(ConfigError::MissingField("trusted_issuer"))?),
            ),
        };
        let endpoints = match config.endpoints {
            Some(endpoints) => endpoints,
            None => ParticipantEndpoints::allocate()?,
        };
        let allocate = |path: &str| {
            Endpoint::loopback(path).map_err(|err| ConfigError::Endpoint(err.to_string()))
        };
        let client = ManagementClient::new(endpoints.management.clone())
            .map_err(|err| ConfigError::Endpoint(err.to_string()))?;
        Ok(Self {
            id,
            name,
            did,
            kind: config.kind,
            keys: KeyPair::generate(),
            sts,
            trusted_issuer,
            endpoints,
            control_api: allocate("/api")?,
            data_api: allocate("/api")?,
            client,
            timeout: config.timeout,
        })
    }

    /// Returns the participant identifier.
    #[must_use]
    pub const fn id(&self) -> &ParticipantId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the participant DID.
    #[must_use]
    pub fn did(&self) -> &str {
        &self.did
    }

    /// Returns the backend kind.
    #[must_use]
    pub const fn kind(&self) -> ParticipantKind {
        self.kind
    }

    /// Returns the key pair.
    #[must_use]
    pub const fn keys(&self) -> &KeyPair {
        &self.keys
    }

    /// Returns the trusted issuer DID, when configured.
    #[must_use]
    pub fn trusted_issuer(&self) -> Option<&str> {
        self.trusted_issuer.as_deref()
    }

    /// Returns the named endpoints.
    #[must_use]
    pub const fn endpoints(&self) -> &ParticipantEndpoints {
        &self.endpoints
    }

    /// Returns the management client.
    #[must_use]
    pub const fn client(&self) -> &ManagementClient {
        &self.client
    }

    /// Returns the lifecycle poll budget.
    #[must_use]
    pub const fn timeout(&self) -> PollSpec {
        self.timeout
    }

    /// Returns the secret-store alias of the private key.
    #[must_use]
    pub fn private_key_alias(&self) -> String {
        format!("{}-private-key", self.id)
    }

    /// Returns the secret-store alias of the STS client secret.
    #[must_use]
    pub fn secret_alias(&self) -> String {
        format!("{}-secret", self.id)
    }

    /// Returns the provisioning view consumed by the trust bootstrap.
    #[must_use]
    pub fn provisioning<'a>(
        &'a self,
        resolution_endpoint: &'a Endpoint,
        private_key_alias: &'a str,
    ) -> ParticipantProvisioning<'a> {
        ParticipantProvisioning {
            did: &self.did,
            holder_id: self.id.as_str(),
            keys: &self.keys,
            private_key_alias,
            resolution_endpoint,
        }
    }
}

// ============================================================================
// SECTION: Settings Emission
// ============================================================================

impl Participant {
    /// Returns the STS endpoint or the missing-field error.
    fn required_sts(&self) -> Result<&Endpoint, ConfigError> {
        self.sts.as_ref().ok_or(ConfigError::MissingField("sts"))
    }

    /// Returns the trusted issuer DID or the missing-field error.
    fn required_trusted_issuer(&self) -> Result<&str, ConfigError> {
        self.trusted_issuer.as_deref().ok_or(ConfigError::MissingField("trusted_issuer"))
    }

    /// Canonical IAM settings shared by both planes.
    fn iam_settings(&self, settings: &mut RuntimeSettings) -> Result<(), ConfigError> {
        let sts = self.required_sts()?;
        settings.set("dx.iam.sts.oauth.token.url", format!("{sts}/token"));
        settings.set("dx.iam.sts.oauth.client.id", self.did.clone());
        settings.set("dx.iam.sts.oauth.client.secret.alias", self.secret_alias());
        settings.set("dx.iam.issuer.id", self.did.clone());
        settings.set("dx.iam.did.web.use.https", "false");
        settings.set("dx.iam.trusted-issuer.id", self.required_trusted_issuer()?);
        Ok(())
    }

    /// Canonical control-plane settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] for issuer participants, which
    /// never start a control plane.
    pub fn control_plane_settings(&self) -> Result<RuntimeSettings, ConfigError> {
        let mut settings = RuntimeSettings::new();
        settings.set("dx.participant.id", self.id.as_str());
        settings.set("dx.api.auth.key", API_KEY);
        set_web_context(&mut settings, "web.http", &self.control_api)?;
        set_web_context(&mut settings, "web.http.protocol", &self.endpoints.protocol)?;
        set_web_context(&mut settings, "web.http.management", &self.endpoints.management)?;
        set_web_context(&mut settings, "web.http.version", &self.endpoints.version)?;
        set_web_context(&mut settings, "web.http.control", &self.endpoints.control)?;
        settings.set("dx.dsp.callback.address", self.endpoints.protocol.to_string());
        settings.set("dx.transfer.proxy.endpoint", self.endpoints.public_data.to_string());
        settings.set("dx.transfer.send.retry.limit", "1");
        settings.set("dx.transfer.send.retry.base-delay.ms", "100");
        settings.set("dx.negotiation.consumer.send.retry.limit", "1");
        settings.set("dx.negotiation.provider.send.retry.limit", "1");
        settings.set("dx.negotiation.consumer.send.retry.base-delay.ms", "100");
        settings.set("dx.negotiation.provider.send.retry.base-delay.ms", "100");
        settings.set("dx.negotiation.consumer.state-machine.iteration-wait-millis", "50");
        settings.set("dx.negotiation.provider.state-machine.iteration-wait-millis", "50");
        settings.set("dx.transfer.state-machine.iteration-wait-millis", "50");
        self.iam_settings(&mut settings)?;
        Ok(settings)
    }

    /// Canonical data-plane settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] for issuer participants, which
    /// never start a data plane.
    pub fn data_plane_settings(&self) -> Result<RuntimeSettings, ConfigError> {
        let mut settings = RuntimeSettings::new();
        settings.set("dx.participant.id", self.id.as_str());
        settings.set("dx.component.id", format!("{}-dataplane", self.id));
        settings.set("dx.api.auth.key", API_KEY);
        set_web_context(&mut settings, "web.http", &self.data_api)?;
        set_web_context(&mut settings, "web.http.public", &self.endpoints.public_data)?;
        settings.set(
            "dx.dataplane.api.public.baseurl",
            format!("{}/v2/", self.endpoints.public_data),
        );
        settings.set(
            "dx.dataplane.token.validation.endpoint",
            format!("{}/token", self.endpoints.control),
        );
        settings.set("dx.transfer.proxy.token.signer.privatekey.alias", "private-key");
        settings.set("dx.transfer.proxy.token.verifier.publickey.alias", "public-key");
        settings.set("dx.dataplane.http.sink.partition.size", "1");
        settings.set("dx.dataplane.state-machine.iteration-wait-millis", "50");
        settings.set("dx.dpf.selector.url", format!("{}/v1/dataplanes", self.endpoints.control));
        self.iam_settings(&mut settings)?;
        Ok(settings)
    }

    /// Datasource settings for every named store, as primitive strings.
    #[must_use]
    pub fn datasource_settings(&self, database_url: &str) -> RuntimeSettings {
        let mut settings = RuntimeSettings::new();
        settings.set("dx.datasource.default.url", database_url);
        settings.set("dx.datasource.default.user", "postgres");
        settings.set("dx.datasource.default.password", "password");
        for datasource in DATASOURCES {
            settings.set(&format!("dx.datasource.{datasource}.url"), database_url);
            settings.set(&format!("dx.datasource.{datasource}.name"), datasource);
            settings.set(&format!("dx.datasource.{datasource}.user"), "postgres");
            settings.set(&format!("dx.datasource.{datasource}.password"), "password");
        }
        settings
    }

    /// Vault seed entries for the containerized path.
    ///
    /// The client secret is always seeded; data planes additionally seed
    /// the proxy token signer and verifier keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Key`] when key export fails.
    pub fn vault_seed_settings(&self, include_signer_keys: bool) -> Result<RuntimeSettings, ConfigError> {
        let mut settings = RuntimeSettings::new();
        settings.set("dx.vault.seed.1.alias", self.secret_alias());
        settings.set("dx.vault.seed.1.value", "clientSecret");
        if include_signer_keys {
            let private =
                self.keys.private_key_pem().map_err(|err| ConfigError::Key(err.to_string()))?;
            let public =
                self.keys.public_key_pem().map_err(|err| ConfigError::Key(err.to_string()))?;
            settings.set("dx.vault.seed.2.alias", "private-key");
            settings.set("dx.vault.seed.2.value", private);
            settings.set("dx.vault.seed.3.alias", "public-key");
            settings.set("dx.vault.seed.3.value", public);
        }
        Ok(settings)
    }

    /// Counterparty DID-resolution seed entries for the containerized path.
    #[must_use]
    pub fn bdrs_seed_settings(peers: &[(ParticipantId, String)]) -> RuntimeSettings {
        let mut settings = RuntimeSettings::new();
        for (index, (id, did)) in peers.iter().enumerate() {
            let slot = index + 1;
            settings.set(&format!("dx.bdrs.seed.{slot}.key"), id.as_str());
            settings.set(&format!("dx.bdrs.seed.{slot}.value"), did.clone());
        }
        settings
    }

    /// Control-plane environment for an out-of-process container.
    ///
    /// Every value crosses the process boundary as a primitive string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when required fields are absent or key
    /// export fails.
    pub fn control_plane_env(
        &self,
        database_url: &str,
        peers: &[(ParticipantId, String)],
    ) -> Result<BTreeMap<String, String>, ConfigError> {
        let mut settings = self.control_plane_settings()?;
        settings.merge(&self.datasource_settings(database_url));
        settings.merge(&self.vault_seed_settings(false)?);
        settings.merge(&Self::bdrs_seed_settings(peers));
        Ok(settings.env_map())
    }

    /// Data-plane environment for an out-of-process container.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when required fields are absent or key
    /// export fails.
    pub fn data_plane_env(
        &self,
        database_url: &str,
        peers: &[(ParticipantId, String)],
    ) -> Result<BTreeMap<String, String>, ConfigError> {
        let mut settings = self.data_plane_settings()?;
        settings.merge(&self.datasource_settings(database_url));
        settings.merge(&self.vault_seed_settings(true)?);
        settings.merge(&Self::bdrs_seed_settings(peers));
        Ok(settings.env_map())
    }
}

/// Writes `<prefix>.port` and `<prefix>.path` for one web context.
fn set_web_context(
    settings: &mut RuntimeSettings,
    prefix: &str,
    endpoint: &Endpoint,
) -> Result<(), ConfigError> {
    let port = endpoint
        .port()
        .ok_or_else(|| ConfigError::Endpoint(format!("endpoint `{endpoint}` has no port")))?;
    settings.set(&format!("{prefix}.port"), port.to_string());
    settings.set(&format!("{prefix}.path"), endpoint.path());
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
