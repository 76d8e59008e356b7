// system-tests/tests/helpers/dataspace.rs
// ============================================================================
// Module: Dataspace Fixture
// Description: Two-party dataspace assembled behind the trust bootstrap.
// Purpose: One fixture every scenario suite starts from.
// Dependencies: helpers, harness-participant, harness-runtime, harness-trust
// ============================================================================

//! ## Overview
//! Startup follows the strict order the orchestrator demands: the identity
//! hub first, then each participant's control and data plane, then the
//! trust bootstrap (issuer context, participant contexts, credentials,
//! secrets), and only then are scenarios allowed to run. Teardown stops
//! every runtime in reverse order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use harness_core::Endpoint;
use harness_core::ParticipantId;
use harness_core::PollSpec;
use harness_core::RuntimeSettings;
use harness_core::SecretStore;
use harness_participant::Participant;
use harness_participant::ParticipantConfig;
use harness_participant::ParticipantKind;
use harness_runtime::Orchestrator;
use harness_runtime::ServiceRegistry;
use harness_runtime::readiness_gate;
use harness_trust::CLIENT_SECRET;
use harness_trust::CredentialIssuer;
use harness_trust::CredentialStore;
use harness_trust::DidPublisher;
use harness_trust::IdentityServices;
use harness_trust::InMemoryStsAccountService;
use harness_trust::ParticipantContextService;
use harness_trust::StsAccountService;
use harness_trust::configure_participant;
use harness_trust::configure_participant_context;
use harness_trust::did_for;
use serde_json::Value;
use serde_json::json;

use super::connector_stub::ControlPlaneLauncher;
use super::connector_stub::DataPlaneLauncher;
use super::connector_stub::StubDataspace;
use super::data_source::DataSourceHandle;
use super::data_source::spawn_data_source;
use super::identity_stub::IdentityHubLauncher;
use system_tests::config::resolve_poll_spec;

// ============================================================================
// SECTION: Fixture
// ============================================================================

/// Poll budget for stub-backed scenarios.
pub const SCENARIO_POLL: PollSpec =
    PollSpec::new(Duration::from_millis(50), Duration::from_secs(20));

/// A started two-party dataspace with its trust topology in place.
pub struct TestDataspace {
    /// Owner of every backing runtime.
    pub orchestrator: Orchestrator,
    /// Trust-anchor issuer.
    pub issuer: CredentialIssuer,
    /// First participant.
    pub consumer: Participant,
    /// Second participant.
    pub provider: Participant,
    /// Mock external data source backing provider assets.
    pub data_source: DataSourceHandle,
    /// Shared emulated dataspace behind the stub connectors.
    pub dataspace: StubDataspace,
    /// Identity-hub service registry.
    pub identity_registry: Arc<ServiceRegistry>,
    /// Plane registries: participant id, data-plane flag, registry.
    pub plane_registries: Vec<(ParticipantId, bool, Arc<ServiceRegistry>)>,
    /// Identity-hub credential-resolution endpoint.
    pub resolution: Endpoint,
    /// Identity-hub DID endpoint.
    pub did_endpoint: Endpoint,
}

impl TestDataspace {
    /// Resolves a participant by id; scenario matrices address by id.
    pub fn participant(&self, id: &ParticipantId) -> Result<&Participant, String> {
        if self.consumer.id() == id {
            Ok(&self.consumer)
        } else if self.provider.id() == id {
            Ok(&self.provider)
        } else {
            Err(format!("no participant with id `{id}`"))
        }
    }

    /// Returns the HTTP source data address for provider assets.
    pub fn http_source_data_address(&self) -> Value {
        json!({
            "type": "HttpData",
            "name": "transfer-test",
            "baseUrl": self.data_source.source_url(),
            "proxyQueryParams": "true",
        })
    }

    /// Stops every runtime; idempotent.
    pub async fn stop(&mut self) -> Result<(), String> {
        self.orchestrator.stop_all().await.map_err(|err| err.to_string())
    }
}

// ============================================================================
// SECTION: Assembly
// ============================================================================

/// Builds a local participant bound to the shared identity hub.
fn build_participant(
    id: &str,
    did_endpoint: &Endpoint,
    sts: &Endpoint,
    trusted_issuer: &str,
) -> Result<Participant, String> {
    let participant_id = ParticipantId::new(id);
    let mut config = ParticipantConfig::new(ParticipantKind::Local);
    config.did = Some(did_for(did_endpoint, &participant_id));
    config.id = Some(participant_id);
    config.name = Some(id.to_string());
    config.sts = Some(sts.clone());
    config.trusted_issuer = Some(trusted_issuer.to_string());
    config.timeout = resolve_poll_spec(SCENARIO_POLL);
    Participant::build(config).map_err(|err| err.to_string())
}

/// Provisions one participant into the identity hub behind the gate.
async fn provision_participant(
    participant: &Participant,
    issuer: &CredentialIssuer,
    resolution: &Endpoint,
    registry: &ServiceRegistry,
) -> Result<(), String> {
    let contexts =
        registry.get::<dyn ParticipantContextService>().map_err(|err| err.to_string())?;
    let dids = registry.get::<dyn DidPublisher>().map_err(|err| err.to_string())?;
    let credentials = registry.get::<dyn CredentialStore>().map_err(|err| err.to_string())?;
    let accounts = registry.get::<dyn StsAccountService>().map_err(|err| err.to_string())?;
    let vault = registry.get::<dyn SecretStore>().map_err(|err| err.to_string())?;

    // Hub-side STS account; its secret alias must match the participant's
    // own configuration.
    registry
        .get::<InMemoryStsAccountService>()
        .map_err(|err| err.to_string())?
        .register(participant.did(), &participant.secret_alias())
        .map_err(|err| err.to_string())?;

    let alias = participant.private_key_alias();
    let provisioning = participant.provisioning(resolution, &alias);
    let services = IdentityServices {
        contexts: contexts.as_ref(),
        dids: dids.as_ref(),
        credentials: credentials.as_ref(),
        accounts: accounts.as_ref(),
        vault: vault.as_ref(),
    };
    readiness_gate("identity-hub", resolve_poll_spec(SCENARIO_POLL), move || async move {
        configure_participant(&provisioning, issuer, &services).map_err(|err| err.to_string())
    })
    .await
    .map_err(|err| err.to_string())
}

/// Starts the full two-party dataspace fixture.
pub async fn start_dataspace() -> Result<TestDataspace, String> {
    let did_endpoint = Endpoint::loopback("/").map_err(|err| err.to_string())?;
    let resolution = Endpoint::loopback("/api/resolution").map_err(|err| err.to_string())?;
    let sts = Endpoint::loopback("/api/sts").map_err(|err| err.to_string())?;

    // Issuer: a participant in its own right, plus the signing identity.
    let issuer_id = ParticipantId::new("issuer");
    let issuer_did = did_for(&did_endpoint, &issuer_id);
    let mut issuer_config = ParticipantConfig::new(ParticipantKind::Issuer);
    issuer_config.id = Some(issuer_id);
    issuer_config.name = Some("issuer".to_string());
    issuer_config.did = Some(issuer_did.clone());
    let issuer_participant = Participant::build(issuer_config).map_err(|err| err.to_string())?;
    let issuer = CredentialIssuer::with_keys(issuer_did.clone(), issuer_participant.keys().clone());

    let consumer = build_participant("consumer", &did_endpoint, &sts, &issuer_did)?;
    let provider = build_participant("provider", &did_endpoint, &sts, &issuer_did)?;

    // Identity hub starts before any plane.
    let mut orchestrator = Orchestrator::new();
    let identity_registry = Arc::new(ServiceRegistry::new());
    orchestrator
        .start_embedded(
            "identity-hub",
            &RuntimeSettings::new(),
            &IdentityHubLauncher,
            Arc::clone(&identity_registry),
        )
        .await
        .map_err(|err| err.to_string())?;

    // Control and data planes per participant, sharing one dataspace.
    let dataspace = StubDataspace::new();
    let mut plane_registries = Vec::new();
    for participant in [&consumer, &provider] {
        let control = ControlPlaneLauncher {
            participant: participant.id().to_string(),
            dataspace: dataspace.clone(),
        };
        let control_settings =
            participant.control_plane_settings().map_err(|err| err.to_string())?;
        let control_registry = Arc::new(ServiceRegistry::new());
        orchestrator
            .start_embedded(
                &format!("{}-control-plane", participant.id()),
                &control_settings,
                &control,
                Arc::clone(&control_registry),
            )
            .await
            .map_err(|err| err.to_string())?;
        plane_registries.push((participant.id().clone(), false, control_registry));

        let data = DataPlaneLauncher {
            participant: participant.id().to_string(),
            dataspace: dataspace.clone(),
        };
        let data_settings = participant.data_plane_settings().map_err(|err| err.to_string())?;
        let data_registry = Arc::new(ServiceRegistry::new());
        orchestrator
            .start_embedded(
                &format!("{}-data-plane", participant.id()),
                &data_settings,
                &data,
                Arc::clone(&data_registry),
            )
            .await
            .map_err(|err| err.to_string())?;
        plane_registries.push((participant.id().clone(), true, data_registry));
    }

    // Trust bootstrap: issuer context first, then each participant.
    let issuer_alias = issuer_participant.private_key_alias();
    {
        let contexts = identity_registry
            .get::<dyn ParticipantContextService>()
            .map_err(|err| err.to_string())?;
        let dids = identity_registry.get::<dyn DidPublisher>().map_err(|err| err.to_string())?;
        let vault = identity_registry.get::<dyn SecretStore>().map_err(|err| err.to_string())?;
        let credentials =
            identity_registry.get::<dyn CredentialStore>().map_err(|err| err.to_string())?;
        let accounts =
            identity_registry.get::<dyn StsAccountService>().map_err(|err| err.to_string())?;
        let services = IdentityServices {
            contexts: contexts.as_ref(),
            dids: dids.as_ref(),
            credentials: credentials.as_ref(),
            accounts: accounts.as_ref(),
            vault: vault.as_ref(),
        };
        let provisioning = issuer_participant.provisioning(&resolution, &issuer_alias);
        configure_participant_context(&provisioning, &services).map_err(|err| err.to_string())?;
    }
    provision_participant(&consumer, &issuer, &resolution, &identity_registry).await?;
    provision_participant(&provider, &issuer, &resolution, &identity_registry).await?;

    // Seed every plane's vault with the client secret; data planes also
    // hold the proxy token signer keys.
    for (participant_id, is_data_plane, registry) in &plane_registries {
        let participant =
            if consumer.id() == participant_id { &consumer } else { &provider };
        let vault = registry.get::<dyn SecretStore>().map_err(|err| err.to_string())?;
        vault
            .store_secret(&participant.secret_alias(), CLIENT_SECRET)
            .map_err(|err| err.to_string())?;
        if *is_data_plane {
            let private = participant.keys().private_key_pem().map_err(|err| err.to_string())?;
            let public = participant.keys().public_key_pem().map_err(|err| err.to_string())?;
            vault.store_secret("private-key", &private).map_err(|err| err.to_string())?;
            vault.store_secret("public-key", &public).map_err(|err| err.to_string())?;
        }
    }

    let data_source = spawn_data_source("data")?;
    Ok(TestDataspace {
        orchestrator,
        issuer,
        consumer,
        provider,
        data_source,
        dataspace,
        identity_registry,
        plane_registries,
        resolution,
        did_endpoint,
    })
}
