// system-tests/tests/suites/transfer.rs
// ============================================================================
// Module: Transfer Scenarios
// Description: Pull transfers, expiry, termination, and the deprovision
//              conflict over the stub dataspace.
// Dependencies: system-tests helpers
// ============================================================================

//! ## Overview
//! End-to-end transfer scenarios against the in-process stub dataspace:
//! request to `STARTED`, byte-level pull verification against the origin,
//! contract-expiry EDR revocation, provider-side termination down to
//! `DEPROVISIONED`, the checked deprovision conflict, and callback-borne
//! EDR delivery.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeMap;
use std::error::Error;
use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;
use std::sync::Mutex;

use axum::Router;
use axum::extract::State;
use axum::routing::post;
use harness_core::EndpointDataReference;
use harness_core::ProtocolVersion;
use harness_core::TransferProcessId;
use harness_core::TransferProcessState;
use harness_core::TransferType;
use harness_core::poll_until;
use harness_participant::CallbackAddress;
use harness_participant::contract_expires_in;
use harness_participant::no_constraint_policy;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::helpers::dataspace::SCENARIO_POLL;
use crate::helpers::dataspace::start_dataspace;

/// Protocol version used by the single-pair scenarios.
fn dsp_http() -> ProtocolVersion {
    ProtocolVersion::new("dataspace-protocol-http")
}

/// Query parameters carrying a fresh random message id.
fn message_params() -> (String, BTreeMap<String, String>) {
    let message = Uuid::new_v4().to_string();
    let params = BTreeMap::from([("message".to_string(), message.clone())]);
    (message, params)
}

#[tokio::test(flavor = "multi_thread")]
async fn http_pull_transfer_expires_with_contract() -> Result<(), Box<dyn Error>> {
    let mut space = start_dataspace().await?;
    let asset = space
        .provider
        .create_resource(space.http_source_data_address(), contract_expires_in("5s"))
        .await?;

    let transfer = space
        .consumer
        .request_asset_from(&asset, &space.provider, &dsp_http())
        .with_transfer_type(TransferType::http_pull())
        .execute()
        .await?;
    space.consumer.await_transfer_state(&transfer, TransferProcessState::Started).await?;
    let edr = space.consumer.await_edr(&transfer).await?;

    let (message, params) = message_params();
    space.consumer.await_pull(&edr, &params, "data").await?;

    // The contract window closes: the EDR becomes unusable while the
    // lifecycle state stays STARTED.
    space.consumer.await_edr_unavailable(&transfer).await?;
    space.consumer.await_pull_failure(&edr, &params).await?;
    let state = space.consumer.client().transfer_state(&transfer).await?;
    assert_eq!(state, TransferProcessState::Started);

    space.data_source.verify_query_contains(&message)?;
    space.stop().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn terminate_transfer_deprovisions_both_sides() -> Result<(), Box<dyn Error>> {
    let mut space = start_dataspace().await?;
    let asset = space
        .provider
        .create_resource(space.http_source_data_address(), no_constraint_policy())
        .await?;

    let transfer = space
        .consumer
        .request_asset_from(&asset, &space.provider, &dsp_http())
        .with_transfer_type(TransferType::http_pull())
        .execute()
        .await?;
    space.consumer.await_transfer_state(&transfer, TransferProcessState::Started).await?;
    let edr = space.consumer.await_edr(&transfer).await?;
    let (message, params) = message_params();
    space.consumer.await_pull(&edr, &params, "data").await?;

    // The provider locates its own process by correlation and terminates.
    let provider_process = space.provider.correlated_process(&transfer).await?;
    space.provider.terminate_transfer(&provider_process).await?;
    space
        .provider
        .await_transfer_state(&provider_process, TransferProcessState::Deprovisioned)
        .await?;

    space.consumer.await_edr_unavailable(&transfer).await?;
    space.consumer.await_pull_failure(&edr, &params).await?;
    space.data_source.verify_query_contains(&message)?;
    space.stop().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn deprovision_while_started_is_rejected() -> Result<(), Box<dyn Error>> {
    let mut space = start_dataspace().await?;
    let asset = space
        .provider
        .create_resource(space.http_source_data_address(), no_constraint_policy())
        .await?;

    let transfer = space
        .consumer
        .request_asset_from(&asset, &space.provider, &dsp_http())
        .with_transfer_type(TransferType::http_pull())
        .execute()
        .await?;
    space.consumer.await_transfer_state(&transfer, TransferProcessState::Started).await?;

    // The rejection is the postcondition, and it must not change state.
    space.consumer.expect_deprovision_conflict(&transfer).await?;
    let state = space.consumer.client().transfer_state(&transfer).await?;
    assert_eq!(state, TransferProcessState::Started);

    let edr = space.consumer.await_edr(&transfer).await?;
    let (_, params) = message_params();
    space.consumer.await_pull(&edr, &params, "data").await?;
    space.stop().await?;
    Ok(())
}

// ============================================================================
// SECTION: Callback Collector
// ============================================================================

/// Received callback envelopes.
type Envelopes = Arc<Mutex<Vec<Value>>>;

async fn collect_hook(State(envelopes): State<Envelopes>, body: axum::Json<Value>) -> String {
    if let Ok(mut guard) = envelopes.lock() {
        guard.push(body.0);
    }
    "{}".to_string()
}

/// Spawns a callback endpoint collecting posted envelopes.
fn spawn_callback_collector() -> Result<(String, Envelopes), Box<dyn Error>> {
    let listener = StdTcpListener::bind("127.0.0.1:0")?;
    listener.set_nonblocking(true)?;
    let addr = listener.local_addr()?;
    let envelopes: Envelopes = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().route("/hooks", post(collect_hook)).with_state(Arc::clone(&envelopes));
    let listener = tokio::net::TcpListener::from_std(listener)?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}/hooks"), envelopes))
}

#[tokio::test(flavor = "multi_thread")]
async fn pull_transfer_delivers_edr_through_callbacks() -> Result<(), Box<dyn Error>> {
    let mut space = start_dataspace().await?;
    let asset = space
        .provider
        .create_resource(space.http_source_data_address(), no_constraint_policy())
        .await?;
    let (callback_url, envelopes) = spawn_callback_collector()?;

    let transfer = space
        .consumer
        .request_asset_from(&asset, &space.provider, &dsp_http())
        .with_transfer_type(TransferType::http_pull())
        .with_callbacks(vec![CallbackAddress {
            uri: callback_url,
            events: vec!["transfer.process.started".to_string()],
            transactional: true,
        }])
        .execute()
        .await?;
    space.consumer.await_transfer_state(&transfer, TransferProcessState::Started).await?;

    // The started event carries a usable EDR.
    let envelopes_ref = &envelopes;
    let transfer_ref = &transfer;
    let event = poll_until(SCENARIO_POLL, move || async move {
        envelopes_ref.lock().ok()?.iter().find(|envelope| {
            envelope["transferProcessId"].as_str() == Some(transfer_ref.as_str())
        }).cloned()
    })
    .await?;
    let address = &event["dataAddress"];
    let edr = EndpointDataReference {
        transfer_process_id: TransferProcessId::new(
            address["transferProcessId"].as_str().unwrap_or_default(),
        ),
        endpoint: Url::parse(address["endpoint"].as_str().unwrap_or_default())?,
        authorization: address["authorization"].as_str().unwrap_or_default().to_string(),
    };
    let (message, params) = message_params();
    space.consumer.await_pull(&edr, &params, "data").await?;
    space.data_source.verify_query_contains(&message)?;
    space.stop().await?;
    Ok(())
}
