// system-tests/tests/suites/lifecycle.rs
// ============================================================================
// Module: Lifecycle Scenarios
// Description: Suspend/resume round-trips and the matrix pull sweep.
// Dependencies: system-tests helpers
// ============================================================================

//! ## Overview
//! Suspension revokes the EDR, resumption yields a fresh one and leaves
//! the old one unusable, resuming an already-started process changes
//! nothing, and the full (consumer, provider, protocol) matrix reaches
//! `STARTED` with a retrievable EDR for every entry.

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

use harness_core::ProtocolVersion;
use harness_core::TransferProcessState;
use harness_core::TransferType;
use harness_participant::no_constraint_policy;
use harness_participant::scenario_matrix;
use uuid::Uuid;

use crate::helpers::dataspace::start_dataspace;

/// Protocol version used by the single-pair scenarios.
fn dsp_http() -> ProtocolVersion {
    ProtocolVersion::new("dataspace-protocol-http")
}

/// Query parameters carrying a fresh random message id.
fn message_params() -> BTreeMap<String, String> {
    BTreeMap::from([("message".to_string(), Uuid::new_v4().to_string())])
}

#[tokio::test(flavor = "multi_thread")]
async fn suspend_and_resume_round_trip() -> Result<(), Box<dyn Error>> {
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
    let first_edr = space.consumer.await_edr(&transfer).await?;
    let params = message_params();
    space.consumer.await_pull(&first_edr, &params, "data").await?;

    space.consumer.suspend_transfer(&transfer, "suspension").await?;
    space.consumer.await_transfer_state(&transfer, TransferProcessState::Suspended).await?;
    space.consumer.await_edr_unavailable(&transfer).await?;
    space.consumer.await_pull_failure(&first_edr, &params).await?;

    space.consumer.resume_transfer(&transfer).await?;
    space.consumer.await_transfer_state(&transfer, TransferProcessState::Started).await?;
    let second_edr = space.consumer.await_edr(&transfer).await?;

    // Resumption issues a fresh reference; the pre-suspend one stays dead.
    assert_ne!(second_edr.authorization, first_edr.authorization);
    let second_params = message_params();
    space.consumer.await_pull(&second_edr, &second_params, "data").await?;
    space.consumer.await_pull_failure(&first_edr, &params).await?;

    space.stop().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn resume_on_started_process_changes_nothing() -> Result<(), Box<dyn Error>> {
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
    let params = message_params();
    space.consumer.await_pull(&edr, &params, "data").await?;

    // Re-issuing resume on a started process is a no-op.
    space.consumer.resume_transfer(&transfer).await?;
    let state = space.consumer.client().transfer_state(&transfer).await?;
    assert_eq!(state, TransferProcessState::Started);
    space.consumer.await_pull(&edr, &params, "data").await?;

    space.stop().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn pull_matrix_covers_every_pair_and_protocol() -> Result<(), Box<dyn Error>> {
    let mut space = start_dataspace().await?;
    let participants = vec![space.consumer.id().clone(), space.provider.id().clone()];
    let protocols = vec![
        ProtocolVersion::new("dataspace-protocol-http"),
        ProtocolVersion::new("dataspace-protocol-http:2025-1"),
    ];
    let matrix = scenario_matrix(&participants, &protocols);
    assert_eq!(matrix.len(), 4);

    for entry in &matrix {
        let consumer = space.participant(&entry.consumer)?;
        let provider = space.participant(&entry.provider)?;
        let asset = provider
            .create_resource(space.http_source_data_address(), no_constraint_policy())
            .await
            .map_err(|err| format!("{}: {err}", entry.label()))?;
        let transfer = consumer
            .request_asset_from(&asset, provider, &entry.protocol)
            .with_transfer_type(TransferType::http_pull())
            .execute()
            .await
            .map_err(|err| format!("{}: {err}", entry.label()))?;
        consumer
            .await_transfer_state(&transfer, TransferProcessState::Started)
            .await
            .map_err(|err| format!("{}: {err}", entry.label()))?;
        let edr = consumer
            .await_edr(&transfer)
            .await
            .map_err(|err| format!("{}: {err}", entry.label()))?;
        consumer
            .await_pull(&edr, &message_params(), "data")
            .await
            .map_err(|err| format!("{}: {err}", entry.label()))?;
    }

    space.stop().await?;
    Ok(())
}
