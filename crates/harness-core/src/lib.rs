// crates/harness-core/src/lib.rs
// ============================================================================
// Module: Harness Core
// Description: Shared model types for the dataspace compatibility harness.
// Purpose: Provide endpoints, settings, transfer model, and poll primitives.
// Dependencies: serde, thiserror, tokio, url
// ============================================================================

//! ## Overview
//! Core model shared by every harness crate: the service-endpoint and
//! configuration model consumed by runtimes under test, the externally-owned
//! transfer-process model the harness observes, the bounded-poll primitive
//! used by every lifecycle assertion, and the secret-store interface seeded
//! before any protocol call.
//!
//! The harness never mutates transfer state directly; it issues protocol
//! requests and polls for externally-driven transitions.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod endpoint;
pub mod identifiers;
pub mod interfaces;
pub mod poll;
pub mod settings;
pub mod transfer;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use endpoint::Endpoint;
pub use endpoint::EndpointError;
pub use endpoint::free_port;
pub use identifiers::AssetId;
pub use identifiers::ContractDefinitionId;
pub use identifiers::ParticipantId;
pub use identifiers::PolicyDefinitionId;
pub use identifiers::TransferProcessId;
pub use interfaces::InMemorySecretStore;
pub use interfaces::SecretStore;
pub use interfaces::SecretStoreError;
pub use poll::PollSpec;
pub use poll::PollTimeout;
pub use poll::poll_until;
pub use poll::poll_until_err;
pub use poll::poll_until_ok;
pub use settings::RuntimeSettings;
pub use transfer::EndpointDataReference;
pub use transfer::ProtocolVersion;
pub use transfer::TransferProcessState;
pub use transfer::TransferType;
