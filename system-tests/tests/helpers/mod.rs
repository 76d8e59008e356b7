// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for dataspace-harness system-tests.
// Purpose: Provide stub connectors, identity fixtures, and data sources.
// Dependencies: system-tests, harness-participant, harness-runtime,
//               harness-trust
// ============================================================================

//! ## Overview
//! Shared helpers for the harness system-tests: the mock external data
//! source, the in-process stub connector emulating a data-exchange runtime
//! pair, the embedded identity-hub launcher, and the dataspace fixture
//! assembling all of it behind the trust bootstrap.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod data_source;
pub mod dataspace;
pub mod identity_stub;
