// crates/harness-participant/src/matrix.rs
// ============================================================================
// Module: Scenario Matrix
// Description: Ordered (consumer, provider, protocol) scenario generation.
// Purpose: Deterministic cross-version argument sets for scenario tests.
// Dependencies: harness-core
// ============================================================================

//! ## Overview
//! The matrix enumerates every ordered participant pair in both directions,
//! crossed with every tested protocol version. Order is insertion order
//! over the participant slice, so a failing scenario is reproducible by its
//! index alone. Self-pairs are excluded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use harness_core::ParticipantId;
use harness_core::ProtocolVersion;

// ============================================================================
// SECTION: Matrix Entry
// ============================================================================

/// One scenario argument triple.
///
/// # Invariants
/// - `index` is the position in generation order and stable across runs
///   with the same inputs.
/// - `consumer != provider`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioEntry {
    /// Position in generation order.
    pub index: usize,
    /// Consumer participant.
    pub consumer: ParticipantId,
    /// Provider participant.
    pub provider: ParticipantId,
    /// Protocol version under test.
    pub protocol: ProtocolVersion,
}

impl ScenarioEntry {
    /// Returns a stable label for failure reports.
    #[must_use]
    pub fn label(&self) -> String {
        format!("#{} {}->{} [{}]", self.index, self.consumer, self.provider, self.protocol)
    }
}

// ============================================================================
// SECTION: Generation
// ============================================================================

/// Generates the full scenario matrix.
///
/// For every unordered pair `(i, j)` with `i < j` in slice order, both
/// directions are emitted per protocol: first `i` as consumer, then `j`.
#[must_use]
pub fn scenario_matrix(
    participants: &[ParticipantId],
    protocols: &[ProtocolVersion],
) -> Vec<ScenarioEntry> {
    let mut entries = Vec::new();
    for (i, consumer) in participants.iter().enumerate() {
        for provider in participants.iter().skip(i + 1) {
            for protocol in protocols {
                entries.push(ScenarioEntry {
                    index: entries.len(),
                    consumer: consumer.clone(),
                    provider: provider.clone(),
                    protocol: protocol.clone(),
                });
                entries.push(ScenarioEntry {
                    index: entries.len(),
                    consumer: provider.clone(),
                    provider: consumer.clone(),
                    protocol: protocol.clone(),
                });
            }
        }
    }
    entries
}

// ============================================================================
// SECTION: Tests
// ============================================================================
