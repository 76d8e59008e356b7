// crates/harness-core/src/identifiers.rs
// ============================================================================
// Module: Harness Identifiers
// Description: Opaque identifiers for participants and managed resources.
// Purpose: Provide strongly typed identifiers with scenario-unique randoms.
// Dependencies: rand, serde
// ============================================================================

//! ## Overview
//! Identifiers are opaque strings with stable wire forms. Resource
//! identifiers offer random constructors so concurrent scenarios never share
//! asset, policy, or contract ids; a poll that times out may still complete
//! out-of-band on the remote side, and fresh identifiers keep such stale
//! completions from colliding with later scenarios.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Random Suffix
// ============================================================================

/// Returns a 12-character lowercase hex suffix for scenario-unique ids.
fn random_suffix() -> String {
    let bytes: [u8; 6] = rand::random();
    let mut out = String::with_capacity(12);
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

/// Declares an opaque string identifier with the shared constructor surface.
macro_rules! string_identifier {
    ($(#[$outer:meta])* $name:ident, $prefix:literal) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from an explicit value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Creates a scenario-unique random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(format!(concat!($prefix, "-{}"), random_suffix()))
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

string_identifier!(
    /// Participant identifier, also the holder identifier in credentials.
    ///
    /// # Invariants
    /// - Opaque UTF-8 string; fixed for the lifetime of the participant.
    ParticipantId,
    "participant"
);

string_identifier!(
    /// Asset identifier registered with a provider's management API.
    ///
    /// # Invariants
    /// - Unique per scenario when created via [`AssetId::random`].
    AssetId,
    "asset"
);

string_identifier!(
    /// Policy definition identifier.
    ///
    /// # Invariants
    /// - Unique per scenario when created via [`PolicyDefinitionId::random`].
    PolicyDefinitionId,
    "policy"
);

string_identifier!(
    /// Contract definition identifier binding an asset to its policies.
    ///
    /// # Invariants
    /// - Unique per scenario when created via
    ///   [`ContractDefinitionId::random`].
    ContractDefinitionId,
    "contract-def"
);

string_identifier!(
    /// Transfer process identifier assigned by the owning runtime.
    ///
    /// # Invariants
    /// - Assigned remotely; the harness never fabricates one outside tests.
    TransferProcessId,
    "transfer"
);

// ============================================================================
// SECTION: Tests
// ============================================================================
