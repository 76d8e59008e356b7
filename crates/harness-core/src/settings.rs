// crates/harness-core/src/settings.rs
// ============================================================================
// Module: Runtime Settings
// Description: Canonical configuration model for runtimes under test.
// Purpose: One settings map with dotted-key and env-var serializations.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Each backing runtime consumes a flat mapping of keys to string values.
//! Embedded runtimes read dotted keys (`web.http.port`); containerized
//! runtimes read environment-variable names (`WEB_HTTP_PORT`). Both
//! spellings must cover identical semantic settings, so exactly one
//! canonical map exists here with two serializers derived from it. Dashes
//! inside key segments survive the env translation
//! (`dx.iam.trusted-issuer.id` becomes `DX_IAM_TRUSTED-ISSUER_ID`).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Canonical runtime configuration: deterministic dotted-key map.
///
/// # Invariants
/// - Keys are dotted lowercase segments; values are primitive strings.
/// - Iteration order is deterministic (sorted by key).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuntimeSettings {
    /// Canonical dotted-key entries.
    entries: BTreeMap<String, String>,
}

impl RuntimeSettings {
    /// Creates an empty settings set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a setting.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(key.to_string(), value.into());
    }

    /// Returns the settings with one more entry, for fluent assembly.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Returns the value for a dotted key, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the number of settings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no settings are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merges another settings set into this one; `other` wins on conflict.
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    /// Serializes as the dotted-key map consumed by embedded runtimes.
    #[must_use]
    pub fn flat_map(&self) -> BTreeMap<String, String> {
        self.entries.clone()
    }

    /// Serializes as the env-var map consumed by containerized runtimes.
    ///
    /// Identical semantic settings as [`RuntimeSettings::flat_map`]; only
    /// the key spelling differs.
    #[must_use]
    pub fn env_map(&self) -> BTreeMap<String, String> {
        self.entries.iter().map(|(key, value)| (env_key(key), value.clone())).collect()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for RuntimeSettings {
    fn from(pairs: [(&str, &str); N]) -> Self {
        let mut settings = Self::new();
        for (key, value) in pairs {
            settings.set(key, value);
        }
        settings
    }
}

// ============================================================================
// SECTION: Key Translation
// ============================================================================

/// Translates a dotted key into its environment-variable spelling.
///
/// Dots become underscores and ASCII letters are uppercased; dashes within
/// segments are preserved, matching what the runtimes under test parse.
#[must_use]
pub fn env_key(dotted: &str) -> String {
    dotted
        .chars()
        .map(|c| match c {
            '.' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
