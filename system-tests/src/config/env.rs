// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for system tests.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid
//! silent misconfiguration. The timeout override acts as a floor so it can
//! lengthen but never shorten explicitly longer test budgets; the image
//! overrides swap the pinned connector releases the compatibility matrix
//! runs against.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::time::Duration;

use harness_core::PollSpec;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Optional timeout floor in seconds (positive integer).
    TimeoutSeconds,
    /// Optional override for the stable connector image (`name:tag`).
    StableImage,
    /// Optional override for the previous-release connector image.
    PreviousImage,
}

impl SystemTestEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TimeoutSeconds => "HARNESS_SYSTEM_TEST_TIMEOUT_SEC",
            Self::StableImage => "HARNESS_CONNECTOR_IMAGE_STABLE",
            Self::PreviousImage => "HARNESS_CONNECTOR_IMAGE_PREVIOUS",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemTestConfig {
    /// Optional timeout floor.
    pub timeout: Option<Duration>,
    /// Optional stable connector image override.
    pub stable_image: Option<String>,
    /// Optional previous-release connector image override.
    pub previous_image: Option<String>,
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a value is not valid UTF-8, is empty, or
    /// fails validation (for example a non-positive timeout).
    pub fn load() -> Result<Self, String> {
        let timeout = read_env_nonempty(SystemTestEnv::TimeoutSeconds.as_str())?
            .map(|value| parse_timeout_secs(&value))
            .transpose()?;
        let stable_image = read_env_nonempty(SystemTestEnv::StableImage.as_str())?;
        let previous_image = read_env_nonempty(SystemTestEnv::PreviousImage.as_str())?;
        Ok(Self {
            timeout,
            stable_image,
            previous_image,
        })
    }
}

/// Returns the effective timeout, honoring the env floor when set.
///
/// The override acts as a minimum to avoid shortening explicitly longer
/// test timeouts.
#[must_use]
pub fn resolve_timeout(requested: Duration) -> Duration {
    match SystemTestConfig::load() {
        Ok(config) => config.timeout.map_or(requested, |floor| requested.max(floor)),
        Err(_) => requested,
    }
}

/// Applies the timeout floor to a poll specification.
#[must_use]
pub fn resolve_poll_spec(requested: PollSpec) -> PollSpec {
    PollSpec::new(requested.interval, resolve_timeout(requested.timeout))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable, enforcing UTF-8 and rejecting blanks.
fn read_env_nonempty(name: &str) -> Result<Option<String>, String> {
    let raw = match env::var_os(name) {
        Some(raw) => raw,
        None => return Ok(None),
    };
    let value = raw.into_string().map_err(|_| format!("{name} must be valid UTF-8"))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{name} must not be empty"));
    }
    Ok(Some(trimmed.to_string()))
}

/// Parses a positive integer number of seconds.
pub(crate) fn parse_timeout_secs(raw: &str) -> Result<Duration, String> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| "timeout must be a positive integer number of seconds".to_string())?;
    if secs == 0 {
        return Err("timeout must be greater than zero".to_string());
    }
    Ok(Duration::from_secs(secs))
}
