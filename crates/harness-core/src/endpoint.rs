// crates/harness-core/src/endpoint.rs
// ============================================================================
// Module: Service Endpoints
// Description: Typed service endpoints with default request headers.
// Purpose: Model runtime API surfaces and reserve loopback ports per run.
// Dependencies: thiserror, url
// ============================================================================

//! ## Overview
//! An [`Endpoint`] is a base URL plus the default headers every request to
//! that surface must carry (for example a management API key). Ports are
//! allocated from the loopback interface and reserved process-wide so a port
//! handed to one runtime is never handed out again during the same test run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::net::TcpListener;
use std::sync::Mutex;
use std::sync::OnceLock;

use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Endpoint construction and port allocation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// The endpoint URL could not be parsed.
    #[error("invalid endpoint url `{url}`: {reason}")]
    InvalidUrl {
        /// The offending URL text.
        url: String,
        /// Parser failure detail.
        reason: String,
    },
    /// No free loopback port could be reserved.
    #[error("port allocation failed: {0}")]
    PortAllocation(String),
}

// ============================================================================
// SECTION: Port Reservation
// ============================================================================

/// Process-wide registry of ports already handed out this run.
static RESERVED_PORTS: OnceLock<Mutex<HashSet<u16>>> = OnceLock::new();

/// Maximum allocation attempts before giving up.
const MAX_PORT_ATTEMPTS: usize = 64;

/// Reserves a free loopback port for exclusive use in this test run.
///
/// The port is bound once to discover it and released immediately; the
/// registry guarantees the same port is never returned twice by this
/// process, which keeps runtime configurations from aliasing each other.
///
/// # Errors
///
/// Returns [`EndpointError::PortAllocation`] when the loopback interface
/// cannot provide a fresh port.
pub fn free_port() -> Result<u16, EndpointError> {
    let registry = RESERVED_PORTS.get_or_init(|| Mutex::new(HashSet::new()));
    for _ in 0..MAX_PORT_ATTEMPTS {
        let listener = TcpListener::bind("127.0.0.1:0")
            .map_err(|err| EndpointError::PortAllocation(err.to_string()))?;
        let port = listener
            .local_addr()
            .map_err(|err| EndpointError::PortAllocation(err.to_string()))?
            .port();
        drop(listener);
        let mut guard = registry
            .lock()
            .map_err(|_| EndpointError::PortAllocation("port registry poisoned".to_string()))?;
        if guard.insert(port) {
            return Ok(port);
        }
    }
    Err(EndpointError::PortAllocation(format!(
        "no unreserved port after {MAX_PORT_ATTEMPTS} attempts"
    )))
}

// ============================================================================
// SECTION: Endpoint
// ============================================================================

/// A service endpoint: base URL plus default request headers.
///
/// # Invariants
/// - The URL is absolute and carries an explicit port.
/// - Header order is deterministic for reproducible request assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Base URL of the surface.
    url: Url,
    /// Default headers applied to every request against this surface.
    headers: BTreeMap<String, String>,
}

impl Endpoint {
    /// Creates an endpoint from an absolute URL without default headers.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::InvalidUrl`] when the text is not an
    /// absolute URL.
    pub fn new(url: &str) -> Result<Self, EndpointError> {
        let parsed = Url::parse(url).map_err(|err| EndpointError::InvalidUrl {
            url: url.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            url: parsed,
            headers: BTreeMap::new(),
        })
    }

    /// Creates a loopback endpoint on a freshly reserved port.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError`] when no port can be reserved or the
    /// resulting URL is invalid.
    pub fn loopback(path: &str) -> Result<Self, EndpointError> {
        let port = free_port()?;
        Self::new(&format!("http://localhost:{port}{path}"))
    }

    /// Returns the endpoint with an additional default header.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the port the endpoint is bound to, if present.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.url.port_or_known_default()
    }

    /// Returns the URL path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Returns the default headers in deterministic order.
    #[must_use]
    pub const fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Joins a relative path onto the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::InvalidUrl`] when the joined URL is invalid.
    pub fn resolve(&self, path: &str) -> Result<Url, EndpointError> {
        let mut base = self.url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let trimmed = path.trim_start_matches('/');
        Url::parse(&format!("{base}{trimmed}")).map_err(|err| EndpointError::InvalidUrl {
            url: format!("{base}{trimmed}"),
            reason: err.to_string(),
        })
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.url.as_str().trim_end_matches('/'))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
