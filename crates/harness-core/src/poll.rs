// crates/harness-core/src/poll.rs
// ============================================================================
// Module: Bounded Polling
// Description: The single poll-until-assert primitive used by the harness.
// Purpose: Observe asynchronous protocol outcomes without unbounded waits.
// Dependencies: thiserror, tokio
// ============================================================================

//! ## Overview
//! Every asynchronous protocol outcome is observed by re-invoking a read
//! operation at a bounded interval until a predicate holds or the timeout
//! budget is exhausted. No caller ever blocks a scheduler thread
//! indefinitely; a timed-out poll aborts only its own assertion and leaves
//! the underlying remote operation untouched, so it may still complete
//! out-of-band.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use std::time::Instant;

use thiserror::Error;
use tokio::time::sleep;

// ============================================================================
// SECTION: Poll Specification
// ============================================================================

/// Interval and timeout budget for one bounded poll.
///
/// # Invariants
/// - `interval` is strictly smaller than `timeout` in practice; a probe is
///   always attempted at least once before the budget is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSpec {
    /// Delay between probe attempts.
    pub interval: Duration,
    /// Total budget before the poll fails.
    pub timeout: Duration,
}

impl PollSpec {
    /// Creates a poll specification.
    #[must_use]
    pub const fn new(interval: Duration, timeout: Duration) -> Self {
        Self {
            interval,
            timeout,
        }
    }

    /// Default specification for lifecycle assertions: 250 ms / 60 s.
    #[must_use]
    pub const fn lifecycle() -> Self {
        Self::new(Duration::from_millis(250), Duration::from_secs(60))
    }

    /// Tight specification for in-process fixtures: 50 ms / 10 s.
    #[must_use]
    pub const fn quick() -> Self {
        Self::new(Duration::from_millis(50), Duration::from_secs(10))
    }
}

// ============================================================================
// SECTION: Timeout Error
// ============================================================================

/// A polled postcondition never became true within its budget.
///
/// # Invariants
/// - `attempts` counts completed probe invocations (at least one).
/// - `last_error` carries the most recent probe failure when one exists,
///   keeping failures reproducible without re-running.
#[derive(Debug, Error)]
#[error(
    "condition not reached after {attempts} attempts in {elapsed:?}{}",
    .last_error.as_ref().map(|err| format!("; last error: {err}")).unwrap_or_default()
)]
pub struct PollTimeout {
    /// Completed probe attempts.
    pub attempts: u32,
    /// Elapsed wall-clock time when the budget ran out.
    pub elapsed: Duration,
    /// Most recent probe failure, when the probe is fallible.
    pub last_error: Option<String>,
}

// ============================================================================
// SECTION: Poll Functions
// ============================================================================

/// Polls `probe` until it yields a value or the budget is exhausted.
///
/// # Errors
///
/// Returns [`PollTimeout`] when no probe attempt yields a value within
/// `spec.timeout`.
pub async fn poll_until<T, F, Fut>(spec: PollSpec, mut probe: F) -> Result<T, PollTimeout>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let start = Instant::now();
    let mut attempts = 0_u32;
    loop {
        attempts = attempts.saturating_add(1);
        if let Some(value) = probe().await {
            return Ok(value);
        }
        if start.elapsed() >= spec.timeout {
            return Err(PollTimeout {
                attempts,
                elapsed: start.elapsed(),
                last_error: None,
            });
        }
        sleep(spec.interval).await;
    }
}

/// Polls a fallible operation until it succeeds.
///
/// Failures before the budget runs out are legitimate transients (for
/// example an EDR not yet issued); only the final failure is reported.
///
/// # Errors
///
/// Returns [`PollTimeout`] carrying the last observed error when no attempt
/// succeeds within `spec.timeout`.
pub async fn poll_until_ok<T, E, F, Fut>(spec: PollSpec, mut probe: F) -> Result<T, PollTimeout>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let start = Instant::now();
    let mut attempts = 0_u32;
    let mut last_error = None;
    loop {
        attempts = attempts.saturating_add(1);
        match probe().await {
            Ok(value) => return Ok(value),
            Err(err) => last_error = Some(err.to_string()),
        }
        if start.elapsed() >= spec.timeout {
            return Err(PollTimeout {
                attempts,
                elapsed: start.elapsed(),
                last_error,
            });
        }
        sleep(spec.interval).await;
    }
}

/// Polls a fallible operation until it fails.
///
/// Used for eventually-unusable postconditions: after suspend, terminate,
/// or contract expiry the EDR must stop working, but not necessarily on the
/// first probe.
///
/// # Errors
///
/// Returns [`PollTimeout`] when every attempt within the budget still
/// succeeds.
pub async fn poll_until_err<T, E, F, Fut>(spec: PollSpec, mut probe: F) -> Result<(), PollTimeout>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let start = Instant::now();
    let mut attempts = 0_u32;
    loop {
        attempts = attempts.saturating_add(1);
        if probe().await.is_err() {
            return Ok(());
        }
        if start.elapsed() >= spec.timeout {
            return Err(PollTimeout {
                attempts,
                elapsed: start.elapsed(),
                last_error: None,
            });
        }
        sleep(spec.interval).await;
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
