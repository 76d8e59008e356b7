// crates/harness-runtime/src/events.rs
// ============================================================================
// Module: Runtime Events
// Description: Typed lifecycle events emitted by the orchestrator.
// Purpose: Observability hooks without a hard logging dependency.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The orchestrator emits typed events through an optional observer so
//! downstream harness deployments can plug in their own logging or metrics
//! without this crate depending on either.

// ============================================================================
// SECTION: Backend Kind
// ============================================================================

/// Backend kind of a managed runtime.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeKind {
    /// In-process runtime launched from dotted-key settings.
    Embedded,
    /// Out-of-process containerized runtime fed env-var settings.
    Container,
}

impl RuntimeKind {
    /// Returns a stable label for the backend kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Embedded => "embedded",
            Self::Container => "container",
        }
    }
}

// ============================================================================
// SECTION: Events
// ============================================================================

/// Lifecycle event emitted by the orchestrator.
///
/// # Invariants
/// - `Ready` is emitted at most once per runtime, after `Started`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// Runtime launch initiated.
    Started {
        /// Runtime name.
        name: String,
        /// Backend kind.
        kind: RuntimeKind,
    },
    /// Runtime signalled readiness.
    Ready {
        /// Runtime name.
        name: String,
    },
    /// Runtime stopped.
    Stopped {
        /// Runtime name.
        name: String,
    },
}

/// Observer callback receiving runtime events.
pub type RuntimeEventObserver = Box<dyn Fn(&RuntimeEvent) + Send + Sync>;
