// crates/harness-runtime/src/lib.rs
// ============================================================================
// Module: Harness Runtime
// Description: Lifecycle orchestration for the runtimes under test.
// Purpose: Start, gate, expose, and tear down embedded and containerized
//          runtimes behind one uniform handle.
// Dependencies: harness-core, testcontainers, tokio
// ============================================================================

//! ## Overview
//! The orchestrator owns every backing runtime for a test class. Embedded
//! runtimes launch in-process from generated dotted-key settings;
//! containerized runtimes launch a pinned image with the equivalent
//! environment-variable settings and gate readiness on a log-line pattern.
//! Either way, a handle only exists once its runtime is ready, services are
//! reachable through a typed registry, mock substitution is sealed at
//! readiness, and teardown is idempotent and runs in reverse start order
//! regardless of failures.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod container;
pub mod embedded;
pub mod error;
pub mod events;
pub mod orchestrator;
pub mod registry;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use container::ContainerRuntime;
pub use container::ContainerSpec;
pub use embedded::EmbeddedRuntime;
pub use embedded::RuntimeLauncher;
pub use embedded::ShutdownHandle;
pub use error::RuntimeError;
pub use events::RuntimeEvent;
pub use events::RuntimeEventObserver;
pub use events::RuntimeKind;
pub use orchestrator::Orchestrator;
pub use orchestrator::RuntimeHandle;
pub use orchestrator::readiness_gate;
pub use registry::ServiceRegistry;
