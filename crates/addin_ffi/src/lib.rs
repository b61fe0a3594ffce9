//! Host-facing surface over the core bridge engine.
//!
//! # Responsibility
//! - Define the legacy dispatch contract traits and implement them for the
//!   bridged component.
//! - Own the process-global sample component and its flat entry API.
//!
//! # Invariants
//! - Entry functions never panic across the boundary.
//! - Legacy sentinel values carry failures across the contract traits;
//!   property reads and writes are the one exception and keep their typed
//!   errors.

pub mod api;
pub mod contract;
pub mod loopback;
pub mod sample;

pub use contract::{ExtenderHooks, LifecycleHooks};
pub use loopback::{EventNotification, JournalEntry, LoopbackConnection, LoopbackHost};
pub use sample::{SampleComponent, SAMPLE_COMPONENT_NAME};
