//! Boundary value model shared by the catalog and dispatch layers.
//!
//! # Responsibility
//! - Define the data shapes that cross the host/component boundary.
//!
//! # Invariants
//! - Model types are serializable snapshots; no behavior beyond accessors.

pub mod variant;
