//! Member catalog contracts.
//!
//! This module turns a declared capability surface into the numeric lookup
//! tables the host drives: identifier assignment in `builder`, published
//! tables and metadata queries in `model`. Construction is two-phase and
//! all-or-nothing.

pub mod builder;
pub mod model;
