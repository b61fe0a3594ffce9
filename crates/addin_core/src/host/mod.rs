//! Host-side contracts.
//!
//! Everything the host supplies to a connected component lives here: service
//! traits behind shareable handles, the structured notice vocabulary, and
//! the protocol version constants.

pub mod notice;
pub mod services;
