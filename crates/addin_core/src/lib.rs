//! Core engine for host-pluggable external components.
//! This crate is the single source of truth for catalog and dispatch invariants.

pub mod bridge;
pub mod catalog;
pub mod component;
pub mod host;
pub mod logging;
pub mod model;

pub use bridge::{AddIn, BridgeError, BridgeResult, HostServices};
pub use catalog::builder::{
    resolve_implementations, CatalogBuilder, CatalogError, CatalogResult, CollisionPolicy,
    DeclaredCatalog,
};
pub use catalog::model::{
    Catalog, MemberId, MemberKind, MethodDescriptor, PropertyDescriptor, MEMBER_NOT_FOUND,
};
pub use component::index::{
    CallError, CallResult, MemberIndex, MethodImpl, MethodThunk, PropertyGetter, PropertyImpl,
    PropertySetter,
};
pub use component::surface::{
    enumerate_capability_surface, is_infrastructure_interface, InterfaceDecl, MethodDecl,
    PropertyDecl, INFRASTRUCTURE_INTERFACES,
};
pub use component::Component;
pub use host::notice::{
    ErrorRecord, NoticeSeverity, RESULT_FAIL, RESULT_FALSE, RESULT_INVALID_POINTER, RESULT_OK,
    RESULT_UNEXPECTED,
};
pub use host::services::{
    AsyncEventSink, ErrorLog, HostConnection, ProtocolVersion, StatusLine, PROTOCOL_VERSION,
};
pub use logging::{default_log_level, init_logging};
pub use model::variant::Variant;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
