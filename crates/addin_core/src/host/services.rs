//! Host-provided service contracts.
//!
//! # Responsibility
//! - Model the callback services a connected host hands to the component.
//! - Keep service handles object-safe and shareable across the bridge.
//!
//! # Invariants
//! - Service methods take `&self`; implementations keep state behind interior
//!   mutability.
//! - The bridge never assumes a service resolved; every handle is optional.

use crate::host::notice::ErrorRecord;
use std::sync::Arc;

/// Protocol version advertised through the lifecycle info query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolVersion {
    pub major: i32,
    pub minor: i32,
}

impl ProtocolVersion {
    /// Scaled wire form: `major * 1000 + minor`.
    pub fn encode(&self) -> i32 {
        self.major * 1000 + self.minor
    }
}

/// Version of the host protocol this crate implements.
pub const PROTOCOL_VERSION: ProtocolVersion = ProtocolVersion { major: 2, minor: 0 };

/// Host channel for component-originated notifications.
pub trait AsyncEventSink: Send + Sync {
    /// Queues one notification `(source, message, data)` on the host side.
    fn external_event(&self, source: &str, message: &str, data: &str);

    /// Resizes the host-side notification buffer.
    fn set_event_buffer_depth(&self, depth: i64);

    /// Current host-side notification buffer depth.
    fn event_buffer_depth(&self) -> i64;

    /// Drops buffered, undelivered notifications.
    fn clean_buffer(&self);
}

/// Host status-bar text control.
pub trait StatusLine: Send + Sync {
    fn set_status_line(&self, text: &str);
    fn reset_status_line(&self);
}

/// Host error journal. Consumed during initialization failures only.
pub trait ErrorLog: Send + Sync {
    fn add_error(&self, context: &str, record: &ErrorRecord);
}

/// Connection object the host passes at init.
///
/// Each query returns `None` when the host does not offer that service; the
/// bridge caches whatever resolves and works with the rest absent.
pub trait HostConnection: Send + Sync {
    fn async_event_sink(&self) -> Option<Arc<dyn AsyncEventSink>>;
    fn status_line(&self) -> Option<Arc<dyn StatusLine>>;
    fn error_log(&self) -> Option<Arc<dyn ErrorLog>>;
}

#[cfg(test)]
mod tests {
    use super::{ProtocolVersion, PROTOCOL_VERSION};

    #[test]
    fn protocol_version_encodes_scaled() {
        assert_eq!(PROTOCOL_VERSION.encode(), 2000);
        assert_eq!(ProtocolVersion { major: 3, minor: 12 }.encode(), 3012);
    }
}
