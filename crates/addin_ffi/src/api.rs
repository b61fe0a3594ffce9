//! Flat entry API over the process-global sample bridge.
//!
//! # Responsibility
//! - Own the singleton bridged component a host process drives.
//! - Expose stable, use-case-level functions with envelope results.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - The global bridge is created on first use and reused afterwards.
//! - Catalog and dispatch answers keep the legacy sentinel semantics.

use crate::contract::{ExtenderHooks, LifecycleHooks};
use crate::loopback::{EventNotification, LoopbackConnection, LoopbackHost};
use crate::sample::SampleComponent;
use addin_core::{
    core_version as core_version_inner, default_log_level, init_logging as init_logging_inner,
    ping as ping_inner, AddIn, MemberId, Variant,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

const LOG_DIR_ENV: &str = "ADDIN_LOG_DIR";
const LOG_DIR_NAME: &str = "addin-logs";

static BRIDGE: OnceLock<Mutex<AddIn<SampleComponent>>> = OnceLock::new();
static LOOPBACK: OnceLock<Arc<LoopbackHost>> = OnceLock::new();
static LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics; always returns a UTF-8 string.
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics; always returns a UTF-8 string.
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Initializes logging with build-mode defaults and a resolved directory.
///
/// The directory comes from `ADDIN_LOG_DIR` when set, otherwise a fixed
/// subdirectory of the system temp dir.
///
/// # FFI contract
/// - Same guarantees as `init_logging`.
pub fn init_default_logging() -> String {
    let dir = resolve_log_dir();
    let Some(dir_str) = dir.to_str() else {
        return format!("log dir is not valid UTF-8: {}", dir.display());
    };
    match init_logging_inner(default_log_level(), dir_str) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action response envelope for bridge entry calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the operation was accepted.
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Value response envelope for bridge entry calls.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueResponse {
    /// Whether the operation was accepted.
    pub ok: bool,
    /// Resulting value; `Variant::Empty` on failure.
    pub value: Variant,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ValueResponse {
    fn success(value: Variant) -> Self {
        Self {
            ok: true,
            value,
            message: String::new(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            value: Variant::Empty,
            message: message.into(),
        }
    }
}

/// Connects the global bridge to the in-process loopback host.
///
/// # FFI contract
/// - Sync call; idempotent, the loopback host is shared per process.
/// - Never panics.
pub fn component_connect() -> ActionResponse {
    let connection = LoopbackConnection::new(loopback());
    with_bridge(|bridge| {
        if LifecycleHooks::init(bridge, &connection) {
            ActionResponse::success("Host connected.")
        } else {
            ActionResponse::failure("component rejected the host connection")
        }
    })
}

/// Releases the bridge's cached host service handles.
///
/// # FFI contract
/// - Sync call; never panics.
pub fn component_disconnect() -> ActionResponse {
    with_bridge(|bridge| {
        LifecycleHooks::done(bridge);
        ActionResponse::success("Host disconnected.")
    })
}

/// Scaled protocol version of the component (`2000` for 2.0).
pub fn component_info() -> i32 {
    with_bridge(|bridge| LifecycleHooks::component_info(bridge))
}

/// Registers the member catalog and returns the advertised component name.
///
/// # FFI contract
/// - Sync call; never panics.
/// - Returns an empty string when catalog construction fails.
pub fn component_register() -> String {
    with_bridge(|bridge| ExtenderHooks::register_extension_as(bridge))
}

pub fn component_method_count() -> i32 {
    with_bridge(|bridge| ExtenderHooks::method_count(bridge))
}

pub fn component_property_count() -> i32 {
    with_bridge(|bridge| ExtenderHooks::property_count(bridge))
}

/// Resolves a method name to its identifier; `-1` when unknown.
pub fn component_find_method(name: String) -> MemberId {
    with_bridge(|bridge| ExtenderHooks::find_method(bridge, name.as_str()))
}

/// Resolves a property name to its identifier; `-1` when unknown.
pub fn component_find_property(name: String) -> MemberId {
    with_bridge(|bridge| ExtenderHooks::find_property(bridge, name.as_str()))
}

/// Primary name of a method; the alias selector is accepted and ignored.
pub fn component_method_name(id: MemberId, alias: i32) -> Option<String> {
    with_bridge(|bridge| ExtenderHooks::method_name(bridge, id, alias))
}

/// Primary name of a property; the alias selector is accepted and ignored.
pub fn component_property_name(id: MemberId, alias: i32) -> Option<String> {
    with_bridge(|bridge| ExtenderHooks::property_name(bridge, id, alias))
}

pub fn component_parameter_count(id: MemberId) -> i32 {
    with_bridge(|bridge| ExtenderHooks::parameter_count(bridge, id))
}

pub fn component_has_return_value(id: MemberId) -> bool {
    with_bridge(|bridge| ExtenderHooks::has_return_value(bridge, id))
}

pub fn component_is_property_readable(id: MemberId) -> bool {
    with_bridge(|bridge| ExtenderHooks::is_property_readable(bridge, id))
}

pub fn component_is_property_writable(id: MemberId) -> bool {
    with_bridge(|bridge| ExtenderHooks::is_property_writable(bridge, id))
}

/// Invokes a method for its side effects.
///
/// # FFI contract
/// - Sync call; never panics.
/// - Dispatch failures after registration are contained on the host event
///   channel and still answer `ok = true`.
pub fn component_call_as_procedure(id: MemberId, args: Vec<Variant>) -> ActionResponse {
    with_bridge(|bridge| {
        if ExtenderHooks::call_as_procedure(bridge, id, &args) {
            ActionResponse::success("Call dispatched.")
        } else {
            ActionResponse::failure("component is not registered")
        }
    })
}

/// Invokes a method for its result.
///
/// # FFI contract
/// - Sync call; never panics.
/// - Contained dispatch failures answer `ok = true` with an empty value.
pub fn component_call_as_function(id: MemberId, args: Vec<Variant>) -> ValueResponse {
    with_bridge(|bridge| match ExtenderHooks::call_as_function(bridge, id, &args) {
        Some(value) => ValueResponse::success(value),
        None => ValueResponse::failure("component is not registered"),
    })
}

/// Reads a property value. Failures are reported in the envelope.
pub fn component_property_value(id: MemberId) -> ValueResponse {
    with_bridge(|bridge| match ExtenderHooks::property_value(bridge, id) {
        Ok(value) => ValueResponse::success(value),
        Err(err) => ValueResponse::failure(format!("property read failed: {err}")),
    })
}

/// Writes a property value. Failures are reported in the envelope.
pub fn component_set_property_value(id: MemberId, value: Variant) -> ActionResponse {
    with_bridge(
        |bridge| match ExtenderHooks::set_property_value(bridge, id, &value) {
            Ok(()) => ActionResponse::success("Property updated."),
            Err(err) => ActionResponse::failure(format!("property write failed: {err}")),
        },
    )
}

/// Removes and returns the notifications captured by the loopback host.
pub fn host_drain_events() -> Vec<EventNotification> {
    loopback().drain_events()
}

/// Last status-bar text the component set, if any.
pub fn host_status_text() -> Option<String> {
    loopback().status_text()
}

/// Pushes text to the host status line through the cached service handle.
pub fn host_set_status(text: String) -> ActionResponse {
    with_bridge(|bridge| match bridge.host_services().status_line() {
        Some(line) => {
            line.set_status_line(text.as_str());
            ActionResponse::success("Status line updated.")
        }
        None => ActionResponse::failure("status line service unavailable; connect first"),
    })
}

/// Clears the host status line through the cached service handle.
pub fn host_reset_status() -> ActionResponse {
    with_bridge(|bridge| match bridge.host_services().status_line() {
        Some(line) => {
            line.reset_status_line();
            ActionResponse::success("Status line reset.")
        }
        None => ActionResponse::failure("status line service unavailable; connect first"),
    })
}

fn with_bridge<T>(operation: impl FnOnce(&mut AddIn<SampleComponent>) -> T) -> T {
    let bridge = BRIDGE.get_or_init(|| Mutex::new(AddIn::new(SampleComponent::new())));
    let mut guard = bridge.lock().unwrap_or_else(PoisonError::into_inner);
    operation(&mut guard)
}

fn loopback() -> Arc<LoopbackHost> {
    Arc::clone(LOOPBACK.get_or_init(LoopbackHost::new))
}

fn resolve_log_dir() -> PathBuf {
    LOG_DIR
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(LOG_DIR_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(LOG_DIR_NAME)
        })
        .clone()
}
