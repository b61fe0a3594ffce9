//! Legacy entry-point contract implemented over the core engine.
//!
//! # Responsibility
//! - Mirror the fixed entry points the host drives, in host-observable form.
//! - Translate typed core errors into the legacy sentinels (`""`, -1, 0).
//!
//! # Invariants
//! - No entry point panics; failures become sentinels plus a log line.
//! - `register_extension_as` answers with an empty name when catalog
//!   construction fails; the underlying error is logged, not surfaced.
//! - Property reads and writes keep their typed errors; they are the one
//!   part of the surface that propagates failure.

use addin_core::{
    AddIn, BridgeResult, Component, HostConnection, MemberId, Variant, MEMBER_NOT_FOUND,
};
use log::{error, warn};

/// Lifecycle hooks the host calls around component use.
pub trait LifecycleHooks {
    /// Accepts the host connection. `true` means the component is usable.
    fn init(&mut self, connection: &dyn HostConnection) -> bool;

    /// Teardown notification before unload.
    fn done(&mut self);

    /// Scaled protocol version (`2000` for 2.0).
    fn component_info(&self) -> i32;
}

/// Catalog and dispatch hooks, in the host's numeric-identifier model.
///
/// Name queries accept an alias-language selector; the selector is ignored
/// and the primary name is returned, which is what hosts observe from the
/// established implementations of this protocol.
pub trait ExtenderHooks {
    fn register_extension_as(&mut self) -> String;

    fn method_count(&self) -> i32;
    fn find_method(&self, name: &str) -> MemberId;
    fn method_name(&self, id: MemberId, alias: i32) -> Option<String>;
    fn parameter_count(&self, id: MemberId) -> i32;
    fn parameter_default_value(&self, id: MemberId, index: i32) -> Option<Variant>;
    fn has_return_value(&self, id: MemberId) -> bool;
    fn call_as_procedure(&mut self, id: MemberId, args: &[Variant]) -> bool;
    fn call_as_function(&mut self, id: MemberId, args: &[Variant]) -> Option<Variant>;

    fn property_count(&self) -> i32;
    fn find_property(&self, name: &str) -> MemberId;
    fn property_name(&self, id: MemberId, alias: i32) -> Option<String>;
    fn is_property_readable(&self, id: MemberId) -> bool;
    fn is_property_writable(&self, id: MemberId) -> bool;
    fn property_value(&self, id: MemberId) -> BridgeResult<Variant>;
    fn set_property_value(&mut self, id: MemberId, value: &Variant) -> BridgeResult<()>;
}

impl<C: Component> LifecycleHooks for AddIn<C> {
    fn init(&mut self, connection: &dyn HostConnection) -> bool {
        AddIn::init(self, connection);
        true
    }

    fn done(&mut self) {
        AddIn::done(self);
    }

    fn component_info(&self) -> i32 {
        AddIn::component_info(self)
    }
}

impl<C: Component> ExtenderHooks for AddIn<C> {
    fn register_extension_as(&mut self) -> String {
        match AddIn::register(self) {
            Ok(name) => name.to_string(),
            Err(err) => {
                error!("event=register_extension module=ffi status=error error={err}");
                String::new()
            }
        }
    }

    fn method_count(&self) -> i32 {
        count_or_zero(AddIn::method_count(self))
    }

    fn find_method(&self, name: &str) -> MemberId {
        id_or_not_found(AddIn::find_method(self, name))
    }

    fn method_name(&self, id: MemberId, _alias: i32) -> Option<String> {
        AddIn::method_name(self, id)
            .ok()
            .flatten()
            .map(str::to_string)
    }

    fn parameter_count(&self, id: MemberId) -> i32 {
        match AddIn::parameter_count(self, id) {
            Ok(Some(count)) => i32::try_from(count).unwrap_or(i32::MAX),
            _ => 0,
        }
    }

    fn parameter_default_value(&self, id: MemberId, index: i32) -> Option<Variant> {
        let slot = usize::try_from(index).ok()?;
        AddIn::parameter_default_value(self, id, slot).ok().flatten()
    }

    fn has_return_value(&self, id: MemberId) -> bool {
        matches!(AddIn::has_return_value(self, id), Ok(Some(true)))
    }

    fn call_as_procedure(&mut self, id: MemberId, args: &[Variant]) -> bool {
        match AddIn::call_as_procedure(self, id, args) {
            Ok(()) => true,
            Err(err) => {
                warn!("event=call_as_procedure module=ffi status=rejected method_id={id} error={err}");
                false
            }
        }
    }

    fn call_as_function(&mut self, id: MemberId, args: &[Variant]) -> Option<Variant> {
        match AddIn::call_as_function(self, id, args) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("event=call_as_function module=ffi status=rejected method_id={id} error={err}");
                None
            }
        }
    }

    fn property_count(&self) -> i32 {
        count_or_zero(AddIn::property_count(self))
    }

    fn find_property(&self, name: &str) -> MemberId {
        id_or_not_found(AddIn::find_property(self, name))
    }

    fn property_name(&self, id: MemberId, _alias: i32) -> Option<String> {
        AddIn::property_name(self, id)
            .ok()
            .flatten()
            .map(str::to_string)
    }

    fn is_property_readable(&self, id: MemberId) -> bool {
        matches!(AddIn::is_property_readable(self, id), Ok(Some(true)))
    }

    fn is_property_writable(&self, id: MemberId) -> bool {
        matches!(AddIn::is_property_writable(self, id), Ok(Some(true)))
    }

    fn property_value(&self, id: MemberId) -> BridgeResult<Variant> {
        AddIn::property_value(self, id)
    }

    fn set_property_value(&mut self, id: MemberId, value: &Variant) -> BridgeResult<()> {
        AddIn::set_property_value(self, id, value)
    }
}

fn count_or_zero(result: BridgeResult<usize>) -> i32 {
    match result {
        Ok(count) => i32::try_from(count).unwrap_or(i32::MAX),
        Err(_) => 0,
    }
}

fn id_or_not_found(result: BridgeResult<Option<MemberId>>) -> MemberId {
    match result {
        Ok(Some(id)) => id,
        Ok(None) | Err(_) => MEMBER_NOT_FOUND,
    }
}
