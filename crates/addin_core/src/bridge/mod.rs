//! Bridge engine: registration lifecycle and late-bound dispatch.
//!
//! # Responsibility
//! - Drive one component through connect, register, dispatch, disconnect.
//! - Contain method dispatch failures on the host notification channel.
//! - Answer catalog metadata queries once registered.
//!
//! # Invariants
//! - A failed registration publishes nothing; previously published state
//!   stays in place.
//! - A contained dispatch failure produces exactly one notification and
//!   never propagates to the caller.
//! - Property accessors propagate failures; the notification channel stays
//!   silent for them.

use crate::catalog::builder::{CatalogBuilder, CatalogError, CollisionPolicy};
use crate::catalog::model::{Catalog, MemberId};
use crate::component::index::{CallError, CallResult, MemberIndex};
use crate::component::surface::enumerate_capability_surface;
use crate::component::Component;
use crate::host::notice::ErrorRecord;
use crate::host::services::{
    AsyncEventSink, ErrorLog, HostConnection, StatusLine, PROTOCOL_VERSION,
};
use crate::model::variant::Variant;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors surfaced by the engine's typed API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Entry point used before a successful registration.
    NotRegistered,
    UnknownProperty(MemberId),
    PropertyNotReadable(MemberId),
    PropertyNotWritable(MemberId),
    /// Failure inside a property accessor.
    Accessor(CallError),
}

impl Display for BridgeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotRegistered => write!(f, "component is not registered"),
            Self::UnknownProperty(id) => write!(f, "unknown property identifier: {id}"),
            Self::PropertyNotReadable(id) => write!(f, "property {id} has no read accessor"),
            Self::PropertyNotWritable(id) => write!(f, "property {id} has no write accessor"),
            Self::Accessor(err) => write!(f, "property accessor failed: {err}"),
        }
    }
}

impl Error for BridgeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Accessor(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CallError> for BridgeError {
    fn from(value: CallError) -> Self {
        Self::Accessor(value)
    }
}

/// Host service handles cached from the connection at init.
#[derive(Clone, Default)]
pub struct HostServices {
    event_sink: Option<Arc<dyn AsyncEventSink>>,
    status_line: Option<Arc<dyn StatusLine>>,
    error_log: Option<Arc<dyn ErrorLog>>,
}

impl HostServices {
    pub fn event_sink(&self) -> Option<&Arc<dyn AsyncEventSink>> {
        self.event_sink.as_ref()
    }

    pub fn status_line(&self) -> Option<&Arc<dyn StatusLine>> {
        self.status_line.as_ref()
    }

    pub fn error_log(&self) -> Option<&Arc<dyn ErrorLog>> {
        self.error_log.as_ref()
    }
}

/// Registration and dispatch engine wrapping one component instance.
///
/// State machine: unregistered until `register` succeeds; connected between
/// `init` and `done`. The two axes are independent.
pub struct AddIn<C: Component> {
    component: C,
    policy: CollisionPolicy,
    services: HostServices,
    connected: bool,
    catalog: Option<Catalog>,
    index: Option<MemberIndex<C>>,
}

impl<C: Component> AddIn<C> {
    pub fn new(component: C) -> Self {
        Self::with_collision_policy(component, CollisionPolicy::default())
    }

    pub fn with_collision_policy(component: C, policy: CollisionPolicy) -> Self {
        Self {
            component,
            policy,
            services: HostServices::default(),
            connected: false,
            catalog: None,
            index: None,
        }
    }

    pub fn component(&self) -> &C {
        &self.component
    }

    pub fn component_mut(&mut self) -> &mut C {
        &mut self.component
    }

    /// Service handles cached by the last `init`.
    pub fn host_services(&self) -> &HostServices {
        &self.services
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_registered(&self) -> bool {
        self.catalog.is_some()
    }

    /// Caches the connection's service handles.
    ///
    /// Missing services are tolerated: the outcome is logged, and reported to
    /// the host error journal when one resolved.
    pub fn init(&mut self, connection: &dyn HostConnection) {
        self.services = HostServices {
            event_sink: connection.async_event_sink(),
            status_line: connection.status_line(),
            error_log: connection.error_log(),
        };
        self.connected = true;

        let mut missing: Vec<&str> = Vec::new();
        if self.services.event_sink.is_none() {
            missing.push("async_event_sink");
        }
        if self.services.status_line.is_none() {
            missing.push("status_line");
        }
        if self.services.error_log.is_none() {
            missing.push("error_log");
        }

        info!(
            "event=host_connect module=bridge status=ok component={} missing_services={}",
            self.component.component_name(),
            if missing.is_empty() {
                "none".to_string()
            } else {
                missing.join(",")
            }
        );

        if !missing.is_empty() {
            if let Some(error_log) = &self.services.error_log {
                let record = ErrorRecord::info(
                    self.component.component_name(),
                    &format!("host services unavailable: {}", missing.join(", ")),
                );
                error_log.add_error("init", &record);
            }
        }
    }

    /// Drops the cached service handles.
    pub fn done(&mut self) {
        self.services = HostServices::default();
        self.connected = false;
        info!(
            "event=host_disconnect module=bridge status=ok component={}",
            self.component.component_name()
        );
    }

    /// Scaled protocol version for the host info query.
    pub fn component_info(&self) -> i32 {
        PROTOCOL_VERSION.encode()
    }

    /// Builds and publishes the member catalog; returns the advertised name.
    ///
    /// Re-registration rebuilds from the current surface and yields the same
    /// identifiers for an unchanged component. A failed build leaves the
    /// previously published catalog untouched.
    ///
    /// # Errors
    /// - `CatalogError` when identifier assignment or implementation
    ///   resolution fails.
    pub fn register(&mut self) -> Result<&str, CatalogError> {
        let surface = enumerate_capability_surface(&self.component);
        let index = self.component.member_index();
        let builder = CatalogBuilder::with_collision_policy(self.policy);

        match builder.build(&surface, &index) {
            Ok(catalog) => {
                info!(
                    "event=catalog_publish module=bridge status=ok component={} methods={} properties={}",
                    self.component.component_name(),
                    catalog.method_count(),
                    catalog.property_count()
                );
                self.catalog = Some(catalog);
                self.index = Some(index);
                Ok(self.component.component_name())
            }
            Err(err) => {
                warn!(
                    "event=catalog_publish module=bridge status=error component={} error={}",
                    self.component.component_name(),
                    err
                );
                Err(err)
            }
        }
    }

    fn catalog(&self) -> BridgeResult<&Catalog> {
        self.catalog.as_ref().ok_or(BridgeError::NotRegistered)
    }

    pub fn method_count(&self) -> BridgeResult<usize> {
        Ok(self.catalog()?.method_count())
    }

    pub fn property_count(&self) -> BridgeResult<usize> {
        Ok(self.catalog()?.property_count())
    }

    /// Resolves a method name, primary table first, then alternate.
    /// `Ok(None)` is the miss outcome, not an error.
    pub fn find_method(&self, name: &str) -> BridgeResult<Option<MemberId>> {
        Ok(self.catalog()?.find_method(name))
    }

    /// Resolves a property name, primary table first, then alternate.
    pub fn find_property(&self, name: &str) -> BridgeResult<Option<MemberId>> {
        Ok(self.catalog()?.find_property(name))
    }

    /// Primary name for a method identifier, regardless of which name
    /// resolved it.
    pub fn method_name(&self, id: MemberId) -> BridgeResult<Option<&str>> {
        Ok(self
            .catalog()?
            .method(id)
            .map(|descriptor| descriptor.primary_name.as_str()))
    }

    pub fn property_name(&self, id: MemberId) -> BridgeResult<Option<&str>> {
        Ok(self
            .catalog()?
            .property(id)
            .map(|descriptor| descriptor.primary_name.as_str()))
    }

    pub fn parameter_count(&self, id: MemberId) -> BridgeResult<Option<usize>> {
        Ok(self
            .catalog()?
            .method(id)
            .map(|descriptor| descriptor.parameter_count))
    }

    pub fn has_return_value(&self, id: MemberId) -> BridgeResult<Option<bool>> {
        Ok(self
            .catalog()?
            .method(id)
            .map(|descriptor| descriptor.has_return_value))
    }

    /// Declared default for one parameter slot. The protocol defines no
    /// defaults today, so a registered catalog always answers `None`.
    pub fn parameter_default_value(
        &self,
        _id: MemberId,
        _index: usize,
    ) -> BridgeResult<Option<Variant>> {
        self.catalog()?;
        Ok(None)
    }

    pub fn is_property_readable(&self, id: MemberId) -> BridgeResult<Option<bool>> {
        Ok(self
            .catalog()?
            .property(id)
            .map(|descriptor| descriptor.readable))
    }

    pub fn is_property_writable(&self, id: MemberId) -> BridgeResult<Option<bool>> {
        Ok(self
            .catalog()?
            .property(id)
            .map(|descriptor| descriptor.writable))
    }

    /// Invokes a method for its side effects.
    ///
    /// Once registered, every dispatch failure is contained: one notification
    /// on the host event channel, `Ok(())` to the caller.
    ///
    /// # Errors
    /// - `NotRegistered` before a successful registration.
    pub fn call_as_procedure(&mut self, id: MemberId, args: &[Variant]) -> BridgeResult<()> {
        self.invoke_contained(id, args).map(|_| ())
    }

    /// Invokes a method for its result. Contained failures yield
    /// `Variant::Empty`.
    ///
    /// A method cataloged without a return value still dispatches; its result
    /// is whatever the thunk produced, `Variant::Empty` by convention.
    ///
    /// # Errors
    /// - `NotRegistered` before a successful registration.
    pub fn call_as_function(&mut self, id: MemberId, args: &[Variant]) -> BridgeResult<Variant> {
        self.invoke_contained(id, args)
    }

    fn invoke_contained(&mut self, id: MemberId, args: &[Variant]) -> BridgeResult<Variant> {
        if !self.is_registered() {
            return Err(BridgeError::NotRegistered);
        }
        match self.try_invoke(id, args) {
            Ok(value) => Ok(value),
            Err(failure) => {
                self.report_dispatch_failure(id, &failure);
                Ok(Variant::Empty)
            }
        }
    }

    fn try_invoke(&mut self, id: MemberId, args: &[Variant]) -> CallResult<Variant> {
        let descriptor = self
            .catalog
            .as_ref()
            .and_then(|catalog| catalog.method(id))
            .cloned()
            .ok_or_else(|| CallError::new(format!("unknown method identifier {id}")))?;

        if args.len() != descriptor.parameter_count {
            return Err(CallError::new(format!(
                "method `{}` expects {} argument(s), got {}",
                descriptor.primary_name,
                descriptor.parameter_count,
                args.len()
            )));
        }

        let thunk = self
            .index
            .as_ref()
            .and_then(|index| index.methods().get(descriptor.handle))
            .map(|method| method.thunk)
            .ok_or_else(|| {
                CallError::new(format!(
                    "method `{}` has no implementation entry",
                    descriptor.primary_name
                ))
            })?;

        thunk(&mut self.component, args)
    }

    /// Forwards one contained failure to the host event channel.
    fn report_dispatch_failure(&self, id: MemberId, failure: &CallError) {
        let source = self.component.component_name();
        let delivered = match self.services.event_sink() {
            Some(sink) => {
                sink.external_event(source, failure.message(), failure.detail());
                true
            }
            None => false,
        };
        warn!(
            "event=dispatch_contained module=bridge status=error component={} method_id={} delivered={} error={}",
            source,
            id,
            delivered,
            failure.message()
        );
    }

    /// Reads a property value. Failures propagate; the notification channel
    /// stays silent.
    ///
    /// # Errors
    /// - `NotRegistered`, `UnknownProperty`, `PropertyNotReadable`, or the
    ///   accessor's own failure.
    pub fn property_value(&self, id: MemberId) -> BridgeResult<Variant> {
        let handle = self
            .catalog()?
            .property(id)
            .ok_or(BridgeError::UnknownProperty(id))?
            .handle;
        let getter = self
            .index
            .as_ref()
            .and_then(|index| index.properties().get(handle))
            .and_then(|property| property.getter)
            .ok_or(BridgeError::PropertyNotReadable(id))?;
        getter(&self.component).map_err(BridgeError::Accessor)
    }

    /// Writes a property value. Failures propagate; the notification channel
    /// stays silent.
    ///
    /// # Errors
    /// - `NotRegistered`, `UnknownProperty`, `PropertyNotWritable`, or the
    ///   accessor's own failure.
    pub fn set_property_value(&mut self, id: MemberId, value: &Variant) -> BridgeResult<()> {
        let handle = self
            .catalog()?
            .property(id)
            .ok_or(BridgeError::UnknownProperty(id))?
            .handle;
        let setter = self
            .index
            .as_ref()
            .and_then(|index| index.properties().get(handle))
            .and_then(|property| property.setter)
            .ok_or(BridgeError::PropertyNotWritable(id))?;
        setter(&mut self.component, value).map_err(BridgeError::Accessor)
    }
}
