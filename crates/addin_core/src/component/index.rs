//! Raw member implementation index.
//!
//! # Responsibility
//! - Pair every implemented member name with an invocable thunk.
//! - Preserve insertion order; list positions become invocation handles.
//!
//! # Invariants
//! - Thunks signal failure through `CallError` and must not panic.
//! - Positions in the raw lists are load-bearing and never reshuffled.

use crate::model::variant::Variant;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CallResult<T> = Result<T, CallError>;

/// Failure raised inside component code during a call or property access.
///
/// Carries a short summary for the host notification channel and the full
/// text for the notification payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallError {
    message: String,
    detail: String,
}

impl CallError {
    /// Builds an error whose detail equals its summary.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            detail: message.clone(),
            message,
        }
    }

    pub fn with_detail(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: detail.into(),
        }
    }

    /// Wraps a library error, keeping its display as the summary and its
    /// source chain as the detail.
    pub fn from_error(err: &dyn Error) -> Self {
        let message = err.to_string();
        let mut detail = message.clone();
        let mut source = err.source();
        while let Some(cause) = source {
            detail.push_str("; caused by: ");
            detail.push_str(&cause.to_string());
            source = cause.source();
        }
        Self { message, detail }
    }

    /// Short summary forwarded as the notification message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Full text forwarded as the notification payload.
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl Display for CallError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CallError {}

impl From<String> for CallError {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for CallError {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Invocable method body: receives the component and marshalled arguments.
pub type MethodThunk<C> = fn(&mut C, &[Variant]) -> CallResult<Variant>;

/// Property read accessor.
pub type PropertyGetter<C> = fn(&C) -> CallResult<Variant>;

/// Property write accessor.
pub type PropertySetter<C> = fn(&mut C, &Variant) -> CallResult<()>;

/// One implemented method, identified by its primary name.
pub struct MethodImpl<C> {
    pub name: String,
    pub thunk: MethodThunk<C>,
}

/// One implemented property. Readability and writability are exactly the
/// presence of the matching accessor.
pub struct PropertyImpl<C> {
    pub name: String,
    pub getter: Option<PropertyGetter<C>>,
    pub setter: Option<PropertySetter<C>>,
}

impl<C> PropertyImpl<C> {
    pub fn readable(&self) -> bool {
        self.getter.is_some()
    }

    pub fn writable(&self) -> bool {
        self.setter.is_some()
    }
}

/// Ordered implementation tables for one component type.
pub struct MemberIndex<C> {
    methods: Vec<MethodImpl<C>>,
    properties: Vec<PropertyImpl<C>>,
}

impl<C> MemberIndex<C> {
    pub fn new() -> Self {
        Self {
            methods: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Appends one method; its list position becomes the invocation handle.
    pub fn method(mut self, name: &str, thunk: MethodThunk<C>) -> Self {
        self.methods.push(MethodImpl {
            name: name.to_string(),
            thunk,
        });
        self
    }

    /// Appends a read/write property.
    pub fn property(
        mut self,
        name: &str,
        getter: PropertyGetter<C>,
        setter: PropertySetter<C>,
    ) -> Self {
        self.properties.push(PropertyImpl {
            name: name.to_string(),
            getter: Some(getter),
            setter: Some(setter),
        });
        self
    }

    pub fn read_only_property(mut self, name: &str, getter: PropertyGetter<C>) -> Self {
        self.properties.push(PropertyImpl {
            name: name.to_string(),
            getter: Some(getter),
            setter: None,
        });
        self
    }

    pub fn write_only_property(mut self, name: &str, setter: PropertySetter<C>) -> Self {
        self.properties.push(PropertyImpl {
            name: name.to_string(),
            getter: None,
            setter: Some(setter),
        });
        self
    }

    pub fn methods(&self) -> &[MethodImpl<C>] {
        &self.methods
    }

    pub fn properties(&self) -> &[PropertyImpl<C>] {
        &self.properties
    }

    /// Position of the named method in the raw list, scanned front to back.
    pub fn find_method(&self, name: &str) -> Option<usize> {
        self.methods.iter().position(|method| method.name == name)
    }

    /// Position of the named property in the raw list.
    pub fn find_property(&self, name: &str) -> Option<usize> {
        self.properties
            .iter()
            .position(|property| property.name == name)
    }
}

impl<C> Default for MemberIndex<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{CallError, CallResult, MemberIndex};
    use crate::model::variant::Variant;

    struct Probe {
        stored: i32,
    }

    fn echo(_probe: &mut Probe, args: &[Variant]) -> CallResult<Variant> {
        args.first()
            .cloned()
            .ok_or_else(|| CallError::new("echo expects one argument"))
    }

    fn read_stored(probe: &Probe) -> CallResult<Variant> {
        Ok(Variant::Int(probe.stored))
    }

    fn write_stored(probe: &mut Probe, value: &Variant) -> CallResult<()> {
        probe.stored = value
            .as_i32()
            .ok_or_else(|| CallError::new("stored accepts integers"))?;
        Ok(())
    }

    #[test]
    fn positions_follow_insertion_order() {
        let index = MemberIndex::<Probe>::new()
            .method("First", echo)
            .method("Second", echo)
            .read_only_property("Stored", read_stored);

        assert_eq!(index.find_method("First"), Some(0));
        assert_eq!(index.find_method("Second"), Some(1));
        assert_eq!(index.find_method("Missing"), None);
        assert_eq!(index.find_property("Stored"), Some(0));
    }

    #[test]
    fn access_flags_derive_from_accessor_presence() {
        let index = MemberIndex::<Probe>::new()
            .property("Both", read_stored, write_stored)
            .read_only_property("ReadOnly", read_stored)
            .write_only_property("WriteOnly", write_stored);

        let properties = index.properties();
        assert!(properties[0].readable() && properties[0].writable());
        assert!(properties[1].readable() && !properties[1].writable());
        assert!(!properties[2].readable() && properties[2].writable());
    }

    #[test]
    fn call_error_keeps_summary_and_detail_apart() {
        let err = CallError::with_detail("short", "short with context");
        assert_eq!(err.message(), "short");
        assert_eq!(err.detail(), "short with context");

        let plain = CallError::new("only message");
        assert_eq!(plain.message(), plain.detail());
    }
}
