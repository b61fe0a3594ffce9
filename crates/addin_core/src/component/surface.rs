//! Capability-surface declarations and enumeration.
//!
//! # Responsibility
//! - Describe the callable surface a component advertises.
//! - Resolve the bilingual name pair for every declared member.
//! - Enumerate declared interfaces in stable order, minus infrastructure ones.
//!
//! # Invariants
//! - Declaration order is the enumeration order; nothing here sorts or dedups.
//! - A member without an explicit alias uses its primary name in both tables.

use crate::component::Component;
use serde::{Deserialize, Serialize};

/// Interface names that never contribute catalog members.
///
/// Covers the lifecycle and extender contracts plus host service plumbing, a
/// fixed set defined by the host protocol.
pub const INFRASTRUCTURE_INTERFACES: &[&str] = &[
    "LifecycleHooks",
    "ExtenderHooks",
    "HostConnection",
    "AsyncEventSink",
    "StatusLine",
    "ErrorLog",
];

/// One declared method: its name pair plus the call-shape metadata the host
/// queries before marshalling a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub primary_name: String,
    /// Alias in the host's second catalog language.
    pub alternate_name: Option<String>,
    pub parameter_count: usize,
    pub has_return_value: bool,
}

impl MethodDecl {
    pub fn new(primary_name: &str, parameter_count: usize, has_return_value: bool) -> Self {
        Self {
            primary_name: primary_name.to_string(),
            alternate_name: None,
            parameter_count,
            has_return_value,
        }
    }

    pub fn with_alias(mut self, alternate_name: &str) -> Self {
        self.alternate_name = Some(alternate_name.to_string());
        self
    }

    /// Name registered in the alternate lookup table; falls back to the
    /// primary name when no alias was declared.
    pub fn resolved_alternate(&self) -> &str {
        self.alternate_name.as_deref().unwrap_or(&self.primary_name)
    }
}

/// One declared property. Access flags are not declared here; they derive
/// from accessor presence in the implementation index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub primary_name: String,
    /// Alias in the host's second catalog language.
    pub alternate_name: Option<String>,
}

impl PropertyDecl {
    pub fn new(primary_name: &str) -> Self {
        Self {
            primary_name: primary_name.to_string(),
            alternate_name: None,
        }
    }

    pub fn with_alias(mut self, alternate_name: &str) -> Self {
        self.alternate_name = Some(alternate_name.to_string());
        self
    }

    pub fn resolved_alternate(&self) -> &str {
        self.alternate_name.as_deref().unwrap_or(&self.primary_name)
    }
}

/// One declared capability interface: an ordered block of members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDecl {
    pub name: String,
    pub methods: Vec<MethodDecl>,
    pub properties: Vec<PropertyDecl>,
}

impl InterfaceDecl {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            methods: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Appends one method declaration in enumeration order.
    pub fn method(mut self, decl: MethodDecl) -> Self {
        self.methods.push(decl);
        self
    }

    /// Appends one property declaration in enumeration order.
    pub fn property(mut self, decl: PropertyDecl) -> Self {
        self.properties.push(decl);
        self
    }
}

/// Returns the component's declared interfaces with infrastructure entries
/// removed.
///
/// # Invariants
/// - Output order equals the component's declaration order. A component must
///   declare the same surface on every call for identifiers to stay stable.
pub fn enumerate_capability_surface<C: Component>(component: &C) -> Vec<InterfaceDecl> {
    component
        .capability_surface()
        .into_iter()
        .filter(|interface| !is_infrastructure_interface(&interface.name))
        .collect()
}

pub fn is_infrastructure_interface(name: &str) -> bool {
    INFRASTRUCTURE_INTERFACES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::{is_infrastructure_interface, InterfaceDecl, MethodDecl, PropertyDecl};

    #[test]
    fn alternate_name_falls_back_to_primary() {
        let plain = MethodDecl::new("Compute", 2, true);
        assert_eq!(plain.resolved_alternate(), "Compute");

        let aliased = MethodDecl::new("Compute", 2, true).with_alias("Вычислить");
        assert_eq!(aliased.resolved_alternate(), "Вычислить");

        let property = PropertyDecl::new("Timeout");
        assert_eq!(property.resolved_alternate(), "Timeout");
    }

    #[test]
    fn interface_builder_preserves_declaration_order() {
        let interface = InterfaceDecl::new("Transport")
            .method(MethodDecl::new("Open", 1, false))
            .method(MethodDecl::new("Send", 2, true))
            .property(PropertyDecl::new("Connected"));

        assert_eq!(interface.methods.len(), 2);
        assert_eq!(interface.methods[0].primary_name, "Open");
        assert_eq!(interface.methods[1].primary_name, "Send");
        assert_eq!(interface.properties[0].primary_name, "Connected");
    }

    #[test]
    fn infrastructure_names_are_recognized() {
        assert!(is_infrastructure_interface("LifecycleHooks"));
        assert!(is_infrastructure_interface("AsyncEventSink"));
        assert!(!is_infrastructure_interface("Transport"));
    }
}
