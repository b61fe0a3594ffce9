//! Catalog tables and lookup structures.
//!
//! # Responsibility
//! - Hold the per-kind identifier and name tables published at registration.
//! - Answer the host's metadata queries without touching component code.
//!
//! # Invariants
//! - Identifiers come from one shared counter and are never reused.
//! - A `Catalog` is write-once: filled by the builder, read-only afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Catalog member identifier assigned at registration.
///
/// Zero-based and contiguous across methods and properties together. Stable
/// for the lifetime of one registered catalog; opaque to the host otherwise.
pub type MemberId = i32;

/// Identifier returned by the legacy surface when a name lookup misses.
pub const MEMBER_NOT_FOUND: MemberId = -1;

/// Catalog member kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Method,
    Property,
}

impl MemberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::Property => "property",
        }
    }
}

/// Call-shape metadata and dispatch handle for one cataloged method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub primary_name: String,
    pub parameter_count: usize,
    pub has_return_value: bool,
    /// Position of the implementation in the raw method list.
    pub handle: usize,
}

/// Access flags and dispatch handle for one cataloged property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub primary_name: String,
    pub readable: bool,
    pub writable: bool,
    /// Position of the implementation in the raw property list.
    pub handle: usize,
}

/// Immutable member catalog published by a successful registration.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(crate) method_ids_by_primary: BTreeMap<String, MemberId>,
    pub(crate) method_ids_by_alternate: BTreeMap<String, MemberId>,
    pub(crate) methods: BTreeMap<MemberId, MethodDescriptor>,
    pub(crate) property_ids_by_primary: BTreeMap<String, MemberId>,
    pub(crate) property_ids_by_alternate: BTreeMap<String, MemberId>,
    pub(crate) properties: BTreeMap<MemberId, PropertyDescriptor>,
}

impl Catalog {
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Resolves a method name, primary table first, then alternate.
    pub fn find_method(&self, name: &str) -> Option<MemberId> {
        self.method_ids_by_primary
            .get(name)
            .or_else(|| self.method_ids_by_alternate.get(name))
            .copied()
    }

    /// Resolves a property name, primary table first, then alternate.
    pub fn find_property(&self, name: &str) -> Option<MemberId> {
        self.property_ids_by_primary
            .get(name)
            .or_else(|| self.property_ids_by_alternate.get(name))
            .copied()
    }

    pub fn method(&self, id: MemberId) -> Option<&MethodDescriptor> {
        self.methods.get(&id)
    }

    pub fn property(&self, id: MemberId) -> Option<&PropertyDescriptor> {
        self.properties.get(&id)
    }

    /// Identifiers of all cataloged methods, ascending.
    pub fn method_ids(&self) -> Vec<MemberId> {
        self.methods.keys().copied().collect()
    }

    /// Identifiers of all cataloged properties, ascending.
    pub fn property_ids(&self) -> Vec<MemberId> {
        self.properties.keys().copied().collect()
    }
}
