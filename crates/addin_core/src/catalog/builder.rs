//! Catalog construction: identifier assignment and implementation resolution.
//!
//! # Responsibility
//! - Assign shared, monotonically increasing identifiers over the declared
//!   surface.
//! - Resolve every cataloged member to a raw implementation handle.
//!
//! # Invariants
//! - Methods are numbered before properties within one interface; numbering
//!   continues across interfaces and the counter is never reset.
//! - Construction is all-or-nothing: no partially filled catalog escapes.

use crate::catalog::model::{Catalog, MemberId, MemberKind, MethodDescriptor, PropertyDescriptor};
use crate::component::index::MemberIndex;
use crate::component::surface::{InterfaceDecl, MethodDecl, PropertyDecl};
use log::warn;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    DuplicateName {
        kind: MemberKind,
        name: String,
        first: MemberId,
        second: MemberId,
    },
    UnresolvedMethod(String),
    UnresolvedProperty(String),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateName {
                kind,
                name,
                first,
                second,
            } => write!(
                f,
                "duplicate {} name `{name}` for identifiers {first} and {second}",
                kind.as_str()
            ),
            Self::UnresolvedMethod(name) => {
                write!(f, "method `{name}` is declared but not implemented")
            }
            Self::UnresolvedProperty(name) => {
                write!(f, "property `{name}` is declared but not implemented")
            }
        }
    }
}

impl Error for CatalogError {}

/// Behavior when two members of one kind share a lookup name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// The later member silently replaces the earlier mapping, matching the
    /// legacy hash-table behavior; a warning is logged.
    #[default]
    LastWriterWins,
    /// Construction fails on the first duplicate.
    Reject,
}

/// Identifier-assigned surface, before implementation resolution.
#[derive(Debug, Clone, Default)]
pub struct DeclaredCatalog {
    method_ids_by_primary: BTreeMap<String, MemberId>,
    method_ids_by_alternate: BTreeMap<String, MemberId>,
    methods: BTreeMap<MemberId, MethodDecl>,
    property_ids_by_primary: BTreeMap<String, MemberId>,
    property_ids_by_alternate: BTreeMap<String, MemberId>,
    properties: BTreeMap<MemberId, PropertyDecl>,
}

/// Builds catalogs from a declared surface and a raw implementation index.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogBuilder {
    policy: CollisionPolicy,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collision_policy(policy: CollisionPolicy) -> Self {
        Self { policy }
    }

    /// Runs both construction phases over the surface.
    ///
    /// # Errors
    /// - `DuplicateName` under `CollisionPolicy::Reject`.
    /// - `UnresolvedMethod` / `UnresolvedProperty` when a declared member has
    ///   no entry in `index`.
    pub fn build<C>(
        &self,
        surface: &[InterfaceDecl],
        index: &MemberIndex<C>,
    ) -> CatalogResult<Catalog> {
        let declared = self.assign_identifiers(surface)?;
        resolve_implementations(declared, index)
    }

    /// First phase: walks the surface in declaration order and hands out
    /// identifiers from one shared counter, methods before properties per
    /// interface.
    pub fn assign_identifiers(&self, surface: &[InterfaceDecl]) -> CatalogResult<DeclaredCatalog> {
        let mut declared = DeclaredCatalog::default();
        let mut next_id: MemberId = 0;

        for interface in surface {
            for method in &interface.methods {
                let id = next_id;
                next_id += 1;
                self.insert_name(
                    &mut declared.method_ids_by_primary,
                    MemberKind::Method,
                    &method.primary_name,
                    id,
                )?;
                self.insert_name(
                    &mut declared.method_ids_by_alternate,
                    MemberKind::Method,
                    method.resolved_alternate(),
                    id,
                )?;
                declared.methods.insert(id, method.clone());
            }

            for property in &interface.properties {
                let id = next_id;
                next_id += 1;
                self.insert_name(
                    &mut declared.property_ids_by_primary,
                    MemberKind::Property,
                    &property.primary_name,
                    id,
                )?;
                self.insert_name(
                    &mut declared.property_ids_by_alternate,
                    MemberKind::Property,
                    property.resolved_alternate(),
                    id,
                )?;
                declared.properties.insert(id, property.clone());
            }
        }

        Ok(declared)
    }

    fn insert_name(
        &self,
        table: &mut BTreeMap<String, MemberId>,
        kind: MemberKind,
        name: &str,
        id: MemberId,
    ) -> CatalogResult<()> {
        if let Some(&first) = table.get(name) {
            match self.policy {
                CollisionPolicy::LastWriterWins => {
                    warn!(
                        "event=catalog_collision module=catalog status=replaced kind={} name={} first_id={} second_id={}",
                        kind.as_str(),
                        name,
                        first,
                        id
                    );
                }
                CollisionPolicy::Reject => {
                    return Err(CatalogError::DuplicateName {
                        kind,
                        name: name.to_string(),
                        first,
                        second: id,
                    });
                }
            }
        }
        table.insert(name.to_string(), id);
        Ok(())
    }
}

/// Second phase: maps every cataloged member to its raw implementation
/// position. A miss fails the whole construction.
pub fn resolve_implementations<C>(
    declared: DeclaredCatalog,
    index: &MemberIndex<C>,
) -> CatalogResult<Catalog> {
    let mut methods = BTreeMap::new();
    for (id, decl) in declared.methods {
        let handle = index
            .find_method(&decl.primary_name)
            .ok_or_else(|| CatalogError::UnresolvedMethod(decl.primary_name.clone()))?;
        methods.insert(
            id,
            MethodDescriptor {
                primary_name: decl.primary_name,
                parameter_count: decl.parameter_count,
                has_return_value: decl.has_return_value,
                handle,
            },
        );
    }

    let mut properties = BTreeMap::new();
    for (id, decl) in declared.properties {
        let handle = index
            .find_property(&decl.primary_name)
            .ok_or_else(|| CatalogError::UnresolvedProperty(decl.primary_name.clone()))?;
        let implementation = &index.properties()[handle];
        properties.insert(
            id,
            PropertyDescriptor {
                primary_name: decl.primary_name,
                readable: implementation.readable(),
                writable: implementation.writable(),
                handle,
            },
        );
    }

    Ok(Catalog {
        method_ids_by_primary: declared.method_ids_by_primary,
        method_ids_by_alternate: declared.method_ids_by_alternate,
        methods,
        property_ids_by_primary: declared.property_ids_by_primary,
        property_ids_by_alternate: declared.property_ids_by_alternate,
        properties,
    })
}
