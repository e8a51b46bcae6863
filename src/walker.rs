//! schema type-graph walker
//!
//! visits every named type once, in declaration order, and dispatches on the
//! type kind to the [`Emitter`]. argument records follow the type declaring them.

use crate::emitter::{Declaration, Emitter};
use crate::error::Result;
use crate::naming::NameRegistry;
use crate::schema::{is_builtin_scalar, is_introspection_type, Schema};
use graphql_parser::schema::TypeDefinition;
use std::collections::BTreeSet;

/// which types a walk visits
#[derive(Debug, Clone, Default)]
pub enum TypeFilter {
    /// every schema-authored type, introspection types excluded
    #[default]
    Authored,
    /// every type including introspection types
    All,
    /// exactly these type names
    Only(BTreeSet<String>),
}

impl TypeFilter {
    fn admits(&self, name: &str) -> bool {
        match self {
            TypeFilter::Authored => !is_introspection_type(name),
            TypeFilter::All => true,
            TypeFilter::Only(names) => names.contains(name),
        }
    }
}

pub struct TypeWalker<'w, 'a> {
    schema: &'w Schema<'a>,
    emitter: &'w Emitter<'w, 'a>,
    filter: TypeFilter,
    enums_only: bool,
}

impl<'w, 'a> TypeWalker<'w, 'a> {
    pub fn new(schema: &'w Schema<'a>, emitter: &'w Emitter<'w, 'a>) -> Self {
        Self {
            schema,
            emitter,
            filter: TypeFilter::default(),
            enums_only: false,
        }
    }

    pub fn with_filter(mut self, filter: TypeFilter) -> Self {
        self.filter = filter;
        self
    }

    /// skip everything except enums
    pub fn enums_only(mut self, enabled: bool) -> Self {
        self.enums_only = enabled;
        self
    }

    /// emit declarations for every admitted type
    pub fn walk(&self, registry: &mut NameRegistry) -> Result<Vec<Declaration>> {
        let mut out = Vec::new();
        for (name, def) in self.schema.types() {
            if is_builtin_scalar(name) || !self.filter.admits(name) {
                continue;
            }
            if self.enums_only && !matches!(def, TypeDefinition::Enum(_)) {
                continue;
            }

            match def {
                TypeDefinition::Scalar(scalar) => out.push(self.emitter.scalar(scalar)?),
                TypeDefinition::Enum(enum_ty) => out.push(self.emitter.enumeration(enum_ty)?),
                TypeDefinition::Object(object) => {
                    out.push(self.emitter.object(object)?);
                    out.extend(self.emitter.arguments(name, &object.fields, registry)?);
                }
                TypeDefinition::Interface(iface) => {
                    out.push(self.emitter.interface(iface)?);
                    out.extend(self.emitter.arguments(name, &iface.fields, registry)?);
                }
                TypeDefinition::Union(union_ty) => out.push(self.emitter.union(union_ty)?),
                TypeDefinition::InputObject(input) => {
                    out.push(self.emitter.input_object(input)?)
                }
            }
        }

        tracing::debug!(declarations = out.len(), "walked schema types");
        Ok(out)
    }
}
