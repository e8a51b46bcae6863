//! type reference rendering
//!
//! turns graphql type references (`[User!]`, `Int!`, ...) into typescript type
//! expressions. named types are resolved through a [`NamedTypeResolver`], so the
//! resolvers plugin can swap in mapper types without touching the recursion.

use crate::config::{MemberKind, ResolvedConfig};
use crate::error::{Error, Result};
use crate::naming::NameRegistry;
use crate::schema::{is_builtin_scalar, type_name, Schema};
use graphql_parser::schema::Type;
use indexmap::IndexMap;

/// names reserved before any schema type gets a name: the `Maybe` helper and
/// the typescript globals the output refers to
pub const RESERVED_TYPE_NAMES: [&str; 5] =
    ["Maybe", "Array", "ReadonlyArray", "Promise", "AsyncIterator"];

/// registry seeded with the helper names every output declares
pub fn base_registry() -> NameRegistry {
    let mut registry = NameRegistry::new();
    for name in RESERVED_TYPE_NAMES {
        registry.reserve(name);
    }
    registry
}

/// maps a graphql named type to the typescript expression that refers to it
pub trait NamedTypeResolver {
    fn resolve_named(&self, name: &str) -> Result<String>;
}

/// generated identifiers for every named type in one schema
#[derive(Debug, Clone)]
pub struct TypeNames<'c> {
    config: &'c ResolvedConfig,
    names: IndexMap<String, String>,
}

impl<'c> TypeNames<'c> {
    /// assign a unique identifier to each schema type, in declaration order
    pub fn assign(
        schema: &Schema<'_>,
        config: &'c ResolvedConfig,
        registry: &mut NameRegistry,
    ) -> Self {
        let mut names = IndexMap::new();
        for (name, def) in schema.types() {
            if is_builtin_scalar(type_name(def)) {
                continue;
            }
            let converted = config.type_naming.apply(name);
            names.insert(name.to_string(), registry.claim(&converted));
        }
        Self { config, names }
    }

    /// generated identifier for a declared (non built-in) type
    pub fn get(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(String::as_str)
    }

    /// every assigned identifier
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.names.values().map(String::as_str)
    }
}

impl NamedTypeResolver for TypeNames<'_> {
    fn resolve_named(&self, name: &str) -> Result<String> {
        if is_builtin_scalar(name) {
            return Ok(self.config.scalar_type(name));
        }
        self.get(name)
            .map(str::to_string)
            .ok_or_else(|| Error::SchemaIntegrity(format!("unknown type `{name}`")))
    }
}

/// renders type references with one resolver and the array/nullability settings
pub struct TypeRenderer<'r> {
    resolver: &'r dyn NamedTypeResolver,
    immutable: bool,
}

impl<'r> TypeRenderer<'r> {
    pub fn new(resolver: &'r dyn NamedTypeResolver, config: &ResolvedConfig) -> Self {
        Self {
            resolver,
            immutable: config.immutable_types,
        }
    }

    /// full expression including the `Maybe` wrapper for nullable references
    pub fn render(&self, ty: &Type<'_, String>) -> Result<String> {
        match ty {
            Type::NonNullType(inner) => self.render_non_null(inner),
            _ => Ok(format!("Maybe<{}>", self.render_non_null(ty)?)),
        }
    }

    fn render_non_null(&self, ty: &Type<'_, String>) -> Result<String> {
        match ty {
            Type::NamedType(name) => self.resolver.resolve_named(name),
            Type::NonNullType(inner) => self.render_non_null(inner),
            Type::ListType(inner) => {
                let item = self.render(inner)?;
                if self.immutable {
                    Ok(format!("ReadonlyArray<{item}>"))
                } else {
                    Ok(format!("Array<{item}>"))
                }
            }
        }
    }

    /// one record member line body, e.g. `profile?: Maybe<Profile>;`
    pub fn member(
        &self,
        name: &str,
        ty: &Type<'_, String>,
        kind: MemberKind,
        config: &ResolvedConfig,
    ) -> Result<String> {
        let nullable = !matches!(ty, Type::NonNullType(_));
        let marker = if nullable && config.optionals.marks_optional(kind) {
            "?"
        } else {
            ""
        };
        let readonly = if config.immutable_types { "readonly " } else { "" };
        Ok(format!("{readonly}{name}{marker}: {};", self.render(ty)?))
    }
}

/// `/** ... */` block for an optional description, indented by `indent`
pub fn doc_comment(description: Option<&String>, indent: &str) -> String {
    let Some(text) = description.map(|d| d.trim()).filter(|d| !d.is_empty()) else {
        return String::new();
    };
    let text = text.replace("*/", "*\\/");
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() == 1 {
        return format!("{indent}/** {} */\n", lines[0]);
    }
    let mut out = format!("{indent}/**\n");
    for line in lines {
        if line.trim().is_empty() {
            out.push_str(&format!("{indent} *\n"));
        } else {
            out.push_str(&format!("{indent} * {}\n", line.trim_end()));
        }
    }
    out.push_str(&format!("{indent} */\n"));
    out
}
