//! typescript declarations plugin
//!
//! walks the schema once, then appends whichever introspection types the
//! operation documents can reach.

use crate::config::{PluginConfig, ResolvedConfig};
use crate::emitter::{Declaration, Emitter};
use crate::error::Result;
use crate::introspection::{IntrospectionIncluder, INTROSPECTION_SDL};
use crate::naming::NameRegistry;
use crate::plugin::PluginOutput;
use crate::render::{base_registry, TypeNames};
use crate::schema::Schema;
use crate::walker::{TypeFilter, TypeWalker};
use graphql_parser::query;
use graphql_parser::schema::parse_schema;

/// generate type declarations for `schema`
pub fn generate(
    schema: &Schema<'_>,
    documents: &[query::Document<'_, String>],
    config: &PluginConfig,
) -> Result<PluginOutput> {
    let config = config.resolve()?;
    let declarations = declarations(schema, documents, &config)?;

    let prepend = if config.enums_only {
        Vec::new()
    } else {
        vec![config.maybe_declaration()]
    };
    let content = declarations
        .iter()
        .map(|decl| decl.source.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(PluginOutput { prepend, content })
}

/// every declaration in output order, schema types first
pub fn declarations(
    schema: &Schema<'_>,
    documents: &[query::Document<'_, String>],
    config: &ResolvedConfig,
) -> Result<Vec<Declaration>> {
    let introspection_doc = parse_schema::<String>(INTROSPECTION_SDL)?;
    let introspection = Schema::new(&introspection_doc)?;

    let filter = if config.include_introspection_types {
        Some(TypeFilter::All)
    } else {
        let reachable = IntrospectionIncluder::new(schema, &introspection).collect(documents)?;
        (!reachable.is_empty()).then(|| TypeFilter::Only(reachable.into_set()))
    };

    let mut registry = base_registry();
    let names = TypeNames::assign(schema, config, &mut registry);
    let meta_names = TypeNames::assign(&introspection, config, &mut registry);

    let mut out = walk(schema, &names, config, TypeFilter::Authored, &mut registry)?;
    if let Some(filter) = filter {
        out.extend(walk(&introspection, &meta_names, config, filter, &mut registry)?);
    }

    tracing::debug!(declarations = out.len(), "generated type declarations");
    Ok(out)
}

fn walk(
    schema: &Schema<'_>,
    names: &TypeNames<'_>,
    config: &ResolvedConfig,
    filter: TypeFilter,
    registry: &mut NameRegistry,
) -> Result<Vec<Declaration>> {
    let emitter = Emitter::new(schema, names, config);
    TypeWalker::new(schema, &emitter)
        .with_filter(filter)
        .enums_only(config.enums_only)
        .walk(registry)
}
