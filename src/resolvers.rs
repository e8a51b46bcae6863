//! resolver signature synthesizer
//!
//! re-walks the schema and emits, per object type, a namespace of generic
//! resolver signatures parameterized by Result, Parent, Context and Args.
//! `mappers` / `defaultMapper` substitute custom types for graphql types in
//! both the Parent and the Result position.

use crate::config::{ExternalRef, MemberKind, PluginConfig, ResolvedConfig, TypeReference};
use crate::error::Result;
use crate::naming::{pascal_case, NameRegistry};
use crate::plugin::PluginOutput;
use crate::render::{base_registry, doc_comment, NamedTypeResolver, TypeNames, TypeRenderer};
use crate::schema::{is_builtin_scalar, is_introspection_type, Schema, TypeKind};
use graphql_parser::query;
use graphql_parser::schema::{Field, ObjectType, TypeDefinition};
use std::collections::BTreeMap;

const INDENT: &str = "  ";
const GRAPHQL_MODULE: &str = "graphql";
const RESOLVE_INFO: &str = "GraphQLResolveInfo";
const SCALAR_TYPE: &str = "GraphQLScalarType";
const SCALAR_TYPE_CONFIG: &str = "GraphQLScalarTypeConfig";

/// generate resolver signatures for `schema`
///
/// documents are accepted for symmetry with the types plugin and not consulted.
pub fn generate(
    schema: &Schema<'_>,
    _documents: &[query::Document<'_, String>],
    config: &PluginConfig,
) -> Result<PluginOutput> {
    let config = config.resolve()?;
    let names = TypeNames::assign(schema, &config, &mut base_registry());
    let output = ResolverSynthesizer::new(schema, &names, &config).synthesize()?;
    Ok(PluginOutput {
        prepend: output.imports,
        content: output.declarations.join("\n\n"),
    })
}

/// import statements collected during one pass, grouped by module
#[derive(Debug, Clone, Default)]
pub struct Imports {
    modules: BTreeMap<String, BTreeMap<String, String>>,
}

impl Imports {
    /// import a symbol under its own name; the caller owns the name
    fn add_plain(&mut self, module: &str, symbol: &str) {
        self.modules
            .entry(module.to_string())
            .or_default()
            .insert(symbol.to_string(), symbol.to_string());
    }

    /// import an external reference, aliasing it when its name is taken
    fn add(&mut self, external: &ExternalRef, registry: &mut NameRegistry) -> String {
        if let Some(local) = self.local(external) {
            return local.to_string();
        }
        let local = if registry.contains(&external.symbol) {
            registry.claim(&format!("{}Mapper", external.symbol))
        } else {
            registry.claim(&external.symbol)
        };
        self.modules
            .entry(external.module_path.clone())
            .or_default()
            .insert(external.symbol.clone(), local.clone());
        local
    }

    fn local(&self, external: &ExternalRef) -> Option<&str> {
        self.modules
            .get(&external.module_path)
            .and_then(|symbols| symbols.get(&external.symbol))
            .map(String::as_str)
    }

    /// typescript expression for a reference, `{T}` replaced by `type_name`
    fn expression(&self, reference: &TypeReference, type_name: Option<&str>) -> String {
        let expr = match reference {
            TypeReference::Inline(value) => value.clone(),
            TypeReference::External(external) => {
                let local = self.local(external).unwrap_or(&external.symbol);
                format!("{local}{}", external.type_args)
            }
        };
        match type_name {
            Some(name) => expr.replace("{T}", name),
            None => expr,
        }
    }

    /// one `import { ... } from '...';` line per module, sorted
    pub fn render(&self) -> Vec<String> {
        self.modules
            .iter()
            .map(|(module, symbols)| {
                let specifiers: Vec<String> = symbols
                    .iter()
                    .map(|(symbol, local)| {
                        if symbol == local {
                            symbol.clone()
                        } else {
                            format!("{symbol} as {local}")
                        }
                    })
                    .collect();
                format!("import {{ {} }} from '{module}';", specifiers.join(", "))
            })
            .collect()
    }
}

/// named type resolution with mapper substitution
struct MappedTypes<'m, 'a> {
    schema: &'m Schema<'a>,
    names: &'m TypeNames<'m>,
    config: &'m ResolvedConfig,
    imports: &'m Imports,
}

impl MappedTypes<'_, '_> {
    /// parent type for a type's own resolvers, `{}` for unmapped root types
    fn parent_type(&self, name: &str) -> Result<String> {
        if self.schema.is_root_type(name) && !self.config.mappers.contains_key(name) {
            return Ok("{}".to_string());
        }
        self.resolve_named(name)
    }
}

impl NamedTypeResolver for MappedTypes<'_, '_> {
    fn resolve_named(&self, name: &str) -> Result<String> {
        let declared = self.names.resolve_named(name)?;
        if is_builtin_scalar(name) || !self.schema.contains(name) {
            return Ok(declared);
        }

        if let Some(mapper) = self.config.mappers.get(name) {
            return Ok(self.imports.expression(mapper, Some(&declared)));
        }

        let default_applies = self.schema.kind_of(name).is_some_and(TypeKind::is_composite)
            && !self.schema.is_root_type(name);
        match &self.config.default_mapper {
            Some(default) if default_applies => {
                Ok(self.imports.expression(default, Some(&declared)))
            }
            _ => Ok(declared),
        }
    }
}

/// identifiers shared by every namespace in one output
struct SharedNames {
    resolver: String,
    subscription_object: String,
    subscription_resolver: String,
    type_resolve_fn: String,
    root: String,
    context_param: String,
    type_parent_param: String,
    parent_param: String,
    result_param: String,
    context_default: String,
}

/// prepend lines and declarations produced by the synthesizer
#[derive(Debug, Clone, Default)]
pub struct ResolverOutput {
    pub imports: Vec<String>,
    pub declarations: Vec<String>,
}

pub struct ResolverSynthesizer<'s, 'a> {
    schema: &'s Schema<'a>,
    names: &'s TypeNames<'s>,
    config: &'s ResolvedConfig,
}

impl<'s, 'a> ResolverSynthesizer<'s, 'a> {
    pub fn new(
        schema: &'s Schema<'a>,
        names: &'s TypeNames<'s>,
        config: &'s ResolvedConfig,
    ) -> Self {
        Self {
            schema,
            names,
            config,
        }
    }

    pub fn synthesize(&self) -> Result<ResolverOutput> {
        let mut registry = base_registry();
        for identifier in self.names.identifiers() {
            registry.reserve(identifier);
        }
        for symbol in [RESOLVE_INFO, SCALAR_TYPE, SCALAR_TYPE_CONFIG] {
            registry.reserve(symbol);
        }

        let mut shared = self.shared_names(&mut registry);
        let imports = self.collect_imports(&mut registry);
        if let Some(context) = &self.config.context_type {
            shared.context_default = imports.expression(context, None);
        }
        let mapped = MappedTypes {
            schema: self.schema,
            names: self.names,
            config: self.config,
            imports: &imports,
        };

        let mut declarations = vec![self.helpers(&shared)];
        let mut root_entries = Vec::new();
        let mut uses_scalars = false;

        for (name, def) in self.schema.types() {
            if is_builtin_scalar(name) || is_introspection_type(name) {
                continue;
            }
            match def {
                TypeDefinition::Object(object) => {
                    let namespace = registry.claim(&format!("{}Resolvers", self.declared(name)?));
                    let (source, resolvers) =
                        self.object_namespace(object, &namespace, &mapped, &shared, &registry)?;
                    declarations.push(source);
                    root_entries.push(format!(
                        "{name}?: {namespace}.{resolvers}<{}>;",
                        shared.context_param
                    ));
                }
                TypeDefinition::Interface(_) | TypeDefinition::Union(_) => {
                    let members: Vec<&str> = match def {
                        TypeDefinition::Union(union_ty) => {
                            union_ty.types.iter().map(String::as_str).collect()
                        }
                        _ => self.schema.implementations(name),
                    };
                    let namespace = registry.claim(&format!("{}Resolvers", self.declared(name)?));
                    let (source, resolvers) =
                        self.abstract_namespace(&namespace, &members, &mapped, &shared, &registry)?;
                    declarations.push(source);
                    root_entries.push(format!(
                        "{name}?: {namespace}.{resolvers}<{}>;",
                        shared.context_param
                    ));
                }
                TypeDefinition::Scalar(scalar) => {
                    uses_scalars = true;
                    let declared = self.declared(name)?;
                    let config_name = registry.claim(&format!("{declared}ScalarConfig"));
                    declarations.push(format!(
                        "{}{}interface {config_name} extends {SCALAR_TYPE_CONFIG}<{declared}, any> {{\n{INDENT}name: \"{name}\";\n}}",
                        doc_comment(scalar.description.as_ref(), ""),
                        self.config.export_prefix()
                    ));
                    root_entries.push(format!("{name}?: {SCALAR_TYPE};"));
                }
                TypeDefinition::Enum(_) | TypeDefinition::InputObject(_) => {}
            }
        }

        declarations.push(self.root_aggregate(&shared, &root_entries));

        let mut imports = imports;
        imports.add_plain(GRAPHQL_MODULE, RESOLVE_INFO);
        if uses_scalars {
            imports.add_plain(GRAPHQL_MODULE, SCALAR_TYPE);
            imports.add_plain(GRAPHQL_MODULE, SCALAR_TYPE_CONFIG);
        }

        tracing::debug!(declarations = declarations.len(), "synthesized resolver signatures");
        Ok(ResolverOutput {
            imports: imports.render(),
            declarations,
        })
    }

    fn declared(&self, name: &str) -> Result<String> {
        self.names.resolve_named(name)
    }

    /// context type first, then the default mapper, then mappers by type name
    fn collect_imports(&self, registry: &mut NameRegistry) -> Imports {
        let mut imports = Imports::default();
        let mut references = Vec::new();
        references.extend(self.config.context_type.iter());
        references.extend(self.config.default_mapper.iter());
        for (type_name, mapper) in &self.config.mappers {
            if self.schema.contains(type_name) {
                references.push(mapper);
            } else {
                tracing::warn!(
                    type_name = %type_name,
                    "mapper names a type missing from the schema; ignoring"
                );
            }
        }
        for external in references.into_iter().filter_map(TypeReference::external) {
            imports.add(external, registry);
        }
        imports
    }

    /// helper and generic parameter names win over imported symbols
    fn shared_names(&self, registry: &mut NameRegistry) -> SharedNames {
        SharedNames {
            resolver: registry.claim("Resolver"),
            subscription_object: registry.claim("ISubscriptionResolverObject"),
            subscription_resolver: registry.claim("SubscriptionResolver"),
            type_resolve_fn: registry.claim("TypeResolveFn"),
            root: registry.claim("IResolvers"),
            context_param: registry.claim("Context"),
            type_parent_param: registry.claim("TypeParent"),
            parent_param: registry.claim("Parent"),
            result_param: registry.claim("R"),
            context_default: "{}".to_string(),
        }
    }

    fn helpers(&self, shared: &SharedNames) -> String {
        let export = self.config.export_prefix();
        let SharedNames {
            resolver,
            subscription_object,
            subscription_resolver,
            type_resolve_fn,
            ..
        } = shared;

        format!(
            "{export}type {resolver}<Result, Parent = {{}}, Context = {{}}, Args = {{}}> = (
  parent: Parent,
  args: Args,
  context: Context,
  info: {RESOLVE_INFO}
) => Promise<Result> | Result;

{export}interface {subscription_object}<Result, Parent, Context, Args> {{
  subscribe<R = Result, P = Parent>(
    parent: P,
    args: Args,
    context: Context,
    info: {RESOLVE_INFO}
  ): AsyncIterator<R | Result> | Promise<AsyncIterator<R | Result>>;
  resolve?<R = Result, P = Parent>(
    parent: P,
    args: Args,
    context: Context,
    info: {RESOLVE_INFO}
  ): R | Result | Promise<R | Result>;
}}

{export}type {subscription_resolver}<Result, Parent = {{}}, Context = {{}}, Args = {{}}> =
  | ((...args: any[]) => {subscription_object}<Result, Parent, Context, Args>)
  | {subscription_object}<Result, Parent, Context, Args>;

{export}type {type_resolve_fn}<Types, Parent = {{}}, Context = {{}}> = (
  parent: Parent,
  context: Context,
  info: {RESOLVE_INFO}
) => Maybe<Types>;"
        )
    }

    /// the `<Type>Resolvers` namespace for one object type; returns the source
    /// and the name of its `Resolvers` interface
    fn object_namespace(
        &self,
        object: &ObjectType<'a, String>,
        namespace: &str,
        mapped: &MappedTypes<'_, 'a>,
        shared: &SharedNames,
        global: &NameRegistry,
    ) -> Result<(String, String)> {
        let mut scope = global.clone();
        let resolvers = scope.claim("Resolvers");
        let parent = mapped.parent_type(&object.name)?;
        let is_subscription = self.schema.subscription_type() == Some(object.name.as_str());
        let results = TypeRenderer::new(mapped, self.config);

        let SharedNames {
            context_param: ctx,
            type_parent_param: type_parent,
            parent_param,
            result_param: r,
            context_default,
            ..
        } = shared;

        let mut members = String::new();
        let mut signatures = Vec::new();
        for field in &object.fields {
            let result = results.render(&field.field_type)?;
            let resolver_name = scope.claim(&format!("{}Resolver", pascal_case(&field.name)));
            let args_name = if field.arguments.is_empty() {
                None
            } else {
                Some(scope.claim(&format!("{}Args", pascal_case(&field.name))))
            };

            members.push_str(&doc_comment(field.description.as_ref(), "    "));
            members.push_str(&format!(
                "    {}?: {resolver_name}<{result}, {type_parent}, {ctx}>;\n",
                field.name
            ));

            let base = if is_subscription {
                &shared.subscription_resolver
            } else {
                &shared.resolver
            };
            let args_param = args_name
                .as_deref()
                .map(|args| format!(", {args}"))
                .unwrap_or_default();
            signatures.push(format!(
                "{INDENT}export type {resolver_name}<{r} = {result}, {parent_param} = {parent}, {ctx} = {context_default}> = {base}<{r}, {parent_param}, {ctx}{args_param}>;"
            ));
            if let Some(args_name) = &args_name {
                signatures.push(self.args_record(args_name, field)?);
            }
        }

        let mut out = doc_comment(object.description.as_ref(), "");
        out.push_str(&format!(
            "{}namespace {namespace} {{\n",
            self.config.export_prefix()
        ));
        out.push_str(&format!(
            "{INDENT}export interface {resolvers}<{ctx} = {context_default}, {type_parent} = {parent}> {{\n"
        ));
        out.push_str(&members);
        out.push_str(&format!("{INDENT}}}\n"));
        if !signatures.is_empty() {
            out.push('\n');
            for signature in &signatures {
                out.push_str(signature);
                out.push('\n');
            }
        }
        out.push('}');
        Ok((out, resolvers))
    }

    fn args_record(&self, args_name: &str, field: &Field<'a, String>) -> Result<String> {
        let renderer = TypeRenderer::new(self.names, self.config);
        let mut out = format!("{INDENT}export interface {args_name} {{\n");
        for arg in &field.arguments {
            out.push_str(&doc_comment(arg.description.as_ref(), "    "));
            out.push_str(&format!(
                "    {}\n",
                renderer.member(&arg.name, &arg.value_type, MemberKind::Argument, self.config)?
            ));
        }
        out.push_str(&format!("{INDENT}}}"));
        Ok(out)
    }

    /// `__resolveType` namespace for an interface or union
    fn abstract_namespace(
        &self,
        namespace: &str,
        members: &[&str],
        mapped: &MappedTypes<'_, 'a>,
        shared: &SharedNames,
        global: &NameRegistry,
    ) -> Result<(String, String)> {
        let mut scope = global.clone();
        let resolvers = scope.claim("Resolvers");
        let resolve_type = scope.claim("ResolveType");
        let ctx = &shared.context_param;
        let context_default = &shared.context_default;

        let (names, parents) = if members.is_empty() {
            ("never".to_string(), "never".to_string())
        } else {
            let names: Vec<String> = members.iter().map(|m| format!("\"{m}\"")).collect();
            let parents = members
                .iter()
                .map(|m| mapped.parent_type(m))
                .collect::<Result<Vec<_>>>()?;
            (names.join(" | "), parents.join(" | "))
        };

        let out = format!(
            "{export}namespace {namespace} {{
{INDENT}export interface {resolvers}<{ctx} = {context_default}> {{
    __resolveType: {resolve_type}<{ctx}>;
{INDENT}}}

{INDENT}export type {resolve_type}<{ctx} = {context_default}> = {type_resolve_fn}<{names}, {parents}, {ctx}>;
}}",
            export = self.config.export_prefix(),
            type_resolve_fn = shared.type_resolve_fn,
        );
        Ok((out, resolvers))
    }

    fn root_aggregate(&self, shared: &SharedNames, entries: &[String]) -> String {
        let header = format!(
            "{}interface {}<{} = {}>",
            self.config.export_prefix(),
            shared.root,
            shared.context_param,
            shared.context_default
        );
        if entries.is_empty() {
            return format!("{header} {{}}");
        }
        let body: String = entries
            .iter()
            .map(|entry| format!("{INDENT}{entry}\n"))
            .collect();
        format!("{header} {{\n{body}}}")
    }
}
