//! plugin configuration
//!
//! build a [`PluginConfig`] (from json or with the `with_*` helpers), then call
//! [`PluginConfig::resolve`] to validate it once into a [`ResolvedConfig`].
//! the resolved value is what the generators read during a pass.

use crate::error::{Error, Result};
use crate::naming::NamingConvention;
use serde::Deserialize;
use std::collections::BTreeMap;

const DEFAULT_MAYBE_VALUE: &str = "T | null";
const DEFAULT_SCALAR_TYPE: &str = "any";

/// raw configuration as handed over by the pipeline
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginConfig {
    /// scalar name -> typescript type expression
    pub scalars: BTreeMap<String, String>,
    /// type used for custom scalars missing from `scalars`
    pub default_scalar_type: Option<String>,
    pub naming_convention: Option<NamingConventionConfig>,
    pub avoid_optionals: AvoidOptionals,
    pub const_enums: bool,
    pub enums_as_types: bool,
    pub immutable_types: bool,
    /// template for the nullable wrapper, `T` is the wrapped type
    pub maybe_value: Option<String>,
    pub no_export: bool,
    pub generate_only: Option<String>,
    pub include_introspection_types: bool,
    /// graphql type name -> `module#Symbol` or inline expression
    pub mappers: BTreeMap<String, String>,
    pub default_mapper: Option<String>,
    pub context_type: Option<String>,
}

/// a single convention or one per identifier kind
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NamingConventionConfig {
    Uniform(String),
    PerKind {
        #[serde(rename = "typeNames")]
        type_names: Option<String>,
        #[serde(rename = "enumValues")]
        enum_values: Option<String>,
    },
}

/// `avoidOptionals` accepts a flag or a per member kind map
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AvoidOptionals {
    All(bool),
    PerKind(OptionalPolicy),
}

impl Default for AvoidOptionals {
    fn default() -> Self {
        AvoidOptionals::All(false)
    }
}

/// which member kinds drop the `?` marker on nullable members
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionalPolicy {
    /// object and interface fields
    pub field: bool,
    /// input object fields
    pub input_value: bool,
    /// field arguments
    pub argument: bool,
}

/// kind of record member being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    InputValue,
    Argument,
}

impl OptionalPolicy {
    /// true if a nullable member of this kind keeps the `?` marker
    pub fn marks_optional(&self, kind: MemberKind) -> bool {
        let avoid = match kind {
            MemberKind::Field => self.field,
            MemberKind::InputValue => self.input_value,
            MemberKind::Argument => self.argument,
        };
        !avoid
    }
}

/// how enums are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumStyle {
    /// `enum Color { Red = "RED" }`
    Native,
    /// `const enum Color { Red = "RED" }`
    Const,
    /// `type Color = "RED" | "GREEN"`
    StringUnion,
}

/// a parsed `mappers`, `defaultMapper`, or `contextType` value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeReference {
    /// used verbatim, e.g. `any` or `Partial<{T}>`
    Inline(String),
    /// `module#Symbol<Args>`, needs an import
    External(ExternalRef),
}

/// an imported symbol
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExternalRef {
    pub module_path: String,
    pub symbol: String,
    /// trailing type arguments including the angle brackets, may be empty
    pub type_args: String,
}

impl TypeReference {
    /// parse a reference string, failing on a missing module or symbol
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        let Some((module_path, rest)) = value.split_once('#') else {
            if value.is_empty() {
                return Err(Error::Config("empty type reference".to_string()));
            }
            return Ok(TypeReference::Inline(value.to_string()));
        };

        let module_path = module_path.trim();
        if module_path.is_empty() {
            return Err(Error::Config(format!(
                "type reference `{value}` is missing a module path"
            )));
        }

        let (symbol, type_args) = match rest.find('<') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, ""),
        };
        if !is_identifier(symbol) {
            return Err(Error::Config(format!(
                "type reference `{value}` is missing a valid symbol name"
            )));
        }
        if !type_args.is_empty() && !type_args.ends_with('>') {
            return Err(Error::Config(format!(
                "type reference `{value}` has unbalanced type arguments"
            )));
        }

        Ok(TypeReference::External(ExternalRef {
            module_path: module_path.to_string(),
            symbol: symbol.to_string(),
            type_args: type_args.to_string(),
        }))
    }

    pub fn external(&self) -> Option<&ExternalRef> {
        match self {
            TypeReference::External(ext) => Some(ext),
            TypeReference::Inline(_) => None,
        }
    }
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// true if `template` mentions `T` as a standalone identifier
fn mentions_type_param(template: &str) -> bool {
    let chars: Vec<char> = template.chars().collect();
    chars.iter().enumerate().any(|(idx, &ch)| {
        let is_ident = |c: &char| c.is_alphanumeric() || *c == '_' || *c == '$';
        ch == 'T'
            && (idx == 0 || !is_ident(&chars[idx - 1]))
            && chars.get(idx + 1).map_or(true, |c| !is_ident(c))
    })
}

/// validated configuration, read-only for one generation pass
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub scalars: BTreeMap<String, String>,
    pub default_scalar_type: String,
    pub type_naming: NamingConvention,
    pub enum_value_naming: NamingConvention,
    pub optionals: OptionalPolicy,
    pub enum_style: EnumStyle,
    pub immutable_types: bool,
    pub maybe_value: String,
    pub export: bool,
    pub enums_only: bool,
    pub include_introspection_types: bool,
    pub mappers: BTreeMap<String, TypeReference>,
    pub default_mapper: Option<TypeReference>,
    pub context_type: Option<TypeReference>,
}

impl ResolvedConfig {
    /// typescript type for a scalar, built-in or custom
    pub fn scalar_type(&self, name: &str) -> String {
        if let Some(ty) = self.scalars.get(name) {
            return ty.clone();
        }
        match name {
            "ID" | "String" => "string".to_string(),
            "Int" | "Float" => "number".to_string(),
            "Boolean" => "boolean".to_string(),
            _ => self.default_scalar_type.clone(),
        }
    }

    /// `export ` or nothing, depending on `noExport`
    pub fn export_prefix(&self) -> &'static str {
        if self.export {
            "export "
        } else {
            ""
        }
    }

    /// render the `Maybe` helper alias
    pub fn maybe_declaration(&self) -> String {
        format!(
            "{}type Maybe<T> = {};",
            self.export_prefix(),
            self.maybe_value
        )
    }
}

impl PluginConfig {
    /// create an empty configuration (all defaults)
    pub fn new() -> Self {
        Self::default()
    }

    /// parse a json configuration object
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_scalar(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.scalars.insert(name.into(), ty.into());
        self
    }

    pub fn with_naming_convention(mut self, convention: impl Into<String>) -> Self {
        self.naming_convention = Some(NamingConventionConfig::Uniform(convention.into()));
        self
    }

    pub fn with_avoid_optionals(mut self, avoid: AvoidOptionals) -> Self {
        self.avoid_optionals = avoid;
        self
    }

    pub fn with_const_enums(mut self, enabled: bool) -> Self {
        self.const_enums = enabled;
        self
    }

    pub fn with_enums_as_types(mut self, enabled: bool) -> Self {
        self.enums_as_types = enabled;
        self
    }

    pub fn with_immutable_types(mut self, enabled: bool) -> Self {
        self.immutable_types = enabled;
        self
    }

    pub fn with_maybe_value(mut self, template: impl Into<String>) -> Self {
        self.maybe_value = Some(template.into());
        self
    }

    pub fn with_no_export(mut self, enabled: bool) -> Self {
        self.no_export = enabled;
        self
    }

    pub fn with_generate_only(mut self, only: impl Into<String>) -> Self {
        self.generate_only = Some(only.into());
        self
    }

    pub fn with_mapper(
        mut self,
        type_name: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        self.mappers.insert(type_name.into(), reference.into());
        self
    }

    pub fn with_default_mapper(mut self, reference: impl Into<String>) -> Self {
        self.default_mapper = Some(reference.into());
        self
    }

    pub fn with_context_type(mut self, reference: impl Into<String>) -> Self {
        self.context_type = Some(reference.into());
        self
    }

    /// validate and resolve into the form the generators consume
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let (type_naming, enum_value_naming) = match &self.naming_convention {
            None => (NamingConvention::default(), NamingConvention::default()),
            Some(NamingConventionConfig::Uniform(name)) => {
                let convention: NamingConvention = name.parse()?;
                (convention, convention)
            }
            Some(NamingConventionConfig::PerKind {
                type_names,
                enum_values,
            }) => (
                parse_convention(type_names.as_deref())?,
                parse_convention(enum_values.as_deref())?,
            ),
        };

        let optionals = match self.avoid_optionals {
            AvoidOptionals::All(avoid) => OptionalPolicy {
                field: avoid,
                input_value: avoid,
                argument: avoid,
            },
            AvoidOptionals::PerKind(policy) => policy,
        };

        let enum_style = match (self.const_enums, self.enums_as_types) {
            (true, true) => {
                return Err(Error::Config(
                    "constEnums and enumsAsTypes cannot be combined".to_string(),
                ))
            }
            (true, false) => EnumStyle::Const,
            (false, true) => EnumStyle::StringUnion,
            (false, false) => EnumStyle::Native,
        };

        let maybe_value = self
            .maybe_value
            .clone()
            .unwrap_or_else(|| DEFAULT_MAYBE_VALUE.to_string());
        if !mentions_type_param(&maybe_value) {
            return Err(Error::Config(format!(
                "maybeValue `{maybe_value}` must reference the type parameter T"
            )));
        }

        let enums_only = match self.generate_only.as_deref() {
            None => false,
            Some("enums") => true,
            Some(other) => {
                return Err(Error::Config(format!(
                    "invalid generateOnly value: {other}. must be enums"
                )))
            }
        };

        let mappers = self
            .mappers
            .iter()
            .map(|(name, value)| {
                TypeReference::parse(value)
                    .map(|reference| (name.clone(), reference))
                    .map_err(|err| match err {
                        Error::Config(message) => {
                            Error::Config(format!("mapper for `{name}`: {message}"))
                        }
                        other => other,
                    })
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        let default_mapper = self
            .default_mapper
            .as_deref()
            .map(TypeReference::parse)
            .transpose()?;
        let context_type = self
            .context_type
            .as_deref()
            .map(TypeReference::parse)
            .transpose()?;

        Ok(ResolvedConfig {
            scalars: self.scalars.clone(),
            default_scalar_type: self
                .default_scalar_type
                .clone()
                .unwrap_or_else(|| DEFAULT_SCALAR_TYPE.to_string()),
            type_naming,
            enum_value_naming,
            optionals,
            enum_style,
            immutable_types: self.immutable_types,
            maybe_value,
            export: !self.no_export,
            enums_only,
            include_introspection_types: self.include_introspection_types,
            mappers,
            default_mapper,
            context_type,
        })
    }
}

fn parse_convention(value: Option<&str>) -> Result<NamingConvention> {
    value.map_or(Ok(NamingConvention::default()), str::parse)
}
