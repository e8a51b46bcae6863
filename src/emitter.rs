//! type declaration emitter
//!
//! one method per named type kind. each returns finished typescript source for
//! a single declaration; ordering and filtering are left to the walker.

use crate::config::{EnumStyle, MemberKind, ResolvedConfig};
use crate::error::Result;
use crate::naming::NameRegistry;
use crate::render::{doc_comment, NamedTypeResolver, TypeNames, TypeRenderer};
use crate::schema::{Schema, TypeKind};
use graphql_parser::schema::{
    EnumType, Field, InputObjectType, InputValue, InterfaceType, ObjectType, ScalarType, UnionType,
};

const INDENT: &str = "  ";

/// what a declaration was generated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    /// a schema type of the given kind
    Type(TypeKind),
    /// the argument record of one field
    Arguments,
}

/// a single emitted declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// graphql type name, or the generated name for argument records
    pub name: String,
    pub kind: DeclarationKind,
    pub source: String,
}

impl Declaration {
    fn new(name: &str, kind: DeclarationKind, source: String) -> Self {
        Self {
            name: name.to_string(),
            kind,
            source,
        }
    }
}

pub struct Emitter<'e, 'a> {
    schema: &'e Schema<'a>,
    names: &'e TypeNames<'e>,
    config: &'e ResolvedConfig,
}

impl<'e, 'a> Emitter<'e, 'a> {
    pub fn new(
        schema: &'e Schema<'a>,
        names: &'e TypeNames<'e>,
        config: &'e ResolvedConfig,
    ) -> Self {
        Self {
            schema,
            names,
            config,
        }
    }

    fn renderer(&self) -> TypeRenderer<'_> {
        TypeRenderer::new(self.names, self.config)
    }

    fn declared_name(&self, name: &str) -> Result<String> {
        self.names.resolve_named(name)
    }

    pub fn scalar(&self, scalar: &ScalarType<'a, String>) -> Result<Declaration> {
        let source = format!(
            "{}{}type {} = {};",
            doc_comment(scalar.description.as_ref(), ""),
            self.config.export_prefix(),
            self.declared_name(&scalar.name)?,
            self.config.scalar_type(&scalar.name)
        );
        Ok(Declaration::new(&scalar.name, DeclarationKind::Type(TypeKind::Scalar), source))
    }

    pub fn enumeration(&self, enum_ty: &EnumType<'a, String>) -> Result<Declaration> {
        let name = self.declared_name(&enum_ty.name)?;
        let mut out = doc_comment(enum_ty.description.as_ref(), "");
        let export = self.config.export_prefix();

        match self.config.enum_style {
            EnumStyle::StringUnion => {
                let members: Vec<String> = enum_ty
                    .values
                    .iter()
                    .map(|value| format!("\"{}\"", value.name))
                    .collect();
                let body = if members.is_empty() {
                    "never".to_string()
                } else {
                    members.join(" | ")
                };
                out.push_str(&format!("{export}type {name} = {body};"));
            }
            EnumStyle::Native | EnumStyle::Const => {
                let modifier = if self.config.enum_style == EnumStyle::Const {
                    "const "
                } else {
                    ""
                };
                out.push_str(&format!("{export}{modifier}enum {name} {{\n"));
                let mut members = NameRegistry::new();
                for value in &enum_ty.values {
                    let member = members.claim(&self.config.enum_value_naming.apply(&value.name));
                    out.push_str(&doc_comment(value.description.as_ref(), INDENT));
                    out.push_str(&format!("{INDENT}{member} = \"{}\",\n", value.name));
                }
                out.push('}');
            }
        }

        Ok(Declaration::new(&enum_ty.name, DeclarationKind::Type(TypeKind::Enum), out))
    }

    pub fn object(&self, object: &ObjectType<'a, String>) -> Result<Declaration> {
        let source = self.record(
            &object.name,
            object.description.as_ref(),
            field_members(&object.fields),
            MemberKind::Field,
        )?;
        Ok(Declaration::new(&object.name, DeclarationKind::Type(TypeKind::Object), source))
    }

    pub fn input_object(&self, input: &InputObjectType<'a, String>) -> Result<Declaration> {
        let source = self.record(
            &input.name,
            input.description.as_ref(),
            input_members(&input.fields),
            MemberKind::InputValue,
        )?;
        Ok(Declaration::new(&input.name, DeclarationKind::Type(TypeKind::InputObject), source))
    }

    /// sum of implementing objects; a record of its own fields when nothing implements it
    pub fn interface(&self, iface: &InterfaceType<'a, String>) -> Result<Declaration> {
        let implementations = self.schema.implementations(&iface.name);
        let source = if implementations.is_empty() {
            self.record(
                &iface.name,
                iface.description.as_ref(),
                field_members(&iface.fields),
                MemberKind::Field,
            )?
        } else {
            self.sum(&iface.name, iface.description.as_ref(), &implementations)?
        };
        Ok(Declaration::new(&iface.name, DeclarationKind::Type(TypeKind::Interface), source))
    }

    pub fn union(&self, union_ty: &UnionType<'a, String>) -> Result<Declaration> {
        let members: Vec<&str> = union_ty.types.iter().map(String::as_str).collect();
        let source = self.sum(&union_ty.name, union_ty.description.as_ref(), &members)?;
        Ok(Declaration::new(&union_ty.name, DeclarationKind::Type(TypeKind::Union), source))
    }

    /// one argument record per field that declares arguments
    pub fn arguments(
        &self,
        type_name: &str,
        fields: &[Field<'a, String>],
        registry: &mut NameRegistry,
    ) -> Result<Vec<Declaration>> {
        let owner = self.declared_name(type_name)?;
        let mut out = Vec::new();
        for field in fields.iter().filter(|field| !field.arguments.is_empty()) {
            let field_name = self.config.type_naming.apply(&field.name);
            let args_name = registry.claim(&format!("{field_name}{owner}Args"));
            let source = self.record_named(
                &args_name,
                None,
                input_members(&field.arguments),
                MemberKind::Argument,
            )?;
            out.push(Declaration::new(&args_name, DeclarationKind::Arguments, source));
        }
        Ok(out)
    }

    fn sum(&self, name: &str, description: Option<&String>, members: &[&str]) -> Result<String> {
        let declared = self.declared_name(name)?;
        let members = members
            .iter()
            .map(|member| self.declared_name(member))
            .collect::<Result<Vec<_>>>()?;
        let body = if members.is_empty() {
            "never".to_string()
        } else {
            members.join(" | ")
        };
        Ok(format!(
            "{}{}type {declared} = {body};",
            doc_comment(description, ""),
            self.config.export_prefix()
        ))
    }

    fn record<'m>(
        &self,
        name: &str,
        description: Option<&String>,
        members: impl Iterator<Item = Member<'m, 'a>>,
        kind: MemberKind,
    ) -> Result<String>
    where
        'a: 'm,
    {
        let declared = self.declared_name(name)?;
        self.record_named(&declared, description, members, kind)
    }

    fn record_named<'m>(
        &self,
        declared: &str,
        description: Option<&String>,
        members: impl Iterator<Item = Member<'m, 'a>>,
        kind: MemberKind,
    ) -> Result<String>
    where
        'a: 'm,
    {
        let renderer = self.renderer();
        let mut body = String::new();
        for member in members {
            body.push_str(&doc_comment(member.description, INDENT));
            body.push_str(INDENT);
            body.push_str(&renderer.member(member.name, member.ty, kind, self.config)?);
            body.push('\n');
        }

        let header = format!(
            "{}{}interface {declared}",
            doc_comment(description, ""),
            self.config.export_prefix()
        );
        if body.is_empty() {
            Ok(format!("{header} {{}}"))
        } else {
            Ok(format!("{header} {{\n{body}}}"))
        }
    }
}

/// the parts of a field or input value a record member needs
struct Member<'m, 'a> {
    name: &'m str,
    description: Option<&'m String>,
    ty: &'m graphql_parser::schema::Type<'a, String>,
}

fn field_members<'m, 'a>(fields: &'m [Field<'a, String>]) -> impl Iterator<Item = Member<'m, 'a>> {
    fields.iter().map(|field| Member {
        name: &field.name,
        description: field.description.as_ref(),
        ty: &field.field_type,
    })
}

fn input_members<'m, 'a>(
    values: &'m [InputValue<'a, String>],
) -> impl Iterator<Item = Member<'m, 'a>> {
    values.iter().map(|value| Member {
        name: &value.name,
        description: value.description.as_ref(),
        ty: &value.value_type,
    })
}
