//! schema view
//!
//! indexes a parsed sdl document by type name (declaration order preserved),
//! resolves root operation types, and checks that every type reference points
//! at a declared type or a built-in scalar.

use crate::error::{Error, Result};
use graphql_parser::schema::{Definition, Document, Field, InputValue, Type, TypeDefinition};
use indexmap::IndexMap;

/// built-in scalars, implicitly present in every schema
pub const BUILTIN_SCALARS: [&str; 5] = ["ID", "String", "Int", "Float", "Boolean"];

pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

/// true for schema-reflection types such as `__Type`
pub fn is_introspection_type(name: &str) -> bool {
    name.starts_with("__")
}

/// the six named type kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

impl TypeKind {
    pub fn of(def: &TypeDefinition<'_, String>) -> Self {
        match def {
            TypeDefinition::Scalar(_) => TypeKind::Scalar,
            TypeDefinition::Object(_) => TypeKind::Object,
            TypeDefinition::Interface(_) => TypeKind::Interface,
            TypeDefinition::Union(_) => TypeKind::Union,
            TypeDefinition::Enum(_) => TypeKind::Enum,
            TypeDefinition::InputObject(_) => TypeKind::InputObject,
        }
    }

    /// object, interface, or union
    pub fn is_composite(self) -> bool {
        matches!(self, TypeKind::Object | TypeKind::Interface | TypeKind::Union)
    }
}

/// read-only, validated view over a schema document
#[derive(Debug)]
pub struct Schema<'a> {
    types: IndexMap<String, &'a TypeDefinition<'a, String>>,
    query_type: Option<String>,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
}

impl<'a> Schema<'a> {
    /// index and validate a parsed schema document
    pub fn new(doc: &'a Document<'a, String>) -> Result<Self> {
        let mut types = IndexMap::new();
        let mut schema_def = None;

        for def in &doc.definitions {
            match def {
                Definition::TypeDefinition(ty) => {
                    let name = type_name(ty);
                    if types.insert(name.to_string(), ty).is_some() {
                        return Err(Error::SchemaIntegrity(format!(
                            "type `{name}` is defined more than once"
                        )));
                    }
                }
                Definition::SchemaDefinition(schema) => schema_def = Some(schema),
                Definition::TypeExtension(_) => {
                    tracing::warn!("type extensions are not merged; skipping extension");
                }
                Definition::DirectiveDefinition(_) => {}
            }
        }

        let default_root = |name: &str| types.contains_key(name).then(|| name.to_string());

        let (query_type, mutation_type, subscription_type) = match schema_def {
            Some(schema) => (
                schema.query.clone(),
                schema.mutation.clone(),
                schema.subscription.clone(),
            ),
            None => (
                default_root("Query"),
                default_root("Mutation"),
                default_root("Subscription"),
            ),
        };

        let schema = Self {
            types,
            query_type,
            mutation_type,
            subscription_type,
        };
        schema.validate()?;
        Ok(schema)
    }

    fn validate(&self) -> Result<()> {
        for root in self.root_types() {
            match self.types.get(root) {
                Some(TypeDefinition::Object(_)) => {}
                Some(_) => {
                    return Err(Error::SchemaIntegrity(format!(
                        "root operation type `{root}` must be an object type"
                    )))
                }
                None => return Err(Error::unknown_type(root, "schema")),
            }
        }

        for (name, def) in &self.types {
            match def {
                TypeDefinition::Scalar(_) | TypeDefinition::Enum(_) => {}
                TypeDefinition::Object(obj) => {
                    self.check_interfaces(name, &obj.implements_interfaces)?;
                    self.check_fields(name, &obj.fields)?;
                }
                TypeDefinition::Interface(iface) => {
                    self.check_interfaces(name, &iface.implements_interfaces)?;
                    self.check_fields(name, &iface.fields)?;
                }
                TypeDefinition::Union(union_ty) => {
                    for member in &union_ty.types {
                        match self.types.get(member) {
                            Some(TypeDefinition::Object(_)) => {}
                            Some(_) => {
                                return Err(Error::SchemaIntegrity(format!(
                                    "union `{name}` member `{member}` must be an object type"
                                )))
                            }
                            None => return Err(Error::unknown_type(member, name)),
                        }
                    }
                }
                TypeDefinition::InputObject(input) => {
                    self.check_input_values(name, &input.fields)?;
                }
            }
        }
        Ok(())
    }

    fn check_interfaces(&self, owner: &str, interfaces: &[String]) -> Result<()> {
        for iface in interfaces {
            match self.types.get(iface) {
                Some(TypeDefinition::Interface(_)) => {}
                Some(_) => {
                    return Err(Error::SchemaIntegrity(format!(
                        "`{owner}` implements `{iface}`, which is not an interface"
                    )))
                }
                None => return Err(Error::unknown_type(iface, owner)),
            }
        }
        Ok(())
    }

    fn check_fields(&self, owner: &str, fields: &[Field<'a, String>]) -> Result<()> {
        for field in fields {
            let location = format!("{owner}.{}", field.name);
            self.check_reference(&field.field_type, &location)?;
            self.check_input_values(&location, &field.arguments)?;
        }
        Ok(())
    }

    fn check_input_values(&self, owner: &str, values: &[InputValue<'a, String>]) -> Result<()> {
        for value in values {
            self.check_reference(&value.value_type, &format!("{owner}.{}", value.name))?;
        }
        Ok(())
    }

    fn check_reference(&self, ty: &Type<'a, String>, location: &str) -> Result<()> {
        let name = named_type(ty);
        if is_builtin_scalar(name) || self.types.contains_key(name) {
            Ok(())
        } else {
            Err(Error::unknown_type(name, location))
        }
    }

    /// all named types in declaration order
    pub fn types(&self) -> impl Iterator<Item = (&str, &'a TypeDefinition<'a, String>)> + '_ {
        self.types.iter().map(|(name, def)| (name.as_str(), *def))
    }

    pub fn get(&self, name: &str) -> Option<&'a TypeDefinition<'a, String>> {
        self.types.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn kind_of(&self, name: &str) -> Option<TypeKind> {
        self.get(name).map(TypeKind::of)
    }

    pub fn query_type(&self) -> Option<&str> {
        self.query_type.as_deref()
    }

    pub fn mutation_type(&self) -> Option<&str> {
        self.mutation_type.as_deref()
    }

    pub fn subscription_type(&self) -> Option<&str> {
        self.subscription_type.as_deref()
    }

    pub fn root_types(&self) -> impl Iterator<Item = &str> {
        [
            self.query_type.as_deref(),
            self.mutation_type.as_deref(),
            self.subscription_type.as_deref(),
        ]
        .into_iter()
        .flatten()
    }

    pub fn is_root_type(&self, name: &str) -> bool {
        self.root_types().any(|root| root == name)
    }

    /// object types implementing `interface`, in declaration order
    pub fn implementations(&self, interface: &str) -> Vec<&str> {
        self.types
            .iter()
            .filter_map(|(name, def)| match def {
                TypeDefinition::Object(obj)
                    if obj.implements_interfaces.iter().any(|i| i == interface) =>
                {
                    Some(name.as_str())
                }
                _ => None,
            })
            .collect()
    }

    /// look up a field on an object or interface type
    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&'a Field<'a, String>> {
        let fields = match self.get(type_name)? {
            TypeDefinition::Object(obj) => &obj.fields,
            TypeDefinition::Interface(iface) => &iface.fields,
            _ => return None,
        };
        fields.iter().find(|field| field.name == field_name)
    }
}

/// name of a type definition
pub fn type_name<'d>(def: &'d TypeDefinition<'_, String>) -> &'d str {
    match def {
        TypeDefinition::Scalar(ty) => &ty.name,
        TypeDefinition::Object(ty) => &ty.name,
        TypeDefinition::Interface(ty) => &ty.name,
        TypeDefinition::Union(ty) => &ty.name,
        TypeDefinition::Enum(ty) => &ty.name,
        TypeDefinition::InputObject(ty) => &ty.name,
    }
}

/// innermost named type of a reference (`[User!]!` -> `User`)
pub fn named_type<'t>(ty: &'t Type<'_, String>) -> &'t str {
    match ty {
        Type::NamedType(name) => name,
        Type::ListType(inner) | Type::NonNullType(inner) => named_type(inner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_parser::schema::parse_schema;

    const SDL: &str = r#"
        interface Node { id: ID! }
        type Query { node(id: ID!): Node users: [User!]! }
        type User implements Node { id: ID! name: String }
        type Post implements Node { id: ID! }
        union Content = User | Post
        enum Role { ADMIN USER }
        input UserFilter { role: Role }
    "#;

    #[test]
    fn test_declaration_order_and_roots() {
        let doc = parse_schema::<String>(SDL).unwrap();
        let schema = Schema::new(&doc).unwrap();
        let names: Vec<_> = schema.types().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec!["Node", "Query", "User", "Post", "Content", "Role", "UserFilter"]
        );
        assert_eq!(schema.query_type(), Some("Query"));
        assert_eq!(schema.mutation_type(), None);
        assert!(schema.is_root_type("Query"));
        assert_eq!(schema.kind_of("Content"), Some(TypeKind::Union));
        assert_eq!(schema.implementations("Node"), vec!["User", "Post"]);
        assert!(schema.field("User", "name").is_some());
        assert!(schema.field("Role", "ADMIN").is_none());
    }

    #[test]
    fn test_explicit_schema_definition() {
        let doc = parse_schema::<String>(
            "schema { query: Root subscription: Events } type Root { a: Int } type Events { b: Int }",
        )
        .unwrap();
        let schema = Schema::new(&doc).unwrap();
        assert_eq!(schema.query_type(), Some("Root"));
        assert_eq!(schema.subscription_type(), Some("Events"));
        assert_eq!(schema.root_types().count(), 2);
    }

    #[test]
    fn test_unknown_field_type() {
        let doc = parse_schema::<String>("type Query { user: Missing }").unwrap();
        let err = Schema::new(&doc).unwrap_err();
        assert!(matches!(err, Error::SchemaIntegrity(_)));
        assert!(err.to_string().contains("Query.user"));
    }

    #[test]
    fn test_unknown_argument_type() {
        let doc = parse_schema::<String>("type Query { user(filter: Filter): Int }").unwrap();
        let err = Schema::new(&doc).unwrap_err();
        assert!(err.to_string().contains("Query.user.filter"));
    }

    #[test]
    fn test_duplicate_type() {
        let doc = parse_schema::<String>("type A { a: Int } type A { b: Int }").unwrap();
        assert!(matches!(Schema::new(&doc).unwrap_err(), Error::SchemaIntegrity(_)));
    }

    #[test]
    fn test_bad_union_member() {
        let doc = parse_schema::<String>("enum E { A } union U = E").unwrap();
        assert!(matches!(Schema::new(&doc).unwrap_err(), Error::SchemaIntegrity(_)));
    }

    #[test]
    fn test_named_type() {
        let doc = parse_schema::<String>("type Query { ids: [[ID!]]! }").unwrap();
        let schema = Schema::new(&doc).unwrap();
        let field = schema.field("Query", "ids").unwrap();
        assert_eq!(named_type(&field.field_type), "ID");
    }
}
