//! introspection type includer
//!
//! finds the introspection meta-types (`__Type`, `__Schema`, ...) that operation
//! documents actually select, then closes that set over object fields so only
//! the reachable part of the introspection schema gets emitted.

use crate::error::{Error, Result};
use crate::schema::{is_introspection_type, named_type, Schema};
use graphql_parser::query::{
    Definition, Document, OperationDefinition, Selection, SelectionSet, TypeCondition,
};
use graphql_parser::schema::TypeDefinition;
use std::collections::BTreeSet;

/// the introspection schema, printed as sdl
pub const INTROSPECTION_SDL: &str = r#"
type __Schema {
  description: String
  types: [__Type!]!
  queryType: __Type!
  mutationType: __Type
  subscriptionType: __Type
  directives: [__Directive!]!
}

type __Type {
  kind: __TypeKind!
  name: String
  description: String
  specifiedByURL: String
  fields(includeDeprecated: Boolean = false): [__Field!]
  interfaces: [__Type!]
  possibleTypes: [__Type!]
  enumValues(includeDeprecated: Boolean = false): [__EnumValue!]
  inputFields(includeDeprecated: Boolean = false): [__InputValue!]
  ofType: __Type
}

enum __TypeKind {
  SCALAR
  OBJECT
  INTERFACE
  UNION
  ENUM
  INPUT_OBJECT
  LIST
  NON_NULL
}

type __Field {
  name: String!
  description: String
  args(includeDeprecated: Boolean = false): [__InputValue!]!
  type: __Type!
  isDeprecated: Boolean!
  deprecationReason: String
}

type __InputValue {
  name: String!
  description: String
  type: __Type!
  defaultValue: String
  isDeprecated: Boolean!
  deprecationReason: String
}

type __EnumValue {
  name: String!
  description: String
  isDeprecated: Boolean!
  deprecationReason: String
}

type __Directive {
  name: String!
  description: String
  locations: [__DirectiveLocation!]!
  args(includeDeprecated: Boolean = false): [__InputValue!]!
  isRepeatable: Boolean!
}

enum __DirectiveLocation {
  QUERY
  MUTATION
  SUBSCRIPTION
  FIELD
  FRAGMENT_DEFINITION
  FRAGMENT_SPREAD
  INLINE_FRAGMENT
  VARIABLE_DEFINITION
  SCHEMA
  SCALAR
  OBJECT
  FIELD_DEFINITION
  ARGUMENT_DEFINITION
  INTERFACE
  UNION
  ENUM
  ENUM_VALUE
  INPUT_OBJECT
  INPUT_FIELD_DEFINITION
}
"#;

/// visited set plus discovery order, threaded through the traversals
#[derive(Debug, Clone, Default)]
pub struct Reachable {
    visited: BTreeSet<String>,
    ordered: Vec<String>,
}

impl Reachable {
    /// record a type, false if it was already present
    fn insert(&mut self, name: &str) -> bool {
        if self.visited.insert(name.to_string()) {
            self.ordered.push(name.to_string());
            true
        } else {
            false
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.visited.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// names in discovery order
    pub fn names(&self) -> &[String] {
        &self.ordered
    }

    pub fn into_set(self) -> BTreeSet<String> {
        self.visited
    }
}

/// resolves field types across the user schema and the introspection schema
pub struct IntrospectionIncluder<'s, 'a, 'i> {
    schema: &'s Schema<'a>,
    introspection: &'s Schema<'i>,
}

impl<'s, 'a, 'i> IntrospectionIncluder<'s, 'a, 'i> {
    pub fn new(schema: &'s Schema<'a>, introspection: &'s Schema<'i>) -> Self {
        Self {
            schema,
            introspection,
        }
    }

    /// meta-types selected anywhere in `documents`, plus everything they reach
    pub fn collect(&self, documents: &[Document<'_, String>]) -> Result<Reachable> {
        let used = self.used_types(documents)?;
        let mut included = Reachable::default();
        for name in used.names() {
            self.include(name, &mut included);
        }
        tracing::debug!(
            used = used.names().len(),
            included = included.names().len(),
            "collected introspection types"
        );
        Ok(included)
    }

    /// meta-types named by any field selection
    pub fn used_types(&self, documents: &[Document<'_, String>]) -> Result<Reachable> {
        let mut used = Reachable::default();
        for document in documents {
            for definition in &document.definitions {
                match definition {
                    Definition::Operation(operation) => {
                        let (root, selection_set) = self.operation_root(operation)?;
                        self.scan(selection_set, &root, &mut used)?;
                    }
                    Definition::Fragment(fragment) => {
                        let TypeCondition::On(on) = &fragment.type_condition;
                        self.ensure_type(on)?;
                        self.scan(&fragment.selection_set, on, &mut used)?;
                    }
                }
            }
        }
        Ok(used)
    }

    fn operation_root<'o, 'd>(
        &self,
        operation: &'o OperationDefinition<'d, String>,
    ) -> Result<(String, &'o SelectionSet<'d, String>)> {
        let (root, kind, selection_set) = match operation {
            OperationDefinition::SelectionSet(set) => (self.schema.query_type(), "query", set),
            OperationDefinition::Query(query) => {
                (self.schema.query_type(), "query", &query.selection_set)
            }
            OperationDefinition::Mutation(mutation) => {
                (self.schema.mutation_type(), "mutation", &mutation.selection_set)
            }
            OperationDefinition::Subscription(subscription) => (
                self.schema.subscription_type(),
                "subscription",
                &subscription.selection_set,
            ),
        };
        let root = root.ok_or_else(|| {
            Error::SchemaIntegrity(format!("schema has no {kind} root type"))
        })?;
        Ok((root.to_string(), selection_set))
    }

    fn scan(
        &self,
        selection_set: &SelectionSet<'_, String>,
        parent: &str,
        used: &mut Reachable,
    ) -> Result<()> {
        for selection in &selection_set.items {
            match selection {
                Selection::Field(field) => {
                    let Some(field_type) = self.field_type_name(parent, &field.name) else {
                        tracing::debug!(parent, field = %field.name, "skipping unknown field");
                        continue;
                    };
                    let is_meta = is_introspection_type(&field_type);
                    if is_meta && self.introspection.contains(&field_type) {
                        used.insert(&field_type);
                    }
                    if !field.selection_set.items.is_empty() {
                        self.scan(&field.selection_set, &field_type, used)?;
                    }
                }
                Selection::InlineFragment(fragment) => {
                    let parent = match &fragment.type_condition {
                        Some(TypeCondition::On(on)) => {
                            self.ensure_type(on)?;
                            on.as_str()
                        }
                        None => parent,
                    };
                    self.scan(&fragment.selection_set, parent, used)?;
                }
                // fragment definitions are scanned on their own
                Selection::FragmentSpread(_) => {}
            }
        }
        Ok(())
    }

    /// named type of `parent.field`, including the implicit meta fields
    fn field_type_name(&self, parent: &str, field: &str) -> Option<String> {
        match field {
            "__typename" => return Some("String".to_string()),
            "__schema" if self.schema.query_type() == Some(parent) => {
                return Some("__Schema".to_string())
            }
            "__type" if self.schema.query_type() == Some(parent) => {
                return Some("__Type".to_string())
            }
            _ => {}
        }

        // the two schemas have unrelated lifetimes, so name each branch separately
        if self.introspection.contains(parent) {
            self.introspection
                .field(parent, field)
                .map(|def| named_type(&def.field_type).to_string())
        } else {
            self.schema
                .field(parent, field)
                .map(|def| named_type(&def.field_type).to_string())
        }
    }

    fn ensure_type(&self, name: &str) -> Result<()> {
        if self.schema.contains(name) || self.introspection.contains(name) {
            Ok(())
        } else {
            Err(Error::unknown_type(name, "type condition"))
        }
    }

    /// add `name` and, for object types, every introspection type its fields name
    fn include(&self, name: &str, included: &mut Reachable) {
        if !included.insert(name) {
            return;
        }
        // interface and union members are referenced, not expanded
        if let Some(TypeDefinition::Object(object)) = self.introspection.get(name) {
            for field in &object.fields {
                let field_type = named_type(&field.field_type);
                if self.introspection.contains(field_type) {
                    self.include(field_type, included);
                }
            }
        }
    }
}
