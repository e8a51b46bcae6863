use graphql_parser::query::parse_query;
use graphql_parser::schema::parse_schema;
use graphql_ts_codegen::{
    typescript, AvoidOptionals, DeclarationKind, Error, OptionalPolicy, PluginConfig,
    PluginOutput, Schema, TypeKind,
};

const USERS: &str = r#"
    type Query { userById(id: Int!): User }
    type User { id: Int! name: String! profile: Profile }
    type Profile { bio: String }
"#;

const CATALOG: &str = r#"
    schema { query: Root }

    "an opaque cursor"
    scalar Cursor
    scalar JSON

    enum Genre {
      "made up"
      FICTION
      NON_FICTION
    }

    interface Node { id: ID! }

    type Root {
      node(id: ID!): Node
      search(term: String!, first: Int = 10): [SearchResult!]!
    }

    type Book implements Node {
      id: ID!
      title: String!
      genre: Genre
      tags: [String]
      cursor: Cursor
    }

    type Author implements Node {
      id: ID!
      books: [Book!]!
      meta: JSON
    }

    union SearchResult = Book | Author

    input BookFilter {
      genre: Genre!
      title: String
    }
"#;

fn generate(sdl: &str, queries: &[&str], config: &PluginConfig) -> Result<PluginOutput, Error> {
    let doc = parse_schema::<String>(sdl)?;
    let schema = Schema::new(&doc)?;
    let documents = queries
        .iter()
        .map(|query| parse_query::<String>(query))
        .collect::<Result<Vec<_>, _>>()?;
    typescript::generate(&schema, &documents, config)
}

#[test]
fn test_user_scenario() {
    let output = generate(USERS, &[], &PluginConfig::new()).unwrap();
    assert_eq!(output.prepend, vec!["export type Maybe<T> = T | null;"]);
    assert!(output.content.contains(
        "export interface User {\n  id: number;\n  name: string;\n  profile?: Maybe<Profile>;\n}"
    ));
    assert!(output
        .content
        .contains("export interface Query {\n  userById?: Maybe<User>;\n}"));
    assert!(output
        .content
        .contains("export interface UserByIdQueryArgs {\n  id: number;\n}"));
}

#[test]
fn test_catalog_output() {
    let output = generate(CATALOG, &[], &PluginConfig::new()).unwrap();
    let expected = r#"/** an opaque cursor */
export type Cursor = any;

export type Json = any;

export enum Genre {
  /** made up */
  Fiction = "FICTION",
  NonFiction = "NON_FICTION",
}

export type Node = Book | Author;

export interface Root {
  node?: Maybe<Node>;
  search: Array<SearchResult>;
}

export interface NodeRootArgs {
  id: string;
}

export interface SearchRootArgs {
  term: string;
  first?: Maybe<number>;
}

export interface Book {
  id: string;
  title: string;
  genre?: Maybe<Genre>;
  tags?: Maybe<Array<Maybe<string>>>;
  cursor?: Maybe<Cursor>;
}

export interface Author {
  id: string;
  books: Array<Book>;
  meta?: Maybe<Json>;
}

export type SearchResult = Book | Author;

export interface BookFilter {
  genre: Genre;
  title?: Maybe<string>;
}"#;
    assert_eq!(output.content, expected);
}

#[test]
fn test_deterministic_output() {
    let config = PluginConfig::new().with_immutable_types(true);
    let queries = ["{ __schema { types { name } } }"];
    let first = generate(CATALOG, &queries, &config).unwrap();
    let second = generate(CATALOG, &queries, &config).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.into_source(), second.into_source());
}

#[test]
fn test_every_type_appears_once() {
    let doc = parse_schema::<String>(CATALOG).unwrap();
    let schema = Schema::new(&doc).unwrap();
    let config = PluginConfig::new().resolve().unwrap();
    let declarations = typescript::declarations(&schema, &[], &config).unwrap();

    for (name, _) in schema.types() {
        let count = declarations
            .iter()
            .filter(|decl| decl.name == name && decl.kind != DeclarationKind::Arguments)
            .count();
        assert_eq!(count, 1, "{name} should be declared exactly once");
    }
    assert_eq!(
        declarations
            .iter()
            .filter(|decl| decl.kind == DeclarationKind::Arguments)
            .count(),
        2
    );
    assert!(declarations
        .iter()
        .any(|decl| decl.kind == DeclarationKind::Type(TypeKind::InputObject)));
}

#[test]
fn test_optionality_law() {
    let sdl = "type Query { required: Int! optional: Int list: [Int!] }";
    let policies = [
        AvoidOptionals::All(false),
        AvoidOptionals::All(true),
        AvoidOptionals::PerKind(OptionalPolicy {
            field: true,
            ..OptionalPolicy::default()
        }),
    ];

    for policy in policies {
        let avoids = matches!(
            policy,
            AvoidOptionals::All(true) | AvoidOptionals::PerKind(OptionalPolicy { field: true, .. })
        );
        let output = generate(sdl, &[], &PluginConfig::new().with_avoid_optionals(policy)).unwrap();
        assert!(output.content.contains("  required: number;\n"));
        if avoids {
            assert!(output.content.contains("  optional: Maybe<number>;\n"));
            assert!(output.content.contains("  list: Maybe<Array<number>>;\n"));
        } else {
            assert!(output.content.contains("  optional?: Maybe<number>;\n"));
            assert!(output.content.contains("  list?: Maybe<Array<number>>;\n"));
        }
    }
}

#[test]
fn test_argument_optionals_are_separate() {
    let config = PluginConfig::new().with_avoid_optionals(AvoidOptionals::PerKind(OptionalPolicy {
        argument: true,
        ..OptionalPolicy::default()
    }));
    let output = generate(CATALOG, &[], &config).unwrap();
    assert!(output.content.contains("  first: Maybe<number>;\n"));
    assert!(output.content.contains("  genre?: Maybe<Genre>;\n"));
}

#[test]
fn test_introspection_reachability() {
    let output = generate(
        USERS,
        &[r#"query { __type(name: "User") { name } }"#],
        &PluginConfig::new(),
    )
    .unwrap();
    for meta in ["__Type", "__TypeKind", "__Field", "__InputValue", "__EnumValue"] {
        assert!(
            output.content.contains(&format!(" {meta} ")),
            "{meta} should be included"
        );
    }
    assert!(!output.content.contains("__Schema"));
    assert!(!output.content.contains("__Directive"));

    // meta types come after every schema type
    let profile = output.content.find("interface Profile").unwrap();
    let meta = output.content.find("interface __Type").unwrap();
    assert!(profile < meta);
}

#[test]
fn test_no_introspection_without_meta_fields() {
    let output = generate(USERS, &["{ userById(id: 1) { name __typename } }"], &PluginConfig::new())
        .unwrap();
    assert!(!output.content.contains("__"));
}

#[test]
fn test_enum_styles() {
    let sdl = "enum Genre { FICTION NON_FICTION }";
    let string_union = generate(sdl, &[], &PluginConfig::new().with_enums_as_types(true)).unwrap();
    assert_eq!(
        string_union.content,
        "export type Genre = \"FICTION\" | \"NON_FICTION\";"
    );

    let const_enum = generate(sdl, &[], &PluginConfig::new().with_const_enums(true)).unwrap();
    assert!(const_enum.content.starts_with("export const enum Genre {"));

    let err = generate(
        sdl,
        &[],
        &PluginConfig::new()
            .with_const_enums(true)
            .with_enums_as_types(true),
    )
    .unwrap_err();
    assert!(err.is_config_error());
}

#[test]
fn test_enum_idempotence() {
    let sdl = r#"
        type Query { genre: Genre status: Status }
        enum Genre { FICTION NON_FICTION POETRY }
        enum Status { ACTIVE archived on_hold }
    "#;
    let config = PluginConfig::new().with_generate_only("enums");
    let first = generate(sdl, &[], &config).unwrap();

    let printed = parse_schema::<String>(sdl).unwrap().to_string();
    let second = generate(&printed, &[], &config).unwrap();

    assert!(first.prepend.is_empty());
    assert_eq!(
        first.content,
        "export enum Genre {\n  Fiction = \"FICTION\",\n  NonFiction = \"NON_FICTION\",\n  Poetry = \"POETRY\",\n}\n\n\
         export enum Status {\n  Active = \"ACTIVE\",\n  Archived = \"archived\",\n  OnHold = \"on_hold\",\n}"
    );
    assert_eq!(first, second);
}

#[test]
fn test_no_export_and_maybe_value() {
    let config = PluginConfig::new()
        .with_no_export(true)
        .with_maybe_value("T | null | undefined");
    let output = generate(USERS, &[], &config).unwrap();
    assert_eq!(output.prepend, vec!["type Maybe<T> = T | null | undefined;"]);
    assert!(output.content.starts_with("interface Query {"));
    assert!(!output.content.contains("export "));
}

#[test]
fn test_scalars_and_naming() {
    let config = PluginConfig::from_json(
        r#"{
            "scalars": { "Cursor": "string", "ID": "number" },
            "defaultScalarType": "unknown",
            "namingConvention": { "typeNames": "keep", "enumValues": "constantCase" }
        }"#,
    )
    .unwrap();
    let output = generate(CATALOG, &[], &config).unwrap();
    assert!(output.content.contains("export type Cursor = string;"));
    assert!(output.content.contains("export type JSON = unknown;"));
    assert!(output.content.contains("  NON_FICTION = \"NON_FICTION\",\n"));
    assert!(output.content.contains("  id: number;\n"));
}

#[test]
fn test_colliding_generated_names() {
    let sdl = "type Query { a: user_role b: UserRole } \
               type user_role { x: Int } \
               type UserRole { y: Int }";
    let output = generate(sdl, &[], &PluginConfig::new()).unwrap();
    assert!(output.content.contains("  a?: Maybe<UserRole>;\n  b?: Maybe<UserRole2>;\n"));
    assert!(output.content.contains("export interface UserRole2 {"));
}

#[test]
fn test_schema_types_do_not_shadow_globals() {
    let sdl = "type Query { list: [Int] arr: Array } type Array { x: Int }";
    let output = generate(sdl, &[], &PluginConfig::new()).unwrap();
    assert!(output.content.contains("  list?: Maybe<Array<Maybe<number>>>;\n"));
    assert!(output.content.contains("  arr?: Maybe<Array2>;\n"));
    assert!(output.content.contains("export interface Array2 {"));
    assert!(!output.content.contains("interface Array {"));
}

#[test]
fn test_errors() {
    let err = generate("type Query { a: Missing }", &[], &PluginConfig::new()).unwrap_err();
    assert!(err.is_schema_error());

    let err = generate(USERS, &[], &PluginConfig::new().with_naming_convention("titleCase"))
        .unwrap_err();
    assert!(err.is_config_error());

    let err = generate(USERS, &[], &PluginConfig::new().with_generate_only("types")).unwrap_err();
    assert!(err.is_config_error());

    let err = generate(USERS, &["{ ... on Ghost { __typename } }"], &PluginConfig::new())
        .unwrap_err();
    assert!(err.is_schema_error());

    let err = generate(USERS, &["{ userById("], &PluginConfig::new()).unwrap_err();
    assert!(matches!(err, Error::DocumentParse(_)));
}
