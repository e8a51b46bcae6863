use graphql_parser::schema::parse_schema;
use graphql_ts_codegen::{
    resolvers, Error, Plugin, PluginConfig, PluginOutput, ResolversPlugin, Schema, TypesPlugin,
};

const USERS: &str = r#"
    type Query { userById(id: Int!): User }
    type User { id: Int! name: String! profile: Profile }
    type Profile { bio: String }
"#;

const FEED: &str = r#"
    type Query { feed(first: Int): [Post!]! node(id: ID!): Node }
    type Mutation { publish(title: String!): Post }
    type Subscription { postAdded: Post! }
    interface Node { id: ID! }
    type Post implements Node { id: ID! title: String! author: Author! }
    type Author implements Node { id: ID! name: String posts: [Post!]! }
    union Entry = Post | Author
    scalar Date
"#;

fn generate(sdl: &str, config: &PluginConfig) -> Result<PluginOutput, Error> {
    let doc = parse_schema::<String>(sdl)?;
    let schema = Schema::new(&doc)?;
    resolvers::generate(&schema, &[], config)
}

fn namespace<'o>(output: &'o PluginOutput, name: &str) -> &'o str {
    let start = output
        .content
        .find(&format!("export namespace {name} {{"))
        .unwrap_or_else(|| panic!("missing namespace {name}"));
    let rest = &output.content[start..];
    let end = rest.find("\n}").map_or(rest.len(), |idx| idx + 2);
    &rest[..end]
}

#[test]
fn test_user_mapper_scenario() {
    let config = PluginConfig::new().with_mapper("User", "./types#UserParent");
    let output = generate(USERS, &config).unwrap();

    assert_eq!(
        output.prepend,
        vec![
            "import { UserParent } from './types';",
            "import { GraphQLResolveInfo } from 'graphql';",
        ]
    );

    let query = namespace(&output, "QueryResolvers");
    assert!(query.contains("export interface Resolvers<Context = {}, TypeParent = {}> {"));
    assert!(query.contains("userById?: UserByIdResolver<Maybe<UserParent>, TypeParent, Context>;"));
    assert!(query.contains(
        "export type UserByIdResolver<R = Maybe<UserParent>, Parent = {}, Context = {}> = Resolver<R, Parent, Context, UserByIdArgs>;"
    ));
    assert!(query.contains("export interface UserByIdArgs {\n    id: number;\n  }"));

    let user = namespace(&output, "UserResolvers");
    assert_eq!(
        user,
        "export namespace UserResolvers {
  export interface Resolvers<Context = {}, TypeParent = UserParent> {
    id?: IdResolver<number, TypeParent, Context>;
    name?: NameResolver<string, TypeParent, Context>;
    profile?: ProfileResolver<Maybe<Profile>, TypeParent, Context>;
  }

  export type IdResolver<R = number, Parent = UserParent, Context = {}> = Resolver<R, Parent, Context>;
  export type NameResolver<R = string, Parent = UserParent, Context = {}> = Resolver<R, Parent, Context>;
  export type ProfileResolver<R = Maybe<Profile>, Parent = UserParent, Context = {}> = Resolver<R, Parent, Context>;
}"
    );

    // profile keeps its own structural name
    let profile = namespace(&output, "ProfileResolvers");
    assert!(profile.contains("TypeParent = Profile>"));
}

#[test]
fn test_mapper_precedence() {
    let config = PluginConfig::new()
        .with_mapper("Post", "./m#MA")
        .with_default_mapper("any");
    let output = generate(FEED, &config).unwrap();

    let query = namespace(&output, "QueryResolvers");
    assert!(query.contains("feed?: FeedResolver<Array<MA>, TypeParent, Context>;"));
    assert!(query.contains("node?: NodeResolver<Maybe<any>, TypeParent, Context>;"));

    let author = namespace(&output, "AuthorResolvers");
    assert!(author.contains("TypeParent = any>"));
    assert!(author.contains("posts?: PostsResolver<Array<MA>, TypeParent, Context>;"));

    // roots never take the default mapper
    assert!(query.contains("TypeParent = {}>"));

    let without_default =
        generate(FEED, &PluginConfig::new().with_mapper("Post", "./m#MA")).unwrap();
    let author = namespace(&without_default, "AuthorResolvers");
    assert!(author.contains("TypeParent = Author>"));
}

#[test]
fn test_subscription_and_abstract_types() {
    let config = PluginConfig::new().with_context_type("./context#AppContext");
    let output = generate(FEED, &config).unwrap();

    let subscription = namespace(&output, "SubscriptionResolvers");
    assert!(subscription.contains(
        "export type PostAddedResolver<R = Post, Parent = {}, Context = AppContext> = SubscriptionResolver<R, Parent, Context>;"
    ));

    let mutation = namespace(&output, "MutationResolvers");
    assert!(mutation.contains("= Resolver<R, Parent, Context, PublishArgs>;"));

    let node = namespace(&output, "NodeResolvers");
    assert!(node.contains("__resolveType: ResolveType<Context>;"));
    assert!(node.contains(
        "export type ResolveType<Context = AppContext> = TypeResolveFn<\"Post\" | \"Author\", Post | Author, Context>;"
    ));

    let entry = namespace(&output, "EntryResolvers");
    assert!(entry.contains("TypeResolveFn<\"Post\" | \"Author\", Post | Author, Context>"));

    assert!(output.content.contains(
        "export interface DateScalarConfig extends GraphQLScalarTypeConfig<Date, any> {\n  name: \"Date\";\n}"
    ));
    assert!(output.content.ends_with(
        "export interface IResolvers<Context = AppContext> {
  Query?: QueryResolvers.Resolvers<Context>;
  Mutation?: MutationResolvers.Resolvers<Context>;
  Subscription?: SubscriptionResolvers.Resolvers<Context>;
  Node?: NodeResolvers.Resolvers<Context>;
  Post?: PostResolvers.Resolvers<Context>;
  Author?: AuthorResolvers.Resolvers<Context>;
  Entry?: EntryResolvers.Resolvers<Context>;
  Date?: GraphQLScalarType;
}"
    ));
    assert_eq!(
        output.prepend,
        vec![
            "import { AppContext } from './context';",
            "import { GraphQLResolveInfo, GraphQLScalarType, GraphQLScalarTypeConfig } from 'graphql';",
        ]
    );
}

#[test]
fn test_helpers_declared_once() {
    let output = generate(FEED, &PluginConfig::new()).unwrap();
    for helper in [
        "export type Resolver<",
        "export interface ISubscriptionResolverObject<",
        "export type SubscriptionResolver<",
        "export type TypeResolveFn<",
    ] {
        assert_eq!(output.content.matches(helper).count(), 1, "{helper}");
    }
}

#[test]
fn test_helper_names_avoid_schema_types() {
    let sdl = "type Query { resolver: Resolver } \
               type Resolver { context: Context } \
               type Context { id: ID }";
    let output = generate(sdl, &PluginConfig::new()).unwrap();
    assert!(output.content.contains("export type Resolver2<Result"));
    assert!(output
        .content
        .contains("resolver?: ResolverResolver<Maybe<Resolver>, TypeParent, Context2>;"));
    assert!(output.content.contains("= Resolver2<R, Parent, Context2>;"));
}

#[test]
fn test_schema_types_do_not_shadow_globals() {
    let sdl = "type Query { pending: Promise } type Promise { x: Int }";
    let output = generate(sdl, &PluginConfig::new()).unwrap();
    assert!(output.content.contains(") => Promise<Result> | Result;"));
    assert!(output
        .content
        .contains("pending?: PendingResolver<Maybe<Promise2>, TypeParent, Context>;"));
    assert!(namespace(&output, "Promise2Resolvers").contains("TypeParent = Promise2>"));
    assert!(output
        .content
        .contains("  Promise?: Promise2Resolvers.Resolvers<Context>;\n"));
}

#[test]
fn test_shared_module_imports_are_grouped() {
    let config = PluginConfig::new()
        .with_mapper("Post", "./models#PostModel")
        .with_mapper("Author", "./models#AuthorModel")
        .with_default_mapper("./models#Partial<{T}>");
    let output = generate(FEED, &config).unwrap();
    assert_eq!(
        output.prepend[0],
        "import { AuthorModel, Partial, PostModel } from './models';"
    );
    assert!(namespace(&output, "PostResolvers").contains("TypeParent = PostModel>"));
    assert!(namespace(&output, "NodeResolvers")
        .contains("TypeResolveFn<\"Post\" | \"Author\", PostModel | AuthorModel, Context>"));
}

#[test]
fn test_default_mapper_type_argument() {
    let config = PluginConfig::new().with_default_mapper("./wrap#Wrapped<{T}>");
    let output = generate(USERS, &config).unwrap();
    assert!(namespace(&output, "UserResolvers").contains("TypeParent = Wrapped<User>>"));
    assert!(namespace(&output, "QueryResolvers")
        .contains("userById?: UserByIdResolver<Maybe<Wrapped<User>>, TypeParent, Context>;"));
}

#[test]
fn test_malformed_mapper_fails_fast() {
    for reference in ["./types#", "#UserParent", "./types#User-Parent", ""] {
        let err = generate(USERS, &PluginConfig::new().with_mapper("User", reference)).unwrap_err();
        assert!(err.is_config_error(), "{reference:?}");
    }
}

#[test]
fn test_combined_output() {
    let doc = parse_schema::<String>(USERS).unwrap();
    let schema = Schema::new(&doc).unwrap();
    let config = PluginConfig::new();
    let types = TypesPlugin.generate(&schema, &[], &config).unwrap();
    let resolvers = ResolversPlugin.generate(&schema, &[], &config).unwrap();

    let source = types.merge(resolvers).into_source();
    assert!(source.starts_with(
        "import { GraphQLResolveInfo } from 'graphql';\nexport type Maybe<T> = T | null;\n\nexport interface Query {"
    ));
    assert!(source.ends_with("}\n"));
}

#[test]
fn test_from_json_config() {
    let config = PluginConfig::from_json(
        r#"{ "mappers": { "User": "./types#UserParent" }, "contextType": "{ userId: string }", "noExport": true }"#,
    )
    .unwrap();
    let output = generate(USERS, &config).unwrap();
    assert!(output
        .content
        .contains("namespace UserResolvers {\n  export interface Resolvers<Context = { userId: string }, TypeParent = UserParent> {"));
    assert!(!output.content.contains("export namespace"));
}
