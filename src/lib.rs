//! graphql to typescript code generation
//!
//! this crate turns a parsed graphql schema into typescript type declarations,
//! and optionally into typed resolver signatures. it is meant to run as a
//! plugin inside a larger pipeline: the pipeline parses the schema and the
//! operation documents, picks a configuration, and writes the returned text.
//!
//! ## quick start
//!
//! ```
//! use graphql_parser::schema::parse_schema;
//! use graphql_ts_codegen::{typescript, PluginConfig, Schema};
//!
//! # fn main() -> graphql_ts_codegen::Result<()> {
//! let doc = parse_schema::<String>("type Query { hello: String }")?;
//! let schema = Schema::new(&doc)?;
//! let output = typescript::generate(&schema, &[], &PluginConfig::new())?;
//! assert!(output.content.contains("hello?: Maybe<string>;"));
//! # Ok(())
//! # }
//! ```
//!
//! ## resolvers
//!
//! [`resolvers::generate`] emits one namespace of resolver signatures per
//! object type. `mappers` and `defaultMapper` swap in your own parent types;
//! its output is meant to be appended to the types output.

mod config;
mod emitter;
mod error;
mod introspection;
mod naming;
mod plugin;
mod render;
pub mod resolvers;
mod schema;
pub mod typescript;
mod walker;

pub use config::{
    AvoidOptionals, EnumStyle, ExternalRef, MemberKind, NamingConventionConfig, OptionalPolicy,
    PluginConfig, ResolvedConfig, TypeReference,
};
pub use emitter::{Declaration, DeclarationKind};
pub use error::{Error, Result};
pub use introspection::{IntrospectionIncluder, Reachable, INTROSPECTION_SDL};
pub use naming::{NameRegistry, NamingConvention};
pub use plugin::{Plugin, PluginOutput, ResolversPlugin, TypesPlugin};
pub use schema::{Schema, TypeKind};
