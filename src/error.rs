//! error types
//!
//! structured errors for configuration, schema integrity, and parsing.

/// library result type
pub type Result<T> = std::result::Result<T, Error>;

/// error type for both generator plugins
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("schema integrity error: {0}")]
    SchemaIntegrity(String),

    #[error("schema parse error: {0}")]
    SchemaParse(#[from] graphql_parser::schema::ParseError),

    #[error("document parse error: {0}")]
    DocumentParse(#[from] graphql_parser::query::ParseError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// true if the error comes from malformed or contradictory configuration
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_) | Error::Json(_))
    }

    /// true if the schema (or a document against it) references something missing
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Error::SchemaIntegrity(_) | Error::SchemaParse(_))
    }

    pub(crate) fn unknown_type(name: &str, referenced_from: &str) -> Self {
        Error::SchemaIntegrity(format!(
            "unknown type `{name}` referenced from `{referenced_from}`"
        ))
    }
}
