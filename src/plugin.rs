//! plugin entry points
//!
//! both plugins take the same `(schema, documents, config)` triple and return
//! prepend lines plus a body.

use crate::config::PluginConfig;
use crate::error::Result;
use crate::schema::Schema;
use graphql_parser::query;
use std::fmt;

/// generated text for one plugin run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginOutput {
    /// import and alias lines that must precede `content`
    pub prepend: Vec<String>,
    pub content: String,
}

impl PluginOutput {
    /// append another output; its prepend lines are deduplicated and imports
    /// stay ahead of everything else
    pub fn merge(mut self, other: PluginOutput) -> Self {
        for line in other.prepend {
            if !self.prepend.contains(&line) {
                self.prepend.push(line);
            }
        }
        self.prepend
            .sort_by_key(|line| !line.starts_with("import "));

        if self.content.is_empty() {
            self.content = other.content;
        } else if !other.content.is_empty() {
            self.content.push_str("\n\n");
            self.content.push_str(&other.content);
        }
        self
    }

    /// final file text
    pub fn into_source(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PluginOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.prepend {
            writeln!(f, "{line}")?;
        }
        if !self.prepend.is_empty() && !self.content.is_empty() {
            writeln!(f)?;
        }
        if !self.content.is_empty() {
            writeln!(f, "{}", self.content)?;
        }
        Ok(())
    }
}

/// a code generator the pipeline can run
pub trait Plugin {
    /// short name used on the command line
    fn name(&self) -> &'static str;

    fn generate(
        &self,
        schema: &Schema<'_>,
        documents: &[query::Document<'_, String>],
        config: &PluginConfig,
    ) -> Result<PluginOutput>;
}

/// type declarations for every schema type
#[derive(Debug, Clone, Copy, Default)]
pub struct TypesPlugin;

impl Plugin for TypesPlugin {
    fn name(&self) -> &'static str {
        "types"
    }

    fn generate(
        &self,
        schema: &Schema<'_>,
        documents: &[query::Document<'_, String>],
        config: &PluginConfig,
    ) -> Result<PluginOutput> {
        crate::typescript::generate(schema, documents, config)
    }
}

/// resolver signatures; meant to be appended to the types output, which
/// declares `Maybe` and the referenced types
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolversPlugin;

impl Plugin for ResolversPlugin {
    fn name(&self) -> &'static str {
        "resolvers"
    }

    fn generate(
        &self,
        schema: &Schema<'_>,
        documents: &[query::Document<'_, String>],
        config: &PluginConfig,
    ) -> Result<PluginOutput> {
        crate::resolvers::generate(schema, documents, config)
    }
}
