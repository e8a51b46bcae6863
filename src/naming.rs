//! naming helpers
//!
//! case conventions for emitted identifiers and a registry that keeps
//! generated names unique within one output file or namespace.

use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::str::FromStr;

/// identifier case convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingConvention {
    Keep,
    #[default]
    PascalCase,
    CamelCase,
    ConstantCase,
    SnakeCase,
    UpperCase,
    LowerCase,
}

impl FromStr for NamingConvention {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let name = value.strip_prefix("change-case#").unwrap_or(value);
        match name {
            "keep" => Ok(NamingConvention::Keep),
            "pascalCase" => Ok(NamingConvention::PascalCase),
            "camelCase" => Ok(NamingConvention::CamelCase),
            "constantCase" => Ok(NamingConvention::ConstantCase),
            "snakeCase" => Ok(NamingConvention::SnakeCase),
            "upperCase" => Ok(NamingConvention::UpperCase),
            "lowerCase" => Ok(NamingConvention::LowerCase),
            _ => Err(Error::Config(format!("unknown naming convention: {value}"))),
        }
    }
}

impl NamingConvention {
    /// apply the convention, keeping any leading underscores (`__Type` stays `__Type`)
    pub fn apply(self, name: &str) -> String {
        let body = name.trim_start_matches('_');
        let prefix = &name[..name.len() - body.len()];
        if body.is_empty() {
            return name.to_string();
        }

        let converted = match self {
            NamingConvention::Keep => body.to_string(),
            NamingConvention::UpperCase => body.to_uppercase(),
            NamingConvention::LowerCase => body.to_lowercase(),
            NamingConvention::PascalCase => {
                split_words(body).iter().map(|w| capitalize(w)).collect()
            }
            NamingConvention::CamelCase => {
                let words = split_words(body);
                let mut out = String::new();
                for (idx, word) in words.iter().enumerate() {
                    if idx == 0 {
                        out.push_str(&word.to_lowercase());
                    } else {
                        out.push_str(&capitalize(word));
                    }
                }
                out
            }
            NamingConvention::ConstantCase => split_words(body)
                .iter()
                .map(|w| w.to_uppercase())
                .collect::<Vec<_>>()
                .join("_"),
            NamingConvention::SnakeCase => split_words(body)
                .iter()
                .map(|w| w.to_lowercase())
                .collect::<Vec<_>>()
                .join("_"),
        };

        format!("{prefix}{converted}")
    }
}

/// pascal-case helper used for names derived from fields (`userById` -> `UserById`)
pub fn pascal_case(name: &str) -> String {
    NamingConvention::PascalCase.apply(name)
}

/// split an identifier into words on separators, case changes, and acronym ends
fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (idx, &ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if ch.is_uppercase() && !current.is_empty() {
            let prev = chars[idx - 1];
            let next_is_lower = chars.get(idx + 1).is_some_and(|c| c.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(ch);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// set of identifiers already in use within one scope
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    taken: BTreeSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// mark a name as used without renaming it
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.taken.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// claim `base`, or the first free `base2`, `base3`, ...
    pub fn claim(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }
        let mut counter = 2usize;
        loop {
            let candidate = format!("{base}{counter}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            counter += 1;
        }
    }
}
