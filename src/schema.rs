use std::fmt;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;

/// Which registry map an entity lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Types,
    Methods,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Types => f.write_str("types"),
            Category::Methods => f.write_str("methods"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub types: Vec<String>,
    pub required: bool,
    pub description: String,
}

/// Parts shared by types and methods.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Entity {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<Field>>,
}

impl Entity {
    pub fn new(name: &str, href: Option<String>) -> Self {
        Entity {
            name: name.to_string(),
            href,
            ..Default::default()
        }
    }

    pub fn has_href(&self) -> bool {
        self.href.as_deref().is_some_and(|h| !h.is_empty())
    }

    pub fn fields(&self) -> &[Field] {
        self.fields.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypeDef {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtypes: Option<Vec<String>>,
    /// Filled in by validation, one entry per parent naming this type.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtype_of: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Method {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub returns: Vec<String>,
}

/// Everything extracted from one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Registry {
    pub methods: IndexMap<String, Method>,
    pub types: IndexMap<String, TypeDef>,
}

impl Registry {
    /// Open a fresh record, replacing any earlier one with the same name.
    pub fn open(&mut self, category: Category, name: &str, href: Option<String>) {
        let entity = Entity::new(name, href);
        match category {
            Category::Types => {
                self.types.insert(
                    name.to_string(),
                    TypeDef {
                        entity,
                        ..Default::default()
                    },
                );
            }
            Category::Methods => {
                self.methods.insert(
                    name.to_string(),
                    Method {
                        entity,
                        ..Default::default()
                    },
                );
            }
        }
    }

    pub fn entity_mut(&mut self, category: Category, name: &str) -> Option<&mut Entity> {
        match category {
            Category::Types => self.types.get_mut(name).map(|t| &mut t.entity),
            Category::Methods => self.methods.get_mut(name).map(|m| &mut m.entity),
        }
    }

    /// Serialize a single record by name, whichever map it lives in.
    pub fn record_json(&self, name: &str) -> Result<Option<String>> {
        let json = if let Some(t) = self.types.get(name) {
            serde_json::to_string_pretty(t)?
        } else if let Some(m) = self.methods.get(name) {
            serde_json::to_string_pretty(m)?
        } else {
            return Ok(None);
        };
        Ok(Some(json))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize registry")
    }
}
