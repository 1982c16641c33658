//! The generated project's `package.json`.
//!
//! Parsed into an ordered JSON object so untouched keys round-trip in their
//! original order. Only `name` and one `dependencies` entry are ever changed.

use serde_json::{Map, Value};

use crate::domain::{entities::ProjectName, error::DomainError};

/// File name of the manifest at the project root.
pub const MANIFEST_FILE: &str = "package.json";

/// Dependency added when the database feature is enabled.
pub const DATABASE_DEPENDENCY: &str = "mongoose";

/// Version constraint for [`DATABASE_DEPENDENCY`].
pub const DATABASE_DEPENDENCY_VERSION: &str = "^8.0.0";

#[derive(Debug, Clone, PartialEq)]
pub struct ManifestDocument {
    fields: Map<String, Value>,
}

impl ManifestDocument {
    /// Parse manifest text. The top level must be a JSON object.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let value: Value = serde_json::from_str(raw).map_err(|e| DomainError::InvalidManifest {
            reason: e.to_string(),
        })?;

        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(DomainError::InvalidManifest {
                reason: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    pub fn set_name(&mut self, name: &ProjectName) {
        self.fields
            .insert("name".into(), Value::String(name.as_str().to_string()));
    }

    pub fn dependency(&self, name: &str) -> Option<&str> {
        self.fields
            .get("dependencies")
            .and_then(Value::as_object)
            .and_then(|deps| deps.get(name))
            .and_then(Value::as_str)
    }

    /// Add or overwrite one entry in `dependencies`, creating the object if
    /// it is absent. Existing entries are kept.
    pub fn add_dependency(&mut self, name: &str, version: &str) -> Result<(), DomainError> {
        let deps = self
            .fields
            .entry("dependencies")
            .or_insert_with(|| Value::Object(Map::new()));

        match deps {
            Value::Object(deps) => {
                deps.insert(name.into(), Value::String(version.into()));
                Ok(())
            }
            other => Err(DomainError::InvalidManifest {
                reason: format!("\"dependencies\" must be an object, found {}", json_kind(other)),
            }),
        }
    }

    /// Keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Two-space indented JSON with a trailing newline.
    pub fn to_pretty_string(&self) -> Result<String, DomainError> {
        let mut out =
            serde_json::to_string_pretty(&self.fields).map_err(|e| DomainError::InvalidManifest {
                reason: e.to_string(),
            })?;
        out.push('\n');
        Ok(out)
    }

    /// Apply the scaffold edits: set `name`, and add the database driver when
    /// `use_database` is set.
    pub fn apply_scaffold(
        &mut self,
        name: &ProjectName,
        use_database: bool,
    ) -> Result<(), DomainError> {
        self.set_name(name);
        if use_database {
            self.add_dependency(DATABASE_DEPENDENCY, DATABASE_DEPENDENCY_VERSION)?;
        }
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
