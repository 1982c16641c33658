//! `.env` contents for a generated project.

use crate::domain::entities::ProjectName;

/// File name of the environment file at the project root.
pub const ENV_FILE: &str = ".env";

pub const DEFAULT_PORT: u16 = 5000;

/// Ordered `KEY=VALUE` pairs; rendered without quoting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFile {
    entries: Vec<(&'static str, String)>,
}

impl EnvFile {
    pub fn for_project(name: &ProjectName, use_database: bool) -> Self {
        let mut entries = vec![
            ("PORT", DEFAULT_PORT.to_string()),
            ("CORS_ORIGIN", "*".to_string()),
        ];
        if use_database {
            entries.push((
                "MONGODB_URI",
                format!("mongodb://localhost:27017/{}", name.as_str()),
            ));
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newline-joined lines, no trailing newline.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
