use crate::domain::{entities::ProjectName, error::DomainError};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across entities.
pub struct DomainValidator;

impl DomainValidator {
    /// Check a project name against the naming grammar `^[a-z0-9._-]+$`.
    ///
    /// `.` and `..` satisfy the grammar but name the current or parent
    /// directory, so they are rejected too.
    pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
        let invalid = |reason: String| DomainError::InvalidName {
            name: name.to_string(),
            reason,
        };

        if name.is_empty() {
            return Err(invalid("name cannot be empty".into()));
        }

        if let Some(c) = name.chars().find(|c| !is_name_char(*c)) {
            let reason = match c {
                '/' | '\\' => "name cannot contain path separators".to_string(),
                c if c.is_whitespace() => "name cannot contain whitespace".to_string(),
                c if c.is_uppercase() => {
                    format!("name cannot contain upper-case letters (found '{c}')")
                }
                c => format!("name cannot contain '{c}'"),
            };
            return Err(invalid(reason));
        }

        if name == "." || name == ".." {
            return Err(invalid("name cannot refer to an existing directory".into()));
        }

        Ok(())
    }

    pub fn parse_project_name(name: &str) -> Result<ProjectName, DomainError> {
        ProjectName::parse(name)
    }
}

const fn is_name_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '.' | '_' | '-')
}
