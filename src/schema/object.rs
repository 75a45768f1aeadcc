//! Object schema: a set of named scalar fields

use super::{EnvRecord, Field, Validator};
use crate::env::EnvMap;
use crate::error::ValidateError;
use crate::issue::Issue;
use serde_json::Value;
use std::collections::BTreeMap;

const REDACTED: &str = "[REDACTED]";

/// Validates a snapshot field by field.
///
/// Every field is checked and all issues are returned together. Keys the
/// schema does not name are dropped from the output.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: BTreeMap<String, Field>,
    description: Option<String>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a field
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy of `record` with secret fields replaced by `[REDACTED]`
    pub fn redact(&self, record: &EnvRecord) -> EnvRecord {
        record
            .iter()
            .map(|(key, value)| {
                let secret = self.fields.get(key).is_some_and(Field::is_secret);
                let shown = if secret {
                    Value::String(REDACTED.to_string())
                } else {
                    value.clone()
                };
                (key.to_string(), shown)
            })
            .collect()
    }
}

impl Validator for ObjectSchema {
    type Output = EnvRecord;

    fn validate(&self, input: &EnvMap) -> Result<EnvRecord, ValidateError> {
        let mut record = EnvRecord::new();
        let mut issues = Vec::new();

        for (name, field) in &self.fields {
            match field.check(input.get(name)) {
                Ok(Some(value)) => record.insert(name.clone(), value),
                Ok(None) => {}
                Err(message) => issues.push(Issue::new(name.clone(), message)),
            }
        }

        if issues.is_empty() {
            Ok(record)
        } else {
            Err(ValidateError::Invalid(issues))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> ObjectSchema {
        ObjectSchema::new()
            .field("NODE_ENV", Field::one_of(["development", "production"]))
            .field("PORT", Field::port())
            .field("API_URL", Field::url())
            .field("API_KEY", Field::string().secret())
    }

    #[test]
    fn test_valid_input() {
        let env = EnvMap::new()
            .with("NODE_ENV", "development")
            .with("PORT", "3000")
            .with("API_URL", "http://localhost:3000")
            .with("API_KEY", "k")
            .with("UNRELATED", "dropped");

        let record = schema().validate(&env).unwrap();
        assert_eq!(record.get("PORT"), Some(&json!(3000)));
        assert_eq!(record.get_str("API_URL"), Some("http://localhost:3000"));
        assert!(!record.contains_key("UNRELATED"));
        assert_eq!(record.len(), 4);
    }

    #[test]
    fn test_collects_every_issue() {
        let env = EnvMap::new().with("PORT", "http").with("API_URL", "123");

        let Err(ValidateError::Invalid(issues)) = schema().validate(&env) else {
            panic!("expected validation issues");
        };
        let names: Vec<String> = issues.iter().map(Issue::field_name).collect();
        assert_eq!(names, vec!["API_KEY", "API_URL", "NODE_ENV", "PORT"]);
    }

    #[test]
    fn test_empty_schema_accepts_anything() {
        let env = EnvMap::new().with("ANYTHING", "x");
        let record = ObjectSchema::new().validate(&env).unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn test_redact() {
        let env = EnvMap::new()
            .with("NODE_ENV", "production")
            .with("PORT", "80")
            .with("API_URL", "https://example.com")
            .with("API_KEY", "super-secret");
        let schema = schema();
        let record = schema.validate(&env).unwrap();
        let shown = schema.redact(&record);
        assert_eq!(shown.get_str("API_KEY"), Some("[REDACTED]"));
        assert_eq!(shown.get_str("NODE_ENV"), Some("production"));
    }
}
