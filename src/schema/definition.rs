//! Schema definition documents
//!
//! A unified document lists its fields directly:
//!
//! ```toml
//! [fields.NODE_ENV]
//! type = "enum"
//! values = ["development", "production"]
//!
//! [fields.PORT]
//! type = "port"
//! default = "3000"
//! ```
//!
//! A split document carries one such table under `server` and one under
//! `client`.

use super::{Field, ObjectSchema};
use crate::error::SchemaError;
use crate::loader::{AnySchema, SchemaShape, SplitSchema, classify};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use toml::Value;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ObjectSchemaDef {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    fields: BTreeMap<String, FieldDef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum FieldType {
    String,
    Url,
    Enum,
    Integer,
    Port,
    Boolean,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldDef {
    #[serde(rename = "type")]
    kind: FieldType,
    #[serde(default)]
    optional: bool,
    default: Option<String>,
    #[serde(default)]
    secret: bool,
    description: Option<String>,
    min_len: Option<usize>,
    pattern: Option<String>,
    values: Option<Vec<String>>,
    min: Option<i64>,
    max: Option<i64>,
}

/// Parse a schema document from TOML source
pub fn parse_schema_document(source: &str) -> Result<AnySchema, SchemaError> {
    let document: Value =
        toml::from_str(source).map_err(|e| SchemaError::Parse(e.to_string()))?;

    let shape = classify(&document);
    debug!(%shape, "Classified schema document");

    match shape {
        SchemaShape::Split => {
            reject_stray_keys(&document)?;
            let server = compile_member(&document, "server")?;
            let client = compile_member(&document, "client")?;
            Ok(AnySchema::Split(SplitSchema::new(server, client)))
        }
        SchemaShape::Unified => {
            if document.get("fields").is_none()
                && (document.get("server").is_some() || document.get("client").is_some())
            {
                return Err(SchemaError::Invalid {
                    message: "split schemas need both a `server` and a `client` table, \
                              each with a `fields` table whose entries set `type`"
                        .to_string(),
                });
            }
            compile(document, "").map(AnySchema::Unified)
        }
    }
}

/// Read and parse a schema document from disk
pub fn read_schema_file(path: impl AsRef<Path>) -> Result<AnySchema, SchemaError> {
    let source = std::fs::read_to_string(path.as_ref())?;
    parse_schema_document(&source)
}

/// A split document holds nothing besides its two members
fn reject_stray_keys(document: &Value) -> Result<(), SchemaError> {
    let stray: Vec<&str> = document
        .as_table()
        .map(|table| {
            table
                .keys()
                .map(String::as_str)
                .filter(|key| !matches!(*key, "server" | "client"))
                .collect()
        })
        .unwrap_or_default();

    if stray.is_empty() {
        return Ok(());
    }
    Err(SchemaError::Invalid {
        message: format!(
            "unexpected top-level key(s) in split schema: {}",
            stray.join(", ")
        ),
    })
}

fn compile_member(document: &Value, member: &str) -> Result<ObjectSchema, SchemaError> {
    let table = document
        .get(member)
        .cloned()
        .ok_or_else(|| SchemaError::Invalid {
            message: format!("missing `{}` table", member),
        })?;
    compile(table, &format!("{}.", member))
}

fn compile(table: Value, scope: &str) -> Result<ObjectSchema, SchemaError> {
    let def: ObjectSchemaDef = table
        .try_into()
        .map_err(|e: toml::de::Error| SchemaError::Parse(format!("{}{}", scope, e.message())))?;

    let mut schema = ObjectSchema::new();
    if let Some(description) = def.description {
        schema = schema.describe(description);
    }

    def.fields
        .into_iter()
        .try_fold(schema, |schema, (name, field_def)| {
            let field = compile_field(&name, field_def)?;
            Ok(schema.field(name, field))
        })
}

fn compile_field(name: &str, def: FieldDef) -> Result<Field, SchemaError> {
    let only_for = |key: &str, kind: &str| {
        SchemaError::invalid_field(name, format!("`{}` only applies to {} fields", key, kind))
    };

    if !matches!(def.kind, FieldType::String) {
        if def.min_len.is_some() {
            return Err(only_for("min_len", "string"));
        }
        if def.pattern.is_some() {
            return Err(only_for("pattern", "string"));
        }
    }
    if !matches!(def.kind, FieldType::Enum) && def.values.is_some() {
        return Err(only_for("values", "enum"));
    }
    if !matches!(def.kind, FieldType::Integer) && (def.min.is_some() || def.max.is_some()) {
        return Err(only_for("min/max", "integer"));
    }

    let mut field = match def.kind {
        FieldType::String => {
            let mut field = Field::string();
            if let Some(len) = def.min_len {
                field = field.min_len(len);
            }
            if let Some(pattern) = def.pattern {
                let regex = Regex::new(&pattern).map_err(|e| {
                    SchemaError::InvalidPattern {
                        field: name.to_string(),
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    }
                })?;
                field = field.pattern(regex);
            }
            field
        }
        FieldType::Url => Field::url(),
        FieldType::Enum => match def.values {
            Some(values) if !values.is_empty() => Field::one_of(values),
            _ => {
                return Err(SchemaError::invalid_field(
                    name,
                    "enum fields need a non-empty `values` list",
                ));
            }
        },
        FieldType::Integer => {
            if let (Some(min), Some(max)) = (def.min, def.max) {
                if min > max {
                    return Err(SchemaError::invalid_field(
                        name,
                        format!("min ({}) is greater than max ({})", min, max),
                    ));
                }
            }
            Field::integer().range(def.min, def.max)
        }
        FieldType::Port => Field::port(),
        FieldType::Boolean => Field::boolean(),
    };

    if def.optional {
        field = field.optional();
    }
    if def.secret {
        field = field.secret();
    }
    if let Some(description) = def.description {
        field = field.describe(description);
    }
    if let Some(default) = def.default {
        field = field.default_value(default);
        if let Err(reason) = field.check(None) {
            return Err(SchemaError::invalid_field(name, reason));
        }
    }

    Ok(field)
}
