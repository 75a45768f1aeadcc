//! Schema shape detection
//!
//! Statically-typed schemas report their shape through
//! [`EnvSchema::shape`](super::EnvSchema::shape). Schema documents read at
//! runtime are classified here.

use std::fmt;
use toml::Value;

/// The two supported schema shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaShape {
    /// One schema over the whole input
    Unified,
    /// `server` and `client` schemas over separate partitions
    Split,
}

impl SchemaShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaShape::Unified => "unified",
            SchemaShape::Split => "split",
        }
    }
}

impl fmt::Display for SchemaShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a schema document.
///
/// Split iff the document has both a `server` and a `client` member and each
/// one is a schema table. Tables that merely carry those names (for example a
/// unified schema whose `fields` table defines `server`) stay unified.
pub fn classify(document: &Value) -> SchemaShape {
    let is_split = document.as_table().is_some_and(|table| {
        ["server", "client"]
            .iter()
            .all(|member| table.get(*member).is_some_and(is_schema_table))
    });

    if is_split {
        SchemaShape::Split
    } else {
        SchemaShape::Unified
    }
}

/// A schema table has a `fields` table whose entries each name a `type`
pub(crate) fn is_schema_table(value: &Value) -> bool {
    value
        .get("fields")
        .and_then(Value::as_table)
        .is_some_and(|fields| {
            fields.values().all(|field| {
                field
                    .get("type")
                    .is_some_and(|kind| kind.is_str())
            })
        })
}
