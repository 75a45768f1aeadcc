//! Scalar field definitions for [`ObjectSchema`](super::ObjectSchema)

use regex::Regex;
use serde_json::Value;

/// The kind of value a field accepts and how it is parsed
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Any string, optionally constrained by length and a regex
    String {
        min_len: Option<usize>,
        pattern: Option<Regex>,
    },
    /// An absolute URL; the original string is kept
    Url,
    /// One of a fixed set of strings
    Enum(Vec<String>),
    /// A signed 64-bit integer with optional inclusive bounds
    Integer { min: Option<i64>, max: Option<i64> },
    /// A TCP/UDP port (1-65535)
    Port,
    /// `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`
    Boolean,
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::String { .. } => "string",
            FieldKind::Url => "url",
            FieldKind::Enum(_) => "enum",
            FieldKind::Integer { .. } => "integer",
            FieldKind::Port => "port",
            FieldKind::Boolean => "boolean",
        }
    }
}

/// A single named variable in an object schema
#[derive(Debug, Clone)]
pub struct Field {
    kind: FieldKind,
    optional: bool,
    default: Option<String>,
    secret: bool,
    description: Option<String>,
}

impl Field {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            optional: false,
            default: None,
            secret: false,
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::new(FieldKind::String {
            min_len: None,
            pattern: None,
        })
    }

    pub fn url() -> Self {
        Self::new(FieldKind::Url)
    }

    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(FieldKind::Enum(values.into_iter().map(Into::into).collect()))
    }

    pub fn integer() -> Self {
        Self::new(FieldKind::Integer {
            min: None,
            max: None,
        })
    }

    pub fn port() -> Self {
        Self::new(FieldKind::Port)
    }

    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    /// Minimum length in characters. Only affects string fields.
    pub fn min_len(mut self, len: usize) -> Self {
        if let FieldKind::String { min_len, .. } = &mut self.kind {
            *min_len = Some(len);
        }
        self
    }

    /// Regex the whole value must match. Only affects string fields.
    pub fn pattern(mut self, regex: Regex) -> Self {
        if let FieldKind::String { pattern, .. } = &mut self.kind {
            *pattern = Some(anchor(regex));
        }
        self
    }

    /// Inclusive bounds. Only affects integer fields.
    pub fn range(mut self, lower: Option<i64>, upper: Option<i64>) -> Self {
        if let FieldKind::Integer { min, max } = &mut self.kind {
            *min = lower;
            *max = upper;
        }
        self
    }

    /// A missing value is left out of the output instead of failing
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Raw value parsed in place of a missing one
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Value must never be printed
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn default_raw(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn is_secret(&self) -> bool {
        self.secret
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Check a raw value.
    ///
    /// `Ok(None)` means the field is absent from the output. The error is the
    /// human-readable issue message.
    pub fn check(&self, raw: Option<&str>) -> Result<Option<Value>, String> {
        let raw = match raw {
            Some("") if !matches!(self.kind, FieldKind::String { .. }) => None,
            other => other,
        };

        match (raw, self.default.as_deref()) {
            (Some(value), _) => self.parse(value).map(Some),
            (None, Some(default)) => self
                .parse(default)
                .map(Some)
                .map_err(|e| format!("invalid default: {}", e)),
            (None, None) if self.optional => Ok(None),
            (None, None) => Err("required".to_string()),
        }
    }

    fn parse(&self, value: &str) -> Result<Value, String> {
        match &self.kind {
            FieldKind::String { min_len, pattern } => {
                if let Some(min) = min_len.filter(|min| value.chars().count() < *min) {
                    return Err(format!("must contain at least {} character(s)", min));
                }
                if let Some(regex) = pattern.as_ref().filter(|r| !matches_whole(r, value)) {
                    return Err(format!("does not match pattern `{}`", regex.as_str()));
                }
                Ok(Value::String(value.to_string()))
            }
            FieldKind::Url => url::Url::parse(value)
                .map(|_| Value::String(value.to_string()))
                .map_err(|e| format!("invalid url: {}", e)),
            FieldKind::Enum(allowed) => {
                if allowed.iter().any(|a| a == value) {
                    Ok(Value::String(value.to_string()))
                } else {
                    Err(format!("expected one of: {}", allowed.join(", ")))
                }
            }
            FieldKind::Integer { min, max } => {
                let n: i64 = value
                    .trim()
                    .parse()
                    .map_err(|_| "expected an integer".to_string())?;
                if let Some(min) = min.filter(|min| n < *min) {
                    return Err(format!("must be >= {}", min));
                }
                if let Some(max) = max.filter(|max| n > *max) {
                    return Err(format!("must be <= {}", max));
                }
                Ok(Value::from(n))
            }
            FieldKind::Port => match value.trim().parse::<u16>() {
                Ok(port) if port > 0 => Ok(Value::from(port)),
                _ => Err("expected a port number (1-65535)".to_string()),
            },
            FieldKind::Boolean => match value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
                "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
                _ => Err("expected a boolean".to_string()),
            },
        }
    }
}

/// Wrap `regex` so it only matches a complete value
fn anchor(regex: Regex) -> Regex {
    Regex::new(&format!("^(?:{})$", regex.as_str())).unwrap_or(regex)
}

fn matches_whole(regex: &Regex, value: &str) -> bool {
    regex
        .find(value)
        .is_some_and(|m| m.start() == 0 && m.end() == value.len())
}
