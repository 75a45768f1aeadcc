//! Environment snapshots and public-prefix partitioning

use crate::error::EnvError;
use regex::Regex;
use std::collections::BTreeMap;

/// Prefix marking variables that may be exposed to client contexts
pub const DEFAULT_PUBLIC_PREFIX: &str = "NEXT_PUBLIC_";

const PUBLIC_PREFIX_PATTERN: &str = "^[A-Z][A-Z0-9_]*$";

/// A read-only snapshot of named variables.
///
/// A key mapped to `None` is present but unset; validators treat it the same
/// as a missing key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvMap {
    vars: BTreeMap<String, Option<String>>,
}

impl EnvMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment.
    ///
    /// Names and values that are not valid UTF-8 are converted lossily.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .map(|(key, value)| {
                (
                    key.to_string_lossy().into_owned(),
                    value.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }

    /// Builder-style insert of a set variable
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style insert of a present-but-unset variable
    pub fn with_unset(mut self, key: impl Into<String>) -> Self {
        self.vars.insert(key.into(), None);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), Some(value.into()));
    }

    /// Value of a variable, `None` when missing or unset
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).and_then(|value| value.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Entries whose key starts with `prefix`, values unchanged
    pub fn public_subset(&self, prefix: &str) -> EnvMap {
        EnvMap {
            vars: self
                .vars
                .iter()
                .filter(|(key, _)| key.starts_with(prefix))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for EnvMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        EnvMap {
            vars: iter
                .into_iter()
                .map(|(key, value)| (key.into(), Some(value.into())))
                .collect(),
        }
    }
}

/// Derive the subset of `input` visible to client validation.
///
/// Keys without the prefix are dropped silently; that is how server-only
/// variables stay out of client results.
pub fn derive_public_subset(input: &EnvMap, prefix: &str) -> EnvMap {
    input.public_subset(prefix)
}

/// Check that `prefix` can select public variables.
///
/// Prefixes are upper-case letters, digits and underscores and start with a
/// letter. The empty prefix matches every key and is rejected.
pub fn check_public_prefix(prefix: &str) -> Result<(), EnvError> {
    let invalid = |reason: String| EnvError::InvalidPrefix {
        prefix: prefix.to_string(),
        reason,
    };

    if prefix.is_empty() {
        return Err(invalid("must not be empty".to_string()));
    }
    let pattern = Regex::new(PUBLIC_PREFIX_PATTERN).map_err(|e| invalid(e.to_string()))?;
    if !pattern.is_match(prefix) {
        return Err(invalid(
            "must be upper-case letters, digits and underscores, starting with a letter"
                .to_string(),
        ));
    }
    Ok(())
}
