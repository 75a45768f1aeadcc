//! Validation capability and the built-in field engine
//!
//! The loader only depends on the [`Validator`] trait. [`ObjectSchema`] is a
//! small engine over scalar fields that covers the common cases; anything else
//! can plug in through [`validator_fn`] or its own `Validator` impl.

pub mod definition;
pub mod field;
pub mod object;
pub mod record;

pub use definition::{parse_schema_document, read_schema_file};
pub use field::{Field, FieldKind};
pub use object::ObjectSchema;
pub use record::EnvRecord;

use crate::env::EnvMap;
use crate::error::ValidateError;
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;

/// Validates a variable snapshot into a parsed value
pub trait Validator {
    type Output;

    /// Returns `ValidateError::Invalid` for data problems and
    /// `ValidateError::Fault` when the validator itself cannot run.
    fn validate(&self, input: &EnvMap) -> Result<Self::Output, ValidateError>;
}

impl<V: Validator + ?Sized> Validator for &V {
    type Output = V::Output;

    fn validate(&self, input: &EnvMap) -> Result<Self::Output, ValidateError> {
        (**self).validate(input)
    }
}

impl<V: Validator + ?Sized> Validator for Box<V> {
    type Output = V::Output;

    fn validate(&self, input: &EnvMap) -> Result<Self::Output, ValidateError> {
        (**self).validate(input)
    }
}

/// Validator backed by a closure
pub struct FnValidator<F, T> {
    func: F,
    _output: PhantomData<fn() -> T>,
}

/// Wrap a closure as a [`Validator`]
pub fn validator_fn<F, T>(func: F) -> FnValidator<F, T>
where
    F: Fn(&EnvMap) -> Result<T, ValidateError>,
{
    FnValidator {
        func,
        _output: PhantomData,
    }
}

impl<F, T> Validator for FnValidator<F, T>
where
    F: Fn(&EnvMap) -> Result<T, ValidateError>,
{
    type Output = T;

    fn validate(&self, input: &EnvMap) -> Result<T, ValidateError> {
        (self.func)(input)
    }
}

impl<F, T> fmt::Debug for FnValidator<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnValidator")
    }
}

/// An [`ObjectSchema`] whose output is deserialized into `T`.
///
/// Field issues are reported as usual. If the validated record does not fit
/// `T` the schema and the type disagree, which is reported as a fault.
pub struct Typed<T> {
    schema: ObjectSchema,
    _target: PhantomData<fn() -> T>,
}

impl<T> Typed<T> {
    pub fn new(schema: ObjectSchema) -> Self {
        Self {
            schema,
            _target: PhantomData,
        }
    }

    pub fn schema(&self) -> &ObjectSchema {
        &self.schema
    }
}

impl<T> fmt::Debug for Typed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typed")
            .field("schema", &self.schema)
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: DeserializeOwned> Validator for Typed<T> {
    type Output = T;

    fn validate(&self, input: &EnvMap) -> Result<T, ValidateError> {
        let record = self.schema.validate(input)?;
        record.deserialize_into().map_err(|e| {
            ValidateError::Fault(anyhow::Error::new(e).context(format!(
                "validated environment does not fit {}",
                std::any::type_name::<T>()
            )))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct ServerConfig {
        #[serde(rename = "PORT")]
        port: u16,
        #[serde(rename = "DEBUG")]
        debug: bool,
    }

    #[test]
    fn test_typed_deserializes_validated_record() {
        let typed: Typed<ServerConfig> = Typed::new(
            ObjectSchema::new()
                .field("PORT", Field::port())
                .field("DEBUG", Field::boolean().default_value("false")),
        );
        let env = EnvMap::new().with("PORT", "8080");
        let config = typed.validate(&env).unwrap();
        assert_eq!(
            config,
            ServerConfig {
                port: 8080,
                debug: false
            }
        );
    }

    #[test]
    fn test_typed_mismatch_is_a_fault() {
        let typed: Typed<ServerConfig> =
            Typed::new(ObjectSchema::new().field("PORT", Field::string()));
        let env = EnvMap::new().with("PORT", "not-a-number");
        let err = typed.validate(&env).unwrap_err();
        assert!(matches!(err, ValidateError::Fault(_)));
    }

    #[test]
    fn test_typed_reports_field_issues_first() {
        let typed: Typed<ServerConfig> =
            Typed::new(ObjectSchema::new().field("PORT", Field::port()));
        let err = typed.validate(&EnvMap::new()).unwrap_err();
        assert!(matches!(err, ValidateError::Invalid(issues) if issues.len() == 1));
    }

    #[test]
    fn test_validator_fn() {
        let v = validator_fn(|env: &EnvMap| {
            env.get("TOKEN")
                .map(str::len)
                .ok_or_else(|| ValidateError::single("TOKEN", "required"))
        });
        assert_eq!(v.validate(&EnvMap::new().with("TOKEN", "abc")).unwrap(), 3);
        assert!(v.validate(&EnvMap::new()).is_err());
    }
}
