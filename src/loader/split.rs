//! Split server/client schemas and their results

use super::{EnvSchema, ExecutionContext, LoadOptions, SchemaShape, load_split};
use crate::env::EnvMap;
use crate::error::EnvError;
use crate::schema::{EnvRecord, Validator};
use serde_json::Value;

/// A schema split into a server-only half and a client-visible half.
///
/// The client half only ever sees variables carrying the public prefix.
#[derive(Debug, Clone)]
pub struct SplitSchema<S, C> {
    pub server: S,
    pub client: C,
}

impl<S, C> SplitSchema<S, C> {
    pub fn new(server: S, client: C) -> Self {
        Self { server, client }
    }
}

impl<S: Validator, C: Validator> EnvSchema for SplitSchema<S, C> {
    type Output = SplitEnv<S::Output, C::Output>;

    fn shape(&self) -> SchemaShape {
        SchemaShape::Split
    }

    fn load(&self, input: &EnvMap, options: &LoadOptions) -> Result<Self::Output, EnvError> {
        load_split(&self.server, &self.client, input, options)
    }
}

/// Result of loading a split schema
#[derive(Debug, Clone)]
pub struct SplitEnv<S, C> {
    pub server_env: ServerEnv<S>,
    pub client_env: C,
}

/// Server-side values, withheld in client contexts.
///
/// Every read of a `Restricted` value fails with `EnvError::ForbiddenAccess`.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEnv<T> {
    Available(T),
    Restricted,
}

impl<T> ServerEnv<T> {
    pub(crate) fn for_context(context: ExecutionContext, value: T) -> Self {
        match context {
            ExecutionContext::Server => ServerEnv::Available(value),
            ExecutionContext::Client => ServerEnv::Restricted,
        }
    }

    pub fn get(&self) -> Result<&T, EnvError> {
        match self {
            ServerEnv::Available(value) => Ok(value),
            ServerEnv::Restricted => Err(EnvError::ForbiddenAccess { field: None }),
        }
    }

    pub fn into_inner(self) -> Result<T, EnvError> {
        match self {
            ServerEnv::Available(value) => Ok(value),
            ServerEnv::Restricted => Err(EnvError::ForbiddenAccess { field: None }),
        }
    }

    pub fn is_restricted(&self) -> bool {
        matches!(self, ServerEnv::Restricted)
    }
}

impl ServerEnv<EnvRecord> {
    /// Read one server variable. `Ok(None)` when the schema left it out.
    pub fn field(&self, name: &str) -> Result<Option<&Value>, EnvError> {
        match self {
            ServerEnv::Available(record) => Ok(record.get(name)),
            ServerEnv::Restricted => Err(EnvError::forbidden(name)),
        }
    }
}
