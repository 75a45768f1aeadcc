//! Schemas whose shape is only known at runtime

use super::{EnvSchema, LoadOptions, SchemaShape, SplitEnv, SplitSchema, load_split, load_unified};
use crate::env::EnvMap;
use crate::error::EnvError;
use crate::schema::{EnvRecord, ObjectSchema};
use serde_json::{Value, json};

/// A schema of either shape, built from a schema document
#[derive(Debug, Clone)]
pub enum AnySchema {
    Unified(ObjectSchema),
    Split(SplitSchema<ObjectSchema, ObjectSchema>),
}

/// Output of loading an [`AnySchema`]
#[derive(Debug, Clone)]
pub enum LoadedEnv {
    Unified(EnvRecord),
    Split(SplitEnv<EnvRecord, EnvRecord>),
}

impl EnvSchema for AnySchema {
    type Output = LoadedEnv;

    fn shape(&self) -> SchemaShape {
        match self {
            AnySchema::Unified(_) => SchemaShape::Unified,
            AnySchema::Split(_) => SchemaShape::Split,
        }
    }

    fn load(&self, input: &EnvMap, options: &LoadOptions) -> Result<LoadedEnv, EnvError> {
        match self {
            AnySchema::Unified(schema) => load_unified(schema, input, options).map(LoadedEnv::Unified),
            AnySchema::Split(split) => {
                load_split(&split.server, &split.client, input, options).map(LoadedEnv::Split)
            }
        }
    }
}

impl AnySchema {
    /// JSON view of a loaded result with secret values redacted.
    ///
    /// Restricted server values are left out entirely.
    pub fn redacted_view(&self, loaded: &LoadedEnv) -> Value {
        match (self, loaded) {
            (AnySchema::Unified(schema), LoadedEnv::Unified(record)) => {
                schema.redact(record).to_value()
            }
            (AnySchema::Split(split), LoadedEnv::Split(env)) => {
                let mut view = json!({
                    "client_env": split.client.redact(&env.client_env).to_value(),
                });
                if let Ok(server) = env.server_env.get() {
                    view["server_env"] = split.server.redact(server).to_value();
                }
                view
            }
            (_, LoadedEnv::Unified(record)) => record.to_value(),
            (_, LoadedEnv::Split(env)) => json!({
                "client_env": env.client_env.to_value(),
            }),
        }
    }
}
