//! envguard
//!
//! Validate environment variables against a schema and get typed values back,
//! or a readable report of everything that is wrong.
//!
//! ## Schema shapes
//!
//! - **Unified** - one schema over the whole environment
//! - **Split** - a `server` schema over the whole environment and a `client`
//!   schema over the variables carrying the public prefix (`NEXT_PUBLIC_` by
//!   default). Server values are withheld when loading in a client context.
//!
//! ```text
//! load_env(schema, env, options)
//!   unified → validate(env)
//!   split   → validate(env) as server, validate(public subset) as client
//!   failure → report to stderr → exit(1) or EnvError::ValidationFailed
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use envguard::{EnvMap, Field, LoadOptions, ObjectSchema, SplitSchema, load_env};
//!
//! let schema = SplitSchema::new(
//!     ObjectSchema::new().field("DATABASE_URL", Field::url().secret()),
//!     ObjectSchema::new().field("NEXT_PUBLIC_API_URL", Field::url()),
//! );
//!
//! let env = load_env(&schema, &EnvMap::from_process(), &LoadOptions::default())?;
//! let api_url = env.client_env.get_str("NEXT_PUBLIC_API_URL");
//! # Ok::<(), envguard::EnvError>(())
//! ```

pub mod config;
pub mod env;
pub mod error;
pub mod issue;
pub mod loader;
pub mod report;
pub mod schema;

// Re-export main types
pub use env::{DEFAULT_PUBLIC_PREFIX, EnvMap, check_public_prefix, derive_public_subset};
pub use error::{ConfigError, EnvError, EnvResult, SchemaError, ValidateError};
pub use issue::{ErrorReport, Issue, Partition, PartitionIssues, PathSegment};
pub use loader::{
    AnySchema, EnvSchema, ExecutionContext, LoadOptions, LoadedEnv, SchemaShape, ServerEnv,
    SplitEnv, SplitSchema, Unified, classify, load_env, load_process_env,
};
pub use report::ColorMode;
pub use schema::{
    EnvRecord, Field, FieldKind, ObjectSchema, Typed, Validator, parse_schema_document,
    read_schema_file, validator_fn,
};
