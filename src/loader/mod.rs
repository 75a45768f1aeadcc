//! Environment loader
//!
//! Decides which schema shape was supplied, partitions the input, validates
//! every partition, aggregates the failures and reports them.
//!
//! ```text
//! load_env ─┬─ Unified ── validate(full input)
//!           └─ Split ──── validate(full input)      → server
//!                         validate(public subset)   → client
//!                                  │
//!                   failures? ─ report ─ exit(1) or EnvError::ValidationFailed
//! ```

mod any;
pub mod shape;
mod split;

pub use any::{AnySchema, LoadedEnv};
pub use shape::{SchemaShape, classify};
pub use split::{ServerEnv, SplitEnv, SplitSchema};

use crate::env::{DEFAULT_PUBLIC_PREFIX, EnvMap, check_public_prefix, derive_public_subset};
use crate::error::{EnvError, ValidateError};
use crate::issue::{ErrorReport, Partition, PartitionIssues};
use crate::report::{self, ColorMode};
use crate::schema::{ObjectSchema, Typed, Validator};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, error, warn};

/// Exit status used when validation fails and `exit_on_error` is set
pub const EXIT_CODE: i32 = 1;

/// Where the loader is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionContext {
    /// Trusted context; server values are readable
    #[default]
    Server,
    /// Untrusted context; server values are withheld
    Client,
}

impl FromStr for ExecutionContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "server" => Ok(ExecutionContext::Server),
            "client" => Ok(ExecutionContext::Client),
            other => Err(format!(
                "unknown execution context '{}', expected server or client",
                other
            )),
        }
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionContext::Server => f.write_str("server"),
            ExecutionContext::Client => f.write_str("client"),
        }
    }
}

/// Options for a single load
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Terminate the process after reporting a validation failure
    pub exit_on_error: bool,
    pub context: ExecutionContext,
    /// Prefix selecting the variables visible to client validation.
    /// Split loads reject prefixes that fail [`check_public_prefix`].
    pub public_prefix: String,
    pub color: ColorMode,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            exit_on_error: true,
            context: ExecutionContext::Server,
            public_prefix: DEFAULT_PUBLIC_PREFIX.to_string(),
            color: ColorMode::Auto,
        }
    }
}

impl LoadOptions {
    pub fn with_exit_on_error(mut self, exit_on_error: bool) -> Self {
        self.exit_on_error = exit_on_error;
        self
    }

    pub fn with_context(mut self, context: ExecutionContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_public_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.public_prefix = prefix.into();
        self
    }

    pub fn with_color(mut self, color: ColorMode) -> Self {
        self.color = color;
        self
    }
}

/// A schema the loader can dispatch on.
///
/// The output type follows statically from the shape: unified schemas yield
/// their validator's output, split schemas yield a [`SplitEnv`].
pub trait EnvSchema {
    type Output;

    fn shape(&self) -> SchemaShape;

    fn load(&self, input: &EnvMap, options: &LoadOptions) -> Result<Self::Output, EnvError>;
}

/// Validate `input` against `schema`.
///
/// On validation failure the report is written to stderr first; then the
/// process exits with [`EXIT_CODE`] if `options.exit_on_error` is set,
/// otherwise `EnvError::ValidationFailed` is returned. Validator faults are
/// returned as `EnvError::Fault` and never exit.
pub fn load_env<S>(schema: &S, input: &EnvMap, options: &LoadOptions) -> Result<S::Output, EnvError>
where
    S: EnvSchema + ?Sized,
{
    debug!(
        shape = %schema.shape(),
        vars = input.len(),
        context = %options.context,
        "Loading environment"
    );
    schema.load(input, options)
}

/// Validate the current process environment with default options
pub fn load_process_env<S>(schema: &S) -> Result<S::Output, EnvError>
where
    S: EnvSchema + ?Sized,
{
    load_env(schema, &EnvMap::from_process(), &LoadOptions::default())
}

/// Any single validator treated as a unified schema
#[derive(Debug, Clone)]
pub struct Unified<V>(pub V);

impl<V: Validator> EnvSchema for Unified<V> {
    type Output = V::Output;

    fn shape(&self) -> SchemaShape {
        SchemaShape::Unified
    }

    fn load(&self, input: &EnvMap, options: &LoadOptions) -> Result<V::Output, EnvError> {
        load_unified(&self.0, input, options)
    }
}

impl EnvSchema for ObjectSchema {
    type Output = crate::schema::EnvRecord;

    fn shape(&self) -> SchemaShape {
        SchemaShape::Unified
    }

    fn load(&self, input: &EnvMap, options: &LoadOptions) -> Result<Self::Output, EnvError> {
        load_unified(self, input, options)
    }
}

impl<T: DeserializeOwned> EnvSchema for Typed<T> {
    type Output = T;

    fn shape(&self) -> SchemaShape {
        SchemaShape::Unified
    }

    fn load(&self, input: &EnvMap, options: &LoadOptions) -> Result<T, EnvError> {
        load_unified(self, input, options)
    }
}

pub(crate) fn load_unified<V>(
    validator: &V,
    input: &EnvMap,
    options: &LoadOptions,
) -> Result<V::Output, EnvError>
where
    V: Validator + ?Sized,
{
    match validator.validate(input) {
        Ok(output) => Ok(output),
        Err(ValidateError::Invalid(issues)) => Err(reject(ErrorReport::Unified(issues), options)),
        Err(ValidateError::Fault(e)) => Err(fault(None, e)),
    }
}

pub(crate) fn load_split<S, C>(
    server: &S,
    client: &C,
    input: &EnvMap,
    options: &LoadOptions,
) -> Result<SplitEnv<S::Output, C::Output>, EnvError>
where
    S: Validator + ?Sized,
    C: Validator + ?Sized,
{
    check_public_prefix(&options.public_prefix)?;

    let mut failures = Vec::new();

    // Server values are validated in every context; only access is gated.
    let server_env = capture(Partition::Server, server.validate(input), &mut failures)?;

    let public = derive_public_subset(input, &options.public_prefix);
    debug!(
        prefix = %options.public_prefix,
        public_vars = public.len(),
        "Derived public subset"
    );
    let client_env = capture(Partition::Client, client.validate(&public), &mut failures)?;

    match (server_env, client_env) {
        (Some(server_env), Some(client_env)) => Ok(SplitEnv {
            server_env: ServerEnv::for_context(options.context, server_env),
            client_env,
        }),
        _ => Err(reject(ErrorReport::Split(failures), options)),
    }
}

fn capture<T>(
    partition: Partition,
    outcome: Result<T, ValidateError>,
    failures: &mut Vec<PartitionIssues>,
) -> Result<Option<T>, EnvError> {
    match outcome {
        Ok(value) => {
            debug!(%partition, "Partition validated");
            Ok(Some(value))
        }
        Err(ValidateError::Invalid(issues)) => {
            debug!(%partition, issues = issues.len(), "Partition failed validation");
            failures.push(PartitionIssues { partition, issues });
            Ok(None)
        }
        Err(ValidateError::Fault(e)) => Err(fault(Some(partition), e)),
    }
}

fn fault(partition: Option<Partition>, e: anyhow::Error) -> EnvError {
    match partition {
        Some(partition) => error!(%partition, error = %e, "Unexpected error while parsing env"),
        None => error!(error = %e, "Unexpected error while parsing env"),
    }
    EnvError::Fault(e)
}

/// Report a failed load, then exit or hand the failure back
fn reject(report: ErrorReport, options: &LoadOptions) -> EnvError {
    warn!(
        issues = report.issue_count(),
        summary = %report,
        "Environment validation failed"
    );

    let styled = options.color.enabled_for_stderr();
    report::emit(&report, styled, &mut std::io::stderr().lock());

    if options.exit_on_error {
        std::process::exit(EXIT_CODE);
    }
    EnvError::ValidationFailed(report)
}
