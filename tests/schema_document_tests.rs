//! Schema document tests
//!
//! Documents are read from disk, classified and loaded against an
//! environment snapshot.

use envguard::{
    AnySchema, ColorMode, EnvMap, EnvSchema, ExecutionContext, LoadOptions, LoadedEnv, Partition,
    SchemaError, SchemaShape, load_env, load_process_env, parse_schema_document,
    read_schema_file,
};
use serde_json::json;
use std::fs;
use tempfile::tempdir;

const UNIFIED_DOCUMENT: &str = r#"
description = "API service"

[fields.NODE_ENV]
type = "enum"
values = ["development", "production"]

[fields.PORT]
type = "port"
default = "3000"

[fields.API_URL]
type = "url"
"#;

const SPLIT_DOCUMENT: &str = r#"
[server.fields.DATABASE_URL]
type = "url"
secret = true

[server.fields.WORKERS]
type = "integer"
min = 1
max = 64
default = "4"

[client.fields.NEXT_PUBLIC_API_URL]
type = "url"

[client.fields.NEXT_PUBLIC_DEBUG]
type = "boolean"
optional = true
"#;

fn no_exit() -> LoadOptions {
    LoadOptions::default()
        .with_exit_on_error(false)
        .with_color(ColorMode::Never)
}

fn write_schema(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("env.schema.toml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn test_read_unified_document() {
    let (_dir, path) = write_schema(UNIFIED_DOCUMENT);
    let schema = read_schema_file(&path).unwrap();
    assert_eq!(schema.shape(), SchemaShape::Unified);

    let env = EnvMap::new()
        .with("NODE_ENV", "production")
        .with("API_URL", "https://api.example.com");

    let LoadedEnv::Unified(record) = load_env(&schema, &env, &no_exit()).unwrap() else {
        panic!("expected unified result");
    };
    assert_eq!(record.get_str("NODE_ENV"), Some("production"));
    assert_eq!(record.get("PORT"), Some(&json!(3000)));
}

#[test]
fn test_read_split_document() {
    let (_dir, path) = write_schema(SPLIT_DOCUMENT);
    let schema = read_schema_file(&path).unwrap();
    assert_eq!(schema.shape(), SchemaShape::Split);

    let env = EnvMap::new()
        .with("DATABASE_URL", "postgres://localhost:5432/db")
        .with("NEXT_PUBLIC_API_URL", "http://localhost:3000")
        .with("NEXT_PUBLIC_DEBUG", "yes");

    let LoadedEnv::Split(loaded) = load_env(&schema, &env, &no_exit()).unwrap() else {
        panic!("expected split result");
    };
    assert_eq!(loaded.server_env.field("WORKERS").unwrap(), Some(&json!(4)));
    assert_eq!(
        loaded.client_env.get("NEXT_PUBLIC_DEBUG"),
        Some(&json!(true))
    );
}

#[test]
fn test_redacted_view_hides_secrets() {
    let schema = parse_schema_document(SPLIT_DOCUMENT).unwrap();
    let env = EnvMap::new()
        .with("DATABASE_URL", "postgres://admin:hunter2@db:5432/app")
        .with("NEXT_PUBLIC_API_URL", "http://localhost:3000");

    let loaded = load_env(&schema, &env, &no_exit()).unwrap();
    let view = schema.redacted_view(&loaded);

    assert_eq!(
        view,
        json!({
            "server_env": {
                "DATABASE_URL": "[REDACTED]",
                "WORKERS": 4
            },
            "client_env": {
                "NEXT_PUBLIC_API_URL": "http://localhost:3000"
            }
        })
    );
}

#[test]
fn test_redacted_view_in_client_context() {
    let schema = parse_schema_document(SPLIT_DOCUMENT).unwrap();
    let env = EnvMap::new()
        .with("DATABASE_URL", "postgres://db:5432/app")
        .with("NEXT_PUBLIC_API_URL", "http://localhost:3000");

    let loaded = load_env(
        &schema,
        &env,
        &no_exit().with_context(ExecutionContext::Client),
    )
    .unwrap();
    let view = schema.redacted_view(&loaded);

    assert!(view.get("server_env").is_none());
    assert_eq!(
        view["client_env"]["NEXT_PUBLIC_API_URL"],
        json!("http://localhost:3000")
    );
}

#[test]
fn test_split_document_reports_both_partitions() {
    let schema = parse_schema_document(SPLIT_DOCUMENT).unwrap();
    let env = EnvMap::new().with("WORKERS", "100");

    let err = load_env(&schema, &env, &no_exit()).unwrap_err();
    let report = err.report().expect("validation failure");

    assert_eq!(report.partitions(), vec![Partition::Server, Partition::Client]);
    assert_eq!(report.issues_for(Partition::Server).len(), 2);
    assert!(report.mentions("NEXT_PUBLIC_API_URL"));
}

#[test]
fn test_half_split_document_is_rejected() {
    let document = r#"
[server.fields.DATABASE_URL]
type = "url"
"#;

    let err = parse_schema_document(document).unwrap_err();
    assert!(matches!(err, SchemaError::Invalid { .. }));
}

#[test]
fn test_unknown_field_type_is_rejected() {
    let document = r#"
[fields.TIMEOUT]
type = "duration"
"#;

    let err = parse_schema_document(document).unwrap_err();
    assert!(matches!(err, SchemaError::Parse(_)));
}

#[test]
fn test_missing_schema_file() {
    let dir = tempdir().unwrap();
    let err = read_schema_file(dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, SchemaError::Io(_)));
}

#[test]
fn test_any_schema_variants() {
    assert!(matches!(
        parse_schema_document(UNIFIED_DOCUMENT).unwrap(),
        AnySchema::Unified(_)
    ));
    assert!(matches!(
        parse_schema_document(SPLIT_DOCUMENT).unwrap(),
        AnySchema::Split(_)
    ));
}

#[test]
#[serial_test::serial]
fn test_load_process_env() {
    use std::env;

    let schema = parse_schema_document(
        r#"
[fields.ENVGUARD_TEST_SERVICE_PORT]
type = "port"

[fields.ENVGUARD_TEST_SERVICE_NAME]
type = "string"
min_len = 3
"#,
    )
    .unwrap();

    unsafe {
        env::set_var("ENVGUARD_TEST_SERVICE_PORT", "8443");
        env::set_var("ENVGUARD_TEST_SERVICE_NAME", "billing");
    }

    let loaded = load_process_env(&schema);

    // Cleanup
    unsafe {
        env::remove_var("ENVGUARD_TEST_SERVICE_PORT");
        env::remove_var("ENVGUARD_TEST_SERVICE_NAME");
    }

    let LoadedEnv::Unified(record) = loaded.unwrap() else {
        panic!("expected unified result");
    };
    assert_eq!(record.get("ENVGUARD_TEST_SERVICE_PORT"), Some(&json!(8443)));
    assert_eq!(record.get_str("ENVGUARD_TEST_SERVICE_NAME"), Some("billing"));
}
