//! Report rendering snapshots

use envguard::report::render;
use envguard::{
    ColorMode, EnvMap, Field, LoadOptions, ObjectSchema, SplitSchema, load_env,
    parse_schema_document,
};

fn no_exit() -> LoadOptions {
    LoadOptions::default()
        .with_exit_on_error(false)
        .with_color(ColorMode::Never)
}

#[test]
fn test_unified_report() {
    let schema = ObjectSchema::new()
        .field("NODE_ENV", Field::one_of(["development", "production"]))
        .field("PORT", Field::port());
    let env = EnvMap::new().with("NODE_ENV", "staging");

    let err = load_env(&schema, &env, &no_exit()).unwrap_err();
    let report = err.report().expect("validation failure");

    insta::assert_snapshot!(render(report, false), @r"
    Invalid environment variables:
     - NODE_ENV (expected one of: development, production)
     - PORT (required)
    ");
}

#[test]
fn test_split_report() {
    let schema = SplitSchema::new(
        ObjectSchema::new().field("DATABASE_URL", Field::url()),
        ObjectSchema::new().field("NEXT_PUBLIC_API_URL", Field::url()),
    );
    let env = EnvMap::new().with("NEXT_PUBLIC_API_URL", "123");

    let err = load_env(&schema, &env, &no_exit()).unwrap_err();
    let report = err.report().expect("validation failure");

    insta::assert_snapshot!(render(report, false), @r"
    Invalid environment variables:

    SERVER variables:
     - DATABASE_URL (required)

    CLIENT variables:
     - NEXT_PUBLIC_API_URL (invalid url: relative URL without a base)
    ");
}

#[test]
fn test_client_only_report() {
    let schema = SplitSchema::new(
        ObjectSchema::new(),
        ObjectSchema::new().field("NEXT_PUBLIC_API_URL", Field::string()),
    );

    let err = load_env(&schema, &EnvMap::new(), &no_exit()).unwrap_err();
    let report = err.report().expect("validation failure");

    insta::assert_snapshot!(render(report, false), @r"
    Invalid environment variables:

    CLIENT variables:
     - NEXT_PUBLIC_API_URL (required)
    ");
}

#[test]
fn test_styled_report_keeps_text() {
    let schema = ObjectSchema::new().field("NODE_ENV", Field::string());
    let err = load_env(&schema, &EnvMap::new(), &no_exit()).unwrap_err();
    let report = err.report().expect("validation failure");

    let styled = render(report, true);
    assert!(styled.contains("\u{1b}["));
    assert!(styled.contains("NODE_ENV"));
    assert_ne!(styled, render(report, false));
}

#[test]
fn test_redacted_view_snapshot() {
    let schema = parse_schema_document(
        r#"
[fields.API_TOKEN]
type = "string"
secret = true

[fields.LOG_JSON]
type = "boolean"
default = "off"

[fields.RETRIES]
type = "integer"
min = 0
default = "3"
"#,
    )
    .unwrap();
    let env = EnvMap::new().with("API_TOKEN", "tok_live_123");

    let loaded = load_env(&schema, &env, &no_exit()).unwrap();

    insta::assert_json_snapshot!(schema.redacted_view(&loaded), @r#"
    {
      "API_TOKEN": "[REDACTED]",
      "LOG_JSON": false,
      "RETRIES": 3
    }
    "#);
}
